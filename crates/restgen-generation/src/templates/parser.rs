//! Template syntax parser
//!
//! Grammar, with `$` as the default open and close delimiter:
//!
//! - `$key$` emits the value bound to `key`
//! - `$key|form$` emits naming form `form` of the type bound to `key`
//! - `$.$` / `$.|form$` refer to the current element inside a range
//! - `$range key$ ... $end$` repeats the body once per sequence element
//!
//! A leading dot on a key (`$.type|public$`) is accepted and ignored.

use std::collections::BTreeSet;
use std::fmt;

use crate::templates::error::TemplateError;

/// Default open/close delimiter
pub const DEFAULT_DELIMITER: &str = "$";

/// Deepest supported range nesting (a range inside a range)
pub const MAX_RANGE_DEPTH: usize = 2;

/// What a placeholder or range refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRef {
    /// The element bound by the enclosing range
    Current,
    /// A key of the variable map
    Named(String),
}

impl fmt::Display for KeyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRef::Current => f.write_str("."),
            KeyRef::Named(name) => f.write_str(name),
        }
    }
}

/// A placeholder expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    /// Referenced value
    pub key: KeyRef,
    /// Naming form tag after `|`, unchecked until resolution
    pub form: Option<String>,
}

/// Represents a parsed template element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateElement {
    /// Plain text content
    Text(String),
    /// Placeholder: `$key$` or `$key|form$`
    Placeholder {
        /// Parsed expression
        expression: Expression,
        /// Line the placeholder starts on
        line: usize,
    },
    /// Range block: `$range key$...$end$`
    Range {
        /// Sequence to iterate
        key: KeyRef,
        /// Body repeated per element
        body: Vec<TemplateElement>,
        /// Line the range opens on
        line: usize,
    },
}

/// Parsed template structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    /// Template elements
    pub elements: Vec<TemplateElement>,
    /// Every named key referenced anywhere in the template
    pub keys: BTreeSet<String>,
}

/// Template parser with configurable delimiters
#[derive(Debug, Clone)]
pub struct TemplateParser {
    open: String,
    close: String,
}

enum Token {
    Text(String),
    Action { content: String, line: usize },
}

impl TemplateParser {
    /// Parser using `$` for both delimiters
    pub fn new() -> Self {
        Self {
            open: DEFAULT_DELIMITER.to_string(),
            close: DEFAULT_DELIMITER.to_string(),
        }
    }

    /// Parser using custom delimiters; both must be non-empty
    pub fn with_delimiters(
        open: impl Into<String>,
        close: impl Into<String>,
    ) -> Result<Self, TemplateError> {
        let (open, close) = (open.into(), close.into());
        if open.is_empty() || close.is_empty() {
            return Err(TemplateError::EmptyDelimiter);
        }
        Ok(Self { open, close })
    }

    /// Parse template content into an element tree
    ///
    /// # Arguments
    /// * `content` - Template content to parse
    ///
    /// # Returns
    /// Parsed template structure or error with line number
    pub fn parse(&self, content: &str) -> Result<ParsedTemplate, TemplateError> {
        let tokens = self.tokenize(content)?;
        let mut keys = BTreeSet::new();
        let mut iter = tokens.into_iter();
        let elements = parse_block(&mut iter, 0, None, &mut keys)?;
        Ok(ParsedTemplate { elements, keys })
    }

    fn tokenize(&self, content: &str) -> Result<Vec<Token>, TemplateError> {
        let mut tokens = Vec::new();
        let mut position = 0;
        let mut line = 1;

        while position < content.len() {
            let rest = &content[position..];
            let Some(open_at) = rest.find(&self.open) else {
                tokens.push(Token::Text(rest.to_string()));
                break;
            };

            if open_at > 0 {
                let text = &rest[..open_at];
                line += text.matches('\n').count();
                tokens.push(Token::Text(text.to_string()));
            }

            let action_start = position + open_at + self.open.len();
            let close_at = content[action_start..].find(&self.close).ok_or_else(|| {
                TemplateError::InvalidSyntax {
                    line,
                    message: format!("Unterminated action, expected '{}'", self.close),
                }
            })?;
            let action = &content[action_start..action_start + close_at];
            tokens.push(Token::Action {
                content: action.to_string(),
                line,
            });
            line += action.matches('\n').count();
            position = action_start + close_at + self.close.len();
        }

        Ok(tokens)
    }
}

impl Default for TemplateParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_block(
    tokens: &mut std::vec::IntoIter<Token>,
    depth: usize,
    opened_at: Option<usize>,
    keys: &mut BTreeSet<String>,
) -> Result<Vec<TemplateElement>, TemplateError> {
    let mut elements = Vec::new();

    while let Some(token) = tokens.next() {
        let (content, line) = match token {
            Token::Text(text) => {
                elements.push(TemplateElement::Text(text));
                continue;
            }
            Token::Action { content, line } => (content, line),
        };

        let action = content.trim();
        if action == "end" {
            return match opened_at {
                Some(_) => Ok(elements),
                None => Err(TemplateError::InvalidSyntax {
                    line,
                    message: "'end' without matching 'range'".to_string(),
                }),
            };
        }

        if let Some(target) = action.strip_prefix("range").filter(|r| {
            r.is_empty() || r.starts_with(char::is_whitespace)
        }) {
            if depth + 1 > MAX_RANGE_DEPTH {
                return Err(TemplateError::NestingTooDeep {
                    line,
                    max: MAX_RANGE_DEPTH,
                });
            }
            let key = parse_key(target, line)?;
            record_key(&key, keys);
            let body = parse_block(tokens, depth + 1, Some(line), keys)?;
            elements.push(TemplateElement::Range { key, body, line });
            continue;
        }

        let expression = parse_expression(action, line)?;
        record_key(&expression.key, keys);
        elements.push(TemplateElement::Placeholder { expression, line });
    }

    match opened_at {
        Some(line) => Err(TemplateError::InvalidSyntax {
            line,
            message: "Unclosed 'range' block".to_string(),
        }),
        None => Ok(elements),
    }
}

fn record_key(key: &KeyRef, keys: &mut BTreeSet<String>) {
    if let KeyRef::Named(name) = key {
        keys.insert(name.clone());
    }
}

fn parse_expression(action: &str, line: usize) -> Result<Expression, TemplateError> {
    let (key, form) = match action.split_once('|') {
        Some((key, form)) => {
            let form = form.trim();
            if form.is_empty() {
                return Err(TemplateError::InvalidSyntax {
                    line,
                    message: format!("Empty naming form in '{}'", action),
                });
            }
            (key, Some(form.to_string()))
        }
        None => (action, None),
    };
    Ok(Expression {
        key: parse_key(key, line)?,
        form,
    })
}

fn parse_key(raw: &str, line: usize) -> Result<KeyRef, TemplateError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TemplateError::InvalidSyntax {
            line,
            message: "Empty action".to_string(),
        });
    }
    if raw == "." {
        return Ok(KeyRef::Current);
    }

    let name = raw.strip_prefix('.').unwrap_or(raw);
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(TemplateError::InvalidSyntax {
            line,
            message: format!("Invalid key '{}'", raw),
        });
    }
    Ok(KeyRef::Named(name.to_string()))
}
