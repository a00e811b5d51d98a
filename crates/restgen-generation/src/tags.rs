//! Annotation directive parsing
//!
//! Directives are comment lines of the form `+key` or `+key=value`. Only the
//! `genclient` family is interpreted; other `+` tags belong to other tools
//! and are ignored.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Marker that opens a directive line
pub const DIRECTIVE_MARKER: char = '+';

/// Key of the generation-enable flag
pub const GENERATE_KEY: &str = "genclient";

const NON_NAMESPACED_KEY: &str = "genclient:nonNamespaced";
const NO_VERBS_KEY: &str = "genclient:noVerbs";
const ONLY_VERBS_KEY: &str = "genclient:onlyVerbs";
const SKIP_VERBS_KEY: &str = "genclient:skipVerbs";

/// Operations a generated client may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verb {
    /// Create a new object
    Create,
    /// Replace an existing object
    Update,
    /// Delete an object by name
    Delete,
    /// Fetch one object by name
    Get,
    /// List objects
    List,
    /// Stream changes
    Watch,
    /// Partially update an object
    Patch,
}

impl Verb {
    /// Every verb, in declaration order
    pub const ALL: [Verb; 7] = [
        Verb::Create,
        Verb::Update,
        Verb::Delete,
        Verb::Get,
        Verb::List,
        Verb::Watch,
        Verb::Patch,
    ];

    /// Directive spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Create => "create",
            Verb::Update => "update",
            Verb::Delete => "delete",
            Verb::Get => "get",
            Verb::List => "list",
            Verb::Watch => "watch",
            Verb::Patch => "patch",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Verb::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("unknown verb '{}'", s))
    }
}

/// Why a comment block yields no usable tag set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// No `genclient` directive appears in the comments
    #[error("no generation directive present")]
    NoDirective,

    /// A `genclient` directive is present but cannot be interpreted
    #[error("malformed directive '{line}': {reason}")]
    Malformed {
        /// The offending comment line
        line: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Typed view of a type's `genclient` directives
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotationTagSet {
    /// `+genclient` is set (last occurrence wins)
    pub generate: bool,
    /// `+genclient:nonNamespaced` is present
    pub non_namespaced: bool,
    /// `+genclient:noVerbs` is present
    pub no_verbs: bool,
    /// Union of every `+genclient:onlyVerbs=` list
    pub only_verbs: BTreeSet<Verb>,
    /// Union of every `+genclient:skipVerbs=` list
    pub skip_verbs: BTreeSet<Verb>,
}

impl AnnotationTagSet {
    /// Verbs the type supports after applying noVerbs/onlyVerbs/skipVerbs
    pub fn supported_verbs(&self) -> BTreeSet<Verb> {
        if self.no_verbs {
            return BTreeSet::new();
        }
        let base: BTreeSet<Verb> = if self.only_verbs.is_empty() {
            Verb::ALL.into_iter().collect()
        } else {
            self.only_verbs.clone()
        };
        base.difference(&self.skip_verbs).copied().collect()
    }

    /// Whether `verb` is supported
    pub fn has_verb(&self, verb: Verb) -> bool {
        self.supported_verbs().contains(&verb)
    }

    /// Whether every verb in `required` is supported
    pub fn satisfies(&self, required: &[Verb]) -> bool {
        let supported = self.supported_verbs();
        required.iter().all(|v| supported.contains(v))
    }
}

fn directive_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        // +key or +key=value, key without whitespace or '='
        Regex::new(r"^\+(?P<key>[A-Za-z][A-Za-z0-9:._-]*)(?:=(?P<value>.*))?$")
            .expect("Invalid regex")
    })
}

fn malformed(line: &str, reason: impl Into<String>) -> TagError {
    TagError::Malformed {
        line: line.to_string(),
        reason: reason.into(),
    }
}

fn parse_verb_list(line: &str, value: Option<&str>) -> Result<Vec<Verb>, TagError> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| malformed(line, "expected a comma separated verb list"))?;
    value
        .split(',')
        .map(|v| v.parse::<Verb>().map_err(|reason| malformed(line, reason)))
        .collect()
}

/// Parse the `genclient` directives in `lines`
///
/// Returns [`TagError::NoDirective`] when nothing in the family is present,
/// and [`TagError::Malformed`] on the first directive that cannot be
/// interpreted.
pub fn parse_tags<S: AsRef<str>>(lines: &[S]) -> Result<AnnotationTagSet, TagError> {
    let mut tags = AnnotationTagSet::default();
    let mut seen = false;

    for raw in lines {
        let line = raw.as_ref().trim();
        if !line.starts_with(DIRECTIVE_MARKER) || !line[1..].starts_with(GENERATE_KEY) {
            continue;
        }

        let caps = directive_regex()
            .captures(line)
            .ok_or_else(|| malformed(line, "invalid directive syntax"))?;
        let key = &caps["key"];
        let value = caps.name("value").map(|m| m.as_str());

        match key {
            GENERATE_KEY => {
                tags.generate = match value.map(str::trim) {
                    None | Some("") | Some("true") => true,
                    Some("false") => false,
                    Some(other) => {
                        return Err(malformed(
                            line,
                            format!("expected true or false, got '{}'", other),
                        ))
                    }
                };
            }
            NON_NAMESPACED_KEY | NO_VERBS_KEY => {
                if value.is_some() {
                    return Err(malformed(line, format!("{} takes no value", key)));
                }
                if key == NON_NAMESPACED_KEY {
                    tags.non_namespaced = true;
                } else {
                    tags.no_verbs = true;
                }
            }
            ONLY_VERBS_KEY => tags.only_verbs.extend(parse_verb_list(line, value)?),
            SKIP_VERBS_KEY => tags.skip_verbs.extend(parse_verb_list(line, value)?),
            // `+genclientfoo` is some other tool's tag
            other if !other.starts_with("genclient:") => continue,
            other => return Err(malformed(line, format!("unknown directive '{}'", other))),
        }
        seen = true;
    }

    if seen {
        Ok(tags)
    } else {
        Err(TagError::NoDirective)
    }
}

/// Collect every `<marker>key[=value]` tag in `lines`, values in order of
/// appearance. A bare key records an empty value.
pub fn extract_comment_tags<S: AsRef<str>>(
    marker: &str,
    lines: &[S],
) -> BTreeMap<String, Vec<String>> {
    let mut out: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for raw in lines {
        let line = raw.as_ref().trim();
        let Some(rest) = line.strip_prefix(marker) else {
            continue;
        };
        let (key, value) = match rest.split_once('=') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => (rest.trim(), ""),
        };
        if key.is_empty() {
            continue;
        }
        out.entry(key.to_string()).or_default().push(value.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_genclient_enables_all_verbs() {
        let tags = parse_tags(&["+genclient"]).unwrap();
        assert!(tags.generate);
        assert!(tags.satisfies(&[Verb::List, Verb::Get]));
        assert_eq!(tags.supported_verbs().len(), Verb::ALL.len());
    }

    #[test]
    fn test_no_directive_is_distinct() {
        assert_eq!(
            parse_tags(&["Some doc comment", "+k8s:deepcopy-gen=true"]),
            Err(TagError::NoDirective)
        );
        let empty: [&str; 0] = [];
        assert_eq!(parse_tags(&empty), Err(TagError::NoDirective));
    }

    #[test]
    fn test_later_flag_overrides_earlier() {
        let tags = parse_tags(&["+genclient", "+genclient=false"]).unwrap();
        assert!(!tags.generate);
        let tags = parse_tags(&["+genclient=false", "+genclient=true"]).unwrap();
        assert!(tags.generate);
    }

    #[test]
    fn test_malformed_flag_value() {
        let err = parse_tags(&["+genclient=maybe"]).unwrap_err();
        assert!(matches!(err, TagError::Malformed { .. }));
    }

    #[test]
    fn test_malformed_syntax() {
        let err = parse_tags(&["+genclient :onlyVerbs=get"]).unwrap_err();
        assert!(matches!(err, TagError::Malformed { .. }));
    }

    #[test]
    fn test_unknown_extension_is_malformed() {
        let err = parse_tags(&["+genclient", "+genclient:method=Scale"]).unwrap_err();
        assert!(err.to_string().contains("unknown directive"));
    }

    #[test]
    fn test_only_verbs_accumulate() {
        let tags = parse_tags(&[
            "+genclient",
            "+genclient:onlyVerbs=get",
            "+genclient:onlyVerbs=list,create",
        ])
        .unwrap();
        assert!(tags.satisfies(&[Verb::List, Verb::Get]));
        assert!(!tags.has_verb(Verb::Delete));
    }

    #[test]
    fn test_skip_verbs_remove() {
        let tags = parse_tags(&["+genclient", "+genclient:skipVerbs=list"]).unwrap();
        assert!(!tags.satisfies(&[Verb::List, Verb::Get]));
    }

    #[test]
    fn test_no_verbs() {
        let tags = parse_tags(&["+genclient", "+genclient:noVerbs"]).unwrap();
        assert!(tags.supported_verbs().is_empty());
        assert!(parse_tags(&["+genclient:noVerbs=true"]).is_err());
    }

    #[test]
    fn test_unknown_verb_is_malformed() {
        assert!(parse_tags(&["+genclient:onlyVerbs=get,frobnicate"]).is_err());
        assert!(parse_tags(&["+genclient:skipVerbs="]).is_err());
    }

    #[test]
    fn test_extract_comment_tags() {
        let tags = extract_comment_tags("+", &["+groupName=ecs.acme.io", "text", "+flag"]);
        assert_eq!(tags["groupName"], vec!["ecs.acme.io"]);
        assert_eq!(tags["flag"], vec![""]);
    }
}
