//! Template errors

use thiserror::Error;

/// Errors raised while parsing or resolving a template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Invalid template syntax
    #[error("Invalid template syntax at line {line}: {message}")]
    InvalidSyntax {
        /// Line number where syntax error occurred
        line: usize,
        /// Error message describing the syntax issue
        message: String,
    },

    /// A template delimiter was empty
    #[error("Template delimiters cannot be empty")]
    EmptyDelimiter,

    /// A placeholder names a key that is not bound
    #[error("Unbound template key: {0}")]
    UnboundKey(String),

    /// A placeholder asks for a naming form that does not exist
    #[error("Unknown naming form: {0}")]
    UnknownForm(String),

    /// A naming form was applied to something that is not a type
    #[error("Key {0} is not bound to a type")]
    NotAType(String),

    /// A range was opened over something that is not a sequence
    #[error("Key {0} is not bound to a sequence")]
    NotASequence(String),

    /// A sequence was emitted directly instead of through a range
    #[error("Key {0} is a sequence and cannot be emitted directly")]
    NotAScalar(String),

    /// Range blocks nested deeper than supported
    #[error("Range nesting deeper than {max} levels at line {line}")]
    NestingTooDeep {
        /// Line of the offending range
        line: usize,
        /// Supported depth
        max: usize,
    },

    /// A template uses a symbol before the template that introduces it
    #[error("Template {template} uses {symbol} before it is introduced")]
    TemplateOrder {
        /// Name of the offending template
        template: String,
        /// Symbol used too early
        symbol: String,
    },
}
