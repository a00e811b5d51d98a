//! Template parsing and resolution
//!
//! Templates use `$` delimited placeholders (`$key$`, `$key|form$`) and
//! `$range key$ ... $end$` blocks. See [`parser`] for the grammar.

pub mod context;
pub mod engine;
pub mod error;
pub mod parser;
pub mod snippet;

pub use context::{Value, VariableMap};
pub use engine::TemplateEngine;
pub use error::TemplateError;
pub use parser::{
    Expression, KeyRef, ParsedTemplate, TemplateElement, TemplateParser, DEFAULT_DELIMITER,
    MAX_RANGE_DEPTH,
};
pub use snippet::Snippet;
