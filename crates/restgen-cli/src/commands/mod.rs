// Command handlers for restgen

pub mod gen;

pub use gen::{parse_plural_exceptions, parse_verbs, GenCommand};

use crate::error::CliResult;

/// Trait for command handlers
pub trait Command {
    /// Execute the command
    fn execute(&self) -> CliResult<()>;
}
