// CLI error types

use restgen_generation::GenerationError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
}

impl CliError {
    /// Shorthand for an invalid argument
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CliError::InvalidArgument {
            message: message.into(),
        }
    }

    /// One-line diagnostic for the user
    pub fn user_message(&self) -> String {
        let message = match self {
            CliError::InvalidArgument { message } => {
                format!("invalid argument: {} (run 'restgen --help' for usage)", message)
            }
            CliError::Config(msg) => format!("configuration error: {}", msg),
            CliError::Generation(e) => format!("generation failed: {}", e),
        };
        single_line(&message)
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

/// Collapse multi-line messages (e.g. decoder errors) onto one line
fn single_line(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub type CliResult<T> = Result<T, CliError>;
