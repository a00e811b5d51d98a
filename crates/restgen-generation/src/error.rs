//! Error types for the generation pipeline

use thiserror::Error;

use crate::tags::TagError;
use crate::templates::TemplateError;

/// Errors that abort a generation run
///
/// Every variant is fatal: generation is a deterministic function of its
/// inputs, so the only recovery is fixing the input and running again.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Invalid planner or CLI configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A type-universe manifest could not be read or decoded
    #[error("Manifest error in {path}: {message}")]
    Manifest {
        /// Manifest file path
        path: String,
        /// What went wrong
        message: String,
    },

    /// A type carries a malformed annotation directive
    #[error("Annotation error on type {type_name}: {source}")]
    Annotation {
        /// Qualified name of the offending type
        type_name: String,
        /// Underlying tag parse failure
        #[source]
        source: TagError,
    },

    /// Generate-enabled types exist but none carries the object-meta member
    #[error("Unable to find {member} for any types in package {package}")]
    MissingObjectMeta {
        /// Source package path
        package: String,
        /// Member name that was searched for
        member: String,
    },

    /// Template parsing or resolution failed inside a generator
    #[error("Template error in generator {generator}: {source}")]
    Template {
        /// Generator identity (`path/stem`)
        generator: String,
        /// Underlying template failure
        #[source]
        source: TemplateError,
    },

    /// Two generators would write the same file
    #[error("Output collision: {path}/{stem} is produced more than once")]
    OutputCollision {
        /// Package path
        path: String,
        /// File stem
        stem: String,
    },

    /// A meta generator emitted more than once within a run
    #[error("Generator {0} emitted more than once in a single run")]
    DuplicateEmission(String),

    /// Write failed
    #[error("Write failed: {0}")]
    WriteFailed(String),
}
