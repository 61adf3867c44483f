//! Error handling for plugsmith.
//! Defines the error type shared by every stage of the generation pipeline.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for plugsmith operations.
///
/// Every variant belongs to exactly one pipeline [`Stage`], so callers can report
/// where a run failed without matching on individual variants.
#[derive(Error, Debug)]
pub enum Error {
    /// An answer is missing, malformed or outside its closed set of values.
    #[error("Validation error: '{field}' {reason}.")]
    ValidationError { field: String, reason: String },

    /// A path or content template could not be rendered.
    #[error("Render error in '{path}': {reason}.")]
    RenderError { path: String, reason: String },

    /// Writing or pruning the generated tree failed.
    #[error("Materialization error at '{}': {source}.", path.display())]
    MaterializationError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Project directory '{output_dir}' already exists. Use --force to overwrite it.")]
    OutputDirectoryExistsError { output_dir: String },

    /// The answer set could not be read or parsed.
    #[error("Answers error: {0}.")]
    AnswersError(String),

    /// Interactive input failed.
    #[error("Prompt error: {0}.")]
    PromptError(String),

    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),
}

impl Error {
    /// Shorthand for a [`Error::ValidationError`].
    pub fn validation<F: Into<String>, R: Into<String>>(field: F, reason: R) -> Self {
        Error::ValidationError { field: field.into(), reason: reason.into() }
    }

    /// Returns the pipeline stage this error was raised in.
    pub fn stage(&self) -> Stage {
        match self {
            Error::AnswersError(_) | Error::PromptError(_) | Error::IoError(_) => {
                Stage::Input
            }
            Error::ValidationError { .. } => Stage::Normalize,
            Error::RenderError { .. } => Stage::Render,
            Error::MaterializationError { .. } | Error::OutputDirectoryExistsError { .. } => {
                Stage::Materialize
            }
        }
    }
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Input,
    Normalize,
    Render,
    Materialize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Input => "input",
            Stage::Normalize => "normalize",
            Stage::Render => "render",
            Stage::Materialize => "materialize",
        };
        f.write_str(name)
    }
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the failing stage and the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) -> ! {
    eprintln!("{} failed: {}", err.stage(), err);
    std::process::exit(1);
}
