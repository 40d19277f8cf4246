//! CLI-level errors (wraps tree and settings errors)

use thiserror::Error;

use crate::errors::{SettingsError, TreeError};

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("{0}")]
    Settings(#[from] SettingsError),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Tree(TreeError::InvalidAddress(_)) => crate::exitcode::USAGE,
            CliError::Tree(_) => crate::exitcode::DATAERR,
            CliError::Settings(_) => crate::exitcode::CONFIG,
        }
    }
}
