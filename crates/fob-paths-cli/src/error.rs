//! Error type for fob-paths commands.

use fob_plugin_tsconfig_paths::PathsError;
use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    /// The tsconfig could not be loaded
    #[error(transparent)]
    #[diagnostic(transparent)]
    Paths(#[from] PathsError),

    /// The working directory or importer path could not be determined
    #[error("I/O error: {0}")]
    #[diagnostic(code(fob::paths::io))]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(fob::paths::json))]
    Json(#[from] serde_json::Error),
}
