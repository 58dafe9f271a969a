//! Error types for tsconfig `paths` loading

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PathsError>;

/// Fatal errors: without a readable configuration there are no rules to apply.
///
/// Malformed individual aliases are not errors; see [`crate::Rejection`].
#[derive(Error, Debug, Diagnostic)]
pub enum PathsError {
    /// The tsconfig file could not be read
    #[error("Failed to read tsconfig {}: {source}", .path.display())]
    #[diagnostic(
        code(fob::tsconfig_paths::read_config),
        help("Check the path, or point TS_NODE_PROJECT at the right tsconfig")
    )]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tsconfig file is not valid JSON (comments and trailing commas are allowed)
    #[error("Failed to parse tsconfig {}: {message}", .path.display())]
    #[diagnostic(code(fob::tsconfig_paths::parse_config))]
    ParseConfig { path: PathBuf, message: String },

    /// `compilerOptions.paths` is not a map of string arrays
    #[error("Invalid compilerOptions.paths in {}: {reason}", .path.display())]
    #[diagnostic(
        code(fob::tsconfig_paths::invalid_paths),
        help("`paths` must map each pattern to an array of strings, e.g. {{ \"@app/*\": [\"src/*\"] }}")
    )]
    InvalidPaths { path: PathBuf, reason: String },

    /// A config named in `extends` could not be found
    #[error("Cannot find base config '{specifier}' extended from {}", .from.display())]
    #[diagnostic(code(fob::tsconfig_paths::extends_not_found))]
    ExtendsNotFound { specifier: String, from: PathBuf },

    /// The `extends` chain loops back on itself
    #[error("Circular `extends` chain at {}", .path.display())]
    #[diagnostic(code(fob::tsconfig_paths::circular_extends))]
    CircularExtends { path: PathBuf },

    /// Plugin options could not be assembled from their sources
    #[error("Invalid plugin options: {0}")]
    #[diagnostic(code(fob::tsconfig_paths::invalid_options))]
    InvalidOptions(String),
}

impl PathsError {
    pub fn read_config(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadConfig {
            path: path.into(),
            source,
        }
    }

    pub fn parse_config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ParseConfig {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_paths(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidPaths {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
