use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Library-wide error type for mailforge operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Template expansion failed (syntax error, unresolved include).
    #[error("Template error in '{template}': {reason}")]
    Template { template: String, reason: String },

    /// MJML compilation failed.
    #[error("Markup error in '{template}': {reason}")]
    Markup { template: String, reason: String },

    /// Locale file could not be parsed.
    #[error("Malformed locale file '{path}': {reason}")]
    MalformedLocale { path: PathBuf, reason: String },

    /// A path produced by file enumeration is not valid unicode.
    #[error("Path contains invalid unicode: {0}")]
    InvalidPath(PathBuf),

    /// File watcher setup or delivery failure.
    #[error("Watch error: {0}")]
    Watch(String),

    /// Dev server failed to bind or serve.
    #[error("Server error: {0}")]
    Server(String),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }
}
