use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for version-upper operations
#[derive(Error, Debug)]
pub enum VersionUpperError {
    #[error("Version parsing error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    ConfigFormat(String),

    #[error("Invalid state: {0}")]
    State(String),

    #[error("Unsupported bump kind: {0}")]
    UnsupportedKind(String),

    #[error("Could not open file {}: {source}", path.display())]
    ConfigAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in version-upper
pub type Result<T> = std::result::Result<T, VersionUpperError>;

impl VersionUpperError {
    /// Create a version parsing error with context
    pub fn parse(msg: impl Into<String>) -> Self {
        VersionUpperError::Parse(msg.into())
    }

    /// Create a configuration format error with context
    pub fn config_format(msg: impl Into<String>) -> Self {
        VersionUpperError::ConfigFormat(msg.into())
    }

    /// Create a state error with context
    pub fn state(msg: impl Into<String>) -> Self {
        VersionUpperError::State(msg.into())
    }

    /// Create an unsupported-kind error with context
    pub fn unsupported_kind(msg: impl Into<String>) -> Self {
        VersionUpperError::UnsupportedKind(msg.into())
    }

    /// Wrap an I/O failure on a target file
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VersionUpperError::FileAccess {
            path: path.into(),
            source,
        }
    }
}
