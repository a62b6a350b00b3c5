//! Error types for config loading

use std::path::PathBuf;
use thiserror::Error;

/// Result type for config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, converting or querying config
#[derive(Error, Debug)]
pub enum Error {
    /// Empty path given to the loader
    #[error("config file path is required")]
    MissingPath,

    /// Path does not reference an existing file
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Script failed to parse or run
    #[error("failed to execute lua config: {0}")]
    Execution(#[source] mlua::Error),

    /// Value cannot cross the host/script boundary
    #[error("cannot convert {kind} value: {reason}")]
    Conversion { kind: String, reason: String },

    /// Lua error outside script execution
    #[error("Lua error: {0}")]
    Lua(#[from] mlua::Error),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Key not found in the registry
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Type conversion error
    #[error("Type error: expected {expected}, got {actual}")]
    TypeError { expected: String, actual: String },

    /// Invalid value
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Typed decoding of config values failed
    #[error("failed to decode config: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn conversion(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Conversion {
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}
