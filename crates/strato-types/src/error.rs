//! Error types for the strato shell.

use std::io;

/// Errors produced by the strato shell.
#[derive(Debug, thiserror::Error)]
pub enum StratoError {
    #[error("config error: {0}")]
    Config(String),

    #[error("template error: {0}")]
    Template(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("plugin error: {0}")]
    Plugin(String),

    #[error("platform error: {0}")]
    Platform(String),

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, StratoError>;
