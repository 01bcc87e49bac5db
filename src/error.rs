//! Error types.
//!
//! Only the fallible edges of the crate return these: level parsing,
//! configuration and the file sink's internal writes. The emit path never
//! surfaces them to callers.

use thiserror::Error;

/// Errors raised while parsing configuration or writing to a sink.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("unknown log level: {0}")]
    UnknownLevel(String),

    #[error("invalid size {0:?}: expected bytes or a number followed by k, m or g")]
    InvalidSize(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file appender error: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LogError>;
