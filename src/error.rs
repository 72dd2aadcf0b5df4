//! Error types for genta-rs

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`GentaError`]
pub type Result<T> = std::result::Result<T, GentaError>;

/// Main error type for genta-rs
#[derive(Debug, Error)]
pub enum GentaError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Endpoint config file could not be read or parsed
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Endpoint parameter violates its constraint
    #[error("Invalid endpoint parameter `{field}`: {message}")]
    Validation { field: String, message: String },

    /// Upstream API responded with a failure status
    #[error("Upstream request failed (HTTP {status}): {body}")]
    Upstream {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Response byte stream could not be decoded to text
    #[error("Stream decode error: {0}")]
    Decode(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
