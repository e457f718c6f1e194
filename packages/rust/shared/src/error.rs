//! Error types for ariacrawl.
//!
//! Library crates use [`AriaCrawlError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all ariacrawl operations.
#[derive(Debug, thiserror::Error)]
pub enum AriaCrawlError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while fetching a source document.
    #[error("network error: {0}")]
    Network(String),

    /// A structurally required element or attribute is missing.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A CSS selector could not be compiled.
    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    /// Response cache miss or corrupt cache entry.
    #[error("cache error: {0}")]
    Cache(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON encoding/decoding error.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AriaCrawlError>;

impl AriaCrawlError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a selector error for `selector`.
    pub fn selector(selector: impl Into<String>, msg: impl std::fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: msg.to_string(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
