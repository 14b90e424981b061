//! Error types for the mathnode-latex library.

use thiserror::Error;

/// Result type alias for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that occur while decoding upstream JSON into node trees.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

/// Errors that occur while rendering a node tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Malformed `{tag}` node: expected at least {expected} children, found {found}")]
    MalformedNode {
        tag: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Node `{tag}` has no value")]
    MissingValue { tag: &'static str },

    #[error("Repeat length {length} exceeds fractional width {width}")]
    InvalidPeriodicLength { length: usize, width: usize },

    #[error("Invalid literal for `{tag}`: {value}")]
    InvalidLiteral { tag: &'static str, value: String },

    #[error("Expression nesting exceeds {limit} levels")]
    DepthExceeded { limit: usize },
}

/// Errors in renderer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(String),
}
