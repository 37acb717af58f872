//! Error types for fetching, parsing and exporting protein data
//!
//! The annotation core itself never fails; everything that touches the
//! network, the file system or a text format reports through [`MosaicError`].

use thiserror::Error;

/// Errors raised by the layers around the structure annotator
#[derive(Error, Debug)]
pub enum MosaicError {
    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level HTTP failure (DNS, TLS, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status code
    #[error("Request to {url} failed with status {status}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// No remote source had the requested record
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed PDB ID or compound identifier
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// pdbtbx could not build a structure from the input text
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON (de)serialisation failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be deserialised
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// A required field is absent from a remote record
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// File watcher could not be set up
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    /// Lua runtime failure surfaced outside the script engine
    #[error("Script error: {0}")]
    Script(String),
}

impl MosaicError {
    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        MosaicError::Parse(message.into())
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(identifier: impl Into<String>) -> Self {
        MosaicError::InvalidIdentifier(identifier.into())
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        MosaicError::MissingField(field.into())
    }
}

/// Result type used across the crate
pub type MosaicResult<T> = Result<T, MosaicError>;
