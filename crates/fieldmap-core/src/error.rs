//! Error types for the fieldmap core library
//!
//! Only two failure modes cross the public surface: configuration problems detected while a
//! mapper is being built or loaded, and validator rejections raised by the payload builders.
//! Everything else (missing fields, unexpected shapes) degrades per field instead of failing.

use thiserror::Error;

/// Main error type for fieldmap operations
#[derive(Error, Debug)]
pub enum Error {
    /// Mapper configuration is missing, empty or malformed
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A caller-supplied validator rejected the payload input
    #[error("Validation failed: {}", messages.join("; "))]
    Validation {
        messages: Vec<String>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a configuration error without an underlying cause
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Validator messages carried by a [`Error::Validation`], empty for other variants
    pub fn validation_messages(&self) -> &[String] {
        match self {
            Error::Validation { messages } => messages,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}
