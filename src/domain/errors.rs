//! Domain error types
//!
//! This module defines the error hierarchy for tntrace. Resolution gaps are not
//! errors (they degrade to absent fields); everything here is surfaced to the caller
//! with enough context (product code, event id, path) to retry or intervene upstream.

use thiserror::Error;

/// Main tntrace error type
///
/// This is the primary error type used throughout the library.
#[derive(Debug, Error)]
pub enum TntError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid or missing mandatory input, unknown field identifiers
    #[error("Validation error: {0}")]
    Validation(String),

    /// No document strategy registered for a product code
    #[error("No document strategy registered for product code '{product_code}'")]
    DispatchNotFound { product_code: String },

    /// Two strategies declared the same product code
    #[error("Duplicate document strategy for product code '{product_code}'")]
    DuplicateStrategy { product_code: String },

    /// The record could not be encoded as a document
    #[error("Serialization error for product '{product_code}', event '{event_id}': {message}")]
    Serialization {
        product_code: String,
        event_id: String,
        message: String,
    },

    /// Filesystem failure with the offending path
    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },

    /// Collaborator service (courier, reference id, documents, events, sink) failures
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl TntError {
    /// Builds an I/O error carrying the path it happened at
    pub fn io(path: impl AsRef<std::path::Path>, err: impl std::fmt::Display) -> Self {
        TntError::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }

    /// Whether an upstream job layer may reasonably retry the invocation
    pub fn is_retryable(&self) -> bool {
        matches!(self, TntError::Io { .. } | TntError::Lookup(_))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for TntError {
    fn from(err: std::io::Error) -> Self {
        TntError::Io {
            path: String::from("<unknown>"),
            message: err.to_string(),
        }
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for TntError {
    fn from(err: serde_json::Error) -> Self {
        TntError::Validation(format!("JSON error: {err}"))
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for TntError {
    fn from(err: toml::de::Error) -> Self {
        TntError::Configuration(format!("TOML parse error: {err}"))
    }
}
