//! Error types for document loading.
//!
//! Covers reading files, decoding JSON or YAML, malformed OpenAPI
//! structure, and model-building failures surfaced through the
//! convenience entry points.

use thiserror::Error;

/// Errors that can occur while loading a document or building its model.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The document is not a usable OpenAPI document.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// A schema node is malformed.
    #[error("invalid schema at {path}: {message}")]
    InvalidSchema {
        /// Location of the schema node.
        path: String,
        /// What is wrong with it.
        message: String,
    },

    /// The schema tree could not be turned into a model.
    #[error("model error: {0}")]
    ModelError(#[from] service_model_core::ModelError),
}

/// Convenience alias for results with [`DocumentError`].
pub type Result<T> = std::result::Result<T, DocumentError>;
