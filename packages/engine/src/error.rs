//! Error types for the tagwalk engine
//!
//! The walker itself never fails. Every error a transform call can return
//! originates either in a user-supplied transform function or hook, or in
//! the document/registry loading helpers around the core.

use thiserror::Error;

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failure reported by a transform function or hook
    #[error("{0}")]
    Failed(String),

    /// Arbitrary error raised by a transform function or hook
    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),

    /// Registry document has the wrong shape
    #[error("Invalid registry: {0}")]
    InvalidRegistry(String),

    /// Failed to load a document
    #[error("Failed to load document: {0}")]
    LoadError(String),

    /// Opaque host value reached a serializer
    #[error("Cannot serialize opaque value of type {0}")]
    OpaqueValue(&'static str),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl EngineError {
    /// Shorthand for a plain-message failure from user code.
    pub fn failed(message: impl Into<String>) -> Self {
        EngineError::Failed(message.into())
    }

    /// Wrap any error raised inside a transform function or hook.
    pub fn custom<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        EngineError::Custom(Box::new(err))
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
