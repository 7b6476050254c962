//! Error types for the SIAP system

use crate::types::DispositionStatus;
use thiserror::Error;

/// Main error type for all SIAP operations
#[derive(Error, Debug)]
pub enum SiapError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authorization failed: {0}")]
    Auth(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: DispositionStatus,
        to: DispositionStatus,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for SIAP operations
pub type Result<T> = std::result::Result<T, SiapError>;
