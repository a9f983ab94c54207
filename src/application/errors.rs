//! Application layer errors

use std::time::Duration;

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors from remote collaborators (relay, classifier, image search)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: status {status}, body: {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
