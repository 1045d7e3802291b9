use thiserror::Error;

use crate::client::BackendError;

#[derive(Error, Debug)]
pub enum EdiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Locale error: {0}")]
    Locale(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, EdiError>;
