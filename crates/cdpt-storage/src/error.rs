use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage gateway returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Storage gateway request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to decode stored payload: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;
