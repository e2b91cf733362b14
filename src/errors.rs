use thiserror::Error;

/// failures at the edges of the engine; simplifying a parsed report never fails
#[derive(Error, Debug)]
pub enum AgingError {
    #[error("invalid report document: {message}")]
    InvalidDocument {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid date: {value}")]
    InvalidDate {
        value: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AgingError>;
