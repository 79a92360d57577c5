//! Error types for SavvyBee

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The upstream service answered, but not with something usable
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl Error {
    /// Whether this error came from talking to an upstream service
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Upstream(_) | Error::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
