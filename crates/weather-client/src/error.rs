//! Error types for precipitation fetching.

use thiserror::Error;

/// Errors raised while querying a precipitation source.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Weather API key is not configured (set OPENWEATHERMAP_API_KEY)")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Weather API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode weather response: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Result type for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
