//! Error types for the rain volume service.

use rain_common::RainError;
use thiserror::Error;
use weather_client::FetchError;

/// Errors that end a rain volume computation.
#[derive(Error, Debug)]
pub enum RainVolumeError {
    #[error(transparent)]
    Estimation(#[from] RainError),

    #[error("Weather source unavailable: {0}")]
    Source(#[from] FetchError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Estimation task failed: {0}")]
    Task(String),
}

impl RainVolumeError {
    /// Whether the caller can fix this by changing the polygon or resolution.
    pub fn is_input_error(&self) -> bool {
        matches!(self, RainVolumeError::Estimation(e) if e.is_input_error())
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, RainVolumeError>;
