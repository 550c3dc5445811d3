//! Error types for rain volume estimation.

use thiserror::Error;

/// Result type alias using RainError.
pub type RainResult<T> = Result<T, RainError>;

/// Fatal errors raised by geometry, sampling and estimation.
///
/// Per-point fetch failures are not represented here: they are absorbed by
/// the fetcher and never reach the caller.
#[derive(Debug, Error, PartialEq)]
pub enum RainError {
    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("Invalid resolution: {0} km (must be a positive, finite number)")]
    InvalidResolution(f64),

    #[error("Area too large: {area_km2:.2} km² exceeds limit of {limit_km2:.2} km²")]
    AreaTooLarge { area_km2: f64, limit_km2: f64 },

    #[error("No sample points fall inside the polygon, even at {min_resolution_km} km resolution")]
    InsufficientSampleArea { min_resolution_km: f64 },

    #[error("No sample points were supplied for estimation")]
    NoSamplePoints,
}

impl RainError {
    /// Create an InvalidPolygon error.
    pub fn invalid_polygon(msg: impl Into<String>) -> Self {
        Self::InvalidPolygon(msg.into())
    }

    /// Whether the error was caused by the caller's input rather than the data.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RainError::InvalidPolygon(_)
                | RainError::InvalidResolution(_)
                | RainError::AreaTooLarge { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_too_large_message() {
        let err = RainError::AreaTooLarge {
            area_km2: 20000.5,
            limit_km2: 20000.0,
        };
        assert_eq!(
            err.to_string(),
            "Area too large: 20000.50 km² exceeds limit of 20000.00 km²"
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn test_sampling_errors_are_not_input_errors() {
        let err = RainError::InsufficientSampleArea {
            min_resolution_km: 1.0,
        };
        assert!(!err.is_input_error());
        assert!(!RainError::NoSamplePoints.is_input_error());
    }
}
