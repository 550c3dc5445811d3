//! Forecast precipitation buckets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Span covered by one forecast bucket.
pub const FORECAST_BUCKET_HOURS: i64 = 3;

/// Precipitation expected during one 3-hour forecast span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBucket {
    /// Start of the span.
    pub timestamp: DateTime<Utc>,
    /// Expected depth over the span, in millimeters.
    pub precipitation_mm: f64,
}

impl ForecastBucket {
    pub fn new(timestamp: DateTime<Utc>, precipitation_mm: f64) -> Self {
        Self {
            timestamp,
            precipitation_mm: precipitation_mm.max(0.0),
        }
    }
}
