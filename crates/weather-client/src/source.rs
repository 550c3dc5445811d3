//! The precipitation source abstraction.

use async_trait::async_trait;
use rain_common::ForecastBucket;
use serde::{Deserialize, Serialize};

use crate::FetchResult;

/// Current conditions at a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointPrecipitation {
    /// Precipitation depth in mm, liquid equivalent.
    pub precipitation_mm: f64,
    pub description: Option<String>,
    pub temperature_c: Option<f64>,
}

impl PointPrecipitation {
    pub fn new(precipitation_mm: f64) -> Self {
        Self {
            precipitation_mm: precipitation_mm.max(0.0),
            description: None,
            temperature_c: None,
        }
    }
}

/// Trait for services that report precipitation at a coordinate.
#[async_trait]
pub trait PrecipitationSource: Send + Sync {
    /// Current precipitation at (lat, lon).
    async fn fetch_precipitation(&self, lat: f64, lon: f64) -> FetchResult<PointPrecipitation>;

    /// 3-hourly precipitation forecast at (lat, lon), oldest bucket first.
    async fn fetch_forecast(&self, lat: f64, lon: f64) -> FetchResult<Vec<ForecastBucket>>;

    /// Name used in logs.
    fn name(&self) -> &str;
}
