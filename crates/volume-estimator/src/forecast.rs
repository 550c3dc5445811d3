//! Forecast volume projection.

use chrono::{DateTime, Utc};
use rain_common::ForecastBucket;
use serde::{Deserialize, Serialize};

/// Volume expected over the polygon during one forecast bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastVolume {
    pub timestamp: DateTime<Utc>,
    pub precipitation_mm: f64,
    pub volume_m3: f64,
}

/// Project each bucket's depth over a fixed area: `area × mm / 1000`.
pub fn project_forecast_volumes(area_m2: f64, buckets: &[ForecastBucket]) -> Vec<ForecastVolume> {
    buckets
        .iter()
        .map(|bucket| ForecastVolume {
            timestamp: bucket.timestamp,
            precipitation_mm: bucket.precipitation_mm,
            volume_m3: area_m2 * bucket.precipitation_mm / 1_000.0,
        })
        .collect()
}

/// Sum of the projected volumes.
pub fn total_forecast_volume(projection: &[ForecastVolume]) -> f64 {
    projection.iter().map(|v| v.volume_m3).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rain_common::FORECAST_BUCKET_HOURS;

    fn buckets(depths: &[f64]) -> Vec<ForecastBucket> {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        depths
            .iter()
            .enumerate()
            .map(|(i, &mm)| {
                let offset = Duration::hours(FORECAST_BUCKET_HOURS * i as i64);
                ForecastBucket::new(start + offset, mm)
            })
            .collect()
    }

    #[test]
    fn test_projection_per_bucket() {
        let projection = project_forecast_volumes(1_000_000.0, &buckets(&[0.0, 5.0, 2.0]));
        let volumes: Vec<f64> = projection.iter().map(|v| v.volume_m3).collect();
        assert_eq!(volumes, vec![0.0, 5_000.0, 2_000.0]);
        assert_eq!(total_forecast_volume(&projection), 7_000.0);
    }

    #[test]
    fn test_projection_keeps_timestamps_in_order() {
        let input = buckets(&[1.0, 1.0, 1.0]);
        let projection = project_forecast_volumes(10.0, &input);
        for (bucket, volume) in input.iter().zip(&projection) {
            assert_eq!(bucket.timestamp, volume.timestamp);
        }
    }

    #[test]
    fn test_empty_forecast() {
        assert!(project_forecast_volumes(1_000.0, &[]).is_empty());
        assert_eq!(total_forecast_volume(&[]), 0.0);
    }
}
