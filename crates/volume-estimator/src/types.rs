//! Estimation results.

use rain_common::{RainError, RainResult, SamplePoint};
use serde::{Deserialize, Serialize};

/// Summary statistics of the sample depths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleStats {
    pub count: usize,
    pub avg_mm: f64,
    pub min_mm: f64,
    pub max_mm: f64,
}

impl SampleStats {
    /// Compute statistics over the sample points.
    pub fn from_samples(samples: &[SamplePoint]) -> RainResult<Self> {
        if samples.is_empty() {
            return Err(RainError::NoSamplePoints);
        }

        let (sum, min, max) = samples.iter().fold(
            (0.0, f64::INFINITY, f64::NEG_INFINITY),
            |(sum, min, max), s| {
                (
                    sum + s.precipitation_mm,
                    min.min(s.precipitation_mm),
                    max.max(s.precipitation_mm),
                )
            },
        );

        Ok(Self {
            count: samples.len(),
            avg_mm: sum / samples.len() as f64,
            min_mm: min,
            max_mm: max,
        })
    }
}

/// Water volume over a polygon and the figures it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeResult {
    /// Total volume in cubic meters.
    pub volume_m3: f64,
    /// Spherical polygon area in m².
    pub area_m2: f64,
    pub avg_precipitation_mm: f64,
    pub min_precipitation_mm: f64,
    pub max_precipitation_mm: f64,
    pub num_sample_points: usize,
    /// Integration cells whose center fell inside the polygon.
    pub num_integration_cells: usize,
    pub sampling_resolution_km: f64,
    pub integration_resolution_km: f64,
}

impl VolumeResult {
    pub fn volume_liters(&self) -> f64 {
        self.volume_m3 * 1_000.0
    }

    /// Volume in cubic hectometers (millions of m³).
    pub fn volume_hm3(&self) -> f64 {
        self.volume_m3 / 1_000_000.0
    }

    pub fn area_km2(&self) -> f64 {
        self.area_m2 / 1_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_over_samples() {
        let samples = vec![
            SamplePoint::new(0.0, 0.0, 0.0),
            SamplePoint::new(0.0, 1.0, 3.0),
            SamplePoint::new(1.0, 0.0, 6.0),
        ];
        let stats = SampleStats::from_samples(&samples).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.avg_mm, 3.0);
        assert_eq!(stats.min_mm, 0.0);
        assert_eq!(stats.max_mm, 6.0);
    }

    #[test]
    fn test_stats_require_samples() {
        assert_eq!(
            SampleStats::from_samples(&[]).unwrap_err(),
            RainError::NoSamplePoints
        );
    }

    #[test]
    fn test_unit_conversions() {
        let result = VolumeResult {
            volume_m3: 2_500_000.0,
            area_m2: 3_000_000.0,
            avg_precipitation_mm: 1.0,
            min_precipitation_mm: 1.0,
            max_precipitation_mm: 1.0,
            num_sample_points: 1,
            num_integration_cells: 1,
            sampling_resolution_km: 1.5,
            integration_resolution_km: 0.375,
        };
        assert_eq!(result.volume_liters(), 2_500_000_000.0);
        assert_eq!(result.volume_hm3(), 2.5);
        assert_eq!(result.area_km2(), 3.0);
    }
}
