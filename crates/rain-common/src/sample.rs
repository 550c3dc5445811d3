//! Sample coordinates and measured sample points.

use serde::{Deserialize, Serialize};

/// A lon/lat coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// A sample coordinate completed with its precipitation depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub lat: f64,
    pub lon: f64,
    /// Precipitation depth in millimeters, never negative.
    pub precipitation_mm: f64,
}

impl SamplePoint {
    /// Create a sample point. Negative or NaN depths are stored as 0.
    pub fn new(lat: f64, lon: f64, precipitation_mm: f64) -> Self {
        Self {
            lat,
            lon,
            precipitation_mm: precipitation_mm.max(0.0),
        }
    }

    /// Complete a sampled coordinate with a measured depth.
    pub fn at(coordinate: Coordinate, precipitation_mm: f64) -> Self {
        Self::new(coordinate.lat, coordinate.lon, precipitation_mm)
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lon, self.lat)
    }

    /// Copy of this sample with its depth multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.lat, self.lon, self.precipitation_mm * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_and_nan_depths_clamp_to_zero() {
        assert_eq!(SamplePoint::new(0.0, 0.0, -3.0).precipitation_mm, 0.0);
        assert_eq!(SamplePoint::new(0.0, 0.0, f64::NAN).precipitation_mm, 0.0);
        assert_eq!(SamplePoint::new(0.0, 0.0, 2.5).precipitation_mm, 2.5);
    }

    #[test]
    fn test_at_keeps_coordinate() {
        let point = SamplePoint::at(Coordinate::new(-74.0, 40.7), 1.0);
        assert_eq!(point.lon, -74.0);
        assert_eq!(point.lat, 40.7);
        assert_eq!(point.coordinate(), Coordinate::new(-74.0, 40.7));
    }
}
