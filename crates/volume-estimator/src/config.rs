//! Configuration for the volume estimator.

use rain_common::KM_PER_DEGREE;
use serde::{Deserialize, Serialize};

/// Numerical parameters for sampling, interpolation and integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Kilometers per degree when converting resolutions to lattice steps.
    pub km_per_degree: f64,

    /// The integration mesh is this many times finer than the sampling lattice.
    pub integration_subdivisions: u32,

    /// Number of nearest samples blended by IDW.
    pub idw_neighbours: usize,

    /// Added to the squared distance before inverting (degrees²).
    pub idw_epsilon: f64,

    /// Below this distance (degrees) the nearest sample is returned as-is.
    pub idw_snap_distance: f64,

    /// Smallest sampling resolution tried before giving up, in km.
    pub min_resolution_km: f64,

    /// Largest polygon area accepted, in km².
    pub max_area_km2: f64,

    /// Upper bound on sampling lattice points and on integration mesh cells.
    pub max_lattice_points: usize,

    /// Integrate mesh rows on the rayon thread pool.
    pub parallel: bool,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            km_per_degree: KM_PER_DEGREE,
            integration_subdivisions: 4,
            idw_neighbours: 4,
            idw_epsilon: 1e-4,
            idw_snap_distance: 1e-4,
            min_resolution_km: 1.0,
            max_area_km2: 20_000.0,
            max_lattice_points: 10_000_000,
            parallel: true,
        }
    }
}

impl EstimatorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("RAIN_INTEGRATION_SUBDIVISIONS") {
            if let Ok(n) = val.parse() {
                config.integration_subdivisions = n;
            }
        }

        if let Ok(val) = std::env::var("RAIN_IDW_NEIGHBOURS") {
            if let Ok(n) = val.parse() {
                config.idw_neighbours = n;
            }
        }

        if let Ok(val) = std::env::var("RAIN_MAX_AREA_KM2") {
            if let Ok(area) = val.parse() {
                config.max_area_km2 = area;
            }
        }

        if let Ok(val) = std::env::var("RAIN_MAX_LATTICE_POINTS") {
            if let Ok(n) = val.parse() {
                config.max_lattice_points = n;
            }
        }

        if let Ok(val) = std::env::var("RAIN_PARALLEL") {
            config.parallel = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !is_positive(self.km_per_degree) {
            return Err("km_per_degree must be finite and > 0".to_string());
        }

        if self.integration_subdivisions == 0 {
            return Err("integration_subdivisions must be > 0".to_string());
        }

        if self.idw_neighbours == 0 {
            return Err("idw_neighbours must be > 0".to_string());
        }

        if !is_positive(self.idw_epsilon) {
            return Err("idw_epsilon must be finite and > 0".to_string());
        }

        if !(self.idw_snap_distance.is_finite() && self.idw_snap_distance >= 0.0) {
            return Err("idw_snap_distance must be finite and >= 0".to_string());
        }

        if !is_positive(self.min_resolution_km) {
            return Err("min_resolution_km must be finite and > 0".to_string());
        }

        if !is_positive(self.max_area_km2) {
            return Err("max_area_km2 must be finite and > 0".to_string());
        }

        if self.max_lattice_points == 0 {
            return Err("max_lattice_points must be > 0".to_string());
        }

        Ok(())
    }

    /// Integration mesh resolution for a given sampling resolution.
    pub fn integration_resolution_km(&self, sampling_resolution_km: f64) -> f64 {
        sampling_resolution_km / self.integration_subdivisions as f64
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
