//! Areal precipitation volume estimation.
//!
//! Turns a polygon and a handful of point measurements into a volume of
//! water:
//!
//! ```text
//! Polygon
//!    │
//!    ▼
//! GridSampler::sample(polygon, resolution)   lattice points inside the ring,
//!    │                                       halving the spacing until one fits
//!    ▼
//! (caller fetches precipitation per point)
//!    │
//!    ▼
//! estimate_volume(samples, polygon, resolution)
//!    ├─► finer mesh at resolution / 4
//!    ├─► keep cells whose center is inside the ring
//!    ├─► IDW depth at each cell center
//!    └─► Σ cell area × depth
//! ```
//!
//! # Example
//!
//! ```ignore
//! use volume_estimator::{estimate_volume, select_resolution, EstimatorConfig, GridSampler};
//!
//! let config = EstimatorConfig::default();
//! let resolution = select_resolution(polygon.area_m2(), &config)?;
//! let grid = GridSampler::new(config.clone()).sample(&polygon, resolution)?;
//! let samples = fetch(&grid.coordinates).await;
//! let result = estimate_volume(&samples, &polygon, grid.effective_resolution_km, &config)?;
//! ```

pub mod config;
pub mod forecast;
pub mod integrate;
pub mod interpolation;
pub mod resolution;
pub mod sampler;
pub mod types;

pub use config::EstimatorConfig;
pub use forecast::{project_forecast_volumes, total_forecast_volume, ForecastVolume};
pub use integrate::{estimate_volume, IntegrationCell, IntegrationMesh};
pub use interpolation::{planar_distance, IdwInterpolator};
pub use resolution::{ensure_area_within_limit, select_resolution};
pub use sampler::{GridSampler, Lattice, SampleGrid};
pub use types::{SampleStats, VolumeResult};
