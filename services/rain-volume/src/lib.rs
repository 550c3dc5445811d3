//! Rain volume service.
//!
//! Wires the geometry, sampling, fetching and integration crates into a
//! single `compute_rain_volume` call:
//!
//! ```text
//! Polygon ──► plan (area limit, resolution, lattice)
//!               │
//!               ▼
//!         PointFetcher ──► PrecipitationSource (OpenWeatherMap)
//!               │
//!               ▼
//!         estimate_volume (blocking pool)
//!               │
//!               ▼
//!         forecast at bbox center ──► RainVolumeReport
//! ```

pub mod config;
pub mod error;
pub mod report;
pub mod service;

pub use config::ServiceConfig;
pub use error::{RainVolumeError, Result};
pub use report::ReportFormatter;
pub use service::{plan_sampling, RainVolumeReport, RainVolumeService, SamplingPlan};
