//! Common types and geometry shared across the rain-volume crates.

pub mod bbox;
pub mod error;
pub mod forecast;
pub mod geometry;
pub mod polygon;
pub mod sample;

pub use bbox::{BboxParseError, BoundingBox};
pub use error::{RainError, RainResult};
pub use forecast::{ForecastBucket, FORECAST_BUCKET_HOURS};
pub use geometry::{cell_area_m2, km_to_degrees, KM_PER_DEGREE};
pub use polygon::Polygon;
pub use sample::{Coordinate, SamplePoint};
