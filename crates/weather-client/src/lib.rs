//! Point precipitation retrieval.
//!
//! A [`PrecipitationSource`] answers "how much is it raining here?" for one
//! coordinate. The [`PointFetcher`] drives a source over every sample
//! coordinate of a polygon, keeping request starts spaced out and failures
//! isolated to the point that produced them.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod openweathermap;
pub mod source;

pub use config::FetchConfig;
pub use error::{FetchError, FetchResult};
pub use fetcher::{FetchOutcome, FetchSummary, PointFetcher, RequestPacer};
pub use openweathermap::OpenWeatherMapSource;
pub use source::{PointPrecipitation, PrecipitationSource};
