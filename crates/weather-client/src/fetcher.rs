//! Rate-limited retrieval of precipitation for many sample coordinates.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use metrics::{counter, histogram};
use rain_common::{Coordinate, ForecastBucket, SamplePoint};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::{info, instrument, warn};

use crate::{FetchConfig, PrecipitationSource};

/// Enforces a minimum delay between request starts.
#[derive(Debug)]
pub struct RequestPacer {
    spacing: Duration,
    next_start: Mutex<Option<Instant>>,
}

impl RequestPacer {
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            next_start: Mutex::new(None),
        }
    }

    /// Wait for this request's slot.
    ///
    /// The lock is held while sleeping so slots are handed out in call order.
    pub async fn wait(&self) {
        if self.spacing.is_zero() {
            return;
        }

        let mut next_start = self.next_start.lock().await;
        let now = Instant::now();
        let start = match *next_start {
            Some(slot) if slot > now => {
                sleep_until(slot).await;
                slot
            }
            _ => now,
        };
        *next_start = Some(start + self.spacing);
    }
}

/// Counts for one fetch pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSummary {
    pub requested: usize,
    pub succeeded: usize,
    /// Points whose fetch failed and were recorded as 0 mm.
    pub failed: usize,
}

impl FetchSummary {
    pub fn all_failed(&self) -> bool {
        self.requested > 0 && self.failed == self.requested
    }
}

/// Completed sample points and the summary of how they were obtained.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// One sample per requested coordinate, in request order.
    pub samples: Vec<SamplePoint>,
    pub summary: FetchSummary,
}

/// Fetches precipitation for sample coordinates through a source, with
/// bounded concurrency and request spacing.
pub struct PointFetcher {
    source: Arc<dyn PrecipitationSource>,
    pacer: RequestPacer,
    max_concurrency: usize,
}

impl PointFetcher {
    pub fn new(source: Arc<dyn PrecipitationSource>, config: &FetchConfig) -> Self {
        Self {
            source,
            pacer: RequestPacer::new(config.request_spacing()),
            max_concurrency: config.max_concurrency.max(1),
        }
    }

    pub fn source(&self) -> &Arc<dyn PrecipitationSource> {
        &self.source
    }

    /// Fetch precipitation for every coordinate.
    ///
    /// A point whose request fails is logged and recorded as 0 mm; this never
    /// fails as a whole.
    #[instrument(skip(self, coordinates), fields(source = self.source.name(), points = coordinates.len()))]
    pub async fn fetch_samples(&self, coordinates: &[Coordinate]) -> FetchOutcome {
        let started = Instant::now();

        let results: Vec<_> = stream::iter(coordinates.iter().copied())
            .map(|coordinate| async move {
                self.pacer.wait().await;
                let result = self
                    .source
                    .fetch_precipitation(coordinate.lat, coordinate.lon)
                    .await;
                (coordinate, result)
            })
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let mut summary = FetchSummary {
            requested: coordinates.len(),
            ..Default::default()
        };

        let samples = results
            .into_iter()
            .map(|(coordinate, result)| match result {
                Ok(point) => {
                    summary.succeeded += 1;
                    SamplePoint::at(coordinate, point.precipitation_mm)
                }
                Err(e) => {
                    summary.failed += 1;
                    counter!("rain_volume_point_fetch_failures_total").increment(1);
                    warn!(
                        lat = coordinate.lat,
                        lon = coordinate.lon,
                        error = %e,
                        "Point fetch failed, using 0 mm"
                    );
                    SamplePoint::at(coordinate, 0.0)
                }
            })
            .collect();

        let elapsed = started.elapsed();
        counter!("rain_volume_point_fetches_total").increment(summary.requested as u64);
        histogram!("rain_volume_fetch_duration_seconds").record(elapsed.as_secs_f64());

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            elapsed_ms = elapsed.as_millis() as u64,
            "Fetched sample precipitation"
        );

        FetchOutcome { samples, summary }
    }

    /// Fetch the forecast at a single point, or `None` if it fails.
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn fetch_forecast(&self, lat: f64, lon: f64, limit: usize) -> Option<Vec<ForecastBucket>> {
        self.pacer.wait().await;
        match self.source.fetch_forecast(lat, lon).await {
            Ok(mut buckets) => {
                buckets.truncate(limit);
                Some(buckets)
            }
            Err(e) => {
                counter!("rain_volume_forecast_fetch_failures_total").increment(1);
                warn!(error = %e, "Forecast fetch failed, skipping projection");
                None
            }
        }
    }
}
