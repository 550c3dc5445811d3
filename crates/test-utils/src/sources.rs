//! Scripted precipitation sources for tests that must not touch the network.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use rain_common::{ForecastBucket, FORECAST_BUCKET_HOURS};
use weather_client::{FetchError, FetchResult, PointPrecipitation, PrecipitationSource};

type Field = Box<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// A [`PrecipitationSource`] answering from a closure.
///
/// Individual calls can be made to fail by their order of arrival, and every
/// call is recorded so tests can check what was asked.
pub struct ScriptedSource {
    field: Field,
    failing_calls: HashSet<usize>,
    forecast: Option<Vec<f64>>,
    calls: AtomicUsize,
    forecast_calls: AtomicUsize,
    requested: Mutex<Vec<(f64, f64)>>,
}

impl ScriptedSource {
    /// Same depth everywhere.
    pub fn uniform(mm: f64) -> Self {
        Self::with_field(move |_, _| mm)
    }

    /// Depth given by `field(lat, lon)`.
    pub fn with_field(field: impl Fn(f64, f64) -> f64 + Send + Sync + 'static) -> Self {
        Self {
            field: Box::new(field),
            failing_calls: HashSet::new(),
            forecast: None,
            calls: AtomicUsize::new(0),
            forecast_calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Fail the calls with these zero-based indices.
    pub fn failing_calls(mut self, calls: impl IntoIterator<Item = usize>) -> Self {
        self.failing_calls = calls.into_iter().collect();
        self
    }

    /// Serve a forecast with these per-bucket depths; without one the
    /// forecast request fails.
    pub fn with_forecast(mut self, depths: &[f64]) -> Self {
        self.forecast = Some(depths.to_vec());
        self
    }

    /// Number of point requests received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn forecast_calls(&self) -> usize {
        self.forecast_calls.load(Ordering::SeqCst)
    }

    /// (lat, lon) of every point request, in arrival order.
    pub fn requested(&self) -> Vec<(f64, f64)> {
        self.requested.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

/// First bucket of every scripted forecast: 2024-05-01T00:00:00Z.
pub fn forecast_start() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
}

#[async_trait]
impl PrecipitationSource for ScriptedSource {
    async fn fetch_precipitation(&self, lat: f64, lon: f64) -> FetchResult<PointPrecipitation> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requested) = self.requested.lock() {
            requested.push((lat, lon));
        }

        if self.failing_calls.contains(&call) {
            return Err(FetchError::Status {
                status: 503,
                message: format!("scripted failure for call {}", call),
            });
        }

        Ok(PointPrecipitation::new((self.field)(lat, lon)))
    }

    async fn fetch_forecast(&self, _lat: f64, _lon: f64) -> FetchResult<Vec<ForecastBucket>> {
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);
        let depths = self.forecast.as_ref().ok_or_else(|| FetchError::Status {
            status: 500,
            message: "scripted forecast unavailable".to_string(),
        })?;

        Ok(depths
            .iter()
            .enumerate()
            .map(|(i, &mm)| {
                let offset = Duration::hours(FORECAST_BUCKET_HOURS * i as i64);
                ForecastBucket::new(forecast_start() + offset, mm)
            })
            .collect())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_failures_by_call_order() {
        tokio_test::block_on(async {
            let source = ScriptedSource::uniform(4.0).failing_calls([1]);
            assert!(source.fetch_precipitation(0.0, 0.0).await.is_ok());
            assert!(source.fetch_precipitation(0.0, 1.0).await.is_err());
            assert_eq!(
                source.fetch_precipitation(0.0, 2.0).await.unwrap().precipitation_mm,
                4.0
            );
            assert_eq!(source.calls(), 3);
            assert_eq!(source.requested()[1], (0.0, 1.0));
        });
    }

    #[test]
    fn test_forecast_missing_fails() {
        tokio_test::block_on(async {
            let source = ScriptedSource::uniform(0.0);
            assert!(source.fetch_forecast(0.0, 0.0).await.is_err());

            let source = source.with_forecast(&[1.0, 2.0]);
            let buckets = source.fetch_forecast(0.0, 0.0).await.unwrap();
            assert_eq!(buckets.len(), 2);
            assert_eq!(
                buckets[1].timestamp,
                forecast_start() + Duration::hours(FORECAST_BUCKET_HOURS)
            );
        });
    }
}
