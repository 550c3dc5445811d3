//! Tests for the point fetcher against a scripted source.

use std::sync::Arc;
use std::time::Duration;

use rain_common::Coordinate;
use test_utils::ScriptedSource;
use tokio::time::Instant;
use weather_client::{FetchConfig, FetchSummary, PointFetcher, PrecipitationSource};

fn coordinates(n: usize) -> Vec<Coordinate> {
    (0..n)
        .map(|i| Coordinate::new(-74.0 + i as f64 * 0.01, 40.7))
        .collect()
}

fn unpaced(max_concurrency: usize) -> FetchConfig {
    FetchConfig {
        request_spacing_ms: 0,
        max_concurrency,
        ..Default::default()
    }
}

// ============================================================================
// Sample fetching
// ============================================================================

#[tokio::test]
async fn test_samples_follow_request_order() {
    let source = Arc::new(ScriptedSource::with_field(|_lat, lon| (lon + 74.0) * 100.0));
    let fetcher = PointFetcher::new(source.clone(), &unpaced(4));
    let coords = coordinates(6);

    let outcome = fetcher.fetch_samples(&coords).await;

    assert_eq!(outcome.samples.len(), 6);
    for (sample, coord) in outcome.samples.iter().zip(&coords) {
        assert_eq!(sample.coordinate(), *coord);
        assert!((sample.precipitation_mm - (coord.lon + 74.0) * 100.0).abs() < 1e-9);
    }
    assert_eq!(
        outcome.summary,
        FetchSummary {
            requested: 6,
            succeeded: 6,
            failed: 0
        }
    );
    assert_eq!(source.calls(), 6);
}

#[tokio::test]
async fn test_failed_points_become_dry() {
    let source = Arc::new(ScriptedSource::uniform(3.0).failing_calls([0, 2]));
    let fetcher = PointFetcher::new(source, &unpaced(1));

    let outcome = fetcher.fetch_samples(&coordinates(4)).await;

    let depths: Vec<f64> = outcome.samples.iter().map(|s| s.precipitation_mm).collect();
    assert_eq!(depths, vec![0.0, 3.0, 0.0, 3.0]);
    assert_eq!(outcome.summary.failed, 2);
    assert_eq!(outcome.summary.succeeded, 2);
    assert!(!outcome.summary.all_failed());
}

#[tokio::test]
async fn test_every_point_failing_still_completes() {
    let source = Arc::new(ScriptedSource::uniform(3.0).failing_calls(0..3));
    let fetcher = PointFetcher::new(source, &unpaced(2));

    let outcome = fetcher.fetch_samples(&coordinates(3)).await;

    assert!(outcome.summary.all_failed());
    assert!(outcome.samples.iter().all(|s| s.precipitation_mm == 0.0));
}

#[tokio::test]
async fn test_sequential_by_default() {
    let source = Arc::new(ScriptedSource::uniform(1.0));
    let fetcher = PointFetcher::new(source.clone(), &unpaced(1));
    let coords = coordinates(5);

    fetcher.fetch_samples(&coords).await;

    let expected: Vec<(f64, f64)> = coords.iter().map(|c| (c.lat, c.lon)).collect();
    assert_eq!(source.requested(), expected);
}

// ============================================================================
// Pacing
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_requests_are_spaced() {
    let source = Arc::new(ScriptedSource::uniform(1.0));
    let fetcher = PointFetcher::new(source, &FetchConfig::default());

    let started = Instant::now();
    fetcher.fetch_samples(&coordinates(5)).await;

    assert!(started.elapsed() >= Duration::from_millis(400));
}

#[tokio::test(start_paused = true)]
async fn test_spacing_applies_across_concurrent_requests() {
    let source = Arc::new(ScriptedSource::uniform(1.0));
    let config = FetchConfig {
        max_concurrency: 4,
        request_spacing_ms: 50,
        ..Default::default()
    };
    let fetcher = PointFetcher::new(source, &config);

    let started = Instant::now();
    fetcher.fetch_samples(&coordinates(8)).await;

    assert!(started.elapsed() >= Duration::from_millis(350));
}

// ============================================================================
// Forecast
// ============================================================================

#[tokio::test]
async fn test_forecast_truncated_to_limit() {
    let depths: Vec<f64> = (0..40).map(|i| i as f64).collect();
    let source = Arc::new(ScriptedSource::uniform(0.0).with_forecast(&depths));
    let fetcher = PointFetcher::new(source.clone(), &unpaced(1));

    let buckets = fetcher.fetch_forecast(40.7, -74.0, 16).await.unwrap();

    assert_eq!(buckets.len(), 16);
    assert_eq!(buckets[15].precipitation_mm, 15.0);
    assert_eq!(source.forecast_calls(), 1);
}

#[tokio::test]
async fn test_forecast_failure_is_none() {
    let source = Arc::new(ScriptedSource::uniform(0.0));
    let fetcher = PointFetcher::new(source, &unpaced(1));

    assert!(fetcher.fetch_forecast(40.7, -74.0, 16).await.is_none());
    assert_eq!(fetcher.source().name(), "scripted");
}
