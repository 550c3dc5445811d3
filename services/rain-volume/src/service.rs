//! Rain volume computation pipeline.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use rain_common::{Polygon, RainError};
use serde::Serialize;
use tracing::{info, instrument};
use volume_estimator::{
    ensure_area_within_limit, estimate_volume, project_forecast_volumes, select_resolution,
    total_forecast_volume, ForecastVolume, GridSampler, SampleGrid, VolumeResult,
};
use weather_client::{FetchSummary, OpenWeatherMapSource, PointFetcher, PrecipitationSource};

use crate::{RainVolumeError, Result, ServiceConfig};

/// Resolution and sample coordinates chosen for a polygon, before any
/// precipitation is fetched.
#[derive(Debug, Clone, Serialize)]
pub struct SamplingPlan {
    pub area_m2: f64,
    /// Resolution tried first: the caller's, or the one picked from the area.
    pub selected_resolution_km: f64,
    pub grid: SampleGrid,
}

/// Outcome of one rain volume computation.
#[derive(Debug, Clone, Serialize)]
pub struct RainVolumeReport {
    pub computed_at: DateTime<Utc>,
    pub requested_resolution_km: Option<f64>,
    pub selected_resolution_km: f64,
    pub result: VolumeResult,
    pub fetch: FetchSummary,
    /// Absent when disabled or when the forecast request failed.
    pub forecast: Option<Vec<ForecastVolume>>,
}

impl RainVolumeReport {
    pub fn forecast_total_m3(&self) -> Option<f64> {
        self.forecast.as_deref().map(total_forecast_volume)
    }
}

/// Runs the full pipeline: resolution, sampling, fetching, integration and
/// forecast projection.
pub struct RainVolumeService {
    config: ServiceConfig,
    fetcher: PointFetcher,
}

impl RainVolumeService {
    pub fn new(source: Arc<dyn PrecipitationSource>, config: ServiceConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = PointFetcher::new(source, &config.fetch);
        Ok(Self { config, fetcher })
    }

    /// Service backed by OpenWeatherMap; fails without an API key.
    pub fn openweathermap(config: ServiceConfig) -> Result<Self> {
        let source = OpenWeatherMapSource::new(&config.fetch)?;
        Self::new(Arc::new(source), config)
    }

    /// Choose the resolution and sample coordinates for `polygon`.
    ///
    /// The area limit applies whether or not a resolution is requested.
    pub fn plan(&self, polygon: &Polygon, requested_resolution_km: Option<f64>) -> Result<SamplingPlan> {
        plan_sampling(polygon, requested_resolution_km, &self.config)
    }

    /// Estimate the precipitation volume over `polygon`.
    #[instrument(skip(self, polygon), fields(vertices = polygon.ring().len()))]
    pub async fn compute_rain_volume(
        &self,
        polygon: Polygon,
        requested_resolution_km: Option<f64>,
    ) -> Result<RainVolumeReport> {
        let started = Instant::now();
        counter!("rain_volume_computations_total").increment(1);

        let plan = self.plan(&polygon, requested_resolution_km)?;
        info!(
            area_km2 = plan.area_m2 / 1_000_000.0,
            resolution_km = plan.grid.effective_resolution_km,
            points = plan.grid.coordinates.len(),
            "Sampling plan ready"
        );

        let outcome = self.fetcher.fetch_samples(&plan.grid.coordinates).await;

        let forecast_center = polygon.bounding_box().center();
        let resolution_km = plan.grid.effective_resolution_km;
        let estimator_config = self.config.estimator.clone();
        let samples = outcome.samples;
        let result = tokio::task::spawn_blocking(move || {
            estimate_volume(&samples, &polygon, resolution_km, &estimator_config)
        })
        .await
        .map_err(|e| RainVolumeError::Task(e.to_string()))??;

        let forecast = if self.config.forecast {
            let (lon, lat) = forecast_center;
            self.fetcher
                .fetch_forecast(lat, lon, self.config.fetch.forecast_bucket_limit)
                .await
                .map(|buckets| project_forecast_volumes(result.area_m2, &buckets))
        } else {
            None
        };

        let elapsed = started.elapsed();
        histogram!("rain_volume_computation_duration_seconds").record(elapsed.as_secs_f64());
        info!(
            volume_m3 = result.volume_m3,
            cells = result.num_integration_cells,
            failed_points = outcome.summary.failed,
            elapsed_ms = elapsed.as_millis() as u64,
            "Rain volume computed"
        );

        Ok(RainVolumeReport {
            computed_at: Utc::now(),
            requested_resolution_km,
            selected_resolution_km: plan.selected_resolution_km,
            result,
            fetch: outcome.summary,
            forecast,
        })
    }
}

/// Geometry-only half of the pipeline; needs no weather source.
pub fn plan_sampling(
    polygon: &Polygon,
    requested_resolution_km: Option<f64>,
    config: &ServiceConfig,
) -> Result<SamplingPlan> {
    let area_m2 = polygon.area_m2();

    let selected_resolution_km = match requested_resolution_km {
        Some(resolution) => {
            if !(resolution.is_finite() && resolution > 0.0) {
                return Err(RainError::InvalidResolution(resolution).into());
            }
            ensure_area_within_limit(area_m2, &config.estimator)?;
            resolution
        }
        None => select_resolution(area_m2, &config.estimator)?,
    };

    let grid = GridSampler::new(config.estimator.clone()).sample(polygon, selected_resolution_km)?;

    Ok(SamplingPlan {
        area_m2,
        selected_resolution_km,
        grid,
    })
}
