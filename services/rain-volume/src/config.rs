//! Service configuration loading.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use volume_estimator::EstimatorConfig;
use weather_client::FetchConfig;

use crate::RainVolumeError;

/// Complete configuration for a rain volume computation.
///
/// Loaded from an optional YAML file:
///
/// ```yaml
/// forecast: true
/// estimator:
///   integration_subdivisions: 4
///   max_area_km2: 20000
/// fetch:
///   request_spacing_ms: 100
///   max_concurrency: 1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub estimator: EstimatorConfig,
    pub fetch: FetchConfig,
    /// Project the 48 h forecast over the polygon.
    pub forecast: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            estimator: EstimatorConfig::default(),
            fetch: FetchConfig::default(),
            forecast: true,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            estimator: EstimatorConfig::from_env(),
            fetch: FetchConfig::from_env(),
            forecast: std::env::var("RAIN_FORECAST")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),
        }
    }

    /// Load configuration from a YAML file.
    ///
    /// The API key is never read from the file; it always comes from
    /// `OPENWEATHERMAP_API_KEY`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.fetch.api_key = FetchConfig::from_env().api_key;

        tracing::info!(path = %path.display(), "Loaded service configuration");
        Ok(config)
    }

    /// Load from `path` if given, otherwise from the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::from_env()),
        }
    }

    /// Validate both the estimator and fetch settings.
    pub fn validate(&self) -> std::result::Result<(), RainVolumeError> {
        self.estimator
            .validate()
            .map_err(|e| RainVolumeError::InvalidConfig(format!("estimator: {}", e)))?;
        self.fetch
            .validate()
            .map_err(|e| RainVolumeError::InvalidConfig(format!("fetch: {}", e)))?;
        Ok(())
    }
}
