//! Configuration for precipitation fetching.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection and pacing settings for the weather API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Base URL of the OpenWeatherMap API.
    pub base_url: String,

    /// API key; requests fail with `MissingApiKey` when unset.
    ///
    /// Only ever set from the environment or in code, never (de)serialized.
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Minimum delay between request starts, in milliseconds.
    pub request_spacing_ms: u64,

    /// Requests allowed in flight at once.
    pub max_concurrency: usize,

    /// Forecast buckets kept (3 hours each).
    pub forecast_bucket_limit: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org".to_string(),
            api_key: None,
            request_timeout_secs: 30,
            request_spacing_ms: 100,
            max_concurrency: 1,
            forecast_bucket_limit: 16,
        }
    }
}

impl FetchConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(key) = std::env::var("OPENWEATHERMAP_API_KEY") {
            if !key.trim().is_empty() {
                config.api_key = Some(key.trim().to_string());
            }
        }

        if let Ok(url) = std::env::var("OWM_BASE_URL") {
            config.base_url = url;
        }

        if let Ok(val) = std::env::var("RAIN_FETCH_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.request_timeout_secs = secs;
            }
        }

        if let Ok(val) = std::env::var("RAIN_FETCH_SPACING_MS") {
            if let Ok(ms) = val.parse() {
                config.request_spacing_ms = ms;
            }
        }

        if let Ok(val) = std::env::var("RAIN_FETCH_CONCURRENCY") {
            if let Ok(n) = val.parse() {
                config.max_concurrency = n;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.max_concurrency == 0 {
            return Err("max_concurrency must be > 0".to_string());
        }

        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be > 0".to_string());
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn request_spacing(&self) -> Duration {
        Duration::from_millis(self.request_spacing_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sequential() {
        let config = FetchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_concurrency, 1);
        assert_eq!(config.request_spacing(), Duration::from_millis(100));
        assert_eq!(config.forecast_bucket_limit, 16);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = FetchConfig {
            max_concurrency: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = FetchConfig {
            api_key: Some("secret".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_api_key_not_deserialized() {
        let config: FetchConfig =
            serde_json::from_str(r#"{"api_key": "secret", "max_concurrency": 2}"#).unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.max_concurrency, 2);
    }
}
