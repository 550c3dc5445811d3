//! OpenWeatherMap precipitation source.
//!
//! Uses the free-tier endpoints:
//! - `/data/2.5/weather` for current conditions at a point
//! - `/data/2.5/forecast` for the 5 day / 3 hour forecast

use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rain_common::ForecastBucket;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{FetchConfig, FetchError, FetchResult, PointPrecipitation, PrecipitationSource};

/// Accumulated depth over the last 1 or 3 hours, as reported under
/// `rain` and `snow`.
#[derive(Debug, Default, Deserialize)]
pub struct Accumulation {
    #[serde(rename = "1h")]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h")]
    pub three_hours: Option<f64>,
}

impl Accumulation {
    /// First non-zero of the 1h and 3h figures, else 0.
    fn depth_mm(&self) -> f64 {
        [self.one_hour, self.three_hours]
            .into_iter()
            .flatten()
            .find(|mm| *mm != 0.0 && !mm.is_nan())
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: Option<f64>,
}

/// Body of a current weather response.
#[derive(Debug, Deserialize)]
pub struct CurrentWeather {
    #[serde(default)]
    rain: Option<Accumulation>,
    #[serde(default)]
    snow: Option<Accumulation>,
    #[serde(default)]
    weather: Vec<WeatherCondition>,
    #[serde(default)]
    main: Option<MainReadings>,
}

impl CurrentWeather {
    /// Rain depth, falling back to snow only when rain reports nothing.
    pub fn precipitation_mm(&self) -> f64 {
        let rain = self.rain.as_ref().map(Accumulation::depth_mm).unwrap_or(0.0);
        if rain != 0.0 {
            return rain;
        }
        self.snow.as_ref().map(Accumulation::depth_mm).unwrap_or(0.0)
    }

    pub fn into_point(self) -> PointPrecipitation {
        PointPrecipitation {
            precipitation_mm: self.precipitation_mm().max(0.0),
            description: self.weather.into_iter().next().and_then(|w| w.description),
            temperature_c: self.main.and_then(|m| m.temp),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    #[serde(default)]
    rain: Option<Accumulation>,
    #[serde(default)]
    snow: Option<Accumulation>,
}

impl ForecastEntry {
    fn precipitation_mm(&self) -> f64 {
        let three_hours = |acc: &Option<Accumulation>| {
            acc.as_ref()
                .and_then(|a| a.three_hours)
                .filter(|mm| *mm != 0.0 && !mm.is_nan())
        };
        three_hours(&self.rain)
            .or_else(|| three_hours(&self.snow))
            .unwrap_or(0.0)
    }
}

/// Body of a forecast response.
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastEntry>,
}

impl ForecastResponse {
    /// Buckets in response order, at most `limit` of them.
    pub fn into_buckets(self, limit: usize) -> FetchResult<Vec<ForecastBucket>> {
        self.list
            .into_iter()
            .take(limit)
            .map(|entry| {
                let timestamp = Utc
                    .timestamp_opt(entry.dt, 0)
                    .single()
                    .ok_or_else(|| FetchError::Decode(format!("Invalid forecast time: {}", entry.dt)))?;
                Ok(ForecastBucket::new(timestamp, entry.precipitation_mm()))
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Error message for a non-success response body.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| "Failed to fetch weather data".to_string())
}

/// Client for the OpenWeatherMap REST API.
pub struct OpenWeatherMapSource {
    client: Client,
    base_url: String,
    api_key: String,
    forecast_bucket_limit: usize,
}

impl OpenWeatherMapSource {
    /// Create a source from configuration; requires an API key.
    pub fn new(config: &FetchConfig) -> FetchResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(FetchError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            forecast_bucket_limit: config.forecast_bucket_limit,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/data/2.5/{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        lat: f64,
        lon: f64,
    ) -> FetchResult<T> {
        let response = self
            .client
            .get(self.endpoint(path))
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PrecipitationSource for OpenWeatherMapSource {
    #[instrument(skip(self))]
    async fn fetch_precipitation(&self, lat: f64, lon: f64) -> FetchResult<PointPrecipitation> {
        let weather: CurrentWeather = self.get_json("weather", lat, lon).await?;
        let point = weather.into_point();
        debug!(
            precipitation_mm = point.precipitation_mm,
            description = point.description.as_deref().unwrap_or("N/A"),
            "Fetched current weather"
        );
        Ok(point)
    }

    #[instrument(skip(self))]
    async fn fetch_forecast(&self, lat: f64, lon: f64) -> FetchResult<Vec<ForecastBucket>> {
        let forecast: ForecastResponse = self.get_json("forecast", lat, lon).await?;
        let buckets = forecast.into_buckets(self.forecast_bucket_limit)?;
        debug!(buckets = buckets.len(), "Fetched forecast");
        Ok(buckets)
    }

    fn name(&self) -> &str {
        "openweathermap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current(json: &str) -> CurrentWeather {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_rain_one_hour_preferred() {
        let weather = current(r#"{"rain": {"1h": 2.5, "3h": 6.0}}"#);
        assert_eq!(weather.precipitation_mm(), 2.5);
    }

    #[test]
    fn test_rain_falls_back_to_three_hours() {
        assert_eq!(current(r#"{"rain": {"3h": 4.0}}"#).precipitation_mm(), 4.0);
        assert_eq!(current(r#"{"rain": {"1h": 0, "3h": 4.0}}"#).precipitation_mm(), 4.0);
    }

    #[test]
    fn test_snow_only_when_no_rain() {
        assert_eq!(current(r#"{"snow": {"1h": 1.2}}"#).precipitation_mm(), 1.2);
        assert_eq!(
            current(r#"{"rain": {"1h": 0.0}, "snow": {"3h": 3.0}}"#).precipitation_mm(),
            3.0
        );
        assert_eq!(
            current(r#"{"rain": {"1h": 0.5}, "snow": {"1h": 3.0}}"#).precipitation_mm(),
            0.5
        );
    }

    #[test]
    fn test_dry_weather_is_zero() {
        let weather = current(
            r#"{"weather": [{"description": "clear sky"}], "main": {"temp": 21.5}}"#,
        );
        let point = weather.into_point();
        assert_eq!(point.precipitation_mm, 0.0);
        assert_eq!(point.description.as_deref(), Some("clear sky"));
        assert_eq!(point.temperature_c, Some(21.5));
    }

    #[test]
    fn test_forecast_buckets() {
        let body = r#"{"list": [
            {"dt": 1714521600},
            {"dt": 1714532400, "rain": {"3h": 5.0}},
            {"dt": 1714543200, "snow": {"3h": 2.0}}
        ]}"#;
        let forecast: ForecastResponse = serde_json::from_str(body).unwrap();
        let buckets = forecast.into_buckets(16).unwrap();

        let depths: Vec<f64> = buckets.iter().map(|b| b.precipitation_mm).collect();
        assert_eq!(depths, vec![0.0, 5.0, 2.0]);
        assert_eq!(buckets[0].timestamp.timestamp(), 1714521600);
    }

    #[test]
    fn test_forecast_truncated_to_limit() {
        let entries: Vec<String> = (0..40)
            .map(|i| format!(r#"{{"dt": {}}}"#, 1714521600 + i * 10800))
            .collect();
        let body = format!(r#"{{"list": [{}]}}"#, entries.join(","));
        let forecast: ForecastResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(forecast.into_buckets(16).unwrap().len(), 16);
    }

    #[test]
    fn test_error_message_from_body() {
        assert_eq!(
            error_message(r#"{"cod": 401, "message": "Invalid API key."}"#),
            "Invalid API key."
        );
        assert_eq!(error_message("<html>"), "Failed to fetch weather data");
    }

    #[test]
    fn test_requires_api_key() {
        let result = OpenWeatherMapSource::new(&FetchConfig::default());
        assert!(matches!(result, Err(FetchError::MissingApiKey)));
    }
}
