use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

/// Why a forecast could not be had. Never shown to the display; the cache
/// turns all of these into "Unavailable" slots.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Forecast request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Forecast provider returned HTTP {0}")]
    Status(u16),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// The `hourly` block of a forecast response. Arrays are parallel; entries
/// may be null.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HourlyForecast {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub weathercode: Vec<Option<i64>>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    hourly: HourlyForecast,
}

impl HourlyForecast {
    /// Weather code and Celsius temperature at `hour:00` on `date`. An hour
    /// missing from the response reads as code 0 with no temperature.
    pub fn reading_at(&self, date: NaiveDate, hour: u32) -> (i64, Option<f64>) {
        let stamp = format!("{}T{:02}:00", date.format("%Y-%m-%d"), hour);
        match self.time.iter().position(|t| *t == stamp) {
            Some(idx) => {
                let code = self.weathercode.get(idx).copied().flatten().unwrap_or(0);
                let temp = self.temperature_2m.get(idx).copied().flatten();
                (code, temp)
            }
            None => (0, None),
        }
    }
}

/// Anything that can produce an hourly forecast for a location. Times in the
/// result are local to `timezone`.
#[rocket::async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn hourly_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        timezone: &str,
    ) -> Result<HourlyForecast, WeatherError>;
}

/// Client for the Open-Meteo `/v1/forecast` endpoint.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Arc<Client>,
    base_url: String,
    timeout: Duration,
}

impl OpenMeteoClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }
}

#[rocket::async_trait]
impl ForecastProvider for OpenMeteoClient {
    async fn hourly_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        timezone: &str,
    ) -> Result<HourlyForecast, WeatherError> {
        let url = format!("{}/v1/forecast", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("hourly", "temperature_2m,weathercode".to_string()),
                ("timezone", timezone.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    WeatherError::Timeout(self.timeout)
                } else {
                    WeatherError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                WeatherError::Timeout(self.timeout)
            } else {
                WeatherError::Network(e)
            }
        })?;
        let parsed: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;
        Ok(parsed.hourly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forecast() -> HourlyForecast {
        HourlyForecast {
            time: vec![
                "2025-06-01T08:00".to_string(),
                "2025-06-01T09:00".to_string(),
                "2025-06-01T12:00".to_string(),
                "2025-06-01T15:00".to_string(),
            ],
            temperature_2m: vec![Some(15.0), Some(18.5), None],
            weathercode: vec![Some(0), Some(61), Some(3), None],
        }
    }

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    #[test]
    fn reading_matches_exact_hour() {
        assert_eq!(forecast().reading_at(june(1), 9), (61, Some(18.5)));
    }

    #[test]
    fn null_temperature_reads_as_none() {
        assert_eq!(forecast().reading_at(june(1), 12), (3, None));
    }

    #[test]
    fn short_or_null_arrays_default_code_and_temperature() {
        assert_eq!(forecast().reading_at(june(1), 15), (0, None));
    }

    #[test]
    fn missing_hour_reads_as_clear_without_temperature() {
        assert_eq!(forecast().reading_at(june(2), 9), (0, None));
        assert_eq!(HourlyForecast::default().reading_at(june(1), 9), (0, None));
    }

    #[test]
    fn response_without_hourly_block_is_empty() {
        let parsed: ForecastResponse = serde_json::from_str(r#"{"latitude": 1.0}"#).unwrap();
        assert_eq!(parsed.hourly, HourlyForecast::default());
    }
}
