use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use md5::{Digest, Md5};

use super::codes::describe_weather_code;
use super::provider::{ForecastProvider, HourlyForecast, WeatherError};
use super::types::{
    SET_LOCATION, Slot, UNAVAILABLE, WeatherReport, WeatherSlot, celsius_to_fahrenheit,
    decode_slot,
};
use crate::models::{NewWeatherCacheRow, WeatherCacheRow};
use crate::orm::DbConn;
use crate::orm::weather_cache::{get_weather_cache_by_key, upsert_weather_cache};

/// Where cached forecasts live.
#[rocket::async_trait]
pub trait CacheStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<WeatherCacheRow>, diesel::result::Error>;
    async fn save(&self, row: NewWeatherCacheRow) -> Result<(), diesel::result::Error>;
}

#[rocket::async_trait]
impl CacheStore for DbConn {
    async fn load(&self, key: &str) -> Result<Option<WeatherCacheRow>, diesel::result::Error> {
        let key = key.to_string();
        self.run(move |conn| get_weather_cache_by_key(conn, &key)).await
    }

    async fn save(&self, row: NewWeatherCacheRow) -> Result<(), diesel::result::Error> {
        self.run(move |conn| upsert_weather_cache(conn, &row).map(|_| ()))
            .await
    }
}

/// Key for a location on a day. Without both coordinates the key is just the
/// date, and such lookups are never stored.
pub fn cache_key(
    latitude: Option<f64>,
    longitude: Option<f64>,
    timezone: &str,
    today: NaiveDate,
) -> String {
    let date = today.format("%Y-%m-%d").to_string();
    match (latitude, longitude) {
        (Some(lat), Some(lon)) => {
            let raw = format!(
                "{},{},{},{}",
                key_coordinate(lat),
                key_coordinate(lon),
                timezone,
                date
            );
            hex::encode(Md5::digest(raw.as_bytes()))
        }
        _ => date,
    }
}

/// Rounds to four places and prints the shortest form, keeping a trailing
/// `.0` on whole numbers (`41.88`, `-87.6`, `40.0`).
fn key_coordinate(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    let text = rounded.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}

/// Builds the three slots for `today` from a provider response.
pub fn report_from_forecast(forecast: &HourlyForecast, today: NaiveDate) -> WeatherReport {
    WeatherReport::from_fn(|slot| {
        let (code, celsius) = forecast.reading_at(today, slot.hour());
        let (icon, summary) = describe_weather_code(code);
        WeatherSlot {
            label: slot.label().to_string(),
            icon: icon.to_string(),
            summary: summary.to_string(),
            temp_f: celsius.map(celsius_to_fahrenheit),
        }
    })
}

fn decode_row(row: &WeatherCacheRow) -> Result<WeatherReport, serde_json::Error> {
    Ok(WeatherReport {
        morning: decode_slot(row.morning_json.as_deref())?,
        noon: decode_slot(row.noon_json.as_deref())?,
        afternoon: decode_slot(row.afternoon_json.as_deref())?,
    })
}

fn encode_row(
    key: String,
    report: &WeatherReport,
    now: DateTime<Utc>,
) -> Result<NewWeatherCacheRow, serde_json::Error> {
    let encode = |slot: Slot| report.slot(slot).map(serde_json::to_string).transpose();
    Ok(NewWeatherCacheRow {
        cache_key: key,
        morning_json: encode(Slot::Morning)?,
        noon_json: encode(Slot::Noon)?,
        afternoon_json: encode(Slot::Afternoon)?,
        fetched_at: now.naive_utc(),
    })
}

/// TTL cache in front of a forecast provider.
pub struct WeatherCache<'a> {
    store: &'a dyn CacheStore,
    provider: &'a dyn ForecastProvider,
    ttl: chrono::Duration,
    timeout: Duration,
}

impl<'a> WeatherCache<'a> {
    pub fn new(
        store: &'a dyn CacheStore,
        provider: &'a dyn ForecastProvider,
        ttl: chrono::Duration,
        timeout: Duration,
    ) -> Self {
        WeatherCache {
            store,
            provider,
            ttl,
            timeout,
        }
    }

    /// Weather for the site on its local calendar day at `now`.
    ///
    /// Serves a stored row younger than the TTL. Otherwise asks the provider
    /// and stores the result, unless the location is incomplete or the fetch
    /// failed.
    pub async fn get_weather(
        &self,
        latitude: Option<f64>,
        longitude: Option<f64>,
        timezone: Tz,
        now: DateTime<Utc>,
    ) -> WeatherReport {
        let today = now.with_timezone(&timezone).date_naive();
        let key = cache_key(latitude, longitude, timezone.name(), today);

        let (Some(lat), Some(lon)) = (latitude, longitude) else {
            return WeatherReport::degraded(SET_LOCATION);
        };

        if let Some(report) = self.cached(&key, now).await {
            return report;
        }

        let report = match self.fetch(lat, lon, timezone, today).await {
            Ok(report) => report,
            Err(e) => {
                warn!("Weather unavailable for key {}: {}", key, e);
                return WeatherReport::degraded(UNAVAILABLE);
            }
        };

        match encode_row(key, &report, now) {
            Ok(row) => {
                if let Err(e) = self.store.save(row).await {
                    error!("Failed to store weather cache row: {}", e);
                }
            }
            Err(e) => error!("Failed to encode weather report: {}", e),
        }
        report
    }

    /// A fresh, decodable stored report for `key`, if there is one.
    async fn cached(&self, key: &str, now: DateTime<Utc>) -> Option<WeatherReport> {
        let row = match self.store.load(key).await {
            Ok(Some(row)) => row,
            Ok(None) => return None,
            Err(e) => {
                error!("Failed to read weather cache row {}: {}", key, e);
                return None;
            }
        };
        if now.naive_utc() - row.fetched_at >= self.ttl {
            return None;
        }
        match decode_row(&row) {
            Ok(report) => Some(report),
            Err(e) => {
                warn!("Ignoring undecodable weather cache row {}: {}", key, e);
                None
            }
        }
    }

    async fn fetch(
        &self,
        lat: f64,
        lon: f64,
        timezone: Tz,
        today: NaiveDate,
    ) -> Result<WeatherReport, WeatherError> {
        let forecast = rocket::tokio::time::timeout(
            self.timeout,
            self.provider.hourly_forecast(lat, lon, timezone.name()),
        )
        .await
        .map_err(|_| WeatherError::Timeout(self.timeout))??;
        Ok(report_from_forecast(&forecast, today))
    }
}
