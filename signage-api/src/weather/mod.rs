//! Weather for the sign: three daily slots from an Open-Meteo style
//! forecast, kept in the `weather_cache` table for a configurable TTL.
//!
//! Nothing in here ever fails the display. A missing location yields
//! "Set location" slots and a provider problem yields "Unavailable" slots;
//! neither is stored.

pub mod cache;
pub mod codes;
pub mod provider;
pub mod types;

pub use cache::{CacheStore, WeatherCache, cache_key};
pub use provider::{ForecastProvider, HourlyForecast, OpenMeteoClient, WeatherError};
pub use types::*;
