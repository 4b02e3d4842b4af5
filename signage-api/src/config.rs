use chrono_tz::Tz;
use rocket::figment::providers::{Env, Format, Serialized, Toml};
use rocket::figment::Figment;
use serde::{Deserialize, Serialize};

/// Service settings that are not Rocket's own.
///
/// Layered as built-in defaults, then `Signage.toml` in the working
/// directory, then `SIGNAGE_*` environment variables
/// (e.g. `SIGNAGE_WEATHER_TTL_MINUTES=30`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignageConfig {
    /// How long a stored forecast is served before the provider is asked again
    pub weather_ttl_minutes: u32,
    /// Zone used when site settings carry no valid timezone
    pub default_timezone: String,
    pub forecast_base_url: String,
    pub forecast_timeout_secs: u64,
    /// Bearer token for the admin API. Unset means the admin API refuses
    /// every request.
    pub admin_token: Option<String>,
    pub static_dir: String,
}

impl Default for SignageConfig {
    fn default() -> Self {
        SignageConfig {
            weather_ttl_minutes: 60,
            default_timezone: "UTC".to_string(),
            forecast_base_url: "https://api.open-meteo.com".to_string(),
            forecast_timeout_secs: 10,
            admin_token: None,
            static_dir: "static".to_string(),
        }
    }
}

impl SignageConfig {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(SignageConfig::default()))
            .merge(Toml::file("Signage.toml"))
            .merge(Env::prefixed("SIGNAGE_"))
    }

    pub fn load() -> Result<Self, rocket::figment::Error> {
        Self::figment().extract()
    }

    /// The configured default zone, or UTC if it does not parse.
    pub fn default_tz(&self) -> Tz {
        self.default_timezone.parse().unwrap_or(Tz::UTC)
    }

    pub fn weather_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.weather_ttl_minutes))
    }

    pub fn forecast_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.forecast_timeout_secs)
    }
}
