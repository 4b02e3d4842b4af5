//! Test fixtures: in-memory databases, a Rocket wired to them, and a
//! scripted forecast provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;
use rocket::figment::{
    util::map,
    value::{Map, Value},
};
use rocket::{Build, Rocket, fairing::AdHoc};

use super::db::{DbConn, run_pending_migrations, set_foreign_keys};
use crate::clock::ManualClock;
use crate::config::SignageConfig;
use crate::models::{NewWeatherCacheRow, WeatherCacheRow};
use crate::orm::weather_cache::{get_weather_cache_by_key, upsert_weather_cache};
use crate::services::SignageServices;
use crate::weather::{CacheStore, ForecastProvider, HourlyForecast, WeatherError};

/// Bearer token accepted by the admin API of `test_rocket`.
pub const TEST_ADMIN_TOKEN: &str = "test-admin-token";

/// The instant `test_rocket`'s clock starts at: 2025-06-01 08:00 UTC.
pub fn test_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn test_config() -> SignageConfig {
    SignageConfig {
        admin_token: Some(TEST_ADMIN_TOKEN.to_string()),
        forecast_timeout_secs: 1,
        ..SignageConfig::default()
    }
}

/// Configures SQLite for speed over durability. Only for tests.
fn set_sqlite_test_pragmas(conn: &mut diesel::SqliteConnection) -> diesel::QueryResult<()> {
    conn.batch_execute(
        r#"
        PRAGMA synchronous = OFF;
        PRAGMA journal_mode = OFF;
        "#,
    )
}

fn set_sqlite_test_pragmas_fairing() -> AdHoc {
    AdHoc::try_on_ignite("Set SQLite Test Pragmas", |rocket| async {
        let Some(conn) = DbConn::get_one(&rocket).await else {
            return Err(rocket);
        };
        match conn.run(set_sqlite_test_pragmas).await {
            Ok(()) => Ok(rocket),
            Err(e) => {
                error!("Failed to set test pragmas: {}", e);
                Err(rocket)
            }
        }
    })
}

/// A Rocket on a fresh in-memory database with a `ManualClock` at
/// `test_start()` and a provider answering with `sample_forecast`.
pub fn test_rocket() -> Rocket<Build> {
    let services = SignageServices {
        clock: Arc::new(ManualClock::new(test_start())),
        forecast: Arc::new(StubForecast::responding(sample_forecast(
            test_start().date_naive(),
        ))),
        config: test_config(),
    };
    test_rocket_with(services)
}

/// A Rocket on a fresh in-memory database using the given collaborators.
///
/// Each call gets its own uniquely named shared-cache database, so tests can
/// run in parallel without seeing each other's rows.
pub fn test_rocket_with(services: SignageServices) -> Rocket<Build> {
    use uuid::Uuid;

    let unique_db_name = format!("file:test_db_{}?mode=memory&cache=shared", Uuid::new_v4());

    let db_config: Map<_, Value> = map! {
        "url" => unique_db_name.into(),
        "pool_size" => 5.into(),
        "timeout" => 5.into(),
    };

    let figment = rocket::Config::figment().merge(("databases", map!["sqlite_db" => db_config]));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(super::db::set_foreign_keys_fairing())
        .attach(set_sqlite_test_pragmas_fairing())
        .attach(super::db::run_migrations_fairing());

    crate::mount_signage(rocket, services)
}

/// A migrated in-memory database with foreign keys on. Every call returns a
/// new, independent database.
///
/// # Panics
/// Panics if the database cannot be created or migrated.
pub fn setup_test_db() -> SqliteConnection {
    use diesel::Connection;

    let mut conn = SqliteConnection::establish(":memory:")
        .expect("Failed to create in-memory SQLite database");
    set_foreign_keys(&mut conn).expect("Failed to enable foreign keys");
    run_pending_migrations(&mut conn).expect("Failed to run pending migrations");
    conn
}

/// A single test connection usable wherever a `CacheStore` is wanted.
pub struct SharedConn(Mutex<SqliteConnection>);

impl SharedConn {
    pub fn new() -> Self {
        SharedConn(Mutex::new(setup_test_db()))
    }

    /// Runs `f` against the underlying connection.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SqliteConnection) -> R,
    {
        let mut conn = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut conn)
    }
}

impl Default for SharedConn {
    fn default() -> Self {
        Self::new()
    }
}

#[rocket::async_trait]
impl CacheStore for SharedConn {
    async fn load(&self, key: &str) -> Result<Option<WeatherCacheRow>, diesel::result::Error> {
        self.with(|conn| get_weather_cache_by_key(conn, key))
    }

    async fn save(&self, row: NewWeatherCacheRow) -> Result<(), diesel::result::Error> {
        self.with(|conn| upsert_weather_cache(conn, &row).map(|_| ()))
    }
}

#[derive(Debug, Clone)]
enum StubBehavior {
    Respond(HourlyForecast),
    Fail(u16),
    Hang,
}

/// A forecast provider that does what it is told and counts its calls.
#[derive(Debug)]
pub struct StubForecast {
    behavior: Mutex<StubBehavior>,
    calls: AtomicUsize,
}

impl StubForecast {
    fn with_behavior(behavior: StubBehavior) -> Self {
        StubForecast {
            behavior: Mutex::new(behavior),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn responding(forecast: HourlyForecast) -> Self {
        Self::with_behavior(StubBehavior::Respond(forecast))
    }

    /// Answers every call with HTTP 503.
    pub fn failing() -> Self {
        Self::with_behavior(StubBehavior::Fail(503))
    }

    /// Never answers.
    pub fn hanging() -> Self {
        Self::with_behavior(StubBehavior::Hang)
    }

    pub fn respond_with(&self, forecast: HourlyForecast) {
        *self.lock() = StubBehavior::Respond(forecast);
    }

    pub fn fail(&self) {
        *self.lock() = StubBehavior::Fail(503);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StubBehavior> {
        self.behavior.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[rocket::async_trait]
impl ForecastProvider for StubForecast {
    async fn hourly_forecast(
        &self,
        _latitude: f64,
        _longitude: f64,
        _timezone: &str,
    ) -> Result<HourlyForecast, WeatherError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = self.lock().clone();
        match behavior {
            StubBehavior::Respond(forecast) => Ok(forecast),
            StubBehavior::Fail(status) => Err(WeatherError::Status(status)),
            StubBehavior::Hang => std::future::pending().await,
        }
    }
}

/// A forecast for `date`: light rain at 09:00 (18°C), overcast at 12:00
/// (22°C) and clear at 15:00 (25°C), with a few surrounding hours.
pub fn sample_forecast(date: NaiveDate) -> HourlyForecast {
    let day = date.format("%Y-%m-%d");
    HourlyForecast {
        time: vec![
            format!("{}T08:00", day),
            format!("{}T09:00", day),
            format!("{}T12:00", day),
            format!("{}T15:00", day),
            format!("{}T18:00", day),
        ],
        temperature_2m: vec![Some(16.0), Some(18.0), Some(22.0), Some(25.0), Some(20.0)],
        weathercode: vec![Some(2), Some(61), Some(3), Some(0), Some(95)],
    }
}
