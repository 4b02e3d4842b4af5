use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::weather_cache;

/// A stored forecast for one location and day. The slot columns hold the
/// JSON-encoded `StoredSlot` payloads.
#[derive(
    Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize, TS,
)]
#[diesel(table_name = weather_cache)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct WeatherCacheRow {
    pub id: i32,
    pub cache_key: String,
    pub morning_json: Option<String>,
    pub noon_json: Option<String>,
    pub afternoon_json: Option<String>,
    #[ts(type = "string")]
    pub fetched_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = weather_cache)]
#[diesel(treat_none_as_null = true)]
pub struct NewWeatherCacheRow {
    pub cache_key: String,
    pub morning_json: Option<String>,
    pub noon_json: Option<String>,
    pub afternoon_json: Option<String>,
    pub fetched_at: NaiveDateTime,
}
