use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::models::{NewWeatherCacheRow, WeatherCacheRow};

pub fn get_weather_cache_by_key(
    conn: &mut SqliteConnection,
    key: &str,
) -> Result<Option<WeatherCacheRow>, diesel::result::Error> {
    use crate::schema::weather_cache::dsl::*;
    weather_cache
        .filter(cache_key.eq(key))
        .select(WeatherCacheRow::as_select())
        .first(conn)
        .optional()
}

/// Inserts or overwrites the row for `row.cache_key` in one statement.
/// Racing writers for the same key simply leave the last write in place.
pub fn upsert_weather_cache(
    conn: &mut SqliteConnection,
    row: &NewWeatherCacheRow,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::weather_cache::dsl::*;
    diesel::insert_into(weather_cache)
        .values(row)
        .on_conflict(cache_key)
        .do_update()
        .set(row)
        .execute(conn)
}

/// All rows, most recently fetched first.
pub fn list_weather_cache(
    conn: &mut SqliteConnection,
) -> Result<Vec<WeatherCacheRow>, diesel::result::Error> {
    use crate::schema::weather_cache::dsl::*;
    weather_cache
        .order((fetched_at.desc(), id.desc()))
        .select(WeatherCacheRow::as_select())
        .load(conn)
}

pub fn count_weather_cache(conn: &mut SqliteConnection) -> Result<i64, diesel::result::Error> {
    use crate::schema::weather_cache::dsl::*;
    weather_cache.count().get_result(conn)
}

/// Deletes rows fetched before `cutoff`, returning how many went.
pub fn prune_weather_cache(
    conn: &mut SqliteConnection,
    cutoff: NaiveDateTime,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::weather_cache::dsl::*;
    diesel::delete(weather_cache.filter(fetched_at.lt(cutoff))).execute(conn)
}
