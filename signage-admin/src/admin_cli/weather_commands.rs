use chrono::Duration;
use clap::Subcommand;
use diesel::sqlite::SqliteConnection;
use signage_api::orm::weather_cache::{count_weather_cache, list_weather_cache, prune_weather_cache};

use super::utils::now_utc;

#[derive(Subcommand)]
pub enum WeatherAction {
    #[command(about = "List cached forecasts, newest first")]
    Ls,
    #[command(about = "Delete cached forecasts older than a number of days")]
    Prune {
        #[arg(short, long, default_value_t = 7, help = "Age in days (at least 1)")]
        days: i64,
    },
}

pub fn handle_weather_command_with_conn(
    conn: &mut SqliteConnection,
    action: WeatherAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        WeatherAction::Ls => weather_ls_impl(conn),
        WeatherAction::Prune { days } => weather_prune_impl(conn, days).map(|_| ()),
    }
}

pub fn weather_ls_impl(conn: &mut SqliteConnection) -> Result<(), Box<dyn std::error::Error>> {
    let rows = list_weather_cache(conn)?;
    if rows.is_empty() {
        println!("Weather cache is empty.");
        return Ok(());
    }

    println!("Found {} cached forecast(s):", rows.len());
    for row in rows {
        println!("  ID: {}, Key: {}, Fetched: {}", row.id, row.cache_key, row.fetched_at);
    }
    Ok(())
}

/// Returns how many rows were deleted.
pub fn weather_prune_impl(
    conn: &mut SqliteConnection,
    days: i64,
) -> Result<usize, Box<dyn std::error::Error>> {
    if days < 1 {
        return Err("--days must be at least 1".into());
    }
    let cutoff = Duration::try_days(days)
        .and_then(|age| now_utc().checked_sub_signed(age))
        .ok_or("--days is out of range")?;
    let deleted = prune_weather_cache(conn, cutoff)?;
    let remaining = count_weather_cache(conn)?;
    println!(
        "Deleted {} cached forecast(s) fetched before {}; {} remain.",
        deleted, cutoff, remaining
    );
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use signage_api::models::NewWeatherCacheRow;
    use signage_api::orm::testing::setup_test_db;
    use signage_api::orm::weather_cache::upsert_weather_cache;

    fn row(key: &str, age_days: i64) -> NewWeatherCacheRow {
        NewWeatherCacheRow {
            cache_key: key.to_string(),
            morning_json: None,
            noon_json: None,
            afternoon_json: None,
            fetched_at: now_utc() - Duration::days(age_days),
        }
    }

    #[test]
    fn test_prune_removes_only_old_rows() {
        let mut conn = setup_test_db();
        upsert_weather_cache(&mut conn, &row("old", 30)).unwrap();
        upsert_weather_cache(&mut conn, &row("fresh", 0)).unwrap();

        assert_eq!(weather_prune_impl(&mut conn, 7).unwrap(), 1);
        let keys: Vec<String> = list_weather_cache(&mut conn)
            .unwrap()
            .into_iter()
            .map(|r| r.cache_key)
            .collect();
        assert_eq!(keys, vec!["fresh".to_string()]);
    }

    #[test]
    fn test_prune_rejects_zero_days() {
        let mut conn = setup_test_db();
        assert!(weather_prune_impl(&mut conn, 0).is_err());
    }

    #[test]
    fn test_prune_rejects_days_beyond_calendar_range() {
        let mut conn = setup_test_db();
        upsert_weather_cache(&mut conn, &row("old", 30)).unwrap();

        assert!(weather_prune_impl(&mut conn, i64::MAX).is_err());
        assert!(weather_prune_impl(&mut conn, 400_000_000).is_err());
        assert_eq!(count_weather_cache(&mut conn).unwrap(), 1);
    }
}
