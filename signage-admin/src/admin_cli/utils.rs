use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::{prelude::*, sqlite::SqliteConnection};
use dotenvy::dotenv;
use regex::Regex;
use signage_api::orm::set_foreign_keys;

/// Opens the database named by `DATABASE_URL` with foreign keys enforced.
pub fn establish_connection() -> Result<SqliteConnection, Box<dyn std::error::Error>> {
    dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    let mut conn = SqliteConnection::establish(&database_url)?;
    set_foreign_keys(&mut conn)?;
    Ok(conn)
}

/// Timestamp written to `updated_at` columns by CLI edits.
pub fn now_utc() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Builds a name matcher: a regex by default, a plain substring with `-F`.
pub fn name_matcher(
    search_term: Option<String>,
    fixed_string: bool,
) -> Result<Box<dyn Fn(&str) -> bool>, Box<dyn std::error::Error>> {
    match search_term {
        None => Ok(Box::new(|_| true)),
        Some(term) if fixed_string => Ok(Box::new(move |name| name.contains(&term))),
        Some(term) => {
            let regex = Regex::new(&term)
                .map_err(|e| format!("Invalid regex pattern '{}': {}", term, e))?;
            Ok(Box::new(move |name| regex.is_match(name)))
        }
    }
}

/// Parses `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}' (expected YYYY-MM-DD): {}", value, e).into())
}
