//! Admin endpoints for inspecting and pruning cached forecasts.

use chrono::Duration;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Route, State};
use serde::Serialize;
use ts_rs::TS;

use super::{ApiError, api_error, db_error};
use crate::admin_guard::AdminToken;
use crate::models::WeatherCacheRow;
use crate::orm::DbConn;
use crate::orm::weather_cache::{list_weather_cache, prune_weather_cache};
use crate::services::SignageServices;

pub const DEFAULT_PRUNE_DAYS: i64 = 7;

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct PruneResult {
    pub deleted: usize,
    #[ts(type = "string")]
    pub cutoff: chrono::NaiveDateTime,
}

/// List Weather Cache endpoint.
///
/// - **URL:** `/api/1/WeatherCache`
/// - **Method:** `GET`
/// - **Purpose:** Cached forecast rows, most recently fetched first
/// - **Authentication:** Admin token
#[get("/1/WeatherCache")]
pub async fn list_weather_cache_endpoint(
    db: DbConn,
    _admin: AdminToken,
) -> Result<Json<Vec<WeatherCacheRow>>, ApiError> {
    db.run(|conn| list_weather_cache(conn))
        .await
        .map(Json)
        .map_err(|e| db_error("listing weather cache", e))
}

/// Prune Weather Cache endpoint.
///
/// - **URL:** `/api/1/WeatherCache?older_than_days=N`
/// - **Method:** `DELETE`
/// - **Purpose:** Deletes rows fetched more than N days ago (default 7)
/// - **Authentication:** Admin token
///
/// # Response
///
/// **Success (HTTP 200 OK):**
/// ```json
/// { "deleted": 12, "cutoff": "2025-05-25T08:00:00" }
/// ```
#[delete("/1/WeatherCache?<older_than_days>")]
pub async fn prune_weather_cache_endpoint(
    db: DbConn,
    services: &State<SignageServices>,
    older_than_days: Option<i64>,
    _admin: AdminToken,
) -> Result<Json<PruneResult>, ApiError> {
    let days = older_than_days.unwrap_or(DEFAULT_PRUNE_DAYS);
    if days < 1 {
        return Err(api_error(
            Status::BadRequest,
            "older_than_days must be at least 1",
        ));
    }
    let cutoff = Duration::try_days(days)
        .and_then(|age| services.clock.now().checked_sub_signed(age))
        .ok_or_else(|| api_error(Status::BadRequest, "older_than_days out of range"))?
        .naive_utc();

    let deleted = db
        .run(move |conn| prune_weather_cache(conn, cutoff))
        .await
        .map_err(|e| db_error("pruning weather cache", e))?;
    info!("Pruned {} weather cache rows fetched before {}", deleted, cutoff);

    Ok(Json(PruneResult { deleted, cutoff }))
}

pub fn routes() -> Vec<Route> {
    routes![list_weather_cache_endpoint, prune_weather_cache_endpoint]
}
