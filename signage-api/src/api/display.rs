//! Routes polled by the sign itself. No authentication.

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Route, State};

use crate::display::{
    DisplayPayload, UpdateStatus, assemble_display, check_updates, load_display_snapshot,
};
use crate::orm::DbConn;
use crate::services::SignageServices;
use crate::weather::WeatherCache;

/// Display render endpoint.
///
/// - **URL:** `/display`
/// - **Method:** `GET`
/// - **Purpose:** Everything the sign draws: settings with defaults filled
///   in, the active schedule and its items in start-time order, the three
///   weather slots and the custom icon catalogue keyed by name
/// - **Authentication:** None required
///
/// Weather problems never fail this route; they show up as "Unavailable"
/// or "Set location" slots. Only a database failure yields a 500.
#[get("/")]
pub async fn render_display(
    db: DbConn,
    services: &State<SignageServices>,
) -> Result<Json<DisplayPayload>, Status> {
    let now = services.clock.now();
    let default_tz = services.config.default_tz();

    let snapshot = db
        .run(move |conn| load_display_snapshot(conn, now, default_tz))
        .await
        .map_err(|e| {
            error!("Failed to load display data: {:?}", e);
            Status::InternalServerError
        })?;

    let (latitude, longitude) = snapshot
        .settings
        .as_ref()
        .map(|s| (s.latitude, s.longitude))
        .unwrap_or((None, None));

    let weather = WeatherCache::new(
        &db,
        services.forecast.as_ref(),
        services.config.weather_ttl(),
        services.config.forecast_timeout(),
    )
    .get_weather(latitude, longitude, snapshot.timezone, now)
    .await;

    Ok(Json(assemble_display(snapshot, weather)))
}

/// Change-detection endpoint.
///
/// - **URL:** `/display/check-updates`
/// - **Method:** `GET`
/// - **Purpose:** Cheap snapshot the sign polls; a change in either
///   timestamp, in `schedule_id` or in `has_active_schedule` means it should
///   fetch `/display` again
/// - **Authentication:** None required
///
/// # Response
///
/// **Success (HTTP 200 OK):**
/// ```json
/// {
///   "settings_updated_at": "2025-06-01T07:30:00",
///   "schedule_updated_at": "2025-06-01T08:00:00",
///   "schedule_id": 3,
///   "has_active_schedule": true
/// }
/// ```
#[get("/check-updates")]
pub async fn check_updates_endpoint(
    db: DbConn,
    services: &State<SignageServices>,
) -> Result<Json<UpdateStatus>, Status> {
    let now = services.clock.now();
    let default_tz = services.config.default_tz();

    db.run(move |conn| check_updates(conn, now, default_tz))
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to check for display updates: {:?}", e);
            Status::InternalServerError
        })
}

/// Routes mounted at `/display`.
pub fn routes() -> Vec<Route> {
    routes![render_display, check_updates_endpoint]
}
