//! Admin endpoints for the site settings row.

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Route, State};

use super::{ApiError, api_error, db_error, invalid};
use crate::admin_guard::AdminToken;
use crate::logged_json::LoggedJson;
use crate::models::{SettingsInput, SiteSettings};
use crate::orm::DbConn;
use crate::orm::site_settings::{get_site_settings, save_site_settings};
use crate::services::SignageServices;
use crate::validation::validate_settings;

/// Get Settings endpoint.
///
/// - **URL:** `/api/1/Settings`
/// - **Method:** `GET`
/// - **Purpose:** The stored settings row
/// - **Authentication:** Admin token
///
/// Returns 404 until settings have been saved once; the display still
/// renders with defaults in that state.
#[get("/1/Settings")]
pub async fn get_settings(db: DbConn, _admin: AdminToken) -> Result<Json<SiteSettings>, ApiError> {
    match db.run(|conn| get_site_settings(conn)).await {
        Ok(Some(settings)) => Ok(Json(settings)),
        Ok(None) => Err(api_error(Status::NotFound, "Settings have not been saved yet")),
        Err(e) => Err(db_error("getting settings", e)),
    }
}

/// Save Settings endpoint.
///
/// - **URL:** `/api/1/Settings`
/// - **Method:** `PUT`
/// - **Purpose:** Creates or replaces the settings row
/// - **Authentication:** Admin token
///
/// # Request Format
///
/// ```json
/// {
///   "latitude": 41.88,
///   "longitude": -87.63,
///   "timezone": "America/Chicago",
///   "bg_color": "#000000",
///   "box_opacity": 0.8
/// }
/// ```
///
/// Colors are `#rrggbb`, opacities 0 to 1, `logo_size` 50 to 500 and
/// `background_image_size` one of tile, stretch, fit or center.
#[put("/1/Settings", data = "<settings>")]
pub async fn put_settings(
    db: DbConn,
    services: &State<SignageServices>,
    settings: LoggedJson<SettingsInput>,
    _admin: AdminToken,
) -> Result<Json<SiteSettings>, ApiError> {
    let input = settings.into_inner();
    validate_settings(&input).map_err(invalid)?;
    let now = services.clock.now().naive_utc();

    db.run(move |conn| save_site_settings(conn, input, now))
        .await
        .map(Json)
        .map_err(|e| db_error("saving settings", e))
}

pub fn routes() -> Vec<Route> {
    routes![get_settings, put_settings]
}
