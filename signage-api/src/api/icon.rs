//! Admin endpoints for the custom icon catalogue.
//!
//! Icon names share a namespace with the built-in identifiers items may
//! reference; the table's UNIQUE constraint rejects duplicates with a 409.

use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{Route, State};

use super::{ApiError, db_error, invalid, not_found};
use crate::admin_guard::AdminToken;
use crate::logged_json::LoggedJson;
use crate::models::{BUILTIN_ICONS, Icon, IconInput};
use crate::orm::DbConn;
use crate::orm::icon::{delete_icon, insert_icon, list_icons, update_icon};
use crate::services::SignageServices;
use crate::validation::validate_icon;

/// List Icons endpoint.
///
/// - **URL:** `/api/1/Icons`
/// - **Method:** `GET`
/// - **Purpose:** Custom icons sorted by name
/// - **Authentication:** Admin token
#[get("/1/Icons")]
pub async fn list_icons_endpoint(db: DbConn, _admin: AdminToken) -> Result<Json<Vec<Icon>>, ApiError> {
    db.run(|conn| list_icons(conn))
        .await
        .map(Json)
        .map_err(|e| db_error("listing icons", e))
}

/// Built-in Icons endpoint.
///
/// - **URL:** `/api/1/Icons/builtin`
/// - **Method:** `GET`
/// - **Purpose:** Identifiers an item may use without a custom icon row
/// - **Authentication:** Admin token
#[get("/1/Icons/builtin")]
pub fn list_builtin_icons(_admin: AdminToken) -> Json<Vec<&'static str>> {
    Json(BUILTIN_ICONS.to_vec())
}

/// Create Icon endpoint.
///
/// - **URL:** `/api/1/Icons`
/// - **Method:** `POST`
/// - **Authentication:** Admin token
///
/// # Request Format
///
/// ```json
/// {
///   "name": "ball",
///   "enabled": true,
///   "face": { "kind": "glyph", "characters": "⚽", "font": "Noto Emoji" }
/// }
/// ```
///
/// An image icon uses `{ "kind": "image", "image_path": "/static/ball.png" }`.
#[post("/1/Icons", data = "<new_icon>")]
pub async fn create_icon(
    db: DbConn,
    services: &State<SignageServices>,
    new_icon: LoggedJson<IconInput>,
    _admin: AdminToken,
) -> Result<status::Created<Json<Icon>>, ApiError> {
    let input = new_icon.into_inner();
    validate_icon(&input).map_err(invalid)?;
    let now = services.clock.now().naive_utc();

    db.run(move |conn| insert_icon(conn, input, now))
        .await
        .map(|icon| {
            let location = format!("/api/1/Icons/{}", icon.id);
            status::Created::new(location).body(Json(icon))
        })
        .map_err(|e| db_error("creating icon", e))
}

/// Update Icon endpoint.
///
/// - **URL:** `/api/1/Icons/<icon_id>`
/// - **Method:** `PUT`
/// - **Purpose:** Replaces name, flag and face; switching face clears the
///   old face's columns
/// - **Authentication:** Admin token
#[put("/1/Icons/<icon_id>", data = "<update_data>")]
pub async fn update_icon_endpoint(
    db: DbConn,
    services: &State<SignageServices>,
    icon_id: i32,
    update_data: LoggedJson<IconInput>,
    _admin: AdminToken,
) -> Result<Json<Icon>, ApiError> {
    let input = update_data.into_inner();
    validate_icon(&input).map_err(invalid)?;
    let now = services.clock.now().naive_utc();

    match db.run(move |conn| update_icon(conn, icon_id, input, now)).await {
        Ok(Some(icon)) => Ok(Json(icon)),
        Ok(None) => Err(not_found("Icon", icon_id)),
        Err(e) => Err(db_error("updating icon", e)),
    }
}

/// Delete Icon endpoint.
///
/// - **URL:** `/api/1/Icons/<icon_id>`
/// - **Method:** `DELETE`
/// - **Authentication:** Admin token
///
/// Items that still name the icon keep the name and render without it.
#[delete("/1/Icons/<icon_id>")]
pub async fn delete_icon_endpoint(
    db: DbConn,
    icon_id: i32,
    _admin: AdminToken,
) -> Result<Status, ApiError> {
    match db.run(move |conn| delete_icon(conn, icon_id)).await {
        Ok(true) => Ok(Status::NoContent),
        Ok(false) => Err(not_found("Icon", icon_id)),
        Err(e) => Err(db_error("deleting icon", e)),
    }
}

pub fn routes() -> Vec<Route> {
    routes![
        list_icons_endpoint,
        list_builtin_icons,
        create_icon,
        update_icon_endpoint,
        delete_icon_endpoint
    ]
}
