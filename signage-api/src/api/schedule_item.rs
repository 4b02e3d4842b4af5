//! Admin endpoints for schedule items.
//!
//! Every write bumps the owning schedule's `updated_at` so a polling sign
//! notices the change.

use diesel::SqliteConnection;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{Route, State};

use super::{ApiError, db_error, invalid, not_found};
use crate::admin_guard::AdminToken;
use crate::logged_json::LoggedJson;
use crate::models::{ScheduleItem, ScheduleItemInput};
use crate::orm::DbConn;
use crate::orm::icon::get_icon_by_name;
use crate::orm::schedule::get_schedule;
use crate::orm::schedule_item::{
    delete_schedule_item, insert_schedule_item, list_items_for_schedule, update_schedule_item,
};
use crate::services::SignageServices;
use crate::validation::{
    ValidationError, item_icon_name, validate_icon_reference, validate_schedule_item,
};

enum ItemWrite<T> {
    Done(T),
    Missing,
    Invalid(ValidationError),
}

/// Checks the item's icon against built-ins and the custom icon table.
fn check_icon(
    conn: &mut SqliteConnection,
    input: &ScheduleItemInput,
) -> Result<Result<(), ValidationError>, diesel::result::Error> {
    let icon = item_icon_name(input);
    let custom_exists = match icon {
        Some(name) => get_icon_by_name(conn, name)?.is_some(),
        None => false,
    };
    Ok(validate_icon_reference(icon, custom_exists))
}

/// List Schedule Items endpoint.
///
/// - **URL:** `/api/1/Schedules/<schedule_id>/Items`
/// - **Method:** `GET`
/// - **Purpose:** A schedule's items ordered by start time
/// - **Authentication:** Admin token
#[get("/1/Schedules/<schedule_id>/Items")]
pub async fn list_schedule_items(
    db: DbConn,
    schedule_id: i32,
    _admin: AdminToken,
) -> Result<Json<Vec<ScheduleItem>>, ApiError> {
    let result = db
        .run(move |conn| {
            if get_schedule(conn, schedule_id)?.is_none() {
                return Ok(None);
            }
            list_items_for_schedule(conn, schedule_id).map(Some)
        })
        .await;

    match result {
        Ok(Some(items)) => Ok(Json(items)),
        Ok(None) => Err(not_found("Schedule", schedule_id)),
        Err(e) => Err(db_error("listing schedule items", e)),
    }
}

/// Create Schedule Item endpoint.
///
/// - **URL:** `/api/1/Schedules/<schedule_id>/Items`
/// - **Method:** `POST`
/// - **Purpose:** Adds an item to a schedule
/// - **Authentication:** Admin token
///
/// # Request Format
///
/// ```json
/// {
///   "name": "Warm-up",
///   "start_time": "09:00:00",
///   "duration_minutes": 45,
///   "location": "Field 2",
///   "icon": "whistle"
/// }
/// ```
///
/// When `duration_minutes` is given the stored `end_time` is computed from
/// it, wrapping past midnight, and any supplied `end_time` is ignored.
#[post("/1/Schedules/<schedule_id>/Items", data = "<new_item>")]
pub async fn create_schedule_item(
    db: DbConn,
    services: &State<SignageServices>,
    schedule_id: i32,
    new_item: LoggedJson<ScheduleItemInput>,
    _admin: AdminToken,
) -> Result<status::Created<Json<ScheduleItem>>, ApiError> {
    let input = new_item.into_inner();
    validate_schedule_item(&input).map_err(invalid)?;
    let now = services.clock.now().naive_utc();

    let result = db
        .run(move |conn| {
            if get_schedule(conn, schedule_id)?.is_none() {
                return Ok(ItemWrite::Missing);
            }
            if let Err(e) = check_icon(conn, &input)? {
                return Ok(ItemWrite::Invalid(e));
            }
            insert_schedule_item(conn, schedule_id, input, now).map(ItemWrite::Done)
        })
        .await;

    match result {
        Ok(ItemWrite::Done(item)) => {
            let location = format!("/api/1/ScheduleItems/{}", item.id);
            Ok(status::Created::new(location).body(Json(item)))
        }
        Ok(ItemWrite::Missing) => Err(not_found("Schedule", schedule_id)),
        Ok(ItemWrite::Invalid(e)) => Err(invalid(e)),
        Err(e) => Err(db_error("creating schedule item", e)),
    }
}

/// Update Schedule Item endpoint.
///
/// - **URL:** `/api/1/ScheduleItems/<item_id>`
/// - **Method:** `PUT`
/// - **Purpose:** Replaces an item's fields and recomputes its end time
/// - **Authentication:** Admin token
#[put("/1/ScheduleItems/<item_id>", data = "<update_data>")]
pub async fn update_schedule_item_endpoint(
    db: DbConn,
    services: &State<SignageServices>,
    item_id: i32,
    update_data: LoggedJson<ScheduleItemInput>,
    _admin: AdminToken,
) -> Result<Json<ScheduleItem>, ApiError> {
    let input = update_data.into_inner();
    validate_schedule_item(&input).map_err(invalid)?;
    let now = services.clock.now().naive_utc();

    let result = db
        .run(move |conn| -> Result<ItemWrite<ScheduleItem>, diesel::result::Error> {
            if let Err(e) = check_icon(conn, &input)? {
                return Ok(ItemWrite::Invalid(e));
            }
            Ok(match update_schedule_item(conn, item_id, input, now)? {
                Some(item) => ItemWrite::Done(item),
                None => ItemWrite::Missing,
            })
        })
        .await;

    match result {
        Ok(ItemWrite::Done(item)) => Ok(Json(item)),
        Ok(ItemWrite::Missing) => Err(not_found("Schedule item", item_id)),
        Ok(ItemWrite::Invalid(e)) => Err(invalid(e)),
        Err(e) => Err(db_error("updating schedule item", e)),
    }
}

/// Delete Schedule Item endpoint.
///
/// - **URL:** `/api/1/ScheduleItems/<item_id>`
/// - **Method:** `DELETE`
/// - **Authentication:** Admin token
///
/// **Success:** HTTP 204 No Content
#[delete("/1/ScheduleItems/<item_id>")]
pub async fn delete_schedule_item_endpoint(
    db: DbConn,
    services: &State<SignageServices>,
    item_id: i32,
    _admin: AdminToken,
) -> Result<Status, ApiError> {
    let now = services.clock.now().naive_utc();
    match db
        .run(move |conn| delete_schedule_item(conn, item_id, now))
        .await
    {
        Ok(true) => Ok(Status::NoContent),
        Ok(false) => Err(not_found("Schedule item", item_id)),
        Err(e) => Err(db_error("deleting schedule item", e)),
    }
}

pub fn routes() -> Vec<Route> {
    routes![
        list_schedule_items,
        create_schedule_item,
        update_schedule_item_endpoint,
        delete_schedule_item_endpoint
    ]
}
