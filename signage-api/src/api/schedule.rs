//! Admin endpoints for schedules.
//!
//! Flagging a schedule `is_default` takes the flag away from every other
//! schedule in the same transaction. Deleting a schedule deletes its items.

use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{Route, State};

use super::{ApiError, db_error, invalid, not_found};
use crate::admin_guard::AdminToken;
use crate::logged_json::LoggedJson;
use crate::models::{Schedule, ScheduleInput};
use crate::orm::DbConn;
use crate::orm::schedule::{
    delete_schedule, get_schedule, insert_schedule, list_schedules, update_schedule,
};
use crate::services::SignageServices;
use crate::validation::validate_schedule;

/// List Schedules endpoint.
///
/// - **URL:** `/api/1/Schedules`
/// - **Method:** `GET`
/// - **Purpose:** All schedules, dated ones first (newest date first), then
///   undated fallbacks
/// - **Authentication:** Admin token
#[get("/1/Schedules")]
pub async fn list_schedules_endpoint(
    db: DbConn,
    _admin: AdminToken,
) -> Result<Json<Vec<Schedule>>, ApiError> {
    db.run(|conn| list_schedules(conn))
        .await
        .map(Json)
        .map_err(|e| db_error("listing schedules", e))
}

/// Create Schedule endpoint.
///
/// - **URL:** `/api/1/Schedules`
/// - **Method:** `POST`
/// - **Purpose:** Creates a schedule
/// - **Authentication:** Admin token
///
/// # Request Format
///
/// ```json
/// {
///   "name": "Tournament Day",
///   "date": "2025-06-01",
///   "is_default": false,
///   "show_name": true
/// }
/// ```
///
/// `date`, `is_default` and `show_name` may be omitted (null, false, true).
#[post("/1/Schedules", data = "<new_schedule>")]
pub async fn create_schedule(
    db: DbConn,
    services: &State<SignageServices>,
    new_schedule: LoggedJson<ScheduleInput>,
    _admin: AdminToken,
) -> Result<status::Created<Json<Schedule>>, ApiError> {
    let input = new_schedule.into_inner();
    validate_schedule(&input).map_err(invalid)?;
    let now = services.clock.now().naive_utc();

    db.run(move |conn| insert_schedule(conn, input.into_new(now)))
        .await
        .map(|schedule| {
            let location = format!("/api/1/Schedules/{}", schedule.id);
            status::Created::new(location).body(Json(schedule))
        })
        .map_err(|e| db_error("creating schedule", e))
}

/// Get Schedule endpoint.
///
/// - **URL:** `/api/1/Schedules/<schedule_id>`
/// - **Method:** `GET`
/// - **Authentication:** Admin token
#[get("/1/Schedules/<schedule_id>")]
pub async fn get_schedule_endpoint(
    db: DbConn,
    schedule_id: i32,
    _admin: AdminToken,
) -> Result<Json<Schedule>, ApiError> {
    match db.run(move |conn| get_schedule(conn, schedule_id)).await {
        Ok(Some(schedule)) => Ok(Json(schedule)),
        Ok(None) => Err(not_found("Schedule", schedule_id)),
        Err(e) => Err(db_error("getting schedule", e)),
    }
}

/// Update Schedule endpoint.
///
/// - **URL:** `/api/1/Schedules/<schedule_id>`
/// - **Method:** `PUT`
/// - **Purpose:** Replaces a schedule's name, date and flags
/// - **Authentication:** Admin token
///
/// Takes the same body as create. Omitted fields take their defaults.
#[put("/1/Schedules/<schedule_id>", data = "<update_data>")]
pub async fn update_schedule_endpoint(
    db: DbConn,
    services: &State<SignageServices>,
    schedule_id: i32,
    update_data: LoggedJson<ScheduleInput>,
    _admin: AdminToken,
) -> Result<Json<Schedule>, ApiError> {
    let input = update_data.into_inner();
    validate_schedule(&input).map_err(invalid)?;
    let now = services.clock.now().naive_utc();

    match db
        .run(move |conn| update_schedule(conn, schedule_id, input.into_changeset(now)))
        .await
    {
        Ok(Some(schedule)) => Ok(Json(schedule)),
        Ok(None) => Err(not_found("Schedule", schedule_id)),
        Err(e) => Err(db_error("updating schedule", e)),
    }
}

/// Delete Schedule endpoint.
///
/// - **URL:** `/api/1/Schedules/<schedule_id>`
/// - **Method:** `DELETE`
/// - **Purpose:** Deletes a schedule together with its items
/// - **Authentication:** Admin token
///
/// **Success:** HTTP 204 No Content
#[delete("/1/Schedules/<schedule_id>")]
pub async fn delete_schedule_endpoint(
    db: DbConn,
    schedule_id: i32,
    _admin: AdminToken,
) -> Result<Status, ApiError> {
    match db.run(move |conn| delete_schedule(conn, schedule_id)).await {
        Ok(true) => Ok(Status::NoContent),
        Ok(false) => Err(not_found("Schedule", schedule_id)),
        Err(e) => Err(db_error("deleting schedule", e)),
    }
}

pub fn routes() -> Vec<Route> {
    routes![
        list_schedules_endpoint,
        create_schedule,
        get_schedule_endpoint,
        update_schedule_endpoint,
        delete_schedule_endpoint
    ]
}
