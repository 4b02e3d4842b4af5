//! HTTP surface.
//!
//! Admin routes live under `/api/1/...` and require an `AdminToken`. The
//! sign's own routes are mounted separately at `/display`.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rocket::Route;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde::Serialize;
use ts_rs::TS;

use crate::validation::ValidationError;

pub mod display;
pub mod icon;
pub mod schedule;
pub mod schedule_item;
pub mod settings;
pub mod status;
pub mod weather_cache;

/// Body of every handler-level error.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = Custom<Json<ErrorResponse>>;

pub fn api_error(code: Status, message: impl Into<String>) -> ApiError {
    Custom(
        code,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub fn not_found(what: &str, id: i32) -> ApiError {
    api_error(Status::NotFound, format!("{} {} not found", what, id))
}

pub fn invalid(e: ValidationError) -> ApiError {
    api_error(Status::BadRequest, e.to_string())
}

/// Maps a database failure to a response. Constraint violations are the
/// caller's fault; anything else is logged and reported as a 500.
pub fn db_error(context: &str, e: DieselError) -> ApiError {
    match e {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            api_error(Status::Conflict, format!("Conflict while {}: name already in use", context))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => api_error(
            Status::BadRequest,
            format!("Invalid reference while {}", context),
        ),
        other => {
            error!("Database error while {}: {:?}", context, other);
            api_error(
                Status::InternalServerError,
                format!("Internal server error while {}", context),
            )
        }
    }
}

/// Admin API routes, mounted at `/api`.
pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(status::routes());
    routes.extend(schedule::routes());
    routes.extend(schedule_item::routes());
    routes.extend(settings::routes());
    routes.extend(icon::routes());
    routes.extend(weather_cache::routes());
    routes
}
