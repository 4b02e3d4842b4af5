//! Health check for monitoring.

use diesel::RunQueryDsl;
use rocket::{Route, serde::json::Json};
use serde::Serialize;
use ts_rs::TS;

use crate::orm::DbConn;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Serialize, TS)]
#[ts(export)]
pub struct HealthStatus {
    status: &'static str,
    database: &'static str,
    version: &'static str,
    built: &'static str,
    git_commit: Option<&'static str>,
}

/// Health Status endpoint.
///
/// - **URL:** `/api/1/status`
/// - **Method:** `GET`
/// - **Authentication:** None required
///
/// `status` is "running" whenever the process answers; `database` is "ok"
/// or "unavailable" depending on whether a trivial query succeeds.
///
/// # Response
///
/// **Success (HTTP 200 OK):**
/// ```json
/// {
///   "status": "running",
///   "database": "ok",
///   "version": "0.1.0",
///   "built": "Sun, 01 Jun 2025 08:00:00 +0000",
///   "git_commit": null
/// }
/// ```
#[get("/1/status")]
pub async fn health_status(db: DbConn) -> Json<HealthStatus> {
    let database = match db
        .run(|conn| diesel::sql_query("SELECT 1").execute(conn))
        .await
    {
        Ok(_) => "ok",
        Err(e) => {
            error!("Health check query failed: {:?}", e);
            "unavailable"
        }
    };

    Json(HealthStatus {
        status: "running",
        database,
        version: env!("CARGO_PKG_VERSION"),
        built: built_info::BUILT_TIME_UTC,
        git_commit: built_info::GIT_COMMIT_HASH,
    })
}

pub fn routes() -> Vec<Route> {
    routes![health_status]
}
