#[macro_use]
extern crate rocket;

use rocket::figment::value::Map;
use rocket::figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use rocket::fs::FileServer;
use rocket::request::Request;
use rocket::serde::json::{Json, Value, json};
use rocket::{Build, Rocket};

pub mod admin_guard;
pub mod api;
pub mod clock;
pub mod config;
pub mod display;
pub mod logged_json;
pub mod models;
pub mod orm;
pub use orm::DbConn;
pub mod resolver;
pub mod schema;
pub mod services;
pub mod validation;
pub mod weather;

#[cfg(test)]
pub mod generate_types;

use config::SignageConfig;
use services::SignageServices;

/// Reasons the server cannot be assembled.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("DATABASE_URL must be set")]
    MissingDatabaseUrl,
    #[error("invalid signage configuration: {0}")]
    Config(#[from] rocket::figment::Error),
    #[error("could not build forecast client: {0}")]
    Forecast(#[from] weather::WeatherError),
}

fn error_body(message: &str, req: &Request, code: u16) -> Json<Value> {
    Json(json!({
        "error": message,
        "path": req.uri().path().to_string(),
        "status": code
    }))
}

#[catch(400)]
fn bad_request(req: &Request) -> Json<Value> {
    error_body("Bad Request", req, 400)
}

#[catch(401)]
fn unauthorized(req: &Request) -> Json<Value> {
    error_body("Unauthorized", req, 401)
}

#[catch(403)]
fn forbidden(req: &Request) -> Json<Value> {
    error_body("Forbidden", req, 403)
}

#[catch(404)]
fn not_found(req: &Request) -> Json<Value> {
    error_body("Not Found", req, 404)
}

#[catch(409)]
fn conflict(req: &Request) -> Json<Value> {
    error_body("Conflict", req, 409)
}

#[catch(422)]
fn unprocessable_entity(req: &Request) -> Json<Value> {
    error_body("Unprocessable Entity", req, 422)
}

#[catch(500)]
fn internal_server_error(req: &Request) -> Json<Value> {
    error_body("Internal Server Error", req, 500)
}

#[catch(default)]
fn default_catcher(status: rocket::http::Status, req: &Request) -> Json<Value> {
    error_body(status.reason().unwrap_or("Unknown Error"), req, status.code)
}

/// Registers the JSON catchers and mounts the admin API at `/api` and the
/// sign's routes at `/display`.
pub fn mount_signage_routes(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .register(
            "/",
            catchers![
                bad_request,
                unauthorized,
                forbidden,
                not_found,
                conflict,
                unprocessable_entity,
                internal_server_error,
                default_catcher
            ],
        )
        .mount("/api", api::routes())
        .mount("/display", api::display::routes())
}

/// Hands `services` to the handlers and mounts everything.
pub fn mount_signage(rocket: Rocket<Build>, services: SignageServices) -> Rocket<Build> {
    mount_signage_routes(rocket.manage(services))
}

fn log_rocket_info(rocket: &Rocket<Build>, config: &SignageConfig) {
    let figment = rocket.figment();

    if let Ok(address) = figment.extract_inner::<String>("address") {
        info!("Rocket is running at: {}", address);
    }
    if let Ok(port) = figment.extract_inner::<u16>("port") {
        info!("Rocket is listening on port: {}", port);
    }

    match figment.extract_inner::<Map<String, Value>>("databases.sqlite_db") {
        Ok(db_config) => {
            if let Some(Value::String(url)) = db_config.get("url") {
                info!("Database URL: {}", url);
            } else {
                warn!("Database URL not found in configuration");
            }
        }
        Err(e) => warn!("Failed to extract database configuration: {}", e),
    }

    info!(
        "Weather: {} (ttl {} min, timeout {} s), default timezone {}",
        config.forecast_base_url,
        config.weather_ttl_minutes,
        config.forecast_timeout_secs,
        config.default_timezone
    );
    if config.admin_token.is_none() {
        warn!("SIGNAGE_ADMIN_TOKEN is not set; the admin API will refuse every request");
    }
}

/// Builds the production server. Tests use `orm::testing::test_rocket`
/// instead, which swaps in an in-memory database, a fixed clock and a
/// scripted forecast provider.
pub fn rocket() -> Result<Rocket<Build>, StartupError> {
    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| StartupError::MissingDatabaseUrl)?;
    let config = SignageConfig::load()?;
    let static_dir = config.static_dir.clone();

    let figment = Figment::from(rocket::Config::default())
        .merge(Toml::file("Rocket.toml").nested())
        .merge(Env::prefixed("ROCKET_").global())
        .merge(("databases.sqlite_db.url", database_url));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(orm::set_foreign_keys_fairing())
        .attach(orm::run_migrations_fairing());

    log_rocket_info(&rocket, &config);

    let services = SignageServices::from_config(config)?;
    Ok(mount_signage(rocket, services).mount("/", FileServer::from(static_dir).rank(10)))
}
