mod db;
pub mod icon;
pub mod schedule;
pub mod schedule_item;
pub mod site_settings;
#[cfg(any(test, feature = "test-staging"))]
pub mod testing;
pub mod weather_cache;

pub use db::*;
