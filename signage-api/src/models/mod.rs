pub mod icon;
pub mod schedule;
pub mod schedule_item;
pub mod site_settings;
pub mod weather_cache;

// Re-export models for easier access
pub use icon::*;
pub use schedule::*;
pub use schedule_item::*;
pub use site_settings::*;
pub use weather_cache::*;
