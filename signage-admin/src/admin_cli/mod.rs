pub mod schedule_commands;
pub mod utils;
pub mod weather_commands;
