/*!
 * Signage administrative CLI
 *
 * Works directly against the signage SQLite database named by
 * `DATABASE_URL` (read from the environment or a `.env` file), through the
 * same ORM functions the server uses.
 *
 * - `schedule`: list schedules, pick the default-active one, and show which
 *   schedule the sign would display on a given day
 * - `weather`: inspect and prune the forecast cache
 *
 * Run with --help for the full command list.
 */

use clap::{Parser, Subcommand};

mod admin_cli;

use admin_cli::schedule_commands::{ScheduleAction, handle_schedule_command_with_conn};
use admin_cli::utils::establish_connection;
use admin_cli::weather_commands::{WeatherAction, handle_weather_command_with_conn};

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Parser)]
#[command(name = "signage-admin")]
#[command(about = "Administrative CLI for the signage database")]
#[command(version)]
struct Cli {
    /// Show extended version information
    #[arg(long, action = clap::ArgAction::SetTrue)]
    version_info: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Schedule management")]
    Schedule {
        #[command(subcommand)]
        action: ScheduleAction,
    },
    #[command(about = "Weather cache maintenance")]
    Weather {
        #[command(subcommand)]
        action: WeatherAction,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.version_info {
        println!("signage-admin {}", built_info::PKG_VERSION);
        println!("Built: {}", built_info::BUILT_TIME_UTC);
        if let Some(commit) = built_info::GIT_COMMIT_HASH {
            println!("Git commit: {}", commit);
        }
        return Ok(());
    }

    let Some(command) = cli.command else {
        return Err("no command given; run with --help for usage".into());
    };

    let mut conn = establish_connection()?;
    match command {
        Commands::Schedule { action } => handle_schedule_command_with_conn(&mut conn, action)?,
        Commands::Weather { action } => handle_weather_command_with_conn(&mut conn, action)?,
    }
    Ok(())
}
