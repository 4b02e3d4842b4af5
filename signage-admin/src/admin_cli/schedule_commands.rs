use chrono::Utc;
use clap::Subcommand;
use diesel::sqlite::SqliteConnection;
use signage_api::config::SignageConfig;
use signage_api::display::{local_today, site_timezone};
use signage_api::models::Schedule;
use signage_api::orm::schedule::{
    clear_default_schedule, get_active_schedule, list_schedules, set_default_schedule,
};
use signage_api::orm::schedule_item::list_items_for_schedule;
use signage_api::orm::site_settings::get_site_settings;

use super::utils::{name_matcher, now_utc, parse_date};

#[derive(Subcommand)]
pub enum ScheduleAction {
    #[command(about = "List schedules, optionally filtered by search term")]
    Ls {
        #[arg(help = "Search term (regex by default, use -F for fixed string)")]
        search_term: Option<String>,
        #[arg(
            short = 'F',
            long = "fixed-string",
            help = "Treat search term as fixed string instead of regex"
        )]
        fixed_string: bool,
    },
    #[command(about = "Make a schedule the default-active fallback")]
    Activate {
        #[arg(help = "Schedule ID")]
        id: i32,
    },
    #[command(about = "Clear the default-active flag from every schedule")]
    Deactivate,
    #[command(about = "Show the schedule the sign would display")]
    ShowActive {
        #[arg(long, help = "Date to resolve for (YYYY-MM-DD, default: today at the site)")]
        date: Option<String>,
    },
}

pub fn handle_schedule_command_with_conn(
    conn: &mut SqliteConnection,
    action: ScheduleAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ScheduleAction::Ls {
            search_term,
            fixed_string,
        } => schedule_ls_impl(conn, search_term, fixed_string),
        ScheduleAction::Activate { id } => schedule_activate_impl(conn, id),
        ScheduleAction::Deactivate => schedule_deactivate_impl(conn),
        ScheduleAction::ShowActive { date } => schedule_show_active_impl(conn, date),
    }
}

fn describe(schedule: &Schedule) -> String {
    let date = schedule
        .date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "undated".to_string());
    let flag = if schedule.is_default { " [default]" } else { "" };
    format!("ID: {}, Name: {}, Date: {}{}", schedule.id, schedule.name, date, flag)
}

pub fn schedule_ls_impl(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let matches = name_matcher(search_term, fixed_string)?;
    let schedules: Vec<Schedule> = list_schedules(conn)?
        .into_iter()
        .filter(|s| matches(&s.name))
        .collect();

    if schedules.is_empty() {
        println!("No schedules found.");
        return Ok(());
    }

    println!("Found {} schedule(s):", schedules.len());
    for schedule in &schedules {
        println!("  {}", describe(schedule));
    }
    Ok(())
}

pub fn schedule_activate_impl(
    conn: &mut SqliteConnection,
    id: i32,
) -> Result<(), Box<dyn std::error::Error>> {
    match set_default_schedule(conn, id, now_utc())? {
        Some(schedule) => {
            println!("Schedule is now default-active: {}", describe(&schedule));
            if schedule.date.is_some() {
                println!(
                    "Note: dated schedules only show on their own date; the flag matters for undated ones."
                );
            }
            Ok(())
        }
        None => Err(format!("Schedule with ID {} does not exist", id).into()),
    }
}

pub fn schedule_deactivate_impl(conn: &mut SqliteConnection) -> Result<(), Box<dyn std::error::Error>> {
    let changed = clear_default_schedule(conn, now_utc())?;
    if changed == 0 {
        println!("No schedule was default-active.");
    } else {
        println!("Cleared the default-active flag from {} schedule(s).", changed);
    }
    Ok(())
}

pub fn schedule_show_active_impl(
    conn: &mut SqliteConnection,
    date: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let today = match date {
        Some(value) => parse_date(&value)?,
        None => {
            let default_tz = SignageConfig::load()?.default_tz();
            let settings = get_site_settings(conn)?;
            local_today(Utc::now(), site_timezone(settings.as_ref(), default_tz))
        }
    };

    let Some(schedule) = get_active_schedule(conn, today)? else {
        println!("No active schedule for {}.", today);
        return Ok(());
    };

    println!("Active schedule for {}: {}", today, describe(&schedule));
    let items = list_items_for_schedule(conn, schedule.id)?;
    if items.is_empty() {
        println!("  (no items)");
    }
    for item in items {
        let end = item
            .end_time
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default();
        println!(
            "  {}-{} {}",
            item.start_time.format("%H:%M"),
            end,
            item.name.as_deref().unwrap_or("")
        );
    }
    Ok(())
}
