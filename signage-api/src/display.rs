//! What the sign shows, and the cheap probe that tells it when to look again.
//!
//! Both `check_updates` and `load_display_snapshot` decide the active
//! schedule through `orm::schedule::get_active_schedule`, so a poll never
//! names a different schedule than the render it triggers.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::{
    DEFAULT_BACKGROUND_IMAGE_SIZE, DEFAULT_BG_COLOR, DEFAULT_BOX_COLOR, DEFAULT_LOGO_SIZE,
    DEFAULT_OPACITY, DEFAULT_SCHEDULE_COLOR, DEFAULT_TEXT_COLOR, Icon, Schedule, ScheduleItem,
    SiteSettings,
};
use crate::orm::icon::list_icons;
use crate::orm::schedule::get_active_schedule;
use crate::orm::schedule_item::list_items_for_schedule;
use crate::orm::site_settings::get_site_settings;
use crate::weather::WeatherReport;

/// The site's zone: the settings timezone when it names a real zone,
/// otherwise `default_tz`.
pub fn site_timezone(settings: Option<&SiteSettings>, default_tz: Tz) -> Tz {
    settings
        .and_then(|s| s.timezone.as_deref())
        .and_then(|name| name.trim().parse::<Tz>().ok())
        .unwrap_or(default_tz)
}

/// The site's calendar date at `now`.
pub fn local_today(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Answer to `GET /display/check-updates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateStatus {
    #[ts(type = "string | null")]
    pub settings_updated_at: Option<NaiveDateTime>,
    #[ts(type = "string | null")]
    pub schedule_updated_at: Option<NaiveDateTime>,
    pub schedule_id: Option<i32>,
    pub has_active_schedule: bool,
}

/// Snapshot of the timestamps the display client compares between polls.
pub fn check_updates(
    conn: &mut SqliteConnection,
    now: DateTime<Utc>,
    default_tz: Tz,
) -> Result<UpdateStatus, diesel::result::Error> {
    let settings = get_site_settings(conn)?;
    let settings_updated_at = settings.as_ref().map(|s| s.updated_at);
    let today = local_today(now, site_timezone(settings.as_ref(), default_tz));
    let active = get_active_schedule(conn, today)?;

    Ok(UpdateStatus {
        settings_updated_at,
        schedule_updated_at: active.as_ref().map(|s| s.updated_at),
        schedule_id: active.as_ref().map(|s| s.id),
        has_active_schedule: active.is_some(),
    })
}

/// Everything the render needs from the database, read in one go. Items are
/// queried by the id of the schedule that was just resolved.
#[derive(Debug, Clone)]
pub struct DisplaySnapshot {
    pub settings: Option<SiteSettings>,
    pub timezone: Tz,
    pub active_schedule: Option<Schedule>,
    pub items: Vec<ScheduleItem>,
    pub icons: Vec<Icon>,
}

pub fn load_display_snapshot(
    conn: &mut SqliteConnection,
    now: DateTime<Utc>,
    default_tz: Tz,
) -> Result<DisplaySnapshot, diesel::result::Error> {
    let settings = get_site_settings(conn)?;
    let timezone = site_timezone(settings.as_ref(), default_tz);
    let active_schedule = get_active_schedule(conn, local_today(now, timezone))?;
    let items = match &active_schedule {
        Some(schedule) => list_items_for_schedule(conn, schedule.id)?,
        None => Vec::new(),
    };
    let icons = list_icons(conn)?;

    Ok(DisplaySnapshot {
        settings,
        timezone,
        active_schedule,
        items,
        icons,
    })
}

/// Appearance and location as the sign uses them, with defaults filled in
/// for anything never saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DisplaySettings {
    pub logo_path: Option<String>,
    pub logo_size: i32,
    pub background_image_path: Option<String>,
    pub background_image_size: String,
    pub notes_left_col: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// The zone actually in effect, never empty
    pub timezone: String,
    pub bg_color: String,
    pub text_color: String,
    pub box_color: String,
    pub box_opacity: f64,
    pub schedule_color: String,
    pub schedule_opacity: f64,
    #[ts(type = "string | null")]
    pub updated_at: Option<NaiveDateTime>,
}

impl DisplaySettings {
    pub fn resolve(settings: Option<SiteSettings>, timezone: Tz) -> Self {
        match settings {
            Some(s) => DisplaySettings {
                logo_path: s.logo_path,
                logo_size: s.logo_size.unwrap_or(DEFAULT_LOGO_SIZE),
                background_image_path: s.background_image_path,
                background_image_size: s
                    .background_image_size
                    .unwrap_or_else(|| DEFAULT_BACKGROUND_IMAGE_SIZE.to_string()),
                notes_left_col: s.notes_left_col,
                latitude: s.latitude,
                longitude: s.longitude,
                timezone: timezone.name().to_string(),
                bg_color: s.bg_color,
                text_color: s.text_color,
                box_color: s.box_color,
                box_opacity: s.box_opacity,
                schedule_color: s.schedule_color,
                schedule_opacity: s.schedule_opacity,
                updated_at: Some(s.updated_at),
            },
            None => DisplaySettings {
                logo_path: None,
                logo_size: DEFAULT_LOGO_SIZE,
                background_image_path: None,
                background_image_size: DEFAULT_BACKGROUND_IMAGE_SIZE.to_string(),
                notes_left_col: None,
                latitude: None,
                longitude: None,
                timezone: timezone.name().to_string(),
                bg_color: DEFAULT_BG_COLOR.to_string(),
                text_color: DEFAULT_TEXT_COLOR.to_string(),
                box_color: DEFAULT_BOX_COLOR.to_string(),
                box_opacity: DEFAULT_OPACITY,
                schedule_color: DEFAULT_SCHEDULE_COLOR.to_string(),
                schedule_opacity: DEFAULT_OPACITY,
                updated_at: None,
            },
        }
    }
}

/// The full render payload served at `GET /display`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DisplayPayload {
    pub settings: DisplaySettings,
    pub active_schedule: Option<Schedule>,
    pub items: Vec<ScheduleItem>,
    pub weather: WeatherReport,
    /// Custom icons by name
    pub icons: BTreeMap<String, Icon>,
}

pub fn assemble_display(snapshot: DisplaySnapshot, weather: WeatherReport) -> DisplayPayload {
    let icons = snapshot
        .icons
        .into_iter()
        .map(|icon| (icon.name.clone(), icon))
        .collect();

    DisplayPayload {
        settings: DisplaySettings::resolve(snapshot.settings, snapshot.timezone),
        active_schedule: snapshot.active_schedule,
        items: snapshot.items,
        weather,
        icons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IconFace, IconInput, ScheduleInput, ScheduleItemInput, SettingsInput};
    use crate::orm::icon::insert_icon;
    use crate::orm::schedule::insert_schedule;
    use crate::orm::schedule_item::insert_schedule_item;
    use crate::orm::site_settings::save_site_settings;
    use crate::orm::testing::setup_test_db;
    use crate::weather::{SET_LOCATION, WeatherReport};
    use chrono::{NaiveTime, TimeZone};

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn written() -> NaiveDateTime {
        june(1).and_hms_opt(7, 0, 0).unwrap()
    }

    fn schedule(conn: &mut SqliteConnection, name: &str, date: Option<NaiveDate>, is_default: bool) -> Schedule {
        let input = ScheduleInput {
            name: name.to_string(),
            date,
            is_default,
            show_name: true,
        };
        insert_schedule(conn, input.into_new(written())).unwrap()
    }

    #[test]
    fn timezone_falls_back_when_missing_or_invalid() {
        assert_eq!(site_timezone(None, Tz::UTC), Tz::UTC);

        let mut conn = setup_test_db();
        let bogus = save_site_settings(
            &mut conn,
            SettingsInput {
                timezone: Some("Not/AZone".to_string()),
                ..Default::default()
            },
            written(),
        )
        .unwrap();
        assert_eq!(site_timezone(Some(&bogus), chrono_tz::Europe::Paris), chrono_tz::Europe::Paris);

        let chicago = save_site_settings(
            &mut conn,
            SettingsInput {
                timezone: Some("America/Chicago".to_string()),
                ..Default::default()
            },
            written(),
        )
        .unwrap();
        assert_eq!(site_timezone(Some(&chicago), Tz::UTC), chrono_tz::America::Chicago);
    }

    #[test]
    fn local_today_uses_the_zone() {
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 3, 0, 0).unwrap();
        assert_eq!(local_today(now, Tz::UTC), june(2));
        assert_eq!(local_today(now, chrono_tz::America::Chicago), june(1));
    }

    #[test]
    fn check_updates_with_empty_database() {
        let mut conn = setup_test_db();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let status = check_updates(&mut conn, now, Tz::UTC).unwrap();
        assert_eq!(
            status,
            UpdateStatus {
                settings_updated_at: None,
                schedule_updated_at: None,
                schedule_id: None,
                has_active_schedule: false,
            }
        );
    }

    #[test]
    fn check_updates_agrees_with_snapshot() {
        let mut conn = setup_test_db();
        let a = schedule(&mut conn, "A", Some(june(1)), false);
        let b = schedule(&mut conn, "B", None, true);

        for (day, expected) in [(1, a.id), (2, b.id)] {
            let now = Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap();
            let status = check_updates(&mut conn, now, Tz::UTC).unwrap();
            let snapshot = load_display_snapshot(&mut conn, now, Tz::UTC).unwrap();
            assert_eq!(status.schedule_id, Some(expected));
            assert_eq!(snapshot.active_schedule.map(|s| s.id), status.schedule_id);
            assert!(status.has_active_schedule);
        }
    }

    #[test]
    fn snapshot_uses_site_local_date() {
        let mut conn = setup_test_db();
        save_site_settings(
            &mut conn,
            SettingsInput {
                timezone: Some("America/Chicago".to_string()),
                ..Default::default()
            },
            written(),
        )
        .unwrap();
        let a = schedule(&mut conn, "A", Some(june(1)), false);
        schedule(&mut conn, "B", Some(june(2)), false);

        // 2025-06-02 03:00 UTC is still June 1st in Chicago.
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 3, 0, 0).unwrap();
        let snapshot = load_display_snapshot(&mut conn, now, Tz::UTC).unwrap();
        assert_eq!(snapshot.timezone, chrono_tz::America::Chicago);
        assert_eq!(snapshot.active_schedule.map(|s| s.id), Some(a.id));
    }

    #[test]
    fn payload_fills_defaults_and_keys_icons_by_name() {
        let mut conn = setup_test_db();
        let s = schedule(&mut conn, "A", Some(june(1)), false);
        for (hour, name) in [(14, "Lunch"), (9, "Warm-up")] {
            let item = ScheduleItemInput {
                name: Some(name.to_string()),
                start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
                ..Default::default()
            };
            insert_schedule_item(&mut conn, s.id, item, written()).unwrap();
        }
        insert_icon(
            &mut conn,
            IconInput {
                name: "ball".to_string(),
                enabled: true,
                face: IconFace::Glyph {
                    characters: "B".to_string(),
                    font: "Impact".to_string(),
                },
            },
            written(),
        )
        .unwrap();

        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let snapshot = load_display_snapshot(&mut conn, now, Tz::UTC).unwrap();
        let payload = assemble_display(snapshot, WeatherReport::degraded(SET_LOCATION));

        assert_eq!(payload.settings.timezone, "UTC");
        assert_eq!(payload.settings.bg_color, DEFAULT_BG_COLOR);
        assert_eq!(payload.settings.logo_size, DEFAULT_LOGO_SIZE);
        assert_eq!(payload.settings.updated_at, None);
        let names: Vec<_> = payload.items.iter().filter_map(|i| i.name.clone()).collect();
        assert_eq!(names, vec!["Warm-up", "Lunch"]);
        assert_eq!(payload.icons["ball"].font.as_deref(), Some("Impact"));
    }

    #[test]
    fn no_active_schedule_means_no_items() {
        let mut conn = setup_test_db();
        let s = schedule(&mut conn, "Other day", Some(june(3)), false);
        let item = ScheduleItemInput {
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            ..Default::default()
        };
        insert_schedule_item(&mut conn, s.id, item, written()).unwrap();

        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let snapshot = load_display_snapshot(&mut conn, now, Tz::UTC).unwrap();
        assert!(snapshot.active_schedule.is_none());
        assert!(snapshot.items.is_empty());
    }
}
