use chrono::{Duration, NaiveDateTime, NaiveTime};
use diesel::{AsChangeset, Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::schedule_items;

/// Longest item duration accepted, one full day.
pub const MAX_DURATION_MINUTES: i32 = 24 * 60;

/// One row of a schedule, e.g. "09:00 Warm-up, Field 2".
#[derive(
    Queryable,
    Selectable,
    Identifiable,
    Associations,
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    TS,
)]
#[diesel(belongs_to(crate::models::schedule::Schedule))]
#[diesel(table_name = schedule_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct ScheduleItem {
    pub id: i32,
    pub schedule_id: i32,
    pub name: Option<String>,
    #[ts(type = "string")]
    pub start_time: NaiveTime,
    pub duration_minutes: Option<i32>,
    #[ts(type = "string | null")]
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub uniform: Option<String>,
    pub lead: Option<String>,
    pub notes: Option<String>,
    /// Built-in icon identifier or the name of a custom icon
    pub icon: Option<String>,
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,
    #[ts(type = "string")]
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = schedule_items)]
pub struct NewScheduleItem {
    pub schedule_id: i32,
    pub name: Option<String>,
    pub start_time: NaiveTime,
    pub duration_minutes: Option<i32>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub uniform: Option<String>,
    pub lead: Option<String>,
    pub notes: Option<String>,
    pub icon: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = schedule_items)]
#[diesel(treat_none_as_null = true)]
pub struct ScheduleItemChangeset {
    pub name: Option<String>,
    pub start_time: NaiveTime,
    pub duration_minutes: Option<i32>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub uniform: Option<String>,
    pub lead: Option<String>,
    pub notes: Option<String>,
    pub icon: Option<String>,
    pub updated_at: NaiveDateTime,
}

/// For API inputs and validation
#[derive(Debug, Clone, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct ScheduleItemInput {
    #[serde(default)]
    pub name: Option<String>,
    #[ts(type = "string")]
    pub start_time: NaiveTime,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    /// Ignored whenever `duration_minutes` is present.
    #[serde(default)]
    #[ts(type = "string | null")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub uniform: Option<String>,
    #[serde(default)]
    pub lead: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// End of an item that starts at `start` and lasts `duration_minutes`.
///
/// Wraps past midnight, so a 23:30 start with 60 minutes ends at 00:30.
pub fn compute_end_time(start: NaiveTime, duration_minutes: i32) -> NaiveTime {
    let (end, _) = start.overflowing_add_signed(Duration::minutes(i64::from(duration_minutes)));
    end
}

/// Blank strings from forms are stored as NULL.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ScheduleItemInput {
    /// The end time that gets stored: derived from the duration when there is
    /// one, otherwise whatever the caller supplied.
    pub fn resolved_end_time(&self) -> Option<NaiveTime> {
        match self.duration_minutes {
            Some(minutes) => Some(compute_end_time(self.start_time, minutes)),
            None => self.end_time,
        }
    }

    pub fn into_new(self, schedule_id: i32, now: NaiveDateTime) -> NewScheduleItem {
        let end_time = self.resolved_end_time();
        NewScheduleItem {
            schedule_id,
            name: non_blank(self.name),
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
            end_time,
            location: non_blank(self.location),
            uniform: non_blank(self.uniform),
            lead: non_blank(self.lead),
            notes: non_blank(self.notes),
            icon: non_blank(self.icon),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_changeset(self, now: NaiveDateTime) -> ScheduleItemChangeset {
        let end_time = self.resolved_end_time();
        ScheduleItemChangeset {
            name: non_blank(self.name),
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
            end_time,
            location: non_blank(self.location),
            uniform: non_blank(self.uniform),
            lead: non_blank(self.lead),
            notes: non_blank(self.notes),
            icon: non_blank(self.icon),
            updated_at: now,
        }
    }
}
