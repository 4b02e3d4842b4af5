use chrono::{NaiveDate, NaiveDateTime};
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::schedules;

/// A named schedule shown on the sign.
///
/// A schedule with a `date` is date-scoped and only applies on that day. A
/// schedule without one is a fallback, applicable only while `is_default` is
/// set.
#[derive(
    Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize, TS,
)]
#[diesel(table_name = schedules)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Schedule {
    pub id: i32,
    pub name: String,
    #[ts(type = "string | null")]
    pub date: Option<NaiveDate>,
    /// The default-active flag. At most one schedule carries it.
    pub is_default: bool,
    /// Whether the sign shows the schedule name above its items
    pub show_name: bool,
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,
    #[ts(type = "string")]
    pub updated_at: NaiveDateTime,
}

impl Schedule {
    /// Undated schedules are only ever shown as the default-active fallback.
    pub fn is_fallback(&self) -> bool {
        self.date.is_none()
    }
}

#[derive(Insertable)]
#[diesel(table_name = schedules)]
pub struct NewSchedule {
    pub name: String,
    pub date: Option<NaiveDate>,
    pub is_default: bool,
    pub show_name: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Replaces every editable column of a schedule.
#[derive(AsChangeset)]
#[diesel(table_name = schedules)]
#[diesel(treat_none_as_null = true)]
pub struct ScheduleChangeset {
    pub name: String,
    pub date: Option<NaiveDate>,
    pub is_default: bool,
    pub show_name: bool,
    pub updated_at: NaiveDateTime,
}

/// For API inputs and validation
#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct ScheduleInput {
    pub name: String,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "default_show_name")]
    pub show_name: bool,
}

fn default_show_name() -> bool {
    true
}

impl ScheduleInput {
    pub fn into_new(self, now: NaiveDateTime) -> NewSchedule {
        NewSchedule {
            name: self.name.trim().to_string(),
            date: self.date,
            is_default: self.is_default,
            show_name: self.show_name,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_changeset(self, now: NaiveDateTime) -> ScheduleChangeset {
        ScheduleChangeset {
            name: self.name.trim().to_string(),
            date: self.date,
            is_default: self.is_default,
            show_name: self.show_name,
            updated_at: now,
        }
    }
}
