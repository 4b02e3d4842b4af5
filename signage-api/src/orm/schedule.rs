use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::models::{NewSchedule, Schedule, ScheduleChangeset};
use crate::resolver::resolve_active_schedule;

/// Gets all schedules, dated ones first (newest date first), then fallbacks.
pub fn list_schedules(conn: &mut SqliteConnection) -> Result<Vec<Schedule>, diesel::result::Error> {
    use crate::schema::schedules::dsl::*;
    schedules
        .order((date.is_null().asc(), date.desc(), id.asc()))
        .select(Schedule::as_select())
        .load(conn)
}

pub fn get_schedule(
    conn: &mut SqliteConnection,
    schedule_id: i32,
) -> Result<Option<Schedule>, diesel::result::Error> {
    use crate::schema::schedules::dsl::*;
    schedules
        .filter(id.eq(schedule_id))
        .select(Schedule::as_select())
        .first(conn)
        .optional()
}

/// Clears the default-active flag on every schedule except `keep_id`,
/// returning how many rows lost it.
fn clear_other_defaults(
    conn: &mut SqliteConnection,
    keep_id: Option<i32>,
    now: NaiveDateTime,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::schedules::dsl::*;
    match keep_id {
        Some(keep) => diesel::update(schedules.filter(is_default.eq(true)).filter(id.ne(keep)))
            .set((is_default.eq(false), updated_at.eq(now)))
            .execute(conn),
        None => diesel::update(schedules.filter(is_default.eq(true)))
            .set((is_default.eq(false), updated_at.eq(now)))
            .execute(conn),
    }
}

/// Creates a schedule. When it is flagged default-active, the flag is taken
/// away from every other schedule in the same transaction.
pub fn insert_schedule(
    conn: &mut SqliteConnection,
    new_schedule: NewSchedule,
) -> Result<Schedule, diesel::result::Error> {
    use crate::schema::schedules::dsl::*;

    conn.transaction(|conn| {
        if new_schedule.is_default {
            clear_other_defaults(conn, None, new_schedule.updated_at)?;
        }
        diesel::insert_into(schedules).values(&new_schedule).execute(conn)?;
        schedules
            .order(id.desc())
            .select(Schedule::as_select())
            .first(conn)
    })
}

/// Replaces the editable columns of a schedule. Returns `None` if it does not
/// exist.
pub fn update_schedule(
    conn: &mut SqliteConnection,
    schedule_id: i32,
    changes: ScheduleChangeset,
) -> Result<Option<Schedule>, diesel::result::Error> {
    use crate::schema::schedules::dsl::*;

    conn.transaction(|conn| {
        if get_schedule(conn, schedule_id)?.is_none() {
            return Ok(None);
        }
        if changes.is_default {
            clear_other_defaults(conn, Some(schedule_id), changes.updated_at)?;
        }
        diesel::update(schedules.filter(id.eq(schedule_id)))
            .set(&changes)
            .execute(conn)?;
        get_schedule(conn, schedule_id)
    })
}

/// Makes `schedule_id` the one default-active schedule.
pub fn set_default_schedule(
    conn: &mut SqliteConnection,
    schedule_id: i32,
    now: NaiveDateTime,
) -> Result<Option<Schedule>, diesel::result::Error> {
    use crate::schema::schedules::dsl::*;

    conn.transaction(|conn| {
        if get_schedule(conn, schedule_id)?.is_none() {
            return Ok(None);
        }
        clear_other_defaults(conn, Some(schedule_id), now)?;
        diesel::update(schedules.filter(id.eq(schedule_id)))
            .set((is_default.eq(true), updated_at.eq(now)))
            .execute(conn)?;
        get_schedule(conn, schedule_id)
    })
}

/// Leaves no schedule default-active. Returns how many rows were changed.
pub fn clear_default_schedule(
    conn: &mut SqliteConnection,
    now: NaiveDateTime,
) -> Result<usize, diesel::result::Error> {
    clear_other_defaults(conn, None, now)
}

/// Bumps a schedule's `updated_at` so the change-detection probe sees edits
/// made to its items.
pub fn touch_schedule(
    conn: &mut SqliteConnection,
    schedule_id: i32,
    now: NaiveDateTime,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::schedules::dsl::*;
    diesel::update(schedules.filter(id.eq(schedule_id)))
        .set(updated_at.eq(now))
        .execute(conn)
}

/// Deletes a schedule and its items. Returns false if the schedule did not
/// exist.
pub fn delete_schedule(
    conn: &mut SqliteConnection,
    schedule_id: i32,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::{schedule_items, schedules};

    conn.transaction(|conn| {
        diesel::delete(schedule_items::table.filter(schedule_items::schedule_id.eq(schedule_id)))
            .execute(conn)?;
        let deleted = diesel::delete(schedules::table.filter(schedules::id.eq(schedule_id)))
            .execute(conn)?;
        Ok(deleted > 0)
    })
}

/// Loads only the rows that could be active on `today`: those dated today
/// and undated default-active fallbacks.
pub fn get_candidate_schedules(
    conn: &mut SqliteConnection,
    today: NaiveDate,
) -> Result<Vec<Schedule>, diesel::result::Error> {
    use crate::schema::schedules::dsl::*;
    schedules
        .filter(date.eq(today).or(date.is_null().and(is_default.eq(true))))
        .select(Schedule::as_select())
        .load(conn)
}

/// The active schedule for `today`. Display rendering and change detection
/// both go through here so they can never disagree.
pub fn get_active_schedule(
    conn: &mut SqliteConnection,
    today: NaiveDate,
) -> Result<Option<Schedule>, diesel::result::Error> {
    let candidates = get_candidate_schedules(conn, today)?;
    Ok(resolve_active_schedule(&candidates, today).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ScheduleInput, ScheduleItemInput};
    use crate::orm::schedule_item::{insert_schedule_item, list_items_for_schedule};
    use crate::orm::testing::setup_test_db;
    use chrono::NaiveTime;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn input(name: &str, date: Option<NaiveDate>, is_default: bool) -> ScheduleInput {
        ScheduleInput {
            name: name.to_string(),
            date,
            is_default,
            show_name: true,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn insert_and_get_schedule() {
        let mut conn = setup_test_db();
        let created = insert_schedule(&mut conn, input(" Game day ", Some(day(1)), false).into_new(at(1, 8)))
            .expect("insert should succeed");
        assert_eq!(created.name, "Game day");
        assert_eq!(created.updated_at, at(1, 8));

        let fetched = get_schedule(&mut conn, created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(get_schedule(&mut conn, created.id + 100).unwrap().is_none());
    }

    #[test]
    fn new_default_clears_existing_default() {
        let mut conn = setup_test_db();
        let first = insert_schedule(&mut conn, input("Week", None, true).into_new(at(1, 8))).unwrap();
        let second = insert_schedule(&mut conn, input("Camp", None, true).into_new(at(2, 8))).unwrap();

        let first = get_schedule(&mut conn, first.id).unwrap().unwrap();
        assert!(!first.is_default);
        assert_eq!(first.updated_at, at(2, 8));
        assert!(second.is_default);

        let defaults = list_schedules(&mut conn)
            .unwrap()
            .into_iter()
            .filter(|s| s.is_default)
            .count();
        assert_eq!(defaults, 1);
    }

    #[test]
    fn update_to_default_clears_others() {
        let mut conn = setup_test_db();
        let a = insert_schedule(&mut conn, input("A", None, true).into_new(at(1, 8))).unwrap();
        let b = insert_schedule(&mut conn, input("B", None, false).into_new(at(1, 9))).unwrap();

        let b = update_schedule(&mut conn, b.id, input("B", None, true).into_changeset(at(2, 8)))
            .unwrap()
            .unwrap();
        assert!(b.is_default);
        assert!(!get_schedule(&mut conn, a.id).unwrap().unwrap().is_default);
    }

    #[test]
    fn update_missing_schedule_returns_none() {
        let mut conn = setup_test_db();
        let result = update_schedule(&mut conn, 42, input("X", None, false).into_changeset(at(1, 8)));
        assert_eq!(result.unwrap(), None);
    }

    #[test]
    fn set_and_clear_default_schedule() {
        let mut conn = setup_test_db();
        let a = insert_schedule(&mut conn, input("A", None, true).into_new(at(1, 8))).unwrap();
        let b = insert_schedule(&mut conn, input("B", None, false).into_new(at(1, 8))).unwrap();

        set_default_schedule(&mut conn, b.id, at(2, 8)).unwrap().unwrap();
        assert!(!get_schedule(&mut conn, a.id).unwrap().unwrap().is_default);
        assert!(get_schedule(&mut conn, b.id).unwrap().unwrap().is_default);

        assert_eq!(clear_default_schedule(&mut conn, at(3, 8)).unwrap(), 1);
        assert!(get_active_schedule(&mut conn, day(5)).unwrap().is_none());
    }

    #[test]
    fn delete_removes_items() {
        let mut conn = setup_test_db();
        let s = insert_schedule(&mut conn, input("A", Some(day(1)), false).into_new(at(1, 8))).unwrap();
        let item = ScheduleItemInput {
            name: Some("Warm-up".to_string()),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            ..Default::default()
        };
        insert_schedule_item(&mut conn, s.id, item, at(1, 9)).unwrap();

        assert!(delete_schedule(&mut conn, s.id).unwrap());
        assert!(get_schedule(&mut conn, s.id).unwrap().is_none());
        assert!(list_items_for_schedule(&mut conn, s.id).unwrap().is_empty());
        assert!(!delete_schedule(&mut conn, s.id).unwrap());
    }

    #[test]
    fn active_schedule_follows_the_date() {
        let mut conn = setup_test_db();
        let a = insert_schedule(&mut conn, input("A", Some(day(1)), false).into_new(at(1, 8))).unwrap();
        let b = insert_schedule(&mut conn, input("B", None, true).into_new(at(1, 8))).unwrap();
        insert_schedule(&mut conn, input("C", None, false).into_new(at(1, 8))).unwrap();

        assert_eq!(get_active_schedule(&mut conn, day(1)).unwrap().map(|s| s.id), Some(a.id));
        assert_eq!(get_active_schedule(&mut conn, day(2)).unwrap().map(|s| s.id), Some(b.id));
    }

    #[test]
    fn candidates_exclude_other_days_and_plain_fallbacks() {
        let mut conn = setup_test_db();
        insert_schedule(&mut conn, input("Yesterday", Some(day(1)), false).into_new(at(1, 8))).unwrap();
        insert_schedule(&mut conn, input("Plain", None, false).into_new(at(1, 8))).unwrap();
        let today = insert_schedule(&mut conn, input("Today", Some(day(2)), false).into_new(at(1, 8))).unwrap();

        let candidates = get_candidate_schedules(&mut conn, day(2)).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, today.id);
    }

    #[test]
    fn touch_bumps_updated_at() {
        let mut conn = setup_test_db();
        let s = insert_schedule(&mut conn, input("A", None, false).into_new(at(1, 8))).unwrap();
        assert_eq!(touch_schedule(&mut conn, s.id, at(4, 12)).unwrap(), 1);
        assert_eq!(get_schedule(&mut conn, s.id).unwrap().unwrap().updated_at, at(4, 12));
    }
}
