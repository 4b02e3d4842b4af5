use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::models::{ScheduleItem, ScheduleItemInput};
use crate::orm::schedule::touch_schedule;

/// Gets a schedule's items in display order: by start time, then id.
pub fn list_items_for_schedule(
    conn: &mut SqliteConnection,
    schedule_id_param: i32,
) -> Result<Vec<ScheduleItem>, diesel::result::Error> {
    use crate::schema::schedule_items::dsl::*;
    schedule_items
        .filter(schedule_id.eq(schedule_id_param))
        .order((start_time.asc(), id.asc()))
        .select(ScheduleItem::as_select())
        .load(conn)
}

pub fn get_schedule_item(
    conn: &mut SqliteConnection,
    item_id: i32,
) -> Result<Option<ScheduleItem>, diesel::result::Error> {
    use crate::schema::schedule_items::dsl::*;
    schedule_items
        .filter(id.eq(item_id))
        .select(ScheduleItem::as_select())
        .first(conn)
        .optional()
}

/// Adds an item to a schedule and bumps the schedule's `updated_at`.
pub fn insert_schedule_item(
    conn: &mut SqliteConnection,
    schedule_id_param: i32,
    input: ScheduleItemInput,
    now: NaiveDateTime,
) -> Result<ScheduleItem, diesel::result::Error> {
    use crate::schema::schedule_items::dsl::*;

    conn.transaction(|conn| {
        let new_item = input.into_new(schedule_id_param, now);
        diesel::insert_into(schedule_items).values(&new_item).execute(conn)?;
        touch_schedule(conn, schedule_id_param, now)?;
        schedule_items
            .order(id.desc())
            .select(ScheduleItem::as_select())
            .first(conn)
    })
}

/// Replaces an item's editable columns, recomputing its end time, and bumps
/// the owning schedule. Returns `None` if the item does not exist.
pub fn update_schedule_item(
    conn: &mut SqliteConnection,
    item_id: i32,
    input: ScheduleItemInput,
    now: NaiveDateTime,
) -> Result<Option<ScheduleItem>, diesel::result::Error> {
    use crate::schema::schedule_items::dsl::*;

    conn.transaction(|conn| {
        let Some(existing) = get_schedule_item(conn, item_id)? else {
            return Ok(None);
        };
        diesel::update(schedule_items.filter(id.eq(item_id)))
            .set(&input.into_changeset(now))
            .execute(conn)?;
        touch_schedule(conn, existing.schedule_id, now)?;
        get_schedule_item(conn, item_id)
    })
}

/// Deletes an item and bumps the owning schedule. Returns false if the item
/// did not exist.
pub fn delete_schedule_item(
    conn: &mut SqliteConnection,
    item_id: i32,
    now: NaiveDateTime,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::schedule_items::dsl::*;

    conn.transaction(|conn| {
        let Some(existing) = get_schedule_item(conn, item_id)? else {
            return Ok(false);
        };
        diesel::delete(schedule_items.filter(id.eq(item_id))).execute(conn)?;
        touch_schedule(conn, existing.schedule_id, now)?;
        Ok(true)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduleInput;
    use crate::orm::schedule::{get_schedule, insert_schedule};
    use crate::orm::testing::setup_test_db;
    use chrono::{NaiveDate, NaiveTime};

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn make_schedule(conn: &mut SqliteConnection) -> i32 {
        let input = ScheduleInput {
            name: "Tournament".to_string(),
            date: None,
            is_default: true,
            show_name: true,
        };
        insert_schedule(conn, input.into_new(at(1))).unwrap().id
    }

    fn item(start: NaiveTime, minutes: Option<i32>) -> ScheduleItemInput {
        ScheduleItemInput {
            name: Some("Session".to_string()),
            start_time: start,
            duration_minutes: minutes,
            ..Default::default()
        }
    }

    #[test]
    fn insert_computes_end_time_and_touches_schedule() {
        let mut conn = setup_test_db();
        let schedule_id = make_schedule(&mut conn);

        let created = insert_schedule_item(&mut conn, schedule_id, item(hm(23, 30), Some(60)), at(5)).unwrap();
        assert_eq!(created.end_time, Some(hm(0, 30)));
        assert_eq!(created.schedule_id, schedule_id);
        assert_eq!(get_schedule(&mut conn, schedule_id).unwrap().unwrap().updated_at, at(5));
    }

    #[test]
    fn items_are_ordered_by_start_then_id() {
        let mut conn = setup_test_db();
        let schedule_id = make_schedule(&mut conn);
        let late = insert_schedule_item(&mut conn, schedule_id, item(hm(14, 0), None), at(2)).unwrap();
        let early_a = insert_schedule_item(&mut conn, schedule_id, item(hm(9, 0), None), at(2)).unwrap();
        let early_b = insert_schedule_item(&mut conn, schedule_id, item(hm(9, 0), None), at(2)).unwrap();

        let ids: Vec<i32> = list_items_for_schedule(&mut conn, schedule_id)
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![early_a.id, early_b.id, late.id]);
    }

    #[test]
    fn update_overwrites_end_time_from_duration() {
        let mut conn = setup_test_db();
        let schedule_id = make_schedule(&mut conn);
        let mut input = item(hm(10, 0), None);
        input.end_time = Some(hm(12, 0));
        let created = insert_schedule_item(&mut conn, schedule_id, input, at(2)).unwrap();
        assert_eq!(created.end_time, Some(hm(12, 0)));

        let mut changed = item(hm(10, 0), Some(45));
        changed.end_time = Some(hm(12, 0));
        let updated = update_schedule_item(&mut conn, created.id, changed, at(6)).unwrap().unwrap();
        assert_eq!(updated.end_time, Some(hm(10, 45)));
        assert_eq!(updated.updated_at, at(6));
        assert_eq!(get_schedule(&mut conn, schedule_id).unwrap().unwrap().updated_at, at(6));
    }

    #[test]
    fn delete_item_touches_schedule() {
        let mut conn = setup_test_db();
        let schedule_id = make_schedule(&mut conn);
        let created = insert_schedule_item(&mut conn, schedule_id, item(hm(10, 0), None), at(2)).unwrap();

        assert!(delete_schedule_item(&mut conn, created.id, at(7)).unwrap());
        assert!(!delete_schedule_item(&mut conn, created.id, at(8)).unwrap());
        assert_eq!(get_schedule(&mut conn, schedule_id).unwrap().unwrap().updated_at, at(7));
    }

    #[test]
    fn insert_for_missing_schedule_fails_on_foreign_key() {
        let mut conn = setup_test_db();
        assert!(insert_schedule_item(&mut conn, 999, item(hm(10, 0), None), at(2)).is_err());
    }
}
