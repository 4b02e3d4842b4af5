//! Picks the one schedule the sign should show on a given day.
//!
//! A schedule dated today always beats the undated default-active fallback.
//! Two schedules dated today are settled by lowest id. Two undated defaults
//! should never exist, since the admin write path clears the flag on every
//! other row, but if they do the most recently updated one wins, then the
//! highest id. That last rule keeps the display up rather than promising
//! anything about which fallback is shown.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::models::Schedule;

/// Whether `schedule` may be shown on `today` at all.
pub fn is_candidate(schedule: &Schedule, today: NaiveDate) -> bool {
    match schedule.date {
        Some(date) => date == today,
        None => schedule.is_default,
    }
}

/// Orders candidates so the preferred one compares as `Less`.
fn preference(a: &Schedule, b: &Schedule) -> Ordering {
    match (a.is_fallback(), b.is_fallback()) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (false, false) => a.id.cmp(&b.id),
        (true, true) => b
            .updated_at
            .cmp(&a.updated_at)
            .then_with(|| b.id.cmp(&a.id)),
    }
}

/// Returns the active schedule for `today`, or `None` when nothing qualifies.
pub fn resolve_active_schedule(schedules: &[Schedule], today: NaiveDate) -> Option<&Schedule> {
    schedules
        .iter()
        .filter(|s| is_candidate(s, today))
        .min_by(|a, b| preference(a, b))
}
