//! Schedule evaluation: is a habit due on a date, and when was it last due.

use chrono::{Days, NaiveDate};

use super::day::weekday_index;
use crate::domain::Recurrence;

/// How far back `previous_due_date` scans before giving up.
///
/// The bound keeps the scan cheap and terminating. A schedule sparser than
/// this window (only the empty custom set, with weekday-based rules)
/// reports no previous due date, which callers treat as a broken streak.
pub const LOOKBACK_DAYS: u64 = 14;

/// Whether `recurrence` requires action on `date`
pub fn is_due(recurrence: &Recurrence, date: NaiveDate) -> bool {
    let weekday = weekday_index(date);
    match recurrence {
        Recurrence::Daily => true,
        Recurrence::Weekdays => (1..=5).contains(&weekday),
        Recurrence::Weekends => weekday == 0 || weekday == 6,
        Recurrence::Custom { days } => days.contains(&weekday),
        // Weekly quotas do not gate daily availability
        Recurrence::PerWeek { .. } => true,
    }
}

/// The most recent due date strictly before `as_of`, if one falls inside
/// the lookback window.
///
/// Daily and per-week habits short-circuit to literal yesterday; the other
/// rules scan backward day by day.
pub fn previous_due_date(recurrence: &Recurrence, as_of: NaiveDate) -> Option<NaiveDate> {
    match recurrence {
        Recurrence::Daily | Recurrence::PerWeek { .. } => as_of.checked_sub_days(Days::new(1)),
        Recurrence::Weekdays | Recurrence::Weekends | Recurrence::Custom { .. } => {
            for back in 1..=LOOKBACK_DAYS {
                let candidate = as_of.checked_sub_days(Days::new(back))?;
                if is_due(recurrence, candidate) {
                    return Some(candidate);
                }
            }
            None
        }
    }
}
