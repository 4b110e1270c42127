//! Streak state machine.
//!
//! Transitions fire only when a day flips into "completed"; re-logging an
//! already-completed day never re-increments. Staleness is a read-time
//! concern: a stale streak displays as zero but is only actually reset by
//! the next completion event.

use chrono::NaiveDate;

/// Streak fields as stored on a habit or user row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreakState {
    pub current: u32,
    pub best: u32,
    pub last_completed: Option<NaiveDate>,
}

/// What `advance` did to the streak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// This day was already counted; nothing changed
    AlreadyCounted,
    /// Continued from the previous due date
    Extended(u32),
    /// Gap detected; streak restarted at 1
    Restarted,
}

impl StreakState {
    /// Advance the streak for a completion on `today`.
    ///
    /// `previous_due` is the last date the schedule required action before
    /// `today` - schedule-aware for per-habit streaks, literal yesterday
    /// for the global streak. Best is kept at `max(best, current)` on every
    /// write path.
    pub fn advance(&mut self, today: NaiveDate, previous_due: Option<NaiveDate>) -> StreakChange {
        if self.last_completed == Some(today) {
            return StreakChange::AlreadyCounted;
        }

        let change = if self.last_completed.is_some() && self.last_completed == previous_due {
            self.current += 1;
            StreakChange::Extended(self.current)
        } else {
            self.current = 1;
            StreakChange::Restarted
        };

        self.best = self.best.max(self.current);
        self.last_completed = Some(today);
        change
    }

    /// The value to display for `today` without mutating storage.
    ///
    /// A streak whose last completion is neither today nor yesterday shows
    /// as zero; the stored value stays stale until the next completion.
    pub fn displayed_current(&self, today: NaiveDate) -> u32 {
        let Some(last) = self.last_completed else {
            return 0;
        };
        let days_since = (today - last).num_days();
        if (0..=1).contains(&days_since) {
            self.current
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_first_completion_restarts_at_one() {
        let mut state = StreakState::default();
        let change = state.advance(date("2025-06-01"), Some(date("2025-05-31")));
        assert_eq!(change, StreakChange::Restarted);
        assert_eq!(state.current, 1);
        assert_eq!(state.best, 1);
        assert_eq!(state.last_completed, Some(date("2025-06-01")));
    }

    #[test]
    fn test_consecutive_days_extend() {
        let mut state = StreakState::default();
        state.advance(date("2025-06-01"), Some(date("2025-05-31")));
        let change = state.advance(date("2025-06-02"), Some(date("2025-06-01")));
        assert_eq!(change, StreakChange::Extended(2));
        let change = state.advance(date("2025-06-03"), Some(date("2025-06-02")));
        assert_eq!(change, StreakChange::Extended(3));
        assert_eq!(state.best, 3);
    }

    #[test]
    fn test_same_day_is_noop() {
        let mut state = StreakState::default();
        state.advance(date("2025-06-01"), Some(date("2025-05-31")));
        let change = state.advance(date("2025-06-01"), Some(date("2025-05-31")));
        assert_eq!(change, StreakChange::AlreadyCounted);
        assert_eq!(state.current, 1);
    }

    #[test]
    fn test_gap_resets_but_keeps_best() {
        let mut state = StreakState::default();
        state.advance(date("2025-06-01"), Some(date("2025-05-31")));
        state.advance(date("2025-06-02"), Some(date("2025-06-01")));
        // Skip 06-03; previous due for 06-04 is 06-03, not the last completion
        let change = state.advance(date("2025-06-04"), Some(date("2025-06-03")));
        assert_eq!(change, StreakChange::Restarted);
        assert_eq!(state.current, 1);
        assert_eq!(state.best, 2);
    }

    #[test]
    fn test_no_previous_due_resets() {
        // A schedule with no due date in the lookback window always restarts
        let mut state = StreakState {
            current: 4,
            best: 4,
            last_completed: Some(date("2025-05-01")),
        };
        let change = state.advance(date("2025-06-01"), None);
        assert_eq!(change, StreakChange::Restarted);
        assert_eq!(state.current, 1);
        assert_eq!(state.best, 4);
    }

    #[test]
    fn test_displayed_current_coerces_stale_to_zero() {
        let state = StreakState {
            current: 5,
            best: 5,
            last_completed: Some(date("2025-06-01")),
        };
        assert_eq!(state.displayed_current(date("2025-06-01")), 5);
        assert_eq!(state.displayed_current(date("2025-06-02")), 5);
        assert_eq!(state.displayed_current(date("2025-06-04")), 0);
        // Coercion is display-only; the state itself is untouched
        assert_eq!(state.current, 5);
    }

    #[test]
    fn test_displayed_current_empty_state() {
        let state = StreakState::default();
        assert_eq!(state.displayed_current(date("2025-06-01")), 0);
    }
}
