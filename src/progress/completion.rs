//! Completion classification: does a logged value count as done.

use crate::domain::{Habit, TrackingMode};

/// Duration targets are stored in minutes; logged values in seconds
const SECS_PER_MINUTE: f64 = 60.0;

/// Whether `value` completes `habit` for a day.
///
/// A missing target on a count or duration habit degrades to a threshold of
/// zero, so any nonnegative value completes. Habit configuration integrity
/// is the editing layer's responsibility, not this function's.
pub fn is_completed(habit: &Habit, value: f64) -> bool {
    match habit.mode {
        TrackingMode::Binary => value > 0.0,
        TrackingMode::Duration => {
            value >= habit.target.unwrap_or(0) as f64 * SECS_PER_MINUTE
        }
        TrackingMode::Count => value >= habit.target.unwrap_or(0) as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Recurrence};

    fn habit(mode: TrackingMode, target: Option<u32>) -> Habit {
        Habit {
            id: "h1".to_string(),
            user_id: "u1".to_string(),
            name: "test".to_string(),
            category: Category::Body,
            mode,
            target,
            recurrence: Recurrence::Daily,
            active: true,
            current_streak: 0,
            best_streak: 0,
            last_completed: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_binary_needs_positive_value() {
        let h = habit(TrackingMode::Binary, None);
        assert!(is_completed(&h, 1.0));
        assert!(!is_completed(&h, 0.0));
    }

    #[test]
    fn test_duration_threshold_in_seconds() {
        let h = habit(TrackingMode::Duration, Some(30));
        assert!(!is_completed(&h, 1799.0));
        assert!(is_completed(&h, 1800.0)); // exactly 30 minutes
        assert!(is_completed(&h, 3600.0));
    }

    #[test]
    fn test_count_threshold() {
        let h = habit(TrackingMode::Count, Some(8));
        assert!(!is_completed(&h, 7.0));
        assert!(is_completed(&h, 8.0));
        assert!(is_completed(&h, 12.0));
    }

    #[test]
    fn test_missing_target_completes_on_any_nonnegative_value() {
        let h = habit(TrackingMode::Count, None);
        assert!(is_completed(&h, 0.0));
        let h = habit(TrackingMode::Duration, None);
        assert!(is_completed(&h, 0.0));
    }
}
