//! Habit definition types.
//!
//! A habit is a user-defined recurring goal: what to measure (tracking mode
//! and target), when it is due (recurrence rule), and where it scores
//! (category). Streak fields live on the habit because they are part of the
//! stored row, but only the streak engine writes them.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unique identifier for a habit (UUID v4, stored as text)
pub type HabitId = String;

/// How progress on a habit is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingMode {
    /// Done / not done
    #[default]
    Binary,
    /// Time spent; values are logged in seconds, the target is in minutes
    Duration,
    /// Repetitions; the target is a count
    Count,
}

impl TrackingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Duration => "duration",
            Self::Count => "count",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "binary" => Some(Self::Binary),
            "duration" => Some(Self::Duration),
            "count" => Some(Self::Count),
            _ => None,
        }
    }
}

/// Life domain a habit belongs to, used for XP grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Body,
    Mind,
    Craft,
    Social,
    Spirit,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Body,
        Category::Mind,
        Category::Craft,
        Category::Social,
        Category::Spirit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Mind => "mind",
            Self::Craft => "craft",
            Self::Social => "social",
            Self::Spirit => "spirit",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "body" => Some(Self::Body),
            "mind" => Some(Self::Mind),
            "craft" => Some(Self::Craft),
            "social" => Some(Self::Social),
            "spirit" => Some(Self::Spirit),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Body => "Body",
            Self::Mind => "Mind",
            Self::Craft => "Craft",
            Self::Social => "Social",
            Self::Spirit => "Spirit",
        }
    }
}

/// When a habit is due.
///
/// Weekday indices follow the 0 = Sunday .. 6 = Saturday convention
/// everywhere a day set appears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recurrence {
    /// Due every day
    Daily,
    /// Due Monday through Friday
    Weekdays,
    /// Due Saturday and Sunday
    Weekends,
    /// Due on an explicit set of weekdays. An empty set is legal and means
    /// "never due".
    Custom { days: BTreeSet<u8> },
    /// Target number of completions per week. Scheduling treats these
    /// habits as due every day; the weekly quota is informational only.
    PerWeek { times: u8 },
}

impl Recurrence {
    /// Short human-readable form for listings
    pub fn describe(&self) -> String {
        match self {
            Self::Daily => "daily".to_string(),
            Self::Weekdays => "weekdays".to_string(),
            Self::Weekends => "weekends".to_string(),
            Self::Custom { days } => {
                if days.is_empty() {
                    "never".to_string()
                } else {
                    days.iter()
                        .map(|d| weekday_name(*d))
                        .collect::<Vec<_>>()
                        .join(",")
                }
            }
            Self::PerWeek { times } => format!("{times}x/week"),
        }
    }
}

/// Parse a weekday name ("mon", "monday", ...) into its 0=Sunday index
pub fn parse_weekday(s: &str) -> Option<u8> {
    match s.trim().to_ascii_lowercase().as_str() {
        "sun" | "sunday" => Some(0),
        "mon" | "monday" => Some(1),
        "tue" | "tues" | "tuesday" => Some(2),
        "wed" | "wednesday" => Some(3),
        "thu" | "thur" | "thurs" | "thursday" => Some(4),
        "fri" | "friday" => Some(5),
        "sat" | "saturday" => Some(6),
        _ => None,
    }
}

/// Short name for a 0=Sunday weekday index
pub fn weekday_name(idx: u8) -> &'static str {
    match idx {
        0 => "sun",
        1 => "mon",
        2 => "tue",
        3 => "wed",
        4 => "thu",
        5 => "fri",
        6 => "sat",
        _ => "?",
    }
}

/// A tracked habit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub user_id: String,
    pub name: String,
    pub category: Category,
    pub mode: TrackingMode,
    /// Minutes for duration mode, repetitions for count mode, None for binary
    pub target: Option<u32>,
    pub recurrence: Recurrence,
    /// Inactive habits keep their history but are never due
    pub active: bool,
    pub current_streak: u32,
    pub best_streak: u32,
    pub last_completed: Option<NaiveDate>,
    /// Creation time, ms since epoch
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for cat in Category::ALL {
            assert_eq!(Category::from_str(cat.as_str()), Some(cat));
        }
        assert_eq!(Category::from_str("finance"), None);
    }

    #[test]
    fn test_tracking_mode_roundtrip() {
        for mode in [TrackingMode::Binary, TrackingMode::Duration, TrackingMode::Count] {
            assert_eq!(TrackingMode::from_str(mode.as_str()), Some(mode));
        }
    }

    #[test]
    fn test_parse_weekday_names() {
        assert_eq!(parse_weekday("sun"), Some(0));
        assert_eq!(parse_weekday("Monday"), Some(1));
        assert_eq!(parse_weekday(" wed "), Some(3));
        assert_eq!(parse_weekday("sat"), Some(6));
        assert_eq!(parse_weekday("someday"), None);
    }

    #[test]
    fn test_recurrence_describe() {
        assert_eq!(Recurrence::Daily.describe(), "daily");
        assert_eq!(
            Recurrence::Custom {
                days: BTreeSet::from([1, 3])
            }
            .describe(),
            "mon,wed"
        );
        assert_eq!(
            Recurrence::Custom {
                days: BTreeSet::new()
            }
            .describe(),
            "never"
        );
        assert_eq!(Recurrence::PerWeek { times: 3 }.describe(), "3x/week");
    }
}
