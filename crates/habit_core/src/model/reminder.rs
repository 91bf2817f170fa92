//! Reminder slot keys.
//!
//! A habit references a reminder by slot key; the concrete time of day is a
//! user preference resolved outside this crate, with per-slot defaults here.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Named reminder slot a habit can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReminderSlot {
    #[serde(rename = "push_morning")]
    Morning,
    #[serde(rename = "push_noon")]
    Noon,
    #[serde(rename = "push_evening")]
    Evening,
    #[serde(rename = "push_custom")]
    Custom,
}

impl ReminderSlot {
    pub const ALL: [ReminderSlot; 4] = [Self::Morning, Self::Noon, Self::Evening, Self::Custom];

    /// Stable storage key for this slot.
    pub fn key(self) -> &'static str {
        match self {
            Self::Morning => "push_morning",
            Self::Noon => "push_noon",
            Self::Evening => "push_evening",
            Self::Custom => "push_custom",
        }
    }

    pub fn from_key(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.key() == value)
    }

    /// Time used when the user never customized this slot.
    pub fn default_time(self) -> NaiveTime {
        let hour = match self {
            Self::Morning => 8,
            Self::Noon => 12,
            Self::Evening => 18,
            Self::Custom => 20,
        };
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN)
    }
}

/// Next instant at which a reminder set for `at` should fire.
///
/// Fires today when `at` is still ahead of `now`, otherwise tomorrow.
pub fn next_trigger(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let candidate = now.date().and_time(at);
    if candidate < now {
        candidate + Duration::days(1)
    } else {
        candidate
    }
}
