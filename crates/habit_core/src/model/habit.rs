//! Habit aggregate.
//!
//! # Responsibility
//! - Define the canonical record loaded from storage and fed to the engine.
//! - Expose the `{type, repeat}` combination as one tagged variant so engine
//!   dispatch is checked for exhaustiveness.
//!
//! # Invariants
//! - `id` is nil until the habit has been persisted.
//! - `name` is non-blank and `target` is positive.
//! - `log` holds dates only; entries before `created_at` are tolerated but
//!   ignored by period walks.

use crate::model::reminder::ReminderSlot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use thiserror::Error;
use uuid::Uuid;

/// Stable identifier of a habit.
pub type HabitId = Uuid;

/// Whether logging a date means success or a lapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitType {
    /// Doing the thing is success.
    Build,
    /// Not doing the thing is success; a logged date is a lapse.
    Break,
}

/// Period granularity of a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatPattern {
    Daily,
    Weekly,
}

/// Every `{repeat, type}` combination the engine branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HabitKind {
    DailyBuild,
    DailyBreak,
    WeeklyBuild,
    WeeklyBreak,
}

impl HabitKind {
    pub fn new(repeat: RepeatPattern, habit_type: HabitType) -> Self {
        match (repeat, habit_type) {
            (RepeatPattern::Daily, HabitType::Build) => Self::DailyBuild,
            (RepeatPattern::Daily, HabitType::Break) => Self::DailyBreak,
            (RepeatPattern::Weekly, HabitType::Build) => Self::WeeklyBuild,
            (RepeatPattern::Weekly, HabitType::Break) => Self::WeeklyBreak,
        }
    }

    pub fn repeat(self) -> RepeatPattern {
        match self {
            Self::DailyBuild | Self::DailyBreak => RepeatPattern::Daily,
            Self::WeeklyBuild | Self::WeeklyBreak => RepeatPattern::Weekly,
        }
    }

    pub fn habit_type(self) -> HabitType {
        match self {
            Self::DailyBuild | Self::WeeklyBuild => HabitType::Build,
            Self::DailyBreak | Self::WeeklyBreak => HabitType::Break,
        }
    }
}

impl Display for HabitKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::DailyBuild => "daily_build",
            Self::DailyBreak => "daily_break",
            Self::WeeklyBuild => "weekly_build",
            Self::WeeklyBreak => "weekly_break",
        };
        f.write_str(label)
    }
}

/// Write-path validation failures for `Habit`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HabitValidationError {
    #[error("habit name must not be blank")]
    EmptyName,
    #[error("habit target must be positive")]
    ZeroTarget,
}

/// Aggregate root: habit metadata plus its full log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HabitWire")]
pub struct Habit {
    /// Nil before persistence.
    pub id: HabitId,
    pub name: String,
    pub motivational_note: String,
    pub unit: String,
    /// Serialized as `type` to match external schema naming.
    #[serde(rename = "type")]
    pub habit_type: HabitType,
    pub repeat: RepeatPattern,
    /// Advisory only; no engine computation reads it.
    pub target: u32,
    pub reminder: Option<ReminderSlot>,
    /// First tracked day.
    pub created_at: NaiveDate,
    /// Days on which the user explicitly logged an occurrence.
    pub log: BTreeSet<NaiveDate>,
}

impl Habit {
    /// Creates an unsaved habit with an empty log.
    ///
    /// # Invariants
    /// - `id` is nil; the repository assigns one on insert.
    /// - `target` starts at 1 and display strings start empty.
    pub fn new(
        name: impl Into<String>,
        habit_type: HabitType,
        repeat: RepeatPattern,
        created_at: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            name: name.into(),
            motivational_note: String::new(),
            unit: String::new(),
            habit_type,
            repeat,
            target: 1,
            reminder: None,
            created_at,
            log: BTreeSet::new(),
        }
    }

    pub fn kind(&self) -> HabitKind {
        HabitKind::new(self.repeat, self.habit_type)
    }

    pub fn is_persisted(&self) -> bool {
        !self.id.is_nil()
    }

    pub fn is_logged(&self, date: NaiveDate) -> bool {
        self.log.contains(&date)
    }

    /// Returns whether any logged date falls within `[start, end]`.
    pub fn has_log_between(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= end && self.log.range(start..=end).next().is_some()
    }

    /// Validates write-path invariants.
    pub fn validate(&self) -> Result<(), HabitValidationError> {
        if self.name.trim().is_empty() {
            return Err(HabitValidationError::EmptyName);
        }
        if self.target == 0 {
            return Err(HabitValidationError::ZeroTarget);
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct HabitWire {
    id: HabitId,
    name: String,
    #[serde(default)]
    motivational_note: String,
    #[serde(default)]
    unit: String,
    #[serde(rename = "type")]
    habit_type: HabitType,
    repeat: RepeatPattern,
    target: u32,
    #[serde(default)]
    reminder: Option<ReminderSlot>,
    created_at: NaiveDate,
    #[serde(default)]
    log: BTreeSet<NaiveDate>,
}

impl TryFrom<HabitWire> for Habit {
    type Error = HabitValidationError;

    fn try_from(wire: HabitWire) -> Result<Self, Self::Error> {
        let habit = Self {
            id: wire.id,
            name: wire.name,
            motivational_note: wire.motivational_note,
            unit: wire.unit,
            habit_type: wire.habit_type,
            repeat: wire.repeat,
            target: wire.target,
            reminder: wire.reminder,
            created_at: wire.created_at,
            log: wire.log,
        };
        habit.validate()?;
        Ok(habit)
    }
}
