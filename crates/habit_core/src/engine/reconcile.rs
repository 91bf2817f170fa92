//! Log reconciliation.
//!
//! # Responsibility
//! - Diff a persisted log against a client-submitted replacement log.
//! - Enforce that one update only ever touches today's entry.
//! - Provide the weekly toggle used instead of diffing for weekly habits.
//!
//! # Invariants
//! - A rejected proposal yields no delta at all; partial application is
//!   impossible through this API.
//! - Applying a delta to the log it was computed from yields the proposal.

use crate::engine::window::DateRange;
use crate::error::{HabitError, HabitResult};
use crate::model::habit::{Habit, RepeatPattern};
use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Storage operations required to move a log to a new state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDelta {
    pub to_insert: BTreeSet<NaiveDate>,
    pub to_delete: BTreeSet<NaiveDate>,
}

impl LogDelta {
    pub fn is_empty(&self) -> bool {
        self.to_insert.is_empty() && self.to_delete.is_empty()
    }

    /// Returns `log` with this delta applied.
    pub fn apply_to(&self, log: &BTreeSet<NaiveDate>) -> BTreeSet<NaiveDate> {
        log.difference(&self.to_delete)
            .chain(self.to_insert.iter())
            .copied()
            .collect()
    }
}

/// Unvalidated set difference between two logs.
pub fn diff(current: &BTreeSet<NaiveDate>, proposed: &BTreeSet<NaiveDate>) -> LogDelta {
    LogDelta {
        to_insert: proposed.difference(current).copied().collect(),
        to_delete: current.difference(proposed).copied().collect(),
    }
}

/// Diffs `proposed` against `current` for a daily habit.
///
/// Fails with `InvalidArgument` unless each side of the delta is empty or
/// exactly `{today}`.
pub fn reconcile(
    current: &BTreeSet<NaiveDate>,
    proposed: &BTreeSet<NaiveDate>,
    today: NaiveDate,
) -> HabitResult<LogDelta> {
    let delta = diff(current, proposed);
    if touches_only(&delta.to_insert, today) && touches_only(&delta.to_delete, today) {
        return Ok(delta);
    }

    warn!(
        "event=log_reconcile module=engine status=rejected inserts={} deletes={}",
        delta.to_insert.len(),
        delta.to_delete.len()
    );
    Err(HabitError::InvalidArgument("only today's entry may be updated".to_string()))
}

/// Weekly toggle: mark the current week done, or clear every entry in it.
///
/// The week counts as marked when it holds an entry on or after
/// `created_at`, the same window `is_week_successful` reads. Clearing
/// removes all entries of the week, which also drops duplicates left behind
/// when a habit switched from daily to weekly. Marking inserts today and
/// drops any entry of the week dated before `created_at`.
pub fn weekly_toggle(habit: &Habit, today: NaiveDate) -> LogDelta {
    let week = DateRange::week_of(today);
    let in_week: BTreeSet<NaiveDate> = habit.log.range(week.start..=week.end).copied().collect();
    let marked = habit.has_log_between(week.start.max(habit.created_at), week.end);
    LogDelta {
        to_insert: if marked {
            BTreeSet::new()
        } else {
            BTreeSet::from([today])
        },
        to_delete: in_week,
    }
}

fn touches_only(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> bool {
    match dates.len() {
        0 => true,
        1 => dates.contains(&today),
        _ => false,
    }
}

/// Where one log editing session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    /// Nothing to write.
    Clean,
    /// Storage must insert the planned dates.
    PendingInsert,
    /// Storage must delete the planned dates.
    PendingDelete,
    /// The request violated the edit rules; storage must stay untouched.
    Rejected,
}

/// Single-use planner for one edit of one habit's log.
///
/// A session accepts exactly one request. Daily habits go through
/// [`LogEditSession::propose`], weekly habits through
/// [`LogEditSession::toggle_week`]; using the other entry point rejects the
/// session.
#[derive(Debug)]
pub struct LogEditSession<'a> {
    habit: &'a Habit,
    today: NaiveDate,
    state: EditState,
    delta: LogDelta,
    used: bool,
}

impl<'a> LogEditSession<'a> {
    pub fn new(habit: &'a Habit, today: NaiveDate) -> Self {
        Self {
            habit,
            today,
            state: EditState::Clean,
            delta: LogDelta::default(),
            used: false,
        }
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn delta(&self) -> &LogDelta {
        &self.delta
    }

    /// Plans a full log replacement for a daily habit.
    pub fn propose(&mut self, proposed: &BTreeSet<NaiveDate>) -> HabitResult<&LogDelta> {
        self.begin()?;
        let planned = match self.habit.repeat {
            RepeatPattern::Daily => reconcile(&self.habit.log, proposed, self.today),
            RepeatPattern::Weekly => Err(HabitError::daily_only("propose")),
        };
        self.settle(planned)
    }

    /// Plans the weekly toggle for a weekly habit.
    pub fn toggle_week(&mut self) -> HabitResult<&LogDelta> {
        self.begin()?;
        let planned = match self.habit.repeat {
            RepeatPattern::Weekly => Ok(weekly_toggle(self.habit, self.today)),
            RepeatPattern::Daily => Err(HabitError::weekly_only("toggle_week")),
        };
        self.settle(planned)
    }

    /// Plans flipping today's state: today's entry for daily habits, the
    /// weekly toggle for weekly habits.
    pub fn toggle_today(&mut self) -> HabitResult<&LogDelta> {
        match self.habit.repeat {
            RepeatPattern::Daily => {
                let mut proposed = self.habit.log.clone();
                if !proposed.remove(&self.today) {
                    proposed.insert(self.today);
                }
                self.propose(&proposed)
            }
            RepeatPattern::Weekly => self.toggle_week(),
        }
    }

    /// Consumes the session, yielding the delta unless it was rejected.
    pub fn into_delta(self) -> Option<LogDelta> {
        match self.state {
            EditState::Rejected => None,
            _ => Some(self.delta),
        }
    }

    fn begin(&mut self) -> HabitResult<()> {
        if self.used {
            return Err(HabitError::InvalidState(
                "log edit session accepts a single request".to_string(),
            ));
        }
        self.used = true;
        Ok(())
    }

    fn settle(&mut self, planned: HabitResult<LogDelta>) -> HabitResult<&LogDelta> {
        match planned {
            Ok(delta) => {
                self.state = if !delta.to_insert.is_empty() {
                    EditState::PendingInsert
                } else if !delta.to_delete.is_empty() {
                    EditState::PendingDelete
                } else {
                    EditState::Clean
                };
                debug!(
                    "event=log_edit_plan module=engine status=ok habit_id={} state={:?}",
                    self.habit.id, self.state
                );
                self.delta = delta;
                Ok(&self.delta)
            }
            Err(err) => {
                self.state = EditState::Rejected;
                self.delta = LogDelta::default();
                Err(err)
            }
        }
    }
}
