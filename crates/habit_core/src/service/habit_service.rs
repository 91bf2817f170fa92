//! Habit use-case service.
//!
//! # Responsibility
//! - Load habits and derive the views callers render (streak, status,
//!   month grid, next reminder).
//! - Turn user log edits into validated storage deltas and apply them.
//!
//! # Invariants
//! - A missing habit is always `HabitError::NotFound`; defaults are never
//!   substituted.
//! - A rejected edit performs no storage write.
//! - "Today" always comes from the injected clock.

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::engine::calendar::{self, CalendarDay};
use crate::engine::reconcile::{LogDelta, LogEditSession};
use crate::engine::{reminder, streak};
use crate::error::{HabitError, HabitResult};
use crate::model::habit::{Habit, HabitId, HabitKind, RepeatPattern};
use crate::repo::habit_repo::{HabitRepository, RepoError};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::{info, warn};
use std::collections::BTreeSet;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for habit use-cases.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Habit(#[from] HabitError),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::Habit(HabitError::NotFound(id)),
            other => Self::Repo(other),
        }
    }
}

/// Summary shown per habit in list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HabitOverview {
    pub id: HabitId,
    pub kind: HabitKind,
    pub current_streak: u32,
    pub today_successful: bool,
    /// `None` for daily habits.
    pub week_successful: Option<bool>,
}

/// Use-case service over a habit repository and a clock.
pub struct HabitService<R: HabitRepository, C: Clock> {
    repo: R,
    clock: C,
    config: EngineConfig,
}

impl<R: HabitRepository, C: Clock> HabitService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self {
            repo,
            clock,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Persists a new habit and returns its id.
    pub fn create_habit(&self, habit: &Habit) -> ServiceResult<HabitId> {
        Ok(self.repo.create_habit(habit)?)
    }

    /// Replaces habit metadata; the log is not touched.
    pub fn update_habit(&self, habit: &Habit) -> ServiceResult<()> {
        Ok(self.repo.update_habit(habit)?)
    }

    pub fn delete_habit(&self, id: HabitId) -> ServiceResult<()> {
        Ok(self.repo.delete_habit(id)?)
    }

    /// Loads one habit with its full log.
    pub fn get_habit(&self, id: HabitId) -> ServiceResult<Habit> {
        self.repo
            .get_habit(id)?
            .ok_or(ServiceError::Habit(HabitError::NotFound(id)))
    }

    pub fn list_habits(&self) -> ServiceResult<Vec<Habit>> {
        Ok(self.repo.list_habits()?)
    }

    pub fn overview(&self, id: HabitId) -> ServiceResult<HabitOverview> {
        let habit = self.get_habit(id)?;
        Ok(overview_of(&habit, self.today()))
    }

    pub fn overviews(&self) -> ServiceResult<Vec<HabitOverview>> {
        let today = self.today();
        Ok(self
            .list_habits()?
            .iter()
            .map(|habit| overview_of(habit, today))
            .collect())
    }

    /// 42-tile month grid for the month containing today.
    pub fn month_view(&self, id: HabitId) -> ServiceResult<Vec<CalendarDay>> {
        let habit = self.get_habit(id)?;
        Ok(calendar::month_grid(&habit, self.today(), &self.config))
    }

    pub fn successful_dates(&self, id: HabitId) -> ServiceResult<BTreeSet<NaiveDate>> {
        let habit = self.get_habit(id)?;
        Ok(calendar::successful_dates(&habit, self.today(), &self.config))
    }

    pub fn pending_dates_of_week(&self, id: HabitId) -> ServiceResult<BTreeSet<NaiveDate>> {
        let habit = self.get_habit(id)?;
        Ok(calendar::pending_dates_of_week(&habit, self.today()))
    }

    /// Replaces the log of a daily habit with `proposed`.
    ///
    /// # Errors
    /// - `InvalidState` for weekly habits.
    /// - `InvalidArgument` when the edit touches anything but today; nothing
    ///   is written in that case.
    pub fn update_log(
        &self,
        id: HabitId,
        proposed: &BTreeSet<NaiveDate>,
    ) -> ServiceResult<LogDelta> {
        self.edit_log(id, "update_log", |session| {
            session.propose(proposed).map(|_| ())
        })
    }

    /// Marks the current week done, or clears it. Weekly habits only.
    pub fn toggle_week(&self, id: HabitId) -> ServiceResult<LogDelta> {
        self.edit_log(id, "toggle_week", |session| {
            session.toggle_week().map(|_| ())
        })
    }

    /// Flips today's state for any habit.
    pub fn toggle_today(&self, id: HabitId) -> ServiceResult<LogDelta> {
        self.edit_log(id, "toggle_today", |session| {
            session.toggle_today().map(|_| ())
        })
    }

    /// Next time a reminder should fire for this habit, if any.
    pub fn next_reminder(
        &self,
        id: HabitId,
        custom_time: Option<NaiveTime>,
    ) -> ServiceResult<Option<NaiveDateTime>> {
        let habit = self.get_habit(id)?;
        Ok(reminder::next_reminder(&habit, self.clock.now(), custom_time))
    }

    fn edit_log<F>(
        &self,
        id: HabitId,
        operation: &'static str,
        request: F,
    ) -> ServiceResult<LogDelta>
    where
        F: FnOnce(&mut LogEditSession<'_>) -> HabitResult<()>,
    {
        let habit = self.get_habit(id)?;
        let mut session = LogEditSession::new(&habit, self.today());
        if let Err(err) = request(&mut session) {
            warn!(
                "event={operation} module=service status=rejected habit_id={id} error={err}"
            );
            return Err(err.into());
        }

        let delta = session.into_delta().unwrap_or_default();
        if !delta.is_empty() {
            self.repo.apply_log_delta(id, &delta)?;
        }

        info!(
            "event={operation} module=service status=ok habit_id={} inserted={} deleted={}",
            id,
            delta.to_insert.len(),
            delta.to_delete.len()
        );
        Ok(delta)
    }
}

fn overview_of(habit: &Habit, today: NaiveDate) -> HabitOverview {
    HabitOverview {
        id: habit.id,
        kind: habit.kind(),
        current_streak: streak::current_streak(habit, today),
        today_successful: calendar::is_today_successful(habit, today),
        week_successful: match habit.repeat {
            RepeatPattern::Daily => None,
            RepeatPattern::Weekly => Some(streak::is_week_successful(habit, today)),
        },
    }
}
