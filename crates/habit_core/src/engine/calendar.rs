//! Calendar projection.
//!
//! # Responsibility
//! - Decide which dates of the current month render as successful.
//! - Report the still-undecided days of the current week.
//! - Build the 6x7 month grid consumed by calendar views.
//!
//! # Invariants
//! - BUILD daily successes are a subset of the log.
//! - BREAK successes never contain a logged date.
//! - Nothing after `today` is ever marked successful.

use crate::config::{EngineConfig, TodayBoundary};
use crate::engine::streak::is_week_successful;
use crate::engine::window::{
    end_of_week, first_grid_monday, start_of_month, start_of_week, DateRange,
};
use crate::error::{HabitError, HabitResult};
use crate::model::habit::{Habit, HabitKind, HabitType, RepeatPattern};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tiles in a month grid: six Monday-first rows.
pub const GRID_DAYS: usize = 42;

/// One tile of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_before_start: bool,
    pub is_success: bool,
    pub is_pending: bool,
    pub is_today: bool,
    pub is_created_at: bool,
}

/// Dates of the month containing `today` that count as successful.
///
/// Weekly habits mark whole successful weeks, so the first row may reach
/// back into the previous month.
pub fn successful_dates(
    habit: &Habit,
    today: NaiveDate,
    config: &EngineConfig,
) -> BTreeSet<NaiveDate> {
    let month_start = start_of_month(today);
    match habit.kind() {
        HabitKind::DailyBuild => habit.log.range(month_start..=today).copied().collect(),
        HabitKind::DailyBreak => {
            let start = month_start.max(habit.created_at);
            let end = match config.break_today {
                TodayBoundary::Exclusive => today.pred_opt(),
                TodayBoundary::Inclusive => Some(today),
            };
            end.map(|end| {
                DateRange::new(start, end)
                    .days()
                    .filter(|day| !habit.is_logged(*day))
                    .collect()
            })
            .unwrap_or_default()
        }
        HabitKind::WeeklyBuild | HabitKind::WeeklyBreak => {
            let mut dates = BTreeSet::new();
            let last_monday = start_of_week(today);
            let mut monday = start_of_week(month_start);
            while monday <= last_monday {
                if is_week_successful(habit, monday) {
                    dates.extend(
                        DateRange::week_of(monday)
                            .days()
                            .filter(|day| *day <= today && *day >= habit.created_at),
                    );
                }
                monday += Duration::weeks(1);
            }
            dates
        }
    }
}

/// Remaining days of the current week after `today`. Empty for daily habits.
pub fn pending_dates_of_week(habit: &Habit, today: NaiveDate) -> BTreeSet<NaiveDate> {
    match habit.repeat {
        RepeatPattern::Daily => BTreeSet::new(),
        RepeatPattern::Weekly => match today.succ_opt() {
            Some(tomorrow) => DateRange::new(tomorrow, end_of_week(today)).days().collect(),
            None => BTreeSet::new(),
        },
    }
}

pub fn is_today_successful(habit: &Habit, today: NaiveDate) -> bool {
    match habit.habit_type {
        HabitType::Build => habit.is_logged(today),
        HabitType::Break => !habit.is_logged(today),
    }
}

/// Fails with `InvalidState` for daily habits.
pub fn is_this_week_successful(habit: &Habit, today: NaiveDate) -> HabitResult<bool> {
    match habit.repeat {
        RepeatPattern::Weekly => Ok(is_week_successful(habit, today)),
        RepeatPattern::Daily => Err(HabitError::weekly_only("is_this_week_successful")),
    }
}

/// Month grid for `habit`, starting at the Monday on or before the 1st.
pub fn month_grid(habit: &Habit, today: NaiveDate, config: &EngineConfig) -> Vec<CalendarDay> {
    let successes = successful_dates(habit, today, config);
    let pending = pending_dates_of_week(habit, today);

    grid_dates(today)
        .map(|date| CalendarDay {
            date,
            is_before_start: date < habit.created_at,
            is_success: successes.contains(&date),
            is_pending: pending.contains(&date),
            is_today: date == today,
            is_created_at: date == habit.created_at,
        })
        .collect()
}

/// Placeholder grid with every flag cleared.
pub fn empty_month_grid(today: NaiveDate) -> Vec<CalendarDay> {
    grid_dates(today)
        .map(|date| CalendarDay {
            date,
            is_before_start: false,
            is_success: false,
            is_pending: false,
            is_today: false,
            is_created_at: false,
        })
        .collect()
}

fn grid_dates(today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    first_grid_monday(today).iter_days().take(GRID_DAYS)
}
