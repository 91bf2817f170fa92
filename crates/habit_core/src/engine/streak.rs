//! Streak calculation.
//!
//! # Responsibility
//! - Count consecutive successful periods (days or weeks) ending at or next
//!   to today.
//!
//! # Invariants
//! - Walks never step before `created_at`; older log entries are ignored.
//! - For BUILD habits an unlogged today is not a gap yet.
//! - For BREAK habits any failed period ends the streak, including the
//!   current one.

use crate::engine::window::{end_of_week, start_of_week};
use crate::error::{HabitError, HabitResult};
use crate::model::habit::{Habit, HabitKind, HabitType, RepeatPattern};
use chrono::{Duration, NaiveDate};

/// Current streak length in the habit's own period unit.
pub fn current_streak(habit: &Habit, today: NaiveDate) -> u32 {
    match habit.kind() {
        HabitKind::DailyBuild => daily_build_streak(habit, today),
        HabitKind::DailyBreak => daily_break_streak(habit, today),
        HabitKind::WeeklyBuild | HabitKind::WeeklyBreak => weekly_streak_unchecked(habit, today),
    }
}

/// Streak in days. Fails with `InvalidState` for weekly habits.
pub fn daily_streak(habit: &Habit, today: NaiveDate) -> HabitResult<u32> {
    match habit.repeat {
        RepeatPattern::Daily => Ok(current_streak(habit, today)),
        RepeatPattern::Weekly => Err(HabitError::daily_only("daily_streak")),
    }
}

/// Streak in weeks. Fails with `InvalidState` for daily habits.
pub fn weekly_streak(habit: &Habit, today: NaiveDate) -> HabitResult<u32> {
    match habit.repeat {
        RepeatPattern::Weekly => Ok(weekly_streak_unchecked(habit, today)),
        RepeatPattern::Daily => Err(HabitError::weekly_only("weekly_streak")),
    }
}

/// Whether the Monday..=Sunday week containing `day` counts as done.
///
/// BUILD: at least one logged date. BREAK: no logged date. Days before
/// `created_at` are not part of the tracked week.
pub fn is_week_successful(habit: &Habit, day: NaiveDate) -> bool {
    let start = start_of_week(day).max(habit.created_at);
    let logged = habit.has_log_between(start, end_of_week(day));
    match habit.habit_type {
        HabitType::Build => logged,
        HabitType::Break => !logged,
    }
}

fn daily_build_streak(habit: &Habit, today: NaiveDate) -> u32 {
    let mut cursor = if habit.is_logged(today) {
        Some(today)
    } else {
        today.pred_opt()
    };

    let mut streak = 0;
    while let Some(day) = cursor.filter(|day| *day >= habit.created_at && habit.is_logged(*day)) {
        streak += 1;
        cursor = day.pred_opt();
    }
    streak
}

fn daily_break_streak(habit: &Habit, today: NaiveDate) -> u32 {
    let mut cursor = Some(today);
    let mut streak = 0;
    while let Some(day) = cursor.filter(|day| *day >= habit.created_at && !habit.is_logged(*day)) {
        streak += 1;
        cursor = day.pred_opt();
    }
    streak
}

fn weekly_streak_unchecked(habit: &Habit, today: NaiveDate) -> u32 {
    let this_sunday = end_of_week(today);
    let anchor = match (habit.habit_type, is_week_successful(habit, today)) {
        (_, true) => Some(this_sunday),
        // The running week may still be completed; count from last week.
        (HabitType::Build, false) => this_sunday.checked_sub_signed(Duration::weeks(1)),
        (HabitType::Break, false) => None,
    };

    let mut cursor = anchor;
    let mut streak = 0;
    while let Some(sunday) =
        cursor.filter(|sunday| *sunday >= habit.created_at && is_week_successful(habit, *sunday))
    {
        streak += 1;
        cursor = sunday.checked_sub_signed(Duration::weeks(1));
    }
    streak
}
