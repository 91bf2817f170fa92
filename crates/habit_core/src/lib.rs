//! Core domain logic for habit tracking.
//! This crate is the single source of truth for streak, calendar and
//! log-edit invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{EngineConfig, TodayBoundary};
pub use engine::calendar::{
    empty_month_grid, is_this_week_successful, is_today_successful, month_grid,
    pending_dates_of_week, successful_dates, CalendarDay, GRID_DAYS,
};
pub use engine::reconcile::{diff, reconcile, weekly_toggle, EditState, LogDelta, LogEditSession};
pub use engine::reminder::{next_reminder, should_schedule_reminder};
pub use engine::streak::{current_streak, daily_streak, is_week_successful, weekly_streak};
pub use engine::window::{
    end_of_week, enumerate_days, first_grid_monday, start_of_month, start_of_week, DateRange,
};
pub use error::{HabitError, HabitResult};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::habit::{Habit, HabitId, HabitKind, HabitType, HabitValidationError, RepeatPattern};
pub use model::reminder::{next_trigger, ReminderSlot};
pub use repo::habit_repo::{HabitRepository, RepoError, RepoResult, SqliteHabitRepository};
pub use service::habit_service::{HabitOverview, HabitService, ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
