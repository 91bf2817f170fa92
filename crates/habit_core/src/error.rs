//! Precondition taxonomy shared by the date engine and the service layer.
//!
//! # Responsibility
//! - Name the contract violations callers must handle explicitly.
//!
//! # Invariants
//! - Engine functions never panic on contract violations; they return
//!   `HabitError` instead.
//! - `InvalidArgument` always means "reject the whole update".

use crate::model::habit::HabitId;
use thiserror::Error;

pub type HabitResult<T> = Result<T, HabitError>;

/// Contract violations raised by habit computations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HabitError {
    /// A WEEKLY-only operation was invoked on a DAILY habit, or vice versa.
    #[error("invalid habit state: {0}")]
    InvalidState(String),
    /// A log update touches a date other than today, or more than one date.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// No habit is stored under the requested id.
    #[error("habit not found: {0}")]
    NotFound(HabitId),
}

impl HabitError {
    pub(crate) fn daily_only(operation: &str) -> Self {
        Self::InvalidState(format!("`{operation}` requires a daily habit"))
    }

    pub(crate) fn weekly_only(operation: &str) -> Self {
        Self::InvalidState(format!("`{operation}` requires a weekly habit"))
    }
}
