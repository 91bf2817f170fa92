//! Date/state engine.
//!
//! # Responsibility
//! - Derive streaks, calendar projections and pending days from a habit log.
//! - Reconcile client-submitted logs against persisted logs.
//!
//! # Invariants
//! - Every function is pure: inputs are values, "today" is a parameter.
//! - Weeks start on Monday and end on Sunday, both inclusive.
//! - Contract violations surface as `HabitError`, never as panics.

pub mod calendar;
pub mod reconcile;
pub mod reminder;
pub mod streak;
pub mod window;
