//! Habit domain model.
//!
//! # Responsibility
//! - Define the `Habit` aggregate and its behavior-driving enums.
//! - Define reminder slot keys attached to habits.
//!
//! # Invariants
//! - Every persisted habit is identified by a stable, non-nil `HabitId`.
//! - The log is a set of calendar dates; duplicates are unrepresentable.

pub mod habit;
pub mod reminder;
