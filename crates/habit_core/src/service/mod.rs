//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and engine computations into use-case
//!   level APIs.
//! - Keep callers decoupled from storage details and from the clock.
//!
//! # Invariants
//! - Log writes only happen after the engine accepted the whole edit.

pub mod habit_service;
