//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage boundary the service layer talks to: load a habit
//!   with its full log, write metadata, insert/delete single log entries.
//! - Isolate SQLite query details from use-case orchestration.
//!
//! # Invariants
//! - Write paths validate the habit before persistence.
//! - Log entry inserts and deletes are idempotent.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod habit_repo;
