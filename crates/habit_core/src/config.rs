//! Engine configuration.
//!
//! # Responsibility
//! - Hold the tunable boundaries of calendar projection.
//!
//! # Invariants
//! - `EngineConfig::default()` reproduces the latest observed app behavior.

use serde::{Deserialize, Serialize};

/// Whether "today" belongs to a BREAK habit's successful-date inversion.
///
/// Today is still undecided for a BREAK habit (a lapse may yet be logged),
/// so the default leaves it out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodayBoundary {
    #[default]
    Exclusive,
    Inclusive,
}

/// Settings consumed by the calendar projector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Boundary used for DAILY+BREAK successful dates.
    pub break_today: TodayBoundary,
}

impl EngineConfig {
    pub fn with_break_today(mut self, boundary: TodayBoundary) -> Self {
        self.break_today = boundary;
        self
    }
}
