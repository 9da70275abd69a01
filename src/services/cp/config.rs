//! Solver configuration

use std::time::Duration;

use crate::defaults;

/// Configuration for the schedule solver.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum solving time in seconds, capped at
    /// [`defaults::MAX_SOLVER_BUDGET_SECONDS`].
    pub max_time_seconds: u32,
    /// When set, activities that make the problem infeasible are dropped
    /// (lowest priority first) instead of failing the whole solve.
    /// Fixed-time activities and alerts are never dropped.
    pub relax_optional: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_time_seconds: defaults::DEFAULT_SOLVER_BUDGET_SECONDS,
            relax_optional: false,
        }
    }
}

impl SolverConfig {
    pub fn new(max_time_seconds: u32) -> Self {
        Self {
            max_time_seconds,
            relax_optional: false,
        }
    }

    /// Fast configuration for interactive use (~5 seconds).
    pub fn fast() -> Self {
        Self {
            max_time_seconds: 5,
            relax_optional: false,
        }
    }

    /// Quality configuration for background processing (~60 seconds).
    pub fn quality() -> Self {
        Self {
            max_time_seconds: defaults::MAX_SOLVER_BUDGET_SECONDS,
            relax_optional: false,
        }
    }

    pub fn with_relax_optional(mut self, relax: bool) -> Self {
        self.relax_optional = relax;
        self
    }

    /// The effective wall-clock budget, with the hard cap applied.
    pub fn budget(&self) -> Duration {
        let capped = self
            .max_time_seconds
            .min(defaults::MAX_SOLVER_BUDGET_SECONDS)
            .max(1);
        Duration::from_secs(capped as u64)
    }
}
