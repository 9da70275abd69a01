//! Compile-time fallback values used when the knowledge base has no rule.

/// Default duration for tasks without an explicit estimate.
pub const DEFAULT_TASK_DURATION_MINUTES: i32 = 30;

/// Default time to address an alert without an explicit estimate.
pub const DEFAULT_ALERT_ADDRESS_MINUTES: i32 = 15;

/// Priority weights for textual priority labels.
pub const PRIORITY_WEIGHT_HIGH: i32 = 10;
pub const PRIORITY_WEIGHT_MEDIUM: i32 = 5;
pub const PRIORITY_WEIGHT_LOW: i32 = 1;

/// Objective weight for the summed priority of scheduled activities.
pub const OBJECTIVE_PRIORITY_SUM_WEIGHT: i64 = 100;

/// Objective weight for lateness against deadlines.
pub const OBJECTIVE_LATENESS_WEIGHT: i64 = 10;

/// Objective weight for the lunch deviation term.
pub const OBJECTIVE_LUNCH_DEVIATION_WEIGHT: i64 = 1;

/// Divisor applied to the summed start times of high-priority activities.
/// Scales the early-start term down so it only breaks ties.
pub const OBJECTIVE_EARLY_START_DIVISOR: i64 = 10;

/// Activities with priority at or above this value are pulled earlier.
pub const HIGH_PRIORITY_THRESHOLD: i32 = 8;

/// Default wall-clock budget for a single optimization run.
pub const DEFAULT_SOLVER_BUDGET_SECONDS: u32 = 15;

/// Hard cap on the wall-clock budget a caller may request.
pub const MAX_SOLVER_BUDGET_SECONDS: u32 = 60;
