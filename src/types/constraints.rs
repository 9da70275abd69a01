//! Per-nurse scheduling constraints.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Shift-level constraints for a single working day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NurseConstraints {
    pub shift_start_time: String,
    pub shift_end_time: String,
    pub lunch_break_preferred_start_time: String,
    pub lunch_break_duration: i32,
    #[serde(default)]
    pub blocked_out_times: Vec<BlockedTime>,
    /// Minutes of travel between named locations. Asymmetric entries are
    /// allowed; missing entries mean zero travel.
    #[serde(default)]
    pub travel_matrix: Option<TravelMatrix>,
    /// Accepted on the wire but not used by the solver.
    #[serde(default)]
    pub current_location: Option<String>,
    /// Accepted on the wire but not used by the solver.
    #[serde(default)]
    pub patient_preference: Option<String>,
    /// Optional ordering requirements between work items, by id.
    #[serde(default)]
    pub precedences: Vec<Precedence>,
}

/// A mandatory non-work interval (training, handover, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedTime {
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub reason: String,
}

/// `before` must finish before `after` may start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Precedence {
    pub before: String,
    pub after: String,
}

/// Travel times between named locations, in minutes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TravelMatrix(pub HashMap<String, HashMap<String, i32>>);

impl TravelMatrix {
    /// Travel time from `from` to `to`. Missing entries are zero.
    pub fn minutes(&self, from: &str, to: &str) -> i32 {
        self.0
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(0)
            .max(0)
    }
}
