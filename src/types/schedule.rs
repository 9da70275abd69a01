//! Optimization request and response envelopes.

use serde::{Deserialize, Serialize};

use super::constraints::NurseConstraints;
use super::work_item::WorkItems;

/// Inbound optimization request for one nurse and one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub nurse_id: String,
    /// ISO date, `YYYY-MM-DD`.
    pub schedule_date: String,
    #[serde(default)]
    pub work_items: WorkItems,
    pub nurse_constraints: NurseConstraints,
}

/// A single slot in the optimized schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    pub slot_start_time: String,
    pub slot_end_time: String,
    pub activity_type: String,
    pub title: String,
    pub details: String,
    pub related_item_id: String,
}

/// Why an item could not be placed on the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnachievableReason {
    MalformedInput,
    MissingIdentifier,
    Infeasible,
    TimeoutNoSolution,
    DeadlinePast,
    FixedTimeOutsideShift,
    FixedTimeClashesBlock,
}

impl UnachievableReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnachievableReason::MalformedInput => "MalformedInput",
            UnachievableReason::MissingIdentifier => "MissingIdentifier",
            UnachievableReason::Infeasible => "Infeasible",
            UnachievableReason::TimeoutNoSolution => "TimeoutNoSolution",
            UnachievableReason::DeadlinePast => "DeadlinePast",
            UnachievableReason::FixedTimeOutsideShift => "FixedTimeOutsideShift",
            UnachievableReason::FixedTimeClashesBlock => "FixedTimeClashesBlock",
        }
    }
}

/// An item that could not be placed on the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnachievableItem {
    pub item_id: String,
    pub item_type: String,
    pub reason: UnachievableReason,
}

/// The full optimization result returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub nurse_id: String,
    pub schedule_date: String,
    pub optimized_schedule: Vec<ScheduleItem>,
    pub unachievable_items: Vec<UnachievableItem>,
    pub optimization_score: f64,
    pub warnings: Vec<String>,
}

impl ScheduleResponse {
    /// A response with nothing scheduled, used when the whole solve fails.
    pub fn failure(
        nurse_id: &str,
        schedule_date: &str,
        unachievable_items: Vec<UnachievableItem>,
        warnings: Vec<String>,
    ) -> Self {
        Self {
            nurse_id: nurse_id.to_string(),
            schedule_date: schedule_date.to_string(),
            optimized_schedule: vec![],
            unachievable_items,
            optimization_score: 0.0,
            warnings,
        }
    }
}
