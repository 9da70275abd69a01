//! Inbound work-item categories.
//!
//! The request groups heterogeneous work into parallel category lists with
//! overlapping but not identical field sets. Every category is optional and
//! defaults to empty; unknown categories are ignored during deserialization.

use serde::{Deserialize, Serialize};

/// A patient appointment, optionally pinned to a fixed start time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub item_id: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    pub title: String,
    /// Only honored when `is_fixed_time` is set; otherwise a hint.
    #[serde(default)]
    pub start_time: Option<String>,
    pub estimated_duration: i32,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_fixed_time: bool,
    #[serde(default)]
    pub initial_priority_score: Option<i32>,
}

/// A calendar event such as a team meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub item_id: String,
    pub title: String,
    #[serde(default)]
    pub start_time: Option<String>,
    pub estimated_duration: i32,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_fixed_time: bool,
    #[serde(default)]
    pub initial_priority_score: Option<i32>,
}

/// A flexible task, optionally carrying a same-day deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task_id: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    pub description: String,
    #[serde(default)]
    pub estimated_duration: Option<i32>,
    #[serde(default)]
    pub initial_priority_score: Option<i32>,
    /// Textual priority label resolved through the knowledge base when no
    /// numeric score is given.
    #[serde(default, rename = "initialPriorityScore_text")]
    pub initial_priority_score_text: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub location_dependency: Option<String>,
}

/// A critical alert that must be addressed during the shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalAlert {
    pub alert_id: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub alert_type: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub estimated_time_to_address: Option<i32>,
    #[serde(default)]
    pub urgency_score: Option<i32>,
}

/// A follow-up action, e.g. a post-discharge call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    pub follow_up_id: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    pub reason: String,
    pub estimated_duration_for_follow_up_action: i32,
    #[serde(default)]
    pub initial_priority_score: Option<i32>,
}

/// A care-plan item for a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarePlan {
    #[serde(default)]
    pub care_plan_id: Option<String>,
    #[serde(default)]
    pub patient_id: Option<String>,
    pub description: String,
    #[serde(default = "default_care_plan_duration")]
    pub estimated_duration: i32,
    #[serde(default = "default_care_plan_priority")]
    pub priority: i32,
    /// `"None"` (any casing) means no deadline.
    #[serde(default)]
    pub deadline: Option<String>,
}

/// A vital-sign alert for a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientVitalAlert {
    #[serde(default)]
    pub alert_id: Option<String>,
    #[serde(default)]
    pub patient_id: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub estimated_time_to_address: Option<i32>,
    #[serde(default = "default_vital_alert_urgency")]
    pub urgency_score: i32,
}

/// A planned clinical intervention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intervention {
    #[serde(default)]
    pub intervention_id: Option<String>,
    #[serde(default)]
    pub patient_id: Option<String>,
    pub description: String,
    #[serde(default = "default_intervention_duration")]
    pub estimated_duration: i32,
    #[serde(default = "default_intervention_priority")]
    pub priority: i32,
    /// `"None"` (any casing) means no deadline.
    #[serde(default)]
    pub deadline: Option<String>,
}

/// A caller-declared break, optionally pinned to a fixed start time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakTime {
    #[serde(default)]
    pub break_id: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    pub duration: i32,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub is_fixed: bool,
}

/// The complete per-day workload, grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkItems {
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    #[serde(default)]
    pub calendar_events: Vec<CalendarEvent>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub critical_alerts_to_address: Vec<CriticalAlert>,
    #[serde(default)]
    pub follow_ups: Vec<FollowUp>,
    #[serde(default)]
    pub care_plans: Vec<CarePlan>,
    #[serde(default)]
    pub patient_vital_alerts: Vec<PatientVitalAlert>,
    #[serde(default)]
    pub interventions: Vec<Intervention>,
    #[serde(default)]
    pub break_times: Vec<BreakTime>,
}

fn default_care_plan_duration() -> i32 {
    30
}

fn default_care_plan_priority() -> i32 {
    8
}

fn default_intervention_duration() -> i32 {
    25
}

fn default_intervention_priority() -> i32 {
    7
}

fn default_vital_alert_urgency() -> i32 {
    9
}
