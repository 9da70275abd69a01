//! Scheduling problem types
//!
//! All times are minutes from midnight.

/// Kind of a schedulable activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Appointment,
    Meeting,
    Task,
    Alert,
    FollowUp,
    CarePlan,
    Intervention,
    VitalAlert,
    /// Synthetic or caller-declared rest period.
    Break,
    /// Synthetic entry for a blocked-out interval.
    Blocked,
}

impl ActivityKind {
    /// Tag used for `activityType` in the output schedule.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Appointment => "appointment",
            ActivityKind::Meeting => "meeting",
            ActivityKind::Task => "task",
            ActivityKind::Alert => "alert",
            ActivityKind::FollowUp => "follow_up",
            ActivityKind::CarePlan => "care_plan",
            ActivityKind::Intervention => "intervention",
            ActivityKind::VitalAlert => "vital_alert",
            ActivityKind::Break => "Break",
            ActivityKind::Blocked => "Blocked",
        }
    }
}

/// A normalized schedulable activity.
#[derive(Debug, Clone)]
pub struct Activity {
    /// Unique identifier, stable between input and output.
    pub id: String,
    pub kind: ActivityKind,
    /// Duration in minutes, always positive.
    pub duration: i32,
    /// Higher is more important.
    pub priority: i32,
    /// If set, the activity must start exactly here.
    pub fixed_start: Option<i32>,
    /// If set, `start + duration` must not exceed this.
    pub deadline: Option<i32>,
    /// Consulted only when a travel matrix is supplied.
    pub location: Option<String>,
    /// Display-only, passed through to the output.
    pub title: String,
    /// Display-only, passed through to the output.
    pub details: String,
}

impl Activity {
    pub fn end_if_started_at(&self, start: i32) -> i32 {
        start + self.duration
    }
}

/// Lunch break configuration.
#[derive(Debug, Clone, Copy)]
pub struct LunchConfig {
    pub preferred_start: i32,
    pub duration: i32,
}

/// A mandatory blocked-out interval.
#[derive(Debug, Clone)]
pub struct BlockedSlot {
    pub start: i32,
    pub end: i32,
    pub reason: String,
}

impl BlockedSlot {
    pub fn duration(&self) -> i32 {
        self.end - self.start
    }

    /// Whether `[start, start + duration)` intersects this slot.
    pub fn overlaps(&self, start: i32, duration: i32) -> bool {
        start < self.end && self.start < start + duration
    }
}

/// An ordering requirement between two activities, by index.
#[derive(Debug, Clone, Copy)]
pub struct PrecedencePair {
    pub before: usize,
    pub after: usize,
}

/// The complete scheduling problem handed to the solver.
#[derive(Debug, Clone)]
pub struct ScheduleProblem {
    pub shift_start: i32,
    pub shift_end: i32,
    pub lunch: LunchConfig,
    pub blocks: Vec<BlockedSlot>,
    pub activities: Vec<Activity>,
    pub travel: Option<crate::types::TravelMatrix>,
    pub precedences: Vec<PrecedencePair>,
}

impl ScheduleProblem {
    /// Travel time between two activities, zero when either has no
    /// location or no matrix is configured.
    pub fn travel_minutes(&self, from: &Activity, to: &Activity) -> i32 {
        match (&self.travel, &from.location, &to.location) {
            (Some(matrix), Some(a), Some(b)) if a != b => matrix.minutes(a, b),
            _ => 0,
        }
    }
}
