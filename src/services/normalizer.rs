//! Work-item normalization.
//!
//! Folds the heterogeneous inbound categories into a uniform activity list
//! the solver can handle. Items with defective fields are screened out here
//! with a per-item reason instead of poisoning the whole solve: malformed
//! times, missing identifiers, deadlines that already cannot be met, and
//! fixed-time slots that collide with the shift, a block or another fixed
//! slot.

use std::collections::HashSet;

use tracing::debug;

use crate::knowledge_base::KnowledgeBase;
use crate::services::cp::{Activity, ActivityKind, BlockedSlot};
use crate::services::time_codec;
use crate::types::{UnachievableItem, UnachievableReason, WorkItems};

/// Fallback priorities per category when no score is supplied.
const APPOINTMENT_PRIORITY: i32 = 5;
const MEETING_PRIORITY: i32 = 4;
const TASK_PRIORITY_LABEL: &str = "Medium";
const ALERT_URGENCY: i32 = 10;
const FOLLOW_UP_PRIORITY: i32 = 7;
const BREAK_PRIORITY: i32 = 5;

/// Output of normalization: activities ready for the solver plus the items
/// rejected on the way in.
#[derive(Debug, Default)]
pub struct NormalizedWorkload {
    pub activities: Vec<Activity>,
    pub rejected: Vec<UnachievableItem>,
}

/// Every declared item id and kind, resolved loosely. Used to report the
/// whole workload as unachievable when the constraints themselves are bad.
pub fn declared_item_refs(items: &WorkItems) -> Vec<(String, ActivityKind)> {
    let mut refs = Vec::new();
    let id_or_unknown = |id: Option<&str>| match id {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ => "UNKNOWN".to_string(),
    };

    for item in &items.appointments {
        refs.push((id_or_unknown(Some(&item.item_id)), ActivityKind::Appointment));
    }
    for item in &items.calendar_events {
        refs.push((id_or_unknown(Some(&item.item_id)), ActivityKind::Meeting));
    }
    for item in &items.tasks {
        refs.push((id_or_unknown(Some(&item.task_id)), ActivityKind::Task));
    }
    for item in &items.critical_alerts_to_address {
        refs.push((id_or_unknown(Some(&item.alert_id)), ActivityKind::Alert));
    }
    for item in &items.follow_ups {
        refs.push((id_or_unknown(Some(&item.follow_up_id)), ActivityKind::FollowUp));
    }
    for item in &items.care_plans {
        refs.push((id_or_unknown(item.care_plan_id.as_deref()), ActivityKind::CarePlan));
    }
    for item in &items.patient_vital_alerts {
        refs.push((id_or_unknown(item.alert_id.as_deref()), ActivityKind::VitalAlert));
    }
    for item in &items.interventions {
        refs.push((id_or_unknown(item.intervention_id.as_deref()), ActivityKind::Intervention));
    }
    for item in &items.break_times {
        refs.push((id_or_unknown(item.break_id.as_deref()), ActivityKind::Break));
    }
    refs
}

/// Fold all work-item categories into a uniform activity list.
pub fn normalize_work_items(
    items: &WorkItems,
    kb: &KnowledgeBase,
    shift_start: i32,
    shift_end: i32,
    blocks: &[BlockedSlot],
) -> NormalizedWorkload {
    let mut ctx = Normalizer {
        shift_start,
        shift_end,
        blocks,
        used_ids: HashSet::new(),
        out: NormalizedWorkload::default(),
    };

    for item in &items.appointments {
        ctx.push_timed_item(
            ActivityKind::Appointment,
            Some(&item.item_id),
            &item.title,
            item.estimated_duration,
            item.initial_priority_score.unwrap_or(APPOINTMENT_PRIORITY),
            item.is_fixed_time,
            item.start_time.as_deref(),
            None,
            item.location.as_deref(),
            item.patient_id.as_deref(),
        );
    }

    for item in &items.calendar_events {
        ctx.push_timed_item(
            ActivityKind::Meeting,
            Some(&item.item_id),
            &item.title,
            item.estimated_duration,
            item.initial_priority_score.unwrap_or(MEETING_PRIORITY),
            item.is_fixed_time,
            item.start_time.as_deref(),
            None,
            item.location.as_deref(),
            None,
        );
    }

    for item in &items.tasks {
        let priority = item.initial_priority_score.unwrap_or_else(|| {
            let label = item
                .initial_priority_score_text
                .as_deref()
                .unwrap_or(TASK_PRIORITY_LABEL);
            kb.priority_weight(label)
        });
        let duration = item
            .estimated_duration
            .unwrap_or_else(|| kb.task_default_duration());
        ctx.push_timed_item(
            ActivityKind::Task,
            Some(&item.task_id),
            &item.description,
            duration,
            priority,
            false,
            None,
            item.deadline.as_deref(),
            item.location_dependency.as_deref(),
            item.patient_id.as_deref(),
        );
    }

    for item in &items.critical_alerts_to_address {
        let duration = item
            .estimated_time_to_address
            .unwrap_or_else(|| kb.alert_default_address_time());
        ctx.push_timed_item(
            ActivityKind::Alert,
            Some(&item.alert_id),
            &format!("Alert: {}", item.summary),
            duration,
            item.urgency_score.unwrap_or(ALERT_URGENCY),
            false,
            None,
            None,
            None,
            item.patient_id.as_deref(),
        );
    }

    for item in &items.follow_ups {
        ctx.push_timed_item(
            ActivityKind::FollowUp,
            Some(&item.follow_up_id),
            &format!("Follow-up: {}", item.reason),
            item.estimated_duration_for_follow_up_action,
            item.initial_priority_score.unwrap_or(FOLLOW_UP_PRIORITY),
            false,
            None,
            None,
            None,
            item.patient_id.as_deref(),
        );
    }

    for item in &items.care_plans {
        ctx.push_timed_item(
            ActivityKind::CarePlan,
            item.care_plan_id.as_deref(),
            &item.description,
            item.estimated_duration,
            item.priority,
            false,
            None,
            item.deadline.as_deref(),
            None,
            item.patient_id.as_deref(),
        );
    }

    for item in &items.patient_vital_alerts {
        let duration = item
            .estimated_time_to_address
            .unwrap_or_else(|| kb.alert_default_address_time());
        ctx.push_timed_item(
            ActivityKind::VitalAlert,
            item.alert_id.as_deref(),
            &format!("Alert: {}", item.summary),
            duration,
            item.urgency_score,
            false,
            None,
            None,
            None,
            item.patient_id.as_deref(),
        );
    }

    for item in &items.interventions {
        ctx.push_timed_item(
            ActivityKind::Intervention,
            item.intervention_id.as_deref(),
            &item.description,
            item.estimated_duration,
            item.priority,
            false,
            None,
            item.deadline.as_deref(),
            None,
            item.patient_id.as_deref(),
        );
    }

    for item in &items.break_times {
        let title = match item.reason.as_deref() {
            Some(reason) if !reason.is_empty() => reason.to_string(),
            _ => "Break".to_string(),
        };
        ctx.push_timed_item(
            ActivityKind::Break,
            item.break_id.as_deref(),
            &title,
            item.duration,
            BREAK_PRIORITY,
            item.is_fixed,
            item.start_time.as_deref(),
            None,
            None,
            None,
        );
    }

    ctx.out
}

struct Normalizer<'a> {
    shift_start: i32,
    shift_end: i32,
    blocks: &'a [BlockedSlot],
    used_ids: HashSet<String>,
    out: NormalizedWorkload,
}

impl Normalizer<'_> {
    /// Validate one raw item and either append it as an activity or record
    /// it as rejected.
    #[allow(clippy::too_many_arguments)]
    fn push_timed_item(
        &mut self,
        kind: ActivityKind,
        raw_id: Option<&str>,
        title: &str,
        duration: i32,
        priority: i32,
        is_fixed: bool,
        start_time: Option<&str>,
        deadline: Option<&str>,
        location: Option<&str>,
        patient_id: Option<&str>,
    ) {
        let id = match raw_id {
            Some(value) if !value.trim().is_empty() => self.dedupe_id(value, kind),
            _ => {
                self.reject("UNKNOWN", kind, UnachievableReason::MissingIdentifier);
                return;
            }
        };

        if duration <= 0 {
            self.reject(&id, kind, UnachievableReason::MalformedInput);
            return;
        }

        // A fixed start is only meaningful when both the flag and the time
        // are present; an unfixed start time is just a hint and is dropped.
        let fixed_start = if is_fixed {
            match start_time {
                Some(raw) => match time_codec::parse_minutes(raw) {
                    Ok(minutes) => Some(minutes),
                    Err(error) => {
                        debug!(%id, %error, "rejecting item with malformed start time");
                        self.reject(&id, kind, UnachievableReason::MalformedInput);
                        return;
                    }
                },
                None => None,
            }
        } else {
            None
        };

        let deadline = match deadline {
            Some(raw) => match time_codec::parse_deadline(raw) {
                Ok(minutes) => minutes,
                Err(error) => {
                    debug!(%id, %error, "rejecting item with malformed deadline");
                    self.reject(&id, kind, UnachievableReason::MalformedInput);
                    return;
                }
            },
            None => None,
        };

        let activity = Activity {
            id: id.clone(),
            kind,
            duration,
            priority,
            fixed_start,
            deadline,
            location: location
                .filter(|value| !value.is_empty())
                .map(|value| value.to_string()),
            title: title.to_string(),
            details: details_string(location, patient_id),
        };

        if let Some(reason) = self.screen(&activity) {
            debug!(%id, reason = reason.as_str(), "item screened out before solving");
            self.reject(&id, kind, reason);
            return;
        }

        self.out.activities.push(activity);
    }

    /// Pre-solve screening. Returns the rejection reason for items that can
    /// be proven unschedulable without running the solver.
    fn screen(&self, activity: &Activity) -> Option<UnachievableReason> {
        let shift_length = self.shift_end - self.shift_start;
        if activity.duration > shift_length {
            return Some(UnachievableReason::Infeasible);
        }

        if let Some(deadline) = activity.deadline {
            let earliest_start = activity.fixed_start.unwrap_or(self.shift_start);
            if earliest_start + activity.duration > deadline {
                return Some(UnachievableReason::DeadlinePast);
            }
        }

        if let Some(fixed) = activity.fixed_start {
            if fixed < self.shift_start || fixed + activity.duration > self.shift_end {
                return Some(UnachievableReason::FixedTimeOutsideShift);
            }
            if self
                .blocks
                .iter()
                .any(|block| block.overlaps(fixed, activity.duration))
            {
                return Some(UnachievableReason::FixedTimeClashesBlock);
            }
            // A clash with an already-accepted fixed slot rejects the
            // newcomer; the earlier declaration wins.
            let clashes_fixed = self.out.activities.iter().any(|other| {
                other.fixed_start.is_some_and(|other_fixed| {
                    fixed < other_fixed + other.duration
                        && other_fixed < fixed + activity.duration
                })
            });
            if clashes_fixed {
                return Some(UnachievableReason::Infeasible);
            }
        }

        None
    }

    /// Duplicate ids across categories are tolerated by suffixing the kind tag.
    fn dedupe_id(&mut self, raw: &str, kind: ActivityKind) -> String {
        let id = if self.used_ids.contains(raw) {
            format!("{}_{}", raw, kind.as_str())
        } else {
            raw.to_string()
        };
        self.used_ids.insert(id.clone());
        id
    }

    fn reject(&mut self, id: &str, kind: ActivityKind, reason: UnachievableReason) {
        self.out.rejected.push(UnachievableItem {
            item_id: id.to_string(),
            item_type: kind.as_str().to_string(),
            reason,
        });
    }
}

fn details_string(location: Option<&str>, patient_id: Option<&str>) -> String {
    let location = match location {
        Some(value) if !value.is_empty() => value,
        _ => "N/A",
    };
    let patient = match patient_id {
        Some(value) if !value.is_empty() => value,
        _ => "N/A",
    };
    format!("Location: {location}, Patient: {patient}")
}
