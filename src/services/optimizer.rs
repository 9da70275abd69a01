//! Daily schedule optimization.
//!
//! Wires the pipeline together: parse the nurse constraints, normalize the
//! work items, solve the constraint model, and project the solution back
//! into the response envelope.
//!
//! Error surfaces split three ways:
//! - a malformed `scheduleDate` never enters the solver and is returned as
//!   an error for the transport layer to reject;
//! - malformed shift/lunch/block fields abort the solve but still return a
//!   well-formed envelope with every declared item unachievable;
//! - per-item defects only remove that item.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::knowledge_base::KnowledgeBase;
use crate::services::cp::{
    BlockedSlot, CpScheduler, LunchConfig, PrecedencePair, ScheduleProblem, ScheduleSolution,
    SolveStatus, SolverConfig,
};
use crate::services::normalizer;
use crate::services::time_codec;
use crate::types::{
    NurseConstraints, ScheduleItem, ScheduleRequest, ScheduleResponse, UnachievableItem,
    UnachievableReason,
};

/// How far lunch may drift from the preference before a warning is emitted.
const LUNCH_DEVIATION_WARNING_MINUTES: i32 = 15;

/// How close to its deadline an activity may finish before a warning.
const DEADLINE_PROXIMITY_WARNING_MINUTES: i32 = 5;

/// Optimize one nurse's daily schedule.
///
/// Returns `Err` only for envelope-level defects (an unparseable
/// `scheduleDate`); every other failure mode produces a well-formed
/// [`ScheduleResponse`].
pub fn optimize_schedule(
    request: &ScheduleRequest,
    kb: &KnowledgeBase,
    config: &SolverConfig,
) -> Result<ScheduleResponse> {
    let date = NaiveDate::parse_from_str(&request.schedule_date, "%Y-%m-%d")
        .with_context(|| format!("invalid schedule date: {}", request.schedule_date))?;
    let date_string = date.format("%Y-%m-%d").to_string();

    info!(nurse_id = %request.nurse_id, date = %date_string, "optimizing schedule");

    let parsed = match parse_constraints(&request.nurse_constraints) {
        Ok(parsed) => parsed,
        Err(error) => {
            warn!(%error, "nurse constraints are invalid, aborting solve");
            return Ok(constraints_failure(request, &date_string, &error));
        }
    };

    let workload = normalizer::normalize_work_items(
        &request.work_items,
        kb,
        parsed.shift_start,
        parsed.shift_end,
        &parsed.blocks,
    );

    let precedences = resolve_precedences(&request.nurse_constraints, &workload.activities);

    let problem = ScheduleProblem {
        shift_start: parsed.shift_start,
        shift_end: parsed.shift_end,
        lunch: parsed.lunch,
        blocks: parsed.blocks,
        activities: workload.activities,
        travel: request.nurse_constraints.travel_matrix.clone(),
        precedences,
    };

    let scheduler = CpScheduler::new(config.clone());
    let solution = scheduler.solve(&problem, kb.objective_weights());

    Ok(project(request, &date_string, &problem, &solution, workload.rejected, kb))
}

struct ParsedConstraints {
    shift_start: i32,
    shift_end: i32,
    lunch: LunchConfig,
    blocks: Vec<BlockedSlot>,
}

fn parse_constraints(constraints: &NurseConstraints) -> Result<ParsedConstraints> {
    let shift_start = time_codec::parse_minutes(&constraints.shift_start_time)
        .context("shift start time")?;
    let shift_end =
        time_codec::parse_minutes(&constraints.shift_end_time).context("shift end time")?;
    if shift_end <= shift_start {
        bail!("shift end must be after shift start");
    }

    let preferred_start = time_codec::parse_minutes(&constraints.lunch_break_preferred_start_time)
        .context("lunch break preferred start time")?;
    let duration = constraints.lunch_break_duration;
    if duration <= 0 {
        bail!("lunch break duration must be positive");
    }
    if duration > shift_end - shift_start {
        bail!("lunch break does not fit inside the shift");
    }

    let mut blocks = Vec::new();
    for blocked in &constraints.blocked_out_times {
        let start = time_codec::parse_minutes(&blocked.start).context("blocked time start")?;
        let end = time_codec::parse_minutes(&blocked.end).context("blocked time end")?;
        if end < start {
            bail!("blocked time ends before it starts");
        }
        // Zero-length blocks are dropped
        if end == start {
            continue;
        }
        blocks.push(BlockedSlot {
            start,
            end,
            reason: blocked.reason.clone(),
        });
    }

    Ok(ParsedConstraints {
        shift_start,
        shift_end,
        lunch: LunchConfig { preferred_start, duration },
        blocks,
    })
}

/// Resolve caller precedence pairs from item ids to activity indices.
/// Pairs naming unknown or rejected items are skipped.
fn resolve_precedences(
    constraints: &NurseConstraints,
    activities: &[crate::services::cp::Activity],
) -> Vec<PrecedencePair> {
    let index_of =
        |id: &str| activities.iter().position(|activity| activity.id == id);

    constraints
        .precedences
        .iter()
        .filter_map(|pair| {
            let before = index_of(&pair.before);
            let after = index_of(&pair.after);
            match (before, after) {
                (Some(before), Some(after)) if before != after => {
                    Some(PrecedencePair { before, after })
                }
                _ => {
                    warn!(
                        before = %pair.before,
                        after = %pair.after,
                        "ignoring precedence naming an unknown item"
                    );
                    None
                }
            }
        })
        .collect()
}

/// Envelope for a solve aborted by bad shift/lunch/block fields: every
/// declared item is unachievable and a single warning explains why.
fn constraints_failure(
    request: &ScheduleRequest,
    date_string: &str,
    error: &anyhow::Error,
) -> ScheduleResponse {
    let unachievable = normalizer::declared_item_refs(&request.work_items)
        .into_iter()
        .map(|(item_id, kind)| UnachievableItem {
            item_id,
            item_type: kind.as_str().to_string(),
            reason: UnachievableReason::MalformedInput,
        })
        .collect();

    ScheduleResponse::failure(
        &request.nurse_id,
        date_string,
        unachievable,
        vec![format!("Invalid nurse constraints: {error:#}")],
    )
}

/// Project the solver outcome into the response envelope.
fn project(
    request: &ScheduleRequest,
    date_string: &str,
    problem: &ScheduleProblem,
    solution: &ScheduleSolution,
    mut unachievable: Vec<UnachievableItem>,
    kb: &KnowledgeBase,
) -> ScheduleResponse {
    if !solution.status.is_success() {
        let reason = match solution.status {
            SolveStatus::Timeout => UnachievableReason::TimeoutNoSolution,
            _ => UnachievableReason::Infeasible,
        };
        unachievable.extend(problem.activities.iter().map(|activity| UnachievableItem {
            item_id: activity.id.clone(),
            item_type: activity.kind.as_str().to_string(),
            reason,
        }));
        return ScheduleResponse::failure(
            &request.nurse_id,
            date_string,
            unachievable,
            vec!["No feasible schedule could be generated with the given constraints.".to_string()],
        );
    }

    let mut warnings = Vec::new();
    let mut entries: Vec<(i32, ScheduleItem)> = Vec::new();

    for planned in &solution.planned {
        let activity = &problem.activities[planned.activity_index];
        entries.push((
            planned.start,
            ScheduleItem {
                slot_start_time: time_codec::format_minutes(planned.start),
                slot_end_time: time_codec::format_minutes(planned.end),
                activity_type: activity.kind.as_str().to_string(),
                title: activity.title.clone(),
                details: activity.details.clone(),
                related_item_id: activity.id.clone(),
            },
        ));

        if let Some(deadline) = activity.deadline {
            if deadline - planned.end <= DEADLINE_PROXIMITY_WARNING_MINUTES {
                warnings.push(format!(
                    "Activity {} finishes close to its deadline.",
                    activity.id
                ));
            }
        }
    }

    let lunch_start = solution.lunch_start.unwrap_or(problem.lunch.preferred_start);
    entries.push((
        lunch_start,
        ScheduleItem {
            slot_start_time: time_codec::format_minutes(lunch_start),
            slot_end_time: time_codec::format_minutes(lunch_start + problem.lunch.duration),
            activity_type: "Break".to_string(),
            title: "Lunch Break".to_string(),
            details: String::new(),
            related_item_id: "LUNCH".to_string(),
        },
    ));
    if (lunch_start - problem.lunch.preferred_start).abs() > LUNCH_DEVIATION_WARNING_MINUTES {
        warnings.push("Lunch break scheduled more than 15 minutes from preferred time.".to_string());
    }

    for (index, block) in problem.blocks.iter().enumerate() {
        let title = if block.reason.is_empty() {
            "Blocked Time".to_string()
        } else {
            block.reason.clone()
        };
        entries.push((
            block.start,
            ScheduleItem {
                slot_start_time: time_codec::format_minutes(block.start),
                slot_end_time: time_codec::format_minutes(block.end),
                activity_type: "Blocked".to_string(),
                title,
                details: String::new(),
                related_item_id: format!("BLOCK_{index}"),
            },
        ));
    }

    if solution.status == SolveStatus::Feasible {
        warnings.push("Time limit reached; schedule may be suboptimal.".to_string());
    }

    entries.sort_by_key(|(start, _)| *start);
    let optimized_schedule: Vec<ScheduleItem> =
        entries.into_iter().map(|(_, item)| item).collect();

    for &index in &solution.dropped {
        let activity = &problem.activities[index];
        unachievable.push(UnachievableItem {
            item_id: activity.id.clone(),
            item_type: activity.kind.as_str().to_string(),
            reason: UnachievableReason::Infeasible,
        });
    }

    let weights = kb.objective_weights();
    let priority_total: i64 = solution
        .planned
        .iter()
        .map(|planned| problem.activities[planned.activity_index].priority as i64)
        .sum();
    let optimization_score = weights.priority_sum as f64 * priority_total as f64
        - solution.objective as f64 / weights.early_start_divisor as f64;

    ScheduleResponse {
        nurse_id: request.nurse_id.clone(),
        schedule_date: date_string.to_string(),
        optimized_schedule,
        unachievable_items: unachievable,
        optimization_score,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Appointment, BlockedTime, BreakTime, CarePlan, Intervention, NurseConstraints,
        PatientVitalAlert, Precedence, Task, WorkItems,
    };

    fn constraints(shift_start: &str, shift_end: &str, lunch_pref: &str, lunch_dur: i32) -> NurseConstraints {
        NurseConstraints {
            shift_start_time: shift_start.to_string(),
            shift_end_time: shift_end.to_string(),
            lunch_break_preferred_start_time: lunch_pref.to_string(),
            lunch_break_duration: lunch_dur,
            blocked_out_times: vec![],
            travel_matrix: None,
            current_location: None,
            patient_preference: None,
            precedences: vec![],
        }
    }

    fn request(work_items: WorkItems, nurse_constraints: NurseConstraints) -> ScheduleRequest {
        ScheduleRequest {
            nurse_id: "NBetty01".to_string(),
            schedule_date: "2023-10-01".to_string(),
            work_items,
            nurse_constraints,
        }
    }

    fn optimize(request: &ScheduleRequest) -> ScheduleResponse {
        optimize_schedule(request, &KnowledgeBase::default(), &SolverConfig::fast()).unwrap()
    }

    fn fixed_appointment(id: &str, start: &str, duration: i32, priority: i32) -> Appointment {
        Appointment {
            item_id: id.to_string(),
            patient_id: Some("102".to_string()),
            title: format!("Visit {id}"),
            start_time: Some(start.to_string()),
            estimated_duration: duration,
            location: None,
            is_fixed_time: true,
            initial_priority_score: Some(priority),
        }
    }

    fn task(id: &str, duration: i32, priority: i32, deadline: Option<&str>) -> Task {
        Task {
            task_id: id.to_string(),
            patient_id: None,
            description: format!("Task {id}"),
            estimated_duration: Some(duration),
            initial_priority_score: Some(priority),
            initial_priority_score_text: None,
            due_date: None,
            deadline: deadline.map(|value| value.to_string()),
            location_dependency: None,
        }
    }

    fn entry<'a>(response: &'a ScheduleResponse, id: &str) -> &'a ScheduleItem {
        response
            .optimized_schedule
            .iter()
            .find(|item| item.related_item_id == id)
            .unwrap_or_else(|| panic!("no schedule entry for {id}"))
    }

    fn minutes(value: &str) -> i32 {
        time_codec::parse_minutes(value).unwrap()
    }

    fn assert_schedule_invariants(response: &ScheduleResponse, shift_start: &str, shift_end: &str) {
        // Sorted strictly by slot start
        let starts: Vec<i32> = response
            .optimized_schedule
            .iter()
            .map(|item| minutes(&item.slot_start_time))
            .collect();
        for pair in starts.windows(2) {
            assert!(pair[0] <= pair[1], "schedule not sorted: {starts:?}");
        }

        // Pairwise non-overlap
        let intervals: Vec<(i32, i32)> = response
            .optimized_schedule
            .iter()
            .map(|item| (minutes(&item.slot_start_time), minutes(&item.slot_end_time)))
            .collect();
        for i in 0..intervals.len() {
            for j in (i + 1)..intervals.len() {
                let (a_start, a_end) = intervals[i];
                let (b_start, b_end) = intervals[j];
                assert!(
                    a_end <= b_start || b_end <= a_start,
                    "overlap between {:?} and {:?}",
                    response.optimized_schedule[i],
                    response.optimized_schedule[j],
                );
            }
        }

        // Non-block entries stay within the shift
        let (shift_start, shift_end) = (minutes(shift_start), minutes(shift_end));
        for item in &response.optimized_schedule {
            if item.activity_type != "Blocked" {
                let start = minutes(&item.slot_start_time);
                let end = minutes(&item.slot_end_time);
                assert!(
                    start >= shift_start && end <= shift_end,
                    "{item:?} outside shift"
                );
            }
        }
    }

    // -----------------------------------------------------------------------
    // Empty day: only lunch is scheduled, at the preferred time, score zero
    // -----------------------------------------------------------------------
    #[test]
    fn empty_day_schedules_lunch_only() {
        let request = request(
            WorkItems::default(),
            constraints("08:00:00", "17:00:00", "12:00:00", 30),
        );

        let response = optimize(&request);

        assert_eq!(response.optimized_schedule.len(), 1);
        let lunch = entry(&response, "LUNCH");
        assert_eq!(lunch.slot_start_time, "12:00:00");
        assert_eq!(lunch.slot_end_time, "12:30:00");
        assert_eq!(lunch.activity_type, "Break");
        assert_eq!(response.optimization_score, 0.0);
        assert!(response.warnings.is_empty());
        assert!(response.unachievable_items.is_empty());
    }

    // -----------------------------------------------------------------------
    // Two fixed appointments in the same slot: exactly one survives
    // -----------------------------------------------------------------------
    #[test]
    fn clashing_fixed_appointments_keep_exactly_one() {
        let items = WorkItems {
            appointments: vec![
                fixed_appointment("V1", "09:00:00", 30, 5),
                fixed_appointment("V2", "09:00:00", 30, 5),
            ],
            ..Default::default()
        };
        let request = request(items, constraints("08:00:00", "17:00:00", "12:00:00", 30));

        let response = optimize(&request);

        let scheduled: Vec<&str> = response
            .optimized_schedule
            .iter()
            .filter(|item| item.activity_type == "appointment")
            .map(|item| item.related_item_id.as_str())
            .collect();
        assert_eq!(scheduled, vec!["V1"]);
        assert_eq!(entry(&response, "V1").slot_start_time, "09:00:00");

        assert_eq!(response.unachievable_items.len(), 1);
        assert_eq!(response.unachievable_items[0].item_id, "V2");
        assert_eq!(
            response.unachievable_items[0].reason,
            UnachievableReason::Infeasible
        );
        assert_schedule_invariants(&response, "08:00:00", "17:00:00");
    }

    // -----------------------------------------------------------------------
    // Deadline-driven ordering with a block in the afternoon
    // -----------------------------------------------------------------------
    #[test]
    fn deadline_driven_ordering_with_block() {
        let items = WorkItems {
            tasks: vec![
                task("A", 25, 9, Some("12:00:00")),
                task("B", 15, 5, Some("17:00:00")),
            ],
            ..Default::default()
        };
        let mut nurse_constraints = constraints("08:00:00", "17:00:00", "12:30:00", 30);
        nurse_constraints.blocked_out_times = vec![BlockedTime {
            start: "13:00:00".to_string(),
            end: "13:30:00".to_string(),
            reason: "Mandatory Training".to_string(),
        }];
        let request = request(items, nurse_constraints);

        let response = optimize(&request);

        assert!(response.unachievable_items.is_empty());
        let a = entry(&response, "A");
        assert!(minutes(&a.slot_end_time) <= minutes("12:00:00"));
        entry(&response, "B");

        let lunches: Vec<_> = response
            .optimized_schedule
            .iter()
            .filter(|item| item.related_item_id == "LUNCH")
            .collect();
        assert_eq!(lunches.len(), 1);
        let lunch_start = minutes(&lunches[0].slot_start_time);
        assert!(lunch_start >= minutes("08:00:00") && lunch_start <= minutes("16:30:00"));

        let block = entry(&response, "BLOCK_0");
        assert_eq!(block.slot_start_time, "13:00:00");
        assert_eq!(block.slot_end_time, "13:30:00");
        assert_eq!(block.title, "Mandatory Training");

        assert_schedule_invariants(&response, "08:00:00", "17:00:00");
    }

    // -----------------------------------------------------------------------
    // The full sample request: everything schedulable, alert pulled early
    // -----------------------------------------------------------------------
    fn sample_request() -> ScheduleRequest {
        let items = WorkItems {
            appointments: vec![
                Appointment {
                    item_id: "V701".to_string(),
                    patient_id: Some("102".to_string()),
                    title: "Jane Smith - Diabetes FU".to_string(),
                    start_time: Some("09:00:00".to_string()),
                    estimated_duration: 45,
                    location: Some("Clinic A".to_string()),
                    is_fixed_time: true,
                    initial_priority_score: Some(7),
                },
                Appointment {
                    item_id: "V702".to_string(),
                    patient_id: Some("P002".to_string()),
                    title: "Robert Blue - Checkup".to_string(),
                    start_time: Some("14:00:00".to_string()),
                    estimated_duration: 30,
                    location: Some("Clinic B".to_string()),
                    is_fixed_time: true,
                    initial_priority_score: Some(5),
                },
            ],
            tasks: vec![task("T501", 25, 9, Some("12:00:00"))],
            patient_vital_alerts: vec![PatientVitalAlert {
                alert_id: Some("VA001".to_string()),
                patient_id: Some("102".to_string()),
                summary: "SpO2 drop".to_string(),
                estimated_time_to_address: Some(20),
                urgency_score: 10,
            }],
            break_times: vec![BreakTime {
                break_id: Some("BRK001".to_string()),
                start_time: Some("12:00:00".to_string()),
                duration: 15,
                reason: Some("Coffee".to_string()),
                is_fixed: true,
            }],
            care_plans: vec![CarePlan {
                care_plan_id: Some("CP001".to_string()),
                patient_id: Some("102".to_string()),
                description: "Wound care".to_string(),
                estimated_duration: 30,
                priority: 8,
                deadline: Some("None".to_string()),
            }],
            interventions: vec![Intervention {
                intervention_id: Some("INT001".to_string()),
                patient_id: Some("102".to_string()),
                description: "IV change".to_string(),
                estimated_duration: 25,
                priority: 7,
                deadline: None,
            }],
            ..Default::default()
        };

        let mut nurse_constraints = constraints("08:00:00", "17:00:00", "12:30:00", 30);
        nurse_constraints.blocked_out_times = vec![BlockedTime {
            start: "13:00:00".to_string(),
            end: "13:30:00".to_string(),
            reason: "Mandatory Training".to_string(),
        }];
        request(items, nurse_constraints)
    }

    #[test]
    fn sample_request_schedules_everything() {
        let request = sample_request();
        let response = optimize(&request);

        assert!(
            response.unachievable_items.is_empty(),
            "unexpected unachievable items: {:?}",
            response.unachievable_items
        );

        assert_eq!(entry(&response, "V701").slot_start_time, "09:00:00");
        assert_eq!(entry(&response, "V702").slot_start_time, "14:00:00");
        assert_eq!(entry(&response, "BRK001").slot_start_time, "12:00:00");
        assert_eq!(entry(&response, "BLOCK_0").slot_start_time, "13:00:00");

        // The highest-priority work claims the start of the shift
        assert_eq!(entry(&response, "VA001").slot_start_time, "08:00:00");

        // Lunch lands on the preference, or a deviation warning is emitted
        let lunch = entry(&response, "LUNCH");
        let deviation = (minutes(&lunch.slot_start_time) - minutes("12:30:00")).abs();
        if deviation > 15 {
            assert!(response
                .warnings
                .iter()
                .any(|warning| warning.contains("Lunch break")));
        }

        assert!(response.optimization_score > 0.0);
        assert_schedule_invariants(&response, "08:00:00", "17:00:00");
    }

    // -----------------------------------------------------------------------
    // Partition: every declared item is scheduled or unachievable, never both
    // -----------------------------------------------------------------------
    #[test]
    fn every_item_is_scheduled_or_unachievable() {
        let request = sample_request();
        let response = optimize(&request);

        let declared = [
            "V701", "V702", "T501", "VA001", "BRK001", "CP001", "INT001",
        ];
        for id in declared {
            let scheduled = response
                .optimized_schedule
                .iter()
                .any(|item| item.related_item_id == id);
            let unachievable = response
                .unachievable_items
                .iter()
                .any(|item| item.item_id == id);
            assert!(
                scheduled ^ unachievable,
                "{id}: scheduled={scheduled}, unachievable={unachievable}"
            );
        }
    }

    // -----------------------------------------------------------------------
    // Idempotence: the same request solves to the same envelope
    // -----------------------------------------------------------------------
    #[test]
    fn repeated_runs_yield_identical_envelopes() {
        let request = sample_request();
        let first = optimize(&request);
        let second = optimize(&request);
        assert_eq!(first, second);
    }

    // -----------------------------------------------------------------------
    // A larger budget never produces a worse schedule
    // -----------------------------------------------------------------------
    #[test]
    fn larger_budget_never_lowers_the_score() {
        let request = sample_request();
        let kb = KnowledgeBase::default();
        let fast = optimize_schedule(&request, &kb, &SolverConfig::fast()).unwrap();
        let quality = optimize_schedule(&request, &kb, &SolverConfig::quality()).unwrap();
        assert!(quality.optimization_score >= fast.optimization_score);
    }

    // -----------------------------------------------------------------------
    // Oversubscribed shift: whole solve is infeasible, everything reported
    // -----------------------------------------------------------------------
    #[test]
    fn oversubscribed_shift_reports_all_items_infeasible() {
        let items = WorkItems {
            tasks: vec![
                task("T1", 30, 5, None),
                task("T2", 30, 5, None),
                task("T3", 30, 5, None),
            ],
            ..Default::default()
        };
        let request = request(items, constraints("08:00:00", "09:00:00", "08:00:00", 30));

        let response = optimize(&request);

        assert!(response.optimized_schedule.is_empty());
        assert_eq!(response.unachievable_items.len(), 3);
        for item in &response.unachievable_items {
            assert_eq!(item.reason, UnachievableReason::Infeasible);
        }
        assert_eq!(response.optimization_score, 0.0);
        assert!(!response.warnings.is_empty());
    }

    #[test]
    fn relax_mode_salvages_part_of_an_oversubscribed_shift() {
        let items = WorkItems {
            tasks: vec![
                task("T1", 30, 9, None),
                task("T2", 30, 5, None),
                task("T3", 30, 3, None),
            ],
            ..Default::default()
        };
        let request = request(items, constraints("08:00:00", "09:00:00", "08:00:00", 30));

        let response = optimize_schedule(
            &request,
            &KnowledgeBase::default(),
            &SolverConfig::fast().with_relax_optional(true),
        )
        .unwrap();

        let scheduled_tasks: Vec<&str> = response
            .optimized_schedule
            .iter()
            .filter(|item| item.activity_type == "task")
            .map(|item| item.related_item_id.as_str())
            .collect();
        assert_eq!(scheduled_tasks, vec!["T1"]);
        assert_eq!(response.unachievable_items.len(), 2);
        assert_schedule_invariants(&response, "08:00:00", "09:00:00");
    }

    // -----------------------------------------------------------------------
    // Travel: a flexible visit at another clinic waits out the travel time
    // -----------------------------------------------------------------------
    #[test]
    fn travel_time_separates_visits_at_different_clinics() {
        let flexible = Appointment {
            item_id: "B".to_string(),
            patient_id: None,
            title: "Visit B".to_string(),
            start_time: None,
            estimated_duration: 30,
            location: Some("Clinic B".to_string()),
            is_fixed_time: false,
            initial_priority_score: Some(5),
        };
        let items = WorkItems {
            appointments: vec![
                Appointment {
                    location: Some("Clinic A".to_string()),
                    ..fixed_appointment("A", "09:00:00", 30, 5)
                },
                flexible,
            ],
            ..Default::default()
        };

        let mut nurse_constraints = constraints("09:00:00", "17:00:00", "12:00:00", 30);
        nurse_constraints.travel_matrix = Some(
            serde_json::from_str(r#"{"Clinic A": {"Clinic B": 15}, "Clinic B": {"Clinic A": 15}}"#)
                .unwrap(),
        );
        let request = request(items, nurse_constraints);

        let response = optimize(&request);

        assert!(response.unachievable_items.is_empty());
        assert_eq!(entry(&response, "A").slot_start_time, "09:00:00");
        // B cannot precede the 09:00 fixed visit, so it follows it plus travel
        assert!(minutes(&entry(&response, "B").slot_start_time) >= minutes("09:45:00"));
        assert_schedule_invariants(&response, "09:00:00", "17:00:00");
    }

    // -----------------------------------------------------------------------
    // Precedences: caller-supplied ordering is honored
    // -----------------------------------------------------------------------
    #[test]
    fn caller_precedence_orders_tasks() {
        let items = WorkItems {
            tasks: vec![task("PREP", 30, 5, None), task("REVIEW", 30, 5, None)],
            ..Default::default()
        };
        let mut nurse_constraints = constraints("08:00:00", "17:00:00", "12:00:00", 30);
        nurse_constraints.precedences = vec![Precedence {
            before: "PREP".to_string(),
            after: "REVIEW".to_string(),
        }];
        let request = request(items, nurse_constraints);

        let response = optimize(&request);

        let prep_end = minutes(&entry(&response, "PREP").slot_end_time);
        let review_start = minutes(&entry(&response, "REVIEW").slot_start_time);
        assert!(review_start >= prep_end);
    }

    // -----------------------------------------------------------------------
    // Deadline proximity warning
    // -----------------------------------------------------------------------
    #[test]
    fn tight_deadline_emits_proximity_warning() {
        // The task exactly fills the window before its deadline
        let items = WorkItems {
            tasks: vec![task("T1", 60, 9, Some("09:00:00"))],
            ..Default::default()
        };
        let request = request(items, constraints("08:00:00", "17:00:00", "12:00:00", 30));

        let response = optimize(&request);

        entry(&response, "T1");
        assert!(response
            .warnings
            .iter()
            .any(|warning| warning == "Activity T1 finishes close to its deadline."));
    }

    // -----------------------------------------------------------------------
    // Constraint and envelope failures
    // -----------------------------------------------------------------------
    #[test]
    fn malformed_shift_time_returns_failure_envelope() {
        let items = WorkItems {
            tasks: vec![task("T1", 30, 5, None)],
            ..Default::default()
        };
        let request = request(items, constraints("25:00:00", "17:00:00", "12:00:00", 30));

        let response = optimize(&request);

        assert!(response.optimized_schedule.is_empty());
        assert_eq!(response.optimization_score, 0.0);
        assert_eq!(response.warnings.len(), 1);
        assert_eq!(response.unachievable_items.len(), 1);
        assert_eq!(response.unachievable_items[0].item_id, "T1");
        assert_eq!(
            response.unachievable_items[0].reason,
            UnachievableReason::MalformedInput
        );
    }

    #[test]
    fn inverted_shift_window_returns_failure_envelope() {
        let request = request(
            WorkItems::default(),
            constraints("17:00:00", "08:00:00", "12:00:00", 30),
        );

        let response = optimize(&request);
        assert!(response.optimized_schedule.is_empty());
        assert_eq!(response.warnings.len(), 1);
    }

    #[test]
    fn malformed_schedule_date_is_an_error() {
        let mut bad_request = request(
            WorkItems::default(),
            constraints("08:00:00", "17:00:00", "12:00:00", 30),
        );
        bad_request.schedule_date = "first of October".to_string();

        let result = optimize_schedule(
            &bad_request,
            &KnowledgeBase::default(),
            &SolverConfig::fast(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn zero_length_blocks_are_dropped() {
        let mut nurse_constraints = constraints("08:00:00", "17:00:00", "12:00:00", 30);
        nurse_constraints.blocked_out_times = vec![BlockedTime {
            start: "10:00:00".to_string(),
            end: "10:00:00".to_string(),
            reason: "Nothing".to_string(),
        }];
        let request = request(WorkItems::default(), nurse_constraints);

        let response = optimize(&request);
        assert!(response
            .optimized_schedule
            .iter()
            .all(|item| item.activity_type != "Blocked"));
    }
}
