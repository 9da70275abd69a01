//! Constraint-programming schedule solver.
//!
//! Drives the CP model with a wall-clock budget and classifies the result.
//! In relax-optional mode an infeasible workload is retried with the least
//! important flexible activity removed until a feasible subset remains.

mod config;
mod model;
mod problem;
mod solution;

pub use config::SolverConfig;
pub use problem::{
    Activity, ActivityKind, BlockedSlot, LunchConfig, PrecedencePair, ScheduleProblem,
};
pub use solution::{PlannedActivity, ScheduleSolution, SolveStatus};

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::knowledge_base::ObjectiveWeights;
use model::ModelOutcome;

/// Schedule solver with a fixed configuration.
pub struct CpScheduler {
    config: SolverConfig,
}

impl CpScheduler {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Solve the scheduling problem within the configured budget.
    ///
    /// Every activity is mandatory. With `relax_optional` set, activities
    /// that make the problem infeasible are dropped instead (lowest
    /// priority first, never fixed-time activities or alerts) and the
    /// dropped indices are reported on the solution.
    pub fn solve(
        &self,
        problem: &ScheduleProblem,
        weights: &ObjectiveWeights,
    ) -> ScheduleSolution {
        let started_at = Instant::now();
        let deadline = started_at + self.config.budget();

        info!(
            activities = problem.activities.len(),
            blocks = problem.blocks.len(),
            budget_secs = self.config.budget().as_secs(),
            relax = self.config.relax_optional,
            "solving schedule"
        );

        let mut kept: Vec<usize> = (0..problem.activities.len()).collect();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!("budget exhausted before a solution was found");
                let mut solution = ScheduleSolution::failed(SolveStatus::Timeout);
                solution.solve_time_ms = started_at.elapsed().as_millis() as u64;
                return solution;
            }

            let (subproblem, index_map) = restrict_to(problem, &kept);
            let outcome = model::build_and_solve(&subproblem, weights, remaining);

            match outcome {
                ModelOutcome::Solved { status, starts, lunch_start, objective } => {
                    let planned: Vec<PlannedActivity> = starts
                        .iter()
                        .enumerate()
                        .map(|(sub_index, &start)| PlannedActivity {
                            activity_index: index_map[sub_index],
                            start,
                            end: start + subproblem.activities[sub_index].duration,
                        })
                        .collect();

                    let dropped: Vec<usize> = (0..problem.activities.len())
                        .filter(|index| !kept.contains(index))
                        .collect();

                    let solve_time_ms = started_at.elapsed().as_millis() as u64;
                    info!(
                        placed = planned.len(),
                        dropped = dropped.len(),
                        objective,
                        solve_time_ms,
                        ?status,
                        "schedule solved"
                    );

                    return ScheduleSolution {
                        status,
                        planned,
                        lunch_start: Some(lunch_start),
                        dropped,
                        objective,
                        solve_time_ms,
                    };
                }
                ModelOutcome::Timeout => {
                    warn!("solver budget ran out with no incumbent");
                    let mut solution = ScheduleSolution::failed(SolveStatus::Timeout);
                    solution.solve_time_ms = started_at.elapsed().as_millis() as u64;
                    return solution;
                }
                ModelOutcome::Infeasible => {
                    if !self.config.relax_optional {
                        let mut solution = ScheduleSolution::failed(SolveStatus::Infeasible);
                        solution.solve_time_ms = started_at.elapsed().as_millis() as u64;
                        return solution;
                    }
                    match pick_droppable(problem, &kept) {
                        Some(index) => {
                            debug!(
                                id = %problem.activities[index].id,
                                priority = problem.activities[index].priority,
                                "dropping activity and retrying"
                            );
                            kept.retain(|&keep| keep != index);
                        }
                        None => {
                            warn!("infeasible and nothing left to drop");
                            let mut solution =
                                ScheduleSolution::failed(SolveStatus::Infeasible);
                            solution.solve_time_ms = started_at.elapsed().as_millis() as u64;
                            return solution;
                        }
                    }
                }
            }
        }
    }
}

impl Default for CpScheduler {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

/// Restrict the problem to the given original activity indices.
/// Returns the subproblem plus a map from subproblem index to original index.
fn restrict_to(problem: &ScheduleProblem, kept: &[usize]) -> (ScheduleProblem, Vec<usize>) {
    if kept.len() == problem.activities.len() {
        return (problem.clone(), kept.to_vec());
    }

    let activities = kept
        .iter()
        .map(|&index| problem.activities[index].clone())
        .collect();

    let position_of = |original: usize| kept.iter().position(|&keep| keep == original);
    let precedences = problem
        .precedences
        .iter()
        .filter_map(|pair| {
            Some(PrecedencePair {
                before: position_of(pair.before)?,
                after: position_of(pair.after)?,
            })
        })
        .collect();

    let subproblem = ScheduleProblem {
        shift_start: problem.shift_start,
        shift_end: problem.shift_end,
        lunch: problem.lunch,
        blocks: problem.blocks.clone(),
        activities,
        travel: problem.travel.clone(),
        precedences,
    };
    (subproblem, kept.to_vec())
}

/// The lowest-priority activity eligible for dropping, if any.
/// Fixed-time activities and alerts are never dropped; ties go to the
/// later-declared activity.
fn pick_droppable(problem: &ScheduleProblem, kept: &[usize]) -> Option<usize> {
    kept.iter()
        .copied()
        .filter(|&index| {
            let activity = &problem.activities[index];
            activity.fixed_start.is_none()
                && !matches!(activity.kind, ActivityKind::Alert | ActivityKind::VitalAlert)
        })
        .min_by_key(|&index| (problem.activities[index].priority, std::cmp::Reverse(index)))
}
