//! Constraint model construction and solving.
//!
//! Formulates the daily schedule as a constraint program:
//!
//! - **Variables**: a start minute per activity (singleton domain for
//!   fixed-time activities and blocked intervals), a start minute for lunch,
//!   one order variable per travel-constrained activity pair.
//! - **Constraints**: disjunctive no-overlap across activities, lunch and
//!   blocks (cumulative with unit demands, capacity one); deadlines folded
//!   into start-domain upper bounds; pairwise travel separation via big-M
//!   linear inequalities; caller precedences.
//! - **Objective**: minimize lunch deviation plus the summed start times of
//!   high-priority activities, the latter scaled down to a tie-break.

use std::time::Duration;

use pumpkin_solver::constraints as cp;
use pumpkin_solver::optimisation::linear_sat_unsat::LinearSatUnsat;
use pumpkin_solver::optimisation::OptimisationDirection;
use pumpkin_solver::results::{OptimisationResult, ProblemSolution};
use pumpkin_solver::termination::TimeBudget;
use pumpkin_solver::variables::TransformableVariable;
use pumpkin_solver::Solver;
use tracing::debug;

use crate::knowledge_base::ObjectiveWeights;
use super::problem::ScheduleProblem;
use super::solution::SolveStatus;

/// Minutes in a day; the upper end of every time domain.
const MINUTES_PER_DAY: i32 = 1440;

/// Big-M for the pairwise travel disjunctions. Large enough to make the
/// inactive branch of each disjunction trivially satisfied.
const ORDER_BIG_M: i32 = 4 * MINUTES_PER_DAY;

/// Result of one model build-and-solve round.
#[derive(Debug)]
pub(crate) enum ModelOutcome {
    Solved {
        status: SolveStatus,
        /// Start minutes, parallel to `problem.activities`.
        starts: Vec<i32>,
        lunch_start: i32,
        /// Minimized objective value, in tenth-point units.
        objective: i64,
    },
    Infeasible,
    Timeout,
}

/// Build the constraint model for `problem` and solve it within `budget`.
pub(crate) fn build_and_solve(
    problem: &ScheduleProblem,
    weights: &ObjectiveWeights,
    budget: Duration,
) -> ModelOutcome {
    // Start domains. An empty domain means the activity cannot fit at all;
    // with every activity mandatory that makes the whole problem infeasible.
    let mut domains = Vec::with_capacity(problem.activities.len());
    for activity in &problem.activities {
        let mut lower = problem.shift_start;
        let mut upper = problem.shift_end - activity.duration;
        if let Some(fixed) = activity.fixed_start {
            lower = fixed;
            upper = fixed;
        }
        if let Some(deadline) = activity.deadline {
            upper = upper.min(deadline - activity.duration);
        }
        if lower > upper {
            debug!(id = %activity.id, "activity start domain is empty");
            return ModelOutcome::Infeasible;
        }
        domains.push((lower, upper));
    }

    let lunch_lower = problem.shift_start;
    let lunch_upper = problem.shift_end - problem.lunch.duration;
    if lunch_lower > lunch_upper {
        debug!("lunch does not fit inside the shift");
        return ModelOutcome::Infeasible;
    }

    let mut solver = Solver::default();
    let tag = solver.new_constraint_tag();
    let mut post_ok = true;

    let start_vars: Vec<_> = domains
        .iter()
        .map(|&(lower, upper)| solver.new_bounded_integer(lower, upper))
        .collect();
    let lunch_var = solver.new_bounded_integer(lunch_lower, lunch_upper);
    let block_vars: Vec<_> = problem
        .blocks
        .iter()
        .map(|block| solver.new_bounded_integer(block.start, block.start))
        .collect();

    // Disjunctive no-overlap across activities, lunch and blocks.
    let mut all_starts: Vec<_> = start_vars.clone();
    all_starts.push(lunch_var);
    all_starts.extend(block_vars.iter().copied());

    let mut all_durations: Vec<i32> =
        problem.activities.iter().map(|a| a.duration).collect();
    all_durations.push(problem.lunch.duration);
    all_durations.extend(problem.blocks.iter().map(|b| b.duration()));

    if all_starts.len() > 1 {
        let demands = vec![1; all_starts.len()];
        post_ok &= solver
            .add_constraint(cp::cumulative(all_starts, all_durations, demands, 1, tag))
            .post()
            .is_ok();
    }

    // Pairwise travel separation. For each pair with distinct known
    // locations, an order variable picks a direction and the big-M terms
    // switch the matching inequality on.
    for i in 0..problem.activities.len() {
        for j in (i + 1)..problem.activities.len() {
            let a = &problem.activities[i];
            let b = &problem.activities[j];
            let travel_ab = problem.travel_minutes(a, b);
            let travel_ba = problem.travel_minutes(b, a);
            if travel_ab == 0 && travel_ba == 0 {
                continue;
            }

            let a_before_b = solver.new_bounded_integer(0, 1);
            // a before b: start_b - start_a >= dur_a + travel_ab
            post_ok &= solver
                .add_constraint(cp::greater_than_or_equals(
                    vec![
                        start_vars[j].scaled(1),
                        start_vars[i].scaled(-1),
                        a_before_b.scaled(-ORDER_BIG_M),
                    ],
                    a.duration + travel_ab - ORDER_BIG_M,
                    tag,
                ))
                .post()
                .is_ok();
            // b before a: start_a - start_b >= dur_b + travel_ba
            post_ok &= solver
                .add_constraint(cp::greater_than_or_equals(
                    vec![
                        start_vars[i].scaled(1),
                        start_vars[j].scaled(-1),
                        a_before_b.scaled(ORDER_BIG_M),
                    ],
                    b.duration + travel_ba,
                    tag,
                ))
                .post()
                .is_ok();
        }
    }

    // Caller precedences: successor starts after the predecessor finishes.
    for pair in &problem.precedences {
        let predecessor = &problem.activities[pair.before];
        post_ok &= solver
            .add_constraint(cp::greater_than_or_equals(
                vec![
                    start_vars[pair.after].scaled(1),
                    start_vars[pair.before].scaled(-1),
                ],
                predecessor.duration,
                tag,
            ))
            .post()
            .is_ok();
    }

    // Lunch deviation as an auxiliary non-negative variable:
    // dev >= lunch - preferred and dev >= preferred - lunch.
    let preferred = problem.lunch.preferred_start;
    let lunch_dev = solver.new_bounded_integer(0, MINUTES_PER_DAY);
    post_ok &= solver
        .add_constraint(cp::greater_than_or_equals(
            vec![lunch_dev.scaled(1), lunch_var.scaled(-1)],
            -preferred,
            tag,
        ))
        .post()
        .is_ok();
    post_ok &= solver
        .add_constraint(cp::greater_than_or_equals(
            vec![lunch_dev.scaled(1), lunch_var.scaled(1)],
            preferred,
            tag,
        ))
        .post()
        .is_ok();

    // Objective, in tenth-point units so the early-start divisor stays in
    // integer arithmetic: obj >= divisor * w_lunch * dev + sum(hp starts).
    let high_priority: Vec<usize> = problem
        .activities
        .iter()
        .enumerate()
        .filter(|(_, a)| a.priority >= weights.high_priority_threshold)
        .map(|(index, _)| index)
        .collect();

    let dev_coefficient =
        (weights.early_start_divisor * weights.lunch_deviation).clamp(1, i32::MAX as i64) as i32;
    let objective_upper = (dev_coefficient as i64 * MINUTES_PER_DAY as i64
        + high_priority.len() as i64 * MINUTES_PER_DAY as i64)
        .min(i32::MAX as i64) as i32;
    let objective_var = solver.new_bounded_integer(0, objective_upper);

    let mut objective_terms = vec![
        objective_var.scaled(1),
        lunch_dev.scaled(-dev_coefficient),
    ];
    for &index in &high_priority {
        objective_terms.push(start_vars[index].scaled(-1));
    }
    post_ok &= solver
        .add_constraint(cp::greater_than_or_equals(objective_terms, 0, tag))
        .post()
        .is_ok();

    if !post_ok {
        // A failed post means the constraint was already conflicting at the
        // root, e.g. two fixed activities forced into the same slot.
        debug!("constraint posting failed at the root, model is infeasible");
        return ModelOutcome::Infeasible;
    }

    let mut brancher = solver.default_brancher();
    let mut termination = TimeBudget::starting_now(budget);

    fn noop_callback<B>(_: &Solver, _: pumpkin_solver::results::SolutionReference, _: &B) {}
    let result = solver.optimise(
        &mut brancher,
        &mut termination,
        LinearSatUnsat::new(OptimisationDirection::Minimise, objective_var, noop_callback),
    );

    match result {
        OptimisationResult::Optimal(solution) => ModelOutcome::Solved {
            status: SolveStatus::Optimal,
            starts: start_vars
                .iter()
                .map(|&var| solution.get_integer_value(var))
                .collect(),
            lunch_start: solution.get_integer_value(lunch_var),
            objective: solution.get_integer_value(objective_var) as i64,
        },
        OptimisationResult::Satisfiable(solution) => ModelOutcome::Solved {
            status: SolveStatus::Feasible,
            starts: start_vars
                .iter()
                .map(|&var| solution.get_integer_value(var))
                .collect(),
            lunch_start: solution.get_integer_value(lunch_var),
            objective: solution.get_integer_value(objective_var) as i64,
        },
        OptimisationResult::Unsatisfiable => ModelOutcome::Infeasible,
        OptimisationResult::Unknown => ModelOutcome::Timeout,
    }
}
