//! PlanMyDay core - intelligent daily schedule optimization for nurses.
//!
//! Takes a heterogeneous daily workload (appointments, meetings, tasks,
//! alerts, follow-ups, care plans, interventions) plus per-shift constraints
//! (shift window, preferred lunch, blocked-out periods, optional travel
//! times between locations) and produces a non-overlapping timetable, the
//! items that could not be placed, an optimization score and human-readable
//! warnings.
//!
//! The pipeline: raw work items are normalized into uniform activities, a
//! constraint model is built over minute-of-day variables (no-overlap,
//! fixed starts, hard deadlines, travel separation), solved within a
//! wall-clock budget, and the incumbent is projected back into the response
//! envelope. [`optimize_schedule`] is the single entry point; each call is
//! a pure function of its inputs and the knowledge base.

pub mod defaults;
pub mod knowledge_base;
pub mod services;
pub mod types;

pub use knowledge_base::{KnowledgeBase, ObjectiveWeights};
pub use services::cp::SolverConfig;
pub use services::optimizer::optimize_schedule;
pub use types::{ScheduleRequest, ScheduleResponse};
