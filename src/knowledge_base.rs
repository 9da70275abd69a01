//! Knowledge base accessor.
//!
//! Read-only lookup for scheduling defaults: fallback durations, textual
//! priority weights and objective weights. Lookups never fail; a missing
//! rule yields the compile-time default from [`crate::defaults`].

use std::collections::HashMap;

use crate::defaults;

/// Weights of the individual objective terms.
///
/// The solver minimizes `early_start_divisor * lunch_deviation * lunch_dev +
/// sum(high-priority starts)` and the reported score adds
/// `priority_sum * sum(priorities of scheduled activities)` back on top.
/// The early-start term is expressed as a divisor (the reciprocal of its
/// weight) so the whole objective stays in integer arithmetic.
#[derive(Debug, Clone)]
pub struct ObjectiveWeights {
    pub priority_sum: i64,
    pub lateness_penalty: i64,
    pub lunch_deviation: i64,
    pub early_start_divisor: i64,
    pub high_priority_threshold: i32,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            priority_sum: defaults::OBJECTIVE_PRIORITY_SUM_WEIGHT,
            lateness_penalty: defaults::OBJECTIVE_LATENESS_WEIGHT,
            lunch_deviation: defaults::OBJECTIVE_LUNCH_DEVIATION_WEIGHT,
            early_start_divisor: defaults::OBJECTIVE_EARLY_START_DIVISOR,
            high_priority_threshold: defaults::HIGH_PRIORITY_THRESHOLD,
        }
    }
}

/// Read-only parameter store consulted during normalization and model building.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    task_default_duration: i32,
    alert_default_address_time: i32,
    priority_weights: HashMap<String, i32>,
    objective: ObjectiveWeights,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        let mut priority_weights = HashMap::new();
        priority_weights.insert("High".to_string(), defaults::PRIORITY_WEIGHT_HIGH);
        priority_weights.insert("Medium".to_string(), defaults::PRIORITY_WEIGHT_MEDIUM);
        priority_weights.insert("Low".to_string(), defaults::PRIORITY_WEIGHT_LOW);

        Self {
            task_default_duration: defaults::DEFAULT_TASK_DURATION_MINUTES,
            alert_default_address_time: defaults::DEFAULT_ALERT_ADDRESS_MINUTES,
            priority_weights,
            objective: ObjectiveWeights::default(),
        }
    }
}

impl KnowledgeBase {
    /// Fallback duration for tasks without an explicit estimate.
    pub fn task_default_duration(&self) -> i32 {
        self.task_default_duration
    }

    /// Fallback duration for alerts without an explicit time to address.
    pub fn alert_default_address_time(&self) -> i32 {
        self.alert_default_address_time
    }

    /// Numeric weight for a textual priority label ("High", "Medium", "Low").
    /// Unknown labels fall back to the medium weight.
    pub fn priority_weight(&self, label: &str) -> i32 {
        self.priority_weights
            .get(label)
            .copied()
            .unwrap_or(defaults::PRIORITY_WEIGHT_MEDIUM)
    }

    pub fn objective_weights(&self) -> &ObjectiveWeights {
        &self.objective
    }

    /// Override the fallback task duration.
    pub fn with_task_default_duration(mut self, minutes: i32) -> Self {
        self.task_default_duration = minutes;
        self
    }

    /// Override the fallback alert address time.
    pub fn with_alert_default_address_time(mut self, minutes: i32) -> Self {
        self.alert_default_address_time = minutes;
        self
    }

    /// Override a textual priority weight.
    pub fn with_priority_weight(mut self, label: &str, weight: i32) -> Self {
        self.priority_weights.insert(label.to_string(), weight);
        self
    }

    /// Override the objective weights wholesale.
    pub fn with_objective_weights(mut self, objective: ObjectiveWeights) -> Self {
        self.objective = objective;
        self
    }
}
