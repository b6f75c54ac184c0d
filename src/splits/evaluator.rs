//! Predicate evaluation with failure isolation

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::conditions::Condition;

/// Runs split predicates, turning any failure into "not satisfied"
#[derive(Debug, Default, Clone, Copy)]
pub struct PredicateEvaluator;

impl PredicateEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate a predicate. Errors and panics count as `false`.
    pub fn evaluate(&self, condition: &dyn Condition) -> bool {
        match catch_unwind(AssertUnwindSafe(|| condition.check())) {
            Ok(Ok(satisfied)) => satisfied,
            Ok(Err(e)) => {
                log::trace!("Condition error treated as unsatisfied: {}", e);
                false
            }
            Err(_) => {
                log::trace!("Condition panicked; treated as unsatisfied");
                false
            }
        }
    }

    /// Evaluate an optional predicate; a missing predicate never holds
    pub fn evaluate_opt(&self, condition: Option<&dyn Condition>) -> bool {
        condition.map_or(false, |c| self.evaluate(c))
    }
}
