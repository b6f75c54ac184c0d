//! Per-tick split evaluation
//!
//! Every tick walks the schema once, in order. Sequential and manual splits
//! look at the nearest earlier split of their own type; consequential splits
//! remember every earlier consequential split so a later one can complete
//! them retroactively. Fail splits are checked every tick no matter what.

use super::evaluator::PredicateEvaluator;
use super::registry::SplitSchema;
use super::types::{SplitDef, SplitType};
use crate::clock::Tick;

/// What changed during one evaluation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Splits completed this tick, in the order they were stamped
    pub completed: Vec<usize>,
    /// Fail splits whose condition held this tick
    pub failed: Vec<usize>,
    /// Every non-fail split is complete after this tick
    pub run_complete: bool,
}

impl TickReport {
    /// Whether the run failed this tick
    pub fn is_failed(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Whether anything persisted changed
    pub fn changed(&self) -> bool {
        !self.completed.is_empty() || self.is_failed() || self.run_complete
    }
}

/// Evaluates a schema's splits against the current game state
pub struct SplitEngine<'a> {
    schema: &'a mut SplitSchema,
    evaluator: PredicateEvaluator,
}

impl<'a> SplitEngine<'a> {
    pub fn new(schema: &'a mut SplitSchema) -> Self {
        Self {
            schema,
            evaluator: PredicateEvaluator::new(),
        }
    }

    /// Evaluate all splits for `tick`.
    ///
    /// `manual_requested` completes at most one manual split.
    pub fn run_tick(&mut self, tick: Tick, mut manual_requested: bool) -> TickReport {
        let mut report = TickReport::default();

        let mut last_sequential: Option<usize> = None;
        let mut preceding_consequential: Vec<usize> = Vec::new();
        let mut last_manual: Option<usize> = None;

        let evaluator = self.evaluator;
        let splits = &mut self.schema.splits;
        for index in 0..splits.len() {
            match splits[index].split_type {
                SplitType::Sequential => {
                    let unlocked = last_sequential.map_or(true, |prev| splits[prev].is_completed());
                    if !splits[index].is_completed()
                        && unlocked
                        && holds(&evaluator, &splits[index])
                    {
                        Self::stamp(&mut splits[index], index, tick, &mut report);
                    }
                    last_sequential = Some(index);
                }

                SplitType::Consequential => {
                    if !splits[index].is_completed() && holds(&evaluator, &splits[index]) {
                        for &earlier in &preceding_consequential {
                            if !splits[earlier].is_completed() {
                                Self::stamp(&mut splits[earlier], earlier, tick, &mut report);
                            }
                        }
                        Self::stamp(&mut splits[index], index, tick, &mut report);
                    }
                    preceding_consequential.push(index);
                }

                SplitType::Individual => {
                    if !splits[index].is_completed() && holds(&evaluator, &splits[index]) {
                        Self::stamp(&mut splits[index], index, tick, &mut report);
                    }
                }

                SplitType::Manual => {
                    let unlocked = last_manual.map_or(true, |prev| splits[prev].is_completed());
                    if manual_requested && !splits[index].is_completed() && unlocked {
                        Self::stamp(&mut splits[index], index, tick, &mut report);
                        manual_requested = false;
                    }
                    last_manual = Some(index);
                }

                SplitType::Fail => {
                    if holds(&evaluator, &splits[index]) {
                        splits[index].completed = Some(tick);
                        log::debug!("Fail split {} triggered at tick {}", index, tick);
                        report.failed.push(index);
                    }
                }
            }
        }

        report.run_complete = self.schema.all_complete();
        report
    }

    fn stamp(split: &mut SplitDef, index: usize, tick: Tick, report: &mut TickReport) {
        split.complete(tick);
        log::debug!(
            "Split {} ({}) completed at tick {}",
            index,
            split.name.as_deref().unwrap_or("unnamed"),
            tick
        );
        report.completed.push(index);
    }
}

fn holds(evaluator: &PredicateEvaluator, split: &SplitDef) -> bool {
    evaluator.evaluate_opt(split.predicate().map(|p| p.as_ref()))
}
