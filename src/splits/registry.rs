//! The active split schema

use super::types::{SplitDef, SplitType};

/// Schema name used when nothing is loaded
pub const NOT_LOADED: &str = "No splits loaded";

/// Ordered list of splits for the current category
#[derive(Debug, Clone)]
pub struct SplitSchema {
    pub name: String,
    pub splits: Vec<SplitDef>,
}

impl Default for SplitSchema {
    fn default() -> Self {
        Self::empty()
    }
}

impl SplitSchema {
    /// Create a schema from already-validated splits
    pub fn new(name: impl Into<String>, splits: Vec<SplitDef>) -> Self {
        let mut schema = Self {
            name: name.into(),
            splits,
        };
        if schema.splits.is_empty() {
            schema.name = NOT_LOADED.to_string();
        }
        schema
    }

    /// The "nothing loaded" schema
    pub fn empty() -> Self {
        Self {
            name: NOT_LOADED.to_string(),
            splits: Vec::new(),
        }
    }

    /// Whether the schema has any splits
    pub fn is_loaded(&self) -> bool {
        !self.splits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.splits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    /// Splits of one type, in schema order, with their positions
    pub fn of_type(&self, split_type: SplitType) -> impl Iterator<Item = (usize, &SplitDef)> {
        self.splits
            .iter()
            .enumerate()
            .filter(move |(_, s)| s.split_type == split_type)
    }

    /// Whether at least one split can finish the run
    pub fn has_goal(&self) -> bool {
        self.splits.iter().any(|s| s.split_type != SplitType::Fail)
    }

    /// Whether every non-fail split is complete
    pub fn all_complete(&self) -> bool {
        self.has_goal()
            && self
                .splits
                .iter()
                .filter(|s| s.split_type != SplitType::Fail)
                .all(SplitDef::is_completed)
    }

    /// Position of the latest completed manual split, scanning from the end
    pub fn last_completed_manual(&self) -> Option<usize> {
        self.splits
            .iter()
            .rposition(|s| s.split_type == SplitType::Manual && s.is_completed())
    }

    /// Forget this run's completions
    pub fn clear_run(&mut self) {
        for split in &mut self.splits {
            split.completed = None;
        }
    }

    /// Forget personal bests
    pub fn clear_personal_best(&mut self) {
        for split in &mut self.splits {
            split.best = None;
            split.prev_best = None;
        }
    }
}
