//! Split definitions

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clock::Tick;
use crate::conditions::SharedCondition;

/// How a split decides it is complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    /// Needs the previous sequential split to be complete first
    Sequential,
    /// Completing it also completes every earlier unfinished consequential split
    Consequential,
    /// Completes on its own condition, in any order
    Individual,
    /// Completed by the split key, in order among manual splits
    Manual,
    /// Ends the run as a failure when its condition holds
    Fail,
}

impl SplitType {
    /// Parse the document tag (`"sequential"`, `"consequential"`, ...)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "sequential" => Some(Self::Sequential),
            "consequential" => Some(Self::Consequential),
            "individual" => Some(Self::Individual),
            "manual" => Some(Self::Manual),
            "fail" => Some(Self::Fail),
            _ => None,
        }
    }

    /// Document tag for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Consequential => "consequential",
            Self::Individual => "individual",
            Self::Manual => "manual",
            Self::Fail => "fail",
        }
    }

    /// Whether this type is driven by a condition predicate
    pub fn needs_condition(&self) -> bool {
        !matches!(self, Self::Manual)
    }

    /// Type assumed when a split omits `type`
    pub fn inferred(has_condition: bool) -> Self {
        if has_condition {
            Self::Consequential
        } else {
            Self::Manual
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sprite used next to a split row
#[derive(Debug, Clone, PartialEq)]
pub struct Icon {
    pub x: f64,
    pub y: f64,
    /// Optional sprite sheet; the host default sheet when absent
    pub sheet: Option<String>,
}

impl Icon {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, sheet: None }
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }
}

/// One split of the active schema: its definition plus run-time state
#[derive(Clone)]
pub struct SplitDef {
    /// Display label; rows fall back to a positional name
    pub name: Option<String>,
    /// Resolved type; never left implicit after import
    pub split_type: SplitType,
    /// Condition source text, kept for export
    pub condition: Option<String>,
    /// Compiled predicate for `condition`
    pub(crate) predicate: Option<SharedCondition>,
    pub icon: Option<Icon>,
    /// Tick at which this split completed in the current run
    pub completed: Option<Tick>,
    /// Lowest completion tick across runs
    pub best: Option<Tick>,
    /// `best` as it was before the latest completion
    pub prev_best: Option<Tick>,
}

impl SplitDef {
    /// Create a split with no condition
    pub fn new(split_type: SplitType) -> Self {
        Self {
            name: None,
            split_type,
            condition: None,
            predicate: None,
            icon: None,
            completed: None,
            best: None,
            prev_best: None,
        }
    }

    /// Create a manual split
    pub fn manual() -> Self {
        Self::new(SplitType::Manual)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach condition text and its compiled predicate
    pub fn with_condition(mut self, source: impl Into<String>, predicate: SharedCondition) -> Self {
        self.condition = Some(source.into());
        self.predicate = Some(predicate);
        self
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_best(mut self, best: Tick) -> Self {
        self.best = Some(best);
        self
    }

    /// The compiled predicate, if any
    pub fn predicate(&self) -> Option<&SharedCondition> {
        self.predicate.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.completed.is_some()
    }

    /// Mark complete at `tick`, folding the tick into the personal best
    pub(crate) fn complete(&mut self, tick: Tick) {
        self.completed = Some(tick);
        self.prev_best = self.best;
        self.best = Some(self.best.map_or(tick, |best| best.min(tick)));
    }

    /// Undo the latest completion, restoring the previous best
    pub(crate) fn uncomplete(&mut self) {
        self.completed = None;
        self.best = self.prev_best;
    }

    /// Signed difference between this run's time and the previous best
    pub fn delta(&self) -> Option<i64> {
        match (self.completed, self.prev_best) {
            (Some(completed), Some(prev)) => {
                i64::try_from(completed).ok()?.checked_sub(i64::try_from(prev).ok()?)
            }
            _ => None,
        }
    }
}

impl fmt::Debug for SplitDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitDef")
            .field("name", &self.name)
            .field("split_type", &self.split_type)
            .field("condition", &self.condition)
            .field("icon", &self.icon)
            .field("completed", &self.completed)
            .field("best", &self.best)
            .field("prev_best", &self.prev_best)
            .finish()
    }
}
