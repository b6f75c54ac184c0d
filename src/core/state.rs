//! Run lifecycle state

use serde::{Deserialize, Serialize};

use crate::clock::Tick;

/// Where the current run is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// No run yet, or the user stopped it; waiting for a wipe
    #[default]
    NotStarted,
    /// Timer running, splits evaluated every tick
    Running,
    /// Every non-fail split completed
    StoppedComplete,
    /// Stopped by the user
    StoppedManual,
    /// A fail split triggered
    Failed,
}

impl RunState {
    /// Whether splits are evaluated on the next tick
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Whether a run has been started and not cleared by a manual stop
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Running | Self::StoppedComplete | Self::Failed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Snapshot of the splitter for hosts that poll instead of subscribing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatus {
    pub state: RunState,
    /// Logical clock, including ticks outside a run
    pub clock: Tick,
    /// Tick shown on the timer; frozen once the run stops
    pub display_tick: Tick,
    pub schema_name: String,
    /// Indices of completed non-fail splits
    pub completed: Vec<usize>,
    pub total: usize,
}

impl RunStatus {
    /// Whether a split has completed this run
    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.contains(&index)
    }
}
