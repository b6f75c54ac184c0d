//! Read-only view of the timer for the draw phase

use crate::clock::{format_delta, format_ticks, ticks_to_duration, Tick};
use crate::config::SplitterConfig;
use crate::core::RunState;
use crate::splits::{Icon, SplitSchema, NOT_LOADED};

/// Timer text before the first wipe or after a manual stop
pub const NOT_STARTED: &str = "Wipe save to start";

/// Prefix on the timer text of a failed run
pub const FAILED_PREFIX: &str = "✗ ";

/// How the timer should be styled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    NotStarted,
    Running,
    Stopped,
    Failed,
}

impl From<RunState> for TimerStatus {
    fn from(state: RunState) -> Self {
        match state {
            RunState::NotStarted | RunState::StoppedManual => TimerStatus::NotStarted,
            RunState::Running => TimerStatus::Running,
            RunState::StoppedComplete => TimerStatus::Stopped,
            RunState::Failed => TimerStatus::Failed,
        }
    }
}

/// One rendered split line
#[derive(Debug, Clone, PartialEq)]
pub struct SplitRow {
    pub name: String,
    pub icon: Icon,
    /// Completion time this run, or `-`
    pub time: String,
    /// Signed difference against the previous best, once completed
    pub delta: Option<String>,
    /// Personal best, or `-`
    pub best: String,
    pub completed: bool,
}

/// Everything the presentation layer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct TimerView {
    pub timer: String,
    pub status: TimerStatus,
    pub title: String,
    /// Shown instead of rows when no splits are loaded
    pub message: Option<String>,
    pub rows: Vec<SplitRow>,
}

/// Build the view for the current frame
pub fn render(
    state: RunState,
    display_tick: Tick,
    schema: &SplitSchema,
    config: &SplitterConfig,
) -> TimerView {
    let status = TimerStatus::from(state);
    let elapsed = ticks_to_duration(display_tick as i64, config.fps);
    let timer = match status {
        TimerStatus::NotStarted => NOT_STARTED.to_string(),
        TimerStatus::Running | TimerStatus::Stopped => elapsed,
        TimerStatus::Failed => format!("{}{}", FAILED_PREFIX, elapsed),
    };

    let [icon_x, icon_y] = config.default_icon;
    let rows = schema
        .splits
        .iter()
        .enumerate()
        .map(|(index, split)| SplitRow {
            name: split
                .name
                .clone()
                .unwrap_or_else(|| format!("{} {}", config.segment_prefix, index + 1)),
            icon: split.icon.clone().unwrap_or_else(|| Icon::new(icon_x, icon_y)),
            time: format_ticks(split.completed, config.fps),
            delta: split.delta().map(|d| format_delta(d, config.fps)),
            best: format_ticks(split.best, config.fps),
            completed: split.is_completed(),
        })
        .collect();

    TimerView {
        timer,
        status,
        title: schema.name.clone(),
        message: (!schema.is_loaded()).then(|| NOT_LOADED.to_string()),
        rows,
    }
}
