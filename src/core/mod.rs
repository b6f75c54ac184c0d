//! Run controller
//!
//! This module contains the pieces that drive a run from host hooks:
//! - `Splitter` - owns the clock, schema and run lifecycle
//! - `RunState` / `RunStatus` - lifecycle state and a pollable snapshot
//! - `InputHandle` - split/unsplit/stop requests from a key listener
//! - `SplitEvent` - notifications for listeners

mod state;
mod runner;
mod events;
mod input;

pub use state::{RunState, RunStatus};
pub use runner::Splitter;
pub use events::{EventHandler, SplitCallback, SplitEvent};
pub use input::{InputHandle, InputSignals};
