//! CCSplit
//!
//! A tick-driven speedrun split timer for games with a fixed-rate logic loop.
//! Splits are declared in a JSON document as conditions over live game state
//! and grouped by type:
//!
//! - **sequential**: complete in order, each waiting for the previous sequential split
//! - **consequential**: completing one also completes every earlier consequential split
//! - **individual**: complete independently, in any order
//! - **manual**: completed by the split key, in order
//! - **fail**: end the run as a failure
//!
//! The host drives a [`Splitter`] from its reset, logic and draw hooks:
//!
//! ```ignore
//! use ccsplit::{RhaiConditions, Splitter, SplitterConfig};
//!
//! let conditions = RhaiConditions::new();
//! let vars = conditions.variables();
//! let mut splitter = Splitter::from_config(SplitterConfig::default(), Box::new(conditions));
//! splitter.import_json(&std::fs::read_to_string("any%.json")?)?;
//!
//! // reset hook
//! splitter.on_reset(true);
//!
//! // logic hook
//! vars.set("cookies", 1_000_000.0_f64);
//! splitter.on_logic_tick();
//!
//! // draw hook
//! let view = splitter.on_draw();
//! println!("{}", view.timer);
//! ```

pub mod clock;
pub mod conditions;
pub mod config;
pub mod core;
pub mod display;
pub mod persistence;
pub mod splits;

mod error;

// Re-export commonly used types
pub use clock::{ticks_to_duration, Clock, Tick};
pub use conditions::{Condition, ConditionCompiler, ConditionTable};
#[cfg(feature = "rhai-scripting")]
pub use conditions::{GameVariables, RhaiConditions};
pub use config::SplitterConfig;
pub use crate::core::{InputHandle, RunState, RunStatus, SplitEvent, Splitter};
pub use display::{SplitRow, TimerStatus, TimerView};
pub use error::{Result, SplitterError};
pub use persistence::{JsonFileStore, MemoryStore, SplitStore};
pub use splits::{Icon, SchemaDocument, SplitDef, SplitSchema, SplitType, TickReport};
