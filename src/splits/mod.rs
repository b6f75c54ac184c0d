//! Split definitions and the per-tick evaluation engine
//!
//! - `types`: split kinds and the per-split record
//! - `registry`: the active, ordered schema
//! - `document`: JSON import/validation/export
//! - `evaluator`: failure-isolated predicate calls
//! - `engine`: the per-tick completion rules

mod types;
mod registry;
mod document;
mod evaluator;
mod engine;

pub use types::{Icon, SplitDef, SplitType};
pub use registry::{SplitSchema, NOT_LOADED};
pub use document::{SchemaDocument, SplitEntry, UNTITLED};
pub use evaluator::PredicateEvaluator;
pub use engine::{SplitEngine, TickReport};
