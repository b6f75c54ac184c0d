//! Condition compilation
//!
//! A split condition arrives as text in the split document and is turned into
//! an opaque predicate by a [`ConditionCompiler`]. The split engine only ever
//! calls [`Condition::check`]; it never sees how the predicate was produced.
//!
//! - [`ConditionTable`]: predicates registered by the host under their exact source text
//! - [`RhaiConditions`]: condition text compiled as Rhai expressions over host variables

mod table;
#[cfg(feature = "rhai-scripting")]
pub mod rhai_conditions;

pub use table::ConditionTable;
#[cfg(feature = "rhai-scripting")]
pub use rhai_conditions::{GameVariables, RhaiConditions};

use crate::Result;
use std::sync::Arc;

/// A zero-argument boolean predicate over live game state
pub trait Condition: Send + Sync {
    /// Returns whether the condition currently holds.
    /// Errors are treated as "not satisfied" by the split engine.
    fn check(&self) -> Result<bool>;
}

impl<F> Condition for F
where
    F: Fn() -> Result<bool> + Send + Sync,
{
    fn check(&self) -> Result<bool> {
        self()
    }
}

/// Shared handle to a compiled predicate
pub type SharedCondition = Arc<dyn Condition>;

/// Turns condition source text into a predicate
pub trait ConditionCompiler: Send + Sync {
    /// Compile `source`. Failure rejects the whole split document.
    fn compile(&self, source: &str) -> Result<SharedCondition>;
}

impl<C: ConditionCompiler + ?Sized> ConditionCompiler for Arc<C> {
    fn compile(&self, source: &str) -> Result<SharedCondition> {
        (**self).compile(source)
    }
}

/// Boxed compiler type
pub type BoxedCompiler = Box<dyn ConditionCompiler>;
