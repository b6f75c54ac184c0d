//! Rhai-backed condition compiler
//!
//! Each condition string is compiled as a Rhai *expression* (no statements,
//! no assignment) and evaluated against a scope of game variables the host
//! refreshes every tick:
//!
//! ```ignore
//! let conditions = RhaiConditions::new();
//! let vars = conditions.variables();
//! let mut splitter = Splitter::new(config, Box::new(conditions), store);
//!
//! // host logic hook
//! vars.set("cookies", game.cookies as f64);
//! vars.set("buildings", game.buildings as i64);
//! splitter.on_logic_tick();
//! ```
//!
//! Referencing a variable the host has not set, or producing a non-boolean
//! value, is an evaluation error and the split simply does not complete.

use parking_lot::Mutex;
use rhai::{Dynamic, Engine as RhaiVM, Scope, AST};
use std::sync::Arc;

use super::{Condition, ConditionCompiler, SharedCondition};
use crate::{Result, SplitterError};

/// Game state visible to conditions, shared between the host and every compiled predicate
#[derive(Clone, Default)]
pub struct GameVariables {
    scope: Arc<Mutex<Scope<'static>>>,
}

impl GameVariables {
    /// Create an empty variable set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace a variable
    pub fn set(&self, name: &str, value: impl Into<Dynamic>) {
        self.scope.lock().set_value(name.to_string(), value.into());
    }

    /// Current value of a variable
    pub fn get(&self, name: &str) -> Option<Dynamic> {
        self.scope.lock().get(name).cloned()
    }

    /// Whether a variable is defined
    pub fn contains(&self, name: &str) -> bool {
        self.scope.lock().contains(name)
    }

    /// Drop every variable
    pub fn clear(&self) {
        self.scope.lock().clear();
    }
}

impl std::fmt::Debug for GameVariables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scope = self.scope.lock();
        let names: Vec<&str> = scope.iter().map(|(name, _, _)| name).collect();
        f.debug_struct("GameVariables").field("names", &names).finish()
    }
}

/// A compiled Rhai expression
struct RhaiCondition {
    vm: Arc<RhaiVM>,
    ast: AST,
    variables: GameVariables,
    source: String,
}

impl Condition for RhaiCondition {
    fn check(&self) -> Result<bool> {
        let mut scope = self.variables.scope.lock();
        let value: Dynamic = self
            .vm
            .eval_ast_with_scope(&mut scope, &self.ast)
            .map_err(|e| SplitterError::ConditionRuntime(format!("{}: {}", self.source, e)))?;

        value.as_bool().map_err(|type_name| {
            SplitterError::ConditionRuntime(format!(
                "{}: expected a boolean, got {}",
                self.source, type_name
            ))
        })
    }
}

/// Compiles condition strings with an embedded Rhai engine
pub struct RhaiConditions {
    vm: Arc<RhaiVM>,
    variables: GameVariables,
}

impl RhaiConditions {
    /// Create a compiler with its own empty variable set
    pub fn new() -> Self {
        Self::with_variables(GameVariables::new())
    }

    /// Create a compiler reading from an existing variable set
    pub fn with_variables(variables: GameVariables) -> Self {
        let mut vm = RhaiVM::new();

        // Conditions run every tick; keep them cheap and bounded
        vm.set_max_expr_depths(64, 64);
        vm.set_max_call_levels(16);
        vm.set_max_operations(100_000);
        vm.set_max_string_size(10_000);
        vm.set_max_array_size(10_000);
        vm.set_max_map_size(1_000);

        Self {
            vm: Arc::new(vm),
            variables,
        }
    }

    /// Handle the host uses to publish game state
    pub fn variables(&self) -> GameVariables {
        self.variables.clone()
    }
}

impl Default for RhaiConditions {
    fn default() -> Self {
        Self::new()
    }
}

impl ConditionCompiler for RhaiConditions {
    fn compile(&self, source: &str) -> Result<SharedCondition> {
        let ast = self
            .vm
            .compile_expression(source)
            .map_err(|e| SplitterError::invalid(format!("'{}': {}", source, e)))?;

        log::debug!("Compiled condition: {}", source);

        Ok(Arc::new(RhaiCondition {
            vm: self.vm.clone(),
            ast,
            variables: self.variables.clone(),
            source: source.to_string(),
        }))
    }
}
