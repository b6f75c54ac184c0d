//! Host-registered predicates keyed by source text

use std::collections::HashMap;
use std::sync::Arc;

use super::{ConditionCompiler, SharedCondition};
use crate::{Result, SplitterError};

/// Compiler backed by a table of host predicates.
///
/// The host registers a closure for each condition string it supports; a
/// document using any other string fails to import.
#[derive(Default, Clone)]
pub struct ConditionTable {
    conditions: HashMap<String, SharedCondition>,
}

impl ConditionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate under `source`
    pub fn register<F>(&mut self, source: impl Into<String>, condition: F)
    where
        F: Fn() -> Result<bool> + Send + Sync + 'static,
    {
        self.conditions.insert(source.into(), Arc::new(condition));
    }

    /// Builder form of [`register`](Self::register)
    pub fn with<F>(mut self, source: impl Into<String>, condition: F) -> Self
    where
        F: Fn() -> Result<bool> + Send + Sync + 'static,
    {
        self.register(source, condition);
        self
    }

    /// Whether `source` has a predicate
    pub fn contains(&self, source: &str) -> bool {
        self.conditions.contains_key(source)
    }

    /// Number of registered predicates
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl ConditionCompiler for ConditionTable {
    fn compile(&self, source: &str) -> Result<SharedCondition> {
        self.conditions
            .get(source)
            .cloned()
            .ok_or_else(|| SplitterError::invalid(format!("unknown condition '{}'", source)))
    }
}

impl std::fmt::Debug for ConditionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.conditions.keys().collect();
        keys.sort();
        f.debug_struct("ConditionTable").field("conditions", &keys).finish()
    }
}
