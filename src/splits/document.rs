//! Split document import, validation and export
//!
//! The document is the JSON form users share and the only thing persisted:
//!
//! ```json
//! {
//!   "name": "Any% NG",
//!   "splits": [
//!     { "name": "First cookie", "condition": "cookies >= 1.0" },
//!     { "name": "1M", "type": "sequential", "condition": "cookies >= 1e6", "icon": [2, 5] },
//!     { "name": "Done" },
//!     { "type": "fail", "condition": "grandmapocalypse" }
//!   ]
//! }
//! ```
//!
//! A split without `type` is consequential when it has a condition and manual
//! otherwise. Validation is all-or-nothing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::registry::SplitSchema;
use super::types::{Icon, SplitDef, SplitType};
use crate::clock::Tick;
use crate::conditions::ConditionCompiler;
use crate::{Result, SplitterError};

/// Schema name used when a non-empty document has none
pub const UNTITLED: &str = "Untitled";

/// Serialized split schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub splits: Vec<SplitEntry>,
}

/// Serialized split; loosely typed so validation can report what is wrong
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub split_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best: Option<Value>,
}

impl SchemaDocument {
    /// Parse a JSON document. Structural problems are schema errors.
    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|e| SplitterError::invalid(e.to_string()))
    }

    /// Convert an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(SplitterError::invalid("document must be an object"));
        }
        if !value.get("splits").map_or(false, Value::is_array) {
            return Err(SplitterError::invalid("splits must be an array"));
        }
        serde_json::from_value(value).map_err(|e| SplitterError::invalid(e.to_string()))
    }

    /// Pretty JSON text
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate and compile into a runnable schema.
    ///
    /// Any invalid split rejects the whole document.
    pub fn validate(&self, compiler: &dyn ConditionCompiler) -> Result<SplitSchema> {
        let splits = self
            .splits
            .iter()
            .enumerate()
            .map(|(index, entry)| entry.validate(index, compiler))
            .collect::<Result<Vec<_>>>()?;

        let name = self.name.clone().unwrap_or_else(|| UNTITLED.to_string());
        Ok(SplitSchema::new(name, splits))
    }
}

impl SplitEntry {
    fn validate(&self, index: usize, compiler: &dyn ConditionCompiler) -> Result<SplitDef> {
        let condition = self.condition.as_ref().and_then(Value::as_str);

        let split_type = match self.split_type.as_deref() {
            None => SplitType::inferred(condition.is_some()),
            Some(tag) => SplitType::from_tag(tag).ok_or_else(|| {
                SplitterError::invalid(format!("split {}: unknown type '{}'", index, tag))
            })?,
        };

        let mut split = SplitDef::new(split_type);
        split.name = self.name.clone();

        if split_type.needs_condition() {
            let source = condition.ok_or_else(|| {
                SplitterError::invalid(format!(
                    "split {}: {} split needs a string condition",
                    index, split_type
                ))
            })?;
            let predicate = compiler
                .compile(source)
                .map_err(|e| SplitterError::compile(index, e.to_string()))?;
            split = split.with_condition(source, predicate);
        }

        if let Some(icon) = &self.icon {
            split.icon = Some(parse_icon(icon).ok_or_else(|| {
                SplitterError::invalid(format!(
                    "split {}: icon must be [x, y] or [x, y, \"sheet\"]",
                    index
                ))
            })?);
        }

        if let Some(best) = &self.best {
            split.best = Some(parse_best(best).ok_or_else(|| {
                SplitterError::invalid(format!(
                    "split {}: best must be a non-negative tick count",
                    index
                ))
            })?);
        }

        Ok(split)
    }
}

fn parse_icon(value: &Value) -> Option<Icon> {
    let parts = value.as_array()?;
    if parts.len() != 2 && parts.len() != 3 {
        return None;
    }
    let mut icon = Icon::new(parts[0].as_f64()?, parts[1].as_f64()?);
    if let Some(sheet) = parts.get(2) {
        icon.sheet = Some(sheet.as_str()?.to_string());
    }
    Some(icon)
}

/// Largest storable best; tick arithmetic is signed
const MAX_BEST: Tick = i64::MAX as Tick;

fn parse_best(value: &Value) -> Option<Tick> {
    if let Some(ticks) = value.as_u64() {
        return (ticks <= MAX_BEST).then_some(ticks);
    }
    let ticks = value.as_f64()?;
    // i64::MAX as f64 rounds up to 2^63, hence the strict bound
    (ticks.is_finite() && ticks >= 0.0 && ticks < MAX_BEST as f64 && ticks.fract() == 0.0)
        .then(|| ticks as Tick)
}

impl SplitSchema {
    /// Export the persisted form: definitions and personal bests only
    pub fn to_document(&self) -> SchemaDocument {
        SchemaDocument {
            name: Some(self.name.clone()),
            splits: self.splits.iter().map(SplitEntry::from_split).collect(),
        }
    }
}

impl SplitEntry {
    fn from_split(split: &SplitDef) -> Self {
        let condition = if split.split_type.needs_condition() {
            split.condition.clone()
        } else {
            None
        };

        // Leave out the type whenever import would infer the same one
        let split_type = if split.split_type == SplitType::inferred(condition.is_some()) {
            None
        } else {
            Some(split.split_type.as_str().to_string())
        };

        let icon = split.icon.as_ref().map(|icon| {
            let mut parts = vec![Value::from(icon.x), Value::from(icon.y)];
            if let Some(sheet) = &icon.sheet {
                parts.push(Value::from(sheet.clone()));
            }
            Value::Array(parts)
        });

        Self {
            name: split.name.clone(),
            split_type,
            condition: condition.map(Value::String),
            icon,
            best: split.best.map(Value::from),
        }
    }
}
