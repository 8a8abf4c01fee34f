//! Read-only view over a DSC result store.
//!
//! The store is a JSON object whose keys name pipelines and modules:
//! - `pipeline_*` keys hold the pipelines of a group, either as an array of
//!   names or as an object keyed by name. Module names inside a pipeline are
//!   joined with `+`.
//! - keys starting with `.` are internal. `.html` holds a pre-rendered page.
//! - every other key is a module.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{NotebookError, Result};

pub const PIPELINE_PREFIX: &str = "pipeline_";
pub const HIDDEN_PREFIX: &str = ".";
pub const HTML_KEY: &str = ".html";

/// A pipeline group and its member pipelines, in store order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineGroup {
    pub key: String,
    pub members: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Store {
    entries: Map<String, Value>,
}

impl Store {
    /// Load a store from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(NotebookError::InvalidStore(format!(
                "expected a JSON object at the top level, found {}",
                value_kind(&other)
            ))),
        }
    }

    /// Pipeline groups in store order.
    pub fn pipelines(&self) -> Result<Vec<PipelineGroup>> {
        self.entries
            .iter()
            .filter(|(key, _)| is_pipeline_key(key))
            .map(|(key, value)| {
                Ok(PipelineGroup {
                    key: key.clone(),
                    members: pipeline_members(key, value)?,
                })
            })
            .collect()
    }

    /// Module keys in store order.
    pub fn modules(&self) -> Vec<&str> {
        self.entries
            .keys()
            .filter(|key| is_module_key(key))
            .map(String::as_str)
            .collect()
    }

    /// The pre-rendered HTML page, when the store carries one.
    pub fn html(&self) -> Option<&str> {
        self.entries.get(HTML_KEY).and_then(Value::as_str)
    }
}

pub fn is_pipeline_key(key: &str) -> bool {
    key.starts_with(PIPELINE_PREFIX)
}

pub fn is_module_key(key: &str) -> bool {
    !is_pipeline_key(key) && !key.starts_with(HIDDEN_PREFIX)
}

/// Render a `+`-joined pipeline name as `a -> b`.
pub fn display_pipeline(name: &str) -> String {
    name.split('+').collect::<Vec<_>>().join(" -> ")
}

fn pipeline_members(key: &str, value: &Value) -> Result<Vec<String>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    NotebookError::InvalidStore(format!(
                        "pipeline group '{}' contains a {} where a name was expected",
                        key,
                        value_kind(item)
                    ))
                })
            })
            .collect(),
        Value::Object(map) => Ok(map.keys().cloned().collect()),
        other => Err(NotebookError::InvalidStore(format!(
            "pipeline group '{}' must be an array or object, found {}",
            key,
            value_kind(other)
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
