//! Configuration handling for blueprint projects.
//! Parses the YAML configuration document and resolves dotted keys against it,
//! falling back to a separate layer of defaults.

use crate::error::{Error, Result};
use log::debug;
use serde_json::{Map, Value};

/// Hierarchical configuration document with a layer of defaults.
///
/// Explicit values always win over defaults; an explicit `null` counts as absent.
/// Key segments are matched exactly first and then case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct Config {
    values: Map<String, Value>,
    defaults: Map<String, Value>,
}

impl Config {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a default value for a dotted key.
    pub fn set_default<V: Into<Value>>(&mut self, key: &str, value: V) {
        let mut segments: Vec<&str> = key.split('.').collect();
        let Some(last) = segments.pop() else {
            return;
        };

        let mut map = &mut self.defaults;
        for segment in segments {
            let entry = map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            map = match entry {
                Value::Object(inner) => inner,
                _ => unreachable!(),
            };
        }
        map.insert(last.to_string(), value.into());
    }

    /// Replaces the explicit values with the ones parsed from `content`.
    ///
    /// # Errors
    /// * `Error::ConfigParseError` if the document is malformed or its root is not a mapping
    pub fn read_str(&mut self, content: &str) -> Result<()> {
        self.values = parse_config(content)?;
        debug!("Loaded {} top-level configuration keys", self.values.len());
        Ok(())
    }

    /// Resolves a dotted key, consulting the defaults when no explicit value is set.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        find(&self.values, key)
            .filter(|value| !value.is_null())
            .or_else(|| find(&self.defaults, key))
            .filter(|value| !value.is_null())
    }

    /// Returns the scalar at `key` converted to a string.
    ///
    /// `None` when the key is absent or holds a list or mapping.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.lookup(key).and_then(scalar_to_string)
    }

    /// Returns the list at `key` with every element converted to a string.
    ///
    /// `None` when the key is absent or not a list. Elements that are not
    /// scalars become empty strings.
    pub fn get_strings(&self, key: &str) -> Option<Vec<String>> {
        match self.lookup(key)? {
            Value::Array(items) => {
                Some(items.iter().map(|item| scalar_to_string(item).unwrap_or_default()).collect())
            }
            _ => None,
        }
    }

    /// Returns the defaults overlaid with the explicit values as one mapping.
    pub fn merged(&self) -> Value {
        let mut merged = self.defaults.clone();
        overlay(&mut merged, &self.values);
        Value::Object(merged)
    }
}

/// Parses a YAML configuration document into a JSON mapping.
///
/// An empty document yields an empty mapping.
///
/// # Errors
/// * `Error::ConfigParseError` if the YAML is malformed or its root is not a mapping
pub fn parse_config(content: &str) -> Result<Map<String, Value>> {
    if content.trim().is_empty() {
        return Ok(Map::new());
    }

    let document: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|e| Error::ConfigParseError(format!("Invalid configuration format: {e}")))?;

    let document = serde_json::to_value(document)
        .map_err(|e| Error::ConfigParseError(format!("Unsupported configuration value: {e}")))?;

    match document {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map),
        other => Err(Error::ConfigParseError(format!(
            "Expected a mapping at the document root, found {}",
            kind(&other)
        ))),
    }
}

fn find<'a>(root: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    let mut segments = key.split('.');
    let mut current = entry(root, segments.next()?)?;
    for segment in segments {
        current = entry(current.as_object()?, segment)?;
    }
    Some(current)
}

fn entry<'a>(map: &'a Map<String, Value>, segment: &str) -> Option<&'a Value> {
    map.get(segment).or_else(|| {
        map.iter().find(|(name, _)| name.eq_ignore_ascii_case(segment)).map(|(_, value)| value)
    })
}

fn overlay(base: &mut Map<String, Value>, top: &Map<String, Value>) {
    for (key, value) in top {
        match (base.get_mut(key), value) {
            (_, Value::Null) => {}
            (Some(Value::Object(inner)), Value::Object(top_inner)) => overlay(inner, top_inner),
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
