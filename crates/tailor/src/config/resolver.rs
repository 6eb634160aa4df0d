//! Read access to the merged configuration.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::trace;

use super::layer::{ComputedValue, ConfigLayer};
use super::merge::{merge_layers, MergedConfig};
use super::path::{display_path, parse_path};
use crate::error::ConfigurationError;

/// The fully merged configuration of a compilation pass.
///
/// A resolver is built once from the stacked layers and never changes
/// afterwards. Lookups are pure; computed leaves are evaluated on first use
/// and cached.
///
/// Missing keys, walking through a scalar and `null` values all read as
/// absent, so the `_or` variants return their default for any of them.
///
/// ```rust
/// use tailor::config::{ConfigLayer, Resolver};
/// use serde_json::json;
///
/// let layer = ConfigLayer::new().set("theme.spacing", json!({"2.5": "0.625rem"}))?;
/// let theme = Resolver::new([&layer]);
///
/// assert_eq!(theme.theme("spacing[2.5]")?, Some(json!("0.625rem")));
/// assert_eq!(theme.theme_or("spacing.99", "0")?, json!("0"));
/// # Ok::<(), tailor::ConfigurationError>(())
/// ```
pub struct Resolver {
    root: Value,
    computed: IndexMap<Vec<String>, ComputedValue>,
    cache: RefCell<HashMap<Vec<String>, Value>>,
    resolving: RefCell<Vec<Vec<String>>>,
}

impl Resolver {
    /// Merges `layers` (lowest first) into a resolver.
    pub fn new<'a, I>(layers: I) -> Self
    where
        I: IntoIterator<Item = &'a ConfigLayer>,
    {
        Self::from_merged(merge_layers(layers))
    }

    pub(crate) fn from_merged(merged: MergedConfig) -> Self {
        Self {
            root: merged.root,
            computed: merged.computed,
            cache: RefCell::new(HashMap::new()),
            resolving: RefCell::new(Vec::new()),
        }
    }

    /// Looks up a configuration value by path.
    pub fn config(&self, path: &str) -> Result<Option<Value>, ConfigurationError> {
        self.lookup(&parse_path(path)?)
    }

    /// Looks up a configuration value, falling back to `default`.
    pub fn config_or(
        &self,
        path: &str,
        default: impl Into<Value>,
    ) -> Result<Value, ConfigurationError> {
        Ok(self.config(path)?.unwrap_or_else(|| default.into()))
    }

    /// Looks up a value under the `theme` section.
    pub fn theme(&self, path: &str) -> Result<Option<Value>, ConfigurationError> {
        self.lookup(&section_path("theme", path)?)
    }

    /// Looks up a theme value, falling back to `default`.
    pub fn theme_or(
        &self,
        path: &str,
        default: impl Into<Value>,
    ) -> Result<Value, ConfigurationError> {
        Ok(self.theme(path)?.unwrap_or_else(|| default.into()))
    }

    /// Returns the variant list configured under `variants.<path>`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidValue`] if the configured value is
    /// not a list of strings.
    pub fn variants(
        &self,
        path: &str,
        default: &[&str],
    ) -> Result<Vec<String>, ConfigurationError> {
        let segments = section_path("variants", path)?;
        let Some(value) = self.lookup(&segments)? else {
            return Ok(default.iter().map(|name| name.to_string()).collect());
        };

        let invalid = || ConfigurationError::InvalidValue {
            path: display_path(&segments),
            expected: "a list of variant names",
        };
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(name) => Ok(name),
                    _ => Err(invalid()),
                })
                .collect(),
            _ => Err(invalid()),
        }
    }

    /// Looks up already-parsed path segments.
    pub fn lookup(&self, segments: &[String]) -> Result<Option<Value>, ConfigurationError> {
        // A computed leaf at or above the path shadows stored values.
        for depth in 0..=segments.len() {
            let (at, below) = segments.split_at(depth);
            if let Some(computed) = self.computed.get(at) {
                let value = self.evaluate(at, computed)?;
                return Ok(walk(&value, below).filter(|v| !v.is_null()).cloned());
            }
        }

        let mut found = walk(&self.root, segments)
            .filter(|v| !v.is_null())
            .cloned();

        // Computed leaves below the path are materialized into the result.
        for (at, computed) in &self.computed {
            if at.len() > segments.len() && at.starts_with(segments) {
                let value = self.evaluate(at, computed)?;
                let target = found.get_or_insert_with(|| Value::Object(Map::new()));
                insert_at(target, &at[segments.len()..], value);
            }
        }
        Ok(found)
    }

    fn evaluate(
        &self,
        at: &[String],
        computed: &ComputedValue,
    ) -> Result<Value, ConfigurationError> {
        if let Some(value) = self.cache.borrow().get(at) {
            return Ok(value.clone());
        }
        if self.resolving.borrow().iter().any(|p| p.as_slice() == at) {
            return Err(ConfigurationError::CircularReference {
                path: display_path(at),
            });
        }

        self.resolving.borrow_mut().push(at.to_vec());
        let result = computed.evaluate(self);
        self.resolving.borrow_mut().pop();
        let value = result?;

        trace!(path = %display_path(at), "computed configuration value");
        self.cache.borrow_mut().insert(at.to_vec(), value.clone());
        Ok(value)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("root", &self.root)
            .field(
                "computed",
                &self.computed.keys().map(|k| display_path(k)).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn section_path(section: &str, path: &str) -> Result<Vec<String>, ConfigurationError> {
    let mut segments = vec![section.to_string()];
    segments.extend(parse_path(path)?);
    Ok(segments)
}

fn walk<'v>(value: &'v Value, segments: &[String]) -> Option<&'v Value> {
    segments.iter().try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn insert_at(target: &mut Value, segments: &[String], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        *target = value;
        return;
    };
    let mut current = target;
    for segment in parents {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Value::Object(map) = current else {
            return;
        };
        current = map
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    if let Value::Object(map) = current {
        map.insert(last.clone(), value);
    }
}
