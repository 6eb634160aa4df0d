//! Layer merging.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::layer::{ComputedValue, ConfigLayer};
use super::path::display_path;

/// Top-level sections whose children are replaced one by one.
const SECTIONS: [&str; 2] = ["theme", "variants"];

/// The result of stacking configuration layers.
#[derive(Debug, Default)]
pub(crate) struct MergedConfig {
    pub(crate) root: Value,
    pub(crate) computed: IndexMap<Vec<String>, ComputedValue>,
}

/// Stacks `layers`, lowest first.
pub(crate) fn merge_layers<'a, I>(layers: I) -> MergedConfig
where
    I: IntoIterator<Item = &'a ConfigLayer>,
{
    let mut merged = MergedConfig {
        root: Value::Object(Map::new()),
        computed: IndexMap::new(),
    };
    for layer in layers {
        merged.apply(layer);
    }
    merged
}

impl MergedConfig {
    fn apply(&mut self, layer: &ConfigLayer) {
        let mut path = Vec::new();
        let top = Value::Object(layer.values().clone());
        overlay(&mut self.root, top, &mut path, layer, &mut self.computed);

        for (at, computed) in layer.computed_entries() {
            self.computed.retain(|existing, _| !existing.starts_with(at));
            self.computed.insert(at.clone(), computed.clone());
        }
    }
}

fn overlay(
    base: &mut Value,
    top: Value,
    path: &mut Vec<String>,
    layer: &ConfigLayer,
    computed: &mut IndexMap<Vec<String>, ComputedValue>,
) {
    if !path.is_empty() && layer.is_extended(path) {
        debug!(path = %display_path(path), "extending value");
        extend_computed(path, &top, computed);
        deep_merge(base, top);
        return;
    }

    if descends(path, layer) {
        if let Value::Object(children) = top {
            if !base.is_object() {
                *base = Value::Object(Map::new());
            }
            if let Value::Object(slots) = base {
                for (key, value) in children {
                    path.push(key.clone());
                    let slot = slots.entry(key).or_insert(Value::Null);
                    overlay(slot, value, path, layer, computed);
                    path.pop();
                }
            }
            return;
        }
    }

    // A replaced value takes any computed leaves at or below it with it.
    let before = computed.len();
    computed.retain(|at, _| !at.starts_with(path.as_slice()));
    if computed.len() != before {
        trace!(path = %display_path(path), "replaced computed value");
    }
    *base = top;
}

/// Folds an extension of `path` into the computed values it touches.
///
/// A computed ancestor receives the extension nested at the relative path; a
/// computed leaf below `path` receives whatever the extension holds for it.
fn extend_computed(
    path: &[String],
    top: &Value,
    computed: &mut IndexMap<Vec<String>, ComputedValue>,
) {
    let touched: Vec<(Vec<String>, Value)> = computed
        .keys()
        .filter_map(|at| {
            if path.starts_with(at) {
                Some((at.clone(), nest(&path[at.len()..], top.clone())))
            } else if at.starts_with(path) {
                value_at(top, &at[path.len()..]).map(|v| (at.clone(), v.clone()))
            } else {
                None
            }
        })
        .collect();

    for (at, extension) in touched {
        let Some(inner) = computed.get(&at).cloned() else {
            continue;
        };
        debug!(path = %display_path(&at), "extending computed value");
        computed.insert(
            at,
            ComputedValue::new(move |resolver| {
                let mut value = inner.evaluate(resolver)?;
                deep_merge(&mut value, extension.clone());
                Ok(value)
            }),
        );
    }
}

/// Wraps `value` in one object per segment of `path`.
fn nest(path: &[String], value: Value) -> Value {
    path.iter().rev().fold(value, |inner, key| {
        let mut map = Map::new();
        map.insert(key.clone(), inner);
        Value::Object(map)
    })
}

fn value_at<'a>(value: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(value, |node, key| node.get(key.as_str()))
}

/// Whether `path` is merged key by key rather than replaced.
fn descends(path: &[String], layer: &ConfigLayer) -> bool {
    match path {
        [] => true,
        [section] if SECTIONS.contains(&section.as_str()) => true,
        _ => layer
            .extends()
            .iter()
            .any(|mark| mark.len() > path.len() && mark.starts_with(path)),
    }
}

/// Deep-merges `top` into `base`.
///
/// Objects are unioned recursively with `top` winning on conflicts; arrays gain
/// the items of `top` they do not already contain, in order; anything else is
/// replaced.
///
/// ```rust
/// use tailor::config::deep_merge;
/// use serde_json::json;
///
/// let mut base = json!({"a": {"x": 1, "y": 2}, "list": ["hover"]});
/// deep_merge(&mut base, json!({"a": {"y": 3}, "list": ["focus", "hover"]}));
/// assert_eq!(base, json!({"a": {"x": 1, "y": 3}, "list": ["hover", "focus"]}));
/// ```
pub fn deep_merge(base: &mut Value, top: Value) {
    match (base, top) {
        (Value::Object(base), Value::Object(top)) => {
            for (key, value) in top {
                match base.get_mut(&key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(base), Value::Array(top)) => {
            for item in top {
                if !base.contains(&item) {
                    base.push(item);
                }
            }
        }
        (base, top) => *base = top,
    }
}
