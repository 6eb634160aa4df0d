//! A single layer of configuration.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::merge::deep_merge;
use super::path::{display_path, parse_path};
use super::resolver::Resolver;
use crate::error::{CompileError, ConfigurationError};

/// Sections whose `extend` key is shorthand for extend marks.
const EXTENDABLE_SECTIONS: [&str; 2] = ["theme", "variants"];

/// Signature of a computed configuration leaf.
pub type ComputeFn = dyn Fn(&Resolver) -> Result<Value, ConfigurationError>;

/// A configuration leaf computed from other configuration values.
///
/// The closure receives the fully merged [`Resolver`], so it always sees the
/// final values of the paths it reads, whichever layer set them.
#[derive(Clone)]
pub struct ComputedValue(Rc<ComputeFn>);

impl ComputedValue {
    /// Wraps a closure as a computed leaf.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Resolver) -> Result<Value, ConfigurationError> + 'static,
    {
        Self(Rc::new(f))
    }

    pub(crate) fn evaluate(&self, resolver: &Resolver) -> Result<Value, ConfigurationError> {
        (self.0)(resolver)
    }
}

impl fmt::Debug for ComputedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ComputedValue(<fn>)")
    }
}

/// One layer of configuration: values, extend marks and computed leaves.
///
/// Layers are built with chained setters, each of which parses its path:
///
/// ```rust
/// use tailor::config::ConfigLayer;
/// use serde_json::json;
///
/// let user = ConfigLayer::new()
///     .set("prefix", "tw-")?
///     .set("theme.colors", json!({"brand": "#ff6b35"}))?
///     .extend("theme.spacing", json!({"72": "18rem"}))?;
///
/// assert!(user.is_extended(&["theme".into(), "spacing".into()]));
/// # Ok::<(), tailor::ConfigurationError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLayer {
    values: Map<String, Value>,
    extends: Vec<Vec<String>>,
    computed: IndexMap<Vec<String>, ComputedValue>,
}

impl ConfigLayer {
    /// Creates an empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a layer from a configuration object.
    ///
    /// `theme.extend` and `variants.extend` entries become extend marks on the
    /// matching section keys. When a section sets a key *and* extends it, the
    /// key replaces the lower layers and the extension is merged into it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidValue`] if `value` is not an object
    /// (`null` is accepted as an empty layer).
    pub fn from_value(value: Value) -> Result<Self, ConfigurationError> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            Value::Null => Ok(Self::new()),
            _ => Err(ConfigurationError::InvalidValue {
                path: String::new(),
                expected: "an object",
            }),
        }
    }

    /// Parses a layer from JSON text.
    pub fn from_json(text: &str) -> Result<Self, CompileError> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(value)?)
    }

    /// Parses a layer from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, CompileError> {
        let value: Value = serde_yaml::from_str(text)?;
        Ok(Self::from_value(value)?)
    }

    pub(crate) fn from_map(map: Map<String, Value>) -> Self {
        let mut layer = Self::new();
        for (key, value) in map {
            match value {
                Value::Object(section) if EXTENDABLE_SECTIONS.contains(&key.as_str()) => {
                    let section = layer.take_extend_sugar(&key, section);
                    layer.values.insert(key, Value::Object(section));
                }
                value => {
                    layer.values.insert(key, value);
                }
            }
        }
        layer
    }

    /// Splits `section.extend` out of a section object, recording the marks.
    fn take_extend_sugar(&mut self, name: &str, section: Map<String, Value>) -> Map<String, Value> {
        let mut extensions = Map::new();
        let mut rest = Map::new();
        for (key, value) in section {
            match value {
                Value::Object(ext) if key == "extend" => extensions = ext,
                value => {
                    rest.insert(key, value);
                }
            }
        }

        for (key, extension) in extensions {
            match rest.get_mut(&key) {
                // Set and extended in the same layer: the set value replaces
                // lower layers and already carries the extension.
                Some(existing) => deep_merge(existing, extension),
                None => {
                    self.mark_extended(vec![name.to_string(), key.clone()]);
                    rest.insert(key, extension);
                }
            }
        }
        rest
    }

    /// Sets the value at `path`, replacing lower layers at merge time.
    ///
    /// Intermediate objects are created as needed; a scalar in the way is
    /// replaced by an object. The empty path replaces the whole layer and
    /// requires an object.
    pub fn set(mut self, path: &str, value: impl Into<Value>) -> Result<Self, ConfigurationError> {
        let segments = parse_path(path)?;
        self.insert(&segments, value.into())?;
        Ok(self)
    }

    /// Sets the value at `path` and marks it to be deep-merged into lower
    /// layers instead of replacing them.
    pub fn extend(
        mut self,
        path: &str,
        value: impl Into<Value>,
    ) -> Result<Self, ConfigurationError> {
        let segments = parse_path(path)?;
        if segments.is_empty() {
            return Err(ConfigurationError::MalformedPath {
                path: path.to_string(),
                reason: "the root cannot be extended".to_string(),
            });
        }
        self.insert(&segments, value.into())?;
        self.mark_extended(segments);
        Ok(self)
    }

    /// Registers a computed leaf at `path`.
    ///
    /// ```rust
    /// use tailor::config::ConfigLayer;
    ///
    /// let layer = ConfigLayer::new()
    ///     .computed("theme.padding", |theme| theme.theme_or("spacing", serde_json::json!({})))?;
    /// # Ok::<(), tailor::ConfigurationError>(())
    /// ```
    pub fn computed<F>(mut self, path: &str, f: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&Resolver) -> Result<Value, ConfigurationError> + 'static,
    {
        let segments = parse_path(path)?;
        self.computed.insert(segments, ComputedValue::new(f));
        Ok(self)
    }

    pub(crate) fn with_computed<F>(mut self, segments: &[&str], f: F) -> Self
    where
        F: Fn(&Resolver) -> Result<Value, ConfigurationError> + 'static,
    {
        let segments = segments.iter().map(|s| s.to_string()).collect();
        self.computed.insert(segments, ComputedValue::new(f));
        self
    }

    /// Returns the plain values of this layer.
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Returns whether `segments` is marked as extended.
    pub fn is_extended(&self, segments: &[String]) -> bool {
        self.extends.iter().any(|mark| mark.as_slice() == segments)
    }

    /// Returns whether this layer has no values, marks or computed leaves.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.computed.is_empty()
    }

    pub(crate) fn extends(&self) -> &[Vec<String>] {
        &self.extends
    }

    pub(crate) fn computed_entries(&self) -> &IndexMap<Vec<String>, ComputedValue> {
        &self.computed
    }

    fn mark_extended(&mut self, segments: Vec<String>) {
        if !self.is_extended(&segments) {
            self.extends.push(segments);
        }
    }

    fn insert(&mut self, segments: &[String], value: Value) -> Result<(), ConfigurationError> {
        let Some((last, parents)) = segments.split_last() else {
            return match value {
                Value::Object(map) => {
                    self.values = map;
                    Ok(())
                }
                _ => Err(ConfigurationError::InvalidValue {
                    path: String::new(),
                    expected: "an object",
                }),
            };
        };

        let mut current = &mut self.values;
        for segment in parents {
            let slot = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = match slot {
                Value::Object(map) => map,
                _ => {
                    return Err(ConfigurationError::InvalidValue {
                        path: display_path(segments),
                        expected: "an object",
                    })
                }
            };
        }
        current.insert(last.clone(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(p: &str) -> Vec<String> {
        parse_path(p).unwrap()
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let layer = ConfigLayer::new().set("theme.colors.red", "#f00").unwrap();
        assert_eq!(
            Value::Object(layer.values().clone()),
            json!({"theme": {"colors": {"red": "#f00"}}})
        );
    }

    #[test]
    fn test_set_replaces_scalar_in_the_way() {
        let layer = ConfigLayer::new()
            .set("theme.colors", "none")
            .unwrap()
            .set("theme.colors.red", "#f00")
            .unwrap();
        assert_eq!(layer.values()["theme"]["colors"], json!({"red": "#f00"}));
    }

    #[test]
    fn test_set_root_requires_object() {
        assert!(ConfigLayer::new().set("", 3).is_err());
        let layer = ConfigLayer::new().set("", json!({"prefix": "x-"})).unwrap();
        assert_eq!(layer.values()["prefix"], json!("x-"));
    }

    #[test]
    fn test_extend_marks_path() {
        let layer = ConfigLayer::new()
            .extend("theme.spacing", json!({"72": "18rem"}))
            .unwrap();
        assert!(layer.is_extended(&path("theme.spacing")));
        assert!(!layer.is_extended(&path("theme")));
    }

    #[test]
    fn test_extend_root_rejected() {
        assert!(matches!(
            ConfigLayer::new().extend("", json!({})),
            Err(ConfigurationError::MalformedPath { .. })
        ));
    }

    #[test]
    fn test_bad_path_propagates() {
        assert!(ConfigLayer::new().set("a..b", 1).is_err());
    }

    // =========================================================================
    // Extend sugar
    // =========================================================================

    #[test]
    fn test_theme_extend_sugar() {
        let layer = ConfigLayer::from_value(json!({
            "theme": {
                "extend": {"colors": {"brand": "#123456"}}
            }
        }))
        .unwrap();

        assert!(layer.is_extended(&path("theme.colors")));
        assert_eq!(layer.values()["theme"], json!({"colors": {"brand": "#123456"}}));
    }

    #[test]
    fn test_variants_extend_sugar() {
        let layer = ConfigLayer::from_value(json!({
            "variants": {"extend": {"padding": ["hover"]}}
        }))
        .unwrap();
        assert!(layer.is_extended(&path("variants.padding")));
    }

    #[test]
    fn test_set_and_extend_same_key() {
        let layer = ConfigLayer::from_value(json!({
            "theme": {
                "colors": {"red": "#f00"},
                "extend": {"colors": {"blue": "#00f"}}
            }
        }))
        .unwrap();

        assert!(!layer.is_extended(&path("theme.colors")));
        assert_eq!(
            layer.values()["theme"]["colors"],
            json!({"red": "#f00", "blue": "#00f"})
        );
    }

    #[test]
    fn test_extend_outside_sections_is_plain_key() {
        let layer = ConfigLayer::from_value(json!({"forms": {"extend": {"a": 1}}})).unwrap();
        assert!(layer.extends().is_empty());
        assert_eq!(layer.values()["forms"], json!({"extend": {"a": 1}}));
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    #[test]
    fn test_from_yaml() {
        let layer = ConfigLayer::from_yaml(
            "prefix: tw-\ntheme:\n  extend:\n    spacing:\n      '72': 18rem\n",
        )
        .unwrap();
        assert_eq!(layer.values()["prefix"], json!("tw-"));
        assert!(layer.is_extended(&path("theme.spacing")));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = ConfigLayer::from_json("[1, 2]").unwrap_err();
        assert!(matches!(
            err,
            CompileError::Configuration(ConfigurationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_from_json_syntax_error() {
        assert!(matches!(
            ConfigLayer::from_json("{\"prefix\":").unwrap_err(),
            CompileError::Parse { format: "JSON", .. }
        ));
    }

    #[test]
    fn test_null_is_empty_layer() {
        assert!(ConfigLayer::from_value(Value::Null).unwrap().is_empty());
    }
}
