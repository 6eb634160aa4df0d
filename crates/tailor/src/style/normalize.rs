//! Style object normalization.
//!
//! Plugins describe styles as nested objects, the way they would be written in
//! a CSS-in-JS library:
//!
//! ```json
//! {
//!   ".btn": {
//!     "padding": "0.5rem 1rem",
//!     "&:hover": { "backgroundColor": "#2b6cb0" },
//!     "@media (min-width: 640px)": { "padding": "1rem" }
//!   }
//! }
//! ```
//!
//! [`normalize`] flattens this into a list of [`Rule`]s, one per selector and
//! condition context, in document order: a block's own declarations first,
//! then its nested blocks.
//!
//! # Keys
//!
//! | Key | Meaning |
//! |-----|---------|
//! | scalar value | declaration (`null` is skipped, arrays repeat the property) |
//! | contains `&` | nested selector, `&` replaced by the parent |
//! | starts with `:` or `[` | appended to the parent selector |
//! | anything else with an object value | descendant of the parent selector |
//! | `@media`, `@supports`, ... | condition wrapping the parent selector |
//! | other `@` rules | at-rule with a fresh selector scope (`@font-face`) |

use serde_json::{Map, Value};
use tailor_selector::{replace_nesting, split_selector_list};

use super::rule::{AtCondition, Declaration, Rule};
use crate::error::NormalizationError;

/// Flattens a style object into rules.
///
/// The root may be an object, an array of objects (processed in order) or
/// `null` (no rules).
///
/// ```rust
/// use tailor::normalize;
/// use serde_json::json;
///
/// let rules = normalize(&json!({
///     ".card": {
///         "backgroundColor": "white",
///         "> .title": { "fontWeight": 700 }
///     }
/// }))?;
///
/// assert_eq!(rules[0].selector.as_deref(), Some(".card"));
/// assert_eq!(rules[0].declarations[0].property, "background-color");
/// assert_eq!(rules[1].selector.as_deref(), Some(".card > .title"));
/// assert_eq!(rules[1].declarations[0].value, "700");
/// # Ok::<(), tailor::NormalizationError>(())
/// ```
///
/// # Errors
///
/// - [`NormalizationError::InvalidRoot`] if the root is a scalar
/// - [`NormalizationError::EmptyBlock`] for a nested block with no entries
/// - [`NormalizationError::DeclarationOutsideRule`] for a declaration with no
///   enclosing selector or at-rule
pub fn normalize(styles: &Value) -> Result<Vec<Rule>, NormalizationError> {
    let mut rules = Vec::new();
    let root = Scope::default();

    match styles {
        Value::Null => {}
        Value::Object(map) => block(map, &root, &mut rules)?,
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Object(map) => block(map, &root, &mut rules)?,
                    Value::Null => {}
                    other => {
                        return Err(NormalizationError::InvalidRoot {
                            found: kind(other),
                        })
                    }
                }
            }
        }
        other => {
            return Err(NormalizationError::InvalidRoot {
                found: kind(other),
            })
        }
    }

    Ok(merge_adjacent(rules))
}

/// The selector and condition context of a block.
#[derive(Debug, Clone, Default)]
struct Scope {
    conditions: Vec<AtCondition>,
    /// Alternatives of the current selector list; `None` outside any selector.
    selectors: Option<Vec<String>>,
}

impl Scope {
    fn selector(&self) -> Option<String> {
        self.selectors.as_ref().map(|list| list.join(", "))
    }

    /// Human-readable location for error messages.
    fn label(&self) -> String {
        let mut parts: Vec<String> = self.conditions.iter().map(|c| c.to_string()).collect();
        parts.extend(self.selector());
        parts.join(" ")
    }

    fn at_rule(&self, key: &str) -> Scope {
        let condition = AtCondition::parse(key);
        let selectors = if condition.is_conditional_group() {
            self.selectors.clone()
        } else {
            None
        };
        let mut conditions = self.conditions.clone();
        conditions.push(condition);
        Scope {
            conditions,
            selectors,
        }
    }

    fn nest(&self, key: &str) -> Scope {
        let children = split_selector_list(key);
        let selectors = match &self.selectors {
            None => children
                .iter()
                .map(|child| match replace_nesting(child, "") {
                    Some(stripped) => stripped.trim().to_string(),
                    None => child.clone(),
                })
                .collect(),
            Some(parents) => parents
                .iter()
                .flat_map(|parent| children.iter().map(move |child| join(parent, child)))
                .collect(),
        };
        Scope {
            conditions: self.conditions.clone(),
            selectors: Some(selectors),
        }
    }
}

fn join(parent: &str, child: &str) -> String {
    if let Some(replaced) = replace_nesting(child, parent) {
        return replaced;
    }
    if child.starts_with(':') || child.starts_with('[') {
        format!("{}{}", parent, child)
    } else {
        format!("{} {}", parent, child)
    }
}

fn block(
    map: &Map<String, Value>,
    scope: &Scope,
    out: &mut Vec<Rule>,
) -> Result<(), NormalizationError> {
    let mut declarations = Vec::new();
    let mut nested = Vec::new();

    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Object(inner) => child(key, inner, scope, &mut nested)?,
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::Object(inner) => child(key, inner, scope, &mut nested)?,
                        scalar => push_declarations(key, scalar, &mut declarations),
                    }
                }
            }
            scalar => push_declarations(key, scalar, &mut declarations),
        }
    }

    if let Some(first) = declarations.first() {
        // Conditional groups borrow the enclosing selector, so without one
        // there is nothing to hold the declarations.
        let bare = scope.conditions.iter().all(AtCondition::is_conditional_group);
        if scope.selectors.is_none() && bare {
            return Err(NormalizationError::DeclarationOutsideRule {
                property: first.property.clone(),
            });
        }
        out.push(Rule {
            conditions: scope.conditions.clone(),
            selector: scope.selector(),
            declarations,
        });
    }
    out.append(&mut nested);
    Ok(())
}

fn child(
    key: &str,
    inner: &Map<String, Value>,
    scope: &Scope,
    out: &mut Vec<Rule>,
) -> Result<(), NormalizationError> {
    let scope = if key.starts_with('@') {
        scope.at_rule(key)
    } else {
        scope.nest(key)
    };
    if inner.is_empty() {
        return Err(NormalizationError::EmptyBlock {
            selector: scope.label(),
        });
    }
    block(inner, &scope, out)
}

fn push_declarations(key: &str, value: &Value, out: &mut Vec<Declaration>) {
    match value {
        Value::Null => {}
        Value::String(text) => out.push(Declaration::new(property_name(key), text.as_str())),
        Value::Number(n) => out.push(Declaration::new(property_name(key), n.to_string())),
        Value::Bool(b) => out.push(Declaration::new(property_name(key), b.to_string())),
        Value::Array(items) => {
            for item in items {
                push_declarations(key, item, out);
            }
        }
        // Objects are nested blocks and never reach here.
        Value::Object(_) => {}
    }
}

/// Converts a camel-case property name to its dashed form.
///
/// Custom properties and keys that are not plain identifiers are kept
/// verbatim.
///
/// ```rust
/// use tailor::style::property_name;
///
/// assert_eq!(property_name("backgroundColor"), "background-color");
/// assert_eq!(property_name("WebkitTransition"), "-webkit-transition");
/// assert_eq!(property_name("msFlex"), "-ms-flex");
/// assert_eq!(property_name("--tw-ring-color"), "--tw-ring-color");
/// ```
pub fn property_name(key: &str) -> String {
    let is_identifier = key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if key.starts_with("--") || !is_identifier || !key.chars().any(|c| c.is_ascii_uppercase()) {
        return key.to_string();
    }

    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    if out.starts_with("ms-") {
        out.insert(0, '-');
    }
    out
}

/// Merges neighbouring rules that target the same selector and conditions.
fn merge_adjacent(rules: Vec<Rule>) -> Vec<Rule> {
    let mut merged: Vec<Rule> = Vec::with_capacity(rules.len());
    for rule in rules {
        match merged.last_mut() {
            Some(last) if last.selector.is_some() && last.same_target(&rule) => {
                last.declarations.extend(rule.declarations);
            }
            _ => merged.push(rule),
        }
    }
    merged
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
