//! Rule and declaration types.

use std::fmt;

use serde::Serialize;

const IMPORTANT: &str = "!important";

/// A single `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub important: bool,
}

impl Declaration {
    /// Creates a declaration.
    ///
    /// A trailing `!important` in `value` is split off into the flag.
    ///
    /// ```rust
    /// use tailor::Declaration;
    ///
    /// let decl = Declaration::new("color", "red !important");
    /// assert_eq!(decl.value, "red");
    /// assert!(decl.important);
    /// ```
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        match value.trim_end().strip_suffix(IMPORTANT) {
            Some(rest) => Self {
                property: property.into(),
                value: rest.trim_end().to_string(),
                important: true,
            },
            None => Self {
                property: property.into(),
                value,
                important: false,
            },
        }
    }

    /// Returns the declaration with its important flag set.
    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.value)?;
        if self.important {
            write!(f, " {}", IMPORTANT)?;
        }
        f.write_str(";")
    }
}

/// An at-rule wrapper such as `@media (min-width: 640px)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AtCondition {
    /// The at-rule name without `@`, e.g. `media`.
    pub name: String,
    /// Everything after the name, e.g. `(min-width: 640px)`. May be empty.
    pub params: String,
}

impl AtCondition {
    /// At-rules that only condition their contents and keep the selector
    /// context of the block they appear in.
    const CONDITIONAL_GROUPS: [&'static str; 5] =
        ["media", "supports", "container", "document", "layer"];

    pub fn new(name: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: params.into(),
        }
    }

    /// Shorthand for `@media <params>`.
    pub fn media(params: impl Into<String>) -> Self {
        Self::new("media", params)
    }

    /// Parses an at-rule key such as `@media (min-width: 640px)`.
    ///
    /// The leading `@` is optional.
    pub fn parse(key: &str) -> Self {
        let key = key.trim();
        let key = key.strip_prefix('@').unwrap_or(key);
        match key.split_once(|c: char| c.is_whitespace() || c == '(') {
            Some((name, _)) => {
                let params = key[name.len()..].trim();
                Self::new(name, params)
            }
            None => Self::new(key, ""),
        }
    }

    /// Whether this at-rule keeps the enclosing selector context.
    pub fn is_conditional_group(&self) -> bool {
        Self::CONDITIONAL_GROUPS.contains(&self.name.to_ascii_lowercase().as_str())
    }
}

impl fmt::Display for AtCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            write!(f, "@{}", self.name)
        } else {
            write!(f, "@{} {}", self.name, self.params)
        }
    }
}

/// A normalized style rule.
///
/// `conditions` wrap the rule outermost first. `selector` is absent for the
/// body of an at-rule such as `@font-face`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Rule {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<AtCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    pub declarations: Vec<Declaration>,
}

impl Rule {
    /// Creates an empty rule for `selector`.
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            conditions: Vec::new(),
            selector: Some(selector.into()),
            declarations: Vec::new(),
        }
    }

    /// Creates an empty selectorless rule inside `condition`.
    pub fn at_rule(condition: AtCondition) -> Self {
        Self {
            conditions: vec![condition],
            selector: None,
            declarations: Vec::new(),
        }
    }

    /// Appends a declaration.
    pub fn declare(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.declarations.push(Declaration::new(property, value));
        self
    }

    /// Wraps the rule in `condition`, outside any existing conditions.
    ///
    /// ```rust
    /// use tailor::{AtCondition, Rule};
    ///
    /// let rule = Rule::new(".a")
    ///     .wrap(AtCondition::new("supports", "(display: grid)"))
    ///     .wrap(AtCondition::media("print"));
    /// assert_eq!(rule.conditions[0].to_string(), "@media print");
    /// ```
    pub fn wrap(mut self, condition: AtCondition) -> Self {
        self.conditions.insert(0, condition);
        self
    }

    /// Whether `other` targets the same selector under the same conditions.
    pub fn same_target(&self, other: &Rule) -> bool {
        self.selector == other.selector && self.conditions == other.conditions
    }
}
