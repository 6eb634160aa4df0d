//! Built-in variants.
//!
//! | Variant | Output for `.x` (separator `:`) |
//! |---------|--------------------------------|
//! | `responsive` | `@media (min-width: 640px) { .sm\:x }`, one block per screen |
//! | `hover`, `focus`, `active`, `visited`, `disabled`, `checked` | `.hover\:x:hover` |
//! | `focus-within`, `focus-visible` | `.focus-within\:x:focus-within` |
//! | `first`, `last`, `odd`, `even` | `.first\:x:first-child`, `.odd\:x:nth-child(odd)` |
//! | `group-hover`, `group-focus` | `.group:hover .group-hover\:x` |
//! | `motion-safe`, `motion-reduce` | `@media (prefers-reduced-motion: ...) { .motion-safe\:x }` |
//! | `dark` | `@media (prefers-color-scheme: dark) { .dark\:x }` |

use std::rc::Rc;

use serde::Deserialize;
use serde_json::Value;
use tailor_selector::escape_class_name;

use super::expand::VariantTable;
use super::transform::VariantTransform;
use crate::error::ConfigurationError;
use crate::style::AtCondition;

/// Variants that append a pseudo-class to the renamed class.
const PSEUDO_CLASS_VARIANTS: [(&str, &str); 12] = [
    ("hover", "hover"),
    ("focus", "focus"),
    ("active", "active"),
    ("visited", "visited"),
    ("disabled", "disabled"),
    ("checked", "checked"),
    ("focus-within", "focus-within"),
    ("focus-visible", "focus-visible"),
    ("first", "first-child"),
    ("last", "last-child"),
    ("odd", "nth-child(odd)"),
    ("even", "nth-child(even)"),
];

/// Variants that wrap the renamed class in a media query.
const MEDIA_VARIANTS: [(&str, &str); 3] = [
    ("motion-safe", "(prefers-reduced-motion: no-preference)"),
    ("motion-reduce", "(prefers-reduced-motion: reduce)"),
    ("dark", "(prefers-color-scheme: dark)"),
];

/// A named breakpoint and its media query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub name: String,
    pub media: String,
}

/// A screen as written in `theme.screens`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScreenDef {
    Raw { raw: String },
    Min(String),
    Range {
        #[serde(default)]
        min: Option<String>,
        #[serde(default)]
        max: Option<String>,
    },
    Multiple(Vec<ScreenDef>),
}

impl ScreenDef {
    fn media(&self) -> Option<String> {
        match self {
            ScreenDef::Raw { raw } => Some(raw.clone()),
            ScreenDef::Min(min) => Some(format!("(min-width: {})", min)),
            ScreenDef::Range { min, max } => match (min, max) {
                (Some(min), Some(max)) => {
                    Some(format!("(min-width: {}) and (max-width: {})", min, max))
                }
                (Some(min), None) => Some(format!("(min-width: {})", min)),
                (None, Some(max)) => Some(format!("(max-width: {})", max)),
                (None, None) => None,
            },
            ScreenDef::Multiple(ranges) => {
                let parts = ranges.iter().map(ScreenDef::media).collect::<Option<Vec<_>>>()?;
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(", "))
                }
            }
        }
    }
}

/// Reads the breakpoints configured under `theme.screens`.
///
/// A string is a minimum width; an object may give `min`, `max` or a `raw`
/// media query; an array joins several of those.
///
/// ```rust
/// use tailor::variant::parse_screens;
/// use serde_json::json;
///
/// let screens = parse_screens(&json!({
///     "sm": "640px",
///     "tablet": {"min": "640px", "max": "1023px"},
///     "print": {"raw": "print"}
/// }))?;
/// assert_eq!(screens[0].media, "(min-width: 640px)");
/// assert_eq!(screens[1].media, "(min-width: 640px) and (max-width: 1023px)");
/// assert_eq!(screens[2].media, "print");
/// # Ok::<(), tailor::ConfigurationError>(())
/// ```
pub fn parse_screens(value: &Value) -> Result<Vec<Screen>, ConfigurationError> {
    let Value::Object(map) = value else {
        return Err(ConfigurationError::InvalidValue {
            path: "theme.screens".to_string(),
            expected: "an object of screens",
        });
    };

    map.iter()
        .map(|(name, def)| {
            let invalid = || ConfigurationError::InvalidValue {
                path: format!("theme.screens.{}", name),
                expected: "a width, a min/max range or a raw media query",
            };
            let def: ScreenDef = serde_json::from_value(def.clone()).map_err(|_| invalid())?;
            let media = def.media().ok_or_else(invalid)?;
            Ok(Screen {
                name: name.clone(),
                media,
            })
        })
        .collect()
}

/// Builds the table of built-in variants for one pass.
///
/// `prefix` is the configured class prefix, used for the `group` marker class
/// of the group variants.
pub fn builtin_variants(screens: Vec<Screen>, prefix: &str) -> VariantTable {
    let mut table = VariantTable::new();

    let screens = Rc::new(screens);
    table.insert(
        "responsive",
        VariantTransform::structural(move |rules, cx| {
            screens
                .iter()
                .flat_map(|screen| {
                    cx.rename_classes_as(rules.clone(), &screen.name)
                        .into_iter()
                        .map(move |rule| rule.wrap(AtCondition::media(screen.media.clone())))
                })
                .collect()
        }),
    );

    for (name, pseudo) in PSEUDO_CLASS_VARIANTS {
        table.insert(
            name,
            VariantTransform::selector(move |c| format!("{}:{}", c.variant_class(), pseudo)),
        );
    }

    let group = escape_class_name(&format!("{}group", prefix));
    for (name, state) in [("group-hover", "hover"), ("group-focus", "focus")] {
        let group = group.clone();
        table.insert(
            name,
            VariantTransform::selector(move |c| {
                format!(".{}:{} {}", group, state, c.variant_class())
            }),
        );
    }

    for (name, query) in MEDIA_VARIANTS {
        table.insert(
            name,
            VariantTransform::structural(move |rules, cx| {
                cx.rename_classes(rules)
                    .into_iter()
                    .map(|rule| rule.wrap(AtCondition::media(query)))
                    .collect()
            }),
        );
    }

    table
}
