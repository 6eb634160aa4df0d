//! System default configuration.
//!
//! The defaults are the lowest layer of every pass. They cover the settings
//! (`prefix`, `important`, `separator`), a starter theme and the default
//! variant list of each utility family. A few theme keys are computed from
//! others, so overriding `theme.colors` or `theme.spacing` carries through to
//! the utilities derived from them.

use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};

use super::layer::ConfigLayer;
use super::resolver::Resolver;
use crate::error::ConfigurationError;

static DEFAULT_VALUES: Lazy<Map<String, Value>> = Lazy::new(|| {
    let value = json!({
        "prefix": "",
        "important": false,
        "separator": ":",
        "theme": {
            "screens": {
                "sm": "640px",
                "md": "768px",
                "lg": "1024px",
                "xl": "1280px"
            },
            "colors": {
                "transparent": "transparent",
                "current": "currentColor",
                "black": "#000",
                "white": "#fff",
                "gray": {
                    "100": "#f7fafc",
                    "200": "#edf2f7",
                    "300": "#e2e8f0",
                    "400": "#cbd5e0",
                    "500": "#a0aec0",
                    "600": "#718096",
                    "700": "#4a5568",
                    "800": "#2d3748",
                    "900": "#1a202c"
                },
                "red": {
                    "100": "#fff5f5",
                    "300": "#feb2b2",
                    "500": "#f56565",
                    "700": "#c53030",
                    "900": "#742a2a"
                },
                "green": {
                    "100": "#f0fff4",
                    "300": "#9ae6b4",
                    "500": "#48bb78",
                    "700": "#2f855a",
                    "900": "#22543d"
                },
                "blue": {
                    "100": "#ebf8ff",
                    "300": "#90cdf4",
                    "500": "#4299e1",
                    "700": "#2b6cb0",
                    "900": "#2a4365"
                }
            },
            "spacing": {
                "px": "1px",
                "0": "0",
                "1": "0.25rem",
                "2": "0.5rem",
                "3": "0.75rem",
                "4": "1rem",
                "5": "1.25rem",
                "6": "1.5rem",
                "8": "2rem",
                "10": "2.5rem",
                "12": "3rem",
                "16": "4rem",
                "20": "5rem",
                "24": "6rem",
                "32": "8rem"
            },
            "opacity": {
                "0": "0",
                "25": "0.25",
                "50": "0.5",
                "75": "0.75",
                "100": "1"
            },
            "borderRadius": {
                "none": "0",
                "sm": "0.125rem",
                "default": "0.25rem",
                "md": "0.375rem",
                "lg": "0.5rem",
                "full": "9999px"
            },
            "fontSize": {
                "xs": "0.75rem",
                "sm": "0.875rem",
                "base": "1rem",
                "lg": "1.125rem",
                "xl": "1.25rem",
                "2xl": "1.5rem",
                "3xl": "1.875rem",
                "4xl": "2.25rem"
            }
        },
        "variants": {
            "backgroundColor": ["responsive", "hover", "focus"],
            "borderColor": ["responsive", "hover", "focus"],
            "borderRadius": ["responsive"],
            "display": ["responsive"],
            "fontSize": ["responsive"],
            "margin": ["responsive"],
            "opacity": ["responsive", "hover", "focus"],
            "padding": ["responsive"],
            "textColor": ["responsive", "hover", "focus", "group-hover"]
        }
    });
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
});

/// Returns the system default configuration layer.
///
/// Computed leaves:
///
/// - `theme.borderColor`: every color plus `default`, taken from
///   `colors.gray.300` (or `currentColor`)
/// - `theme.padding`: the spacing scale
/// - `theme.margin`: `auto`, the spacing scale and its negatives (`-4`)
pub fn default_config() -> ConfigLayer {
    ConfigLayer::from_map(DEFAULT_VALUES.clone())
        .with_computed(&["theme", "borderColor"], border_color)
        .with_computed(&["theme", "padding"], |theme| theme.theme_or("spacing", json!({})))
        .with_computed(&["theme", "margin"], margin)
}

fn border_color(theme: &Resolver) -> Result<Value, ConfigurationError> {
    let mut colors = object(theme.theme_or("colors", json!({}))?);
    let default = theme.theme_or("colors.gray.300", "currentColor")?;
    colors.insert("default".to_string(), default);
    Ok(Value::Object(colors))
}

fn margin(theme: &Resolver) -> Result<Value, ConfigurationError> {
    let spacing = object(theme.theme_or("spacing", json!({}))?);

    let mut scale = Map::new();
    scale.insert("auto".to_string(), json!("auto"));
    for (key, value) in &spacing {
        scale.insert(key.clone(), value.clone());
    }
    for (key, value) in &spacing {
        if let Some(negated) = negate(value) {
            scale.insert(format!("-{}", key), Value::String(negated));
        }
    }
    Ok(Value::Object(scale))
}

/// Negates a length, skipping zero.
fn negate(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text == "0" || text.is_empty() {
        return None;
    }
    Some(match text.strip_prefix('-') {
        Some(positive) => positive.to_string(),
        None => format!("-{}", text),
    })
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Resolver {
        let layer = default_config();
        Resolver::new([&layer])
    }

    #[test]
    fn test_settings_defaults() {
        let r = defaults();
        assert_eq!(r.config("prefix").unwrap(), Some(json!("")));
        assert_eq!(r.config("important").unwrap(), Some(json!(false)));
        assert_eq!(r.config("separator").unwrap(), Some(json!(":")));
    }

    #[test]
    fn test_screens_in_order() {
        let screens = defaults().theme("screens").unwrap().unwrap();
        let keys: Vec<_> = screens.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["sm", "md", "lg", "xl"]);
    }

    #[test]
    fn test_border_color_default() {
        let r = defaults();
        assert_eq!(r.theme("borderColor.default").unwrap(), Some(json!("#e2e8f0")));
        assert_eq!(r.theme("borderColor.red.500").unwrap(), Some(json!("#f56565")));
    }

    #[test]
    fn test_border_color_without_gray() {
        let user = ConfigLayer::new()
            .set("theme.colors", json!({"brand": "#123"}))
            .unwrap();
        let defaults = default_config();
        let r = Resolver::new([&defaults, &user]);
        assert_eq!(
            r.theme("borderColor").unwrap(),
            Some(json!({"brand": "#123", "default": "currentColor"}))
        );
    }

    #[test]
    fn test_extend_border_color() {
        let user = ConfigLayer::new()
            .extend("theme.borderColor.brand", "#123")
            .unwrap();
        let defaults = default_config();
        let r = Resolver::new([&defaults, &user]);
        assert_eq!(r.theme("borderColor.brand").unwrap(), Some(json!("#123")));
        assert_eq!(r.theme("borderColor.default").unwrap(), Some(json!("#e2e8f0")));
    }

    #[test]
    fn test_margin_negatives() {
        let r = defaults();
        assert_eq!(r.theme("margin.auto").unwrap(), Some(json!("auto")));
        assert_eq!(r.theme("margin.-4").unwrap(), Some(json!("-1rem")));
        assert_eq!(r.theme("margin.-0").unwrap(), None);
    }

    #[test]
    fn test_padding_follows_spacing_extension() {
        let user = ConfigLayer::new()
            .extend("theme.spacing", json!({"72": "18rem"}))
            .unwrap();
        let defaults = default_config();
        let r = Resolver::new([&defaults, &user]);
        assert_eq!(r.theme("padding.72").unwrap(), Some(json!("18rem")));
        assert_eq!(r.theme("padding.4").unwrap(), Some(json!("1rem")));
    }

    #[test]
    fn test_negate() {
        assert_eq!(negate(&json!("1px")).as_deref(), Some("-1px"));
        assert_eq!(negate(&json!("-2px")).as_deref(), Some("2px"));
        assert_eq!(negate(&json!("0")), None);
    }
}
