//! Integration tests for tailor.
//!
//! These tests run whole compilation passes the way a build tool would: a user
//! configuration, an ordered plugin list, and the emitted stylesheet.

use serde_json::{json, Map, Value};
use tailor::{
    compile, AddOptions, AtCondition, CompileError, Compiler, ConfigLayer, ConfigurationError,
    Layer, NormalizationError, Plugin, PluginWithOptions, Rule, Stylesheet, VariantTable,
    VariantTransform,
};

/// A plugin generating `.{class}-{key}` utilities for each key of a theme scale.
fn scale_plugin(name: &'static str, class: &'static str, property: &'static str) -> Plugin {
    Plugin::new(name, move |api| {
        let scale = api.theme_or(name, json!({}))?;
        let mut utilities = Map::new();
        for (key, value) in scale.as_object().into_iter().flatten() {
            let selector = format!(".{}", api.e(&format!("{}-{}", class, key)));
            utilities.insert(selector, json!({ property: value }));
        }
        let variants = api.variants(name, &[])?;
        api.add_utilities(&Value::Object(utilities), variants)
    })
}

fn selectors(rules: &[Rule]) -> Vec<String> {
    rules.iter().filter_map(|r| r.selector.clone()).collect()
}

fn all_selectors(sheet: &Stylesheet) -> Vec<String> {
    sheet.rules().filter_map(|r| r.selector.clone()).collect()
}

// ============================================================================
// Emission order
// ============================================================================

#[test]
fn components_precede_utilities_registered_earlier() {
    let plugin = Plugin::new("mixed", |api| {
        api.add_utilities(&json!({".u": {"color": "red"}}), ())?;
        api.add_components(&json!({".c": {"color": "blue"}}), ())?;
        api.add_base(&json!({"body": {"margin": "0"}}))
    });
    let sheet = compile(ConfigLayer::new(), [plugin]).unwrap();
    assert_eq!(all_selectors(&sheet), ["body", ".c", ".u"]);
}

#[test]
fn layer_order_holds_across_plugins() {
    let utilities = Plugin::new("utilities", |api| {
        api.add_utilities(&json!({".u": {"color": "red"}}), ())
    });
    let components = Plugin::new("components", |api| {
        api.add_components(&json!({".c": {"color": "red"}}), ())
    });
    let sheet = compile(ConfigLayer::new(), [utilities, components]).unwrap();
    assert_eq!(selectors(sheet.layer(Layer::Components)), [".c"]);
    assert_eq!(all_selectors(&sheet), [".c", ".u"]);
}

// ============================================================================
// Important and prefix
// ============================================================================

#[test]
fn important_flags_utilities_not_components() {
    let user = ConfigLayer::new().set("important", true).unwrap();
    let plugin = Plugin::new("x", |api| {
        api.add_utilities(&json!({".x": {"color": "red"}}), ())?;
        api.add_components(&json!({".x": {"color": "red"}}), ())
    });
    let sheet = compile(user, [plugin]).unwrap();
    assert!(sheet.layer(Layer::Utilities)[0].declarations[0].important);
    assert!(!sheet.layer(Layer::Components)[0].declarations[0].important);
}

#[test]
fn important_selector_and_prefix_combine() {
    let user = ConfigLayer::from_json(r##"{"prefix": "tw-", "important": "#app"}"##).unwrap();
    let plugin = Plugin::new("x", |api| {
        api.add_utilities(&json!({".mt-2": {"marginTop": "0.5rem"}}), ())
    });
    let sheet = compile(user, [plugin]).unwrap();
    assert_eq!(all_selectors(&sheet), ["#app .tw-mt-2"]);
}

#[test]
fn base_ignores_prefix() {
    let user = ConfigLayer::new().set("prefix", "tw-").unwrap();
    let plugin = Plugin::new("preflight", |api| {
        api.add_base(&json!({".container": {"width": "100%"}}))
    });
    let sheet = compile(user, [plugin]).unwrap();
    assert_eq!(all_selectors(&sheet), [".container"]);
}

#[test]
fn prefixed_variant_classes() {
    let user = ConfigLayer::new().set("prefix", "tw-").unwrap();
    let plugin = Plugin::new("text", |api| {
        api.add_utilities(&json!({".text-red": {"color": "red"}}), ["hover", "group-hover"])
    });
    let sheet = compile(user, [plugin]).unwrap();
    assert_eq!(
        all_selectors(&sheet),
        [
            ".tw-text-red",
            ".hover\\:tw-text-red:hover",
            ".tw-group:hover .group-hover\\:tw-text-red"
        ]
    );
}

// ============================================================================
// Configuration merge
// ============================================================================

#[test]
fn extend_merges_and_replace_shadows() {
    let base = json!({"a": 1, "b": 2});
    let top = json!({"b": 3, "c": 4});

    let plugin_defaults = ConfigLayer::new().set("theme.scale", base.clone()).unwrap();
    let read_scale = |defaults: ConfigLayer, user: ConfigLayer| {
        let plugin = Plugin::new("reader", |api| {
            let scale = api.theme_or("scale", json!({}))?;
            api.add_utilities(&json!({".probe": {"content": scale.to_string()}}), ())
        })
        .with_config(defaults);
        let sheet = compile(user, [plugin]).unwrap();
        let value = &sheet.layer(Layer::Utilities)[0].declarations[0].value;
        serde_json::from_str::<Value>(value).unwrap()
    };

    let extended = read_scale(
        plugin_defaults.clone(),
        ConfigLayer::new().extend("theme.scale", top.clone()).unwrap(),
    );
    assert_eq!(extended, json!({"a": 1, "b": 3, "c": 4}));

    let replaced = read_scale(
        plugin_defaults,
        ConfigLayer::new().set("theme.scale", top).unwrap(),
    );
    assert_eq!(replaced, json!({"b": 3, "c": 4}));
}

#[test]
fn plugin_defaults_merged_before_any_handler() {
    // The first plugin reads a key only the second plugin's defaults provide,
    // overridden by the user.
    let reader = Plugin::new("reader", |api| {
        let color = api.theme_or("forms.border", "missing")?;
        let color = color.as_str().unwrap_or("missing").to_string();
        api.add_components(&json!({".input": {"borderColor": color}}), ())
    });
    let provider = Plugin::new("provider", |_| Ok(())).with_config(
        ConfigLayer::new()
            .set("theme.forms", json!({"border": "#plugin", "ring": "#ring"}))
            .unwrap(),
    );
    let user = ConfigLayer::new()
        .extend("theme.forms", json!({"border": "#user"}))
        .unwrap();

    let sheet = compile(user, [reader, provider]).unwrap();
    assert_eq!(sheet.layer(Layer::Components)[0].declarations[0].value, "#user");
}

#[test]
fn computed_theme_follows_user_override() {
    let user = ConfigLayer::from_yaml(
        r##"
theme:
  colors:
    brand: "#ff6b35"
variants:
  borderColor: []
"##,
    )
    .unwrap();
    let sheet = compile(user, [scale_plugin("borderColor", "border", "borderColor")]).unwrap();
    assert_eq!(all_selectors(&sheet), [".border-brand", ".border-default"]);
    assert_eq!(sheet.layer(Layer::Utilities)[1].declarations[0].value, "currentColor");
}

#[test]
fn circular_computed_value_aborts_pass() {
    let plugin = Plugin::new("loop", |api| {
        api.theme("a")?;
        Ok(())
    })
    .with_config(
        ConfigLayer::new()
            .computed("theme.a", |theme| theme.theme_or("b", json!(null)))
            .unwrap()
            .computed("theme.b", |theme| theme.theme_or("a", json!(null)))
            .unwrap(),
    );
    let err = compile(ConfigLayer::new(), [plugin]).unwrap_err();
    assert_eq!(err.plugin(), Some("loop"));
    assert!(matches!(
        err.root(),
        CompileError::Configuration(ConfigurationError::CircularReference { .. })
    ));
}

// ============================================================================
// Variants
// ============================================================================

#[test]
fn custom_selector_variant_appends_pseudo_class() {
    let mut table = VariantTable::new();
    table.insert(
        "hover",
        VariantTransform::selector(|class| format!("{}:hover", class.fragment)),
    );
    let rule = Rule::new(".btn").declare("color", "red");
    let out = table.expand_rule(&rule, &["hover"], ":").unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].selector.as_deref(), Some(".btn:hover"));
    assert_eq!(out[0].declarations, rule.declarations);
}

#[test]
fn unknown_variant_fails_pass_and_names_plugin() {
    let plugin = Plugin::new("typo", |api| {
        api.add_utilities(&json!({".x": {"color": "red"}}), ["hover", "hocus"])
    });
    let err = compile(ConfigLayer::new(), [plugin]).unwrap_err();
    assert_eq!(err.plugin(), Some("typo"));
    assert!(matches!(
        err.root(),
        CompileError::Configuration(ConfigurationError::UnknownVariant { name }) if name == "hocus"
    ));
}

#[test]
fn unknown_variant_produces_no_rules() {
    let table = VariantTable::new();
    let result = table.expand_rule(&Rule::new(".x"), &["nope"], ":");
    assert!(result.is_err());
}

#[test]
fn custom_variant_from_later_plugin() {
    let uses = Plugin::new("uses", |api| {
        api.add_utilities(&json!({".x": {"color": "red"}}), ["print"])
    });
    let defines = Plugin::new("defines", |api| {
        api.add_variant(
            "print",
            VariantTransform::structural(|rules, cx| {
                cx.rename_classes(rules)
                    .into_iter()
                    .map(|rule| rule.wrap(AtCondition::media("print")))
                    .collect()
            }),
        );
        Ok(())
    });
    let sheet = compile(ConfigLayer::new(), [uses, defines]).unwrap();
    assert_eq!(all_selectors(&sheet), [".x", ".print\\:x"]);
    assert_eq!(sheet.layer(Layer::Utilities)[1].conditions[0].to_string(), "@media print");
}

#[test]
fn overriding_builtin_variant_last_wins() {
    let first = Plugin::new("first", |api| {
        api.add_variant("hover", VariantTransform::selector(|c| format!("{}.first", c.fragment)));
        Ok(())
    });
    let second = Plugin::new("second", |api| {
        api.add_variant("hover", VariantTransform::selector(|c| format!("{}.second", c.fragment)));
        api.add_utilities(&json!({".x": {"color": "red"}}), ["hover"])
    });
    let sheet = compile(ConfigLayer::new(), [first, second]).unwrap();
    assert_eq!(all_selectors(&sheet), [".x", ".x.second"]);
}

#[test]
fn responsive_uses_configured_screens_and_separator() {
    let user = ConfigLayer::from_json(
        r#"{
            "separator": "_",
            "theme": {"screens": {"tablet": "640px", "print": {"raw": "print"}}}
        }"#,
    )
    .unwrap();
    let plugin = Plugin::new("w", |api| {
        api.add_utilities(&json!({".w-1\\/2": {"width": "50%"}}), ["responsive"])
    });
    let sheet = compile(user, [plugin]).unwrap();
    let rules = sheet.layer(Layer::Utilities);
    assert_eq!(selectors(rules), [".w-1\\/2", ".tablet_w-1\\/2", ".print_w-1\\/2"]);
    assert_eq!(rules[1].conditions, [AtCondition::media("(min-width: 640px)")]);
    assert_eq!(rules[2].conditions, [AtCondition::media("print")]);
}

#[test]
fn responsive_rules_share_one_block_per_screen() {
    let plugins = [
        scale_plugin("opacity", "opacity", "opacity"),
        scale_plugin("padding", "p", "padding"),
    ];
    let sheet = compile(ConfigLayer::new(), plugins).unwrap();

    let rules = sheet.layer(Layer::Utilities);
    let first_media = rules.iter().position(|r| !r.conditions.is_empty()).unwrap();
    assert!(rules[first_media..].iter().all(|r| !r.conditions.is_empty()));
    assert!(rules[..first_media].iter().any(|r| r.selector.as_deref() == Some(".p-4")));

    let css = sheet.to_css();
    for query in ["(min-width: 640px)", "(min-width: 1280px)"] {
        assert_eq!(css.matches(&format!("@media {}", query)).count(), 1);
    }
    assert!(css.find(".sm\\:opacity-50").unwrap() < css.find(".sm\\:p-4").unwrap());
    assert!(css.find(".sm\\:p-4").unwrap() < css.find(".md\\:opacity-50").unwrap());
}

#[test]
fn variants_from_configuration() {
    let user = ConfigLayer::from_value(json!({
        "theme": {"opacity": {"50": "0.5"}},
        "variants": {"opacity": ["focus"]}
    }))
    .unwrap();
    let sheet = compile(user, [scale_plugin("opacity", "opacity", "opacity")]).unwrap();
    assert_eq!(all_selectors(&sheet), [".opacity-50", ".focus\\:opacity-50:focus"]);
}

// ============================================================================
// Plugins with options
// ============================================================================

#[test]
fn options_factory_with_and_without_options() {
    let factory = PluginWithOptions::new("container", |options| {
        let center = options
            .and_then(|o| o.get("center"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        Plugin::new("container", move |api| {
            let mut style = json!({"width": "100%"});
            if center {
                style["marginLeft"] = json!("auto");
                style["marginRight"] = json!("auto");
            }
            api.add_components(&json!({ ".container": style }), ())
        })
    });

    let plain = compile(ConfigLayer::new(), [factory.clone()]).unwrap();
    assert_eq!(plain.layer(Layer::Components)[0].declarations.len(), 1);

    let centered = Compiler::new(ConfigLayer::new())
        .plugin(factory.with_options(json!({"center": true})))
        .compile()
        .unwrap();
    assert_eq!(centered.layer(Layer::Components)[0].declarations.len(), 3);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn normalization_error_names_plugin_and_selector() {
    let plugin = Plugin::new("buttons", |api| {
        api.add_components(&json!({".btn": {"&:hover": {}}}), AddOptions::new())
    });
    let err = compile(ConfigLayer::new(), [plugin]).unwrap_err();
    assert_eq!(err.plugin(), Some("buttons"));
    assert!(matches!(
        err.root(),
        CompileError::Normalization(NormalizationError::EmptyBlock { selector })
            if selector == ".btn:hover"
    ));
    assert!(err.to_string().contains("buttons"));
}

#[test]
fn bad_configuration_text() {
    assert!(matches!(
        ConfigLayer::from_yaml("theme: [unclosed").unwrap_err(),
        CompileError::Parse { format: "YAML", .. }
    ));
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn renders_css_text() {
    let plugin = Plugin::new("fonts", |api| {
        api.add_base(&json!({
            "@font-face": {"fontFamily": "Inter", "src": "url(/inter.woff2)"}
        }))?;
        api.add_utilities(&json!({".font-sans": {"fontFamily": "Inter, sans-serif"}}), ["hover"])
    });
    let css = compile(ConfigLayer::new(), [plugin]).unwrap().to_css();
    assert_eq!(
        css,
        "@font-face {\n  font-family: Inter;\n  src: url(/inter.woff2);\n}\n\
         \n\
         .font-sans {\n  font-family: Inter, sans-serif;\n}\n\
         \n\
         .hover\\:font-sans:hover {\n  font-family: Inter, sans-serif;\n}\n"
    );
}

#[test]
fn serializes_to_json() {
    let plugin = Plugin::new("x", |api| {
        api.add_utilities(&json!({".x": {"color": "red !important"}}), ())
    });
    let sheet = compile(ConfigLayer::new(), [plugin]).unwrap();
    let value = serde_json::to_value(&sheet).unwrap();
    assert_eq!(
        value["utilities"][0],
        json!({
            "selector": ".x",
            "declarations": [{"property": "color", "value": "red", "important": true}]
        })
    );
}
