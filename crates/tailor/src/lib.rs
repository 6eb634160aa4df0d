//! # Tailor - Plugin-Driven Stylesheet Compilation
//!
//! `tailor` compiles utility-first stylesheets from plugins. Plugins describe
//! styles as nested JSON objects, read design tokens from a layered
//! configuration, and ask for state and breakpoint variants. The engine
//! normalizes, prefixes, escapes and orders everything into a deterministic
//! [`Stylesheet`].
//!
//! ## Quick Start
//!
//! ```rust
//! use tailor::{compile, ConfigLayer, Plugin};
//! use serde_json::{json, Map, Value};
//!
//! let padding = Plugin::new("padding", |api| {
//!     let scale = api.theme_or("padding", json!({}))?;
//!     let mut utilities = Map::new();
//!     for (key, value) in scale.as_object().into_iter().flatten() {
//!         let class = format!(".{}", api.e(&format!("p-{}", key)));
//!         utilities.insert(class, json!({"padding": value}));
//!     }
//!     let variants = api.variants("padding", &["responsive"])?;
//!     api.add_utilities(&Value::Object(utilities), variants)
//! });
//!
//! let user = ConfigLayer::from_yaml(r#"
//! theme:
//!   extend:
//!     spacing:
//!       "72": 18rem
//! "#)?;
//!
//! let css = compile(user, [padding])?.to_css();
//! assert!(css.contains(".p-72 {\n  padding: 18rem;\n}"));
//! assert!(css.contains("  .sm\\:p-72 {\n    padding: 18rem;\n  }"));
//! # Ok::<(), tailor::CompileError>(())
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module |
//! |-------|--------|
//! | Configuration layers, merge and lookup | [`config`] |
//! | Style objects to rules | [`style`] |
//! | Prefix and important policy, layers | [`registry`] |
//! | State and breakpoint variants | [`variant`] |
//! | Plugins and their capability bundle | [`plugin`] |
//! | Pass orchestration | [`Compiler`] |
//!
//! Selector escaping and prefixing live in the `tailor-selector` crate and are
//! re-exported here.
//!
//! ## Output Order
//!
//! Base styles come first, then components, then utilities, whatever order
//! plugins registered them in. Within a layer, registration order is kept,
//! and each registration's variant rules follow its own rules. Responsive
//! rules are the exception: they close their layer, grouped per breakpoint
//! in screen order, so every breakpoint overrides the plain utilities.
//!
//! ## Logging
//!
//! The engine logs through [`tracing`]: plugin runs and emission counts at
//! `debug`, individual registrations and computed values at `trace`. It never
//! installs a subscriber.

pub mod config;
mod compile;
mod error;
pub mod plugin;
pub mod registry;
pub mod style;
pub mod variant;

pub use compile::{compile, Compiler};
pub use config::{ConfigLayer, Resolver};
pub use error::{CompileError, ConfigurationError, NormalizationError, Result};
pub use plugin::{Plugin, PluginApi, PluginEntry, PluginHandler, PluginWithOptions};
pub use registry::{AddOptions, Important, Layer, Settings, StyleRegistry};
pub use style::{normalize, AtCondition, Declaration, Node, Rule, Stylesheet};
pub use variant::{ClassContext, VariantContext, VariantTable, VariantTransform};

pub use tailor_selector::{escape_class_name, prefix_selector, unescape_identifier};
