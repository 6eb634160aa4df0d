//! Plugins and the capability bundle they receive.
//!
//! A plugin is a name, a handler and an optional default configuration layer.
//! The handler receives a [`PluginApi`] bound to the fully merged
//! configuration of the pass and the pass's style registry:
//!
//! ```rust
//! use tailor::{ConfigLayer, Plugin};
//! use serde_json::{json, Map, Value};
//!
//! let opacity = Plugin::new("opacity", |api| {
//!     let scale = api.theme_or("opacity", json!({}))?;
//!     let mut utilities = Map::new();
//!     for (key, value) in scale.as_object().into_iter().flatten() {
//!         let class = format!(".{}", api.e(&format!("opacity-{}", key)));
//!         utilities.insert(class, json!({"opacity": value}));
//!     }
//!     let variants = api.variants("opacity", &["responsive"])?;
//!     api.add_utilities(&Value::Object(utilities), variants)?;
//!     Ok(())
//! })
//! .with_config(ConfigLayer::new().set("theme.opacity", json!({"50": "0.5"}))?);
//! # Ok::<(), tailor::CompileError>(())
//! ```
//!
//! # Handler Forms
//!
//! Any closure `Fn(&mut PluginApi) -> Result<(), CompileError>` is a
//! [`PluginHandler`]. Types that carry their own state can implement the
//! trait directly.
//!
//! Plugins that take user options are written as a [`PluginWithOptions`]
//! factory, called once per pass with the options (or `None`).

mod api;
mod loader;

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::config::ConfigLayer;
use crate::error::CompileError;

pub use api::PluginApi;
pub(crate) use loader::{instantiate, run_plugins};

/// The body of a plugin.
pub trait PluginHandler {
    /// Registers the plugin's styles and variants.
    fn run(&self, api: &mut PluginApi<'_>) -> Result<(), CompileError>;
}

impl<F> PluginHandler for F
where
    F: Fn(&mut PluginApi<'_>) -> Result<(), CompileError>,
{
    fn run(&self, api: &mut PluginApi<'_>) -> Result<(), CompileError> {
        (self)(api)
    }
}

/// A named plugin.
#[derive(Clone)]
pub struct Plugin {
    name: String,
    handler: Rc<dyn PluginHandler>,
    config: Option<ConfigLayer>,
}

impl Plugin {
    /// Creates a plugin from a handler closure.
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut PluginApi<'_>) -> Result<(), CompileError> + 'static,
    {
        Self::from_handler(name, handler)
    }

    /// Creates a plugin from any [`PluginHandler`].
    pub fn from_handler<H>(name: impl Into<String>, handler: H) -> Self
    where
        H: PluginHandler + 'static,
    {
        Self {
            name: name.into(),
            handler: Rc::new(handler),
            config: None,
        }
    }

    /// Attaches the plugin's default configuration.
    ///
    /// The layer is merged above the system defaults and below the user
    /// configuration before any plugin runs.
    pub fn with_config(mut self, config: ConfigLayer) -> Self {
        self.config = Some(config);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> Option<&ConfigLayer> {
        self.config.as_ref()
    }

    pub(crate) fn run(&self, api: &mut PluginApi<'_>) -> Result<(), CompileError> {
        self.handler.run(api)
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Signature of a plugin factory.
pub type PluginFactory = dyn Fn(Option<&Value>) -> Plugin;

/// A plugin parameterized by user options.
///
/// ```rust
/// use tailor::{PluginEntry, PluginWithOptions, Plugin};
/// use serde_json::json;
///
/// let forms = PluginWithOptions::new("forms", |options| {
///     let strategy = options
///         .and_then(|o| o.get("strategy"))
///         .and_then(|s| s.as_str())
///         .unwrap_or("base")
///         .to_string();
///     Plugin::new("forms", move |api| {
///         if strategy == "class" {
///             api.add_components(&json!({".form-input": {"borderWidth": "1px"}}), ())?;
///         } else {
///             api.add_base(&json!({"input": {"borderWidth": "1px"}}))?;
///         }
///         Ok(())
///     })
/// });
///
/// let entry = forms.with_options(json!({"strategy": "class"}));
/// assert!(matches!(entry, PluginEntry::Factory { .. }));
/// ```
#[derive(Clone)]
pub struct PluginWithOptions {
    name: String,
    factory: Rc<PluginFactory>,
}

impl PluginWithOptions {
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(Option<&Value>) -> Plugin + 'static,
    {
        Self {
            name: name.into(),
            factory: Rc::new(factory),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Builds the plugin with `options`, or with its own defaults for `None`.
    pub fn build(&self, options: Option<&Value>) -> Plugin {
        (self.factory)(options)
    }

    /// Pairs the factory with user options.
    pub fn with_options(self, options: Value) -> PluginEntry {
        PluginEntry::Factory {
            factory: self,
            options: Some(options),
        }
    }
}

impl fmt::Debug for PluginWithOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginWithOptions")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// An entry in the plugin list of a pass.
#[derive(Debug, Clone)]
pub enum PluginEntry {
    /// A ready plugin.
    Plugin(Plugin),
    /// A factory and the options to build it with.
    Factory {
        factory: PluginWithOptions,
        options: Option<Value>,
    },
}

impl PluginEntry {
    /// Returns the plugin this entry stands for, building it if needed.
    pub fn instantiate(&self) -> Plugin {
        match self {
            PluginEntry::Plugin(plugin) => plugin.clone(),
            PluginEntry::Factory { factory, options } => factory.build(options.as_ref()),
        }
    }
}

impl From<Plugin> for PluginEntry {
    fn from(plugin: Plugin) -> Self {
        PluginEntry::Plugin(plugin)
    }
}

impl From<PluginWithOptions> for PluginEntry {
    /// A factory without options builds with its own defaults.
    fn from(factory: PluginWithOptions) -> Self {
        PluginEntry::Factory {
            factory,
            options: None,
        }
    }
}
