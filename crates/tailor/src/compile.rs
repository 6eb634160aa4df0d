//! The compilation pass.
//!
//! A pass runs in a fixed order:
//!
//! 1. every plugin entry is instantiated (factories get their options)
//! 2. system defaults, each plugin's default configuration (in plugin order)
//!    and the user configuration are merged into one [`Resolver`]
//! 3. settings, screens and the built-in variant table are read from it
//! 4. plugin handlers run in order, each with its own [`PluginApi`]
//! 5. the registry emits the stylesheet
//!
//! All configuration is merged before the first handler runs, so every
//! plugin sees the same, complete configuration.
//!
//! [`PluginApi`]: crate::PluginApi

use serde_json::json;
use tracing::debug;

use crate::config::{default_config, ConfigLayer, Resolver};
use crate::error::CompileError;
use crate::plugin::{instantiate, run_plugins, PluginEntry};
use crate::registry::{Settings, StyleRegistry};
use crate::style::Stylesheet;
use crate::variant::{builtin_variants, parse_screens};

/// Builder for a compilation pass.
///
/// ```rust
/// use tailor::{Compiler, ConfigLayer, Plugin};
/// use serde_json::json;
///
/// let user = ConfigLayer::new().set("prefix", "tw-")?;
/// let sheet = Compiler::new(user)
///     .plugin(Plugin::new("buttons", |api| {
///         api.add_components(&json!({".btn": {"padding": "0.5rem 1rem"}}), ())
///     }))
///     .compile()?;
///
/// assert_eq!(sheet.rules().next().and_then(|r| r.selector.as_deref()), Some(".tw-btn"));
/// # Ok::<(), tailor::CompileError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Compiler {
    user: ConfigLayer,
    plugins: Vec<PluginEntry>,
    defaults: bool,
}

impl Compiler {
    /// Starts a pass with the user's configuration.
    pub fn new(user: ConfigLayer) -> Self {
        Self {
            user,
            plugins: Vec::new(),
            defaults: true,
        }
    }

    /// Appends a plugin entry.
    pub fn plugin(mut self, entry: impl Into<PluginEntry>) -> Self {
        self.plugins.push(entry.into());
        self
    }

    /// Appends several plugin entries.
    pub fn plugins<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PluginEntry>,
    {
        self.plugins.extend(entries.into_iter().map(Into::into));
        self
    }

    /// Leaves out the system default configuration.
    ///
    /// Settings then fall back to an empty prefix, no importance and the `:`
    /// separator, and no screens are configured.
    pub fn without_defaults(mut self) -> Self {
        self.defaults = false;
        self
    }

    /// Runs the pass.
    ///
    /// # Errors
    ///
    /// The first error aborts the pass; no partial stylesheet is produced.
    pub fn compile(&self) -> Result<Stylesheet, CompileError> {
        let plugins = instantiate(&self.plugins);

        let system = if self.defaults {
            default_config()
        } else {
            ConfigLayer::new()
        };
        let layers = std::iter::once(&system)
            .chain(plugins.iter().filter_map(|plugin| plugin.config()))
            .chain(std::iter::once(&self.user));
        let resolver = Resolver::new(layers);

        let settings = Settings::from_resolver(&resolver)?;
        let screens = parse_screens(&resolver.theme_or("screens", json!({}))?)?;
        debug!(
            plugins = plugins.len(),
            screens = screens.len(),
            prefix = %settings.prefix,
            "compilation started"
        );

        let variants = builtin_variants(screens, &settings.prefix);
        let mut registry = StyleRegistry::new(settings, variants);
        run_plugins(&plugins, &resolver, &mut registry)?;

        registry.emit()
    }
}

/// Compiles `plugins` against `user` configuration in one call.
///
/// Shorthand for `Compiler::new(user).plugins(plugins).compile()`.
pub fn compile<I>(user: ConfigLayer, plugins: I) -> Result<Stylesheet, CompileError>
where
    I: IntoIterator,
    I::Item: Into<PluginEntry>,
{
    Compiler::new(user).plugins(plugins).compile()
}
