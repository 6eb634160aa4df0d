//! The capability bundle handed to plugin handlers.

use serde_json::Value;
use tailor_selector::{escape_class_name, prefix_selector};

use crate::config::Resolver;
use crate::error::{CompileError, ConfigurationError};
use crate::registry::{AddOptions, Layer, StyleRegistry};
use crate::variant::VariantTransform;

/// Everything a plugin can do during a compilation pass.
///
/// One `PluginApi` is built per plugin run. It reads from the fully merged
/// configuration and writes to the pass's registry; registrations made through
/// it are attributed to the plugin in error messages.
pub struct PluginApi<'a> {
    plugin: &'a str,
    resolver: &'a Resolver,
    registry: &'a mut StyleRegistry,
}

impl<'a> PluginApi<'a> {
    pub(crate) fn new(
        plugin: &'a str,
        resolver: &'a Resolver,
        registry: &'a mut StyleRegistry,
    ) -> Self {
        Self {
            plugin,
            resolver,
            registry,
        }
    }

    /// The name of the running plugin.
    pub fn plugin_name(&self) -> &str {
        self.plugin
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Adds utility styles. See [`StyleRegistry::add_utilities`].
    pub fn add_utilities(
        &mut self,
        styles: &Value,
        options: impl Into<AddOptions>,
    ) -> Result<(), CompileError> {
        self.add(Layer::Utilities, styles, options.into())
    }

    /// Adds component styles. See [`StyleRegistry::add_components`].
    pub fn add_components(
        &mut self,
        styles: &Value,
        options: impl Into<AddOptions>,
    ) -> Result<(), CompileError> {
        self.add(Layer::Components, styles, options.into())
    }

    /// Adds base styles. See [`StyleRegistry::add_base`].
    pub fn add_base(&mut self, styles: &Value) -> Result<(), CompileError> {
        self.add(Layer::Base, styles, AddOptions::default())
    }

    fn add(
        &mut self,
        layer: Layer,
        styles: &Value,
        options: AddOptions,
    ) -> Result<(), CompileError> {
        self.registry
            .register(layer, styles, options, Some(self.plugin))
            .map_err(|err| err.in_plugin(self.plugin))
    }

    /// Registers a variant, replacing any variant of the same name.
    pub fn add_variant(&mut self, name: impl Into<String>, transform: VariantTransform) {
        self.registry.add_variant(name, transform);
    }

    // =========================================================================
    // Selector helpers
    // =========================================================================

    /// Escapes a class name. See [`tailor_selector::escape_class_name`].
    pub fn e(&self, class_name: &str) -> String {
        escape_class_name(class_name)
    }

    /// Applies the configured prefix to every class in `selector`.
    pub fn prefix(&self, selector: &str) -> String {
        prefix_selector(selector, &self.registry.settings().prefix)
    }

    /// The configured separator between variant and class names.
    pub fn separator(&self) -> &str {
        &self.registry.settings().separator
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn theme(&self, path: &str) -> Result<Option<Value>, ConfigurationError> {
        self.resolver.theme(path)
    }

    pub fn theme_or(
        &self,
        path: &str,
        default: impl Into<Value>,
    ) -> Result<Value, ConfigurationError> {
        self.resolver.theme_or(path, default)
    }

    pub fn variants(
        &self,
        path: &str,
        default: &[&str],
    ) -> Result<Vec<String>, ConfigurationError> {
        self.resolver.variants(path, default)
    }

    pub fn config(&self, path: &str) -> Result<Option<Value>, ConfigurationError> {
        self.resolver.config(path)
    }

    pub fn config_or(
        &self,
        path: &str,
        default: impl Into<Value>,
    ) -> Result<Value, ConfigurationError> {
        self.resolver.config_or(path, default)
    }
}
