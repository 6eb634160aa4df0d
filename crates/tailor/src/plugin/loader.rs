//! Plugin instantiation and execution.

use tracing::debug;

use super::{Plugin, PluginApi, PluginEntry};
use crate::config::Resolver;
use crate::error::CompileError;
use crate::registry::StyleRegistry;

/// Builds the plugin of every entry, in order.
pub(crate) fn instantiate(entries: &[PluginEntry]) -> Vec<Plugin> {
    entries
        .iter()
        .map(|entry| {
            let plugin = entry.instantiate();
            debug!(
                plugin = plugin.name(),
                has_config = plugin.config().is_some(),
                "plugin instantiated"
            );
            plugin
        })
        .collect()
}

/// Runs every plugin handler in order against the merged configuration.
///
/// The first failing plugin aborts the run; its error names the plugin.
pub(crate) fn run_plugins(
    plugins: &[Plugin],
    resolver: &Resolver,
    registry: &mut StyleRegistry,
) -> Result<(), CompileError> {
    for plugin in plugins {
        debug!(plugin = plugin.name(), "running plugin");
        let before = registry.registrations().len();

        let mut api = PluginApi::new(plugin.name(), resolver, registry);
        plugin.run(&mut api).map_err(|err| err.in_plugin(plugin.name()))?;

        debug!(
            plugin = plugin.name(),
            registrations = registry.registrations().len() - before,
            "plugin finished"
        );
    }
    Ok(())
}
