//! The style registry: layered rule storage and emission.
//!
//! Every rule a plugin adds goes through the same steps at registration time:
//!
//! 1. normalize the style object into [`Rule`]s
//! 2. prefix class references, once, if the layer respects the prefix
//! 3. apply the `important` setting, if the layer respects it
//!
//! Requested variants are recorded with the rules and expanded at
//! [`StyleRegistry::emit`], so variants registered by later plugins are
//! available to earlier registrations. Responsive output is gathered at the
//! end of each layer, grouped by breakpoint.
//!
//! # Layer Policy
//!
//! | Layer | Prefix | Important |
//! |-------|--------|-----------|
//! | base | no | no |
//! | components | yes | no |
//! | utilities | yes | yes |
//!
//! [`AddOptions`] overrides either column for a single call.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tailor_selector::{prefix_selector, split_selector_list};
use tracing::{debug, trace};

use crate::config::Resolver;
use crate::error::{CompileError, ConfigurationError};
use crate::style::{normalize, AtCondition, Rule, Stylesheet};
use crate::variant::{VariantTable, VariantTransform};

/// The variant whose output is grouped by breakpoint at the end of a layer.
const RESPONSIVE: &str = "responsive";

/// One of the three emission partitions, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Base,
    Components,
    Utilities,
}

impl Layer {
    /// All layers in emission order.
    pub const ALL: [Layer; 3] = [Layer::Base, Layer::Components, Layer::Utilities];

    fn index(self) -> usize {
        match self {
            Layer::Base => 0,
            Layer::Components => 1,
            Layer::Utilities => 2,
        }
    }

    fn respects_prefix(self) -> bool {
        !matches!(self, Layer::Base)
    }

    fn respects_important(self) -> bool {
        matches!(self, Layer::Utilities)
    }

    pub fn name(self) -> &'static str {
        match self {
            Layer::Base => "base",
            Layer::Components => "components",
            Layer::Utilities => "utilities",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the `important` setting applies to rules that respect it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Important {
    /// `important: false`
    #[default]
    Disabled,
    /// `important: true`: every declaration gets `!important`.
    Declarations,
    /// `important: "#app"`: every selector is scoped under `#app`.
    Selector(String),
}

static NOT_IMPORTANT: Important = Important::Disabled;

/// Settings read from the merged configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub prefix: String,
    pub important: Important,
    pub separator: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            important: Important::Disabled,
            separator: ":".to_string(),
        }
    }
}

impl Settings {
    /// Reads `prefix`, `important` and `separator`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidValue`] for values of the wrong
    /// type, or an empty separator.
    pub fn from_resolver(resolver: &Resolver) -> Result<Self, ConfigurationError> {
        let defaults = Settings::default();

        let prefix = match resolver.config("prefix")? {
            None => defaults.prefix,
            Some(Value::String(prefix)) => prefix,
            Some(_) => return Err(invalid("prefix", "a string")),
        };

        let important = match resolver.config("important")? {
            None | Some(Value::Bool(false)) => Important::Disabled,
            Some(Value::Bool(true)) => Important::Declarations,
            Some(Value::String(selector)) if selector.trim().is_empty() => Important::Disabled,
            Some(Value::String(selector)) => Important::Selector(selector.trim().to_string()),
            Some(_) => return Err(invalid("important", "a boolean or a selector")),
        };

        let separator = match resolver.config("separator")? {
            None => defaults.separator,
            Some(Value::String(separator)) if !separator.is_empty() => separator,
            Some(_) => return Err(invalid("separator", "a non-empty string")),
        };

        Ok(Self {
            prefix,
            important,
            separator,
        })
    }
}

fn invalid(path: &str, expected: &'static str) -> ConfigurationError {
    ConfigurationError::InvalidValue {
        path: path.to_string(),
        expected,
    }
}

/// Per-call overrides for [`StyleRegistry::add`].
///
/// A list of variant names converts into options that keep the layer policy:
///
/// ```rust
/// use tailor::AddOptions;
///
/// let options: AddOptions = ["responsive", "hover"].into();
/// assert_eq!(options.variants, ["responsive", "hover"]);
/// assert_eq!(options.respect_prefix, None);
///
/// let options = AddOptions::new().respect_important(false).variants(["focus"]);
/// assert_eq!(options.respect_important, Some(false));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddOptions {
    /// Overrides whether class references get the configured prefix.
    pub respect_prefix: Option<bool>,
    /// Overrides whether the `important` setting applies.
    pub respect_important: Option<bool>,
    /// Variants to expand the rules across, in order.
    pub variants: Vec<String>,
}

impl AddOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respect_prefix(mut self, respect: bool) -> Self {
        self.respect_prefix = Some(respect);
        self
    }

    pub fn respect_important(mut self, respect: bool) -> Self {
        self.respect_important = Some(respect);
        self
    }

    pub fn variants<I, S>(mut self, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variants = variants.into_iter().map(Into::into).collect();
        self
    }
}

impl From<()> for AddOptions {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl From<Vec<String>> for AddOptions {
    fn from(variants: Vec<String>) -> Self {
        Self::new().variants(variants)
    }
}

impl From<&[String]> for AddOptions {
    fn from(variants: &[String]) -> Self {
        Self::new().variants(variants.iter().cloned())
    }
}

impl From<Vec<&str>> for AddOptions {
    fn from(variants: Vec<&str>) -> Self {
        Self::new().variants(variants)
    }
}

impl From<&[&str]> for AddOptions {
    fn from(variants: &[&str]) -> Self {
        Self::new().variants(variants.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for AddOptions {
    fn from(variants: [&str; N]) -> Self {
        Self::new().variants(variants)
    }
}

/// Rules added by one call, with the variants they still need.
#[derive(Debug, Clone)]
pub struct Registration {
    pub layer: Layer,
    pub rules: Vec<Rule>,
    pub variants: Vec<String>,
    /// The plugin that made the call, if any.
    pub origin: Option<String>,
}

/// Append-only rule store for one compilation pass.
///
/// ```rust
/// use tailor::{Layer, Settings, StyleRegistry, VariantTable};
/// use serde_json::json;
///
/// let mut registry = StyleRegistry::new(Settings::default(), VariantTable::new());
/// registry.add_utilities(&json!({".p-4": {"padding": "1rem"}}), ())?;
/// registry.add_components(&json!({".btn": {"padding": "0.5rem"}}), ())?;
///
/// let sheet = registry.emit()?;
/// let selectors: Vec<_> = sheet.rules().filter_map(|r| r.selector.as_deref()).collect();
/// assert_eq!(selectors, [".btn", ".p-4"]);
/// # Ok::<(), tailor::CompileError>(())
/// ```
#[derive(Debug)]
pub struct StyleRegistry {
    settings: Settings,
    variants: VariantTable,
    registrations: Vec<Registration>,
}

impl StyleRegistry {
    pub fn new(settings: Settings, variants: VariantTable) -> Self {
        Self {
            settings,
            variants,
            registrations: Vec::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn variant_table(&self) -> &VariantTable {
        &self.variants
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    /// Adds base styles. Base rules ignore both prefix and important.
    pub fn add_base(&mut self, styles: &Value) -> Result<(), CompileError> {
        self.add(Layer::Base, styles, AddOptions::default())
    }

    /// Adds component styles.
    pub fn add_components(
        &mut self,
        styles: &Value,
        options: impl Into<AddOptions>,
    ) -> Result<(), CompileError> {
        self.add(Layer::Components, styles, options.into())
    }

    /// Adds utility styles.
    pub fn add_utilities(
        &mut self,
        styles: &Value,
        options: impl Into<AddOptions>,
    ) -> Result<(), CompileError> {
        self.add(Layer::Utilities, styles, options.into())
    }

    /// Adds styles to `layer`.
    pub fn add(
        &mut self,
        layer: Layer,
        styles: &Value,
        options: AddOptions,
    ) -> Result<(), CompileError> {
        self.register(layer, styles, options, None)
    }

    pub(crate) fn register(
        &mut self,
        layer: Layer,
        styles: &Value,
        options: AddOptions,
        origin: Option<&str>,
    ) -> Result<(), CompileError> {
        let rules = normalize(styles)?;
        let rules = self.apply_policy(rules, layer, &options);
        trace!(
            layer = %layer,
            rules = rules.len(),
            variants = options.variants.len(),
            "rules registered"
        );
        self.registrations.push(Registration {
            layer,
            rules,
            variants: options.variants,
            origin: origin.map(str::to_string),
        });
        Ok(())
    }

    /// Registers a variant; an existing variant of the same name is replaced.
    pub fn add_variant(&mut self, name: impl Into<String>, transform: VariantTransform) {
        self.variants.insert(name, transform);
    }

    fn apply_policy(&self, rules: Vec<Rule>, layer: Layer, options: &AddOptions) -> Vec<Rule> {
        let prefix = options
            .respect_prefix
            .unwrap_or_else(|| layer.respects_prefix())
            && !self.settings.prefix.is_empty();
        let important = if options
            .respect_important
            .unwrap_or_else(|| layer.respects_important())
        {
            &self.settings.important
        } else {
            &NOT_IMPORTANT
        };

        rules
            .into_iter()
            .map(|mut rule| {
                let scoped = rule.conditions.iter().all(|c| c.is_conditional_group());
                if let Some(selector) = rule.selector.as_mut().filter(|_| scoped) {
                    if prefix {
                        *selector = prefix_selector(selector, &self.settings.prefix);
                    }
                    if let Important::Selector(scope) = important {
                        *selector = split_selector_list(selector)
                            .iter()
                            .map(|part| format!("{} {}", scope, part))
                            .collect::<Vec<_>>()
                            .join(", ");
                    }
                }
                if *important == Important::Declarations {
                    for decl in &mut rule.declarations {
                        decl.important = true;
                    }
                }
                rule
            })
            .collect()
    }

    /// Expands variants and assembles the stylesheet.
    ///
    /// Each registration contributes its own rules followed by the rules of
    /// each requested variant. Responsive rules are held back and appended at
    /// the end of their layer, one group per breakpoint in screen order, so a
    /// breakpoint overrides every unconditioned utility of the layer. Layers
    /// are concatenated base, components, utilities.
    ///
    /// # Errors
    ///
    /// An unknown variant name fails the whole emission, attributed to the
    /// plugin that requested it.
    pub fn emit(&self) -> Result<Stylesheet, CompileError> {
        let mut layers: [Vec<Rule>; 3] = Default::default();
        let mut responsive: [IndexMap<Option<AtCondition>, Vec<Rule>>; 3] = Default::default();

        for registration in &self.registrations {
            let expand = |names: &[&String]| {
                self.variants
                    .expand(&registration.rules, names, &self.settings.separator)
                    .map_err(|err| {
                        let err = CompileError::from(err);
                        match &registration.origin {
                            Some(plugin) => err.in_plugin(plugin),
                            None => err,
                        }
                    })
            };
            let (hoisted, inline): (Vec<_>, Vec<_>) = registration
                .variants
                .iter()
                .partition(|name| name.as_str() == RESPONSIVE);
            let derived = expand(&inline)?;

            let index = registration.layer.index();
            let target = &mut layers[index];
            target.extend(registration.rules.iter().cloned());
            target.extend(derived);

            for rule in expand(&hoisted)? {
                let screen = rule.conditions.first().cloned();
                responsive[index].entry(screen).or_default().push(rule);
            }
        }

        for (target, groups) in layers.iter_mut().zip(responsive) {
            for (screen, rules) in groups {
                trace!(?screen, rules = rules.len(), "responsive group");
                target.extend(rules);
            }
        }

        let [base, components, utilities] = layers;
        debug!(
            base = base.len(),
            components = components.len(),
            utilities = utilities.len(),
            "stylesheet emitted"
        );
        Ok(Stylesheet::new(base, components, utilities))
    }
}
