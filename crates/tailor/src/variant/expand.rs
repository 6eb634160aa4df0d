//! The variant table and expansion.

use indexmap::IndexMap;
use tracing::{debug, trace};

use super::transform::{VariantContext, VariantTransform};
use crate::error::ConfigurationError;
use crate::style::Rule;

/// Registered variants by name, in registration order.
///
/// Registering a name twice replaces the earlier transform, which is how
/// built-ins are customized.
#[derive(Debug, Clone, Default)]
pub struct VariantTable {
    variants: IndexMap<String, VariantTransform>,
}

impl VariantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `transform` under `name`, returning the transform it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        transform: VariantTransform,
    ) -> Option<VariantTransform> {
        let name = name.into();
        let previous = self.variants.insert(name.clone(), transform);
        if previous.is_some() {
            debug!(variant = %name, "variant replaced");
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&VariantTransform> {
        self.variants.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variants.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Applies each named variant to `rules`, in the order given.
    ///
    /// The result holds only the derived rules, variant by variant. Every name
    /// is looked up before any transform runs, so an unknown name produces no
    /// output at all.
    ///
    /// ```rust
    /// use tailor::{Rule, VariantTable, VariantTransform};
    ///
    /// let mut table = VariantTable::new();
    /// table.insert("hover", VariantTransform::selector(|c| format!("{}:hover", c.fragment)));
    ///
    /// let rule = Rule::new(".x").declare("color", "red");
    /// let out = table.expand(&[rule], &["hover"], ":")?;
    /// assert_eq!(out[0].selector.as_deref(), Some(".x:hover"));
    ///
    /// assert!(table.expand(&out, &["hocus"], ":").is_err());
    /// # Ok::<(), tailor::ConfigurationError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownVariant`] naming the first name
    /// that is not registered.
    pub fn expand<S: AsRef<str>>(
        &self,
        rules: &[Rule],
        names: &[S],
        separator: &str,
    ) -> Result<Vec<Rule>, ConfigurationError> {
        let transforms = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.get(name)
                    .map(|transform| (name, transform))
                    .ok_or_else(|| ConfigurationError::UnknownVariant {
                        name: name.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut out = Vec::new();
        for (name, transform) in transforms {
            let cx = VariantContext { name, separator };
            let derived = transform.apply(rules, &cx);
            trace!(variant = name, rules = derived.len(), "variant applied");
            out.extend(derived);
        }
        Ok(out)
    }

    /// Applies each named variant to a single rule.
    pub fn expand_rule<S: AsRef<str>>(
        &self,
        rule: &Rule,
        names: &[S],
        separator: &str,
    ) -> Result<Vec<Rule>, ConfigurationError> {
        self.expand(std::slice::from_ref(rule), names, separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::AtCondition;

    fn table() -> VariantTable {
        let mut table = VariantTable::new();
        table.insert(
            "hover",
            VariantTransform::selector(|c| format!("{}:hover", c.variant_class())),
        );
        table.insert(
            "focus",
            VariantTransform::selector(|c| format!("{}:focus", c.variant_class())),
        );
        table.insert(
            "print",
            VariantTransform::structural(|rules, cx| {
                cx.rename_classes(rules)
                    .into_iter()
                    .map(|r| r.wrap(AtCondition::media("print")))
                    .collect()
            }),
        );
        table
    }

    fn selectors(rules: &[Rule]) -> Vec<String> {
        rules.iter().filter_map(|r| r.selector.clone()).collect()
    }

    #[test]
    fn test_caller_order() {
        let out = table()
            .expand_rule(&Rule::new(".a"), &["focus", "hover"], ":")
            .unwrap();
        assert_eq!(selectors(&out), [".focus\\:a:focus", ".hover\\:a:hover"]);
    }

    #[test]
    fn test_group_expanded_per_variant() {
        let rules = [Rule::new(".a"), Rule::new(".b")];
        let out = table().expand(&rules, &["hover", "focus"], ":").unwrap();
        assert_eq!(
            selectors(&out),
            [
                ".hover\\:a:hover",
                ".hover\\:b:hover",
                ".focus\\:a:focus",
                ".focus\\:b:focus"
            ]
        );
    }

    #[test]
    fn test_custom_separator() {
        let out = table().expand_rule(&Rule::new(".a"), &["hover"], "_").unwrap();
        assert_eq!(selectors(&out), [".hover_a:hover"]);
    }

    #[test]
    fn test_structural_wraps() {
        let out = table().expand_rule(&Rule::new(".a"), &["print"], ":").unwrap();
        assert_eq!(out[0].conditions, [AtCondition::media("print")]);
        assert_eq!(out[0].selector.as_deref(), Some(".print\\:a"));
    }

    #[test]
    fn test_unknown_variant_no_output() {
        let err = table()
            .expand_rule(&Rule::new(".a"), &["hover", "hocus"], ":")
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownVariant {
                name: "hocus".to_string()
            }
        );
    }

    #[test]
    fn test_empty_names() {
        let out = table().expand_rule(&Rule::new(".a"), &[] as &[&str], ":").unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut table = table();
        let previous = table.insert(
            "hover",
            VariantTransform::selector(|c| c.fragment.to_string()),
        );
        assert!(previous.is_some());
        assert_eq!(table.names().collect::<Vec<_>>(), ["hover", "focus", "print"]);
        let out = table.expand_rule(&Rule::new(".a"), &["hover"], ":").unwrap();
        assert_eq!(selectors(&out), [".a"]);
    }
}
