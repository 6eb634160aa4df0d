//! Variant transforms and the contexts they receive.

use std::fmt;
use std::rc::Rc;

use tailor_selector::{escape_class_name, rewrite_classes};

use crate::style::Rule;

/// Signature of a selector-only transform.
pub type SelectorFn = dyn Fn(&ClassContext<'_>) -> String;

/// Signature of a structural transform.
pub type StructuralFn = dyn Fn(Vec<Rule>, &VariantContext<'_>) -> Vec<Rule>;

/// What a selector-only transform knows about one class reference.
#[derive(Debug, Clone, Copy)]
pub struct ClassContext<'a> {
    /// The unescaped class name, e.g. `w-1/2`.
    pub class: &'a str,
    /// The class reference as it appears in the selector, e.g. `.w-1\/2`.
    pub fragment: &'a str,
    /// The variant being applied.
    pub variant: &'a str,
    /// The configured separator between variant and class names.
    pub separator: &'a str,
}

impl ClassContext<'_> {
    /// Returns the variant-qualified class reference, e.g. `.hover\:w-1\/2`.
    ///
    /// The composed name is escaped as a whole.
    pub fn variant_class(&self) -> String {
        qualified_class(self.variant, self.separator, self.class)
    }
}

/// What a structural transform knows about the variant being applied.
#[derive(Debug, Clone, Copy)]
pub struct VariantContext<'a> {
    /// The variant being applied.
    pub name: &'a str,
    /// The configured separator between variant and class names.
    pub separator: &'a str,
}

impl VariantContext<'_> {
    /// Rewrites the selector of every rule; selectorless rules are kept as is.
    pub fn modify_selectors<F>(&self, rules: Vec<Rule>, mut f: F) -> Vec<Rule>
    where
        F: FnMut(&str) -> String,
    {
        rules
            .into_iter()
            .map(|mut rule| {
                if let Some(selector) = rule.selector.take() {
                    rule.selector = Some(f(&selector));
                }
                rule
            })
            .collect()
    }

    /// Renames every class to `{variant}{separator}{class}`.
    pub fn rename_classes(&self, rules: Vec<Rule>) -> Vec<Rule> {
        self.rename_classes_as(rules, self.name)
    }

    /// Renames every class to `{label}{separator}{class}`.
    ///
    /// For variants whose class label is not their own name, such as one
    /// label per breakpoint.
    pub fn rename_classes_as(&self, rules: Vec<Rule>, label: &str) -> Vec<Rule> {
        self.modify_selectors(rules, |selector| {
            rewrite_classes(selector, |class| {
                qualified_class(label, self.separator, &class.name())
            })
        })
    }
}

fn qualified_class(label: &str, separator: &str, class: &str) -> String {
    format!(".{}", escape_class_name(&format!("{}{}{}", label, separator, class)))
}

/// How a variant derives rules from the rules it is applied to.
///
/// Built-in and custom variants share this representation.
#[derive(Clone)]
pub enum VariantTransform {
    /// Replaces every class reference of every rule; conditions and
    /// declarations are kept. Rules without a selector are not carried over.
    Selector(Rc<SelectorFn>),
    /// Receives the whole group of rules and returns the derived group.
    Structural(Rc<StructuralFn>),
}

impl VariantTransform {
    /// Creates a selector-only transform.
    ///
    /// ```rust
    /// use tailor::VariantTransform;
    ///
    /// // `.btn` becomes `.btn:hover`
    /// let hover = VariantTransform::selector(|class| format!("{}:hover", class.fragment));
    /// ```
    pub fn selector<F>(f: F) -> Self
    where
        F: Fn(&ClassContext<'_>) -> String + 'static,
    {
        VariantTransform::Selector(Rc::new(f))
    }

    /// Creates a structural transform.
    ///
    /// ```rust
    /// use tailor::{AtCondition, VariantTransform};
    ///
    /// let print = VariantTransform::structural(|rules, cx| {
    ///     cx.rename_classes(rules)
    ///         .into_iter()
    ///         .map(|rule| rule.wrap(AtCondition::media("print")))
    ///         .collect()
    /// });
    /// ```
    pub fn structural<F>(f: F) -> Self
    where
        F: Fn(Vec<Rule>, &VariantContext<'_>) -> Vec<Rule> + 'static,
    {
        VariantTransform::Structural(Rc::new(f))
    }

    /// Applies the transform to `rules`.
    pub fn apply(&self, rules: &[Rule], cx: &VariantContext<'_>) -> Vec<Rule> {
        match self {
            VariantTransform::Selector(f) => rules
                .iter()
                .filter_map(|rule| {
                    let selector = rule.selector.as_deref()?;
                    let rewritten = rewrite_classes(selector, |class| {
                        let name = class.name();
                        let fragment = class.fragment();
                        f(&ClassContext {
                            class: &name,
                            fragment: &fragment,
                            variant: cx.name,
                            separator: cx.separator,
                        })
                    });
                    Some(Rule {
                        conditions: rule.conditions.clone(),
                        selector: Some(rewritten),
                        declarations: rule.declarations.clone(),
                    })
                })
                .collect(),
            VariantTransform::Structural(f) => f(rules.to_vec(), cx),
        }
    }
}

impl fmt::Debug for VariantTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantTransform::Selector(_) => f.write_str("VariantTransform::Selector(<fn>)"),
            VariantTransform::Structural(_) => f.write_str("VariantTransform::Structural(<fn>)"),
        }
    }
}
