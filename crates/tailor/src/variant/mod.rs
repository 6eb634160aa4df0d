//! Variants: named transforms that derive state and breakpoint rules.
//!
//! A variant is a name plus a [`VariantTransform`]. Selector transforms
//! rewrite class references one at a time; structural transforms receive the
//! whole group of rules and may rename classes, wrap the group in at-rules or
//! change declarations.
//!
//! ```rust
//! use tailor::{Rule, VariantTable, VariantTransform};
//!
//! let mut table = VariantTable::new();
//! table.insert("hover", VariantTransform::selector(|c| format!("{}:hover", c.variant_class())));
//!
//! let rules = table.expand(&[Rule::new(".bg-red").declare("color", "red")], &["hover"], ":")?;
//! assert_eq!(rules[0].selector.as_deref(), Some(".hover\\:bg-red:hover"));
//! # Ok::<(), tailor::ConfigurationError>(())
//! ```
//!
//! Each compilation pass starts from [`builtin_variants`] and lets plugins add
//! to or override it.

mod builtin;
mod expand;
mod transform;

pub use builtin::{builtin_variants, parse_screens, Screen};
pub use expand::VariantTable;
pub use transform::{
    ClassContext, SelectorFn, StructuralFn, VariantContext, VariantTransform,
};
