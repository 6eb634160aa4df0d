//! Style rules: the normalized rule model, the object normalizer and the
//! emitted stylesheet.

mod normalize;
mod rule;
mod stylesheet;

pub use normalize::{normalize, property_name};
pub use rule::{AtCondition, Declaration, Rule};
pub use stylesheet::{Node, Stylesheet};
