//! Layered configuration and theme resolution.
//!
//! Configuration is a tree of JSON values built once per compilation pass by
//! stacking [`ConfigLayer`]s: system defaults first, then every plugin's
//! default configuration, then the user's configuration on top.
//!
//! # Merge Policy
//!
//! By default an upper layer *replaces* the lower value at each replacement
//! unit:
//!
//! - every child of the `theme` and `variants` sections (`theme.colors`,
//!   `variants.padding`, ...)
//! - every other top-level key (`prefix`, `important`, plugin-owned keys)
//!
//! Paths marked with [`ConfigLayer::extend`] are deep-merged instead: objects
//! are unioned recursively, the upper layer winning on conflicts. The marks
//! live in a side table on the layer, not in the values. In configuration
//! text, `theme.extend.<key>` and `variants.extend.<key>` are shorthand for
//! those marks:
//!
//! ```yaml
//! theme:
//!   colors:            # replaces the default palette
//!     brand: "#ff6b35"
//!   extend:
//!     spacing:         # adds to the default spacing scale
//!       "72": 18rem
//! ```
//!
//! # Computed Values
//!
//! A leaf can be a closure of the [`Resolver`], for values defined in terms of
//! other theme paths. It runs against the fully merged configuration and its
//! result is cached for the rest of the pass.
//!
//! ```rust
//! use tailor::config::{ConfigLayer, Resolver};
//! use serde_json::json;
//!
//! let layer = ConfigLayer::new()
//!     .set("theme.colors", json!({"red": "#f00", "blue": "#00f"}))?
//!     .computed("theme.textColor", |theme| theme.theme_or("colors", json!({})))?;
//!
//! let resolver = Resolver::new([&layer]);
//! assert_eq!(resolver.theme("textColor.red")?, Some(json!("#f00")));
//! # Ok::<(), tailor::ConfigurationError>(())
//! ```

mod defaults;
mod layer;
mod merge;
mod path;
mod resolver;

pub use defaults::default_config;
pub use layer::{ComputedValue, ConfigLayer};
pub use merge::deep_merge;
pub use path::parse_path;
pub use resolver::Resolver;

pub(crate) use path::display_path;
