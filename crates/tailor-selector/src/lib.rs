//! Class selector escaping, prefixing and scanning.
//!
//! This crate holds the selector-level text transformations used by the
//! `tailor` stylesheet engine. It works on selector *text* without building a
//! full selector grammar: a light scanner keyed on the `.` class marker is
//! enough to tell class references apart from everything else.
//!
//! # Example
//!
//! ```rust
//! use tailor_selector::{escape_class_name, prefix_selector, unescape_identifier};
//!
//! // Leading digits and reserved punctuation are escaped
//! let escaped = escape_class_name("1/2");
//! assert_eq!(escaped, "\\31 \\/2");
//! assert_eq!(unescape_identifier(&escaped).as_deref(), Some("1/2"));
//!
//! // Only class references receive the prefix
//! assert_eq!(
//!     prefix_selector("ul > .item:hover [data-x=\".y\"]", "tw-"),
//!     "ul > .tw-item:hover [data-x=\".y\"]"
//! );
//! ```
//!
//! # Class Reference Syntax
//!
//! A class reference is a `.` immediately followed by an identifier start:
//! a letter, `_`, `-`, a backslash escape or any non-ASCII character.
//! Escapes follow CSS rules, so `\31 23` (hex escape plus its terminating
//! space) and `\/` both stay inside the identifier.

mod escape;
mod prefix;
mod scanner;

pub use escape::{escape_class_name, unescape_identifier};
pub use prefix::prefix_selector;
pub use scanner::{
    class_refs, replace_nesting, rewrite_classes, split_selector_list, ClassRef, ClassScanner,
};
