//! Property-based tests for selector escaping and prefixing.

use proptest::prelude::*;
use tailor_selector::{class_refs, escape_class_name, prefix_selector, unescape_identifier};

// ============================================================================
// Strategies
// ============================================================================

/// Identifier-safe class names: no escaping required.
fn safe_name() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_-]{0,24}"
}

/// Names the way utilities are actually spelled, punctuation included.
fn utility_name() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9:/.%\\[\\]()#,-]{0,24}"
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Identifier-safe names pass through the escaper unchanged.
    #[test]
    fn safe_names_are_untouched(name in safe_name()) {
        prop_assert_eq!(escape_class_name(&name), name);
    }

    /// A leading digit always gets an escape marker and reads back exactly.
    #[test]
    fn leading_digit_round_trips(digit in 0u8..10, rest in "[a-z0-9/:.-]{0,16}") {
        let name = format!("{}{}", digit, rest);
        let escaped = escape_class_name(&name);
        prop_assert!(escaped.starts_with('\\'));
        prop_assert_eq!(unescape_identifier(&escaped), Some(name));
    }

    /// Whatever the escaper produces reads back as the original name.
    #[test]
    fn escape_round_trips(name in utility_name()) {
        let escaped = escape_class_name(&name);
        prop_assert_eq!(unescape_identifier(&escaped), Some(name));
    }

    /// An escaped name is scanned as exactly one class reference.
    #[test]
    fn escaped_name_scans_as_one_class(name in utility_name()) {
        let selector = format!(".{}:hover > span", escape_class_name(&name));
        let refs = class_refs(&selector);
        prop_assert_eq!(refs.len(), 1);
        prop_assert_eq!(refs[0].name(), name);
    }

    /// Prefixing twice is observably different from prefixing once.
    #[test]
    fn prefix_is_not_idempotent(name in safe_name(), prefix in "[a-z]{1,4}-") {
        let selector = format!(".{} > a", name);
        let once = prefix_selector(&selector, &prefix);
        let twice = prefix_selector(&once, &prefix);
        prop_assert_ne!(once, twice);
    }

    /// Prefixing never touches text outside class references.
    #[test]
    fn prefix_keeps_element_selectors(tag in "[a-z]{1,8}", prefix in "[a-z]{1,4}-") {
        let selector = format!("{} > {}:hover", tag, tag);
        prop_assert_eq!(prefix_selector(&selector, &prefix), selector);
    }
}
