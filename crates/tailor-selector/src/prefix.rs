//! Class prefixing.

use crate::escape::escape_class_name;
use crate::scanner::rewrite_classes;

/// Inserts `prefix` at the front of every class reference in `selector`.
///
/// Element names, combinators, pseudo-classes and attribute selectors are left
/// alone. Negative classes keep their sign in front (`.-mt-2` becomes
/// `.-tw-mt-2`), and the composed name is escaped as a whole.
///
/// The operation is not idempotent: prefixing twice doubles the prefix.
///
/// ```rust
/// use tailor_selector::prefix_selector;
///
/// assert_eq!(prefix_selector(".btn:hover > span", "tw-"), ".tw-btn:hover > span");
/// assert_eq!(prefix_selector(".-mt-2", "tw-"), ".-tw-mt-2");
/// assert_eq!(prefix_selector(".w-1\\/2", "tw-"), ".tw-w-1\\/2");
/// ```
pub fn prefix_selector(selector: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return selector.to_string();
    }

    rewrite_classes(selector, |class| {
        let name = class.name();
        let prefixed = match name.strip_prefix('-') {
            Some(rest) if !rest.starts_with('-') => format!("-{}{}", prefix, rest),
            _ => format!("{}{}", prefix, name),
        };
        format!(".{}", escape_class_name(&prefixed))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_prefix_is_identity() {
        assert_eq!(prefix_selector(".a .b", ""), ".a .b");
    }

    #[test]
    fn test_every_class_prefixed() {
        assert_eq!(
            prefix_selector(".group:hover .group-hover\\:text-red", "tw-"),
            ".tw-group:hover .tw-group-hover\\:text-red"
        );
    }

    #[test]
    fn test_elements_and_attributes_untouched() {
        assert_eq!(
            prefix_selector("input[type=\"text\"].form-input::placeholder", "tw-"),
            "input[type=\"text\"].tw-form-input::placeholder"
        );
    }

    #[test]
    fn test_selector_list() {
        assert_eq!(prefix_selector(".a, .b", "x-"), ".x-a, .x-b");
    }

    #[test]
    fn test_negative_class_keeps_sign_first() {
        assert_eq!(prefix_selector(".-translate-x-1\\/2", "tw-"), ".-tw-translate-x-1\\/2");
    }

    #[test]
    fn test_leading_digit_class_loses_escape_once_prefixed() {
        assert_eq!(prefix_selector(".\\32 xl", "tw-"), ".tw-2xl");
    }

    #[test]
    fn test_not_idempotent() {
        let once = prefix_selector(".a", "tw-");
        let twice = prefix_selector(&once, "tw-");
        assert_eq!(once, ".tw-a");
        assert_eq!(twice, ".tw-tw-a");
    }
}
