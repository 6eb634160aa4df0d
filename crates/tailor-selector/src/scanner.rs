//! Light selector scanner.
//!
//! The scanner walks selector text looking for class references. It knows
//! just enough of the selector syntax to avoid false positives:
//!
//! - backslash escapes are skipped as a unit (`\.` is part of a name, and a
//!   hex escape such as `\31 ` owns its terminating space)
//! - quoted strings are skipped
//! - attribute selectors (`[href$=".pdf"]`) are skipped
//!
//! Everything else passes through untouched, which is what lets callers
//! rewrite class references without disturbing element names, combinators or
//! pseudo-classes.

use std::ops::Range;

use crate::escape::unescape_identifier;

/// A class reference found in a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRef<'a> {
    /// Byte range of the reference in the selector, including the leading `.`.
    pub span: Range<usize>,
    /// The escaped identifier text, without the leading `.`.
    pub escaped: &'a str,
}

impl<'a> ClassRef<'a> {
    /// Returns the selector fragment, e.g. `.w-1\/2`.
    pub fn fragment(&self) -> String {
        format!(".{}", self.escaped)
    }

    /// Returns the unescaped class name, e.g. `w-1/2`.
    ///
    /// Falls back to the escaped text if it does not read back as a single
    /// identifier.
    pub fn name(&self) -> String {
        unescape_identifier(self.escaped).unwrap_or_else(|| self.escaped.to_string())
    }
}

/// Iterator over the class references of a selector.
///
/// ```rust
/// use tailor_selector::ClassScanner;
///
/// let names: Vec<String> = ClassScanner::new(".a > .b\\:c:not(.d)")
///     .map(|class| class.name())
///     .collect();
/// assert_eq!(names, ["a", "b:c", "d"]);
/// ```
pub struct ClassScanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> ClassScanner<'a> {
    /// Creates a scanner over `input`.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self, at: usize) -> Option<char> {
        self.input.get(at..).and_then(|rest| rest.chars().next())
    }

    /// Returns the position after the escape starting at `at` (a backslash).
    fn skip_escape(&self, at: usize) -> usize {
        let mut pos = at + 1;
        let Some(first) = self.peek(pos) else {
            return pos;
        };

        if !first.is_ascii_hexdigit() {
            return pos + first.len_utf8();
        }

        let mut digits = 0;
        while digits < 6 {
            match self.peek(pos) {
                Some(c) if c.is_ascii_hexdigit() => {
                    pos += 1;
                    digits += 1;
                }
                _ => break,
            }
        }
        if let Some(c) = self.peek(pos) {
            if c == ' ' || c == '\t' || c == '\n' {
                pos += 1;
            }
        }
        pos
    }

    /// Returns the position after the quoted string starting at `at`.
    fn skip_string(&self, at: usize, quote: char) -> usize {
        let mut pos = at + 1;
        while let Some(c) = self.peek(pos) {
            match c {
                '\\' => pos = self.skip_escape(pos),
                c if c == quote => return pos + 1,
                c => pos += c.len_utf8(),
            }
        }
        pos
    }

    /// Returns the position after the attribute selector starting at `at`.
    fn skip_attribute(&self, at: usize) -> usize {
        let mut pos = at + 1;
        while let Some(c) = self.peek(pos) {
            match c {
                '\\' => pos = self.skip_escape(pos),
                '"' | '\'' => pos = self.skip_string(pos, c),
                ']' => return pos + 1,
                c => pos += c.len_utf8(),
            }
        }
        pos
    }

    fn is_name_start(&self, at: usize) -> bool {
        match self.peek(at) {
            Some('\\') => self.peek(at + 1).is_some(),
            Some('-') => match self.peek(at + 1) {
                Some(c) => is_name_char(c) && !c.is_ascii_digit() || c == '\\',
                None => false,
            },
            Some(c) => c.is_ascii_alphabetic() || c == '_' || !c.is_ascii(),
            None => false,
        }
    }

    /// Returns the position after the identifier starting at `at`.
    fn read_name(&self, at: usize) -> usize {
        let mut pos = at;
        while let Some(c) = self.peek(pos) {
            if c == '\\' {
                if self.peek(pos + 1).is_none() {
                    break;
                }
                pos = self.skip_escape(pos);
            } else if is_name_char(c) {
                pos += c.len_utf8();
            } else {
                break;
            }
        }
        pos
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

impl<'a> Iterator for ClassScanner<'a> {
    type Item = ClassRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(c) = self.peek(self.pos) {
            match c {
                '\\' => self.pos = self.skip_escape(self.pos),
                '"' | '\'' => self.pos = self.skip_string(self.pos, c),
                '[' => self.pos = self.skip_attribute(self.pos),
                '.' if self.is_name_start(self.pos + 1) => {
                    let start = self.pos;
                    let end = self.read_name(start + 1);
                    self.pos = end;
                    return Some(ClassRef {
                        span: start..end,
                        escaped: &self.input[start + 1..end],
                    });
                }
                c => self.pos += c.len_utf8(),
            }
        }
        None
    }
}

/// Collects every class reference in `selector`, in order.
pub fn class_refs(selector: &str) -> Vec<ClassRef<'_>> {
    ClassScanner::new(selector).collect()
}

/// Replaces every class reference in `selector` with the output of `f`.
///
/// The replacement must include its own leading `.` if it is meant to stay a
/// class reference.
///
/// ```rust
/// use tailor_selector::rewrite_classes;
///
/// let out = rewrite_classes(".a:hover > .b", |class| format!("{}-x", class.fragment()));
/// assert_eq!(out, ".a-x:hover > .b-x");
/// ```
pub fn rewrite_classes<F>(selector: &str, mut f: F) -> String
where
    F: FnMut(&ClassRef<'_>) -> String,
{
    let mut out = String::with_capacity(selector.len() + 16);
    let mut last = 0;
    for class in ClassScanner::new(selector) {
        out.push_str(&selector[last..class.span.start]);
        out.push_str(&f(&class));
        last = class.span.end;
    }
    out.push_str(&selector[last..]);
    out
}

/// Splits a selector list on its top-level commas.
///
/// Commas inside parentheses, attribute selectors, strings or escapes do not
/// split. Each part is trimmed; empty parts are dropped.
///
/// ```rust
/// use tailor_selector::split_selector_list;
///
/// assert_eq!(
///     split_selector_list(".a, .b:is(.c, .d), [x=\",\"]"),
///     [".a", ".b:is(.c, .d)", "[x=\",\"]"]
/// );
/// ```
pub fn split_selector_list(selector: &str) -> Vec<String> {
    let scanner = ClassScanner::new(selector);
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut pos = 0;

    while let Some(c) = scanner.peek(pos) {
        match c {
            '\\' => {
                pos = scanner.skip_escape(pos);
                continue;
            }
            '"' | '\'' => {
                pos = scanner.skip_string(pos, c);
                continue;
            }
            '[' => {
                pos = scanner.skip_attribute(pos);
                continue;
            }
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(selector[start..pos].trim().to_string());
                start = pos + 1;
            }
            _ => {}
        }
        pos += c.len_utf8();
    }
    parts.push(selector[start..].trim().to_string());
    parts.retain(|part| !part.is_empty());
    parts
}

/// Substitutes every unescaped `&` in `selector` with `parent`.
///
/// Returns `None` when `selector` has no nesting reference, so callers can
/// fall back to joining the selectors themselves.
///
/// ```rust
/// use tailor_selector::replace_nesting;
///
/// assert_eq!(replace_nesting("&:hover", ".btn").as_deref(), Some(".btn:hover"));
/// assert_eq!(replace_nesting(".a\\&b", ".btn"), None);
/// ```
pub fn replace_nesting(selector: &str, parent: &str) -> Option<String> {
    let scanner = ClassScanner::new(selector);
    let mut out = String::with_capacity(selector.len() + parent.len());
    let mut found = false;
    let mut last = 0;
    let mut pos = 0;

    while let Some(c) = scanner.peek(pos) {
        let next = match c {
            '\\' => scanner.skip_escape(pos),
            '"' | '\'' => scanner.skip_string(pos, c),
            '[' => scanner.skip_attribute(pos),
            '&' => {
                out.push_str(&selector[last..pos]);
                out.push_str(parent);
                found = true;
                last = pos + 1;
                pos + 1
            }
            c => pos + c.len_utf8(),
        };
        pos = next;
    }

    if !found {
        return None;
    }
    out.push_str(&selector[last..]);
    Some(out)
}
