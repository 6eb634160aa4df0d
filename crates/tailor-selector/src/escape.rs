//! Identifier escaping on top of `cssparser`'s serializer.
//!
//! `cssparser` is the tokenizer the rest of the engine trusts to read selectors
//! back, so escaping goes through its serializer rather than a hand-written
//! table. Whatever [`escape_class_name`] produces, [`unescape_identifier`]
//! reads back as the original text.

use cssparser::{Parser, ParserInput, Token};

/// Escapes `name` so it can be used as a class selector fragment.
///
/// Identifier-safe names are returned unchanged. Otherwise:
///
/// - a leading digit (also right after a single leading `-`) is hex-escaped,
///   e.g. `1` becomes `\31 `
/// - characters outside `[A-Za-z0-9_-]` (and non-ASCII) are backslash-escaped,
///   e.g. `/` becomes `\/` and `:` becomes `\:`
/// - a lone `-` becomes `\-`
///
/// Only the *first* position gets the digit treatment, so callers must escape
/// a fully composed name (`hover:1/2`), never a fragment that concatenation
/// might later move to the front.
///
/// ```rust
/// use tailor_selector::escape_class_name;
///
/// assert_eq!(escape_class_name("w-1/2"), "w-1\\/2");
/// assert_eq!(escape_class_name("2xl"), "\\32 xl");
/// assert_eq!(escape_class_name("hover:bg-red"), "hover\\:bg-red");
/// ```
pub fn escape_class_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    // Writing into a String cannot fail.
    let _ = cssparser::serialize_identifier(name, &mut out);
    out
}

/// Reads an escaped identifier back to its value.
///
/// Returns `None` unless the whole of `text` tokenizes as exactly one
/// identifier.
///
/// ```rust
/// use tailor_selector::unescape_identifier;
///
/// assert_eq!(unescape_identifier("md\\:w-1\\/2").as_deref(), Some("md:w-1/2"));
/// assert_eq!(unescape_identifier("1abc"), None);
/// ```
pub fn unescape_identifier(text: &str) -> Option<String> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let start = parser.position();

    let value = match parser.next_including_whitespace_and_comments() {
        Ok(Token::Ident(name)) => String::from(&**name),
        _ => return None,
    };

    if parser.slice_from(start).len() != text.len() {
        return None;
    }
    Some(value)
}
