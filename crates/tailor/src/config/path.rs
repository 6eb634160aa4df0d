//! Configuration path parsing.
//!
//! Paths are dotted lookups with optional bracket segments for keys that
//! contain dots themselves:
//!
//! | Path | Segments |
//! |------|----------|
//! | `colors.red.500` | `colors`, `red`, `500` |
//! | `spacing[2.5]` | `spacing`, `2.5` |
//! | `fontFamily["sans serif"]` | `fontFamily`, `sans serif` |
//! | *(empty)* | *(root)* |

use crate::error::ConfigurationError;

/// Splits `path` into segments.
///
/// # Errors
///
/// Returns [`ConfigurationError::MalformedPath`] for empty segments
/// (`a..b`, `.a`, `a.`), unclosed brackets and empty brackets.
pub fn parse_path(path: &str) -> Result<Vec<String>, ConfigurationError> {
    let malformed = |reason: &str| ConfigurationError::MalformedPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let mut segments = Vec::new();
    if path.is_empty() {
        return Ok(segments);
    }

    let mut current = String::new();
    // Whether the previous segment was closed by a bracket, which lets a
    // segment follow without a dot (`a[b]c` is not allowed, `a[b].c` is).
    let mut after_bracket = false;
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if current.is_empty() && !after_bracket {
                    return Err(malformed("empty segment"));
                }
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                after_bracket = false;
                if chars.peek().is_none() {
                    return Err(malformed("empty segment"));
                }
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                let mut inner = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    inner.push(c);
                }
                if !closed {
                    return Err(malformed("unclosed bracket"));
                }
                let key = strip_quotes(inner.trim());
                if key.is_empty() {
                    return Err(malformed("empty bracket"));
                }
                segments.push(key.to_string());
                after_bracket = true;
            }
            ']' => return Err(malformed("unexpected ']'")),
            c => {
                if after_bracket {
                    return Err(malformed("expected '.' or '[' after ']'"));
                }
                current.push(c);
            }
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }
    Ok(segments)
}

/// Joins segments back into a dotted path for messages and logs.
pub fn display_path(segments: &[String]) -> String {
    segments.join(".")
}

fn strip_quotes(key: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = key.strip_prefix(quote).and_then(|k| k.strip_suffix(quote)) {
            return inner;
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(path: &str) -> Vec<String> {
        parse_path(path).unwrap()
    }

    #[test]
    fn test_empty_path_is_root() {
        assert!(segments("").is_empty());
    }

    #[test]
    fn test_dotted() {
        assert_eq!(segments("colors.red.500"), ["colors", "red", "500"]);
    }

    #[test]
    fn test_bracket_keeps_dots() {
        assert_eq!(segments("spacing[2.5]"), ["spacing", "2.5"]);
        assert_eq!(segments("spacing[2.5].x"), ["spacing", "2.5", "x"]);
    }

    #[test]
    fn test_quoted_bracket() {
        assert_eq!(segments("fontFamily[\"sans serif\"]"), ["fontFamily", "sans serif"]);
        assert_eq!(segments("a['b.c']"), ["a", "b.c"]);
    }

    #[test]
    fn test_leading_bracket() {
        assert_eq!(segments("[a.b]"), ["a.b"]);
    }

    #[test]
    fn test_malformed() {
        for path in ["a..b", ".a", "a.", "a[b", "a[]", "a]b", "a[b]c"] {
            assert!(
                matches!(parse_path(path), Err(ConfigurationError::MalformedPath { .. })),
                "{} should be malformed",
                path
            );
        }
    }
}
