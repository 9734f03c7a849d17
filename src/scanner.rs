//! Quote-aware scanning primitives.
//!
//! `.reg` string literals escape `"` and `\` with a backslash. Whether a
//! literal is still open at some point of a line is decided by counting the
//! quotes that are not part of such an escape.

/// Returns true if `text` contains an odd number of unescaped `"`.
///
/// Escapes are recognized left to right: a `\` followed by `\` or `"`
/// consumes both characters, so `\\\"` is an escaped backslash followed by
/// an escaped quote. Any other backslash is skipped on its own.
pub fn has_odd_quotes(text: &str) -> bool {
    let mut odd = false;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                // Peek without losing the character when it is not an escape target.
                let rest = chars.as_str();
                if rest.starts_with('\\') || rest.starts_with('"') {
                    chars.next();
                }
            }
            '"' => odd = !odd,
            _ => {}
        }
    }

    odd
}

/// Finds the byte index of the first `sep` that sits outside any quoted literal.
///
/// Each candidate is checked by counting unescaped quotes in the text before
/// it. Returns `None` when every occurrence is inside a literal, or there is
/// none at all.
pub fn find_unescaped(text: &str, sep: char) -> Option<usize> {
    text.match_indices(sep)
        .map(|(index, _)| index)
        .find(|&index| !has_odd_quotes(&text[..index]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_quotes() {
        assert!(!has_odd_quotes(""));
        assert!(has_odd_quotes("\"abc"));
        assert!(!has_odd_quotes("\"abc\""));
        assert!(has_odd_quotes("\"a\"=\"b"));
    }

    #[test]
    fn test_escaped_quotes_ignored() {
        assert!(!has_odd_quotes(r#""a\"b""#));
        assert!(has_odd_quotes(r#""a\"b"#));
        assert!(has_odd_quotes(r#"tail\"""#));
    }

    #[test]
    fn test_escaped_backslash_before_quote() {
        // \\ is consumed first, so the quote that follows is bare.
        assert!(has_odd_quotes(r#"C:\\""#));
        // \\\" is one escaped backslash then one escaped quote.
        assert!(!has_odd_quotes(r#"\\\""#));
    }

    #[test]
    fn test_find_separator_outside_literal() {
        assert_eq!(find_unescaped(r#""Name"="Value""#, '='), Some(6));
        assert_eq!(find_unescaped(r#""a=b"="c""#, '='), Some(5));
        assert_eq!(find_unescaped(r#""a\"=b"=dword:1"#, '='), Some(7));
        assert_eq!(find_unescaped(r#""a=b"#, '='), None);
        assert_eq!(find_unescaped("no separator", '='), None);
    }
}
