//! Quoting and escaping for directive arguments.

use std::fmt::Display;

/// Wrap a value in double quotes, escaping backslashes, quotes and
/// control characters the configuration parser understands.
pub fn quote(input: impl Display) -> String {
    let raw = input.to_string();
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Replace `$` with `${literal_dollar}`, a variable the http block
/// defines as a literal dollar sign.
pub fn escape_literal_dollar(input: &str) -> String {
    input.replace('$', "${literal_dollar}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote() {
        assert_eq!(quote("foo"), r#""foo""#);
        assert_eq!(quote("\"foo\""), r#""\"foo\"""#);
        assert_eq!(quote("foo\nbar"), r#""foo\nbar""#);
        assert_eq!(quote("a\\b"), r#""a\\b""#);
        assert_eq!(quote(10), r#""10""#);
    }

    #[test]
    fn test_escape_literal_dollar() {
        assert_eq!(escape_literal_dollar("/$"), "/${literal_dollar}");
        assert_eq!(
            escape_literal_dollar("/hello-$/world-$/"),
            "/hello-${literal_dollar}/world-${literal_dollar}/"
        );
        assert_eq!(escape_literal_dollar("/leave-me/unchanged"), "/leave-me/unchanged");
    }
}
