//! Byte size validation.
//!
//! Sizes accept an optional `k`/`m` suffix; offsets additionally accept `g`.
//! See <http://nginx.org/en/docs/syntax.html>.

use std::sync::OnceLock;

use regex::Regex;

static SIZE_REGEX: OnceLock<Regex> = OnceLock::new();
static OFFSET_REGEX: OnceLock<Regex> = OnceLock::new();

fn size_regex() -> &'static Regex {
    SIZE_REGEX.get_or_init(|| Regex::new(r"^[0-9]+[kKmM]?$").expect("size regex is valid"))
}

fn offset_regex() -> &'static Regex {
    OFFSET_REGEX
        .get_or_init(|| Regex::new(r"^[0-9]+[kKmMgG]?$").expect("offset regex is valid"))
}

/// Check that `input` is a byte size the target process accepts.
///
/// Surrounding whitespace is ignored. An empty value is invalid in both
/// modes and means the directive should be omitted.
pub fn is_valid_byte_size(input: &str, is_offset: bool) -> bool {
    let s = input.trim();
    if s.is_empty() {
        tracing::debug!("empty byte size, hence it will not be set");
        return false;
    }

    if is_offset {
        offset_regex().is_match(s)
    } else {
        size_regex().is_match(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_size() {
        let cases = [
            ("1000", false, true),
            ("1000k", false, true),
            ("1m", false, true),
            ("10g", false, false),
            (" 1m ", false, true),
            ("1000kk", false, false),
            ("1000km", false, false),
            ("1mm", false, false),
            ("", false, false),
            ("    ", false, false),
            ("1G", true, true),
            ("1G", false, false),
            ("1000kk", true, false),
            ("", true, false),
            ("k", true, false),
        ];

        for (value, is_offset, expected) in cases {
            assert_eq!(
                is_valid_byte_size(value, is_offset),
                expected,
                "value={value:?} offset={is_offset}"
            );
        }
    }
}
