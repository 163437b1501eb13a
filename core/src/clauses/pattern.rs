//! Pattern dialect shared by catalog rules and key-term extraction.
//!
//! Patterns are written with ECMAScript line and digit semantics: `.` stops at
//! `\n`, `\r`, U+2028 and U+2029, and `\d`/`\w` (with their negations) are
//! ASCII classes. Those four constructs are rewritten before compiling;
//! everything else goes to `regex` unchanged. Matching is case-insensitive.

use regex::{Regex, RegexBuilder};

const ANY_IN_LINE: &str = r"[^\n\r\x{2028}\x{2029}]";
const DIGIT: &str = "[0-9]";
const NOT_DIGIT: &str = "[^0-9]";
const WORD: &str = "[0-9A-Za-z_]";
const NOT_WORD: &str = "[^0-9A-Za-z_]";

pub fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&translate(pattern))
        .case_insensitive(true)
        .crlf(true)
        .build()
}

/// Rewrites `.`, `\d`, `\D`, `\w` and `\W` into explicit classes. The
/// replacements are bracketed, which `regex` also accepts nested inside a
/// class, so `[\d,]` becomes `[[0-9],]`.
fn translate(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars();
    let mut in_class = false;
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('d') => out.push_str(DIGIT),
                Some('D') => out.push_str(NOT_DIGIT),
                Some('w') => out.push_str(WORD),
                Some('W') => out.push_str(NOT_WORD),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '.' if !in_class => out.push_str(ANY_IN_LINE),
            '[' if in_class => out.push_str(r"\["),
            '[' => {
                in_class = true;
                out.push(c);
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_dot_and_ascii_classes() {
        assert_eq!(translate("a.b"), r"a[^\n\r\x{2028}\x{2029}]b");
        assert_eq!(translate(r"(\d+)\s*days"), r"([0-9]+)\s*days");
        assert_eq!(translate(r"[\d,]+(?:\.\d{2})?"), r"[[0-9],]+(?:\.[0-9]{2})?");
        assert_eq!(translate(r"[\w\s]+"), r"[[0-9A-Za-z_]\s]+");
        assert_eq!(translate("[.]"), "[.]");
    }

    #[test]
    fn dot_stops_at_every_line_terminator() {
        let re = compile("indemnify.*all.*claims").unwrap();
        assert!(re.is_match("We indemnify you for all claims."));
        assert!(!re.is_match("We indemnify you\nfor all claims."));
        assert!(!re.is_match("We indemnify you\rfor all claims."));
        assert!(!re.is_match("We indemnify you\u{2028}for all claims."));
        assert!(!re.is_match("We indemnify you\u{2029}for all claims."));
    }

    #[test]
    fn digits_are_ascii_only() {
        let re = compile(r"within (\d+) days").unwrap();
        assert!(re.is_match("within 30 days"));
        assert!(!re.is_match("within \u{0663}\u{0660} days"));
    }

    #[test]
    fn matching_ignores_case() {
        assert!(compile("Force Majeure").unwrap().is_match("FORCE MAJEURE"));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(compile("(unclosed").is_err());
    }
}
