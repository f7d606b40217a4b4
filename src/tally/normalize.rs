//! Per-line normalization
//!
//! A line is reduced to lowercase ASCII letters separated by ASCII whitespace.
//! Everything else (digits, punctuation, non-ASCII) is removed without
//! leaving a gap, so `don't` becomes `dont`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches every character that is neither an ASCII letter nor ASCII whitespace
static STRIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z\t\n\x0B\x0C\r ]+").expect("Invalid STRIP_RE regex"));

/// ASCII whitespace, including vertical tab
#[inline]
fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Strip non-letter characters and lowercase the remainder
pub fn normalize_line(line: &str) -> String {
    STRIP_RE.replace_all(line, "").to_ascii_lowercase()
}

/// Split already-normalized text into non-empty tokens
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split(is_separator).filter(|t| !t.is_empty())
}

/// Normalize a line and collect its tokens
#[cfg(test)]
pub fn words(line: &str) -> Vec<String> {
    tokens(&normalize_line(line)).map(str::to_string).collect()
}
