//! Alphabet Classifier
//!
//! Assigns a payload to the cheapest QR alphabet that can represent it.

use super::types::AlphabetClass;

/// The set of all legal characters in alphanumeric mode
pub const ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Double-byte script ranges that put a payload in the kanji class
pub const WIDE_RANGES: [(char, char); 5] = [
    ('\u{3000}', '\u{303F}'), // CJK symbols and punctuation
    ('\u{3040}', '\u{309F}'), // Hiragana
    ('\u{30A0}', '\u{30FF}'), // Katakana
    ('\u{FF00}', '\u{FFEF}'), // Half/full-width forms
    ('\u{4E00}', '\u{9FAF}'), // CJK unified ideographs
];

/// Classify a payload. Precedence is numeric, alphanumeric, kanji, then byte.
pub fn classify(payload: &str) -> AlphabetClass {
    if is_numeric(payload) {
        AlphabetClass::Numeric
    } else if is_alphanumeric(payload) {
        AlphabetClass::Alphanumeric
    } else if contains_wide(payload) {
        AlphabetClass::Kanji
    } else {
        AlphabetClass::Byte
    }
}

/// Non-empty and made only of ASCII digits
pub fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

/// Non-empty and made only of alphanumeric-mode characters, ignoring case
pub fn is_alphanumeric(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| ALPHANUMERIC_CHARSET.contains(c.to_ascii_uppercase()))
}

/// Contains at least one double-byte script character
pub fn contains_wide(text: &str) -> bool {
    text.chars()
        .any(|c| WIDE_RANGES.iter().any(|&(lo, hi)| lo <= c && c <= hi))
}
