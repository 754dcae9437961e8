//! String normalization helpers.

use unicode_normalization::UnicodeNormalization;

/// Strip accents by compatibility decomposition, dropping every non-ASCII
/// code point that remains.
pub fn remove_accent(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect()
}

/// Remove all whitespace, lowercase and strip accents.
///
/// Useful as a comparison key for user-entered names.
pub fn normalize_str(text: &str) -> String {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    remove_accent(&compact.to_lowercase())
}

/// True when `value` parses as an integer (surrounding whitespace and a
/// leading sign allowed).
pub fn is_integer_value(value: &str) -> bool {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
