//! Label normalization for header and topic matching.
//!
//! Spreadsheets arrive with inconsistent header casing, stray
//! whitespace, and accented or unaccented spellings of the same
//! column name. Comparisons fold all of that away first.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse runs of whitespace into a single space.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Fold a label for comparison: NFD-decompose and drop combining
/// marks, trim, lowercase, collapse inner whitespace.
pub fn fold_label(text: &str) -> String {
    let stripped: String = text.nfd().filter(|c| !is_combining_mark(*c)).collect();
    let lowered = stripped.trim().to_lowercase();
    WHITESPACE_COLLAPSE_REGEX
        .replace_all(&lowered, " ")
        .into_owned()
}

/// True when two labels are the same after folding.
pub fn labels_match(a: &str, b: &str) -> bool {
    fold_label(a) == fold_label(b)
}

/// True for cells that hold no usable text.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_accents_case_and_whitespace() {
        assert_eq!(fold_label("  Data de  Publicação "), "data de publicacao");
        assert_eq!(fold_label("TÍTULO"), "titulo");
    }

    #[test]
    fn matches_accented_and_plain_spellings() {
        assert!(labels_match("Título", "titulo"));
        assert!(labels_match("Circulação", "CIRCULACAO"));
        assert!(!labels_match("Meio", "Título"));
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank("   "));
        assert!(is_blank(""));
        assert!(!is_blank(" x "));
    }
}
