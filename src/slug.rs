//! Theme-name slugging
//!
//! Reduces human-readable theme names to safe lowercase fragments used to
//! build destination table names.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Any run of characters outside [a-z0-9] collapses to one underscore.
static NON_ALNUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Reduce a theme name to a lowercase ASCII table-name fragment.
///
/// The name is NFKD-decomposed, stripped to ASCII (non-ASCII characters are
/// dropped, not an error), lowercased, each run of remaining
/// non-alphanumeric characters is replaced with a single underscore, and
/// underscores are trimmed from both ends.
///
/// Total over all inputs and idempotent; the result matches `^[a-z0-9_]*$`
/// and may be empty. Distinct names can reduce to the same slug; the
/// document validator rejects such collisions rather than letting two
/// themes write to the same tables.
pub fn slugify(name: &str) -> String {
    let ascii: String = name.nfkd().filter(char::is_ascii).collect();
    let lowered = ascii.to_lowercase();
    NON_ALNUM_RE
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces_become_underscores() {
        assert_eq!(slugify("Cafes And Restaurants"), "cafes_and_restaurants");
    }

    #[test]
    fn test_punctuation_collapses_to_single_underscore() {
        assert_eq!(slugify("Fire -- Stations!!"), "fire_stations");
        assert_eq!(slugify("--Health & Emergency--"), "health_emergency");
    }

    #[test]
    fn test_accents_fold_to_ascii() {
        assert_eq!(slugify("Café"), "cafe");
        assert_eq!(slugify("Über"), "uber");
    }

    #[test]
    fn test_non_decomposable_characters_drop() {
        assert_eq!(slugify("日本語"), "");
        assert_eq!(slugify("Ωmega"), "mega");
    }

    #[test]
    fn test_digits_kept() {
        assert_eq!(slugify("Route 66"), "route_66");
    }

    #[test]
    fn test_underscore_runs_collapse() {
        assert_eq!(slugify("a___b"), "a_b");
        assert_eq!(slugify("_edge_"), "edge");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_idempotent() {
        for name in ["Cafes And Restaurants", "Café!", "--x--", "", "points", "Route 66"] {
            let once = slugify(name);
            assert_eq!(slugify(&once), once, "slug of {:?} not stable", name);
        }
    }

    #[test]
    fn test_output_alphabet() {
        for name in ["Emergency & Health", "a b:c", "Ωmega", "trailing ", "ODD  spacing"] {
            assert!(
                slugify(name)
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
                "slug of {:?} left the [a-z0-9_] alphabet",
                name
            );
        }
    }
}
