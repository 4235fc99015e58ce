//! Login handle derivation
//!
//! Turns a person's name into a normalized ASCII handle. The same
//! normalization backs the report filename components, so both the
//! registration and reporting paths share one implementation.

use unicode_normalization::UnicodeNormalization;

/// Fallback handle when a name normalizes to nothing at all
const FALLBACK_HANDLE: &str = "user";

/// First whitespace-delimited token of a name field, empty if there is none.
pub fn first_token(value: &str) -> &str {
    value.split_whitespace().next().unwrap_or("")
}

/// Lower-case, NFKD-decompose, and keep only `[a-z0-9._-]`.
///
/// Decomposition splits accented characters into a base character plus
/// combining marks; dropping every non-ASCII scalar afterwards strips the
/// marks while keeping the base letter.
pub fn ascii_slug(value: &str) -> String {
    value
        .to_lowercase()
        .nfkd()
        .filter(char::is_ascii)
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '.' | '_' | '-'))
        .collect()
}

/// Derive the base login handle `<first-token>.<last-token>`.
///
/// Pure and deterministic: the same name always yields the same handle.
pub fn base_handle(first_name: &str, last_name: &str) -> String {
    let joined = format!("{}.{}", first_token(first_name), first_token(last_name));
    let slug = ascii_slug(&joined);
    if slug.is_empty() {
        FALLBACK_HANDLE.to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Ana", "Gomez", "ana.gomez")]
    #[case("Ana María", "Gómez Díaz", "ana.gomez")]
    #[case("José", "Ñandú", "jose.nandu")]
    #[case("  Lucía ", " de-la-Cruz ", "lucia.de-la-cruz")]
    #[case("O'Brien", "Smith", "obrien.smith")]
    #[case("Anne-Marie", "Müller", "anne-marie.muller")]
    #[case("X Æ A-12", "Musk", "x.musk")]
    #[case("", "", ".")]
    #[case("李", "王", ".")]
    fn test_base_handle(#[case] first: &str, #[case] last: &str, #[case] expected: &str) {
        assert_eq!(base_handle(first, last), expected);
    }

    #[test]
    fn test_base_handle_is_deterministic() {
        let a = base_handle("María José", "Fernández");
        let b = base_handle("María José", "Fernández");
        assert_eq!(a, b);
    }

    #[rstest]
    #[case("Ana María", "Gómez Díaz")]
    #[case("", "")]
    #[case("!!!", "###")]
    #[case("Łukasz", "Żółć")]
    fn test_base_handle_charset(#[case] first: &str, #[case] last: &str) {
        let handle = base_handle(first, last);
        assert!(
            handle == FALLBACK_HANDLE
                || handle
                    .chars()
                    .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '.' | '_' | '-')),
            "unexpected character in {handle:?}"
        );
        assert!(!handle.is_empty());
    }

    #[test]
    fn test_first_token() {
        assert_eq!(first_token("Ana María"), "Ana");
        assert_eq!(first_token("  Ana  "), "Ana");
        assert_eq!(first_token(""), "");
        assert_eq!(first_token("   "), "");
    }

    #[test]
    fn test_ascii_slug_strips_diacritics() {
        assert_eq!(ascii_slug("Gómez"), "gomez");
        assert_eq!(ascii_slug("Ñandú"), "nandu");
        assert_eq!(ascii_slug("CS-101"), "cs-101");
    }
}
