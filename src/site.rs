//! Site code extraction from node names.
//!
//! Node names embed the site code as the span that begins at the first digit
//! and ends at the last letter, e.g. `RBS12ABC` → `12ABC`.

use unicode_properties::{GeneralCategory, GeneralCategoryGroup, UnicodeGeneralCategory};

/// Decimal digit (general category Nd); fractions and numerals do not count
fn is_digit(ch: char) -> bool {
    ch.general_category() == GeneralCategory::DecimalNumber
}

/// Letter (general category L*); combining marks and letter numerals do not count
fn is_letter(ch: char) -> bool {
    ch.general_category_group() == GeneralCategoryGroup::Letter
}

/// Extract the site code from a node name.
///
/// Scans once, locking `start` to the first decimal digit and moving `end`
/// to every letter seen anywhere in the string. Returns
/// the inclusive span when both were found and `end >= start`.
pub fn get_site(node_name: &str) -> Option<&str> {
    let mut start: Option<usize> = None;
    let mut end: Option<usize> = None;

    for (i, ch) in node_name.char_indices() {
        if start.is_none() && is_digit(ch) {
            start = Some(i);
        }
        if is_letter(ch) {
            end = Some(i + ch.len_utf8());
        }
    }

    match (start, end) {
        (Some(start), Some(end)) if end > start => Some(&node_name[start..end]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_digit_to_last_letter() {
        assert_eq!(get_site("AB12cd34EF"), Some("12cd34EF"));
        assert_eq!(get_site("7X"), Some("7X"));
        assert_eq!(get_site("12NODEab"), Some("12NODEab"));
        assert_eq!(get_site("RBS_0042_KNX"), Some("0042_KNX"));
    }

    #[test]
    fn test_no_digit() {
        assert_eq!(get_site("NoDigitsHere"), None);
        assert_eq!(get_site(""), None);
    }

    #[test]
    fn test_no_letter() {
        assert_eq!(get_site("12345"), None);
        assert_eq!(get_site("12-34"), None);
    }

    #[test]
    fn test_letters_only_before_first_digit() {
        assert_eq!(get_site("ABC123"), None);
        assert_eq!(get_site("A1"), None);
    }

    #[test]
    fn test_trailing_digits_after_last_letter_excluded() {
        assert_eq!(get_site("X9abc77"), Some("9abc"));
    }

    #[test]
    fn test_multibyte_characters() {
        assert_eq!(get_site("Nœud4é"), Some("4é"));
        assert_eq!(get_site("é1ü2"), Some("1ü"));
        assert_eq!(get_site("RBS٣٤ب"), Some("٣٤ب"));
    }

    #[test]
    fn test_non_decimal_numerics_are_not_digits() {
        assert_eq!(get_site("A½B"), None);
        assert_eq!(get_site("Ⅻ"), None);
    }

    #[test]
    fn test_combining_marks_are_not_letters() {
        // U+0301 COMBINING ACUTE ACCENT after the digit
        assert_eq!(get_site("AB1\u{301}"), None);
        assert_eq!(get_site("AB1e\u{301}"), Some("1e"));
    }
}
