//! Filler trimming and name cleanup.

use crate::document::Sex;

/// MRZ filler character.
pub const FILLER: char = '<';

/// Separates the primary and secondary identifiers in a name field.
pub const NAME_SEPARATOR: &str = "<<";

/// Strip leading and trailing filler.
pub fn trim_filler(s: &str) -> &str {
    s.trim_matches(FILLER)
}

/// Trim filler and turn the remaining single `<` into spaces.
pub fn clean_name(s: &str) -> String {
    trim_filler(s).replace(FILLER, " ")
}

/// Split a combined name field into `(surname, given name)`.
///
/// Returns `None` unless the trimmed field holds exactly one `<<`.
pub fn split_name(raw: &str) -> Option<(String, String)> {
    let raw = trim_filler(raw);
    if raw.is_empty() {
        return None;
    }

    let mut parts = raw.split(NAME_SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(surname), Some(given), None) => Some((clean_name(surname), clean_name(given))),
        _ => None,
    }
}

/// Keep `M` and `F`; everything else is unset.
pub fn parse_sex(s: &str) -> Option<Sex> {
    match s {
        "M" => Some(Sex::Male),
        "F" => Some(Sex::Female),
        _ => None,
    }
}
