//! Weighted 7-3-1 check digits.

use tracing::trace;

/// Weights applied to successive characters, cycling.
pub const WEIGHTS: [u32; 3] = [7, 3, 1];

/// How characters are turned into numbers before weighting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckDigitScheme {
    /// Low nibble of each byte. Exact for digits; letters and `<` score
    /// differently from ICAO 9303. This is what the readers in the field
    /// were validated against, so it stays the default.
    #[default]
    LowNibble,
    /// ICAO 9303 values: `0`-`9` as themselves, `A`-`Z` as 10-35, `<` and
    /// anything else as 0.
    Icao,
}

impl CheckDigitScheme {
    pub fn value(self, c: u8) -> u32 {
        match self {
            CheckDigitScheme::LowNibble => u32::from(c & 0x0f),
            CheckDigitScheme::Icao => match c {
                b'0'..=b'9' => u32::from(c - b'0'),
                b'A'..=b'Z' => u32::from(c - b'A') + 10,
                _ => 0,
            },
        }
    }
}

/// Compute the check digit of `value`.
pub fn check_digit(value: &[u8], scheme: CheckDigitScheme) -> u32 {
    let sum: u32 = value
        .iter()
        .zip(WEIGHTS.iter().cycle())
        .map(|(c, w)| scheme.value(*c) * w)
        .sum();
    sum % 10
}

/// Validate a `(value, check digit)` pair.
///
/// Returns `false` without computing anything when `value` is not
/// `expected_len` bytes long or `check` is not a single character.
pub fn verify(value: &str, expected_len: usize, check: &str, scheme: CheckDigitScheme) -> bool {
    let [check] = check.as_bytes() else {
        trace!(len = check.len(), "check digit has unexpected length");
        return false;
    };
    if value.len() != expected_len {
        trace!(
            len = value.len(),
            expected = expected_len,
            "checked value has unexpected length"
        );
        return false;
    }

    check_digit(value.as_bytes(), scheme) == scheme.value(*check)
}

/// Validate a date given as two-character year, month and day parts.
pub fn verify_date(
    year: &str,
    month: &str,
    day: &str,
    check: &str,
    scheme: CheckDigitScheme,
) -> bool {
    if year.len() != 2 || month.len() != 2 || day.len() != 2 {
        return false;
    }
    let date = format!("{year}{month}{day}");
    verify(&date, 6, check, scheme)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NIBBLE: CheckDigitScheme = CheckDigitScheme::LowNibble;
    const ICAO: CheckDigitScheme = CheckDigitScheme::Icao;

    #[test]
    fn known_digit_vectors() {
        assert_eq!(check_digit(b"123456789", NIBBLE), 7);
        assert_eq!(check_digit(b"800101", NIBBLE), 4);
        assert_eq!(check_digit(b"250101", NIBBLE), 7);
        assert_eq!(check_digit(b"998001343", NIBBLE), 5);
        assert_eq!(check_digit(b"740812", NIBBLE), 2);
    }

    #[test]
    fn schemes_agree_on_digits() {
        for value in ["520727", "000000", "999999999", "123456789012"] {
            assert_eq!(
                check_digit(value.as_bytes(), NIBBLE),
                check_digit(value.as_bytes(), ICAO),
                "{value}"
            );
        }
    }

    #[test]
    fn schemes_differ_on_letters() {
        // ICAO 9303 part 5 specimen document number.
        assert_eq!(check_digit(b"D23145890", ICAO), 7);
        assert_eq!(check_digit(b"D23145890", NIBBLE), 4);
        assert!(verify("D23145890", 9, "7", ICAO));
        assert!(!verify("D23145890", 9, "7", NIBBLE));
    }

    #[test]
    fn filler_scores_zero_under_icao() {
        assert_eq!(CheckDigitScheme::Icao.value(b'<'), 0);
        assert_eq!(CheckDigitScheme::LowNibble.value(b'<'), 12);
        assert_eq!(CheckDigitScheme::Icao.value(b'Z'), 35);
    }

    #[test]
    fn verify_matches_formula_for_every_digit() {
        let value = "123456789";
        for d in 0..10u32 {
            let check = d.to_string();
            assert_eq!(verify(value, 9, &check, NIBBLE), d == 7);
        }
    }

    #[test]
    fn length_mismatch_is_invalid() {
        assert!(!verify("12345678", 9, "7", NIBBLE));
        assert!(!verify("123456789", 9, "", NIBBLE));
        assert!(!verify("123456789", 9, "77", NIBBLE));
    }

    #[test]
    fn date_parts_must_be_two_chars() {
        assert!(verify_date("80", "01", "01", "4", NIBBLE));
        assert!(!verify_date("80", "1", "01", "4", NIBBLE));
        assert!(!verify_date("", "", "", "", NIBBLE));
        assert!(!verify_date("80", "01", "01", "", NIBBLE));
    }
}
