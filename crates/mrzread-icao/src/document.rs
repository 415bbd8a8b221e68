use std::fmt;

use serde::Serialize;

/// Holder's sex as printed in the MRZ. Anything other than `M` or `F` is
/// decoded as unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `YYMMDD` date field with its check digit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateField {
    pub year: String,
    pub month: String,
    pub day: String,
    pub check_digit: String,
    pub check_digit_ok: bool,
}

impl DateField {
    /// True when the layout carried no value for this date.
    pub fn is_empty(&self) -> bool {
        self.year.is_empty() && self.month.is_empty() && self.day.is_empty()
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.year, self.month, self.day)
    }
}

/// Fields decoded from one MRZ capture.
///
/// Every check-digit flag starts `false` and is set only when the weighted
/// sum matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(rename = "subtype")]
    pub doc_subtype: String,
    pub country: String,
    pub number: String,
    pub number_check_digit: String,
    pub number_check_digit_ok: bool,
    pub given_name: String,
    pub surname: String,
    pub national_id: String,
    pub sex: Option<Sex>,
    pub nationality: String,
    pub birth: DateField,
    pub expiry: DateField,
}

impl Document {
    /// True when every check digit the document carries validated.
    ///
    /// Fields without a check digit (empty) are not counted against it.
    pub fn check_digits_ok(&self) -> bool {
        (self.number_check_digit.is_empty() || self.number_check_digit_ok)
            && (self.birth.check_digit.is_empty() || self.birth.check_digit_ok)
            && (self.expiry.check_digit.is_empty() || self.expiry.check_digit_ok)
    }
}
