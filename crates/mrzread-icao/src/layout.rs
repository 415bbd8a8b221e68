//! MRZ layout table.
//!
//! Each [`Layout`] is keyed by record count and first-record length and
//! maps every [`FieldId`] to the byte spans it occupies. Country overrides
//! replace individual fields for the issuing states that deviate from the
//! base layout.

use serde::Serialize;

/// Layout size classes known to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LayoutKind {
    /// ID card, 3 × 30.
    Td1,
    /// Legacy two-line card, 2 × 34.
    Td2Legacy,
    /// Two-line card, 2 × 36.
    Td2,
    /// Passport, 2 × 44.
    Td3,
    /// Single 30-character line (e.g. driving licences).
    SingleLine,
}

impl LayoutKind {
    pub fn name(self) -> &'static str {
        match self {
            LayoutKind::Td1 => "TD1",
            LayoutKind::Td2Legacy => "TD2-68",
            LayoutKind::Td2 => "TD2",
            LayoutKind::Td3 => "TD3",
            LayoutKind::SingleLine => "SINGLE",
        }
    }
}

/// A byte range within one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub record: usize,
    pub start: usize,
    pub end: usize,
}

const fn span(record: usize, start: usize, end: usize) -> Span {
    Span { record, start, end }
}

/// Document fields a layout can map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    DocType,
    DocSubtype,
    Country,
    Number,
    NumberCheck,
    /// Combined `SURNAME<<GIVEN` field.
    Name,
    Surname,
    GivenName,
    NationalId,
    Sex,
    Nationality,
    BirthYear,
    BirthMonth,
    BirthDay,
    BirthCheck,
    ExpiryYear,
    ExpiryMonth,
    ExpiryDay,
    ExpiryCheck,
}

/// Field → spans. A field's value is its spans concatenated in order; an
/// empty span list means the field is absent.
pub type FieldMap = &'static [(FieldId, &'static [Span])];

/// Field replacements for a set of issuing countries.
#[derive(Debug)]
pub struct CountryOverride {
    pub countries: &'static [&'static str],
    pub fields: FieldMap,
    /// Nationality to report instead of reading it from the record.
    pub nationality: Option<&'static str>,
}

#[derive(Debug)]
pub struct Layout {
    pub kind: LayoutKind,
    pub records: usize,
    pub first_len: usize,
    pub fields: FieldMap,
    pub overrides: &'static [CountryOverride],
}

impl Layout {
    /// Spans holding `field` for a document issued by `country`.
    pub fn spans(&self, field: FieldId, country: &str) -> &'static [Span] {
        self.overrides_for(country)
            .find_map(|o| lookup(o.fields, field))
            .or_else(|| lookup(self.fields, field))
            .unwrap_or(&[])
    }

    /// Nationality fixed by a country override, if any.
    pub fn fixed_nationality(&self, country: &str) -> Option<&'static str> {
        self.overrides_for(country).find_map(|o| o.nationality)
    }

    fn overrides_for<'a>(
        &'a self,
        country: &'a str,
    ) -> impl Iterator<Item = &'static CountryOverride> + 'a {
        self.overrides
            .iter()
            .filter(move |o| o.countries.contains(&country))
    }
}

fn lookup(fields: FieldMap, field: FieldId) -> Option<&'static [Span]> {
    fields
        .iter()
        .find(|(id, _)| *id == field)
        .map(|(_, spans)| *spans)
}

/// Pick the layout for a capture of `records` records whose first record is
/// `first_len` bytes long.
pub fn select(records: usize, first_len: usize) -> Option<&'static Layout> {
    LAYOUTS
        .iter()
        .find(|l| l.records == records && l.first_len == first_len)
}

/// Issuing countries whose TD1 cards carry a national identifier in the
/// optional data of the first line.
pub const NATIONAL_ID_COUNTRIES: &[&str] = &[
    "ALB", "GEO", "GIB", "LVA", "LTU", "MKD", "MLT", "MDA", "NLD", "SRB", "SVK", "ESP", "UKR",
];

const TD1_FIELDS: FieldMap = &[
    (FieldId::DocType, &[span(0, 0, 1)]),
    (FieldId::DocSubtype, &[span(0, 1, 2)]),
    (FieldId::Country, &[span(0, 2, 5)]),
    (FieldId::Number, &[span(0, 5, 14)]),
    (FieldId::NumberCheck, &[span(0, 14, 15)]),
    (FieldId::BirthYear, &[span(1, 0, 2)]),
    (FieldId::BirthMonth, &[span(1, 2, 4)]),
    (FieldId::BirthDay, &[span(1, 4, 6)]),
    (FieldId::BirthCheck, &[span(1, 6, 7)]),
    (FieldId::Sex, &[span(1, 7, 8)]),
    (FieldId::ExpiryYear, &[span(1, 8, 10)]),
    (FieldId::ExpiryMonth, &[span(1, 10, 12)]),
    (FieldId::ExpiryDay, &[span(1, 12, 14)]),
    (FieldId::ExpiryCheck, &[span(1, 14, 15)]),
    (FieldId::Nationality, &[span(1, 15, 18)]),
    (FieldId::Name, &[span(2, 0, 30)]),
];

const TD1_OVERRIDES: &[CountryOverride] = &[
    // Belgian card numbers run into the check digit position.
    CountryOverride {
        countries: &["BEL"],
        fields: &[
            (FieldId::Number, &[span(0, 5, 14), span(0, 14, 17)]),
            (FieldId::NumberCheck, &[]),
        ],
        nationality: None,
    },
    CountryOverride {
        countries: NATIONAL_ID_COUNTRIES,
        fields: &[(FieldId::NationalId, &[span(0, 15, 25)])],
        nationality: None,
    },
];

const TD2_LEGACY_FIELDS: FieldMap = &[
    (FieldId::DocType, &[span(0, 0, 1)]),
    (FieldId::DocSubtype, &[span(0, 1, 2)]),
    (FieldId::Country, &[span(0, 2, 5)]),
    (FieldId::Name, &[span(0, 5, 34)]),
    (FieldId::Number, &[span(1, 0, 9)]),
    (FieldId::Nationality, &[span(1, 10, 13)]),
    (FieldId::BirthYear, &[span(1, 13, 15)]),
    (FieldId::BirthMonth, &[span(1, 15, 17)]),
    (FieldId::BirthDay, &[span(1, 17, 19)]),
    (FieldId::BirthCheck, &[span(1, 19, 20)]),
    (FieldId::Sex, &[span(1, 20, 21)]),
    (FieldId::ExpiryYear, &[span(1, 21, 23)]),
    (FieldId::ExpiryMonth, &[span(1, 23, 25)]),
    (FieldId::ExpiryDay, &[span(1, 25, 27)]),
    (FieldId::ExpiryCheck, &[span(1, 27, 28)]),
];

const TD2_FIELDS: FieldMap = &[
    (FieldId::DocType, &[span(0, 0, 1)]),
    (FieldId::DocSubtype, &[span(0, 1, 2)]),
    (FieldId::Country, &[span(0, 2, 5)]),
    (FieldId::Name, &[span(0, 5, 36)]),
    (FieldId::Number, &[span(1, 0, 9)]),
    (FieldId::Nationality, &[span(1, 10, 13)]),
    (FieldId::BirthYear, &[span(1, 13, 15)]),
    (FieldId::BirthMonth, &[span(1, 15, 17)]),
    (FieldId::BirthDay, &[span(1, 17, 19)]),
    (FieldId::BirthCheck, &[span(1, 19, 20)]),
    (FieldId::Sex, &[span(1, 20, 21)]),
    (FieldId::ExpiryYear, &[span(1, 21, 23)]),
    (FieldId::ExpiryMonth, &[span(1, 23, 25)]),
    (FieldId::ExpiryDay, &[span(1, 25, 27)]),
    (FieldId::ExpiryCheck, &[span(1, 27, 28)]),
];

const TD2_OVERRIDES: &[CountryOverride] = &[
    // French national ID card (pre-2021): separate name ranges, 12-char
    // number, no expiry.
    CountryOverride {
        countries: &["FRA"],
        fields: &[
            (FieldId::Name, &[]),
            (FieldId::Surname, &[span(0, 5, 30)]),
            (FieldId::Number, &[span(1, 0, 12)]),
            (FieldId::GivenName, &[span(1, 13, 27)]),
            (FieldId::Nationality, &[]),
            (FieldId::BirthYear, &[span(1, 27, 29)]),
            (FieldId::BirthMonth, &[span(1, 29, 31)]),
            (FieldId::BirthDay, &[span(1, 31, 33)]),
            (FieldId::BirthCheck, &[span(1, 33, 34)]),
            (FieldId::Sex, &[span(1, 34, 35)]),
            (FieldId::ExpiryYear, &[]),
            (FieldId::ExpiryMonth, &[]),
            (FieldId::ExpiryDay, &[]),
            (FieldId::ExpiryCheck, &[]),
        ],
        nationality: Some("FRA"),
    },
];

const TD3_FIELDS: FieldMap = &[
    (FieldId::DocType, &[span(0, 0, 1)]),
    (FieldId::DocSubtype, &[span(0, 1, 2)]),
    (FieldId::Country, &[span(0, 2, 5)]),
    (FieldId::Name, &[span(0, 5, 34)]),
    (FieldId::Number, &[span(1, 0, 9)]),
    (FieldId::NumberCheck, &[span(1, 9, 10)]),
    (FieldId::Nationality, &[span(1, 10, 13)]),
    (FieldId::BirthYear, &[span(1, 13, 15)]),
    (FieldId::BirthMonth, &[span(1, 15, 17)]),
    (FieldId::BirthDay, &[span(1, 17, 19)]),
    (FieldId::BirthCheck, &[span(1, 19, 20)]),
    (FieldId::Sex, &[span(1, 20, 21)]),
    (FieldId::ExpiryYear, &[span(1, 21, 23)]),
    (FieldId::ExpiryMonth, &[span(1, 23, 25)]),
    (FieldId::ExpiryDay, &[span(1, 25, 27)]),
    (FieldId::ExpiryCheck, &[span(1, 27, 28)]),
    (FieldId::NationalId, &[span(1, 28, 42)]),
];

const SINGLE_LINE_FIELDS: FieldMap = &[
    (FieldId::DocType, &[span(0, 0, 1)]),
    (FieldId::DocSubtype, &[span(0, 1, 2)]),
    (FieldId::Country, &[span(0, 2, 5)]),
    (FieldId::Number, &[span(0, 5, 14)]),
];

/// Every layout the decoder recognizes.
pub const LAYOUTS: &[Layout] = &[
    Layout {
        kind: LayoutKind::Td1,
        records: 3,
        first_len: 30,
        fields: TD1_FIELDS,
        overrides: TD1_OVERRIDES,
    },
    Layout {
        kind: LayoutKind::Td2Legacy,
        records: 2,
        first_len: 34,
        fields: TD2_LEGACY_FIELDS,
        overrides: &[],
    },
    Layout {
        kind: LayoutKind::Td2,
        records: 2,
        first_len: 36,
        fields: TD2_FIELDS,
        overrides: TD2_OVERRIDES,
    },
    Layout {
        kind: LayoutKind::Td3,
        records: 2,
        first_len: 44,
        fields: TD3_FIELDS,
        overrides: &[],
    },
    Layout {
        kind: LayoutKind::SingleLine,
        records: 1,
        first_len: 30,
        fields: SINGLE_LINE_FIELDS,
        overrides: &[],
    },
];
