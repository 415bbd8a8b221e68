use tracing::debug;

use crate::checksum::{verify, verify_date, CheckDigitScheme};
use crate::document::{DateField, Document};
use crate::error::{IcaoError, Result};
use crate::layout::{self, FieldId, Layout, Span};
use crate::normalize::{clean_name, parse_sex, split_name, trim_filler};

/// Document number length covered by the number check digit.
const NUMBER_LEN: usize = 9;

/// Configuration for the field decoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderConfig {
    /// How check digits are scored. Default: low nibble.
    pub check_digits: CheckDigitScheme,
}

/// Decodes the records of an MRZ capture into a [`Document`].
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Find the layout for `records` without decoding them.
    pub fn layout_for<R: AsRef<[u8]>>(records: &[R]) -> Result<&'static Layout> {
        let first_len = records.first().map_or(0, |r| r.as_ref().len());
        layout::select(records.len(), first_len).ok_or(IcaoError::UnrecognizedLayout {
            records: records.len(),
            first_len,
        })
    }

    /// Decode one MRZ capture.
    pub fn decode<R: AsRef<[u8]>>(&self, records: &[R]) -> Result<Document> {
        self.decode_as(Self::layout_for(records)?, records)
    }

    /// Decode `records` with a layout the caller already selected.
    pub fn decode_as<R: AsRef<[u8]>>(&self, layout: &Layout, records: &[R]) -> Result<Document> {
        // Overrides are keyed on the issuing country, read before anything else.
        let raw_country = extract(records, &[Span {
            record: 0,
            start: 2,
            end: 5,
        }])?;
        let country = trim_filler(&raw_country);

        let field = |id: FieldId| extract(records, layout.spans(id, country));
        let scheme = self.config.check_digits;

        let mut doc = Document {
            doc_type: trim_filler(&field(FieldId::DocType)?).to_string(),
            doc_subtype: trim_filler(&field(FieldId::DocSubtype)?).to_string(),
            country: trim_filler(&field(FieldId::Country)?).to_string(),
            number: trim_filler(&field(FieldId::Number)?).to_string(),
            number_check_digit: trim_filler(&field(FieldId::NumberCheck)?).to_string(),
            national_id: trim_filler(&field(FieldId::NationalId)?).to_string(),
            sex: parse_sex(&field(FieldId::Sex)?),
            birth: date(
                field(FieldId::BirthYear)?,
                field(FieldId::BirthMonth)?,
                field(FieldId::BirthDay)?,
                field(FieldId::BirthCheck)?,
            ),
            expiry: date(
                field(FieldId::ExpiryYear)?,
                field(FieldId::ExpiryMonth)?,
                field(FieldId::ExpiryDay)?,
                field(FieldId::ExpiryCheck)?,
            ),
            ..Document::default()
        };

        doc.nationality = match layout.fixed_nationality(country) {
            Some(fixed) => fixed.to_string(),
            None => trim_filler(&field(FieldId::Nationality)?).to_string(),
        };

        let (surname, given_name) = match split_name(&field(FieldId::Name)?) {
            Some(split) => split,
            None => (
                clean_name(&field(FieldId::Surname)?),
                clean_name(&field(FieldId::GivenName)?),
            ),
        };
        doc.surname = surname;
        doc.given_name = given_name;

        doc.number_check_digit_ok =
            verify(&doc.number, NUMBER_LEN, &doc.number_check_digit, scheme);
        doc.birth.check_digit_ok = check_date(&doc.birth, scheme);
        doc.expiry.check_digit_ok = check_date(&doc.expiry, scheme);

        debug!(
            layout = layout.kind.name(),
            country = %doc.country,
            number_ok = doc.number_check_digit_ok,
            birth_ok = doc.birth.check_digit_ok,
            expiry_ok = doc.expiry.check_digit_ok,
            "decoded document"
        );

        Ok(doc)
    }
}

fn extract<R: AsRef<[u8]>>(records: &[R], spans: &[Span]) -> Result<String> {
    let mut out = String::new();
    for span in spans {
        let record = records.get(span.record).map_or(&[][..], |r| r.as_ref());
        let bytes = record
            .get(span.start..span.end)
            .ok_or(IcaoError::TruncatedRecord {
                record: span.record,
                needed: span.end,
                len: record.len(),
            })?;
        out.push_str(&String::from_utf8_lossy(bytes));
    }
    Ok(out)
}

fn date(year: String, month: String, day: String, check_digit: String) -> DateField {
    DateField {
        year,
        month,
        day,
        check_digit,
        check_digit_ok: false,
    }
}

fn check_date(date: &DateField, scheme: CheckDigitScheme) -> bool {
    verify_date(&date.year, &date.month, &date.day, &date.check_digit, scheme)
}
