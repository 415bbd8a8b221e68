//! ICAO 9303 machine-readable zone decoding.
//!
//! Given the records of one MRZ capture, this crate picks the document
//! layout by record count and first-record length, copies the fixed byte
//! ranges of that layout into a [`Document`], strips `<` filler, splits the
//! combined name field and validates the three check digits.
//!
//! Layouts live in a constant table ([`layout::LAYOUTS`]); adding a national
//! variant is a table change.

pub mod checksum;
pub mod decoder;
pub mod document;
pub mod error;
pub mod layout;
pub mod normalize;

pub use checksum::CheckDigitScheme;
pub use decoder::{Decoder, DecoderConfig};
pub use document::{DateField, Document, Sex};
pub use error::{IcaoError, Result};
pub use layout::{Layout, LayoutKind};
