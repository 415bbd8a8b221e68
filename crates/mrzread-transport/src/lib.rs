//! Fixed-size report source abstraction for document reader streams.
//!
//! A document reader delivers its data as a sequence of fixed-size reports
//! (32 bytes on the observed hardware). This crate is the lowest layer of
//! mrzread: it only knows how to pull one report at a time from something,
//! never what the report means.
//!
//! Opening the device, enumerating it and keeping it alive are left to the
//! caller. Anything that implements [`std::io::Read`] can be wrapped in a
//! [`ReportStream`].

pub mod error;
pub mod stream;
pub mod traits;

pub use error::{Result, TransportError};
pub use stream::ReportStream;
pub use traits::ReportSource;
