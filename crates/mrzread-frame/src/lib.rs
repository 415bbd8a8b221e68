//! Report decoding and record framing for document readers.
//!
//! A reader streams fixed-size reports. Each report carries:
//! - 1 reserved byte
//! - a 1-byte payload length
//! - up to `report_size - 2` payload bytes
//!
//! The payloads, concatenated, form a byte stream in which MRZ and
//! magnetic-stripe captures are delimited by control markers. The
//! [`RecordFramer`] turns that stream into [`Capture`]s, one record per
//! physical line; the [`CaptureReader`] drives it from any
//! [`ReportSource`](mrzread_transport::ReportSource).

#[cfg(feature = "async")]
pub mod async_codec;
pub mod capture;
pub mod codec;
pub mod error;
pub mod framer;
pub mod observer;
pub mod reader;

#[cfg(feature = "async")]
pub use async_codec::ReportCodec;
pub use capture::{Capture, CaptureKind};
pub use codec::{encode_report, encode_stream, report_payload, REPORT_HEADER_SIZE, REPORT_SIZE};
pub use error::{FrameError, Result};
pub use framer::{FramerState, RecordFramer, MAX_RECORD_LEN};
pub use observer::{FramerEvent, FramerObserver, NoopObserver, TracingObserver};
pub use reader::{CaptureReader, ReaderConfig};
