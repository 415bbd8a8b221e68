//! Decode identity-document captures streamed from a document reader.
//!
//! mrzread turns the fixed-size reports a reader emits into decoded
//! machine-readable-zone documents and raw magnetic-stripe swipes.
//!
//! # Crate Structure
//!
//! - [`transport`]: Report source abstraction
//! - [`frame`]: Report decoding and record framing
//! - [`icao`]: ICAO 9303 layouts, field decoding and check digits
//! - [`pipeline`]: Capture → document dispatch and the [`read_documents`] entry point

pub mod pipeline;

pub use pipeline::{read_documents, DocumentPipeline, ReadOutcome};

/// Re-export transport types.
pub mod transport {
    pub use mrzread_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use mrzread_frame::*;
}

/// Re-export ICAO decoding types.
pub mod icao {
    pub use mrzread_icao::*;
}
