use mrzread_transport::TransportError;

/// Errors that can occur while decoding reports or framing captures.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Reading a report from the source failed. Fatal to the stream.
    #[error("report read failed: {0}")]
    Transport(#[from] TransportError),

    /// The report's length byte points past the end of the report.
    #[error("report length out of range ({len} bytes, max {max})")]
    LengthOutOfRange { len: usize, max: usize },

    /// The report is too small to hold the length header.
    #[error("report too short ({size} bytes, header needs 2)")]
    ReportTooShort { size: usize },

    /// The payload does not fit in a single report.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The source ended before another capture was completed.
    #[error("report stream closed")]
    StreamClosed,
}

impl From<std::io::Error> for FrameError {
    fn from(err: std::io::Error) -> Self {
        FrameError::Transport(TransportError::Io(err))
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
