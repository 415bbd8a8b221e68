/// Errors that can occur while pulling reports from a source.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An I/O error occurred on the underlying stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended part way through a report.
    #[error("truncated report ({got} of {expected} bytes)")]
    TruncatedReport { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, TransportError>;
