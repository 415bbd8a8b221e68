/// Errors that can occur while decoding an MRZ capture.
///
/// Both are per-capture: the stream that produced the capture carries on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IcaoError {
    /// No layout matches the capture's shape.
    #[error("unrecognized layout ({records} records, first record {first_len} bytes)")]
    UnrecognizedLayout { records: usize, first_len: usize },

    /// A record is too short for a field the matched layout maps into it.
    #[error("record {record} too short ({len} bytes, layout needs {needed})")]
    TruncatedRecord {
        record: usize,
        needed: usize,
        len: usize,
    },
}

pub type Result<T> = std::result::Result<T, IcaoError>;
