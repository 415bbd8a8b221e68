use std::fmt;

use bytes::Bytes;

/// What kind of data a capture holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureKind {
    /// Machine-readable zone of an identity document.
    Mrz,
    /// Magnetic-stripe swipe.
    MagStripe,
}

impl CaptureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CaptureKind::Mrz => "MRZ",
            CaptureKind::MagStripe => "MS",
        }
    }
}

impl fmt::Display for CaptureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One complete delimited record group read from the stream.
///
/// Each record is one physical line of the captured zone, without its
/// line-break marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    kind: CaptureKind,
    records: Vec<Bytes>,
}

impl Capture {
    /// Build a capture from already separated records.
    pub fn new<I, R>(kind: CaptureKind, records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Bytes>,
    {
        Self {
            kind,
            records: records.into_iter().map(Into::into).collect(),
        }
    }

    pub fn kind(&self) -> CaptureKind {
        self.kind
    }

    pub fn records(&self) -> &[Bytes] {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Byte length of the first record, or 0 for an empty capture.
    pub fn first_record_len(&self) -> usize {
        self.records.first().map_or(0, Bytes::len)
    }

    pub fn into_records(self) -> Vec<Bytes> {
        self.records
    }

    /// Records rendered as text, with invalid UTF-8 replaced.
    pub fn lines(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| String::from_utf8_lossy(r).into_owned())
            .collect()
    }
}
