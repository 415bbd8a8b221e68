use std::io::{ErrorKind, Read};

use tracing::trace;

use crate::error::{Result, TransportError};
use crate::traits::ReportSource;

/// Reads fixed-size reports from any `Read` stream.
///
/// Each call to [`ReportSource::read_report`] consumes exactly `buf.len()`
/// bytes, looping over short reads. A stream that ends cleanly between two
/// reports yields `Ok(0)`; one that ends inside a report is an error.
pub struct ReportStream<R> {
    inner: R,
    reports: u64,
}

impl<R: Read> ReportStream<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, reports: 0 }
    }

    /// Number of complete reports delivered so far.
    pub fn reports_read(&self) -> u64 {
        self.reports
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume the adapter and return the inner stream.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ReportSource for ReportStream<R> {
    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0usize;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }

        if filled == 0 {
            return Ok(0);
        }
        if filled < buf.len() {
            return Err(TransportError::TruncatedReport {
                expected: buf.len(),
                got: filled,
            });
        }

        self.reports = self.reports.saturating_add(1);
        trace!(report = self.reports, size = filled, "report read");
        Ok(filled)
    }
}

impl<R> std::fmt::Debug for ReportStream<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportStream")
            .field("reports", &self.reports)
            .finish()
    }
}
