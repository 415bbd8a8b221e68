use crate::error::Result;

/// Something that delivers fixed-size reports, one per call.
///
/// Implementations fill `buf` with exactly one report and return its length.
/// `Ok(0)` means the source is exhausted at a report boundary; callers treat
/// it as a clean end of stream.
pub trait ReportSource {
    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize>;
}

impl<S: ReportSource + ?Sized> ReportSource for &mut S {
    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read_report(buf)
    }
}

impl<S: ReportSource + ?Sized> ReportSource for Box<S> {
    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read_report(buf)
    }
}
