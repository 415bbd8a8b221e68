use std::collections::VecDeque;
use std::time::Duration;

use mrzread_transport::ReportSource;
use tracing::{debug, warn};

use crate::capture::Capture;
use crate::codec::{report_payload, REPORT_SIZE};
use crate::error::{FrameError, Result};
use crate::framer::RecordFramer;
use crate::observer::{FramerObserver, TracingObserver};

/// Default pause after a report that carried no data.
pub const DEFAULT_IDLE_DELAY: Duration = Duration::from_millis(100);

/// Configuration for a capture reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Size of one report in bytes. Default: 32.
    pub report_size: usize,
    /// How long to wait after an empty report before reading again.
    /// Zero disables the pause (replayed streams).
    pub idle_delay: Duration,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            report_size: REPORT_SIZE,
            idle_delay: DEFAULT_IDLE_DELAY,
        }
    }
}

enum Cycle {
    Data,
    Idle,
    Closed,
}

/// Reads complete captures from any [`ReportSource`].
///
/// One reader owns one framer; feed it from a single thread. Any read or
/// report-length failure discards the capture in progress and is returned
/// to the caller, which decides whether to start over.
pub struct CaptureReader<S, O = TracingObserver> {
    source: S,
    framer: RecordFramer<O>,
    report: Vec<u8>,
    ready: VecDeque<Capture>,
    config: ReaderConfig,
}

impl<S: ReportSource> CaptureReader<S> {
    /// Create a capture reader with default configuration.
    pub fn new(source: S) -> Self {
        Self::with_config(source, ReaderConfig::default())
    }

    /// Create a capture reader with explicit configuration.
    pub fn with_config(source: S, config: ReaderConfig) -> Self {
        Self::with_observer(source, config, TracingObserver)
    }
}

impl<S: ReportSource, O: FramerObserver> CaptureReader<S, O> {
    /// Create a capture reader whose framer reports to `observer`.
    pub fn with_observer(source: S, config: ReaderConfig, observer: O) -> Self {
        Self {
            source,
            framer: RecordFramer::with_observer(observer),
            report: vec![0u8; config.report_size],
            ready: VecDeque::new(),
            config,
        }
    }

    /// Read the next complete capture (blocking).
    ///
    /// Returns `Err(FrameError::StreamClosed)` when the source is exhausted.
    pub fn read_capture(&mut self) -> Result<Capture> {
        loop {
            if let Some(capture) = self.poll_capture()? {
                return Ok(capture);
            }
        }
    }

    /// Run at most one read cycle.
    ///
    /// Returns `Ok(None)` when the cycle completed no capture: an empty
    /// report (after the idle pause) or a report holding only part of one.
    /// Callers that must check a stop flag between reports loop on this
    /// instead of [`read_capture`](Self::read_capture).
    ///
    /// Returns `Err(FrameError::StreamClosed)` when the source is exhausted.
    pub fn poll_capture(&mut self) -> Result<Option<Capture>> {
        if let Some(capture) = self.ready.pop_front() {
            return Ok(Some(capture));
        }

        let ready = &mut self.ready;
        let cycle = read_cycle(
            &mut self.source,
            &mut self.framer,
            &mut self.report,
            |capture| ready.push_back(capture),
        )?;
        match cycle {
            Cycle::Data => {}
            Cycle::Idle => self.pause(),
            Cycle::Closed => return Err(FrameError::StreamClosed),
        }
        Ok(self.ready.pop_front())
    }

    /// Read until the source is exhausted, handing every capture to
    /// `on_capture` as soon as its end marker is scanned.
    ///
    /// Returns `Ok(())` on a clean end of stream.
    pub fn run<F>(&mut self, mut on_capture: F) -> Result<()>
    where
        F: FnMut(Capture),
    {
        while let Some(capture) = self.ready.pop_front() {
            on_capture(capture);
        }

        loop {
            match read_cycle(
                &mut self.source,
                &mut self.framer,
                &mut self.report,
                &mut on_capture,
            )? {
                Cycle::Data => {}
                Cycle::Idle => self.pause(),
                Cycle::Closed => return Ok(()),
            }
        }
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Mutably borrow the underlying source.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consume the reader and return the inner source.
    pub fn into_inner(self) -> S {
        self.source
    }

    pub fn framer(&self) -> &RecordFramer<O> {
        &self.framer
    }

    /// Current reader configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    fn pause(&self) {
        if !self.config.idle_delay.is_zero() {
            std::thread::sleep(self.config.idle_delay);
        }
    }
}

fn read_cycle<S, O, F>(
    source: &mut S,
    framer: &mut RecordFramer<O>,
    report: &mut [u8],
    on_capture: F,
) -> Result<Cycle>
where
    S: ReportSource,
    O: FramerObserver,
    F: FnMut(Capture),
{
    let read = match source.read_report(report) {
        Ok(n) => n,
        Err(err) => {
            warn!(error = %err, "report read failed; discarding capture in progress");
            framer.reset();
            return Err(FrameError::Transport(err));
        }
    };

    if read == 0 {
        debug!("report source exhausted");
        framer.reset();
        return Ok(Cycle::Closed);
    }

    match report_payload(&report[..read]) {
        Ok(Some(payload)) => {
            framer.feed(payload, on_capture);
            Ok(Cycle::Data)
        }
        Ok(None) => Ok(Cycle::Idle),
        Err(err) => {
            warn!(error = %err, "malformed report; discarding capture in progress");
            framer.reset();
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, ErrorKind, Read};

    use bytes::BytesMut;
    use mrzread_transport::{ReportStream, TransportError};

    use super::*;
    use crate::capture::CaptureKind;
    use crate::codec::{encode_report, encode_stream};
    use crate::framer::FramerState;

    const TD1: [&str; 3] = [
        "IDCZE9980013435<<<<<<<<<<<<<<<",
        "8110088F2201100CZE<<<<<<<<<<<6",
        "SPECIMEN<<VZOR<<<<<<<<<<<<<<<<",
    ];

    fn mrz_bytes(lines: &[&str]) -> Vec<u8> {
        let mut out = vec![0x1C, 0x02];
        out.extend_from_slice(lines.join("\r").as_bytes());
        out.extend_from_slice(&[0x0D, 0x03, 0x1D]);
        out
    }

    fn replay(wire: BytesMut) -> CaptureReader<ReportStream<Cursor<Vec<u8>>>> {
        let config = ReaderConfig {
            idle_delay: Duration::ZERO,
            ..ReaderConfig::default()
        };
        CaptureReader::with_config(ReportStream::new(Cursor::new(wire.to_vec())), config)
    }

    #[test]
    fn reads_capture_spanning_reports() {
        let mut wire = BytesMut::new();
        let reports = encode_stream(&mrz_bytes(&TD1), REPORT_SIZE, &mut wire).unwrap();
        assert!(reports > 3);

        let mut reader = replay(wire);
        let capture = reader.read_capture().unwrap();

        assert_eq!(capture.kind(), CaptureKind::Mrz);
        assert_eq!(capture.lines(), TD1.to_vec());
    }

    #[test]
    fn empty_reports_are_skipped() {
        let mut wire = BytesMut::new();
        encode_report(b"", REPORT_SIZE, &mut wire).unwrap();
        encode_stream(&mrz_bytes(&["ONE"]), REPORT_SIZE, &mut wire).unwrap();
        encode_report(b"", REPORT_SIZE, &mut wire).unwrap();

        let mut reader = replay(wire);
        assert_eq!(reader.read_capture().unwrap().lines(), vec!["ONE"]);
        assert!(matches!(
            reader.read_capture().unwrap_err(),
            FrameError::StreamClosed
        ));
    }

    #[test]
    fn poll_returns_after_every_report() {
        let mut wire = BytesMut::new();
        encode_report(b"", REPORT_SIZE, &mut wire).unwrap();
        encode_report(b"\x1c\x02AB", REPORT_SIZE, &mut wire).unwrap();
        encode_report(b"C\x0d\x03\x1d", REPORT_SIZE, &mut wire).unwrap();

        let mut reader = replay(wire);
        assert!(reader.poll_capture().unwrap().is_none());
        assert!(reader.poll_capture().unwrap().is_none());
        assert_eq!(reader.framer().state(), FramerState::InMrz);

        let capture = reader.poll_capture().unwrap().expect("end marker completes capture");
        assert_eq!(capture.lines(), vec!["ABC"]);
        assert!(matches!(
            reader.poll_capture().unwrap_err(),
            FrameError::StreamClosed
        ));
    }

    #[test]
    fn poll_drains_queued_captures_before_reading() {
        let mut payload = mrz_bytes(&["ONE"]);
        payload.extend(mrz_bytes(&["TWO"]));
        let mut wire = BytesMut::new();
        encode_report(&payload, REPORT_SIZE, &mut wire).unwrap();

        let mut reader = replay(wire);
        assert_eq!(reader.poll_capture().unwrap().unwrap().lines(), vec!["ONE"]);
        assert_eq!(reader.poll_capture().unwrap().unwrap().lines(), vec!["TWO"]);
        assert_eq!(reader.get_ref().reports_read(), 1);
    }

    #[test]
    fn several_captures_in_one_report_are_queued() {
        let mut stream = mrz_bytes(&["A"]);
        stream.extend_from_slice(b"\x0e\x02;9\x03");
        stream.extend(mrz_bytes(&["B"]));
        let mut wire = BytesMut::new();
        encode_report(&stream, REPORT_SIZE, &mut wire).unwrap();

        let mut reader = replay(wire);
        assert_eq!(reader.read_capture().unwrap().lines(), vec!["A"]);
        assert_eq!(
            reader.read_capture().unwrap().kind(),
            CaptureKind::MagStripe
        );
        assert_eq!(reader.read_capture().unwrap().lines(), vec!["B"]);
    }

    #[test]
    fn run_delivers_every_capture_then_returns() {
        let mut stream = mrz_bytes(&TD1);
        stream.extend_from_slice(b"\x0e\x02%B4111^DOE/J?\x03");
        let mut wire = BytesMut::new();
        encode_stream(&stream, REPORT_SIZE, &mut wire).unwrap();

        let mut kinds = Vec::new();
        replay(wire).run(|c| kinds.push(c.kind())).unwrap();

        assert_eq!(kinds, vec![CaptureKind::Mrz, CaptureKind::MagStripe]);
    }

    #[test]
    fn out_of_range_length_is_fatal_and_resets() {
        let mut wire = BytesMut::new();
        encode_report(b"\x1c\x02HALF", REPORT_SIZE, &mut wire).unwrap();
        let mut bad = [0u8; REPORT_SIZE];
        bad[1] = 40;
        wire.extend_from_slice(&bad);

        let mut reader = replay(wire);
        let err = reader.read_capture().unwrap_err();

        assert!(matches!(err, FrameError::LengthOutOfRange { len: 40, max: 30 }));
        assert_eq!(reader.framer().state(), FramerState::Idle);
    }

    #[test]
    fn read_failure_discards_capture_in_progress() {
        let mut first = BytesMut::new();
        encode_report(b"\x1c\x02P<GBRJOHNSON", REPORT_SIZE, &mut first).unwrap();
        let mut rest = BytesMut::new();
        encode_stream(b"<<JOHN\x0d\x03\x1d", REPORT_SIZE, &mut rest).unwrap();

        let source = FailOnce {
            first: first.to_vec(),
            rest: Cursor::new(rest.to_vec()),
            state: 0,
        };
        let config = ReaderConfig {
            idle_delay: Duration::ZERO,
            ..ReaderConfig::default()
        };
        let mut reader = CaptureReader::with_config(ReportStream::new(source), config);

        let err = reader.read_capture().unwrap_err();
        assert!(matches!(
            err,
            FrameError::Transport(TransportError::Io(ref e)) if e.kind() == ErrorKind::TimedOut
        ));
        assert_eq!(reader.framer().state(), FramerState::Idle);

        // The tail of the lost capture is noise now; nothing completes.
        assert!(matches!(
            reader.read_capture().unwrap_err(),
            FrameError::StreamClosed
        ));
    }

    #[test]
    fn truncated_report_is_a_transport_failure() {
        let mut wire = BytesMut::new();
        encode_report(b"\x1c\x02X", REPORT_SIZE, &mut wire).unwrap();
        wire.truncate(REPORT_SIZE - 4);

        let mut reader = replay(wire);
        let err = reader.read_capture().unwrap_err();
        assert!(matches!(
            err,
            FrameError::Transport(TransportError::TruncatedReport { .. })
        ));
    }

    #[test]
    fn custom_report_size() {
        let mut wire = BytesMut::new();
        encode_stream(&mrz_bytes(&TD1), 8, &mut wire).unwrap();

        let config = ReaderConfig {
            report_size: 8,
            idle_delay: Duration::ZERO,
        };
        let mut reader =
            CaptureReader::with_config(ReportStream::new(Cursor::new(wire.to_vec())), config);
        assert_eq!(reader.read_capture().unwrap().record_count(), 3);
        assert_eq!(reader.config().report_size, 8);
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut reader = replay(BytesMut::new());

        let _ = reader.get_ref();
        let _ = reader.get_mut();
        let _inner = reader.into_inner();
    }

    struct FailOnce {
        first: Vec<u8>,
        rest: Cursor<Vec<u8>>,
        state: u8,
    }

    impl Read for FailOnce {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.state {
                0 => {
                    self.state = 1;
                    let n = self.first.len().min(buf.len());
                    buf[..n].copy_from_slice(&self.first[..n]);
                    Ok(n)
                }
                1 => {
                    self.state = 2;
                    Err(std::io::Error::from(ErrorKind::TimedOut))
                }
                _ => self.rest.read(buf),
            }
        }
    }
}
