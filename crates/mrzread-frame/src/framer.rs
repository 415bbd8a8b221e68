use bytes::{BufMut, Bytes, BytesMut};

use crate::capture::{Capture, CaptureKind};
use crate::codec::{LINE_BREAK, MAG_STRIPE_END, MAG_STRIPE_START, MRZ_END, MRZ_START};
use crate::observer::{FramerEvent, FramerObserver, TracingObserver};

const INITIAL_RECORD_CAPACITY: usize = 64;

/// Longest record the framer will buffer. MRZ lines are at most 44 bytes
/// and a full three-track swipe stays well under this. A capture whose end
/// marker was lost hits the cap and is abandoned, so later start markers
/// are seen again.
pub const MAX_RECORD_LEN: usize = 512;

/// Where the framer is in the byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramerState {
    /// Outside any capture; bytes are dropped until a start marker.
    #[default]
    Idle,
    /// Inside an MRZ capture.
    InMrz,
    /// Inside a magnetic-stripe capture.
    InMagStripe,
}

impl FramerState {
    /// The kind of capture currently open, if any.
    pub fn capture_kind(self) -> Option<CaptureKind> {
        match self {
            FramerState::Idle => None,
            FramerState::InMrz => Some(CaptureKind::Mrz),
            FramerState::InMagStripe => Some(CaptureKind::MagStripe),
        }
    }
}

enum StartMatch {
    Complete(CaptureKind),
    Partial,
    None,
}

/// Reassembles payload bytes into line-oriented captures.
///
/// State persists across calls to [`feed`](Self::feed), so a capture may
/// span any number of reports. Marker prefixes cut by a report boundary are
/// held back (at most two bytes) until the next payload decides them, which
/// makes the output independent of how the stream was chunked.
///
/// The framer never blocks. Completed captures are handed to the callback
/// before the rest of the payload is scanned.
pub struct RecordFramer<O = TracingObserver> {
    state: FramerState,
    records: Vec<Bytes>,
    current: BytesMut,
    pending: BytesMut,
    scratch: BytesMut,
    observer: O,
}

impl RecordFramer {
    /// Create a framer that reports transitions through `tracing`.
    pub fn new() -> Self {
        Self::with_observer(TracingObserver)
    }
}

impl Default for RecordFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: FramerObserver> RecordFramer<O> {
    /// Create a framer with an explicit observer.
    pub fn with_observer(observer: O) -> Self {
        Self {
            state: FramerState::Idle,
            records: Vec::new(),
            current: BytesMut::with_capacity(INITIAL_RECORD_CAPACITY),
            pending: BytesMut::new(),
            scratch: BytesMut::new(),
            observer,
        }
    }

    pub fn state(&self) -> FramerState {
        self.state
    }

    /// Number of records in the capture currently open (0 when idle).
    pub fn open_records(&self) -> usize {
        match self.state {
            FramerState::Idle => 0,
            _ => self.records.len() + 1,
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Scan one payload left to right, calling `on_capture` for every
    /// capture completed along the way.
    pub fn feed<F>(&mut self, payload: &[u8], mut on_capture: F)
    where
        F: FnMut(Capture),
    {
        let mut buf = std::mem::take(&mut self.scratch);
        buf.clear();
        buf.extend_from_slice(&self.pending);
        buf.extend_from_slice(payload);
        self.pending.clear();

        let mut noise = 0usize;
        let mut i = 0usize;
        while i < buf.len() {
            let rest = &buf[i..];
            match self.state {
                FramerState::Idle => match match_start(rest) {
                    StartMatch::Complete(kind) => {
                        self.flush_noise(&mut noise);
                        self.open(kind);
                        i += 2;
                    }
                    StartMatch::Partial => {
                        self.pending.extend_from_slice(rest);
                        break;
                    }
                    StartMatch::None => {
                        noise += 1;
                        i += 1;
                    }
                },
                FramerState::InMrz => {
                    if rest[0] != LINE_BREAK {
                        if self.current.len() >= MAX_RECORD_LEN {
                            // Rescan this byte in Idle.
                            self.abandon_oversized(CaptureKind::Mrz);
                            continue;
                        }
                        self.current.put_u8(rest[0]);
                        i += 1;
                    } else if rest.starts_with(&MRZ_END) {
                        on_capture(self.complete(CaptureKind::Mrz));
                        i += MRZ_END.len();
                    } else if MRZ_END.starts_with(rest) {
                        self.pending.extend_from_slice(rest);
                        break;
                    } else {
                        self.line_break();
                        i += 1;
                    }
                }
                FramerState::InMagStripe => {
                    if rest[0] == MAG_STRIPE_END {
                        on_capture(self.complete(CaptureKind::MagStripe));
                    } else if self.current.len() >= MAX_RECORD_LEN {
                        self.abandon_oversized(CaptureKind::MagStripe);
                        continue;
                    } else {
                        self.current.put_u8(rest[0]);
                    }
                    i += 1;
                }
            }
        }
        self.flush_noise(&mut noise);

        self.scratch = buf;
    }

    /// Drop any open capture and held-back bytes and return to idle.
    pub fn reset(&mut self) {
        if let Some(kind) = self.state.capture_kind() {
            let records = self.open_records();
            self.observer
                .on_event(&FramerEvent::CaptureAborted { kind, records });
        }
        self.state = FramerState::Idle;
        self.records.clear();
        self.current.clear();
        self.pending.clear();
    }

    fn open(&mut self, kind: CaptureKind) {
        self.state = match kind {
            CaptureKind::Mrz => FramerState::InMrz,
            CaptureKind::MagStripe => FramerState::InMagStripe,
        };
        self.records.clear();
        self.current.clear();
        self.observer.on_event(&FramerEvent::CaptureOpened(kind));
    }

    fn line_break(&mut self) {
        self.records.push(self.current.split().freeze());
        self.observer.on_event(&FramerEvent::LineBreak {
            record: self.records.len(),
        });
    }

    fn complete(&mut self, kind: CaptureKind) -> Capture {
        self.records.push(self.current.split().freeze());
        let records = std::mem::take(&mut self.records);
        self.state = FramerState::Idle;
        self.observer.on_event(&FramerEvent::CaptureCompleted {
            kind,
            records: records.len(),
        });
        Capture::new(kind, records)
    }

    fn abandon_oversized(&mut self, kind: CaptureKind) {
        self.observer.on_event(&FramerEvent::RecordTooLong {
            kind,
            limit: MAX_RECORD_LEN,
        });
        self.reset();
    }

    fn flush_noise(&mut self, noise: &mut usize) {
        if *noise > 0 {
            self.observer
                .on_event(&FramerEvent::NoiseDiscarded { bytes: *noise });
            *noise = 0;
        }
    }
}

fn match_start(rest: &[u8]) -> StartMatch {
    for (marker, kind) in [
        (MRZ_START, CaptureKind::Mrz),
        (MAG_STRIPE_START, CaptureKind::MagStripe),
    ] {
        if rest.starts_with(&marker) {
            return StartMatch::Complete(kind);
        }
        if rest.len() < marker.len() && marker.starts_with(rest) {
            return StartMatch::Partial;
        }
    }
    StartMatch::None
}

impl<O> std::fmt::Debug for RecordFramer<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordFramer")
            .field("state", &self.state)
            .field("records", &self.records.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}
