//! Observation hooks for the record framer.
//!
//! The framer reports its transitions to an observer supplied at
//! construction. [`TracingObserver`] forwards them to `tracing`; tests and
//! embedders can pass a closure instead.

use tracing::{debug, trace, warn};

use crate::capture::CaptureKind;

/// A state transition or notable condition inside the framer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramerEvent {
    /// A start marker was seen.
    CaptureOpened(CaptureKind),
    /// A line-break marker started record number `record` (zero-based).
    LineBreak { record: usize },
    /// An end marker completed a capture holding `records` records.
    CaptureCompleted { kind: CaptureKind, records: usize },
    /// Bytes outside any capture were dropped.
    NoiseDiscarded { bytes: usize },
    /// A record grew past `limit` bytes; the capture is abandoned.
    RecordTooLong { kind: CaptureKind, limit: usize },
    /// An open capture was thrown away without completing.
    CaptureAborted { kind: CaptureKind, records: usize },
}

pub trait FramerObserver {
    fn on_event(&mut self, event: &FramerEvent);
}

impl<F: FnMut(&FramerEvent)> FramerObserver for F {
    fn on_event(&mut self, event: &FramerEvent) {
        self(event)
    }
}

/// Emits framer events as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl FramerObserver for TracingObserver {
    fn on_event(&mut self, event: &FramerEvent) {
        match *event {
            FramerEvent::CaptureOpened(kind) => debug!(%kind, "start of capture"),
            FramerEvent::LineBreak { record } => trace!(record, "new line"),
            FramerEvent::CaptureCompleted { kind, records } => {
                debug!(%kind, records, "end of capture")
            }
            FramerEvent::NoiseDiscarded { bytes } => {
                trace!(bytes, "skipping data before start of capture")
            }
            FramerEvent::RecordTooLong { kind, limit } => {
                warn!(%kind, limit, "record too long; end marker lost?")
            }
            FramerEvent::CaptureAborted { kind, records } => {
                debug!(%kind, records, "capture discarded")
            }
        }
    }
}

/// Ignores all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl FramerObserver for NoopObserver {
    fn on_event(&mut self, _event: &FramerEvent) {}
}
