//! Capture → document dispatch.

use mrzread_frame::{Capture, CaptureKind, CaptureReader, FrameError, ReaderConfig};
use mrzread_icao::{Decoder, DecoderConfig, Document, IcaoError, LayoutKind};
use mrzread_transport::ReportSource;
use tracing::{debug, warn};

/// What one completed capture turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// An MRZ capture that matched `layout`.
    Document {
        document: Document,
        layout: LayoutKind,
    },
    /// A magnetic-stripe swipe, passed through undecoded.
    MagStripe(Capture),
    /// An MRZ capture the decoder could not map. The reader keeps going.
    Unrecognized { capture: Capture, error: IcaoError },
}

impl ReadOutcome {
    pub fn document(&self) -> Option<&Document> {
        match self {
            ReadOutcome::Document { document, .. } => Some(document),
            _ => None,
        }
    }

    /// Layout the document was decoded with. Taken from the raw records,
    /// so it does not depend on how they render as text.
    pub fn layout(&self) -> Option<LayoutKind> {
        match self {
            ReadOutcome::Document { layout, .. } => Some(*layout),
            _ => None,
        }
    }

    pub fn is_unrecognized(&self) -> bool {
        matches!(self, ReadOutcome::Unrecognized { .. })
    }
}

/// Runs layout selection and field decoding for each capture handed to it.
#[derive(Debug, Clone, Default)]
pub struct DocumentPipeline {
    decoder: Decoder,
}

impl DocumentPipeline {
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            decoder: Decoder::with_config(config),
        }
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    pub fn process(&self, capture: Capture) -> ReadOutcome {
        match capture.kind() {
            CaptureKind::MagStripe => {
                debug!(tracks = capture.record_count(), "magnetic stripe capture");
                ReadOutcome::MagStripe(capture)
            }
            CaptureKind::Mrz => match self.decode(&capture) {
                Ok((layout, document)) => {
                    debug!(
                        layout = layout.name(),
                        doc_type = %document.doc_type,
                        country = %document.country,
                        check_digits_ok = document.check_digits_ok(),
                        "document decoded"
                    );
                    ReadOutcome::Document { document, layout }
                }
                Err(error) => {
                    warn!(%error, "MRZ capture not decoded");
                    ReadOutcome::Unrecognized { capture, error }
                }
            },
        }
    }

    fn decode(&self, capture: &Capture) -> Result<(LayoutKind, Document), IcaoError> {
        let records = capture.records();
        let layout = Decoder::layout_for(records)?;
        let document = self.decoder.decode_as(layout, records)?;
        Ok((layout.kind, document))
    }
}

/// Read reports from `source` until it is exhausted, handing every outcome
/// to `on_outcome` on the calling thread.
///
/// Returns `Ok(())` on a clean end of stream. Read and report-length
/// failures stop the loop; unrecognized captures do not.
pub fn read_documents<S, F>(
    source: S,
    reader_config: ReaderConfig,
    decoder_config: DecoderConfig,
    mut on_outcome: F,
) -> Result<(), FrameError>
where
    S: ReportSource,
    F: FnMut(ReadOutcome),
{
    let pipeline = DocumentPipeline::new(decoder_config);
    let mut reader = CaptureReader::with_config(source, reader_config);
    reader.run(|capture| on_outcome(pipeline.process(capture)))
}
