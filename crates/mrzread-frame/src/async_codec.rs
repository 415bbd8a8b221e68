//! `tokio_util` codec for reading reports from an `AsyncRead`.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;

use crate::codec::{report_payload, REPORT_HEADER_SIZE, REPORT_SIZE};
use crate::error::FrameError;

/// Splits a byte stream into fixed-size reports and yields each payload.
///
/// Empty reports yield an empty `Bytes`, so the consumer still sees every
/// read cycle and can pace itself.
#[derive(Debug, Clone, Copy)]
pub struct ReportCodec {
    report_size: usize,
}

impl ReportCodec {
    pub fn new(report_size: usize) -> Self {
        Self { report_size }
    }

    pub fn report_size(&self) -> usize {
        self.report_size
    }
}

impl Default for ReportCodec {
    fn default() -> Self {
        Self::new(REPORT_SIZE)
    }
}

impl Decoder for ReportCodec {
    type Item = Bytes;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < self.report_size {
            src.reserve(self.report_size - src.len());
            return Ok(None);
        }

        let report = src.split_to(self.report_size);
        let len = report_payload(&report)?.map_or(0, <[u8]>::len);
        let report = report.freeze();
        Ok(Some(
            report.slice(REPORT_HEADER_SIZE..REPORT_HEADER_SIZE + len),
        ))
    }
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;
    use tokio_util::codec::FramedRead;

    use super::*;
    use crate::codec::{encode_report, encode_stream};
    use crate::framer::RecordFramer;
    use crate::observer::NoopObserver;

    #[test]
    fn decodes_one_report_at_a_time() {
        let mut wire = BytesMut::new();
        encode_report(b"abc", REPORT_SIZE, &mut wire).unwrap();
        encode_report(b"", REPORT_SIZE, &mut wire).unwrap();
        wire.extend_from_slice(&[0, 1]);

        let mut codec = ReportCodec::default();
        assert_eq!(codec.decode(&mut wire).unwrap().unwrap().as_ref(), b"abc");
        assert!(codec.decode(&mut wire).unwrap().unwrap().is_empty());
        assert!(codec.decode(&mut wire).unwrap().is_none());
        assert_eq!(wire.len(), 2);
    }

    #[test]
    fn rejects_bad_length() {
        let mut wire = BytesMut::from(&[0u8; REPORT_SIZE][..]);
        wire[1] = 200;

        let err = ReportCodec::default().decode(&mut wire).unwrap_err();
        assert!(matches!(err, FrameError::LengthOutOfRange { len: 200, .. }));
    }

    #[tokio::test]
    async fn framed_read_feeds_framer() {
        let mut stream = vec![0x1C, 0x02];
        stream.extend_from_slice(b"I<UTOD231458907<<<<<<<<<<<<<<<\rLINE2\r");
        stream.extend_from_slice(&[0x03, 0x1D]);
        let mut wire = BytesMut::new();
        encode_stream(&stream, REPORT_SIZE, &mut wire).unwrap();
        let wire = wire.to_vec();

        let mut framed = FramedRead::new(wire.as_slice(), ReportCodec::default());
        let mut framer = RecordFramer::with_observer(NoopObserver);
        let mut captures = Vec::new();
        while let Some(payload) = framed.next().await {
            framer.feed(&payload.unwrap(), |c| captures.push(c));
        }

        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].record_count(), 2);
    }
}
