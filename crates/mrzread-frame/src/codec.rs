use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};

/// Report size used by the reader's HID interface.
pub const REPORT_SIZE: usize = 32;

/// Report header: reserved (1) + payload length (1) = 2 bytes.
pub const REPORT_HEADER_SIZE: usize = 2;

/// Opens an MRZ capture (FS, STX).
pub const MRZ_START: [u8; 2] = [0x1C, 0x02];

/// Closes an MRZ capture (CR, ETX, GS).
pub const MRZ_END: [u8; 3] = [0x0D, 0x03, 0x1D];

/// Separates MRZ lines (CR).
pub const LINE_BREAK: u8 = 0x0D;

/// Opens a magnetic-stripe capture (SO, STX).
pub const MAG_STRIPE_START: [u8; 2] = [0x0E, 0x02];

/// Closes a magnetic-stripe capture (ETX).
pub const MAG_STRIPE_END: u8 = 0x03;

/// Largest payload a report of `report_size` bytes can carry.
///
/// The length field is a single byte, so payloads never exceed 255 bytes.
pub fn max_payload(report_size: usize) -> usize {
    report_size
        .saturating_sub(REPORT_HEADER_SIZE)
        .min(u8::MAX as usize)
}

/// Extract the payload carried by one report.
///
/// Report layout:
/// ```text
/// ┌──────────────┬──────────────┬──────────────────────────┐
/// │ Reserved (1B)│ Length (1B)  │ Payload (Length bytes)   │
/// └──────────────┴──────────────┴──────────────────────────┘
/// ```
///
/// Returns `Ok(None)` when the report carries no data; the caller should
/// wait before reading again.
pub fn report_payload(report: &[u8]) -> Result<Option<&[u8]>> {
    if report.len() < REPORT_HEADER_SIZE {
        return Err(FrameError::ReportTooShort { size: report.len() });
    }

    let len = report[1] as usize;
    if len == 0 {
        return Ok(None);
    }

    let max = report.len() - REPORT_HEADER_SIZE;
    if len > max {
        return Err(FrameError::LengthOutOfRange { len, max });
    }

    Ok(Some(&report[REPORT_HEADER_SIZE..REPORT_HEADER_SIZE + len]))
}

/// Encode one payload into a zero-padded report of `report_size` bytes.
pub fn encode_report(payload: &[u8], report_size: usize, dst: &mut BytesMut) -> Result<()> {
    if report_size < REPORT_HEADER_SIZE {
        return Err(FrameError::ReportTooShort { size: report_size });
    }
    let max = max_payload(report_size);
    if payload.len() > max {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max,
        });
    }

    dst.reserve(report_size);
    dst.put_u8(0);
    dst.put_u8(payload.len() as u8);
    dst.put_slice(payload);
    dst.put_bytes(0, report_size - REPORT_HEADER_SIZE - payload.len());
    Ok(())
}

/// Split a byte stream into as many full reports as it takes.
///
/// Returns the number of reports written.
pub fn encode_stream(stream: &[u8], report_size: usize, dst: &mut BytesMut) -> Result<usize> {
    let max = max_payload(report_size);
    if max == 0 {
        return Err(FrameError::ReportTooShort { size: report_size });
    }

    let mut reports = 0usize;
    for chunk in stream.chunks(max) {
        encode_report(chunk, report_size, dst)?;
        reports += 1;
    }
    Ok(reports)
}
