use std::io::Cursor;
use std::time::Duration;

use bytes::BytesMut;
use mrzread::frame::{encode_stream, FrameError, ReaderConfig, REPORT_SIZE};
use mrzread::icao::{CheckDigitScheme, DecoderConfig, IcaoError, Sex};
use mrzread::transport::{ReportStream, TransportError};
use mrzread::{read_documents, ReadOutcome};

const TD3: [&str; 2] = [
    "P<GBRJOHNSON<<JOHN<<<<<<<<<<<<<<<<<<<<<<<<<<",
    "1234567897GBR8001014M2501017<<<<<<<<<<<<<<02",
];

fn replay_config() -> ReaderConfig {
    ReaderConfig {
        report_size: REPORT_SIZE,
        idle_delay: Duration::ZERO,
    }
}

fn mrz_stream(lines: &[&str]) -> Vec<u8> {
    let mut stream = vec![0x1C, 0x02];
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            stream.push(0x0D);
        }
        stream.extend_from_slice(line.as_bytes());
    }
    stream.extend_from_slice(&[0x0D, 0x03, 0x1D]);
    stream
}

fn reports(stream: &[u8]) -> Vec<u8> {
    let mut dst = BytesMut::new();
    encode_stream(stream, REPORT_SIZE, &mut dst).expect("stream should encode");
    dst.to_vec()
}

fn collect(reports: Vec<u8>, decoder: DecoderConfig) -> Result<Vec<ReadOutcome>, FrameError> {
    let mut outcomes = Vec::new();
    read_documents(
        ReportStream::new(Cursor::new(reports)),
        replay_config(),
        decoder,
        |outcome| outcomes.push(outcome),
    )?;
    Ok(outcomes)
}

#[test]
fn passport_stream_decodes_end_to_end() {
    let outcomes = collect(reports(&mrz_stream(&TD3)), DecoderConfig::default())
        .expect("clean stream should not fail");

    assert_eq!(outcomes.len(), 1);
    let document = outcomes[0].document().expect("passport should decode");
    assert_eq!(document.doc_type, "P");
    assert_eq!(document.country, "GBR");
    assert_eq!(document.number, "123456789");
    assert_eq!(document.surname, "JOHNSON");
    assert_eq!(document.given_name, "JOHN");
    assert_eq!(document.sex, Some(Sex::Male));
    assert_eq!(document.birth.to_string(), "80-01-01");
    assert!(document.check_digits_ok());
}

#[test]
fn mixed_session_keeps_order_and_survives_bad_captures() {
    let mut stream = b"noise".to_vec();
    stream.extend(mrz_stream(&["TOO<SHORT"]));
    stream.extend([0x0E, 0x02]);
    stream.extend(b"%B4111^DOE/JANE^29?");
    stream.push(0x0D);
    stream.extend(b";4111=29?");
    stream.push(0x03);
    stream.extend(mrz_stream(&TD3));

    let outcomes =
        collect(reports(&stream), DecoderConfig::default()).expect("stream should not fail");

    assert_eq!(outcomes.len(), 3);
    assert!(matches!(
        &outcomes[0],
        ReadOutcome::Unrecognized {
            error: IcaoError::UnrecognizedLayout {
                records: 1,
                first_len: 9
            },
            ..
        }
    ));
    match &outcomes[1] {
        ReadOutcome::MagStripe(capture) => {
            // Line breaks carry no meaning on a stripe; tracks stay in one record.
            assert_eq!(capture.lines(), vec!["%B4111^DOE/JANE^29?\r;4111=29?"]);
        }
        other => panic!("expected magnetic stripe, got {other:?}"),
    }
    assert_eq!(outcomes[2].document().map(|d| d.number.as_str()), Some("123456789"));
}

#[test]
fn idle_reports_between_data_are_skipped() {
    let mut all = vec![0u8; REPORT_SIZE];
    all.extend(reports(&mrz_stream(&TD3)));
    all.extend(vec![0u8; REPORT_SIZE * 3]);

    let outcomes = collect(all, DecoderConfig::default()).expect("idle reports are not errors");
    assert_eq!(outcomes.len(), 1);
}

#[test]
fn bad_length_byte_stops_the_stream() {
    let mut all = reports(&mrz_stream(&TD3));
    let mut bad = vec![0u8; REPORT_SIZE];
    bad[1] = 31;
    all.extend(bad);
    all.extend(reports(&mrz_stream(&TD3)));

    let err = collect(all, DecoderConfig::default()).expect_err("length 31 is out of range");
    assert!(matches!(err, FrameError::LengthOutOfRange { len: 31, max: 30 }));
}

#[test]
fn truncated_trailing_report_is_a_transport_error() {
    let mut all = reports(&mrz_stream(&TD3));
    all.extend([0u8, 4, b'A']);

    let err = collect(all, DecoderConfig::default()).expect_err("partial report should fail");
    assert!(matches!(
        err,
        FrameError::Transport(TransportError::TruncatedReport { expected: 32, got: 3 })
    ));
}

#[test]
fn icao_scheme_is_applied_through_the_pipeline() {
    let decoder = DecoderConfig {
        check_digits: CheckDigitScheme::Icao,
    };
    let outcomes = collect(reports(&mrz_stream(&TD3)), decoder).expect("stream should decode");
    let document = outcomes[0].document().expect("passport should decode");
    // Digit-only fields score the same under both schemes.
    assert!(document.number_check_digit_ok);
    assert!(document.birth.check_digit_ok);
}
