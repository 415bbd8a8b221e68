use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use mrzread::frame::{CaptureReader, FrameError, ReaderConfig, REPORT_HEADER_SIZE};
use mrzread::icao::DecoderConfig;
use mrzread::transport::ReportStream;
use mrzread::DocumentPipeline;
use tracing::info;

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, INTERRUPTED, SUCCESS, USAGE};
use crate::output::{print_outcome, OutputFormat};

/// Largest report whose payload a one-byte length can describe.
const MAX_REPORT_SIZE: usize = REPORT_HEADER_SIZE + u8::MAX as usize;

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    if args.report_size <= REPORT_HEADER_SIZE || args.report_size > MAX_REPORT_SIZE {
        return Err(CliError::new(
            USAGE,
            format!(
                "report size must be between {} and {MAX_REPORT_SIZE}",
                REPORT_HEADER_SIZE + 1
            ),
        ));
    }

    let input = open_input(&args.path)?;
    let config = ReaderConfig {
        report_size: args.report_size,
        idle_delay: Duration::from_millis(args.idle_delay_ms),
    };
    let pipeline = DocumentPipeline::new(DecoderConfig {
        check_digits: args.check_digits.into(),
    });
    let mut reader = CaptureReader::with_config(ReportStream::new(input), config);

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;

    while running.load(Ordering::SeqCst) {
        let capture = match reader.poll_capture() {
            Ok(Some(capture)) => capture,
            Ok(None) => continue,
            Err(FrameError::StreamClosed) => break,
            Err(err) => return Err(frame_error("read failed", err)),
        };

        let lines = capture.lines();
        let outcome = pipeline.process(capture);
        print_outcome(&outcome, &lines, format);
        printed = printed.saturating_add(1);

        if let Some(count) = args.count {
            if printed >= count {
                break;
            }
        }
    }

    info!(
        captures = printed,
        reports = reader.get_ref().reports_read(),
        "decode finished"
    );
    Ok(SUCCESS)
}

fn open_input(path: &Path) -> CliResult<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(std::io::stdin().lock()));
    }
    let file = File::open(path)
        .map_err(|err| io_error(&format!("open {} failed", path.display()), err))?;
    Ok(Box::new(file))
}

/// The first Ctrl-C stops the loop at the next report. A read can block
/// with no report arriving (a quiet FIFO, an unplugged reader), so a second
/// Ctrl-C exits on the spot.
fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        if !running.swap(false, Ordering::SeqCst) {
            std::process::exit(INTERRUPTED);
        }
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
