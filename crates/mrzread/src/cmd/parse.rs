use mrzread::frame::{Capture, CaptureKind};
use mrzread::icao::DecoderConfig;
use mrzread::DocumentPipeline;

use crate::cmd::ParseArgs;
use crate::exit::{CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_outcome, OutputFormat};

pub fn run(args: ParseArgs, format: OutputFormat) -> CliResult<i32> {
    let pipeline = DocumentPipeline::new(DecoderConfig {
        check_digits: args.check_digits.into(),
    });

    let lines = args.lines;
    let capture = Capture::new(CaptureKind::Mrz, lines.iter().map(|l| l.clone().into_bytes()));
    let outcome = pipeline.process(capture);
    print_outcome(&outcome, &lines, format);

    if outcome.is_unrecognized() {
        Ok(DATA_INVALID)
    } else {
        Ok(SUCCESS)
    }
}
