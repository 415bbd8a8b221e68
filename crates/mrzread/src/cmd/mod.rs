use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use mrzread::frame::REPORT_SIZE;
use mrzread::icao::CheckDigitScheme;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod parse;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read reports from a device node, replay file or stdin and print each capture.
    Decode(DecodeArgs),
    /// Decode MRZ lines given on the command line.
    Parse(ParseArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Parse(args) => parse::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Check digit scoring, as exposed on the command line.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum CheckDigitsArg {
    /// Low nibble of each byte (what deployed readers validate against).
    LowNibble,
    /// ICAO 9303 character values.
    Icao,
}

impl From<CheckDigitsArg> for CheckDigitScheme {
    fn from(arg: CheckDigitsArg) -> Self {
        match arg {
            CheckDigitsArg::LowNibble => CheckDigitScheme::LowNibble,
            CheckDigitsArg::Icao => CheckDigitScheme::Icao,
        }
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Report source: a hidraw node, a replay file, or `-` for stdin.
    pub path: PathBuf,
    /// Size of one report in bytes.
    #[arg(long, env = "MRZREAD_REPORT_SIZE", default_value_t = REPORT_SIZE)]
    pub report_size: usize,
    /// Pause after an empty report, in milliseconds.
    #[arg(long, env = "MRZREAD_IDLE_DELAY_MS", default_value_t = 100)]
    pub idle_delay_ms: u64,
    /// Exit after printing N captures.
    #[arg(long)]
    pub count: Option<usize>,
    /// Check digit scoring.
    #[arg(long, value_enum, env = "MRZREAD_CHECK_DIGITS", default_value = "low-nibble")]
    pub check_digits: CheckDigitsArg,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// MRZ lines, top to bottom.
    #[arg(required = true)]
    pub lines: Vec<String>,
    /// Check digit scoring.
    #[arg(long, value_enum, env = "MRZREAD_CHECK_DIGITS", default_value = "low-nibble")]
    pub check_digits: CheckDigitsArg,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show build details and the supported layouts.
    #[arg(long)]
    pub extended: bool,
}
