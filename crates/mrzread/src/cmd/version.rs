use mrzread::icao::layout::LAYOUTS;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("mrzread {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: mrzread");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("MRZREAD_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!("features: async={}, cli=true", cfg!(feature = "async"));
    println!("layouts:");
    for layout in LAYOUTS {
        println!(
            "  {:<7} {} x {}",
            layout.kind.name(),
            layout.records,
            layout.first_len
        );
    }

    Ok(SUCCESS)
}
