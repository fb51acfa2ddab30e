//! Command-line converter from SAM to XML
//!
//! Usage:
//!   sam2xml `<path>` [--format `<format>`] [--ordered-lists]

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sam::{IdentifierMatching, OutputFormat, SamConfig, SamError, SamParser};

#[derive(Debug, Parser)]
#[command(name = "sam2xml", version, about = "Convert a SAM document to XML")]
struct Args {
    /// Path to the SAM file
    path: PathBuf,

    /// Output format
    #[arg(long, short, default_value = "xml")]
    format: String,

    /// Render numbered lists as `ol` instead of `ul`
    #[arg(long)]
    ordered_lists: bool,
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let format: OutputFormat = args.format.parse().map_err(SamError::from)?;

    let mut config = SamConfig::default();
    if args.ordered_lists {
        config = config.with_numbered_list_element("ol");
    }
    let tree = SamParser::with_config(config)
        .parse_file(&args.path)
        .map_err(SamError::from)?;

    let serializer = format.serializer(IdentifierMatching::detect());
    let mut out = BufWriter::new(io::stdout().lock());
    for fragment in serializer.fragments(&tree) {
        out.write_all(fragment.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
