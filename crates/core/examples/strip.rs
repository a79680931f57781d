use std::{fs, path::PathBuf};

use clap::Parser;
use overpassql_strip::{LengthUnit, MAX_CONTENT_SIZE, StripConfig, StripOptions, strip::strip};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Unit {
    Chars,
    Utf16,
}

impl From<Unit> for LengthUnit {
    fn from(value: Unit) -> Self {
        match value {
            Unit::Chars => LengthUnit::Chars,
            Unit::Utf16 => LengthUnit::Utf16,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "strip")]
#[command(about = "Strip comments and/or redundant whitespace from an OverpassQL file", long_about = None)]
struct Args {
    /// Path to the OverpassQL file to transform
    input: PathBuf,

    /// Output path for transformed source (defaults to stdout)
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Remove comments (comments containing "@preserve" are kept)
    #[arg(long, short)]
    comments: bool,

    /// Collapse redundant whitespace outside comments
    #[arg(long, short)]
    whitespace: bool,

    /// Reject inputs longer than this
    #[arg(long, default_value_t = MAX_CONTENT_SIZE)]
    max_content_size: usize,

    /// Unit used to measure input length against --max-content-size
    #[arg(long, value_enum, default_value_t = Unit::Chars)]
    length_unit: Unit,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let source = fs::read_to_string(&args.input)?;

    let options = StripOptions {
        comments: args.comments,
        whitespace: args.whitespace,
    };
    let cfg = StripConfig {
        max_content_size: args.max_content_size,
        length_unit: args.length_unit.into(),
    };

    info!(input = %args.input.display(), ?options, "stripping");
    let out_code = strip(&source, &options, &cfg)?;

    match &args.out {
        None => {
            print!("{out_code}");
        }
        Some(out) => {
            fs::write(out, out_code)?;
        }
    }

    Ok(())
}
