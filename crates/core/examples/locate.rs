use std::{fs, path::PathBuf};

use clap::Parser;
use overpassql_strip::{CommentKind, StripConfig, locate::locate_comments};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "locate")]
#[command(about = "Print the comment spans found in an OverpassQL file", long_about = None)]
struct Args {
    /// Path to the OverpassQL file to scan
    input: PathBuf,

    /// Only print comments marked with @preserve
    #[arg(long, short)]
    preserved: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let source = fs::read_to_string(&args.input)?;
    let spans = locate_comments(&source, &StripConfig::default())?;

    for span in spans.iter().filter(|s| !args.preserved || s.preserved) {
        let kind = match span.kind {
            CommentKind::Line => "line",
            CommentKind::Block => "block",
        };
        let marker = if span.preserved { " preserve" } else { "" };
        println!("{}..{} {kind}{marker} {:?}", span.start, span.end, span.text);
    }

    Ok(())
}
