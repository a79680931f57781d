use std::{fs, path::PathBuf};

use clap::Parser;
use overpassql_strip::{StripConfig, StripError, strip_comments, strip_whitespace};

#[derive(Parser, Debug)]
#[command(name = "fixtures")]
#[command(about = "Create or validate fixture files", long_about = None)]
struct Args {
    /// Write fixtures instead of validating them
    #[arg(long, short)]
    write: bool,

    /// Path to the fixtures directory (defaults to "./fixtures")
    #[arg(long, default_value = "fixtures")]
    dir: PathBuf,
}

/// Output suffix and the transform that produces it.
type Transform = fn(&str, &StripConfig) -> Result<String, StripError>;

const OUTPUTS: [(&str, Transform); 2] = [
    ("whitespace", strip_whitespace),
    ("comments", strip_comments),
];

/// Returns the fixture basename for an input file, or `None` for outputs and other files.
fn input_basename(filename: &str) -> Option<&str> {
    let basename = filename.strip_suffix(".overpassql")?;
    if OUTPUTS
        .iter()
        .any(|(suffix, _)| basename.ends_with(&format!(".{suffix}")))
    {
        return None;
    }
    Some(basename)
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let cfg = StripConfig::default();

    // Read all files in the fixtures directory
    let mut input_files = Vec::new();
    for entry in fs::read_dir(&args.dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or("invalid filename")?;
        if input_basename(filename).is_some() {
            input_files.push(path);
        }
    }

    input_files.sort();

    let mut mismatches = Vec::new();
    println!(
        "{} fixtures...",
        if args.write { "Creating" } else { "Validating" }
    );

    for input_path in &input_files {
        let filename = input_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or("invalid filename")?;
        let basename = input_basename(filename).ok_or("not a fixture input")?;

        let source = fs::read_to_string(input_path)?;

        for (suffix, transform) in OUTPUTS {
            let code = transform(&source, &cfg)?;
            let out_path = args.dir.join(format!("{basename}.{suffix}.overpassql"));

            if args.write {
                fs::write(&out_path, &code)?;
                println!("  Created {}", out_path.display());
            } else if !out_path.exists() {
                mismatches.push(format!(
                    "{filename}: missing output file {}",
                    out_path.display()
                ));
            } else if fs::read(&out_path)? != code.as_bytes() {
                mismatches.push(format!("{filename}: {suffix} mismatch"));
            }
        }

        if !args.write && !mismatches.iter().any(|m| m.starts_with(filename)) {
            println!("  ✓ {filename}");
        }
    }

    if !mismatches.is_empty() {
        eprintln!("\nValidation failed:");
        for mismatch in &mismatches {
            eprintln!("  ✗ {mismatch}");
        }
        return Err(format!("{} validation error(s)", mismatches.len()).into());
    }

    println!("\nDone with {} fixtures.", input_files.len());

    Ok(())
}
