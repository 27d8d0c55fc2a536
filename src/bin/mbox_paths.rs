//! mbox-paths: Suggest mapping paths from a sample payload
//!
//! Lists every plain and JSONPath address in a sample object, for picking
//! the backend side of a field mapping.
//!
//! Usage:
//!   # Paths of a detail payload
//!   mbox-paths detail.json
//!
//!   # Paths of the first record of a list response
//!   curl -s https://api.example.com/list | mbox-paths --list
//!
//!   # One path per line instead of a JSON array
//!   mbox-paths --lines detail.json

use anyhow::{Context, Result};
use clap::Parser;
use mbox_mapper::discovery::{discover_list_paths, discover_paths};
use mbox_mapper::ListPage;
use serde_json::Value;
use std::fs::File;
use std::io::{stdin, BufReader, Read};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mbox-paths")]
#[command(about = "Suggest mapping paths from a sample JSON payload", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Treat the input as a list response and sample its first record
    #[arg(long)]
    list: bool,

    /// Print one path per line
    #[arg(long, conflicts_with = "compact")]
    lines: bool,

    /// Compact output (no pretty-printing)
    #[arg(long)]
    compact: bool,

    /// Log filter, e.g. "debug"
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut reader: Box<dyn Read> = if let Some(file_path) = &args.input {
        Box::new(BufReader::new(
            File::open(file_path).with_context(|| format!("Failed to open input: {}", file_path))?,
        ))
    } else {
        Box::new(BufReader::new(stdin()))
    };

    let mut content = Vec::new();
    reader.read_to_end(&mut content).context("Failed to read input")?;
    let sample: Value = serde_json::from_slice(&content).context("Failed to parse JSON input")?;

    let paths = if args.list {
        let page = ListPage::from_value(sample).context("Failed to unwrap list response")?;
        discover_list_paths(&page)
    } else {
        discover_paths(&sample)
    };

    if paths.is_empty() {
        warn!("no addressable paths found in input");
    }

    if args.lines {
        for path in &paths {
            println!("{}", path);
        }
        return Ok(());
    }

    let output = if args.compact {
        serde_json::to_string(&paths)?
    } else {
        serde_json::to_string_pretty(&paths)?
    };
    println!("{}", output);

    Ok(())
}
