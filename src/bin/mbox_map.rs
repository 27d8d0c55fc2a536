//! mbox-map: Apply a field mapping to a list response
//!
//! Reads a list envelope (`{"code": 200, "data": {"list": [...]}}`), maps
//! every record to a normalized item and prints the items as JSON.
//!
//! Usage:
//!   # Map with the default card mapping
//!   mbox-map response.json
//!
//!   # Map with a custom mapping file
//!   curl -s https://api.example.com/list | mbox-map --mapping mapping.json
//!
//!   # Chart registration, with the extracted series for each item
//!   mbox-map --component chart --charts response.json

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use mbox_mapper::chart::ChartView;
use mbox_mapper::{ComponentType, FieldMapping, ListPage, MappingEngine, PathResolver};
use serde_json::{json, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mbox-map")]
#[command(about = "Map a list response into normalized items", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// JSON file holding the field mapping (attribute -> key or JSONPath)
    #[arg(long, short = 'm')]
    mapping: Option<String>,

    /// Component type whose default mapping is used when --mapping is omitted
    #[arg(long, default_value = "card")]
    component: String,

    /// Attach the chart kind and extracted series to every item
    #[arg(long)]
    charts: bool,

    /// Compact output (no pretty-printing)
    #[arg(long)]
    compact: bool,

    /// Log filter, e.g. "debug" or "mbox_mapper=trace"
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

    let mapping = load_mapping(args.mapping.as_deref(), &args.component)?;
    let resolver = PathResolver::new();
    for (attribute, path) in mapping.iter() {
        if let Some(problem) = resolver.validate(path) {
            warn!(attribute, path, %problem, "mapping entry will resolve to nothing");
        }
    }

    let envelope = read_input(args.input.as_deref())?;
    let page = ListPage::from_value(envelope).context("Failed to unwrap list response")?;
    info!(records = page.items.len(), total = page.total, "decoded list page");

    let engine = MappingEngine::new(mapping);
    let items = engine.map_list(&page.items);

    let output: Vec<Value> = if args.charts {
        items
            .iter()
            .map(|item| {
                let chart = ChartView::from_item(item, engine.mapping());
                json!({ "item": item, "chart": chart })
            })
            .collect()
    } else {
        items
            .iter()
            .map(|item| serde_json::to_value(item).context("Failed to serialize item"))
            .collect::<Result<_>>()?
    };

    let rendered = if args.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{}", rendered);

    Ok(())
}

fn load_mapping(path: Option<&str>, component: &str) -> Result<FieldMapping> {
    let Some(path) = path else {
        let component: ComponentType = component.parse().unwrap_or_default();
        info!(%component, "using default mapping");
        return Ok(FieldMapping::default_for(component));
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read mapping file: {}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse mapping file: {}", path))
}

/// Read the whole input and decode it, trying SIMD parsing first
fn read_input(path: Option<&str>) -> Result<Value> {
    let reader = if let Some(file_path) = path {
        let file = File::open(file_path)
            .with_context(|| format!("Failed to open input: {}", file_path))?;
        Box::new(BufReader::new(file)) as Box<dyn Read>
    } else {
        Box::new(std::io::stdin()) as Box<dyn Read>
    };

    let mut content = Vec::new();
    BufReader::new(reader)
        .read_to_end(&mut content)
        .context("Failed to read input")?;

    // simd-json parses in place, so keep the original bytes for the fallback
    let mut scratch = content.clone();
    match simd_json::serde::from_slice::<Value>(&mut scratch) {
        Ok(value) => Ok(value),
        Err(_) => serde_json::from_slice(&content).context("Failed to parse JSON input"),
    }
}
