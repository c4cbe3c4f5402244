use anyhow::{anyhow, Context, Result};
use clap::Parser;
use plotfeed::{
    format_value, limit, parse_path, DataType, ParseOptions, ParsedCsv, TypedRow, DEFAULT_BUDGET,
};
use rayon::prelude::*;
use serde_json::{json, Map, Value};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "plotfeed")]
#[command(about = "Parse CSV/TSV files into typed, chart-ready JSON")]
struct Args {
    /// Input files or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Field delimiter (default: tab for .tsv/.tab, comma otherwise)
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Stop parsing each file after this many data rows
    #[arg(long)]
    max_rows: Option<usize>,

    /// Maximum number of points per file
    #[arg(short, long, default_value_t = DEFAULT_BUDGET)]
    budget: usize,

    /// Start of the row window (inclusive); needs --max-index
    #[arg(long, requires = "max_index")]
    min_index: Option<usize>,

    /// End of the row window (exclusive); needs --min-index
    #[arg(long, requires = "min_index")]
    max_index: Option<usize>,

    /// Emit every parsed row
    #[arg(long)]
    no_limit: bool,

    /// Emit formatted display labels instead of raw values
    #[arg(long)]
    labels: bool,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries the JSON, logs go to stderr
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let delimiter = args.delimiter.map(delimiter_byte).transpose()?;
    let paths = expand_inputs(&args.inputs)?;
    info!("{} input files", paths.len());

    let results: Vec<(PathBuf, Result<Value>)> = paths
        .into_par_iter()
        .map(|path| {
            let res = render_file(&path, delimiter, &args);
            (path, res)
        })
        .collect();

    let stdout = io::stdout();
    let failures = write_results(results, args.pretty, stdout.lock())?;

    if failures > 0 {
        return Err(anyhow!("{failures} input(s) failed"));
    }
    info!("all done");
    Ok(())
}

/// Write one JSON document per successful input, log the rest.
///
/// Returns how many inputs failed.
fn write_results<W: Write>(
    results: Vec<(PathBuf, Result<Value>)>,
    pretty: bool,
    mut out: W,
) -> Result<usize> {
    let mut failures = 0usize;
    for (path, res) in results {
        match res {
            Ok(payload) => {
                if pretty {
                    serde_json::to_writer_pretty(&mut out, &payload)?;
                } else {
                    serde_json::to_writer(&mut out, &payload)?;
                }
                writeln!(out)?;
            }
            Err(e) => {
                error!("{} failed: {:#}", path.display(), e);
                failures += 1;
            }
        }
    }
    out.flush()?;
    Ok(failures)
}

fn delimiter_byte(c: char) -> Result<u8> {
    u8::try_from(c)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| anyhow!("delimiter must be a single ASCII character, got {c:?}"))
}

/// Expand glob patterns; a literal path is its own single match.
fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in inputs {
        let before = paths.len();
        for entry in glob::glob(pattern).with_context(|| format!("bad pattern {pattern}"))? {
            paths.push(entry.with_context(|| format!("reading match of {pattern}"))?);
        }
        if paths.len() == before {
            return Err(anyhow!("no files match {pattern}"));
        }
    }
    Ok(paths)
}

fn render_file(path: &Path, delimiter: Option<u8>, args: &Args) -> Result<Value> {
    let start = Instant::now();
    let mut opts = ParseOptions::for_path(path);
    if let Some(d) = delimiter {
        opts.delimiter = d;
    }
    opts.max_rows = args.max_rows;

    let parsed = parse_path(path, &opts)?;
    let rows = if args.no_limit {
        parsed.rows.clone()
    } else {
        limit(&parsed.rows, args.min_index, args.max_index, args.budget)
    };
    info!(
        path = %path.display(),
        parsed = parsed.rows.len(),
        emitted = rows.len(),
        time_columns = ?parsed.columns_of(DataType::Time),
        elapsed = ?start.elapsed(),
        "rendered"
    );

    Ok(payload(path, &parsed, &rows, args.labels))
}

fn payload(path: &Path, parsed: &ParsedCsv, rows: &[TypedRow], labels: bool) -> Value {
    let rows: Value = if labels {
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|(column, value)| (column.to_string(), Value::String(format_value(value))))
                    .collect::<Map<String, Value>>()
                    .into()
            })
            .collect::<Vec<Value>>()
            .into()
    } else {
        json!(rows)
    };

    json!({
        "source": path.display().to_string(),
        "types": parsed.types,
        "scales": parsed.scales,
        "row_count": parsed.rows.len(),
        "rows": rows,
    })
}
