// src/parse/mod.rs
pub mod classify;
pub mod date_parser;

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use std::{
    collections::{btree_map::Entry, BTreeMap},
    fs::File,
    io::{BufReader, Read},
    path::Path,
    sync::Arc,
};
use tracing::{debug, trace, warn};

use crate::schema::{DataType, ParsedCsv, ScaleKind, TypedRow};
pub use classify::classify_cell;

/// How the delimited text is tokenized and how much of it is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Single-byte field separator.
    pub delimiter: u8,
    /// Stop after this many data rows; the rest of the input is not read.
    pub max_rows: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            max_rows: None,
        }
    }
}

impl ParseOptions {
    /// Tab for `.tsv`/`.tab` files, comma for everything else.
    pub fn for_path<P: AsRef<Path>>(path: P) -> Self {
        let delimiter = match path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("tsv") | Some("tab") => b'\t',
            _ => b',',
        };
        Self {
            delimiter,
            ..Self::default()
        }
    }
}

/// Push-driven row consumer: feed it records one at a time, then `finalize`.
///
/// Column types and scales are written once per column, by the first row
/// that reaches it. Every cell is still classified on its own, so a column
/// locked as NUMBER can hold a category value in a later row.
pub struct TypedCsvParser {
    columns: Arc<[String]>,
    rows: Vec<TypedRow>,
    types: BTreeMap<String, DataType>,
    scales: BTreeMap<String, ScaleKind>,
}

impl TypedCsvParser {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            columns: headers.into(),
            rows: Vec::new(),
            types: BTreeMap::new(),
            scales: BTreeMap::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Classify and coerce one data row.
    ///
    /// Fails without touching any state if the row is not exactly as wide as
    /// the header.
    pub fn push_record<'a, I>(&mut self, record: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let raw: Vec<&str> = record.into_iter().collect();
        if raw.len() != self.columns.len() {
            bail!(
                "row {} has {} fields, header has {}",
                self.rows.len() + 1,
                raw.len(),
                self.columns.len()
            );
        }

        let columns = Arc::clone(&self.columns);
        let mut values = Vec::with_capacity(raw.len());
        for (name, cell) in columns.iter().zip(raw) {
            let value = classify_cell(cell);
            self.lock_column(name, value.data_type());
            values.push(value);
        }
        self.rows.push(TypedRow::new(columns, values));
        Ok(())
    }

    fn lock_column(&mut self, name: &str, ty: DataType) {
        if let Entry::Vacant(slot) = self.types.entry(name.to_string()) {
            trace!(column = name, ?ty, "locked column type");
            slot.insert(ty);
            self.scales.insert(name.to_string(), ty.scale());
        }
    }

    pub fn finalize(self) -> ParsedCsv {
        ParsedCsv {
            columns: self.columns.to_vec(),
            rows: self.rows,
            types: self.types,
            scales: self.scales,
        }
    }
}

/// Parse comma-delimited text whose first line is the header.
pub fn parse(text: &str) -> Result<ParsedCsv> {
    parse_with(text, &ParseOptions::default())
}

pub fn parse_with(text: &str, opts: &ParseOptions) -> Result<ParsedCsv> {
    parse_reader(text.as_bytes(), opts)
}

/// Stream rows out of `reader` through a [`TypedCsvParser`].
///
/// A row whose field count differs from the header fails the whole parse.
/// Blank lines are skipped by the tokenizer and do not count as data rows.
pub fn parse_reader<R: Read>(reader: R, opts: &ParseOptions) -> Result<ParsedCsv> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(opts.delimiter)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("reading CSV header row")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut parser = TypedCsvParser::new(headers);
    let mut record = StringRecord::new();
    loop {
        if opts.max_rows.is_some_and(|max| parser.row_count() >= max) {
            debug!(rows = parser.row_count(), "row limit reached, stopping early");
            break;
        }
        let more = rdr
            .read_record(&mut record)
            .with_context(|| format!("CSV parse error at data row {}", parser.row_count() + 1))?;
        if !more {
            break;
        }
        parser.push_record(record.iter())?;
    }

    let parsed = parser.finalize();
    if parsed.rows.is_empty() && !parsed.columns.is_empty() {
        warn!(columns = parsed.columns.len(), "CSV has a header but no data rows");
    }
    debug!(
        rows = parsed.rows.len(),
        columns = parsed.columns.len(),
        "parsed CSV"
    );
    Ok(parsed)
}

/// Open a local file and parse it.
#[tracing::instrument(level = "info", skip(path, opts), fields(path = %path.as_ref().display()))]
pub fn parse_path<P: AsRef<Path>>(path: P, opts: &ParseOptions) -> Result<ParsedCsv> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path.as_ref()))?;
    parse_reader(BufReader::new(file), opts)
        .with_context(|| format!("Failed to parse CSV file: {:?}", path.as_ref()))
}
