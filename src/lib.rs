pub mod format;
pub mod limit;
pub mod parse;
pub mod schema;

pub use format::{format_label, format_str, format_value};
pub use limit::{limit, DEFAULT_BUDGET};
pub use parse::{parse, parse_path, parse_reader, parse_with, ParseOptions, TypedCsvParser};
pub use schema::{CellValue, DataType, ParsedCsv, ScaleKind, TypedRow};
