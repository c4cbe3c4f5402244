pub mod types;

pub use types::{CellValue, DataType, ParsedCsv, ScaleKind, TypedRow};
