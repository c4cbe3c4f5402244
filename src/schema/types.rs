// src/schema/types.rs

use serde::{ser::SerializeMap, Serialize, Serializer};
use std::{collections::BTreeMap, sync::Arc};

/// Semantic kind of a column, locked from the first row that classifies it.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Number,
    Time,
    Category,
}

/// Axis scale handed to the chart renderer alongside each column.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    Linear,
    Time,
}

impl DataType {
    /// NUMBER → LINEAR, TIME → TIME, CATEGORY → LINEAR
    pub fn scale(self) -> ScaleKind {
        match self {
            DataType::Time => ScaleKind::Time,
            DataType::Number | DataType::Category => ScaleKind::Linear,
        }
    }
}

/// One coerced cell.
///
/// Serializes untagged: numbers and timestamps as JSON numbers, categories as
/// JSON strings.
#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    /// Unix seconds.
    Time(i64),
    Category(String),
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Time(t) => Some(*t as f64),
            CellValue::Category(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Category(s) => Some(s),
            _ => None,
        }
    }

    /// The kind of value this cell holds, independent of its column's locked type.
    pub fn data_type(&self) -> DataType {
        match self {
            CellValue::Number(_) => DataType::Number,
            CellValue::Time(_) => DataType::Time,
            CellValue::Category(_) => DataType::Category,
        }
    }
}

/// A data row after per-cell coercion, keyed by column name in header order.
///
/// The column names are shared between every row of one parse.
#[derive(Debug, PartialEq, Clone)]
pub struct TypedRow {
    columns: Arc<[String]>,
    values: Vec<CellValue>,
}

impl TypedRow {
    pub(crate) fn new(columns: Arc<[String]>, values: Vec<CellValue>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.values[idx])
    }

    /// `(column, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl Serialize for TypedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Everything one parse call produces. Owned by the caller.
#[derive(Debug, Serialize, Clone, Default)]
pub struct ParsedCsv {
    /// Header names, in file order.
    pub columns: Vec<String>,
    pub rows: Vec<TypedRow>,
    pub types: BTreeMap<String, DataType>,
    pub scales: BTreeMap<String, ScaleKind>,
}

impl ParsedCsv {
    /// Columns whose locked type is `ty`, in header order.
    pub fn columns_of(&self, ty: DataType) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| self.types.get(c.as_str()) == Some(&ty))
            .map(String::as_str)
            .collect()
    }
}
