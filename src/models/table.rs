use crate::error::{ProcessingError, Result};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::fmt;

/// Nullable column storage
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    UInt32(Vec<Option<u32>>),
    Int32(Vec<Option<i32>>),
    Float64(Vec<Option<f64>>),
    Utf8(Vec<Option<String>>),
    Timestamp(Vec<Option<NaiveDateTime>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::UInt32(v) => v.len(),
            ColumnData::Int32(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
            ColumnData::Utf8(v) => v.len(),
            ColumnData::Timestamp(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnData::UInt32(_) => "UInt32",
            ColumnData::Int32(_) => "Int32",
            ColumnData::Float64(_) => "Float64",
            ColumnData::Utf8(_) => "Utf8",
            ColumnData::Timestamp(_) => "Timestamp",
        }
    }

    /// An all-null column of the same type
    fn nulls_like(&self, len: usize) -> Self {
        match self {
            ColumnData::UInt32(_) => ColumnData::UInt32(vec![None; len]),
            ColumnData::Int32(_) => ColumnData::Int32(vec![None; len]),
            ColumnData::Float64(_) => ColumnData::Float64(vec![None; len]),
            ColumnData::Utf8(_) => ColumnData::Utf8(vec![None; len]),
            ColumnData::Timestamp(_) => ColumnData::Timestamp(vec![None; len]),
        }
    }

    fn append(&mut self, other: &ColumnData) -> Result<()> {
        match (self, other) {
            (ColumnData::UInt32(a), ColumnData::UInt32(b)) => a.extend_from_slice(b),
            (ColumnData::Int32(a), ColumnData::Int32(b)) => a.extend_from_slice(b),
            (ColumnData::Float64(a), ColumnData::Float64(b)) => a.extend_from_slice(b),
            (ColumnData::Utf8(a), ColumnData::Utf8(b)) => a.extend_from_slice(b),
            (ColumnData::Timestamp(a), ColumnData::Timestamp(b)) => a.extend_from_slice(b),
            (a, b) => {
                return Err(ProcessingError::DataMerge(format!(
                    "cannot append {} values to a {} column",
                    b.type_name(),
                    a.type_name()
                )))
            }
        }
        Ok(())
    }

    fn is_null(&self, row: usize) -> bool {
        match self {
            ColumnData::UInt32(v) => v.get(row).map_or(true, Option::is_none),
            ColumnData::Int32(v) => v.get(row).map_or(true, Option::is_none),
            ColumnData::Float64(v) => v.get(row).map_or(true, Option::is_none),
            ColumnData::Utf8(v) => v.get(row).map_or(true, Option::is_none),
            ColumnData::Timestamp(v) => v.get(row).map_or(true, Option::is_none),
        }
    }

    /// Render one cell, `None` for null
    pub fn display_value(&self, row: usize) -> Option<String> {
        match self {
            ColumnData::UInt32(v) => v.get(row).copied().flatten().map(|x| x.to_string()),
            ColumnData::Int32(v) => v.get(row).copied().flatten().map(|x| x.to_string()),
            ColumnData::Float64(v) => v.get(row).copied().flatten().map(|x| x.to_string()),
            ColumnData::Utf8(v) => v.get(row).cloned().flatten(),
            ColumnData::Timestamp(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Column-oriented table with an optional row key column held apart from the data columns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HourlyTable {
    index: Option<Column>,
    columns: Vec<Column>,
    num_rows: usize,
}

impl HourlyTable {
    /// The explicit "no rows" marker
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(index: Option<Column>, columns: Vec<Column>) -> Result<Self> {
        let num_rows = index
            .as_ref()
            .map(|c| c.data.len())
            .or_else(|| columns.first().map(|c| c.data.len()))
            .unwrap_or(0);

        for column in index.iter().chain(columns.iter()) {
            if column.data.len() != num_rows {
                return Err(ProcessingError::DataMerge(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name,
                    column.data.len(),
                    num_rows
                )));
            }
        }

        Ok(Self {
            index,
            columns,
            num_rows,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn index(&self) -> Option<&Column> {
        self.index.as_ref()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn float_values(&self, name: &str) -> Option<&[Option<f64>]> {
        match self.column(name).map(|c| &c.data) {
            Some(ColumnData::Float64(values)) => Some(values.as_slice()),
            _ => None,
        }
    }

    pub fn int_values(&self, name: &str) -> Option<&[Option<i32>]> {
        match self.column(name).map(|c| &c.data) {
            Some(ColumnData::Int32(values)) => Some(values.as_slice()),
            _ => None,
        }
    }

    /// Stack tables vertically, aligning columns by name.
    /// Columns missing from a table are null-filled; column order follows first appearance.
    pub fn concat(tables: Vec<HourlyTable>) -> Result<HourlyTable> {
        let tables: Vec<HourlyTable> = tables.into_iter().filter(|t| !t.is_empty()).collect();
        let mut iter = tables.into_iter();
        let mut result = match iter.next() {
            Some(first) => first,
            None => return Ok(HourlyTable::empty()),
        };

        for table in iter {
            result.append(table)?;
        }

        Ok(result)
    }

    fn append(&mut self, other: HourlyTable) -> Result<()> {
        match (&mut self.index, &other.index) {
            (Some(mine), Some(theirs)) if mine.name == theirs.name => {
                mine.data.append(&theirs.data)?
            }
            (None, None) => {}
            _ => {
                return Err(ProcessingError::DataMerge(
                    "tables have different row keys".to_string(),
                ))
            }
        }

        let existing = self.num_rows;
        let incoming = other.num_rows;

        for column in &mut self.columns {
            match other.columns.iter().find(|c| c.name == column.name) {
                Some(theirs) => column.data.append(&theirs.data)?,
                None => {
                    let nulls = column.data.nulls_like(incoming);
                    column.data.append(&nulls)?
                }
            }
        }

        for theirs in other.columns {
            if self.columns.iter().any(|c| c.name == theirs.name) {
                continue;
            }
            let mut data = theirs.data.nulls_like(existing);
            data.append(&theirs.data)?;
            self.columns.push(Column::new(theirs.name, data));
        }

        self.num_rows = existing + incoming;
        Ok(())
    }

    /// Move the row key into the first ordinary column
    pub fn reset_index(mut self) -> Self {
        if let Some(index) = self.index.take() {
            self.columns.insert(0, index);
        }
        self
    }

    pub fn rename_columns<F>(mut self, rename: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        if let Some(index) = self.index.as_mut() {
            index.name = rename(&index.name);
        }
        for column in &mut self.columns {
            column.name = rename(&column.name);
        }
        self
    }

    /// Keep only the first column of each name
    pub fn drop_duplicate_columns(mut self) -> Self {
        let mut seen = HashSet::new();
        self.columns.retain(|c| seen.insert(c.name.clone()));
        self
    }

    /// `name=value` pairs for the non-null cells of one row
    pub fn format_row(&self, row: usize) -> String {
        self.index
            .iter()
            .chain(self.columns.iter())
            .filter(|c| !c.data.is_null(row))
            .filter_map(|c| c.data.display_value(row).map(|v| format!("{}={}", c.name, v)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for HourlyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows x {} columns",
            self.num_rows,
            self.columns.len() + usize::from(self.index.is_some())
        )
    }
}
