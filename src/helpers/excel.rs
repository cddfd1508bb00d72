use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use tracing::info;

use crate::error::{Result, TimetableError};

/// A single spreadsheet cell, reduced to the shapes the pipeline cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl CellValue {
    /// Blank cells and whitespace-only strings count as gaps in a column.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            CellValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Display form used for table cells. Integral floats drop the trailing
    /// `.0` so room numbers read `101` rather than `101.0`.
    pub fn to_display(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => {
                if f.is_finite() && f.fract() == 0.0 {
                    format!("{}", *f as i64)
                } else {
                    f.to_string()
                }
            }
            CellValue::String(s) => s.trim().to_string(),
        }
    }
}

fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

/// A loaded worksheet: ordered, normalized column names plus a row-major
/// cell grid (the header row is not part of `rows`).
#[derive(Debug, Clone, Default)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl DataTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at (row, named column); `None` when the column is absent or the
    /// row is out of range, `Null` when the row is shorter than the header.
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        Some(self.rows.get(row)?.get(idx).unwrap_or(&CellValue::Null))
    }

    /// Values of one column, in row order.
    pub fn column_values(&self, index: usize) -> Vec<&CellValue> {
        self.rows
            .iter()
            .map(|row| row.get(index).unwrap_or(&CellValue::Null))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }
}

/// Parse uploaded xlsx/xls bytes into a [`DataTable`].
///
/// Reads the first worksheet; its first row becomes the column names,
/// trimmed and lowercased. Any parse failure is reported as
/// [`TimetableError::Load`] with the underlying message.
pub fn load_table(bytes: &[u8]) -> Result<DataTable> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| TimetableError::Load(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| TimetableError::Load("workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| TimetableError::Load(e.to_string()))?;

    let mut row_iter = range.rows();
    let columns: Vec<String> = match row_iter.next() {
        Some(header) => header
            .iter()
            .map(|cell| data_to_cell_value(cell).to_display().trim().to_lowercase())
            .collect(),
        None => {
            return Err(TimetableError::Load(format!(
                "sheet '{sheet_name}' is empty"
            )));
        }
    };

    let rows: Vec<Vec<CellValue>> = row_iter
        .map(|row| row.iter().map(data_to_cell_value).collect())
        .collect();

    info!(
        "Loaded sheet '{}' with {} columns and {} data rows",
        sheet_name,
        columns.len(),
        rows.len()
    );

    Ok(DataTable { columns, rows })
}
