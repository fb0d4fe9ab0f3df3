//! Excel importer implementation - first worksheet (.xlsx) → Table

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};

use crate::error::{DealsError, DealsResult};
use crate::transform::dates::{from_excel_serial, iso_date};
use crate::types::{Cell, Table};

/// Reads one worksheet of an .xlsx file as a header + rows table
#[derive(Debug, Clone, Default)]
pub struct ExcelImporter {
    sheet: Option<String>,
}

impl ExcelImporter {
    /// Importer for the first worksheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Importer for a named worksheet
    pub fn with_sheet(sheet: impl Into<String>) -> Self {
        Self {
            sheet: Some(sheet.into()),
        }
    }

    pub fn import(&self, bytes: &[u8]) -> DealsResult<Table> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| DealsError::Import(format!("Failed to open Excel file: {}", e)))?;

        let sheet_name = match &self.sheet {
            Some(name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| DealsError::Import("Workbook has no worksheets".to_string()))?,
        };

        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            DealsError::Import(format!("Failed to read sheet '{}': {}", sheet_name, e))
        })?;

        Ok(self.range_to_table(&range))
    }

    fn range_to_table(&self, range: &Range<Data>) -> Table {
        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Table::default();
        };

        let columns: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(idx, cell)| cell_text(cell).unwrap_or_else(|| format!("Unnamed: {}", idx)))
            .collect();

        let mut table = Table::new(columns);
        for row in rows {
            table.push_row(row.iter().map(cell_text).collect());
        }
        table
    }
}

/// Text form of a cell. Dates become ISO strings, integral floats lose their `.0`.
fn cell_text(cell: &Data) -> Cell {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(format_number(*f)),
        Data::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => {
            iso_date(from_excel_serial(dt.as_f64())).or_else(|| Some(dt.as_f64().to_string()))
        }
        other => Some(other.to_string()),
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
