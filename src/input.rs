//! Tabular input files (CSV or XLSX)

use std::path::Path;

use crate::error::{DealsError, DealsResult};
use crate::excel::ExcelImporter;
use crate::types::{Cell, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Xlsx,
}

impl InputFormat {
    /// `.xlsx`/`.xlsm` are workbooks, everything else is read as CSV
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("xlsx") | Some("xlsm") => InputFormat::Xlsx,
            _ => InputFormat::Csv,
        }
    }
}

/// Raw bytes of one uploaded file plus how to read them
#[derive(Debug, Clone)]
pub struct InputFile {
    name: String,
    format: InputFormat,
    bytes: Vec<u8>,
}

impl InputFile {
    pub fn read<P: AsRef<Path>>(path: P) -> DealsResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            DealsError::Import(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(Self {
            name: path.display().to_string(),
            format: InputFormat::from_path(path),
            bytes,
        })
    }

    pub fn from_bytes(name: impl Into<String>, format: InputFormat, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            format,
            bytes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> InputFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Parse into a table (first worksheet for XLSX)
    pub fn to_table(&self) -> DealsResult<Table> {
        match self.format {
            InputFormat::Csv => read_csv(&self.bytes),
            InputFormat::Xlsx => ExcelImporter::new().import(&self.bytes),
        }
    }
}

/// Header row first; empty fields are nulls; ragged rows are allowed
pub fn read_csv(bytes: &[u8]) -> DealsResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let mut table = Table::new(headers.iter());

    for record in reader.records() {
        let record = record?;
        let row: Vec<Cell> = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    None
                } else {
                    Some(field.to_string())
                }
            })
            .collect();
        table.push_row(row);
    }

    Ok(table)
}
