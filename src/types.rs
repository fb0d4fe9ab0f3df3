use crate::error::{DealsError, DealsResult};
use std::collections::HashMap;
use std::io::Write;

/// Placeholder written wherever a value is missing.
pub const PLACEHOLDER: &str = "-";

/// A single cell. `None` is a null (empty field in the source file).
pub type Cell = Option<String>;

//==============================================================================
// Table
//==============================================================================

/// Ordered-column, row-major table of text cells.
///
/// Every row has exactly `columns.len()` cells: short rows are padded with
/// nulls and long rows are truncated when pushed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given header
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(columns.len());
        for (idx, name) in columns.iter().enumerate() {
            // First header wins when a file repeats a column name
            index.entry(name.clone()).or_insert(idx);
        }
        Self {
            columns,
            index,
            rows: Vec::new(),
        }
    }

    /// Append a row, normalizing its width to the header
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Names from `required` that this table lacks, in `required` order
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| !self.has_column(name))
            .map(|name| name.to_string())
            .collect()
    }

    /// Cell text at (row, column name); `None` for nulls or unknown columns
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col)?.as_deref()
    }

    /// Strict projection onto `columns`, in that order.
    ///
    /// Fails with [`DealsError::MissingColumns`] naming every absent column.
    pub fn select(&self, source_name: &str, columns: &[&str]) -> DealsResult<Table> {
        let missing = self.missing_columns(columns);
        if !missing.is_empty() {
            return Err(DealsError::missing_columns(source_name, missing));
        }

        let positions: Vec<usize> = columns
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();

        let mut projected = Table::new(columns.iter().copied());
        for row in &self.rows {
            projected.push_row(positions.iter().map(|&idx| row[idx].clone()).collect());
        }
        Ok(projected)
    }

    /// Write the table as CSV (header row first). Nulls become empty fields.
    pub fn write_csv<W: Write>(&self, writer: W) -> DealsResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for row in &self.rows {
            csv_writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// CSV rendering as a string
    pub fn to_csv_string(&self) -> DealsResult<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| DealsError::Export(e.to_string()))
    }

    /// Rows as JSON objects keyed by column name, nulls as JSON null
    pub fn to_json_records(&self, limit: usize) -> serde_json::Value {
        let records = self
            .rows
            .iter()
            .take(limit)
            .map(|row| {
                let object: serde_json::Map<String, serde_json::Value> = self
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(name, cell)| {
                        let value = match cell {
                            Some(text) => serde_json::Value::String(text.clone()),
                            None => serde_json::Value::Null,
                        };
                        (name.clone(), value)
                    })
                    .collect();
                serde_json::Value::Object(object)
            })
            .collect();
        serde_json::Value::Array(records)
    }
}

//==============================================================================
// Deliverables
//==============================================================================

/// Audience-specific projection of the cleaned deal data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliverableKind {
    Internal,
    Client,
    Zinnov,
}

impl DeliverableKind {
    pub const ALL: [DeliverableKind; 3] = [
        DeliverableKind::Internal,
        DeliverableKind::Client,
        DeliverableKind::Zinnov,
    ];

    /// Display name ("Internal", "Client", "Zinnov")
    pub fn label(&self) -> &'static str {
        match self {
            DeliverableKind::Internal => "Internal",
            DeliverableKind::Client => "Client",
            DeliverableKind::Zinnov => "Zinnov",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            DeliverableKind::Internal => "internal",
            DeliverableKind::Client => "client",
            DeliverableKind::Zinnov => "zinnov",
        }
    }

    /// Fixed output columns of this deliverable, in output order
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            DeliverableKind::Internal => &INTERNAL_COLUMNS,
            DeliverableKind::Client => &CLIENT_COLUMNS,
            DeliverableKind::Zinnov => &ZINNOV_COLUMNS,
        }
    }

    /// `internal_deliverable.csv`, ...
    pub fn csv_file_name(&self) -> String {
        format!("{}_deliverable.csv", self.slug())
    }

    /// `deals_internal_formatted.xlsx`, ...
    pub fn xlsx_file_name(&self) -> String {
        format!("deals_{}_formatted.xlsx", self.slug())
    }
}

impl std::fmt::Display for DeliverableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for DeliverableKind {
    type Err = DealsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "internal" => Ok(DeliverableKind::Internal),
            "client" => Ok(DeliverableKind::Client),
            "zinnov" => Ok(DeliverableKind::Zinnov),
            other => Err(DealsError::Config(format!(
                "Unknown deliverable '{}' (expected internal, client or zinnov)",
                other
            ))),
        }
    }
}

pub const INTERNAL_COLUMNS: [&str; 16] = [
    "Deal Id",
    "Client Name",
    "Draup Verticals",
    "Provider Name",
    "Client MSA",
    "Provider MSA",
    "Headcount Range",
    "Description",
    "Formatted Start Date",
    "Business Function",
    "Functional Workload",
    "Digital Product",
    "Skills",
    "Digital Technology Evidence",
    "Headcount",
    "Deal Start Date",
];

pub const CLIENT_COLUMNS: [&str; 11] = [
    "Deal Id",
    "Client Name",
    "Draup Verticals",
    "Provider Name",
    "Provider MSA",
    "Description",
    "Formatted Start Date",
    "Functional Workload",
    "Digital Product",
    "Skills",
    "Digital Technology Evidence",
];

pub const ZINNOV_COLUMNS: [&str; 18] = [
    "Deal Id",
    "Client Name",
    "Draup Verticals",
    "Provider Name",
    "Client MSA",
    "Provider MSA",
    "Headcount Range",
    "Description",
    "Formatted Start Date",
    "Formatted End Date",
    "Business Function",
    "Functional Workload",
    "Digital Product",
    "Skills",
    "Digital Technology Evidence",
    "LinkedIn_URL_CVID",
    "Headcount",
    "Client Subsidiary",
];

/// The three derived views produced by one transform run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deliverables {
    pub internal: Table,
    pub client: Table,
    pub zinnov: Table,
}

impl Deliverables {
    pub fn get(&self, kind: DeliverableKind) -> &Table {
        match kind {
            DeliverableKind::Internal => &self.internal,
            DeliverableKind::Client => &self.client,
            DeliverableKind::Zinnov => &self.zinnov,
        }
    }
}
