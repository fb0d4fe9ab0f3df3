//! Headcount key → range label lookup

use std::collections::HashMap;

use tracing::debug;

use crate::error::{DealsError, DealsResult};
use crate::types::Table;

pub const MAIN_COLUMN: &str = "Main";
pub const RANGE_COLUMN: &str = "Range";

/// Lookup table built from the headcount reference file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadcountMapping {
    ranges: HashMap<String, String>,
}

impl HeadcountMapping {
    /// Build the mapping from a table with `Main` and `Range` columns.
    ///
    /// The first row for a key wins. Rows with a null key are skipped; a null
    /// range is kept as unmapped so the key still resolves to the placeholder.
    pub fn from_table(table: &Table) -> DealsResult<Self> {
        let missing = table.missing_columns(&[MAIN_COLUMN, RANGE_COLUMN]);
        if !missing.is_empty() {
            return Err(DealsError::missing_columns("Headcount", missing));
        }

        let mut ranges = HashMap::new();
        let mut seen = std::collections::HashSet::new();
        for row in 0..table.row_count() {
            let Some(key) = table.get(row, MAIN_COLUMN).map(normalize_key) else {
                continue;
            };
            if !seen.insert(key.clone()) {
                debug!(key = %key, "duplicate headcount key ignored");
                continue;
            }
            if let Some(range) = table.get(row, RANGE_COLUMN) {
                ranges.insert(key, range.to_string());
            }
        }

        Ok(Self { ranges })
    }

    /// Range label for a raw headcount value, if mapped
    pub fn lookup(&self, headcount: Option<&str>) -> Option<&str> {
        let key = normalize_key(headcount?);
        self.ranges.get(&key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Trim, and collapse integral numbers to their integer spelling ("100.0" → "100")
pub fn normalize_key(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
            format!("{}", n as i64)
        }
        _ => trimmed.to_string(),
    }
}
