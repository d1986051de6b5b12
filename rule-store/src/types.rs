//! Core types for rule tabs

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One record of a tab: column name -> cell value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow {
    values: HashMap<String, String>,
}

impl RawRow {
    /// Create empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell value for a column, if the column is present
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Set a cell value
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.values.insert(column.into(), value.into());
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no cells
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A tab as a header row plus records.
///
/// Headers are kept apart from the rows so a column can be present even when
/// the tab holds no records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSheet {
    /// Column names in sheet order
    pub headers: Vec<String>,
    /// Records in sheet order
    pub rows: Vec<RawRow>,
}

impl RuleSheet {
    /// Create sheet from explicit headers and rows
    pub fn new(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { headers, rows }
    }

    /// Build a sheet from a cell grid whose first row is the header row.
    ///
    /// Short rows are padded with empty cells, cells past the last header are
    /// dropped, and rows with no non-empty cell are skipped.
    pub fn from_grid(grid: Vec<Vec<String>>) -> Self {
        let mut lines = grid.into_iter();
        let headers = match lines.next() {
            Some(headers) => headers,
            None => return Self::default(),
        };

        let rows = lines
            .filter(|cells| cells.iter().any(|c| !c.is_empty()))
            .map(|cells| {
                let mut cells = cells.into_iter();
                headers
                    .iter()
                    .map(|h| (h.clone(), cells.next().unwrap_or_default()))
                    .collect::<RawRow>()
            })
            .collect();

        Self { headers, rows }
    }

    /// Whether the header row contains a column
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Distinct non-empty values of a column, in first-occurrence order
    pub fn distinct_values(&self, column: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter(|value| !value.is_empty())
            .filter(|value| seen.insert(value.to_string()))
            .map(str::to_string)
            .collect()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the sheet has no records
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
