//! CSV directory rule store
//!
//! Each `<tab>.csv` file in the directory is one tab. The first record is the
//! header row.

use crate::{store::RuleStore, types::RuleSheet, Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Rule store reading tabs from CSV files
pub struct CsvRuleStore {
    dir: PathBuf,
}

impl CsvRuleStore {
    /// Create store over a directory
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(Error::Connection(format!(
                "rule directory {} does not exist",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    fn tab_path(&self, tab: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", tab))
    }

    fn read_sheet(path: &Path) -> Result<RuleSheet> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut grid = Vec::new();
        for record in reader.records() {
            let record = record?;
            grid.push(record.iter().map(str::to_string).collect());
        }

        Ok(RuleSheet::from_grid(grid))
    }
}

#[async_trait]
impl RuleStore for CsvRuleStore {
    async fn list_tabs(&self) -> Result<Vec<String>> {
        let mut tabs = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    tabs.push(stem.to_string());
                }
            }
        }
        tabs.sort();
        Ok(tabs)
    }

    async fn get_sheet(&self, tab: &str) -> Result<RuleSheet> {
        let path = self.tab_path(tab);
        if !path.is_file() {
            return Err(Error::TabNotFound(tab.to_string()));
        }

        let sheet = Self::read_sheet(&path)?;
        debug!("Loaded {} with {} records", path.display(), sheet.len());
        Ok(sheet)
    }

    fn name(&self) -> &str {
        "csv"
    }
}
