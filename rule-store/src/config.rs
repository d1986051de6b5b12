//! Rule store selection

use crate::{csv_store::CsvRuleStore, sheets::SheetsConfig, sheets::SheetsRuleStore};
use crate::{store::RuleStore, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Backend kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStoreBackend {
    /// Google Sheets REST API
    Sheets,
    /// Directory of CSV files
    Csv,
}

/// Rule store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleStoreConfig {
    /// Which backend to use
    pub backend: RuleStoreBackend,

    /// Sheets backend settings
    pub sheets: SheetsConfig,

    /// Directory for the CSV backend
    pub csv_dir: PathBuf,
}

impl Default for RuleStoreConfig {
    fn default() -> Self {
        Self {
            backend: RuleStoreBackend::Sheets,
            sheets: SheetsConfig::default(),
            csv_dir: PathBuf::from("./data/rules"),
        }
    }
}

impl RuleStoreConfig {
    /// Build the configured store
    pub fn build(&self) -> Result<Arc<dyn RuleStore>> {
        let store: Arc<dyn RuleStore> = match self.backend {
            RuleStoreBackend::Sheets => Arc::new(SheetsRuleStore::new(self.sheets.clone())?),
            RuleStoreBackend::Csv => Arc::new(CsvRuleStore::new(&self.csv_dir)?),
        };
        Ok(store)
    }
}
