//! Configuration for the compliance checker

use crate::analysis::OpenAiConfig;
use crate::error::{ComplianceError, Result};
use crate::evaluator::EvaluationSettings;
use rule_store::{RuleStoreBackend, RuleStoreConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Compliance checker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Client whose tab is checked alongside the universal tab
    pub client: String,

    /// Tab holding rules for every client
    pub universal_tab: String,

    /// Rule store backend
    pub rule_store: RuleStoreConfig,

    /// Text-analysis service
    pub analysis: OpenAiConfig,

    /// Evaluation parameters
    pub evaluation: EvaluationSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "qabot".to_string(),
            client: "PMI".to_string(),
            universal_tab: rule_store::UNIVERSAL_TAB.to_string(),
            rule_store: RuleStoreConfig::default(),
            analysis: OpenAiConfig::default(),
            evaluation: EvaluationSettings::default(),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ComplianceError::Config(format!("Failed to read {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ComplianceError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Defaults overridden by environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(client) = std::env::var("QABOT_CLIENT") {
            self.client = client;
        }

        if let Ok(backend) = std::env::var("QABOT_RULE_BACKEND") {
            self.rule_store.backend = match backend.to_ascii_lowercase().as_str() {
                "sheets" => RuleStoreBackend::Sheets,
                "csv" => RuleStoreBackend::Csv,
                other => {
                    return Err(ComplianceError::Config(format!(
                        "Unknown rule backend: {}",
                        other
                    )))
                }
            };
        }

        if let Ok(id) = std::env::var("QABOT_SPREADSHEET_ID") {
            self.rule_store.sheets.spreadsheet_id = id;
        }

        if let Ok(token) = std::env::var("GOOGLE_SHEETS_ACCESS_TOKEN") {
            self.rule_store.sheets.access_token = token;
        }

        if let Ok(dir) = std::env::var("QABOT_RULES_DIR") {
            self.rule_store.csv_dir = PathBuf::from(dir);
        }

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.analysis.api_key = key;
        }

        if let Ok(base) = std::env::var("QABOT_ANALYSIS_API_BASE") {
            self.analysis.api_base = base;
        }

        if let Ok(model) = std::env::var("QABOT_MODEL") {
            self.analysis.model = model;
        }

        if let Ok(concurrency) = std::env::var("QABOT_CONCURRENCY") {
            self.evaluation.concurrency = concurrency.parse().map_err(|_| {
                ComplianceError::Config(format!("Invalid QABOT_CONCURRENCY: {}", concurrency))
            })?;
        }

        Ok(())
    }
}
