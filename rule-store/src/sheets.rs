//! Google Sheets rule store

use crate::{store::RuleStore, types::RuleSheet, Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Default Sheets API endpoint
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com";

/// Sheets backend configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    /// Sheets API base URL
    pub api_base: String,
    /// Spreadsheet document ID
    pub spreadsheet_id: String,
    /// OAuth access token
    #[serde(skip_serializing)]
    pub access_token: String,
    /// Timeout
    pub timeout_seconds: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_SHEETS_API_BASE.to_string(),
            spreadsheet_id: String::new(),
            access_token: String::new(),
            timeout_seconds: crate::DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("api_base", &self.api_base)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("access_token", &"[REDACTED]")
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Rule store backed by a Google spreadsheet, one tab per client
pub struct SheetsRuleStore {
    config: SheetsConfig,
    client: Client,
    base: Url,
}

impl SheetsRuleStore {
    /// Create new Sheets store
    pub fn new(config: SheetsConfig) -> Result<Self> {
        if config.spreadsheet_id.is_empty() {
            return Err(Error::Config("spreadsheet_id is required".to_string()));
        }

        let base = Url::parse(&config.api_base)
            .map_err(|e| Error::Config(format!("invalid api_base {}: {}", config.api_base, e)))?;
        if base.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "api_base {} cannot be used as a base URL",
                config.api_base
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Connection(e.to_string()))?;

        Ok(Self {
            config,
            client,
            base,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(["v4", "spreadsheets", self.config.spreadsheet_id.as_str()])
                .extend(segments);
        }
        url
    }

    async fn fetch(&self, url: Url, tab: Option<&str>) -> Result<reqwest::Response> {
        debug!("GET {}", url);

        let mut request = self.client.get(url);
        if !self.config.access_token.is_empty() {
            request = request.bearer_auth(&self.config.access_token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        match tab {
            Some(tab) if Self::is_missing_range(status, &body) => {
                Err(Error::TabNotFound(tab.to_string()))
            }
            _ => Err(Error::Api {
                status_code: status.as_u16(),
                message: body,
            }),
        }
    }

    /// A1 range covering a whole tab. Quoting keeps titles such as `DE2` from
    /// being read as a cell reference.
    fn tab_range(tab: &str) -> String {
        format!("'{}'", tab.replace('\'', "''"))
    }

    // Sheets answers 400 "Unable to parse range" for an unknown tab name
    fn is_missing_range(status: StatusCode, body: &str) -> bool {
        status == StatusCode::NOT_FOUND
            || (status == StatusCode::BAD_REQUEST && body.contains("Unable to parse range"))
    }
}

#[async_trait]
impl RuleStore for SheetsRuleStore {
    async fn list_tabs(&self) -> Result<Vec<String>> {
        let mut url = self.endpoint(&[]);
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties.title");

        let metadata: SpreadsheetMetadata = self.fetch(url, None).await?.json().await?;
        let tabs: Vec<String> = metadata
            .sheets
            .into_iter()
            .map(|s| s.properties.title)
            .collect();

        info!(
            "Spreadsheet {} has {} tabs",
            self.config.spreadsheet_id,
            tabs.len()
        );
        Ok(tabs)
    }

    async fn get_sheet(&self, tab: &str) -> Result<RuleSheet> {
        let range = Self::tab_range(tab);
        let url = self.endpoint(&["values", &range]);
        let range: ValueRange = self.fetch(url, Some(tab)).await?.json().await?;
        let sheet = RuleSheet::from_grid(range.values);

        debug!("Loaded tab {} with {} records", tab, sheet.len());
        Ok(sheet)
    }

    fn name(&self) -> &str {
        "google-sheets"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_base: &str) -> SheetsConfig {
        SheetsConfig {
            api_base: api_base.to_string(),
            spreadsheet_id: "sheet-123".to_string(),
            access_token: "token".to_string(),
            timeout_seconds: 5,
        }
    }

    #[test]
    fn test_endpoint_encodes_tab_names() {
        let store = SheetsRuleStore::new(config("https://sheets.example.com")).unwrap();
        let url = store.endpoint(&["values", "ALL CLIENTS"]);
        assert_eq!(
            url.as_str(),
            "https://sheets.example.com/v4/spreadsheets/sheet-123/values/ALL%20CLIENTS"
        );
    }

    #[test]
    fn test_tab_range_is_quoted() {
        assert_eq!(SheetsRuleStore::tab_range("A1"), "'A1'");
        assert_eq!(SheetsRuleStore::tab_range("DE2"), "'DE2'");
        assert_eq!(SheetsRuleStore::tab_range("O'Brien!x"), "'O''Brien!x'");
    }

    #[test]
    fn test_missing_spreadsheet_id_rejected() {
        let mut cfg = config("https://sheets.example.com");
        cfg.spreadsheet_id.clear();
        assert!(matches!(SheetsRuleStore::new(cfg), Err(Error::Config(_))));
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", config("https://sheets.example.com"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("\"token\""));
    }
}
