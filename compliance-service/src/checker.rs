//! End-to-end compliance check
//!
//! Order of failure: document format, then missing analysis configuration,
//! then rule store and schema, then per-ruleset evaluation. Only the last kind is contained in a report; the
//! others abort the check before any analysis request is made.

use crate::aggregator::RuleTable;
use crate::analysis::OpenAiAnalyzer;
use crate::config::Config;
use crate::document::DocumentTextExtractor;
use crate::error::{ComplianceError, Result};
use crate::evaluator::ComplianceEvaluator;
use crate::grouping::RulesetGroups;
use crate::report::ComplianceReports;
use rule_store::{RuleStore, MARKET_COLUMN};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// ComplianceChecker wires the rule store, grouping and evaluator together
pub struct ComplianceChecker {
    store: Arc<dyn RuleStore>,
    /// Err holds why no analysis service is available; rule lookups still work
    evaluator: std::result::Result<ComplianceEvaluator, String>,
    universal_tab: String,
}

impl ComplianceChecker {
    pub fn new(
        store: Arc<dyn RuleStore>,
        evaluator: ComplianceEvaluator,
        universal_tab: impl Into<String>,
    ) -> Self {
        Self {
            store,
            evaluator: Ok(evaluator),
            universal_tab: universal_tab.into(),
        }
    }

    /// Checker that can list tabs and markets but not run checks
    pub fn rules_only(
        store: Arc<dyn RuleStore>,
        universal_tab: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            store,
            evaluator: Err(reason.into()),
            universal_tab: universal_tab.into(),
        }
    }

    /// Build with the store and analyzer described by `config`.
    ///
    /// A missing or unusable analysis configuration does not fail here; it
    /// surfaces as a `Config` error from the first check.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = config.rule_store.build()?;
        match OpenAiAnalyzer::new(config.analysis.clone()) {
            Ok(analyzer) => {
                let evaluator = ComplianceEvaluator::new(Arc::new(analyzer), config.evaluation.clone());
                Ok(Self::new(store, evaluator, config.universal_tab.clone()))
            }
            Err(e) => {
                debug!("Analysis service not configured: {}", e);
                Ok(Self::rules_only(store, config.universal_tab.clone(), e.to_string()))
            }
        }
    }

    /// Whether checks can be run
    pub fn can_check(&self) -> bool {
        self.evaluator.is_ok()
    }

    /// Verify the rule store is reachable and return its tabs
    pub async fn connect(&self) -> Result<Vec<String>> {
        let tabs = self.store.list_tabs().await?;
        if !tabs.iter().any(|t| t == &self.universal_tab) {
            warn!(
                "Rule store {} has no '{}' tab",
                self.store.name(),
                self.universal_tab
            );
        }
        info!("Connected to {} rule store ({} tabs)", self.store.name(), tabs.len());
        Ok(tabs)
    }

    /// Distinct markets listed in a client's tab, in sheet order
    pub async fn available_markets(&self, client: &str) -> Result<Vec<String>> {
        let sheet = self.store.get_sheet(client).await?;
        if !sheet.has_column(MARKET_COLUMN) {
            return Err(ComplianceError::Schema {
                tab: client.to_string(),
                column: MARKET_COLUMN.to_string(),
            });
        }
        Ok(sheet.distinct_values(MARKET_COLUMN))
    }

    /// Load and merge the rules for a client and market
    pub async fn load_rules(&self, client: &str, market: &str) -> Result<RuleTable> {
        if client.is_empty() {
            return Err(ComplianceError::InvalidInput("client must not be empty".to_string()));
        }

        let universal = self.store.get_sheet(&self.universal_tab).await?;
        let client_sheet = self.store.get_sheet(client).await?;
        let table = RuleTable::aggregate(&self.universal_tab, &universal, client, &client_sheet, market)?;

        info!(
            "Loaded {} rules for client {} market {}",
            table.len(),
            client,
            market
        );
        Ok(table)
    }

    /// Check already-extracted document text
    pub async fn check_text(&self, document_text: &str, client: &str, market: &str) -> Result<ComplianceReports> {
        let evaluator = self
            .evaluator
            .as_ref()
            .map_err(|reason| ComplianceError::Config(reason.clone()))?;

        let table = self.load_rules(client, market).await?;
        let groups = RulesetGroups::group(&table);

        let mut reports = ComplianceReports::new(client, market);
        evaluator
            .evaluate_into(document_text, &groups, &mut reports)
            .await;

        info!(
            "Compliance check {} finished: {} rulesets, {} failed",
            reports.check_id,
            reports.len(),
            reports.error_count()
        );
        Ok(reports)
    }

    /// Extract the document text, then check it
    pub async fn check_document(
        &self,
        bytes: &[u8],
        extractor: &dyn DocumentTextExtractor,
        client: &str,
        market: &str,
    ) -> Result<ComplianceReports> {
        let document_text = extractor.extract(bytes)?;
        self.check_text(&document_text, client, market).await
    }
}
