//! Per-ruleset compliance evaluation

use crate::analysis::{AnalysisRequest, TextAnalyzer};
use crate::error::EvaluationError;
use crate::grouping::RulesetGroups;
use crate::mapping::RuleNameMapping;
use crate::metrics::RULESETS_EVALUATED_TOTAL;
use crate::prompt::{render_rule_listing, render_user_prompt, SYSTEM_PROMPT};
use crate::report::ComplianceReports;
use crate::types::{ComplianceReport, RuleRow};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Request parameters shared by every ruleset evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    pub max_output_tokens: u32,
    pub temperature: f32,
    /// Rulesets evaluated at once; 1 is sequential
    pub concurrency: usize,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            max_output_tokens: 2000,
            temperature: 0.5,
            concurrency: 1,
        }
    }
}

/// ComplianceEvaluator asks the analysis service about one ruleset at a time
/// and rewrites rule text in its answers to canonical rule names
pub struct ComplianceEvaluator {
    analyzer: Arc<dyn TextAnalyzer>,
    settings: EvaluationSettings,
}

impl ComplianceEvaluator {
    pub fn new(analyzer: Arc<dyn TextAnalyzer>, settings: EvaluationSettings) -> Self {
        Self { analyzer, settings }
    }

    pub fn settings(&self) -> &EvaluationSettings {
        &self.settings
    }

    /// Evaluate every ruleset. Reports keep the group order regardless of
    /// which evaluation finishes first, and a failed ruleset only affects its
    /// own report.
    pub async fn evaluate(&self, document_text: &str, groups: &RulesetGroups) -> Vec<ComplianceReport> {
        let concurrency = self.settings.concurrency.max(1);

        stream::iter(groups.iter())
            .map(|(ruleset, rows)| async move {
                let outcome = self.evaluate_ruleset(document_text, ruleset, rows).await;
                Self::record(ruleset, outcome)
            })
            .buffered(concurrency)
            .collect()
            .await
    }

    /// Evaluate and assemble into an ordered report set
    pub async fn evaluate_into(
        &self,
        document_text: &str,
        groups: &RulesetGroups,
        reports: &mut ComplianceReports,
    ) {
        for report in self.evaluate(document_text, groups).await {
            reports.insert(report);
        }
    }

    /// Single attempt for one ruleset
    pub async fn evaluate_ruleset(
        &self,
        document_text: &str,
        ruleset: &str,
        rows: &[RuleRow],
    ) -> Result<String, EvaluationError> {
        let mapping = RuleNameMapping::from_rows(rows);
        let request = self.build_request(document_text, ruleset, &mapping);

        let raw = self.analyzer.complete(&request).await?;
        Ok(mapping.normalize(&raw)?)
    }

    pub fn build_request(
        &self,
        document_text: &str,
        ruleset: &str,
        mapping: &RuleNameMapping,
    ) -> AnalysisRequest {
        let listing = render_rule_listing(mapping);
        AnalysisRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: render_user_prompt(document_text, ruleset, &listing),
            max_output_tokens: self.settings.max_output_tokens,
            temperature: self.settings.temperature,
        }
    }

    fn record(ruleset: &str, outcome: Result<String, EvaluationError>) -> ComplianceReport {
        match &outcome {
            Ok(_) => {
                RULESETS_EVALUATED_TOTAL.with_label_values(&["completed"]).inc();
                info!("Ruleset {} evaluated", ruleset);
            }
            Err(e) => {
                RULESETS_EVALUATED_TOTAL.with_label_values(&["failed"]).inc();
                warn!("Ruleset {} failed: {}", ruleset, e);
            }
        }
        ComplianceReport::from_outcome(ruleset, outcome)
    }
}
