use crate::error::EvaluationError;
use serde::{Deserialize, Serialize};

/// One rule scoped to a market and ruleset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRow {
    pub market: String,
    pub ruleset: String,
    /// Literal rule text
    pub rule: String,
    /// Canonical short identifier reported instead of the rule text
    pub rule_name: String,
}

impl RuleRow {
    pub fn new(
        market: impl Into<String>,
        ruleset: impl Into<String>,
        rule: impl Into<String>,
        rule_name: impl Into<String>,
    ) -> Self {
        Self {
            market: market.into(),
            ruleset: ruleset.into(),
            rule: rule.into(),
            rule_name: rule_name.into(),
        }
    }

    /// Whether this row applies to the given market
    pub fn applies_to(&self, market: &str) -> bool {
        self.market == market || self.market == crate::ALL_MARKETS
    }
}

/// Outcome of evaluating one ruleset. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    ruleset: String,
    text: String,
    is_error: bool,
}

impl ComplianceReport {
    /// Report carrying the post-processed analysis text
    pub fn completed(ruleset: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            ruleset: ruleset.into(),
            text: text.into(),
            is_error: false,
        }
    }

    /// Report standing in for a ruleset whose evaluation failed
    pub fn failed(ruleset: impl Into<String>, error: &EvaluationError) -> Self {
        Self {
            ruleset: ruleset.into(),
            text: format!("{}{}", crate::ERROR_REPORT_PREFIX, error),
            is_error: true,
        }
    }

    pub fn from_outcome(
        ruleset: impl Into<String>,
        outcome: std::result::Result<String, EvaluationError>,
    ) -> Self {
        match outcome {
            Ok(text) => Self::completed(ruleset, text),
            Err(e) => Self::failed(ruleset, &e),
        }
    }

    pub fn ruleset(&self) -> &str {
        &self.ruleset
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    #[test]
    fn test_applies_to_market_or_wildcard() {
        assert!(RuleRow::new("DE", "Tone", "r", "R").applies_to("DE"));
        assert!(RuleRow::new("All", "Tone", "r", "R").applies_to("UK"));
        assert!(!RuleRow::new("UK", "Tone", "r", "R").applies_to("DE"));
        assert!(!RuleRow::new("all", "Tone", "r", "R").applies_to("DE"));
    }

    #[test]
    fn test_failed_report_text() {
        let error = EvaluationError::Analysis(AnalysisError::Unavailable("quota".into()));
        let report = ComplianceReport::failed("Legal", &error);

        assert!(report.is_error());
        assert_eq!(report.ruleset(), "Legal");
        assert_eq!(
            report.text(),
            "An error occurred: Analysis service unavailable: quota"
        );
    }
}
