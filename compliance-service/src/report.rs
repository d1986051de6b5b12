//! Report assembly
//!
//! Collects per-ruleset outcomes into one ordered result for a compliance
//! check. Nothing here is persisted; the value lives as long as the caller
//! keeps it.

use crate::types::ComplianceReport;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Ordered ruleset -> report mapping for one compliance check
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceReports {
    pub check_id: Uuid,
    pub client: String,
    pub market: String,
    pub checked_at: DateTime<Utc>,
    reports: Vec<ComplianceReport>,
}

impl ComplianceReports {
    pub fn new(client: impl Into<String>, market: impl Into<String>) -> Self {
        Self {
            check_id: Uuid::new_v4(),
            client: client.into(),
            market: market.into(),
            checked_at: Utc::now(),
            reports: Vec::new(),
        }
    }

    /// Assemble reports, keeping their order
    pub fn assemble(
        client: impl Into<String>,
        market: impl Into<String>,
        reports: impl IntoIterator<Item = ComplianceReport>,
    ) -> Self {
        let mut assembled = Self::new(client, market);
        for report in reports {
            assembled.insert(report);
        }
        assembled
    }

    /// Add a report. A report for a ruleset already present replaces it in place.
    pub fn insert(&mut self, report: ComplianceReport) {
        match self
            .reports
            .iter_mut()
            .find(|r| r.ruleset() == report.ruleset())
        {
            Some(existing) => *existing = report,
            None => self.reports.push(report),
        }
    }

    pub fn get(&self, ruleset: &str) -> Option<&ComplianceReport> {
        self.reports.iter().find(|r| r.ruleset() == ruleset)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComplianceReport> {
        self.reports.iter()
    }

    pub fn rulesets(&self) -> impl Iterator<Item = &str> {
        self.reports.iter().map(ComplianceReport::ruleset)
    }

    pub fn has_errors(&self) -> bool {
        self.reports.iter().any(ComplianceReport::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.reports.iter().filter(|r| r.is_error()).count()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

impl<'a> IntoIterator for &'a ComplianceReports {
    type Item = &'a ComplianceReport;
    type IntoIter = std::slice::Iter<'a, ComplianceReport>;

    fn into_iter(self) -> Self::IntoIter {
        self.reports.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AnalysisError, EvaluationError};

    #[test]
    fn test_assemble_preserves_order() {
        let error = EvaluationError::Analysis(AnalysisError::Unavailable("down".into()));
        let reports = ComplianceReports::assemble(
            "PMI",
            "DE",
            vec![
                ComplianceReport::completed("Tone", "Compliant"),
                ComplianceReport::failed("Legal", &error),
                ComplianceReport::completed("Brand", "Compliant"),
            ],
        );

        assert_eq!(reports.rulesets().collect::<Vec<_>>(), vec!["Tone", "Legal", "Brand"]);
        assert!(reports.has_errors());
        assert_eq!(reports.error_count(), 1);
        assert!(reports.get("Legal").unwrap().text().starts_with("An error occurred: "));
    }

    #[test]
    fn test_duplicate_ruleset_replaced_in_place() {
        let mut reports = ComplianceReports::new("PMI", "DE");
        reports.insert(ComplianceReport::completed("Tone", "first"));
        reports.insert(ComplianceReport::completed("Legal", "Compliant"));
        reports.insert(ComplianceReport::completed("Tone", "second"));

        assert_eq!(reports.len(), 2);
        assert_eq!(reports.rulesets().collect::<Vec<_>>(), vec!["Tone", "Legal"]);
        assert_eq!(reports.get("Tone").unwrap().text(), "second");
    }

    #[test]
    fn test_serializes_reports_in_order() {
        let reports = ComplianceReports::assemble(
            "PMI",
            "DE",
            vec![ComplianceReport::completed("Tone", "Compliant")],
        );
        let json = serde_json::to_value(&reports).unwrap();

        assert_eq!(json["market"], "DE");
        assert_eq!(json["reports"][0]["ruleset"], "Tone");
        assert_eq!(json["reports"][0]["is_error"], false);
    }
}
