//! Rule aggregation
//!
//! Merges the universal tab with a client tab, keeping rows scoped to the
//! selected market or to every market.

use crate::error::{ComplianceError, Result};
use crate::metrics::RULE_ROWS_AGGREGATED;
use crate::types::RuleRow;
use rule_store::{RawRow, RuleSheet, MARKET_COLUMN, RULESET_COLUMN, RULE_COLUMN, RULE_NAME_COLUMN};
use serde::Serialize;
use tracing::{debug, warn};

const REQUIRED_COLUMNS: [&str; 4] = [MARKET_COLUMN, RULESET_COLUMN, RULE_COLUMN, RULE_NAME_COLUMN];

/// Combined rules for one market: universal rows first, then client rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleTable {
    rows: Vec<RuleRow>,
}

impl RuleTable {
    /// Build a table from already-filtered rows
    pub fn from_rows(rows: Vec<RuleRow>) -> Self {
        Self { rows }
    }

    /// Merge both sources for `market`.
    ///
    /// Source order is preserved within each tab; downstream rule-name
    /// mappings depend on it.
    pub fn aggregate(
        universal_tab: &str,
        universal: &RuleSheet,
        client_tab: &str,
        client: &RuleSheet,
        market: &str,
    ) -> Result<Self> {
        if market.is_empty() {
            return Err(ComplianceError::InvalidInput("market must not be empty".to_string()));
        }

        Self::check_schema(universal_tab, universal)?;
        Self::check_schema(client_tab, client)?;

        let mut rows = Vec::with_capacity(universal.len() + client.len());
        for (tab, sheet) in [(universal_tab, universal), (client_tab, client)] {
            let before = rows.len();
            rows.extend(Self::filter_sheet(tab, sheet, market));
            let kept = rows.len() - before;

            RULE_ROWS_AGGREGATED.with_label_values(&[tab]).inc_by(kept as u64);
            debug!("Kept {} of {} rows from {} for market {}", kept, sheet.len(), tab, market);
        }

        Ok(Self { rows })
    }

    fn check_schema(tab: &str, sheet: &RuleSheet) -> Result<()> {
        match REQUIRED_COLUMNS.iter().find(|c| !sheet.has_column(c)) {
            Some(column) => Err(ComplianceError::Schema {
                tab: tab.to_string(),
                column: column.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn filter_sheet<'a>(
        tab: &'a str,
        sheet: &'a RuleSheet,
        market: &'a str,
    ) -> impl Iterator<Item = RuleRow> + 'a {
        sheet
            .rows
            .iter()
            .enumerate()
            .filter_map(move |(index, raw)| {
                let row = Self::to_rule_row(raw)?;
                if !row.applies_to(market) {
                    return None;
                }
                if row.rule.is_empty() || row.rule_name.is_empty() {
                    warn!("Skipping row {} of {}: empty Rule or Rule Name", index + 2, tab);
                    return None;
                }
                Some(row)
            })
    }

    fn to_rule_row(raw: &RawRow) -> Option<RuleRow> {
        Some(RuleRow::new(
            raw.get(MARKET_COLUMN)?,
            raw.get(RULESET_COLUMN)?,
            raw.get(RULE_COLUMN)?,
            raw.get(RULE_NAME_COLUMN)?,
        ))
    }

    pub fn rows(&self) -> &[RuleRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: &[[&str; 4]]) -> RuleSheet {
        let mut grid: Vec<Vec<String>> = vec![REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect()];
        grid.extend(rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()));
        RuleSheet::from_grid(grid)
    }

    #[test]
    fn test_filters_by_market_and_keeps_source_order() {
        let universal = sheet(&[
            ["All", "Tone", "no slang", "NoSlang"],
            ["UK", "Tone", "british spelling", "BritSpell"],
            ["DE", "Legal", "no health claims", "NoHealth"],
        ]);
        let client = sheet(&[
            ["DE", "Tone", "formal address", "Formal"],
            ["FR", "Tone", "use tu", "Tu"],
            ["All", "Legal", "age gate", "AgeGate"],
        ]);

        let table = RuleTable::aggregate("ALL CLIENTS", &universal, "PMI", &client, "DE").unwrap();
        let names: Vec<&str> = table.rows().iter().map(|r| r.rule_name.as_str()).collect();
        assert_eq!(names, vec!["NoSlang", "NoHealth", "Formal", "AgeGate"]);
    }

    #[test]
    fn test_missing_rule_name_column_is_schema_error() {
        let universal = sheet(&[["All", "Tone", "no slang", "NoSlang"]]);
        let client = RuleSheet::from_grid(vec![vec![
            "Market".to_string(),
            "Ruleset".to_string(),
            "Rule".to_string(),
        ]]);

        let err = RuleTable::aggregate("ALL CLIENTS", &universal, "PMI", &client, "DE").unwrap_err();
        assert!(matches!(
            err,
            ComplianceError::Schema { ref tab, ref column } if tab == "PMI" && column == "Rule Name"
        ));
    }

    #[test]
    fn test_header_only_tab_is_not_schema_error() {
        let universal = sheet(&[]);
        let client = sheet(&[["DE", "Tone", "formal address", "Formal"]]);

        let table = RuleTable::aggregate("ALL CLIENTS", &universal, "PMI", &client, "DE").unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_rows_without_rule_text_are_skipped() {
        let universal = sheet(&[["All", "Tone", "", "Orphan"], ["All", "Tone", "rule", ""]]);
        let client = sheet(&[]);

        let table = RuleTable::aggregate("ALL CLIENTS", &universal, "PMI", &client, "DE").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_empty_market_rejected() {
        let err = RuleTable::aggregate("ALL CLIENTS", &sheet(&[]), "PMI", &sheet(&[]), "").unwrap_err();
        assert!(matches!(err, ComplianceError::InvalidInput(_)));
    }
}
