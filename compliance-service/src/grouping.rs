//! Ruleset grouping

use crate::aggregator::RuleTable;
use crate::types::RuleRow;
use std::collections::HashMap;

/// Rules partitioned by ruleset, keys in first-occurrence order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulesetGroups {
    groups: Vec<(String, Vec<RuleRow>)>,
}

impl RulesetGroups {
    /// Group a table by exact ruleset name
    pub fn group(table: &RuleTable) -> Self {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<(String, Vec<RuleRow>)> = Vec::new();

        for row in table.rows() {
            let slot = *index.entry(row.ruleset.as_str()).or_insert_with(|| {
                groups.push((row.ruleset.clone(), Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(row.clone());
        }

        Self { groups }
    }

    pub fn get(&self, ruleset: &str) -> Option<&[RuleRow]> {
        self.groups
            .iter()
            .find(|(name, _)| name == ruleset)
            .map(|(_, rows)| rows.as_slice())
    }

    pub fn rulesets(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RuleRow])> {
        self.groups
            .iter()
            .map(|(name, rows)| (name.as_str(), rows.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
