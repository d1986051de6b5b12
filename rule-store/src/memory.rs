//! In-memory rule store

use crate::{store::RuleStore, types::RuleSheet, Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Rule store holding tabs in memory, in insertion order
#[derive(Default)]
pub struct InMemoryRuleStore {
    tabs: RwLock<Vec<String>>,
    sheets: RwLock<HashMap<String, RuleSheet>>,
}

impl InMemoryRuleStore {
    /// Create empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_tab(self, tab: impl Into<String>, sheet: RuleSheet) -> Self {
        self.insert_tab(tab, sheet);
        self
    }

    /// Insert or replace a tab
    pub fn insert_tab(&self, tab: impl Into<String>, sheet: RuleSheet) {
        let tab = tab.into();
        let mut sheets = self.sheets.write().unwrap_or_else(|e| e.into_inner());
        if sheets.insert(tab.clone(), sheet).is_none() {
            self.tabs
                .write()
                .unwrap_or_else(|e| e.into_inner())
                .push(tab);
        }
    }
}

#[async_trait]
impl RuleStore for InMemoryRuleStore {
    async fn list_tabs(&self) -> Result<Vec<String>> {
        Ok(self.tabs.read().unwrap_or_else(|e| e.into_inner()).clone())
    }

    async fn get_sheet(&self, tab: &str) -> Result<RuleSheet> {
        self.sheets
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(tab)
            .cloned()
            .ok_or_else(|| Error::TabNotFound(tab.to_string()))
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tabs_keep_insertion_order() {
        let store = InMemoryRuleStore::new()
            .with_tab("PMI", RuleSheet::default())
            .with_tab("ALL CLIENTS", RuleSheet::default());
        store.insert_tab("PMI", RuleSheet::new(vec!["Rule".into()], vec![]));

        assert_eq!(store.list_tabs().await.unwrap(), vec!["PMI", "ALL CLIENTS"]);
        assert!(store.get_sheet("PMI").await.unwrap().has_column("Rule"));
        assert!(matches!(
            store.get_sheet("ACME").await,
            Err(Error::TabNotFound(_))
        ));
    }
}
