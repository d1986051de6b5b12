//! Rule store interface

use crate::{types::RuleSheet, Result};
use async_trait::async_trait;

/// Source of rule tabs
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// List the tab names, in the order the backend reports them
    async fn list_tabs(&self) -> Result<Vec<String>>;

    /// Fetch one tab with its header row and records
    async fn get_sheet(&self, tab: &str) -> Result<RuleSheet>;

    /// Get store name
    fn name(&self) -> &str;
}
