//! Counts over the current forest plus the pass-through ledger figures

use chrono::{DateTime, Utc};
use coaweb_store::LedgerTotals;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::tree::AccountForest;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectorySummary {
    pub total_accounts: usize,
    pub root_accounts: usize,
    pub container_accounts: usize,
    pub leaf_accounts: usize,
    /// Account count per account type
    pub by_type: BTreeMap<String, usize>,
    /// Figures as supplied by the reporting side, not recomputed here
    pub totals: LedgerTotals,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl DirectorySummary {
    pub fn collect(forest: &AccountForest, totals: &LedgerTotals, refreshed_at: Option<DateTime<Utc>>) -> Self {
        let mut container_accounts = 0;
        let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
        for (node, _) in forest.walk() {
            if node.is_container() {
                container_accounts += 1;
            }
            *by_type.entry(node.record.account_type.to_string()).or_default() += 1;
        }

        Self {
            total_accounts: forest.len(),
            root_accounts: forest.roots().len(),
            container_accounts,
            leaf_accounts: forest.len() - container_accounts,
            by_type,
            totals: totals.clone(),
            refreshed_at,
        }
    }
}
