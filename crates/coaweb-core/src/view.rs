//! Rows and view snapshots handed to the rendering layer

use coaweb_store::{AccountId, AccountRecord};
use serde::Serialize;

use crate::navigation::Crumb;
use crate::tree::AccountNode;

/// One displayed account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRow {
    pub node: AccountRecord,
    pub depth: usize,
    pub is_container: bool,
    pub is_open: bool,
    pub child_count: usize,
    /// Code or name contains the active query
    pub is_match: bool,
}

impl ViewRow {
    pub fn new(node: &AccountNode, depth: usize, is_open: bool, is_match: bool) -> Self {
        Self {
            node: node.record.clone(),
            depth,
            is_container: node.is_container(),
            is_open,
            child_count: node.children().len(),
            is_match,
        }
    }
}

/// Which projection the directory is showing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ViewMode {
    RootFolder,
    Subfolder(AccountId),
    Search(String),
}

impl ViewMode {
    pub fn is_search(&self) -> bool {
        matches!(self, ViewMode::Search(_))
    }
}

/// Everything needed to draw the directory once
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryView {
    pub mode: ViewMode,
    pub breadcrumb: Vec<Crumb>,
    pub rows: Vec<ViewRow>,
}

impl DirectoryView {
    /// Rows not hidden under a closed ancestor
    ///
    /// Folder views are one level deep, so this only trims tree views.
    pub fn visible(&self) -> Vec<&ViewRow> {
        let mut out = Vec::with_capacity(self.rows.len());
        let mut hidden_below: Option<usize> = None;
        for row in &self.rows {
            if let Some(depth) = hidden_below {
                if row.depth > depth {
                    continue;
                }
                hidden_below = None;
            }
            if row.is_container && !row.is_open {
                hidden_below = Some(row.depth);
            }
            out.push(row);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coaweb_store::AccountType;
    use rust_decimal::Decimal;

    fn row(id: AccountId, depth: usize, is_container: bool, is_open: bool) -> ViewRow {
        ViewRow {
            node: AccountRecord {
                id,
                parent_id: None,
                code: id.to_string(),
                name: format!("Account {}", id),
                account_type: AccountType::Expense,
                is_selectable: !is_container,
                balance: Decimal::ZERO,
            },
            depth,
            is_container,
            is_open,
            child_count: 0,
            is_match: false,
        }
    }

    #[test]
    fn test_visible_hides_rows_under_closed_container() {
        let view = DirectoryView {
            mode: ViewMode::Search("x".to_string()),
            breadcrumb: Vec::new(),
            rows: vec![
                row(1, 0, true, true),
                row(2, 1, true, false),
                row(3, 2, false, false),
                row(4, 1, false, false),
                row(5, 0, true, false),
                row(6, 1, false, false),
            ],
        };
        let ids: Vec<AccountId> = view.visible().iter().map(|r| r.node.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_mode_serializes_tagged() {
        let json = serde_json::to_value(ViewMode::Subfolder(7)).unwrap();
        assert_eq!(json, serde_json::json!({"state": "subfolder", "value": 7}));
        let json = serde_json::to_value(ViewMode::RootFolder).unwrap();
        assert_eq!(json, serde_json::json!({"state": "root_folder"}));
        assert!(ViewMode::Search("a".into()).is_search());
    }
}
