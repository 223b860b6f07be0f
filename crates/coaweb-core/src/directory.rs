//! The account directory: one forest, two ways of browsing it
//!
//! Folder browsing and search are mutually exclusive. Typing a query
//! leaves folder mode; clearing it returns to the root folder, whatever
//! folder was open before. Openings made by search are kept afterwards.

use chrono::{DateTime, Utc};
use coaweb_config::DirectoryConfig;
use coaweb_store::{AccountDraft, AccountId, AccountRecord, AccountStore, LedgerTotals, ReportSource, StoreError};

use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::expansion::ExpansionState;
use crate::navigation::{Crumb, Navigation};
use crate::search::{self, SearchMatches};
use crate::summary::DirectorySummary;
use crate::tree::AccountForest;
use crate::view::{DirectoryView, ViewMode, ViewRow};

#[derive(Debug, Clone)]
pub struct Directory {
    forest: AccountForest,
    navigation: Navigation,
    expansion: ExpansionState,
    query: String,
    matches: Option<SearchMatches>,
    totals: LedgerTotals,
    open_roots_on_load: bool,
    refreshed_at: Option<DateTime<Utc>>,
}

impl Directory {
    pub fn new(config: &DirectoryConfig) -> Self {
        Self {
            forest: AccountForest::default(),
            navigation: Navigation::new(),
            expansion: ExpansionState::new(),
            query: String::new(),
            matches: None,
            totals: LedgerTotals::default(),
            open_roots_on_load: config.open_roots_on_load,
            refreshed_at: None,
        }
    }

    // ==================== Loading ====================

    /// Replace the forest with one built from `records`
    ///
    /// Navigation falls back to root if its folders are gone, expansion
    /// forgets vanished ids, and an active query is evaluated again.
    pub fn rebuild(&mut self, records: &[AccountRecord]) {
        self.forest = AccountForest::build(records);
        self.navigation.reconcile(&self.forest);
        if !self.forest.is_empty() {
            self.expansion.initialize(&self.forest, self.open_roots_on_load);
        }
        self.expansion.retain_existing(&self.forest);
        self.evaluate_query();
        self.refreshed_at = Some(Utc::now());
        log::debug!(
            "Rebuilt account tree: {} accounts, {} roots",
            self.forest.len(),
            self.forest.roots().len()
        );
    }

    pub fn set_totals(&mut self, totals: LedgerTotals) {
        self.totals = totals;
    }

    /// Fetch the full list and totals again and rebuild
    pub async fn refresh(&mut self, store: &dyn AccountStore, reports: &dyn ReportSource) -> CoreResult<()> {
        let records = store.list().await?;
        let totals = reports.totals().await?;
        self.rebuild(&records);
        self.set_totals(totals);
        Ok(())
    }

    // ==================== Mutations ====================

    pub async fn create_account(
        &mut self,
        store: &dyn AccountStore,
        reports: &dyn ReportSource,
        draft: AccountDraft,
    ) -> CoreResult<AccountRecord> {
        let context = ErrorContext::new("create_account").with_data("code", serde_json::json!(draft.code));
        let record = store.create(draft).await.map_err(|e| rejected(e, &context))?;
        self.refresh(store, reports).await?;
        Ok(record)
    }

    pub async fn update_account(
        &mut self,
        store: &dyn AccountStore,
        reports: &dyn ReportSource,
        id: AccountId,
        draft: AccountDraft,
    ) -> CoreResult<AccountRecord> {
        let context = ErrorContext::new("update_account").with_data("id", serde_json::json!(id));
        let record = store.update(id, draft).await.map_err(|e| rejected(e, &context))?;
        self.refresh(store, reports).await?;
        Ok(record)
    }

    pub async fn delete_account(
        &mut self,
        store: &dyn AccountStore,
        reports: &dyn ReportSource,
        id: AccountId,
    ) -> CoreResult<()> {
        let context = ErrorContext::new("delete_account").with_data("id", serde_json::json!(id));
        store.delete(id).await.map_err(|e| rejected(e, &context))?;
        self.refresh(store, reports).await
    }

    // ==================== Browsing ====================

    pub fn mode(&self) -> ViewMode {
        if self.is_searching() {
            return ViewMode::Search(self.query.clone());
        }
        match self.navigation.current_folder() {
            Some(id) => ViewMode::Subfolder(id),
            None => ViewMode::RootFolder,
        }
    }

    pub fn is_searching(&self) -> bool {
        !self.query.is_empty()
    }

    /// Open a folder
    ///
    /// From search the folder is opened at its place in the tree and the
    /// query is dropped. Leaves and unknown ids change nothing.
    pub fn enter(&mut self, id: AccountId) -> bool {
        let entered = if self.is_searching() {
            self.navigation.open(&self.forest, id)
        } else {
            self.navigation.enter(&self.forest, id)
        };
        if entered {
            self.drop_query();
        }
        entered
    }

    /// Go back to crumb `index`, or to root with `-1`
    pub fn goto(&mut self, index: i64) {
        self.navigation.goto(&self.forest, index);
        self.drop_query();
    }

    /// Set the search text
    ///
    /// A non-empty query starting a search leaves folder mode; the empty
    /// query ends search at the root folder.
    pub fn set_query(&mut self, query: &str) {
        if query.is_empty() {
            self.clear_query();
            return;
        }
        if !self.is_searching() {
            self.navigation.reset();
        }
        self.query = query.to_string();
        self.evaluate_query();
    }

    pub fn clear_query(&mut self) {
        self.drop_query();
        self.navigation.reset();
    }

    /// Flip the open flag of an account; None for unknown ids
    pub fn toggle(&mut self, id: AccountId) -> Option<bool> {
        if !self.forest.contains(id) {
            return None;
        }
        Some(self.expansion.toggle(id))
    }

    fn drop_query(&mut self) {
        self.query.clear();
        self.matches = None;
    }

    fn evaluate_query(&mut self) {
        self.matches = SearchMatches::evaluate(&self.forest, &self.query);
        if let Some(matches) = &self.matches {
            let opened = self.expansion.auto_expand(&matches.expand_targets());
            if opened > 0 {
                log::debug!("Search '{}' opened {} accounts", self.query, opened);
            }
        }
    }

    // ==================== Views ====================

    /// One level: children of the current folder, or the roots
    pub fn current_view(&self) -> Vec<ViewRow> {
        self.navigation
            .current_view(&self.forest)
            .into_iter()
            .map(|node| ViewRow::new(node, 0, self.expansion.is_open(node.id()), false))
            .collect()
    }

    /// Whole tree filtered by the active query, unfiltered without one
    pub fn search_view(&self) -> Vec<ViewRow> {
        search::search_view(&self.forest, self.matches.as_ref(), &self.expansion)
    }

    pub fn breadcrumb(&self) -> Vec<Crumb> {
        self.navigation.breadcrumb(&self.forest)
    }

    pub fn view(&self) -> DirectoryView {
        let rows = if self.is_searching() {
            self.search_view()
        } else {
            self.current_view()
        };
        DirectoryView {
            mode: self.mode(),
            breadcrumb: self.breadcrumb(),
            rows,
        }
    }

    pub fn summary(&self) -> DirectorySummary {
        DirectorySummary::collect(&self.forest, &self.totals, self.refreshed_at)
    }

    // ==================== Accessors ====================

    pub fn forest(&self) -> &AccountForest {
        &self.forest
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> Option<&SearchMatches> {
        self.matches.as_ref()
    }

    pub fn totals(&self) -> &LedgerTotals {
        &self.totals
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    pub fn account(&self, id: AccountId) -> CoreResult<&AccountRecord> {
        self.forest
            .get(id)
            .map(|node| &node.record)
            .ok_or(CoreError::AccountNotFound { id })
    }
}

fn rejected(error: StoreError, context: &ErrorContext) -> CoreError {
    let error = CoreError::Store(error);
    DefaultErrorLogger.log_error(&error, context);
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use coaweb_store::{default_chart, AccountType, MemoryAccountStore, StoreErrorCode};
    use rust_decimal::Decimal;

    fn config() -> DirectoryConfig {
        DirectoryConfig { open_roots_on_load: true }
    }

    async fn loaded() -> (Directory, MemoryAccountStore) {
        let store = MemoryAccountStore::with_records(default_chart());
        let mut directory = Directory::new(&config());
        directory.refresh(&store, &store).await.unwrap();
        (directory, store)
    }

    fn row_codes(rows: &[ViewRow]) -> Vec<String> {
        rows.iter().map(|r| r.node.code.clone()).collect()
    }

    #[tokio::test]
    async fn test_initial_load_opens_roots_at_root_folder() {
        let (directory, _) = loaded().await;
        assert_eq!(directory.mode(), ViewMode::RootFolder);
        assert_eq!(directory.expansion().open_ids(), vec![1, 8, 12, 14, 16]);
        assert_eq!(row_codes(&directory.view().rows), vec!["1", "2", "3", "4", "5"]);
        assert!(directory.refreshed_at().is_some());
    }

    #[tokio::test]
    async fn test_folder_transitions() {
        let (mut directory, _) = loaded().await;

        assert!(directory.enter(1));
        assert_eq!(directory.mode(), ViewMode::Subfolder(1));
        assert_eq!(row_codes(&directory.current_view()), vec!["11", "12"]);

        assert!(directory.enter(2));
        assert_eq!(directory.mode(), ViewMode::Subfolder(2));
        assert_eq!(directory.breadcrumb().len(), 2);

        // 114 VAT - Input is a selectable leaf
        assert!(!directory.enter(6));
        assert_eq!(directory.mode(), ViewMode::Subfolder(2));

        directory.goto(-1);
        assert_eq!(directory.mode(), ViewMode::RootFolder);
        assert!(directory.navigation().path().is_empty());
    }

    fn crumb_codes(directory: &Directory) -> Vec<String> {
        directory.breadcrumb().into_iter().map(|c| c.code).collect()
    }

    fn current_assets() -> AccountDraft {
        AccountDraft::new("11", "Current Assets", AccountType::Asset).container()
    }

    #[tokio::test]
    async fn test_enter_other_branch_keeps_breadcrumb_contiguous() {
        let (mut directory, _) = loaded().await;
        directory.enter(1);

        // Liabilities is a root, not a child of Assets
        assert!(directory.enter(8));
        assert_eq!(directory.navigation().path(), &[8]);
        assert_eq!(crumb_codes(&directory), vec!["2"]);

        // 211 sits two levels below Liabilities
        directory.goto(-1);
        assert!(directory.enter(10));
        assert_eq!(directory.navigation().path(), &[8, 9, 10]);
        assert_eq!(crumb_codes(&directory), vec!["2", "21", "211"]);
    }

    #[tokio::test]
    async fn test_reparent_moves_open_path() {
        let (mut directory, store) = loaded().await;
        directory.enter(1);
        directory.enter(2);
        directory.enter(3);

        directory
            .update_account(&store, &store, 2, current_assets().under(8))
            .await
            .unwrap();

        assert_eq!(directory.forest().ancestors(2), vec![8]);
        assert_eq!(directory.forest().children(8), &[2, 9]);
        assert_eq!(directory.forest().children(1), &[7]);
        assert_eq!(directory.forest().walk().len(), 18);

        assert_eq!(directory.mode(), ViewMode::Subfolder(3));
        assert_eq!(directory.navigation().path(), &[8, 2, 3]);
        assert_eq!(crumb_codes(&directory), vec!["2", "11", "111"]);
    }

    #[tokio::test]
    async fn test_reparent_to_top_level() {
        let (mut directory, store) = loaded().await;
        directory.enter(1);
        directory.enter(2);

        directory.update_account(&store, &store, 2, current_assets()).await.unwrap();

        assert_eq!(directory.forest().roots(), &[1, 2, 8, 12, 14, 16]);
        assert_eq!(directory.navigation().path(), &[2]);
        assert_eq!(row_codes(&directory.current_view()), vec!["111", "112", "113", "114"]);
    }

    #[tokio::test]
    async fn test_reparent_under_descendant_is_rejected() {
        let (mut directory, store) = loaded().await;
        directory.enter(1);
        let before = directory.view();

        let err = directory
            .update_account(&store, &store, 2, current_assets().under(3))
            .await
            .unwrap_err();
        assert_eq!(err.store_error().map(|e| e.code()), Some(StoreErrorCode::CyclicParent));
        assert_eq!(directory.view(), before);
        assert_eq!(directory.forest().ancestors(3), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_search_exit_lands_at_root() {
        let (mut directory, _) = loaded().await;
        directory.enter(1);
        directory.enter(2);

        directory.set_query("vat");
        assert_eq!(directory.mode(), ViewMode::Search("vat".to_string()));
        assert!(directory.breadcrumb().is_empty());
        assert_eq!(row_codes(&directory.view().rows), vec!["1", "11", "114", "2", "21", "212"]);

        directory.set_query("");
        assert_eq!(directory.mode(), ViewMode::RootFolder);
        assert!(directory.navigation().path().is_empty());
    }

    #[tokio::test]
    async fn test_search_expansion_is_sticky() {
        let (mut directory, _) = loaded().await;
        assert!(!directory.expansion().is_open(2));

        directory.set_query("INVENTORY");
        assert!(directory.expansion().is_open(1));
        assert!(directory.expansion().is_open(2));
        // A direct hit is not opened for its own sake
        assert!(!directory.expansion().is_open(5));

        directory.clear_query();
        assert!(directory.expansion().is_open(2));
    }

    #[tokio::test]
    async fn test_search_never_closes_manual_openings() {
        let (mut directory, _) = loaded().await;
        assert_eq!(directory.toggle(7), Some(true));
        directory.set_query("sales");
        assert!(directory.expansion().is_open(7));
        assert_eq!(directory.toggle(999), None);
    }

    #[tokio::test]
    async fn test_enter_from_search_opens_folder_in_place() {
        let (mut directory, _) = loaded().await;
        directory.set_query("cash");

        // Leaf hits do not leave search
        assert!(!directory.enter(6));
        assert!(directory.is_searching());

        assert!(directory.enter(3));
        assert_eq!(directory.mode(), ViewMode::Subfolder(3));
        assert_eq!(directory.navigation().path(), &[1, 2, 3]);
        assert_eq!(directory.query(), "");
        assert!(directory.matches().is_none());
    }

    #[tokio::test]
    async fn test_goto_clears_query() {
        let (mut directory, _) = loaded().await;
        directory.set_query("bank");
        directory.goto(0);
        assert_eq!(directory.mode(), ViewMode::RootFolder);
        assert_eq!(directory.query(), "");
    }

    #[tokio::test]
    async fn test_create_refreshes_view() {
        let (mut directory, store) = loaded().await;
        directory.enter(1);
        directory.enter(2);
        directory.enter(3);
        assert!(directory.current_view().is_empty());

        let created = directory
            .create_account(&store, &store, AccountDraft::new("1111", "Main Safe", AccountType::Asset).under(3))
            .await
            .unwrap();
        assert_eq!(directory.mode(), ViewMode::Subfolder(3));
        let rows = directory.current_view();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].node.id, created.id);
        assert_eq!(directory.account(created.id).unwrap().name, "Main Safe");
    }

    #[tokio::test]
    async fn test_deleted_folder_degrades_to_root() {
        let (mut directory, store) = loaded().await;
        let temp = directory
            .create_account(&store, &store, AccountDraft::new("9", "Suspense", AccountType::Asset).container())
            .await
            .unwrap();
        assert!(directory.enter(temp.id));

        directory.delete_account(&store, &store, temp.id).await.unwrap();
        assert_eq!(directory.mode(), ViewMode::RootFolder);
        assert!(matches!(directory.account(temp.id), Err(CoreError::AccountNotFound { .. })));
    }

    #[tokio::test]
    async fn test_rejection_is_passed_through() {
        let (mut directory, store) = loaded().await;
        directory.enter(1);
        let before = directory.view();

        let err = directory.delete_account(&store, &store, 1).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::StoreRejected);
        assert_eq!(err.store_error().map(|e| e.code()), Some(StoreErrorCode::HasChildren));
        assert_eq!(directory.view(), before);
    }

    #[tokio::test]
    async fn test_active_query_reevaluated_after_rebuild() {
        let (mut directory, store) = loaded().await;
        directory.set_query("petty");
        assert!(directory.view().rows.is_empty());

        directory
            .create_account(&store, &store, AccountDraft::new("1112", "Petty Cash", AccountType::Asset).under(3))
            .await
            .unwrap();
        assert_eq!(row_codes(&directory.view().rows), vec!["1", "11", "111", "1112"]);
        assert!(directory.expansion().is_open(3));
    }

    #[tokio::test]
    async fn test_summary_passes_totals_through() {
        let store = MemoryAccountStore::with_records(default_chart());
        store.set_balance(15, Decimal::from(1200)).await.unwrap();
        store.set_balance(17, Decimal::from(700)).await.unwrap();

        let mut directory = Directory::new(&config());
        directory.refresh(&store, &store).await.unwrap();
        let summary = directory.summary();
        assert_eq!(summary.totals.net_profit, Decimal::from(500));
        assert_eq!(summary.total_accounts, 18);
    }

    #[test]
    fn test_roots_stay_closed_when_disabled() {
        let mut directory = Directory::new(&DirectoryConfig { open_roots_on_load: false });
        directory.rebuild(&default_chart());
        assert!(directory.expansion().open_ids().is_empty());
    }
}
