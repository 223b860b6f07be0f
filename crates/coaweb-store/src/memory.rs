//! In-memory account store

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashSet;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::types::{AccountDraft, AccountId, AccountRecord, LedgerTotals, MAX_CODE_LEN, MAX_NAME_LEN};
use crate::{AccountStore, ReportSource};

/// Account store holding the chart in memory
///
/// Enforces the same rules a database-backed store would: unique codes,
/// existing parents, no ancestry loops, and no deletion of accounts that
/// still have children.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    records: RwLock<Vec<AccountRecord>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing records, keeping them as given
    pub fn with_records(records: Vec<AccountRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Copy of every record, unsorted
    pub async fn snapshot(&self) -> Vec<AccountRecord> {
        self.records.read().await.clone()
    }

    /// Put back a snapshot taken earlier
    pub async fn restore(&self, records: Vec<AccountRecord>) {
        *self.records.write().await = records;
    }

    /// Overwrite the stored balance of an account
    ///
    /// Balances are owned by the posting engine; this is its entry point.
    pub async fn set_balance(&self, id: AccountId, balance: Decimal) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::AccountNotFound { id })?;
        record.balance = balance;
        Ok(())
    }
}

fn validate_draft(records: &[AccountRecord], draft: &AccountDraft, editing: Option<AccountId>) -> StoreResult<()> {
    let code = draft.code.trim();
    if code.is_empty() || code.chars().count() > MAX_CODE_LEN {
        return Err(StoreError::ValidationError {
            message: format!("Account code must be 1 to {} characters", MAX_CODE_LEN),
        });
    }
    let name = draft.name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(StoreError::ValidationError {
            message: format!("Account name must be 1 to {} characters", MAX_NAME_LEN),
        });
    }

    if records.iter().any(|r| r.code == code && Some(r.id) != editing) {
        return Err(StoreError::DuplicateCode { code: code.to_string() });
    }

    if let Some(parent_id) = draft.parent_id {
        if !records.iter().any(|r| r.id == parent_id) {
            return Err(StoreError::ParentNotFound { id: parent_id });
        }
        if let Some(id) = editing {
            if creates_cycle(records, id, parent_id) {
                return Err(StoreError::CyclicParent { id, parent_id });
            }
        }
    }

    Ok(())
}

/// True when `parent_id` is `id` itself or one of its descendants
fn creates_cycle(records: &[AccountRecord], id: AccountId, parent_id: AccountId) -> bool {
    let mut visited = HashSet::new();
    let mut cursor = Some(parent_id);
    while let Some(current) = cursor {
        if current == id {
            return true;
        }
        if !visited.insert(current) {
            // Pre-existing loop that does not pass through `id`
            return false;
        }
        cursor = records.iter().find(|r| r.id == current).and_then(|r| r.parent_id);
    }
    false
}

fn sorted_by_code(records: &[AccountRecord]) -> Vec<AccountRecord> {
    let mut list = records.to_vec();
    list.sort_by(|a, b| a.code.cmp(&b.code));
    list
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn list(&self) -> StoreResult<Vec<AccountRecord>> {
        let records = self.records.read().await;
        Ok(sorted_by_code(&records))
    }

    async fn create(&self, draft: AccountDraft) -> StoreResult<AccountRecord> {
        let mut records = self.records.write().await;
        validate_draft(&records, &draft, None)?;

        let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let record = AccountRecord {
            id,
            parent_id: draft.parent_id,
            code: draft.code.trim().to_string(),
            name: draft.name.trim().to_string(),
            account_type: draft.account_type,
            is_selectable: draft.is_selectable,
            balance: Decimal::ZERO,
        };
        records.push(record.clone());
        log::info!("Created account {} ({})", record.id, record.label());
        Ok(record)
    }

    async fn update(&self, id: AccountId, draft: AccountDraft) -> StoreResult<AccountRecord> {
        let mut records = self.records.write().await;
        if !records.iter().any(|r| r.id == id) {
            return Err(StoreError::AccountNotFound { id });
        }
        validate_draft(&records, &draft, Some(id))?;

        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::AccountNotFound { id })?;
        record.parent_id = draft.parent_id;
        record.code = draft.code.trim().to_string();
        record.name = draft.name.trim().to_string();
        record.account_type = draft.account_type;
        record.is_selectable = draft.is_selectable;
        log::info!("Updated account {} ({})", record.id, record.label());
        Ok(record.clone())
    }

    async fn delete(&self, id: AccountId) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::AccountNotFound { id })?;

        let count = records.iter().filter(|r| r.parent_id == Some(id)).count();
        if count > 0 {
            return Err(StoreError::HasChildren { id, count });
        }

        let removed = records.remove(position);
        log::info!("Deleted account {} ({})", removed.id, removed.label());
        Ok(())
    }
}

#[async_trait]
impl ReportSource for MemoryAccountStore {
    async fn totals(&self) -> StoreResult<LedgerTotals> {
        let records = self.records.read().await;
        Ok(LedgerTotals::from_records(&records))
    }
}
