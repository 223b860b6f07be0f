//! Account persistence for coaweb
//!
//! The chart of accounts lives here as a flat list of records. The
//! directory core only ever reads the full list back; every rule about
//! what may be created, moved or deleted is enforced by the store.

use async_trait::async_trait;
use std::sync::Arc;

pub mod error;
pub mod types;
pub mod memory;
pub mod file;
pub mod seed;

pub use error::{StoreError, StoreErrorCode, StoreResult};
pub use types::{AccountDraft, AccountId, AccountRecord, AccountType, LedgerTotals};
pub use memory::MemoryAccountStore;
pub use file::FileAccountStore;
pub use seed::default_chart;

// ==================== Store Traits ====================

/// Store reference type
pub type StoreRef = Arc<dyn AccountStore>;

/// Report source reference type
pub type ReportRef = Arc<dyn ReportSource>;

/// Persistence for the flat chart of accounts
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Full flat account list, ordered by code
    async fn list(&self) -> StoreResult<Vec<AccountRecord>>;

    /// Create an account; the store assigns the id
    async fn create(&self, draft: AccountDraft) -> StoreResult<AccountRecord>;

    /// Replace the editable fields of an account
    async fn update(&self, id: AccountId, draft: AccountDraft) -> StoreResult<AccountRecord>;

    /// Remove an account; rejected while it still has children
    async fn delete(&self, id: AccountId) -> StoreResult<()>;
}

/// Pre-computed aggregate figures for display
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn totals(&self) -> StoreResult<LedgerTotals>;
}
