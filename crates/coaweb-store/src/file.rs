//! JSON file backed account store

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::error::StoreResult;
use crate::memory::MemoryAccountStore;
use crate::seed::default_chart;
use crate::types::{AccountDraft, AccountId, AccountRecord, LedgerTotals};
use crate::{AccountStore, ReportSource};

/// Account store persisted as a single JSON array on disk
///
/// Every successful mutation rewrites the whole file; the chart is small
/// enough that this stays cheap. A mutation whose write fails is undone
/// in memory, so `list` never shows what the file does not hold.
#[derive(Debug)]
pub struct FileAccountStore {
    path: PathBuf,
    inner: MemoryAccountStore,
    writes: Mutex<()>,
}

impl FileAccountStore {
    /// Open the store at `path`
    ///
    /// A missing file starts either empty or with the standard chart,
    /// depending on `seed_default_chart`; the seed is written immediately.
    pub async fn open(path: impl AsRef<Path>, seed_default_chart: bool) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let store = if tokio::fs::try_exists(&path).await? {
            let content = tokio::fs::read_to_string(&path).await?;
            let records: Vec<AccountRecord> = serde_json::from_str(&content)?;
            log::info!("Loaded {} accounts from {}", records.len(), path.display());
            Self {
                path,
                inner: MemoryAccountStore::with_records(records),
                writes: Mutex::new(()),
            }
        } else {
            let records = if seed_default_chart { default_chart() } else { Vec::new() };
            log::warn!(
                "Account file {} not found, starting with {} accounts",
                path.display(),
                records.len()
            );
            let store = Self {
                path,
                inner: MemoryAccountStore::with_records(records),
                writes: Mutex::new(()),
            };
            store.persist().await?;
            store
        };

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let records = self.inner.snapshot().await;
        let content = serde_json::to_string_pretty(&records)?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        log::debug!("Wrote {} accounts to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Write the current records, or go back to `before` if that fails
    async fn persist_or_restore(&self, before: Vec<AccountRecord>) -> StoreResult<()> {
        if let Err(e) = self.persist().await {
            log::error!("Failed to write {}: {}; change reverted", self.path.display(), e);
            self.inner.restore(before).await;
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait]
impl AccountStore for FileAccountStore {
    async fn list(&self) -> StoreResult<Vec<AccountRecord>> {
        self.inner.list().await
    }

    async fn create(&self, draft: AccountDraft) -> StoreResult<AccountRecord> {
        let _guard = self.writes.lock().await;
        let before = self.inner.snapshot().await;
        let record = self.inner.create(draft).await?;
        self.persist_or_restore(before).await?;
        Ok(record)
    }

    async fn update(&self, id: AccountId, draft: AccountDraft) -> StoreResult<AccountRecord> {
        let _guard = self.writes.lock().await;
        let before = self.inner.snapshot().await;
        let record = self.inner.update(id, draft).await?;
        self.persist_or_restore(before).await?;
        Ok(record)
    }

    async fn delete(&self, id: AccountId) -> StoreResult<()> {
        let _guard = self.writes.lock().await;
        let before = self.inner.snapshot().await;
        self.inner.delete(id).await?;
        self.persist_or_restore(before).await
    }
}

#[async_trait]
impl ReportSource for FileAccountStore {
    async fn totals(&self) -> StoreResult<LedgerTotals> {
        self.inner.totals().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreErrorCode;
    use crate::types::AccountType;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("coaweb-store-{}-{}", name, std::process::id()))
            .join("accounts.json")
    }

    #[tokio::test]
    async fn test_open_seeds_and_persists() {
        let path = temp_path("seed");
        let _ = tokio::fs::remove_file(&path).await;

        let store = FileAccountStore::open(&path, true).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), default_chart().len());
        assert!(path.exists());

        let created = store
            .create(AccountDraft::new("1111", "Main Safe", AccountType::Asset).under(3))
            .await
            .unwrap();

        let reopened = FileAccountStore::open(&path, true).await.unwrap();
        let list = reopened.list().await.unwrap();
        assert!(list.iter().any(|r| r.id == created.id && r.name == "Main Safe"));

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
    }

    #[tokio::test]
    async fn test_open_without_seed_is_empty() {
        let path = temp_path("empty");
        let _ = tokio::fs::remove_file(&path).await;

        let store = FileAccountStore::open(&path, false).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
    }

    #[tokio::test]
    async fn test_rejected_mutation_leaves_file_untouched() {
        let path = temp_path("reject");
        let _ = tokio::fs::remove_file(&path).await;

        let store = FileAccountStore::open(&path, true).await.unwrap();
        let before = tokio::fs::read_to_string(&path).await.unwrap();
        let err = store.delete(1).await.unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::HasChildren);
        let after = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(before, after);

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
    }

    #[tokio::test]
    async fn test_failed_write_reverts_mutation() {
        let path = temp_path("write-fail");
        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;

        let store = FileAccountStore::open(&path, true).await.unwrap();
        let before_list = store.list().await.unwrap();
        let before_file = tokio::fs::read_to_string(&path).await.unwrap();

        // A directory where the temporary file goes makes the write fail
        let blocker = path.with_extension("json.tmp");
        tokio::fs::create_dir_all(&blocker).await.unwrap();

        let err = store
            .create(AccountDraft::new("1111", "Main Safe", AccountType::Asset).under(3))
            .await
            .unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::IoError);
        let err = store.delete(6).await.unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::IoError);

        assert_eq!(store.list().await.unwrap(), before_list);
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), before_file);

        tokio::fs::remove_dir(&blocker).await.unwrap();
        store.delete(6).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), before_list.len() - 1);

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
    }

    #[tokio::test]
    async fn test_malformed_file_is_reported() {
        let path = temp_path("malformed");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, "{not json").await.unwrap();

        let err = FileAccountStore::open(&path, true).await.unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::InvalidFormat);

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
    }
}
