//! Open/closed flags for tree rows

use coaweb_store::AccountId;
use std::collections::HashSet;

use crate::tree::AccountForest;

/// Which accounts are expanded in the tree view
///
/// Flags are keyed by id and shared by every view mode. Search can only
/// open accounts; nothing here closes a row except an explicit toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    open: HashSet<AccountId>,
    initialized: bool,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply load-time defaults once
    ///
    /// The first call opens every root when `open_roots` is set; later
    /// calls do nothing so user choices survive rebuilds.
    pub fn initialize(&mut self, forest: &AccountForest, open_roots: bool) {
        if self.initialized {
            return;
        }
        if open_roots {
            self.open.extend(forest.roots().iter().copied());
        }
        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_open(&self, id: AccountId) -> bool {
        self.open.contains(&id)
    }

    /// Flip one flag, returning the new state
    pub fn toggle(&mut self, id: AccountId) -> bool {
        if self.open.remove(&id) {
            false
        } else {
            self.open.insert(id);
            true
        }
    }

    pub fn set_open(&mut self, id: AccountId, open: bool) {
        if open {
            self.open.insert(id);
        } else {
            self.open.remove(&id);
        }
    }

    /// Open every target that is still closed
    ///
    /// Returns how many rows were newly opened.
    pub fn auto_expand<'a>(&mut self, targets: impl IntoIterator<Item = &'a AccountId>) -> usize {
        targets
            .into_iter()
            .filter(|&&id| self.open.insert(id))
            .count()
    }

    /// Forget flags of accounts no longer in the forest
    pub fn retain_existing(&mut self, forest: &AccountForest) {
        self.open.retain(|&id| forest.contains(id));
    }

    /// Open ids, sorted
    pub fn open_ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = self.open.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}
