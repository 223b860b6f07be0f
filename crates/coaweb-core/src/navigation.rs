//! Folder drill-down over the account forest

use coaweb_store::AccountId;
use serde::Serialize;

use crate::tree::{AccountForest, AccountNode};

/// One breadcrumb entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    /// Position to pass to `goto` to return here
    pub index: usize,
    pub id: AccountId,
    pub code: String,
    pub name: String,
}

/// Current folder and the path of folders leading to it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    path: Vec<AccountId>,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folder ids from root to the current folder
    pub fn path(&self) -> &[AccountId] {
        &self.path
    }

    /// None at root
    pub fn current_folder(&self) -> Option<AccountId> {
        self.path.last().copied()
    }

    pub fn is_at_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Step into a container
    ///
    /// A direct child of the current folder (or a root, at root level) is
    /// appended to the path. Any other container is opened through its
    /// ancestry so the path stays contiguous. Leaves and unknown ids are
    /// ignored. Returns whether the path changed.
    pub fn enter(&mut self, forest: &AccountForest, id: AccountId) -> bool {
        let Some(node) = forest.get(id).filter(|n| n.is_container()) else {
            log::debug!("Ignoring enter into non-folder {}", id);
            return false;
        };
        if node.parent() != self.current_folder() {
            log::debug!("Folder {} is not below the current folder, opening from its ancestry", id);
            return self.open(forest, id);
        }
        self.path.push(id);
        true
    }

    /// Jump straight to a folder, rebuilding the path from its ancestry
    ///
    /// Used when the folder is picked from outside the current path, such
    /// as a search result. Same rules as `enter`.
    pub fn open(&mut self, forest: &AccountForest, id: AccountId) -> bool {
        if !forest.is_container(id) {
            return false;
        }
        let mut path = forest.ancestors(id);
        path.push(id);
        self.path = path;
        true
    }

    /// Return to crumb `index`
    ///
    /// `-1` (or anything lower) goes back to root. Indices past the end
    /// leave the path as it is.
    pub fn goto(&mut self, forest: &AccountForest, index: i64) {
        if index < 0 {
            self.path.clear();
            return;
        }
        let keep = usize::try_from(index).map_or(self.path.len(), |i| i.saturating_add(1));
        self.path.truncate(keep);
        self.reconcile(forest);
    }

    pub fn reset(&mut self) {
        self.path.clear();
    }

    /// Bring the path back in line with a rebuilt forest
    ///
    /// A path whose current folder is gone (or no longer a folder) drops
    /// back to root. A path whose folders were moved is rebuilt from the
    /// current folder's ancestry. Returns true when the path changed.
    pub fn reconcile(&mut self, forest: &AccountForest) -> bool {
        let Some(current) = self.current_folder() else {
            return false;
        };
        if !forest.is_container(current) {
            log::debug!("Folder path {:?} is stale, returning to root", self.path);
            self.path.clear();
            return true;
        }
        if self.is_contiguous(forest) {
            return false;
        }
        let mut path = forest.ancestors(current);
        path.push(current);
        log::debug!("Folder path {:?} was moved, now {:?}", self.path, path);
        self.path = path;
        true
    }

    /// Every entry is the parent of the next, starting from a root
    fn is_contiguous(&self, forest: &AccountForest) -> bool {
        let mut expected = None;
        for &id in &self.path {
            match forest.get(id) {
                Some(node) if node.parent() == expected => expected = Some(id),
                _ => return false,
            }
        }
        true
    }

    /// Direct children of the current folder, or the roots at root level
    pub fn current_view<'a>(&self, forest: &'a AccountForest) -> Vec<&'a AccountNode> {
        match self.current_folder() {
            Some(id) if forest.contains(id) => forest.child_nodes(id).collect(),
            _ => forest.root_nodes().collect(),
        }
    }

    pub fn breadcrumb(&self, forest: &AccountForest) -> Vec<Crumb> {
        self.path
            .iter()
            .enumerate()
            .filter_map(|(index, id)| {
                forest.get(*id).map(|node| Crumb {
                    index,
                    id: *id,
                    code: node.record.code.clone(),
                    name: node.record.name.clone(),
                })
            })
            .collect()
    }
}
