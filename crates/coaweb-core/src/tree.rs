//! Account tree built from the flat record list
//!
//! The tree is an arena: every node lives in one id-keyed map and refers
//! to its children and parent by id. It is rebuilt wholesale from the
//! store's list after every change and never patched in place.

use coaweb_store::{AccountId, AccountRecord};
use std::collections::{HashMap, HashSet};

/// One account plus its derived position in the forest
#[derive(Debug, Clone, PartialEq)]
pub struct AccountNode {
    pub record: AccountRecord,
    parent: Option<AccountId>,
    children: Vec<AccountId>,
}

impl AccountNode {
    fn new(record: AccountRecord) -> Self {
        Self {
            record,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> AccountId {
        self.record.id
    }

    /// Parent in the built forest
    ///
    /// Differs from `record.parent_id` when the stored parent was missing
    /// or part of a loop and the node was promoted to a root.
    pub fn parent(&self) -> Option<AccountId> {
        self.parent
    }

    /// Child ids in input order
    pub fn children(&self) -> &[AccountId] {
        &self.children
    }

    /// Grouping accounts are containers, and so is any account that has children
    pub fn is_container(&self) -> bool {
        !self.record.is_selectable || !self.children.is_empty()
    }
}

/// Rooted forest of accounts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountForest {
    nodes: HashMap<AccountId, AccountNode>,
    roots: Vec<AccountId>,
}

impl AccountForest {
    /// Build the forest from a flat list
    ///
    /// Sibling order follows input order. Never fails: duplicate ids keep
    /// their first occurrence, records whose parent is missing or is
    /// themselves become roots, and parent loops are cut so that every
    /// record ends up reachable from exactly one root.
    pub fn build(records: &[AccountRecord]) -> Self {
        let mut nodes: HashMap<AccountId, AccountNode> = HashMap::with_capacity(records.len());
        let mut order: Vec<AccountId> = Vec::with_capacity(records.len());

        for record in records {
            if nodes.contains_key(&record.id) {
                log::warn!("Duplicate account id {} ignored ({})", record.id, record.label());
                continue;
            }
            order.push(record.id);
            nodes.insert(record.id, AccountNode::new(record.clone()));
        }

        let mut roots = Vec::new();
        for &id in &order {
            let parent_id = nodes.get(&id).and_then(|n| n.record.parent_id);
            match parent_id {
                Some(parent_id) if parent_id != id && nodes.contains_key(&parent_id) => {
                    if let Some(parent) = nodes.get_mut(&parent_id) {
                        parent.children.push(id);
                    }
                    if let Some(node) = nodes.get_mut(&id) {
                        node.parent = Some(parent_id);
                    }
                }
                _ => roots.push(id),
            }
        }

        let mut forest = Self { nodes, roots };
        forest.promote_cycles(&order);
        forest
    }

    /// Cut parent loops that the two linking passes cannot see
    fn promote_cycles(&mut self, order: &[AccountId]) {
        let mut reached = HashSet::with_capacity(order.len());
        let roots = self.roots.clone();
        self.mark_reachable(&roots, &mut reached);
        if reached.len() == order.len() {
            return;
        }

        for &id in order {
            if reached.contains(&id) {
                continue;
            }
            let entry = self.cycle_entry(id);
            if let Some(parent_id) = self.nodes.get(&entry).and_then(|n| n.parent) {
                if let Some(parent) = self.nodes.get_mut(&parent_id) {
                    parent.children.retain(|&c| c != entry);
                }
            }
            if let Some(node) = self.nodes.get_mut(&entry) {
                node.parent = None;
            }
            log::warn!("Account {} is part of a parent loop, shown as a root", entry);
            self.roots.push(entry);
            self.mark_reachable(&[entry], &mut reached);
        }
    }

    /// First node on the parent chain of `id` that repeats
    fn cycle_entry(&self, id: AccountId) -> AccountId {
        let mut seen = HashSet::new();
        let mut cursor = id;
        loop {
            if !seen.insert(cursor) {
                return cursor;
            }
            match self.nodes.get(&cursor).and_then(|n| n.parent) {
                Some(parent) => cursor = parent,
                None => return cursor,
            }
        }
    }

    fn mark_reachable(&self, from: &[AccountId], reached: &mut HashSet<AccountId>) {
        let mut stack: Vec<AccountId> = from.to_vec();
        while let Some(id) = stack.pop() {
            if !reached.insert(id) {
                continue;
            }
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children.iter().copied());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: AccountId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: AccountId) -> Option<&AccountNode> {
        self.nodes.get(&id)
    }

    /// Root ids in input order
    pub fn roots(&self) -> &[AccountId] {
        &self.roots
    }

    pub fn root_nodes(&self) -> impl Iterator<Item = &AccountNode> {
        self.roots.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Direct children of `id`; empty for unknown ids
    pub fn children(&self, id: AccountId) -> &[AccountId] {
        self.nodes.get(&id).map(|n| n.children()).unwrap_or(&[])
    }

    pub fn child_nodes(&self, id: AccountId) -> impl Iterator<Item = &AccountNode> {
        self.children(id).iter().filter_map(|c| self.nodes.get(c))
    }

    /// False for unknown ids
    pub fn is_container(&self, id: AccountId) -> bool {
        self.nodes.get(&id).map_or(false, |n| n.is_container())
    }

    /// Ancestor ids, root first, excluding `id` itself
    pub fn ancestors(&self, id: AccountId) -> Vec<AccountId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(id);
        let mut cursor = self.nodes.get(&id).and_then(|n| n.parent);
        while let Some(parent) = cursor {
            if !seen.insert(parent) {
                break;
            }
            chain.push(parent);
            cursor = self.nodes.get(&parent).and_then(|n| n.parent);
        }
        chain.reverse();
        chain
    }

    /// Distance from the root (roots are 0)
    pub fn depth(&self, id: AccountId) -> usize {
        self.ancestors(id).len()
    }

    /// Every node with its depth, pre-order, siblings in input order
    pub fn walk(&self) -> Vec<(&AccountNode, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut visited = HashSet::with_capacity(self.nodes.len());
        let mut stack: Vec<(AccountId, usize)> = self.roots.iter().rev().map(|&id| (id, 0)).collect();

        while let Some((id, depth)) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(node) = self.nodes.get(&id) else { continue };
            out.push((node, depth));
            for &child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }

    /// Records in pre-order
    pub fn records(&self) -> impl Iterator<Item = &AccountRecord> {
        self.walk().into_iter().map(|(node, _)| &node.record)
    }
}
