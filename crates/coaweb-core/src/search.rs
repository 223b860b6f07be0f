//! Substring search over the whole forest
//!
//! A query is evaluated once into two id sets: accounts whose code or name
//! contains the query, and accounts with such a hit anywhere in their
//! subtree. Views and auto-expansion then read those sets instead of
//! re-testing descendants.

use coaweb_store::AccountId;
use std::collections::HashSet;

use crate::expansion::ExpansionState;
use crate::tree::AccountForest;
use crate::view::ViewRow;

/// Per-query match predicates for every account in a forest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchMatches {
    needle: String,
    self_hits: HashSet<AccountId>,
    subtree_hits: HashSet<AccountId>,
}

impl SearchMatches {
    /// Evaluate `query` against the forest
    ///
    /// Returns None for the empty query: search is inactive and nothing
    /// is filtered or expanded.
    pub fn evaluate(forest: &AccountForest, query: &str) -> Option<Self> {
        if query.is_empty() {
            return None;
        }
        let needle = query.to_lowercase();
        let mut self_hits = HashSet::new();
        let mut subtree_hits = HashSet::new();

        // Post-order: a node is finished only after all of its children
        let mut visited = HashSet::with_capacity(forest.len());
        let mut stack: Vec<(AccountId, bool)> = forest.roots().iter().rev().map(|&id| (id, false)).collect();
        while let Some((id, children_done)) = stack.pop() {
            let Some(node) = forest.get(id) else { continue };
            if children_done {
                let hit = node.record.matches(&needle);
                if hit {
                    self_hits.insert(id);
                }
                if hit || node.children().iter().any(|c| subtree_hits.contains(c)) {
                    subtree_hits.insert(id);
                }
                continue;
            }
            if !visited.insert(id) {
                continue;
            }
            stack.push((id, true));
            for &child in node.children().iter().rev() {
                stack.push((child, false));
            }
        }

        log::debug!(
            "Search '{}': {} direct hits, {} accounts on hit paths",
            query,
            self_hits.len(),
            subtree_hits.len()
        );
        Some(Self {
            needle,
            self_hits,
            subtree_hits,
        })
    }

    /// Lowercased query
    pub fn needle(&self) -> &str {
        &self.needle
    }

    pub fn matches_self(&self, id: AccountId) -> bool {
        self.self_hits.contains(&id)
    }

    pub fn matches_subtree(&self, id: AccountId) -> bool {
        self.subtree_hits.contains(&id)
    }

    pub fn hit_count(&self) -> usize {
        self.self_hits.len()
    }

    /// Accounts whose hit lies strictly below them
    pub fn expand_targets(&self) -> HashSet<AccountId> {
        self.subtree_hits.difference(&self.self_hits).copied().collect()
    }
}

/// Ids that a query opens automatically; empty when the query is empty
pub fn auto_expand_targets(forest: &AccountForest, query: &str) -> HashSet<AccountId> {
    SearchMatches::evaluate(forest, query)
        .map(|m| m.expand_targets())
        .unwrap_or_default()
}

/// Full-tree rows filtered by `matches`
///
/// Rows come out pre-order with their depth. Subtrees without a hit are
/// skipped at their root. With no matches (inactive search) every account
/// is included.
pub fn search_view(forest: &AccountForest, matches: Option<&SearchMatches>, expansion: &ExpansionState) -> Vec<ViewRow> {
    let keep = |id: AccountId| matches.map_or(true, |m| m.matches_subtree(id));

    let mut rows = Vec::new();
    let mut visited = HashSet::with_capacity(forest.len());
    let mut stack: Vec<(AccountId, usize)> = forest
        .roots()
        .iter()
        .rev()
        .filter(|&&id| keep(id))
        .map(|&id| (id, 0))
        .collect();

    while let Some((id, depth)) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        let Some(node) = forest.get(id) else { continue };
        let is_match = matches.map_or(false, |m| m.matches_self(id));
        rows.push(ViewRow::new(node, depth, expansion.is_open(id), is_match));
        for &child in node.children().iter().rev() {
            if keep(child) {
                stack.push((child, depth + 1));
            }
        }
    }
    rows
}
