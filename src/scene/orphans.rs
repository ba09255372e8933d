//! Orphan registry and garbage collection.
//!
//! An orphan is any parentless node other than the root. The set is derived
//! from the store on every query rather than tracked separately.

use tracing::debug;

use super::Scene;
use crate::dom::handle::{Handle, NodeRef};
use crate::dom::node::{NodeId, RetentionPolicy};

impl Scene {
    fn orphan_ids(&self) -> Vec<NodeId> {
        self.store
            .ids()
            .filter(|&id| id != self.root && self.store.parent(id).is_none())
            .collect()
    }

    /// All current orphans, sorted by name.
    pub fn orphans(&self) -> Vec<Handle> {
        let mut orphans = self.handles(&self.orphan_ids());
        orphans.sort_by(|a, b| a.name().cmp(b.name()));
        orphans
    }

    /// Number of current orphans.
    pub fn count_orphans(&self) -> usize {
        self.orphan_ids().len()
    }

    /// Destroy every orphan whose policy is [`RetentionPolicy::AutoDestroy`],
    /// along with auto-destroy descendants left parentless by it. Returns the
    /// number of nodes removed from the store.
    pub fn collect_garbage(&mut self) -> usize {
        let before = self.store.len();
        let doomed: Vec<NodeId> = self
            .orphan_ids()
            .into_iter()
            .filter(|&id| {
                self.store
                    .get(id)
                    .is_some_and(|n| n.core.retention == RetentionPolicy::AutoDestroy)
            })
            .collect();
        for id in doomed {
            // An earlier destroy's listeners may have reparented or removed it.
            if self.store.contains(id) && self.store.parent(id).is_none() {
                self.destroy_id(id);
            }
        }
        let collected = before.saturating_sub(self.store.len());
        debug!(collected, remaining_orphans = self.count_orphans(), "garbage collected");
        collected
    }

    /// Orphan retention policy of `node`.
    pub fn retention(&self, node: impl Into<NodeRef>) -> Option<RetentionPolicy> {
        self.core(node).map(|c| c.retention)
    }

    /// Change the orphan retention policy of `node`. Takes effect on the next
    /// [`collect_garbage`](Self::collect_garbage).
    pub fn set_retention(&mut self, node: impl Into<NodeRef>, policy: RetentionPolicy) -> bool {
        self.core_mut(node).map(|c| c.retention = policy).is_some()
    }
}
