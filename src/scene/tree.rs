//! Tree operations: attach, detach, lookup and ancestry.
//!
//! Attaching fires `Added` (and `AddedToStage` when the new parent is under
//! the root) at the child; detaching fires `Removed` (and `RemovedFromStage`
//! when it was under the root). The parent is the event's related target.

use tracing::debug;

use super::Scene;
use crate::dom::handle::{Handle, NodeRef};
use crate::dom::node::NodeId;
use crate::error::{Result, SceneError};
use crate::event::record::Event;
use crate::event::types::EventType;

impl Scene {
    /// Append `child` to `parent`'s children, detaching it from any previous
    /// parent first.
    ///
    /// Fails with [`SceneError::CycleRejected`] when `child` is `parent`, an
    /// ancestor of it, or the root.
    pub fn add_child(&mut self, parent: impl Into<NodeRef>, child: impl Into<NodeRef>) -> Result<()> {
        let parent = self.require(&parent.into())?;
        let child = self.require(&child.into())?;
        if child == self.root || child == parent || self.store.is_ancestor(child, parent) {
            return Err(SceneError::CycleRejected {
                parent: self.name_of(parent),
                child: self.name_of(child),
            });
        }
        self.detach(child);
        self.attach(parent, child);
        Ok(())
    }

    /// Detach `child` from `parent` without destroying it. Returns `false`
    /// when `child` is not a direct child of `parent`.
    pub fn remove_child(&mut self, parent: impl Into<NodeRef>, child: impl Into<NodeRef>) -> bool {
        let (Some(parent), Some(child)) = (self.id(parent), self.id(child)) else {
            return false;
        };
        if self.store.parent(child) != Some(parent) {
            return false;
        }
        self.detach(child).is_some()
    }

    /// Detach `node` from its own parent.
    pub fn remove_from_parent(&mut self, node: impl Into<NodeRef>) -> bool {
        match self.id(node) {
            Some(id) => self.detach(id).is_some(),
            None => false,
        }
    }

    /// Detach the first node in `node`'s subtree (depth-first, `node` itself
    /// excluded) that matches `descendant`.
    pub fn remove_descendant(&mut self, node: impl Into<NodeRef>, descendant: impl Into<NodeRef>) -> bool {
        let (Some(start), Some(wanted)) = (self.id(node), self.id(descendant)) else {
            return false;
        };
        let found = self
            .store
            .walk_depth_first(start)
            .into_iter()
            .skip(1)
            .any(|id| id == wanted);
        found && self.detach(wanted).is_some()
    }

    /// Reparent `node` under `parent`, or detach it when `parent` is `None`.
    pub fn set_parent(&mut self, node: impl Into<NodeRef>, parent: Option<NodeRef>) -> Result<()> {
        let node = node.into();
        match parent {
            Some(parent) => self.add_child(parent, node),
            None => {
                let id = self.require(&node)?;
                self.detach(id);
                Ok(())
            }
        }
    }

    /// Whether `child` is a direct child of `parent`.
    pub fn has_child(&self, parent: impl Into<NodeRef>, child: impl Into<NodeRef>) -> bool {
        match (self.id(parent), self.id(child)) {
            (Some(p), Some(c)) => self.store.parent(c) == Some(p),
            _ => false,
        }
    }

    /// Direct child of `parent` named `name`.
    pub fn get_child(&self, parent: impl Into<NodeRef>, name: &str) -> Option<Handle> {
        let parent = self.id(parent)?;
        let child = self.store.id_of(name)?;
        if self.store.parent(child) == Some(parent) {
            self.store.handle(child)
        } else {
            None
        }
    }

    /// Parent of `node`.
    pub fn get_parent(&self, node: impl Into<NodeRef>) -> Option<Handle> {
        let parent = self.store.parent(self.id(node)?)?;
        self.store.handle(parent)
    }

    /// Children of `node` in storage order.
    pub fn get_children(&self, node: impl Into<NodeRef>) -> Vec<Handle> {
        let Some(id) = self.id(node) else {
            return Vec::new();
        };
        self.handles(self.store.children(id))
    }

    /// Whether `node` is an ancestor of `other`.
    pub fn is_ancestor_of(&self, node: impl Into<NodeRef>, other: impl Into<NodeRef>) -> bool {
        match (self.id(node), self.id(other)) {
            (Some(a), Some(d)) => self.store.is_ancestor(a, d),
            _ => false,
        }
    }

    /// Whether `node` is a descendant of `other`.
    pub fn is_descendant_of(&self, node: impl Into<NodeRef>, other: impl Into<NodeRef>) -> bool {
        match (self.id(node), self.id(other)) {
            (Some(d), Some(a)) => self.store.is_ancestor(a, d),
            _ => false,
        }
    }

    /// Whether `node` is the root or under it.
    pub fn is_on_stage(&self, node: impl Into<NodeRef>) -> bool {
        self.id(node).is_some_and(|id| self.on_stage(id))
    }

    /// `node` and its descendants, pre-order depth-first.
    pub fn descendants(&self, node: impl Into<NodeRef>) -> Vec<Handle> {
        let Some(id) = self.id(node) else {
            return Vec::new();
        };
        self.handles(&self.store.walk_depth_first(id))
    }

    // ── Internals ────────────────────────────────────────────────────

    pub(crate) fn on_stage(&self, id: NodeId) -> bool {
        self.store.contains(id) && self.store.top(id) == self.root
    }

    pub(crate) fn handles(&self, ids: &[NodeId]) -> Vec<Handle> {
        ids.iter().filter_map(|&id| self.store.handle(id)).collect()
    }

    fn name_of(&self, id: NodeId) -> String {
        self.store
            .get(id)
            .map(|n| n.name().to_owned())
            .unwrap_or_default()
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.store.link(parent, child);
        self.pin_far_edges(child);
        self.mark_dirty(child);
        let (Some(p), Some(c)) = (self.store.handle(parent), self.store.handle(child)) else {
            return;
        };
        debug!(parent = p.name(), child = c.name(), "attached");
        let staged = self.on_stage(child).then(|| self.subtree(child));
        self.dispatch(Event::new(EventType::ADDED).with_target(c).with_related(p.clone()));
        for node in staged.unwrap_or_default() {
            self.dispatch(Event::new(EventType::ADDED_TO_STAGE).with_target(node).with_related(p.clone()));
        }
    }

    /// Unlink `id` from its parent, firing removal events. Returns the former parent.
    ///
    /// `RemovedFromStage` reaches `id` and every descendant when the subtree
    /// leaves the stage.
    pub(crate) fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let staged = self.on_stage(id).then(|| self.subtree(id));
        let parent = self.store.unlink(id)?;
        self.mark_dirty(id);
        let (Some(p), Some(c)) = (self.store.handle(parent), self.store.handle(id)) else {
            return Some(parent);
        };
        debug!(parent = p.name(), child = c.name(), "detached");
        self.dispatch(Event::new(EventType::REMOVED).with_target(c).with_related(p.clone()));
        for node in staged.unwrap_or_default() {
            self.dispatch(Event::new(EventType::REMOVED_FROM_STAGE).with_target(node).with_related(p.clone()));
        }
        Some(parent)
    }

    /// `id` and its descendants, pre-order.
    fn subtree(&self, id: NodeId) -> Vec<Handle> {
        self.handles(&self.store.walk_depth_first(id))
    }
}
