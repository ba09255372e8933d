//! Node store: slotmap arena plus a name index.
//!
//! The store is the only owner of node lifetime. Parent/child links live on
//! the nodes as arena keys; the link helpers here keep both sides consistent
//! and never fire events (the scene layers notifications on top).

use std::collections::{HashMap, VecDeque};

use slotmap::SlotMap;

use super::handle::{Handle, NodeRef};
use super::node::{Node, NodeId};
use crate::error::{Result, SceneError};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// Arena of nodes keyed by unique name.
#[derive(Debug, Default)]
pub struct NodeStore {
    nodes: SlotMap<NodeId, Node>,
    names: HashMap<String, NodeId>,
}

impl NodeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under its name.
    ///
    /// Fails with [`SceneError::NameCollision`] if the name is taken.
    pub fn insert(&mut self, node: Node) -> Result<NodeId> {
        if self.names.contains_key(node.name()) {
            return Err(SceneError::NameCollision(node.name().to_owned()));
        }
        let name = node.name().to_owned();
        let id = self.nodes.insert(node);
        self.names.insert(name, id);
        Ok(id)
    }

    /// Remove a single node from the arena, unlinking it from its parent and
    /// clearing its children's parent links. Children stay in the store.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.unlink(id);
        let mut node = self.nodes.remove(id)?;
        self.names.remove(node.name());
        for child in std::mem::take(&mut node.core.children) {
            if let Some(c) = self.nodes.get_mut(child) {
                c.core.parent = None;
            }
        }
        Some(node)
    }

    /// Key of the node named `name`.
    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Resolve a handle to a live key, refreshing its cache.
    ///
    /// Returns `None` if no node has the handle's name or the type tag does
    /// not match the node's behaviour.
    pub fn resolve(&self, handle: &Handle) -> Option<NodeId> {
        let cached = handle.cached();
        let id = match self.nodes.get(cached) {
            Some(node) if node.name() == handle.name() => cached,
            _ => self.id_of(handle.name())?,
        };
        if let Some(tag) = handle.type_tag() {
            if self.nodes.get(id)?.type_tag() != tag {
                return None;
            }
        }
        handle.refresh(id);
        Some(id)
    }

    /// Resolve a name or handle.
    pub fn resolve_ref(&self, node: &NodeRef) -> Option<NodeId> {
        match node {
            NodeRef::Name(name) => self.id_of(name),
            NodeRef::Handle(handle) => self.resolve(handle),
        }
    }

    /// Fresh untyped handle bound to `id`.
    pub fn handle(&self, id: NodeId) -> Option<Handle> {
        self.nodes.get(id).map(|n| Handle::bound(n.name(), None, id))
    }

    /// Immutable access to a node.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutable access to a node.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Whether the store holds `id`.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All keys, in arena order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys()
    }

    // ── Links ────────────────────────────────────────────────────────

    /// Parent of `id`.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.core.parent)
    }

    /// Children of `id`, or an empty slice.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.core.children.as_slice())
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Detach `id` from its parent. Returns the former parent.
    pub fn unlink(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self.nodes.get_mut(id)?.core.parent.take()?;
        if let Some(p) = self.nodes.get_mut(parent) {
            p.core.children.retain(|&c| c != id);
        }
        Some(parent)
    }

    /// Append `child` to `parent`'s children, detaching it from any prior parent.
    ///
    /// Callers are responsible for cycle checks.
    pub fn link(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) {
            return;
        }
        self.unlink(child);
        if let Some(c) = self.nodes.get_mut(child) {
            c.core.parent = Some(parent);
        }
        if let Some(p) = self.nodes.get_mut(parent) {
            p.core.children.push(child);
        }
    }

    /// Walk from `id` up to the topmost ancestor, not including `id`.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent(current) {
            result.push(p);
            current = p;
        }
        result
    }

    /// The topmost ancestor of `id` (or `id` itself when parentless).
    pub fn top(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().copied().unwrap_or(id)
    }

    /// Whether `ancestor` appears on `id`'s parent chain.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = id;
        while let Some(p) = self.parent(current) {
            if p == ancestor {
                return true;
            }
            current = p;
        }
        false
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Breadth-first traversal starting from `start`.
    pub fn walk_breadth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            queue.extend(self.children(current).iter().copied());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::NodeCore;
    use crate::widgets::{Group, Label};

    fn group(name: &str) -> Node {
        Node::new(NodeCore::new(name), Box::new(Group::new()))
    }

    /// Build a small test tree:
    /// ```text
    ///       root
    ///      /    \
    ///    a        b
    ///   / \
    ///  c   d
    /// ```
    fn build_tree() -> (NodeStore, NodeId, NodeId, NodeId, NodeId, NodeId) {
        let mut store = NodeStore::new();
        let root = store.insert(group("root")).unwrap();
        let a = store.insert(group("a")).unwrap();
        let b = store.insert(group("b")).unwrap();
        let c = store.insert(group("c")).unwrap();
        let d = store.insert(group("d")).unwrap();
        store.link(root, a);
        store.link(root, b);
        store.link(a, c);
        store.link(a, d);
        (store, root, a, b, c, d)
    }

    #[test]
    fn insert_rejects_duplicate_name() {
        let mut store = NodeStore::new();
        store.insert(group("x")).unwrap();
        let err = store.insert(group("x")).unwrap_err();
        assert!(matches!(err, SceneError::NameCollision(name) if name == "x"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn links_and_children() {
        let (store, root, a, b, c, d) = build_tree();
        assert_eq!(store.children(root), &[a, b]);
        assert_eq!(store.children(a), &[c, d]);
        assert_eq!(store.parent(c), Some(a));
        assert_eq!(store.parent(root), None);
    }

    #[test]
    fn link_moves_from_prior_parent() {
        let (mut store, root, a, b, c, _d) = build_tree();
        store.link(b, c);
        assert_eq!(store.parent(c), Some(b));
        assert!(!store.children(a).contains(&c));
        assert_eq!(store.ancestors(c), vec![b, root]);
    }

    #[test]
    fn ancestors_and_top() {
        let (store, root, a, _b, c, _d) = build_tree();
        assert_eq!(store.ancestors(c), vec![a, root]);
        assert!(store.ancestors(root).is_empty());
        assert_eq!(store.top(c), root);
        assert_eq!(store.top(root), root);
        assert!(store.is_ancestor(root, c));
        assert!(!store.is_ancestor(c, root));
    }

    #[test]
    fn remove_orphans_children_but_keeps_them() {
        let (mut store, root, a, _b, c, d) = build_tree();
        let removed = store.remove(a).unwrap();
        assert_eq!(removed.name(), "a");
        assert!(!store.contains(a));
        assert!(store.contains(c));
        assert_eq!(store.parent(c), None);
        assert_eq!(store.parent(d), None);
        assert!(!store.children(root).contains(&a));
        assert!(store.id_of("a").is_none());
    }

    #[test]
    fn handle_resolution_fails_after_remove() {
        let (mut store, _root, _a, b, ..) = build_tree();
        let h = store.handle(b).unwrap();
        assert_eq!(store.resolve(&h), Some(b));
        store.remove(b);
        assert_eq!(store.resolve(&h), None);
    }

    #[test]
    fn stale_key_never_aliases_new_node() {
        let mut store = NodeStore::new();
        let old = store.insert(group("old")).unwrap();
        store.remove(old);
        let fresh = store.insert(group("fresh")).unwrap();
        assert_ne!(old, fresh);
        assert!(store.get(old).is_none());
    }

    #[test]
    fn recreated_name_resolves_to_fresh_identity() {
        let mut store = NodeStore::new();
        let first = store.insert(group("n")).unwrap();
        let h = store.handle(first).unwrap();
        store.remove(first);
        assert!(store.resolve(&h).is_none());
        let second = store.insert(group("n")).unwrap();
        assert_ne!(first, second);
        assert_eq!(store.resolve(&h), Some(second));
    }

    #[test]
    fn typed_handle_checks_behavior() {
        let mut store = NodeStore::new();
        let id = store
            .insert(Node::new(NodeCore::new("title"), Box::new(Label::new("hi"))))
            .unwrap();
        assert_eq!(store.resolve(&Handle::typed::<Label>("title")), Some(id));
        assert_eq!(store.resolve(&Handle::typed::<Group>("title")), None);
    }

    #[test]
    fn walks() {
        let (store, root, a, b, c, d) = build_tree();
        assert_eq!(store.walk_depth_first(root), vec![root, a, c, d, b]);
        assert_eq!(store.walk_breadth_first(root), vec![root, a, b, c, d]);
        assert_eq!(store.walk_depth_first(a), vec![a, c, d]);
    }
}
