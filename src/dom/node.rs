//! Node types: NodeId, NodeCore, Node.

use std::any::TypeId;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use super::anchor::Anchors;
use crate::event::listener::ListenerRegistry;
use crate::widget::Behavior;

new_key_type! {
    /// Arena key of a node. Generational, so a key to a destroyed node never
    /// aliases a node created later in the same slot.
    pub struct NodeId;
}

/// What happens to a node while it sits parentless outside the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionPolicy {
    /// Kept until destroyed explicitly by name.
    #[default]
    #[serde(alias = "manual")]
    RetainUntilManual,
    /// Destroyed by the next garbage collection pass.
    #[serde(alias = "auto")]
    AutoDestroy,
}

/// Stored geometry of a node.
///
/// Each edge offset is measured from the reference point that edge's anchor
/// picks on the parent's bounds. Width and height are stored as-is.
/// `right`/`bottom` stay unset until the node is first attached or placed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub left: f32,
    pub top: f32,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
    pub width: f32,
    pub height: f32,
    pub anchors: Anchors,
}

/// Data shared by every node regardless of its behaviour.
#[derive(Debug)]
pub struct NodeCore {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) listeners: ListenerRegistry,
    /// Anchored geometry.
    pub geometry: Geometry,
    /// Logical ordering key among siblings.
    pub priority: i32,
    /// Storage-position key among siblings.
    pub z_order: i32,
    pub clickable: bool,
    pub enabled: bool,
    pub hidden: bool,
    pub tab_enabled: bool,
    pub tab_priority: i32,
    /// Set whenever geometry changes; cleared by the renderer.
    pub dirty: bool,
    pub retention: RetentionPolicy,
}

impl NodeCore {
    /// Create node data with the given name and defaults: enabled, visible,
    /// not clickable, not tab-enabled, zero geometry.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            listeners: ListenerRegistry::default(),
            geometry: Geometry::default(),
            priority: 0,
            z_order: 0,
            clickable: false,
            enabled: true,
            hidden: false,
            tab_enabled: false,
            tab_priority: 0,
            dirty: true,
            retention: RetentionPolicy::default(),
        }
    }

    /// Set position offsets and size (builder).
    pub fn with_bounds(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.geometry.left = x;
        self.geometry.top = y;
        self.geometry.width = width;
        self.geometry.height = height;
        self
    }

    /// Set the edge anchors (builder).
    pub fn with_anchors(mut self, anchors: Anchors) -> Self {
        self.geometry.anchors = anchors;
        self
    }

    /// Set whether the node reacts to clicks (builder).
    pub fn clickable(mut self, clickable: bool) -> Self {
        self.clickable = clickable;
        self
    }

    /// Put the node in the tab order with the given priority (builder).
    pub fn tab_stop(mut self, tab_priority: i32) -> Self {
        self.tab_enabled = true;
        self.tab_priority = tab_priority;
        self
    }

    /// Set the logical priority (builder).
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the orphan retention policy (builder).
    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    /// The unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent key, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child keys in storage order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// `!hidden`.
    pub fn visible(&self) -> bool {
        !self.hidden
    }
}

/// A node: shared data plus the behaviour of its concrete kind.
pub struct Node {
    pub(crate) core: NodeCore,
    pub(crate) behavior: Box<dyn Behavior>,
}

impl Node {
    /// Pair node data with a behaviour, running the behaviour's init hook.
    pub fn new(mut core: NodeCore, mut behavior: Box<dyn Behavior>) -> Self {
        behavior.on_init(&mut core);
        Self { core, behavior }
    }

    /// Shared node data.
    pub fn core(&self) -> &NodeCore {
        &self.core
    }

    /// Mutable shared node data.
    pub fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    /// The unique name.
    pub fn name(&self) -> &str {
        &self.core.name
    }

    /// Type name reported by the behaviour (e.g. `"Label"`).
    pub fn type_name(&self) -> &str {
        self.behavior.type_name()
    }

    /// `TypeId` of the concrete behaviour, used as the handle type tag.
    pub fn type_tag(&self) -> TypeId {
        self.behavior.as_any().type_id()
    }

    /// The behaviour.
    pub fn behavior(&self) -> &dyn Behavior {
        self.behavior.as_ref()
    }

    /// The behaviour, mutably.
    pub fn behavior_mut(&mut self) -> &mut dyn Behavior {
        self.behavior.as_mut()
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("type", &self.type_name())
            .field("core", &self.core)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Group, Label};

    #[test]
    fn new_defaults() {
        let core = NodeCore::new("box");
        assert_eq!(core.name(), "box");
        assert!(core.parent().is_none());
        assert!(core.children().is_empty());
        assert!(core.enabled);
        assert!(core.visible());
        assert!(!core.clickable);
        assert!(!core.tab_enabled);
        assert_eq!(core.retention, RetentionPolicy::RetainUntilManual);
    }

    #[test]
    fn builders() {
        let core = NodeCore::new("b")
            .with_bounds(1.0, 2.0, 3.0, 4.0)
            .clickable(true)
            .tab_stop(7)
            .with_priority(-2)
            .with_retention(RetentionPolicy::AutoDestroy);
        assert_eq!(core.geometry.left, 1.0);
        assert_eq!(core.geometry.height, 4.0);
        assert!(core.clickable);
        assert!(core.tab_enabled);
        assert_eq!(core.tab_priority, 7);
        assert_eq!(core.priority, -2);
        assert_eq!(core.retention, RetentionPolicy::AutoDestroy);
    }

    #[test]
    fn type_tag_is_concrete_behavior() {
        let group = Node::new(NodeCore::new("g"), Box::new(Group::new()));
        let label = Node::new(NodeCore::new("l"), Box::new(Label::new("hi")));
        assert_eq!(group.type_tag(), TypeId::of::<Group>());
        assert_eq!(label.type_tag(), TypeId::of::<Label>());
        assert_eq!(label.type_name(), "Label");
    }

    #[test]
    fn retention_policy_parses_aliases() {
        let p: RetentionPolicy = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(p, RetentionPolicy::AutoDestroy);
        let p: RetentionPolicy = serde_json::from_str("\"retain_until_manual\"").unwrap();
        assert_eq!(p, RetentionPolicy::RetainUntilManual);
    }

    #[test]
    fn node_id_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<NodeId>();
    }
}
