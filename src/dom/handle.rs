//! Handles: name-addressed, validity-checked references to nodes.
//!
//! A [`Handle`] names a node and caches the arena key it last resolved to.
//! It is valid while the store holds a node under that name whose behaviour
//! matches the optional type tag. Resolution goes through
//! [`NodeStore::resolve`](super::store::NodeStore::resolve); a handle never
//! dereferences on its own, so it cannot observe a destroyed node.

use std::any::TypeId;
use std::cell::Cell;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::node::NodeId;
use crate::widget::Behavior;

/// Reference to a node by name, with an optional concrete-type constraint.
#[derive(Clone)]
pub struct Handle {
    name: String,
    type_tag: Option<TypeId>,
    cached: Cell<NodeId>,
}

impl Handle {
    /// Untyped handle to whatever node is named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: None,
            cached: Cell::new(NodeId::default()),
        }
    }

    /// Handle that is only valid while the named node's behaviour is a `B`.
    pub fn typed<B: Behavior>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: Some(TypeId::of::<B>()),
            cached: Cell::new(NodeId::default()),
        }
    }

    pub(crate) fn bound(name: impl Into<String>, type_tag: Option<TypeId>, id: NodeId) -> Self {
        Self {
            name: name.into(),
            type_tag,
            cached: Cell::new(id),
        }
    }

    /// The node name this handle refers to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type constraint, if any.
    pub fn type_tag(&self) -> Option<TypeId> {
        self.type_tag
    }

    /// Drop the type constraint.
    pub fn untyped(&self) -> Handle {
        Handle {
            name: self.name.clone(),
            type_tag: None,
            cached: self.cached.clone(),
        }
    }

    pub(crate) fn cached(&self) -> NodeId {
        self.cached.get()
    }

    pub(crate) fn refresh(&self, id: NodeId) {
        self.cached.set(id);
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.type_tag == other.type_tag
    }
}

impl Eq for Handle {}

impl Hash for Handle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.type_tag.hash(state);
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("name", &self.name)
            .field("typed", &self.type_tag.is_some())
            .finish()
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ---------------------------------------------------------------------------
// NodeRef
// ---------------------------------------------------------------------------

/// Either a name or a handle; accepted wherever an operation takes
/// "handle or name".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRef {
    Name(String),
    Handle(Handle),
}

impl NodeRef {
    /// The referenced name.
    pub fn name(&self) -> &str {
        match self {
            NodeRef::Name(name) => name,
            NodeRef::Handle(handle) => handle.name(),
        }
    }

    /// Convert to a handle (untyped for names).
    pub fn into_handle(self) -> Handle {
        match self {
            NodeRef::Name(name) => Handle::new(name),
            NodeRef::Handle(handle) => handle,
        }
    }
}

impl From<&str> for NodeRef {
    fn from(name: &str) -> Self {
        NodeRef::Name(name.to_owned())
    }
}

impl From<String> for NodeRef {
    fn from(name: String) -> Self {
        NodeRef::Name(name)
    }
}

impl From<&String> for NodeRef {
    fn from(name: &String) -> Self {
        NodeRef::Name(name.clone())
    }
}

impl From<Handle> for NodeRef {
    fn from(handle: Handle) -> Self {
        NodeRef::Handle(handle)
    }
}

impl From<&Handle> for NodeRef {
    fn from(handle: &Handle) -> Self {
        NodeRef::Handle(handle.clone())
    }
}
