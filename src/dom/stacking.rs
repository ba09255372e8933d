//! Stacking arguments: a value for the receiver, or a redirect to one of its children.

use super::handle::NodeRef;

/// Argument of the priority / z-order setters.
///
/// `Direct(v)` applies `v` to the receiver. `Child { child, value }` applies
/// the operation to the named direct child of the receiver, optionally
/// carrying the value in the same call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<V = ()> {
    Direct(V),
    Child { child: NodeRef, value: Option<V> },
}

impl<V> Target<V> {
    /// Redirect to `child` without a value.
    pub fn child(child: impl Into<NodeRef>) -> Self {
        Target::Child { child: child.into(), value: None }
    }

    /// Redirect to `child` carrying `value`.
    pub fn child_with(child: impl Into<NodeRef>, value: V) -> Self {
        Target::Child { child: child.into(), value: Some(value) }
    }
}

impl<V> From<V> for Target<V> {
    fn from(value: V) -> Self {
        Target::Direct(value)
    }
}
