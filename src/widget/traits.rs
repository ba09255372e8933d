//! Behavior trait: the per-kind hooks every node carries.
//!
//! All node kinds share tree, event and geometry handling through the scene;
//! what differs per kind lives behind [`Behavior`]. The concrete type of a
//! node's behaviour is its type tag, checked by typed
//! [`Handle`](crate::dom::Handle)s.

use std::any::Any;

use crate::dom::node::NodeCore;
use crate::event::record::Event;
use crate::geometry::Region;

/// Hooks implemented by each node kind.
///
/// Object-safe: every hook takes `&self`/`&mut self` and has a default except
/// the identity methods.
pub trait Behavior: Any {
    /// Type name of this kind (e.g. `"Label"`), as registered with the factory.
    fn type_name(&self) -> &str;

    /// Called once when the node is built, before it enters the store.
    fn on_init(&mut self, _core: &mut NodeCore) {}

    /// Called at the target phase of every event dispatched at this node,
    /// before its listeners run.
    fn on_event(&mut self, _event: &Event) {}

    /// Called once per frame for nodes attached to the stage.
    fn on_update(&mut self, _elapsed: f32) {}

    /// Describe what this node draws within `bounds`, if anything.
    fn on_render(&self, _bounds: Region) -> Option<String> {
        None
    }

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to `&mut dyn Any` for mutable runtime type inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// One entry of a render pass, in painter's order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    /// Node name.
    pub name: String,
    /// Resolved world bounds.
    pub bounds: Region,
    /// What the node's behaviour reported drawing.
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Group, Label};

    #[test]
    fn downcast_through_trait_object() {
        let boxed: Box<dyn Behavior> = Box::new(Label::new("hello"));
        assert_eq!(boxed.type_name(), "Label");
        let label = boxed.as_any().downcast_ref::<Label>().unwrap();
        assert_eq!(label.text(), "hello");
        assert!(boxed.as_any().downcast_ref::<Group>().is_none());
    }

    #[test]
    fn default_hooks_are_inert() {
        let mut group = Group::new();
        group.on_update(0.016);
        assert!(group.on_render(Region::new(0.0, 0.0, 1.0, 1.0)).is_none());
    }
}
