//! Priority and z-order among siblings.
//!
//! Every setter takes a [`Target`]: a value for the receiver, or a redirect
//! to one of its direct children. Priority and z-order are independent keys;
//! neither setter reorders children, the `sort_*` calls do.

use super::Scene;
use crate::dom::handle::NodeRef;
use crate::dom::node::{NodeCore, NodeId};
use crate::dom::stacking::Target;

impl Scene {
    /// Resolve a stacking argument to the node it acts on and its value.
    fn resolve_target<V>(&self, node: NodeRef, target: Target<V>) -> Option<(NodeId, Option<V>)> {
        let receiver = self.store.resolve_ref(&node)?;
        match target {
            Target::Direct(value) => Some((receiver, Some(value))),
            Target::Child { child, value } => {
                let child = self.store.resolve_ref(&child)?;
                (self.store.parent(child) == Some(receiver)).then_some((child, value))
            }
        }
    }

    fn siblings(&self, id: NodeId) -> impl Iterator<Item = &NodeCore> + '_ {
        let parent = self.store.parent(id);
        parent
            .map(|p| self.store.children(p))
            .unwrap_or_default()
            .iter()
            .filter(move |&&s| s != id)
            .filter_map(|&s| self.store.get(s).map(|n| &n.core))
    }

    /// Set the priority of the receiver or of a named child.
    pub fn set_priority(&mut self, node: impl Into<NodeRef>, target: impl Into<Target<i32>>) -> bool {
        let Some((id, Some(priority))) = self.resolve_target(node.into(), target.into()) else {
            return false;
        };
        self.store
            .get_mut(id)
            .map(|n| n.core.priority = priority)
            .is_some()
    }

    pub fn get_priority(&self, node: impl Into<NodeRef>) -> Option<i32> {
        self.core(node).map(|c| c.priority)
    }

    /// Set the z-order of the receiver or of a named child.
    pub fn set_z_order(&mut self, node: impl Into<NodeRef>, target: impl Into<Target<i32>>) -> bool {
        let Some((id, Some(z))) = self.resolve_target(node.into(), target.into()) else {
            return false;
        };
        self.store.get_mut(id).map(|n| n.core.z_order = z).is_some()
    }

    pub fn get_z_order(&self, node: impl Into<NodeRef>) -> Option<i32> {
        self.core(node).map(|c| c.z_order)
    }

    /// Give the receiver (or a named child) a priority one above the highest
    /// among its siblings. A node without siblings keeps its priority.
    pub fn set_to_highest_priority(&mut self, node: impl Into<NodeRef>, target: impl Into<Target>) -> bool {
        let Some((id, _)) = self.resolve_target(node.into(), target.into()) else {
            return false;
        };
        if let Some(max) = self.siblings(id).map(|c| c.priority).max() {
            if let Some(n) = self.store.get_mut(id) {
                n.core.priority = max.saturating_add(1);
            }
        }
        true
    }

    /// Give the receiver (or a named child) a priority one below the lowest
    /// among its siblings.
    pub fn set_to_lowest_priority(&mut self, node: impl Into<NodeRef>, target: impl Into<Target>) -> bool {
        let Some((id, _)) = self.resolve_target(node.into(), target.into()) else {
            return false;
        };
        if let Some(min) = self.siblings(id).map(|c| c.priority).min() {
            if let Some(n) = self.store.get_mut(id) {
                n.core.priority = min.saturating_sub(1);
            }
        }
        true
    }

    /// Give the receiver (or a named child) a z-order above all of its
    /// siblings, so [`sort_by_z_order`](Self::sort_by_z_order) puts it last.
    pub fn move_to_top(&mut self, node: impl Into<NodeRef>, target: impl Into<Target>) -> bool {
        let Some((id, _)) = self.resolve_target(node.into(), target.into()) else {
            return false;
        };
        if let Some(max) = self.siblings(id).map(|c| c.z_order).max() {
            if let Some(n) = self.store.get_mut(id) {
                n.core.z_order = n.core.z_order.max(max.saturating_add(1));
            }
        }
        true
    }

    /// Stable ascending sort of `node`'s children by priority.
    pub fn sort_children_by_priority(&mut self, node: impl Into<NodeRef>) -> bool {
        self.sort_children_by(node, |c| c.priority)
    }

    /// Stable ascending sort of `node`'s children by z-order.
    pub fn sort_by_z_order(&mut self, node: impl Into<NodeRef>) -> bool {
        self.sort_children_by(node, |c| c.z_order)
    }

    fn sort_children_by(&mut self, node: impl Into<NodeRef>, key: impl Fn(&NodeCore) -> i32) -> bool {
        let Some(id) = self.id(node) else { return false };
        let mut keyed: Vec<(i32, NodeId)> = self
            .store
            .children(id)
            .iter()
            .map(|&c| (self.store.get(c).map(|n| key(&n.core)).unwrap_or_default(), c))
            .collect();
        keyed.sort_by_key(|&(k, _)| k);
        if let Some(n) = self.store.get_mut(id) {
            n.core.children = keyed.into_iter().map(|(_, c)| c).collect();
        }
        self.mark_dirty(id);
        true
    }

    /// Priorities of `node`'s children in current storage order.
    pub fn get_children_priorities(&self, node: impl Into<NodeRef>) -> Vec<i32> {
        let Some(id) = self.id(node) else {
            return Vec::new();
        };
        self.store
            .children(id)
            .iter()
            .filter_map(|&c| self.store.get(c).map(|n| n.core.priority))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::handle::Handle;
    use crate::factory::NodeInit;
    use pretty_assertions::assert_eq;

    fn family(scene: &mut Scene) -> (Handle, Vec<Handle>) {
        let p = scene.create("Group", NodeInit::named("p")).unwrap();
        let kids = ["a", "b", "c"]
            .into_iter()
            .map(|n| {
                let h = scene.create("Box", NodeInit::named(n)).unwrap();
                scene.add_child(&p, &h).unwrap();
                h
            })
            .collect();
        (p, kids)
    }

    fn names(scene: &Scene, node: &Handle) -> Vec<String> {
        scene.get_children(node).iter().map(|h| h.name().to_owned()).collect()
    }

    #[test]
    fn direct_and_child_targets() {
        let mut scene = Scene::default();
        let (p, kids) = family(&mut scene);
        assert!(scene.set_priority(&kids[0], 7));
        assert!(scene.set_priority(&p, Target::child_with("b", 3)));
        assert_eq!(scene.get_children_priorities(&p), vec![7, 3, 0]);
        assert!(!scene.set_priority(&p, Target::child("c")));
        assert!(!scene.set_priority(&kids[0], Target::child_with("b", 1)));
    }

    #[test]
    fn highest_and_lowest_are_strict() {
        let mut scene = Scene::default();
        let (p, kids) = family(&mut scene);
        scene.set_priority(&kids[0], 5);
        scene.set_priority(&kids[1], -2);
        assert!(scene.set_to_highest_priority(&p, Target::child("c")));
        assert_eq!(scene.get_priority(&kids[2]), Some(6));
        assert!(scene.set_to_lowest_priority(&kids[0], ()));
        assert_eq!(scene.get_priority(&kids[0]), Some(-3));
    }

    #[test]
    fn priority_and_z_order_are_independent() {
        let mut scene = Scene::default();
        let (p, kids) = family(&mut scene);
        scene.set_priority(&kids[0], 2);
        scene.set_priority(&kids[1], 1);
        scene.set_priority(&kids[2], 0);
        scene.set_z_order(&kids[0], 0);
        scene.set_z_order(&kids[1], 2);
        scene.set_z_order(&kids[2], 1);
        assert_eq!(scene.get_priority(&kids[1]), Some(1));

        scene.sort_children_by_priority(&p);
        assert_eq!(names(&scene, &p), vec!["c", "b", "a"]);
        scene.sort_by_z_order(&p);
        assert_eq!(names(&scene, &p), vec!["a", "c", "b"]);
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let mut scene = Scene::default();
        let (p, kids) = family(&mut scene);
        scene.set_priority(&kids[0], 1);
        scene.sort_children_by_priority(&p);
        assert_eq!(names(&scene, &p), vec!["b", "c", "a"]);
    }

    #[test]
    fn move_to_top_sorts_last() {
        let mut scene = Scene::default();
        let (p, _kids) = family(&mut scene);
        scene.set_z_order(&p, Target::child_with("c", 4));
        assert!(scene.move_to_top(&p, Target::child("a")));
        assert_eq!(scene.get_z_order("a"), Some(5));
        scene.sort_by_z_order(&p);
        assert_eq!(names(&scene, &p).last().map(String::as_str), Some("a"));
        assert_eq!(scene.get_priority("a"), Some(0));
    }
}
