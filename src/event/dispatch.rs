//! Capture / target / bubble dispatch.
//!
//! The propagation path is snapshotted before any listener runs, so
//! listeners may restructure the tree freely. A path node that is destroyed
//! mid-dispatch is skipped. `stop_propagation` is checked between nodes and
//! between phases; listeners already snapshotted for the current node still
//! run. Global listeners run last, whether or not propagation was stopped.

use tracing::{trace, warn};

use super::record::{Event, Phase};
use crate::dom::handle::{Handle, NodeRef};
use crate::dom::node::NodeId;
use crate::scene::Scene;

impl Scene {
    /// Dispatch `event` at its target and return it with its final flags.
    ///
    /// An event whose target is missing or no longer valid skips the path
    /// phases; global listeners still run if its type is global.
    pub fn dispatch(&mut self, mut event: Event) -> Event {
        let ty = event.event_type();
        let policy = ty.policy();

        match event.target().and_then(|h| self.store.resolve(h)) {
            Some(target) => {
                let path = self.path_to(target);
                let (target_handle, ancestors) = match path.split_last() {
                    Some((last, rest)) => (last.clone(), rest.to_vec()),
                    None => return event,
                };

                if !policy.target_only && policy.captures {
                    for (id, handle) in &ancestors {
                        if event.is_propagation_stopped() {
                            break;
                        }
                        self.invoke(*id, handle, Phase::Capture, &mut event);
                    }
                }

                if !event.is_propagation_stopped() {
                    let (id, handle) = target_handle;
                    if let Some(node) = self.store.get_mut(id) {
                        event.phase = Phase::Target;
                        event.current_target = Some(handle.clone());
                        node.behavior.on_event(&event);
                    }
                    self.invoke(id, &handle, Phase::Target, &mut event);
                }

                if !policy.target_only && policy.bubbles {
                    for (id, handle) in ancestors.iter().rev() {
                        if event.is_propagation_stopped() {
                            break;
                        }
                        self.invoke(*id, handle, Phase::Bubble, &mut event);
                    }
                }
            }
            None => {
                if let Some(target) = event.target() {
                    warn!(event = ty.name(), target = target.name(), "dispatch to invalid target");
                }
            }
        }

        if policy.global {
            let listeners = self.globals.snapshot(ty, Phase::None);
            event.phase = Phase::None;
            event.current_target = None;
            trace!(event = ty.name(), count = listeners.len(), "global listeners");
            for listener in listeners {
                listener(self, &mut event);
            }
        }

        event.phase = Phase::None;
        event.current_target = None;
        event
    }

    /// Set the target of `event` to `node` and dispatch it.
    pub fn dispatch_to(&mut self, node: impl Into<NodeRef>, event: Event) -> Event {
        let handle = node.into().into_handle();
        self.dispatch(event.with_target(handle))
    }

    /// Root-to-`node` path that a dispatch at `node` would walk, `node` last.
    pub fn propagation_path(&self, node: impl Into<NodeRef>) -> Vec<Handle> {
        match self.id(node) {
            Some(id) => self.path_to(id).into_iter().map(|(_, h)| h).collect(),
            None => Vec::new(),
        }
    }

    fn path_to(&self, target: NodeId) -> Vec<(NodeId, Handle)> {
        let mut ids = self.store.ancestors(target);
        ids.reverse();
        ids.push(target);
        ids.into_iter()
            .filter_map(|id| self.store.handle(id).map(|h| (id, h)))
            .collect()
    }

    fn invoke(&mut self, id: NodeId, handle: &Handle, phase: Phase, event: &mut Event) {
        let listeners = match self.store.get(id) {
            Some(node) if node.name() == handle.name() => {
                node.core.listeners.snapshot(event.event_type(), phase)
            }
            _ => return,
        };
        if listeners.is_empty() {
            return;
        }
        event.phase = phase;
        event.current_target = Some(handle.clone());
        trace!(
            event = event.event_type().name(),
            node = handle.name(),
            ?phase,
            count = listeners.len(),
            "invoking listeners"
        );
        for listener in listeners {
            listener(self, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::event::types::{DispatchPolicy, EventType};
    use crate::factory::NodeInit;
    use crate::widgets::Panel;
    use pretty_assertions::assert_eq;

    type Log = Rc<RefCell<Vec<String>>>;

    fn tree(scene: &mut Scene) -> (Handle, Handle) {
        let mid = scene.create("Group", NodeInit::named("mid")).unwrap();
        let leaf = scene.create("Box", NodeInit::named("leaf")).unwrap();
        scene.add_child(scene.root(), &mid).unwrap();
        scene.add_child(&mid, &leaf).unwrap();
        (mid, leaf)
    }

    fn listen(scene: &mut Scene, node: &str, ty: EventType, capture: bool, priority: i32, tag: &str, log: &Log) {
        let log = Rc::clone(log);
        let tag = tag.to_owned();
        scene.add_event_listener(
            node,
            ty,
            move |_, ev| {
                let current = ev.current_target().map(|h| h.name().to_owned()).unwrap_or_default();
                log.borrow_mut().push(format!("{tag}@{current}:{:?}", ev.phase()));
            },
            capture,
            priority,
        );
    }

    #[test]
    fn capture_target_bubble_order() {
        let mut scene = Scene::default();
        let (_mid, leaf) = tree(&mut scene);
        let log: Log = Rc::default();
        listen(&mut scene, "mainStage", EventType::MOUSE_CLICK, true, 0, "rc", &log);
        listen(&mut scene, "mid", EventType::MOUSE_CLICK, true, 0, "mc", &log);
        listen(&mut scene, "leaf", EventType::MOUSE_CLICK, false, 0, "t", &log);
        listen(&mut scene, "mid", EventType::MOUSE_CLICK, false, 0, "mb", &log);
        listen(&mut scene, "mainStage", EventType::MOUSE_CLICK, false, 0, "rb", &log);

        let ev = scene.dispatch_to(&leaf, Event::new(EventType::MOUSE_CLICK));
        assert_eq!(
            *log.borrow(),
            vec![
                "rc@mainStage:Capture",
                "mc@mid:Capture",
                "t@leaf:Target",
                "mb@mid:Bubble",
                "rb@mainStage:Bubble",
            ]
        );
        assert_eq!(ev.phase(), Phase::None);
        assert!(ev.current_target().is_none());
    }

    #[test]
    fn stop_in_capture_blocks_target_and_bubble() {
        let mut scene = Scene::default();
        let (_mid, leaf) = tree(&mut scene);
        let log: Log = Rc::default();
        scene.add_event_listener(
            "mainStage",
            EventType::MOUSE_CLICK,
            |_, ev| ev.stop_propagation(),
            true,
            0,
        );
        listen(&mut scene, "mainStage", EventType::MOUSE_CLICK, true, -1, "same-node", &log);
        listen(&mut scene, "leaf", EventType::MOUSE_CLICK, false, 0, "t", &log);
        listen(&mut scene, "mainStage", EventType::MOUSE_CLICK, false, 0, "rb", &log);

        let ev = scene.dispatch_to(&leaf, Event::new(EventType::MOUSE_CLICK));
        assert!(ev.is_propagation_stopped());
        assert_eq!(*log.borrow(), vec!["same-node@mainStage:Capture"]);
        assert_eq!(scene.behavior::<Panel>(&leaf).unwrap().clicks(), 0);
    }

    #[test]
    fn target_only_skips_ancestors() {
        let mut scene = Scene::default();
        let (_mid, leaf) = tree(&mut scene);
        let log: Log = Rc::default();
        listen(&mut scene, "mainStage", EventType::ADDED, true, 0, "cap", &log);
        listen(&mut scene, "mid", EventType::ADDED, false, 0, "bub", &log);
        listen(&mut scene, "leaf", EventType::ADDED, true, 0, "t", &log);
        scene.dispatch_to(&leaf, Event::new(EventType::ADDED));
        assert_eq!(*log.borrow(), vec!["t@leaf:Target"]);
    }

    #[test]
    fn non_bubbling_custom_type() {
        const PING: EventType = EventType::custom(
            "Ping",
            DispatchPolicy { captures: true, bubbles: false, target_only: false, global: false },
        );
        let mut scene = Scene::default();
        let (_mid, leaf) = tree(&mut scene);
        let log: Log = Rc::default();
        listen(&mut scene, "mid", PING, true, 0, "cap", &log);
        listen(&mut scene, "mid", PING, false, 0, "bub", &log);
        listen(&mut scene, "leaf", PING, false, 0, "t", &log);
        scene.dispatch_to(&leaf, Event::new(PING));
        assert_eq!(*log.borrow(), vec!["cap@mid:Capture", "t@leaf:Target"]);
    }

    #[test]
    fn priority_orders_listeners_on_one_node() {
        let mut scene = Scene::default();
        let (_mid, leaf) = tree(&mut scene);
        let log: Log = Rc::default();
        listen(&mut scene, "leaf", EventType::KEY_DOWN, false, 0, "first", &log);
        listen(&mut scene, "leaf", EventType::KEY_DOWN, false, 10, "urgent", &log);
        listen(&mut scene, "leaf", EventType::KEY_DOWN, true, 0, "second", &log);
        scene.dispatch_to(&leaf, Event::new(EventType::KEY_DOWN));
        assert_eq!(
            *log.borrow(),
            vec!["urgent@leaf:Target", "first@leaf:Target", "second@leaf:Target"]
        );
    }

    #[test]
    fn global_listeners_run_even_when_stopped() {
        let mut scene = Scene::default();
        let log: Log = Rc::default();
        scene.add_event_listener("mainStage", EventType::QUIT, |_, ev| ev.stop_propagation(), false, 0);
        let l = Rc::clone(&log);
        scene.add_global_listener(
            EventType::QUIT,
            move |_, ev| l.borrow_mut().push(format!("global:{:?}:{}", ev.phase(), ev.name())),
            0,
        );
        scene.dispatch_to("mainStage", Event::new(EventType::QUIT));
        assert_eq!(*log.borrow(), vec!["global:None:mainStage"]);

        log.borrow_mut().clear();
        scene.dispatch(Event::new(EventType::QUIT));
        assert_eq!(*log.borrow(), vec!["global:None:Quit"]);
    }

    #[test]
    fn invalid_target_skips_path() {
        let mut scene = Scene::default();
        let (_mid, leaf) = tree(&mut scene);
        let log: Log = Rc::default();
        listen(&mut scene, "mainStage", EventType::MOUSE_CLICK, true, 0, "rc", &log);
        scene.destroy(&leaf);
        scene.dispatch_to(&leaf, Event::new(EventType::MOUSE_CLICK));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn listener_may_destroy_nodes_on_the_path() {
        let mut scene = Scene::default();
        let (_mid, leaf) = tree(&mut scene);
        let log: Log = Rc::default();
        scene.add_event_listener(
            "leaf",
            EventType::MOUSE_CLICK,
            |scene, _| {
                scene.destroy("mid");
            },
            false,
            0,
        );
        listen(&mut scene, "mid", EventType::MOUSE_CLICK, false, 0, "mb", &log);
        listen(&mut scene, "mainStage", EventType::MOUSE_CLICK, false, 0, "rb", &log);
        scene.dispatch_to(&leaf, Event::new(EventType::MOUSE_CLICK));
        assert_eq!(*log.borrow(), vec!["rb@mainStage:Bubble"]);
        assert!(scene.is_valid(&leaf));
    }

    #[test]
    fn behavior_sees_target_phase() {
        let mut scene = Scene::default();
        let (_mid, leaf) = tree(&mut scene);
        scene.dispatch_to(&leaf, Event::new(EventType::MOUSE_CLICK));
        scene.dispatch_to("mid", Event::new(EventType::MOUSE_CLICK));
        assert_eq!(scene.behavior::<Panel>(&leaf).unwrap().clicks(), 1);
    }

    #[derive(Default)]
    struct Tracker {
        seen: Vec<(Phase, Option<String>)>,
    }

    impl crate::widget::Behavior for Tracker {
        fn type_name(&self) -> &str {
            "Tracker"
        }
        fn on_event(&mut self, event: &Event) {
            let current = event.current_target().map(|h| h.name().to_owned());
            self.seen.push((event.phase(), current));
        }
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    }

    #[test]
    fn behavior_current_target_is_itself_after_capture() {
        let mut scene = Scene::default();
        let log: Log = Rc::default();
        let tracked = scene
            .insert(crate::dom::node::NodeCore::new("tracked"), Box::new(Tracker::default()))
            .unwrap();
        scene.add_child(scene.root(), &tracked).unwrap();
        listen(&mut scene, "mainStage", EventType::MOUSE_CLICK, true, 0, "rc", &log);
        scene.behavior_mut::<Tracker>(&tracked).unwrap().seen.clear();

        scene.dispatch_to(&tracked, Event::new(EventType::MOUSE_CLICK));
        assert_eq!(*log.borrow(), vec!["rc@mainStage:Capture"]);
        assert_eq!(
            scene.behavior::<Tracker>(&tracked).unwrap().seen,
            vec![(Phase::Target, Some("tracked".to_owned()))]
        );
    }

    #[test]
    fn path_runs_root_to_target() {
        let mut scene = Scene::default();
        let (_mid, leaf) = tree(&mut scene);
        let path: Vec<_> = scene
            .propagation_path(&leaf)
            .iter()
            .map(|h| h.name().to_owned())
            .collect();
        assert_eq!(path, vec!["mainStage", "mid", "leaf"]);
    }
}
