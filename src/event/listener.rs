//! Listener registries: per-node and global tables of callbacks by event type.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::record::{Event, Phase};
use super::types::EventType;
use crate::scene::Scene;

/// A listener callback. It receives the scene so it can mutate the tree.
pub type ListenerFn = Rc<dyn Fn(&mut Scene, &mut Event)>;

/// Identifies one registration. Ids increase monotonically per scene, so they
/// double as registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

#[derive(Clone)]
struct ListenerEntry {
    id: ListenerId,
    callback: ListenerFn,
    use_capture: bool,
    priority: i32,
}

/// Listeners grouped by event type.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    by_type: HashMap<EventType, Vec<ListenerEntry>>,
}

impl ListenerRegistry {
    /// Register `callback` for `event_type`.
    pub fn add(
        &mut self,
        id: ListenerId,
        event_type: EventType,
        callback: ListenerFn,
        use_capture: bool,
        priority: i32,
    ) {
        self.by_type.entry(event_type).or_default().push(ListenerEntry {
            id,
            callback,
            use_capture,
            priority,
        });
    }

    /// Remove one registration. Returns whether it existed.
    pub fn remove(&mut self, event_type: EventType, id: ListenerId) -> bool {
        let Some(entries) = self.by_type.get_mut(&event_type) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() != before;
        if entries.is_empty() {
            self.by_type.remove(&event_type);
        }
        removed
    }

    /// Remove every registration for `event_type`.
    pub fn clear(&mut self, event_type: EventType) {
        self.by_type.remove(&event_type);
    }

    /// Whether any listener is registered for `event_type`.
    pub fn has(&self, event_type: EventType) -> bool {
        self.by_type.contains_key(&event_type)
    }

    /// Number of listeners registered for `event_type`.
    pub fn count(&self, event_type: EventType) -> usize {
        self.by_type.get(&event_type).map_or(0, Vec::len)
    }

    /// Callbacks to invoke for `phase`, ordered by descending priority then
    /// registration order.
    ///
    /// Capture runs `use_capture` listeners, bubble runs the others, target
    /// and global invocation run all of them.
    pub(crate) fn snapshot(&self, event_type: EventType, phase: Phase) -> Vec<ListenerFn> {
        let Some(entries) = self.by_type.get(&event_type) else {
            return Vec::new();
        };
        let mut selected: Vec<&ListenerEntry> = entries
            .iter()
            .filter(|e| match phase {
                Phase::Capture => e.use_capture,
                Phase::Bubble => !e.use_capture,
                Phase::Target | Phase::None => true,
            })
            .collect();
        selected.sort_by_key(|e| (Reverse(e.priority), e.id));
        selected.into_iter().map(|e| Rc::clone(&e.callback)).collect()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (event_type, entries) in &self.by_type {
            map.entry(&event_type.name(), &entries.len());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, tag: &'static str) -> ListenerFn {
        let log = Rc::clone(log);
        Rc::new(move |_scene: &mut Scene, _ev: &mut Event| log.borrow_mut().push(tag))
    }

    #[test]
    fn ordering_is_priority_then_registration() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut reg = ListenerRegistry::default();
        reg.add(ListenerId(1), EventType::MOUSE_CLICK, recorder(&log, "low"), false, 0);
        reg.add(ListenerId(2), EventType::MOUSE_CLICK, recorder(&log, "high"), false, 5);
        reg.add(ListenerId(3), EventType::MOUSE_CLICK, recorder(&log, "low2"), false, 0);

        let mut scene = Scene::default();
        let mut ev = Event::new(EventType::MOUSE_CLICK);
        for cb in reg.snapshot(EventType::MOUSE_CLICK, Phase::Target) {
            cb(&mut scene, &mut ev);
        }
        assert_eq!(*log.borrow(), vec!["high", "low", "low2"]);
    }

    #[test]
    fn phase_filters_capture_flag() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut reg = ListenerRegistry::default();
        reg.add(ListenerId(1), EventType::KEY_DOWN, recorder(&log, "capture"), true, 0);
        reg.add(ListenerId(2), EventType::KEY_DOWN, recorder(&log, "bubble"), false, 0);

        assert_eq!(reg.snapshot(EventType::KEY_DOWN, Phase::Capture).len(), 1);
        assert_eq!(reg.snapshot(EventType::KEY_DOWN, Phase::Bubble).len(), 1);
        assert_eq!(reg.snapshot(EventType::KEY_DOWN, Phase::Target).len(), 2);
    }

    #[test]
    fn remove_and_count() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut reg = ListenerRegistry::default();
        reg.add(ListenerId(1), EventType::KEY_UP, recorder(&log, "a"), false, 0);
        reg.add(ListenerId(2), EventType::KEY_UP, recorder(&log, "b"), false, 0);
        assert_eq!(reg.count(EventType::KEY_UP), 2);
        assert!(reg.remove(EventType::KEY_UP, ListenerId(1)));
        assert!(!reg.remove(EventType::KEY_UP, ListenerId(1)));
        assert_eq!(reg.count(EventType::KEY_UP), 1);
        reg.clear(EventType::KEY_UP);
        assert!(!reg.has(EventType::KEY_UP));
    }
}
