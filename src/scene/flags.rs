//! Per-node flags: clickable, enabled, hidden and tab settings.

use super::Scene;
use crate::dom::handle::NodeRef;
use crate::event::record::Event;
use crate::event::types::EventType;

impl Scene {
    pub fn is_clickable(&self, node: impl Into<NodeRef>) -> bool {
        self.core(node).is_some_and(|c| c.clickable)
    }

    pub fn set_clickable(&mut self, node: impl Into<NodeRef>, clickable: bool) -> bool {
        self.core_mut(node).map(|c| c.clickable = clickable).is_some()
    }

    pub fn is_enabled(&self, node: impl Into<NodeRef>) -> bool {
        self.core(node).is_some_and(|c| c.enabled)
    }

    pub fn set_enabled(&mut self, node: impl Into<NodeRef>, enabled: bool) -> bool {
        self.core_mut(node).map(|c| c.enabled = enabled).is_some()
    }

    pub fn is_hidden(&self, node: impl Into<NodeRef>) -> bool {
        self.core(node).is_some_and(|c| c.hidden)
    }

    /// `!hidden`. `false` for unknown nodes.
    pub fn is_visible(&self, node: impl Into<NodeRef>) -> bool {
        self.core(node).is_some_and(|c| c.visible())
    }

    /// Hide or show `node`. Fires `Hide`/`Show` when the flag changes.
    pub fn set_hidden(&mut self, node: impl Into<NodeRef>, hidden: bool) -> bool {
        let Some(id) = self.id(node) else { return false };
        let Some(core) = self.store.get_mut(id).map(|n| &mut n.core) else {
            return false;
        };
        if core.hidden == hidden {
            return true;
        }
        core.hidden = hidden;
        self.mark_dirty(id);
        if let Some(handle) = self.store.handle(id) {
            let ty = if hidden { EventType::HIDE } else { EventType::SHOW };
            self.dispatch(Event::new(ty).with_target(handle));
        }
        true
    }

    pub fn set_visible(&mut self, node: impl Into<NodeRef>, visible: bool) -> bool {
        self.set_hidden(node, !visible)
    }

    pub fn is_tab_enabled(&self, node: impl Into<NodeRef>) -> bool {
        self.core(node).is_some_and(|c| c.tab_enabled)
    }

    pub fn set_tab_enabled(&mut self, node: impl Into<NodeRef>, enabled: bool) -> bool {
        self.core_mut(node).map(|c| c.tab_enabled = enabled).is_some()
    }

    pub fn get_tab_priority(&self, node: impl Into<NodeRef>) -> Option<i32> {
        self.core(node).map(|c| c.tab_priority)
    }

    pub fn set_tab_priority(&mut self, node: impl Into<NodeRef>, priority: i32) -> bool {
        self.core_mut(node).map(|c| c.tab_priority = priority).is_some()
    }
}
