//! Keyboard focus and pointer hover.
//!
//! [`FocusController`] holds the one focused and the one hovered node of a
//! scene. Focus falls back to the root whenever nothing else holds it, and
//! both are reset when the root is swapped. Tab order is rebuilt from the
//! tree on every navigation: a depth-first walk from the root collecting
//! visible, enabled, tab-enabled nodes, stably sorted by tab priority.

use tracing::debug;

use crate::dom::handle::{Handle, NodeRef};
use crate::dom::node::NodeId;
use crate::event::record::Event;
use crate::event::types::EventType;
use crate::geometry::Point;
use crate::scene::Scene;

// ---------------------------------------------------------------------------
// FocusController
// ---------------------------------------------------------------------------

/// Focus and hover state of a scene.
#[derive(Debug, Default)]
pub struct FocusController {
    focused: Option<Handle>,
    hovered: Option<Handle>,
}

impl FocusController {
    /// Create a controller with focus on the root and nothing hovered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return focus to the root and clear hover.
    pub fn reset(&mut self) {
        self.focused = None;
        self.hovered = None;
    }

    /// Drop any reference to the node named `name`.
    pub fn forget(&mut self, name: &str) {
        if self.focused.as_ref().is_some_and(|h| h.name() == name) {
            self.focused = None;
        }
        if self.hovered.as_ref().is_some_and(|h| h.name() == name) {
            self.hovered = None;
        }
    }
}

// ---------------------------------------------------------------------------
// Scene focus / hover API
// ---------------------------------------------------------------------------

impl Scene {
    fn focused_id(&self) -> NodeId {
        self.focus
            .focused
            .as_ref()
            .and_then(|h| self.store.resolve(h))
            .unwrap_or(self.root)
    }

    /// The node holding keyboard focus; the root when no other node does.
    pub fn focused(&self) -> Handle {
        self.store
            .handle(self.focused_id())
            .unwrap_or_else(|| self.root())
    }

    /// Whether `node` holds keyboard focus.
    pub fn has_keyboard_focus(&self, node: impl Into<NodeRef>) -> bool {
        self.id(node) == Some(self.focused_id())
    }

    /// Give `node` keyboard focus. Fires `FocusLost` on the previous holder
    /// and `FocusGained` on `node`, each naming the other as related target.
    ///
    /// No clickable/enabled gating happens here. Returns `false` only for an
    /// unknown node.
    pub fn set_keyboard_focus(&mut self, node: impl Into<NodeRef>) -> bool {
        let Some(id) = self.id(node) else { return false };
        let old = self.focused_id();
        if old == id {
            return true;
        }
        let (Some(old), Some(new)) = (self.store.handle(old), self.store.handle(id)) else {
            return false;
        };
        self.focus.focused = Some(new.clone());
        debug!(from = old.name(), to = new.name(), "focus changed");
        self.dispatch(Event::new(EventType::FOCUS_LOST).with_target(old.clone()).with_related(new.clone()));
        self.dispatch(Event::new(EventType::FOCUS_GAINED).with_target(new).with_related(old));
        true
    }

    /// Return focus to the root.
    pub fn clear_keyboard_focus(&mut self) -> bool {
        let root = self.root();
        self.set_keyboard_focus(&root)
    }

    /// Current tab order.
    pub fn tab_order(&self) -> Vec<Handle> {
        self.handles(&self.tab_order_ids())
    }

    fn tab_order_ids(&self) -> Vec<NodeId> {
        let mut order: Vec<(i32, NodeId)> = self
            .visible_walk()
            .into_iter()
            .filter_map(|id| {
                let core = &self.store.get(id)?.core;
                (core.tab_enabled && core.enabled).then_some((core.tab_priority, id))
            })
            .collect();
        order.sort_by_key(|&(priority, _)| priority);
        order.into_iter().map(|(_, id)| id).collect()
    }

    /// Move focus to the next node in tab order (previous when `reverse`),
    /// wrapping at either end. Returns the newly focused node, or `None` when
    /// no node is tab-enabled.
    pub fn handle_tab_key_press(&mut self, reverse: bool) -> Option<Handle> {
        let order = self.tab_order_ids();
        if order.is_empty() {
            return None;
        }
        let len = order.len();
        let current = order.iter().position(|&id| id == self.focused_id());
        let next = match (current, reverse) {
            (Some(i), false) => (i + 1) % len,
            (Some(i), true) => (i + len - 1) % len,
            (None, false) => 0,
            (None, true) => len - 1,
        };
        let id = order[next];
        let handle = self.store.handle(id)?;
        self.set_keyboard_focus(&handle);
        Some(handle)
    }

    // ── Hover ────────────────────────────────────────────────────────

    /// The hovered node, if it is still alive.
    pub fn hovered(&self) -> Option<Handle> {
        let id = self.store.resolve(self.focus.hovered.as_ref()?)?;
        self.store.handle(id)
    }

    /// Topmost visible staged node containing `point`, in painter's order.
    pub fn hit_test(&self, point: Point) -> Option<Handle> {
        let id = self.hit_test_id(point, false)?;
        self.store.handle(id)
    }

    fn hit_test_id(&self, point: Point, clickable_only: bool) -> Option<NodeId> {
        self.visible_walk().into_iter().rev().find(|&id| {
            self.store
                .get(id)
                .is_some_and(|n| !clickable_only || n.core.clickable)
                && self.world_bounds(id).contains(point)
        })
    }

    /// Recompute the hovered node for a pointer at `point`, firing
    /// `MouseLeave`/`MouseEnter` when it changes.
    pub fn update_hover(&mut self, point: Point) -> Option<Handle> {
        let gated = self.config().hover_requires_clickable;
        let hit = self.hit_test_id(point, gated).and_then(|id| self.store.handle(id));
        self.set_hovered(hit.map(NodeRef::from));
        self.hovered()
    }

    /// Force the hovered node, firing `MouseLeave`/`MouseEnter` when it changes.
    pub fn set_hovered(&mut self, node: Option<NodeRef>) {
        let new = node
            .and_then(|n| self.store.resolve_ref(&n))
            .and_then(|id| self.store.handle(id));
        let old = self.hovered();
        if old == new {
            return;
        }
        self.focus.hovered = new.clone();
        if let Some(old) = old {
            let mut event = Event::new(EventType::MOUSE_LEAVE).with_target(old);
            if let Some(new) = &new {
                event = event.with_related(new.clone());
            }
            self.dispatch(event);
        }
        if let Some(new) = new {
            self.dispatch(Event::new(EventType::MOUSE_ENTER).with_target(new));
        }
    }

    /// Staged nodes in painter's order, skipping hidden subtrees.
    pub(crate) fn visible_walk(&self) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.store.get(id) else { continue };
            if node.core.hidden {
                continue;
            }
            result.push(id);
            stack.extend(node.core.children.iter().rev().copied());
        }
        result
    }
}

// ===========================================================================
// Tests
// ===========================================================================
