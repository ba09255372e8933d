//! Event types and their static dispatch policies.
//!
//! An [`EventType`] is a name plus four policy bits fixed at definition time.
//! Types compare and hash by name, so a type defined twice with the same name
//! addresses the same listener lists.

use std::fmt;
use std::hash::{Hash, Hasher};

/// How events of one type travel through the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DispatchPolicy {
    /// Capture-phase listeners on ancestors are invoked.
    pub captures: bool,
    /// After the target phase, travel back up to the root.
    pub bubbles: bool,
    /// Only the exact target is visited; no capture or bubble phase.
    pub target_only: bool,
    /// Listeners in the global table are invoked as well.
    pub global: bool,
}

impl DispatchPolicy {
    /// Capture and bubble (pointer and key events).
    pub const PROPAGATING: DispatchPolicy = DispatchPolicy {
        captures: true,
        bubbles: true,
        target_only: false,
        global: false,
    };

    /// Delivered at the target only.
    pub const TARGET_ONLY: DispatchPolicy = DispatchPolicy {
        captures: false,
        bubbles: false,
        target_only: true,
        global: false,
    };

    /// Delivered at the target and to global listeners.
    pub const TARGET_AND_GLOBAL: DispatchPolicy = DispatchPolicy {
        captures: false,
        bubbles: false,
        target_only: true,
        global: true,
    };
}

/// A named event category.
#[derive(Clone, Copy)]
pub struct EventType {
    name: &'static str,
    policy: DispatchPolicy,
}

impl EventType {
    /// Define an event type.
    pub const fn custom(name: &'static str, policy: DispatchPolicy) -> Self {
        Self { name, policy }
    }

    /// The type's name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The type's dispatch policy.
    pub const fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    // ── Tree notifications ───────────────────────────────────────────

    pub const ADDED: EventType = EventType::custom("Added", DispatchPolicy::TARGET_ONLY);
    pub const REMOVED: EventType = EventType::custom("Removed", DispatchPolicy::TARGET_ONLY);
    pub const ADDED_TO_STAGE: EventType =
        EventType::custom("AddedToStage", DispatchPolicy::TARGET_ONLY);
    pub const REMOVED_FROM_STAGE: EventType =
        EventType::custom("RemovedFromStage", DispatchPolicy::TARGET_ONLY);

    // ── Geometry / visibility ────────────────────────────────────────

    pub const MOVE: EventType = EventType::custom("Move", DispatchPolicy::TARGET_ONLY);
    pub const RESIZE: EventType = EventType::custom("Resize", DispatchPolicy::TARGET_ONLY);
    pub const SHOW: EventType = EventType::custom("Show", DispatchPolicy::TARGET_ONLY);
    pub const HIDE: EventType = EventType::custom("Hide", DispatchPolicy::TARGET_ONLY);

    // ── Focus / hover ────────────────────────────────────────────────

    pub const FOCUS_GAINED: EventType =
        EventType::custom("FocusGained", DispatchPolicy::TARGET_ONLY);
    pub const FOCUS_LOST: EventType = EventType::custom("FocusLost", DispatchPolicy::TARGET_ONLY);
    pub const MOUSE_ENTER: EventType = EventType::custom("MouseEnter", DispatchPolicy::TARGET_ONLY);
    pub const MOUSE_LEAVE: EventType = EventType::custom("MouseLeave", DispatchPolicy::TARGET_ONLY);

    // ── Pointer / keyboard ───────────────────────────────────────────

    pub const MOUSE_MOVE: EventType = EventType::custom("MouseMove", DispatchPolicy::PROPAGATING);
    pub const MOUSE_BUTTON_DOWN: EventType =
        EventType::custom("MouseButtonDown", DispatchPolicy::PROPAGATING);
    pub const MOUSE_BUTTON_UP: EventType =
        EventType::custom("MouseButtonUp", DispatchPolicy::PROPAGATING);
    pub const MOUSE_CLICK: EventType = EventType::custom("MouseClick", DispatchPolicy::PROPAGATING);
    pub const MOUSE_DOUBLE_CLICK: EventType =
        EventType::custom("MouseDoubleClick", DispatchPolicy::PROPAGATING);
    pub const KEY_DOWN: EventType = EventType::custom("KeyDown", DispatchPolicy::PROPAGATING);
    pub const KEY_UP: EventType = EventType::custom("KeyUp", DispatchPolicy::PROPAGATING);

    // ── Stage lifecycle ──────────────────────────────────────────────

    pub const STAGE_OPENED: EventType =
        EventType::custom("StageOpened", DispatchPolicy::TARGET_AND_GLOBAL);
    pub const STAGE_CLOSED: EventType =
        EventType::custom("StageClosed", DispatchPolicy::TARGET_AND_GLOBAL);
    pub const ENTER_FRAME: EventType =
        EventType::custom("EnterFrame", DispatchPolicy::TARGET_AND_GLOBAL);
    pub const QUIT: EventType = EventType::custom("Quit", DispatchPolicy::TARGET_AND_GLOBAL);
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for EventType {}

impl Hash for EventType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventType({})", self.name)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
