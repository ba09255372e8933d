//! The per-dispatch event record.

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use super::input::{Key, Modifiers, PointerButton};
use super::types::EventType;
use crate::dom::handle::Handle;

/// Traversal phase an event is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Not being dispatched along a path (before/after dispatch, global listeners).
    #[default]
    None,
    Capture,
    Target,
    Bubble,
}

/// Pointer snapshot carried by pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    pub button: Option<PointerButton>,
    pub clicks: u8,
}

/// Keyboard snapshot carried by key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyState {
    pub key: Key,
    pub scan_code: u32,
    pub modifiers: Modifiers,
    pub ascii: Option<u8>,
}

/// One occurrence of an event type, mutated by the dispatcher as it travels.
#[derive(Clone)]
pub struct Event {
    event_type: EventType,
    pub(crate) phase: Phase,
    target: Option<Handle>,
    pub(crate) current_target: Option<Handle>,
    related_target: Option<Handle>,
    payload: Option<Rc<dyn Any>>,
    raw: Option<Arc<dyn Any + Send + Sync>>,
    propagation_stopped: bool,
    default_behavior_disabled: bool,
    /// Pointer snapshot, for pointer events.
    pub pointer: Option<PointerState>,
    /// Key snapshot, for key events.
    pub key: Option<KeyState>,
    /// Seconds since the previous frame, for frame events.
    pub elapsed: Option<f32>,
}

impl Event {
    /// New untargeted event of `event_type`.
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            phase: Phase::None,
            target: None,
            current_target: None,
            related_target: None,
            payload: None,
            raw: None,
            propagation_stopped: false,
            default_behavior_disabled: false,
            pointer: None,
            key: None,
            elapsed: None,
        }
    }

    /// Set the target (builder).
    pub fn with_target(mut self, target: Handle) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the related target (builder).
    pub fn with_related(mut self, related: Handle) -> Self {
        self.related_target = Some(related);
        self
    }

    /// Attach an opaque payload (builder).
    pub fn with_payload<T: Any>(mut self, payload: T) -> Self {
        self.payload = Some(Rc::new(payload));
        self
    }

    /// Attach the raw low-level input event (builder).
    pub fn with_raw(mut self, raw: Arc<dyn Any + Send + Sync>) -> Self {
        self.raw = Some(raw);
        self
    }

    /// Attach a pointer snapshot (builder).
    pub fn with_pointer(mut self, pointer: PointerState) -> Self {
        self.pointer = Some(pointer);
        self
    }

    /// Attach a key snapshot (builder).
    pub fn with_key(mut self, key: KeyState) -> Self {
        self.key = Some(key);
        self
    }

    /// Attach frame time (builder).
    pub fn with_elapsed(mut self, elapsed: f32) -> Self {
        self.elapsed = Some(elapsed);
        self
    }

    /// The event type.
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The node the event was dispatched at.
    pub fn target(&self) -> Option<&Handle> {
        self.target.as_ref()
    }

    /// The node whose listeners are currently running.
    pub fn current_target(&self) -> Option<&Handle> {
        self.current_target.as_ref()
    }

    /// Secondary node (e.g. the previous focus for `FocusGained`).
    pub fn related_target(&self) -> Option<&Handle> {
        self.related_target.as_ref()
    }

    /// Downcast the payload.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref()?.downcast_ref::<T>()
    }

    /// Downcast the raw input event.
    pub fn raw<T: Any>(&self) -> Option<&T> {
        let raw: &(dyn Any + Send + Sync) = self.raw.as_deref()?;
        raw.downcast_ref::<T>()
    }

    /// Target name when targeted, else the type name.
    pub fn name(&self) -> &str {
        match &self.target {
            Some(target) => target.name(),
            None => self.event_type.name(),
        }
    }

    /// Stop traversal after the current node's listeners finish.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Whether [`stop_propagation`](Self::stop_propagation) was called.
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Ask built-in reactions (click-to-focus, tab navigation) to skip this event.
    pub fn set_disable_default_behavior(&mut self, disabled: bool) {
        self.default_behavior_disabled = disabled;
    }

    /// Whether built-in reactions are disabled for this event.
    pub fn is_default_behavior_disabled(&self) -> bool {
        self.default_behavior_disabled
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("type", &self.event_type)
            .field("phase", &self.phase)
            .field("target", &self.target)
            .field("current_target", &self.current_target)
            .field("related_target", &self.related_target)
            .field("propagation_stopped", &self.propagation_stopped)
            .field("default_behavior_disabled", &self.default_behavior_disabled)
            .finish_non_exhaustive()
    }
}
