//! Normalized input events and the cross-thread input queue.
//!
//! Defines [`InputEvent`], [`PointerInput`], [`KeyInput`] and supporting types.
//! Crossterm events are converted via [`from_crossterm`] so the rest of the
//! crate never depends on crossterm directly. Producers on any thread or task
//! push through an [`InputSender`]; the scene drains the [`InputQueue`] once
//! per frame.

use std::any::Any;
use std::ops::{BitAnd, BitOr};
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Raw low-level event attached opaquely to a normalized one.
pub type RawEvent = Arc<dyn Any + Send + Sync>;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

impl Key {
    /// ASCII value the key produces, if any.
    pub fn ascii(self) -> Option<u8> {
        match self {
            Key::Char(c) if c.is_ascii() => Some(c as u8),
            Key::Enter => Some(b'\r'),
            Key::Tab | Key::BackTab => Some(b'\t'),
            Key::Backspace => Some(0x08),
            Key::Escape => Some(0x1b),
            Key::Delete => Some(0x7f),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no modifier bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// Pointer / key input
// ---------------------------------------------------------------------------

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// What the pointer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerAction {
    Motion,
    Down,
    Up,
}

/// A normalized pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub x: f32,
    pub y: f32,
    pub action: PointerAction,
    pub button: Option<PointerButton>,
    /// Consecutive click count reported by the source (2 = double click).
    pub clicks: u8,
}

impl PointerInput {
    /// Pointer motion to `(x, y)`.
    pub fn motion(x: f32, y: f32) -> Self {
        Self { x, y, action: PointerAction::Motion, button: None, clicks: 0 }
    }

    /// Button press at `(x, y)`.
    pub fn down(x: f32, y: f32, button: PointerButton) -> Self {
        Self { x, y, action: PointerAction::Down, button: Some(button), clicks: 1 }
    }

    /// Button release at `(x, y)`.
    pub fn up(x: f32, y: f32, button: PointerButton) -> Self {
        Self { x, y, action: PointerAction::Up, button: Some(button), clicks: 1 }
    }

    /// Override the click count (builder).
    pub fn with_clicks(mut self, clicks: u8) -> Self {
        self.clicks = clicks;
        self
    }
}

/// A normalized keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub scan_code: u32,
    pub modifiers: Modifiers,
    pub ascii: Option<u8>,
    /// `true` for press/repeat, `false` for release.
    pub pressed: bool,
}

impl KeyInput {
    /// A key press.
    pub fn press(key: Key, modifiers: Modifiers) -> Self {
        Self { key, scan_code: 0, modifiers, ascii: key.ascii(), pressed: true }
    }

    /// A key release.
    pub fn release(key: Key, modifiers: Modifiers) -> Self {
        Self { pressed: false, ..Self::press(key, modifiers) }
    }
}

/// Top-level normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Pointer(PointerInput),
    Key(KeyInput),
    Quit,
}

// ---------------------------------------------------------------------------
// Crossterm conversions
// ---------------------------------------------------------------------------

/// Convert crossterm key modifiers to our `Modifiers`.
fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(crossterm::event::KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(crossterm::event::KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(crossterm::event::KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

/// Convert a crossterm key code. Returns `None` for keys we don't handle.
fn convert_key(code: crossterm::event::KeyCode) -> Option<Key> {
    use crossterm::event::KeyCode;
    Some(match code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    })
}

/// Convert a crossterm mouse button to our `PointerButton`.
fn convert_mouse_button(b: crossterm::event::MouseButton) -> PointerButton {
    match b {
        crossterm::event::MouseButton::Left => PointerButton::Left,
        crossterm::event::MouseButton::Right => PointerButton::Right,
        crossterm::event::MouseButton::Middle => PointerButton::Middle,
    }
}

/// Convert a crossterm `Event` into an [`InputEvent`].
///
/// Returns `None` for events with no normalized form (resize, paste, scroll,
/// unsupported keys). Terminal cells map to scene units one to one.
pub fn from_crossterm(event: &crossterm::event::Event) -> Option<InputEvent> {
    use crossterm::event::{Event, KeyEventKind, MouseEventKind};
    match event {
        Event::Key(ke) => {
            let key = convert_key(ke.code)?;
            let modifiers = convert_modifiers(ke.modifiers);
            Some(InputEvent::Key(match ke.kind {
                KeyEventKind::Release => KeyInput::release(key, modifiers),
                KeyEventKind::Press | KeyEventKind::Repeat => KeyInput::press(key, modifiers),
            }))
        }
        Event::Mouse(me) => {
            let (x, y) = (f32::from(me.column), f32::from(me.row));
            let pointer = match me.kind {
                MouseEventKind::Down(b) => PointerInput::down(x, y, convert_mouse_button(b)),
                MouseEventKind::Up(b) => PointerInput::up(x, y, convert_mouse_button(b)),
                MouseEventKind::Moved | MouseEventKind::Drag(_) => PointerInput::motion(x, y),
                _ => return None,
            };
            Some(InputEvent::Pointer(pointer))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// InputQueue
// ---------------------------------------------------------------------------

type Queued = (InputEvent, Option<RawEvent>);

/// Producer side of the input queue. Cheap to clone, usable from any thread.
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: UnboundedSender<Queued>,
}

impl InputSender {
    /// Queue a normalized event. Returns `false` if the queue is gone.
    pub fn send(&self, event: InputEvent) -> bool {
        self.tx.send((event, None)).is_ok()
    }

    /// Queue a normalized event with its raw source attached.
    pub fn send_with_raw(&self, event: InputEvent, raw: RawEvent) -> bool {
        self.tx.send((event, Some(raw))).is_ok()
    }

    /// Convert and queue a crossterm event, keeping it as the raw source.
    ///
    /// Returns `false` if the event has no normalized form.
    pub fn send_crossterm(&self, event: crossterm::event::Event) -> bool {
        match from_crossterm(&event) {
            Some(normalized) => self.send_with_raw(normalized, Arc::new(event)),
            None => false,
        }
    }
}

/// Consumer side of the input queue, drained once per frame.
#[derive(Debug)]
pub struct InputQueue {
    tx: UnboundedSender<Queued>,
    rx: UnboundedReceiver<Queued>,
}

impl InputQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// A new producer handle.
    pub fn sender(&self) -> InputSender {
        InputSender { tx: self.tx.clone() }
    }

    /// Drain everything queued so far, in arrival order.
    pub fn drain(&mut self) -> Vec<(InputEvent, Option<RawEvent>)> {
        let mut out = Vec::new();
        while let Ok(item) = self.rx.try_recv() {
            out.push(item);
        }
        out
    }

    /// Whether anything is queued.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
