//! Event system: types, records, listeners, input, capture/target/bubble dispatch.

pub mod dispatch;
pub mod input;
pub mod listener;
pub mod record;
pub mod types;

pub use input::{
    InputEvent, InputQueue, InputSender, Key, KeyInput, Modifiers, PointerAction, PointerButton,
    PointerInput,
};
pub use listener::{ListenerFn, ListenerId, ListenerRegistry};
pub use record::{Event, KeyState, Phase, PointerState};
pub use types::{DispatchPolicy, EventType};
