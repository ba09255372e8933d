//! Built-in node kinds: Stage, Group, Panel (`Box`), Label.

pub mod group;
pub mod label;
pub mod panel;
pub mod stage;

pub use group::Group;
pub use label::Label;
pub use panel::Panel;
pub use stage::Stage;
