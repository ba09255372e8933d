//! Node behaviours: the per-kind hook trait and render items.

pub mod traits;

pub use traits::{Behavior, RenderItem};
