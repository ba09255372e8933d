//! Headless testing helpers: Pilot, tree snapshots.
//!
//! Use the [`Pilot`] to drive a [`Scene`](crate::scene::Scene) with simulated
//! pointer and keyboard input. Use [`tree_to_string`] and [`render_to_string`]
//! to capture the tree or a render pass as plain text for snapshot assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{render_to_string, tree_to_string};
