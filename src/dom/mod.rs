//! Node arena: handles, node data, anchors, and stacking arguments.

pub mod anchor;
pub mod handle;
pub mod node;
pub mod stacking;
pub mod store;

pub use anchor::{AnchorPoint, Anchors, Edge};
pub use handle::{Handle, NodeRef};
pub use node::{Geometry, Node, NodeCore, NodeId, RetentionPolicy};
pub use stacking::Target;
pub use store::NodeStore;
