//! # stagegraph
//!
//! A retained scene graph: a tree of named nodes with browser-style
//! capture/target/bubble event dispatch, handle-checked references,
//! priority/z-order stacking, anchor-relative geometry and deferred garbage
//! collection of detached subtrees.
//!
//! ## Core Systems
//!
//! - **[`dom`]**: slotmap node arena with a name index, handles, anchors
//! - **[`scene`]**: the scene container with tree, geometry, stacking, orphans and input pump
//! - **[`event`]**: event types and policies, listener registries, dispatch, normalized input
//! - **[`focus`]**: keyboard focus, tab order and pointer hover
//! - **[`widget`]**: the `Behavior` trait every node kind implements
//! - **[`widgets`]**: built-in kinds: Stage, Group, Box, Label
//! - **[`factory`]**: type registry and config-driven construction
//! - **[`testing`]**: headless `Pilot` driver and snapshot helpers
//! - **[`geometry`]**: Point, Size, Region primitives
//!
//! ```
//! use stagegraph::event::EventType;
//! use stagegraph::factory::NodeInit;
//! use stagegraph::scene::Scene;
//!
//! let mut scene = Scene::default();
//! let button = scene
//!     .create("Box", NodeInit::named("ok").with_bounds(10.0, 10.0, 80.0, 20.0).clickable(true))
//!     .unwrap();
//! scene.add_child(scene.root(), &button).unwrap();
//! scene.on(&button, EventType::MOUSE_CLICK, |scene, _event| {
//!     scene.set_title("clicked");
//! });
//! ```

// Foundation
pub mod error;
pub mod geometry;

// Core systems
pub mod dom;
pub mod event;
pub mod focus;
pub mod scene;

// Node kinds
pub mod factory;
pub mod widget;
pub mod widgets;

// Test support
pub mod testing;

pub use dom::{AnchorPoint, Edge, Handle, NodeRef, RetentionPolicy, Target};
pub use error::{Result, SceneError};
pub use event::{Event, EventType, Phase};
pub use factory::{Factory, NodeInit};
pub use scene::{Scene, SceneConfig};
