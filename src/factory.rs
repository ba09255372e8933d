//! Node construction: the `NodeInit` config shape and the type factory.
//!
//! A [`Factory`] maps type tags (`"Box"`, `"Label"`, ...) to constructors
//! that turn a [`NodeInit`] into a behaviour. The scene pairs that behaviour
//! with the shared node data built by [`NodeInit::to_core`].

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::dom::anchor::{AnchorPoint, Anchors};
use crate::dom::node::{NodeCore, RetentionPolicy};
use crate::error::{Result, SceneError};
use crate::widget::Behavior;
use crate::widgets::{Group, Label, Panel, Stage};

// ---------------------------------------------------------------------------
// NodeInit
// ---------------------------------------------------------------------------

/// Anchor strings for each edge, as written in a config document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnchorInit {
    pub top: Option<String>,
    pub left: Option<String>,
    pub bottom: Option<String>,
    pub right: Option<String>,
}

/// Construction config for one node and, recursively, its children.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeInit {
    /// Unique name. Required.
    pub name: Option<String>,
    /// Type tag. Required when building from a document.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub anchors: AnchorInit,
    pub priority: i32,
    pub z_order: i32,
    pub clickable: bool,
    pub enabled: bool,
    pub hidden: bool,
    pub tab_enabled: bool,
    pub tab_priority: i32,
    /// Falls back to the scene's default retention when unset.
    pub orphan_policy: Option<RetentionPolicy>,
    /// Label text.
    pub text: Option<String>,
    /// Box fill color.
    pub color: Option<String>,
    pub children: Vec<NodeInit>,
}

impl Default for NodeInit {
    fn default() -> Self {
        Self {
            name: None,
            kind: None,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            anchors: AnchorInit::default(),
            priority: 0,
            z_order: 0,
            clickable: false,
            enabled: true,
            hidden: false,
            tab_enabled: false,
            tab_priority: 0,
            orphan_policy: None,
            text: None,
            color: None,
            children: Vec::new(),
        }
    }
}

impl NodeInit {
    /// Config with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the type tag (builder).
    pub fn of_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set offsets and size (builder).
    pub fn with_bounds(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self
    }

    /// Anchor every edge to `anchor` (builder).
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        let anchor = anchor.into();
        self.anchors = AnchorInit {
            top: Some(anchor.clone()),
            left: Some(anchor.clone()),
            bottom: Some(anchor.clone()),
            right: Some(anchor),
        };
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn clickable(mut self, clickable: bool) -> Self {
        self.clickable = clickable;
        self
    }

    /// Put the node in the tab order (builder).
    pub fn tab_stop(mut self, tab_priority: i32) -> Self {
        self.tab_enabled = true;
        self.tab_priority = tab_priority;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_orphan_policy(mut self, policy: RetentionPolicy) -> Self {
        self.orphan_policy = Some(policy);
        self
    }

    /// Add a nested child config (builder).
    pub fn with_child(mut self, child: NodeInit) -> Self {
        self.children.push(child);
        self
    }

    /// Build the shared node data. Fails on a missing name or a bad anchor.
    pub fn to_core(&self, default_retention: RetentionPolicy) -> Result<NodeCore> {
        let name = self
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or(SceneError::MissingRequiredField("name"))?;
        let mut core = NodeCore::new(name)
            .with_bounds(self.x, self.y, self.width, self.height)
            .with_anchors(self.parse_anchors()?)
            .with_priority(self.priority)
            .clickable(self.clickable)
            .with_retention(self.orphan_policy.unwrap_or(default_retention));
        core.z_order = self.z_order;
        core.enabled = self.enabled;
        core.hidden = self.hidden;
        core.tab_enabled = self.tab_enabled;
        core.tab_priority = self.tab_priority;
        Ok(core)
    }

    fn parse_anchors(&self) -> Result<Anchors> {
        let parse = |s: &Option<String>| -> Result<AnchorPoint> {
            s.as_deref().map_or(Ok(AnchorPoint::default()), str::parse)
        };
        Ok(Anchors {
            top: parse(&self.anchors.top)?,
            left: parse(&self.anchors.left)?,
            bottom: parse(&self.anchors.bottom)?,
            right: parse(&self.anchors.right)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Builds the behaviour of one node kind from its config.
pub type Constructor = fn(&NodeInit) -> Result<Box<dyn Behavior>>;

/// Registry of node kinds by type tag.
#[derive(Clone, Default)]
pub struct Factory {
    constructors: HashMap<String, Constructor>,
}

impl Factory {
    /// An empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory with `Stage`, `Group`, `Box` and `Label` registered.
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        factory.register_type("Stage", Stage::construct);
        factory.register_type("Group", Group::construct);
        factory.register_type("Box", Panel::construct);
        factory.register_type("Label", Label::construct);
        factory
    }

    /// Register (or replace) the constructor for `tag`. Returns the previous one.
    pub fn register_type(&mut self, tag: impl Into<String>, constructor: Constructor) -> Option<Constructor> {
        self.constructors.insert(tag.into(), constructor)
    }

    /// Whether `tag` is registered.
    pub fn is_registered(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn types(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Run the constructor for `tag`.
    pub fn construct(&self, tag: &str, init: &NodeInit) -> Result<Box<dyn Behavior>> {
        let constructor = self
            .constructors
            .get(tag)
            .ok_or_else(|| SceneError::UnknownType(tag.to_owned()))?;
        constructor(init)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory").field("types", &self.types()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use super::*;
    use crate::scene::Scene;

    #[derive(Debug)]
    struct Sprite(String);

    impl Behavior for Sprite {
        fn type_name(&self) -> &str {
            "Sprite"
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn sprite(init: &NodeInit) -> Result<Box<dyn Behavior>> {
        let image = init.text.clone().ok_or(SceneError::MissingRequiredField("text"))?;
        Ok(Box::new(Sprite(image)))
    }

    #[test]
    fn builtins_are_registered() {
        let factory = Factory::with_builtins();
        assert_eq!(factory.types(), vec!["Box", "Group", "Label", "Stage"]);
        assert!(matches!(
            factory.construct("Nope", &NodeInit::named("n")),
            Err(SceneError::UnknownType(_))
        ));
    }

    #[test]
    fn custom_type_through_scene() {
        let mut scene = Scene::default();
        assert!(scene.factory_mut().register_type("Sprite", sprite).is_none());
        let h = scene.create("Sprite", NodeInit::named("hero").with_text("hero.png")).unwrap();
        assert_eq!(scene.behavior::<Sprite>(&h).unwrap().0, "hero.png");
        assert!(matches!(
            scene.create("Sprite", NodeInit::named("ghost")),
            Err(SceneError::MissingRequiredField("text"))
        ));
        assert!(!scene.is_valid(&crate::dom::Handle::new("ghost")));
    }

    #[test]
    fn to_core_applies_fields() {
        let init: NodeInit = serde_json::from_str(
            r#"{
                "name": "n", "x": 1, "y": 2, "width": 3, "height": 4,
                "anchors": { "left": "Middle & Right" },
                "priority": 5, "z_order": 6, "enabled": false, "tab_enabled": true,
                "tab_priority": 7, "orphan_policy": "auto"
            }"#,
        )
        .unwrap();
        let core = init.to_core(RetentionPolicy::RetainUntilManual).unwrap();
        assert_eq!(core.name(), "n");
        assert_eq!(core.geometry.width, 3.0);
        assert_eq!(core.geometry.anchors.left, AnchorPoint::MiddleRight);
        assert_eq!(core.geometry.anchors.top, AnchorPoint::TopLeft);
        assert_eq!((core.priority, core.z_order, core.tab_priority), (5, 6, 7));
        assert!(!core.enabled && core.tab_enabled);
        assert_eq!(core.retention, RetentionPolicy::AutoDestroy);
    }

    #[test]
    fn to_core_errors() {
        let missing = NodeInit::default().to_core(RetentionPolicy::RetainUntilManual);
        assert!(matches!(missing, Err(SceneError::MissingRequiredField("name"))));
        let bad = NodeInit::named("n")
            .with_anchor("upside")
            .to_core(RetentionPolicy::RetainUntilManual);
        assert!(matches!(bad, Err(SceneError::InvalidAnchor(a)) if a == "upside"));
    }

    #[test]
    fn enabled_defaults_true_in_documents() {
        let init: NodeInit = serde_json::from_str(r#"{ "name": "n" }"#).unwrap();
        assert!(init.enabled);
        assert!(init.children.is_empty());
    }
}
