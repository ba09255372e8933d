//! Scene: the node store, its root stage, focus state, listeners and input.
//!
//! [`Scene`] is the single owner of every node. Tree operations, geometry,
//! stacking, orphan collection and the input pump are split across the
//! submodules of this directory as `impl Scene` blocks; the event dispatcher
//! lives in [`crate::event::dispatch`] and focus/hover in [`crate::focus`].

pub mod flags;
pub mod layout;
pub mod orphans;
pub mod pump;
pub mod stacking;
pub mod tree;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::dom::handle::{Handle, NodeRef};
use crate::dom::node::{Node, NodeCore, NodeId, RetentionPolicy};
use crate::dom::store::NodeStore;
use crate::error::{Result, SceneError};
use crate::event::input::InputQueue;
use crate::event::listener::{ListenerId, ListenerRegistry};
use crate::event::record::Event;
use crate::event::types::EventType;
use crate::factory::{Factory, NodeInit};
use crate::focus::FocusController;
use crate::widget::Behavior;
use crate::widgets::Stage;

// ---------------------------------------------------------------------------
// SceneConfig
// ---------------------------------------------------------------------------

/// Configuration for a scene.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Name of the root stage node.
    pub root_name: String,
    /// Optional title. When unset the title follows the root's name.
    pub title: Option<String>,
    /// Root stage width.
    pub width: f32,
    /// Root stage height.
    pub height: f32,
    /// Only clickable nodes can become the hovered node.
    pub hover_requires_clickable: bool,
    /// Retention policy given to factory-built nodes that do not set one.
    pub default_retention: RetentionPolicy,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            root_name: "mainStage".to_owned(),
            title: None,
            width: 800.0,
            height: 600.0,
            hover_requires_clickable: false,
            default_retention: RetentionPolicy::RetainUntilManual,
        }
    }
}

impl SceneConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from a JSON document. Missing fields take defaults.
    pub fn from_json(document: &str) -> Result<Self> {
        Ok(serde_json::from_str(document)?)
    }

    /// Set the root name (builder).
    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }

    /// Set the title (builder).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the root size (builder).
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Gate hover on `clickable` (builder).
    pub fn with_hover_requires_clickable(mut self, gated: bool) -> Self {
        self.hover_requires_clickable = gated;
        self
    }

    /// Set the default orphan retention policy (builder).
    pub fn with_default_retention(mut self, policy: RetentionPolicy) -> Self {
        self.default_retention = policy;
        self
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// A tree of named nodes under one root stage.
pub struct Scene {
    pub(crate) store: NodeStore,
    pub(crate) root: NodeId,
    pub(crate) focus: FocusController,
    pub(crate) globals: ListenerRegistry,
    next_listener: u64,
    pub(crate) input: InputQueue,
    /// Node under the pointer at the last button press.
    pub(crate) pressed: Option<Handle>,
    factory: Factory,
    config: SceneConfig,
    title: String,
    pub(crate) running: bool,
}

impl Scene {
    /// Create a scene holding only its root stage.
    pub fn new(config: SceneConfig) -> Self {
        let mut store = NodeStore::new();
        let core = NodeCore::new(config.root_name.clone()).with_bounds(
            0.0,
            0.0,
            config.width,
            config.height,
        );
        // An empty store has no name to collide with.
        let root = store
            .insert(Node::new(core, Box::new(Stage::new())))
            .unwrap_or_default();
        let title = config
            .title
            .clone()
            .unwrap_or_else(|| config.root_name.clone());
        debug!(root = %config.root_name, "scene created");
        Self {
            store,
            root,
            focus: FocusController::new(),
            globals: ListenerRegistry::default(),
            next_listener: 0,
            input: InputQueue::new(),
            pressed: None,
            factory: Factory::with_builtins(),
            config,
            title,
            running: true,
        }
    }

    /// The scene configuration.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// The node factory.
    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    /// The node factory, for registering additional types.
    pub fn factory_mut(&mut self) -> &mut Factory {
        &mut self.factory
    }

    /// Read-only access to the node store.
    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// Current title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    // ── Creation / destruction ───────────────────────────────────────

    /// Build a node of the registered type `tag` from `init`, including its
    /// nested children.
    ///
    /// Fails with [`SceneError::MissingRequiredField`] when `init` has no
    /// name, [`SceneError::UnknownType`] for an unregistered tag and
    /// [`SceneError::NameCollision`] when the name is taken.
    ///
    /// Construction is all or nothing: if any node of the tree fails, every
    /// node already built by this call is destroyed before the error returns.
    pub fn create(&mut self, tag: &str, init: NodeInit) -> Result<Handle> {
        let mut built = Vec::new();
        let result = self.build(tag, init, &mut built);
        if let Err(err) = &result {
            for &id in built.iter().rev() {
                self.destroy_id(id);
            }
            debug!(error = %err, rolled_back = built.len(), "node build failed");
        }
        result
    }

    fn build(&mut self, tag: &str, init: NodeInit, built: &mut Vec<NodeId>) -> Result<Handle> {
        let core = init.to_core(self.config.default_retention)?;
        if self.store.id_of(core.name()).is_some() {
            return Err(SceneError::NameCollision(core.name().to_owned()));
        }
        let behavior = self.factory.construct(tag, &init)?;
        let handle = self.insert(core, behavior)?;
        built.push(handle.cached());
        for child in init.children {
            let kind = child
                .kind
                .clone()
                .ok_or(SceneError::MissingRequiredField("type"))?;
            let child = self.build(&kind, child, built)?;
            self.add_child(&handle, &child)?;
        }
        Ok(handle)
    }

    /// Build a node tree from a JSON config document.
    pub fn create_from_json(&mut self, document: &str) -> Result<Handle> {
        let init: NodeInit = serde_json::from_str(document)?;
        self.create_tree(init)
    }

    fn create_tree(&mut self, init: NodeInit) -> Result<Handle> {
        let tag = init
            .kind
            .clone()
            .ok_or(SceneError::MissingRequiredField("type"))?;
        self.create(&tag, init)
    }

    /// Insert a pre-built node. It starts parentless.
    pub fn insert(&mut self, core: NodeCore, behavior: Box<dyn Behavior>) -> Result<Handle> {
        let node = Node::new(core, behavior);
        let name = node.name().to_owned();
        let kind = node.type_name().to_owned();
        let id = self.store.insert(node)?;
        debug!(name = %name, kind = %kind, "node created");
        Ok(Handle::bound(name, None, id))
    }

    /// Destroy a node. Its children are detached and become orphans, except
    /// those with [`RetentionPolicy::AutoDestroy`], which are destroyed too.
    ///
    /// Returns `false` for an unknown node and for the root.
    pub fn destroy(&mut self, node: impl Into<NodeRef>) -> bool {
        let node = node.into();
        let Some(id) = self.store.resolve_ref(&node) else {
            return false;
        };
        if id == self.root {
            warn!(name = node.name(), "refusing to destroy the root stage");
            return false;
        }
        self.destroy_id(id);
        true
    }

    pub(crate) fn destroy_id(&mut self, id: NodeId) {
        let Some(handle) = self.store.handle(id) else {
            return;
        };
        self.detach(id);
        let children = self.store.children(id).to_vec();
        for &child in &children {
            self.detach(child);
        }
        // A listener may already have destroyed it.
        if self.store.remove(id).is_none() {
            return;
        }
        self.focus.forget(handle.name());
        if self
            .pressed
            .as_ref()
            .is_some_and(|p| p.name() == handle.name())
        {
            self.pressed = None;
        }
        debug!(name = handle.name(), "node destroyed");

        for child in children {
            let auto = self.store.get(child).is_some_and(|n| {
                n.core.parent.is_none() && n.core.retention == RetentionPolicy::AutoDestroy
            });
            if auto {
                self.destroy_id(child);
            }
        }
    }

    // ── Lookup ───────────────────────────────────────────────────────

    /// Handle to the node named `name`.
    pub fn lookup(&self, name: &str) -> Option<Handle> {
        let id = self.store.id_of(name)?;
        self.store.handle(id)
    }

    /// Whether `handle` refers to a live node of the expected type.
    pub fn is_valid(&self, handle: &Handle) -> bool {
        self.store.resolve(handle).is_some()
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Always `false`: a scene holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The node behind `node`.
    pub fn node(&self, node: impl Into<NodeRef>) -> Option<&Node> {
        let id = self.id(node)?;
        self.store.get(id)
    }

    /// The node behind `node`, mutably.
    pub fn node_mut(&mut self, node: impl Into<NodeRef>) -> Option<&mut Node> {
        let id = self.id(node)?;
        self.store.get_mut(id)
    }

    /// The behaviour of `node` as a `B`.
    ///
    /// Fails with [`SceneError::InvalidHandle`] when the node is gone or has
    /// a different behaviour type.
    pub fn behavior<B: Behavior>(&self, node: impl Into<NodeRef>) -> Result<&B> {
        let node = node.into();
        self.store
            .resolve_ref(&node)
            .and_then(|id| self.store.get(id))
            .and_then(|n| n.behavior.as_any().downcast_ref::<B>())
            .ok_or_else(|| SceneError::InvalidHandle(node.name().to_owned()))
    }

    /// The behaviour of `node` as a mutable `B`.
    pub fn behavior_mut<B: Behavior>(&mut self, node: impl Into<NodeRef>) -> Result<&mut B> {
        let node = node.into();
        let name = node.name().to_owned();
        self.store
            .resolve_ref(&node)
            .and_then(|id| self.store.get_mut(id))
            .and_then(|n| n.behavior.as_any_mut().downcast_mut::<B>())
            .ok_or(SceneError::InvalidHandle(name))
    }

    /// Type name of `node` (e.g. `"Label"`).
    pub fn type_name(&self, node: impl Into<NodeRef>) -> Option<String> {
        self.node(node).map(|n| n.type_name().to_owned())
    }

    pub(crate) fn id(&self, node: impl Into<NodeRef>) -> Option<NodeId> {
        self.store.resolve_ref(&node.into())
    }

    /// Resolve or report why not: `NotFound` for names, `InvalidHandle` for handles.
    pub(crate) fn require(&self, node: &NodeRef) -> Result<NodeId> {
        self.store.resolve_ref(node).ok_or_else(|| match node {
            NodeRef::Name(name) => SceneError::NotFound(name.clone()),
            NodeRef::Handle(handle) => SceneError::InvalidHandle(handle.name().to_owned()),
        })
    }

    pub(crate) fn core(&self, node: impl Into<NodeRef>) -> Option<&NodeCore> {
        self.node(node).map(|n| &n.core)
    }

    pub(crate) fn core_mut(&mut self, node: impl Into<NodeRef>) -> Option<&mut NodeCore> {
        self.node_mut(node).map(|n| &mut n.core)
    }

    // ── Root ─────────────────────────────────────────────────────────

    /// Handle to the root stage.
    pub fn root(&self) -> Handle {
        self.store
            .handle(self.root)
            .unwrap_or_else(|| Handle::new(self.config.root_name.clone()))
    }

    /// Make `node` the root stage.
    ///
    /// The node is detached from any parent first. `StageClosed` fires on the
    /// old root, then `StageOpened` on the new one, then focus is reset and
    /// the title updated. The old root becomes an orphan.
    pub fn set_root(&mut self, node: impl Into<NodeRef>) -> Result<()> {
        let id = self.require(&node.into())?;
        if id == self.root {
            return Ok(());
        }
        self.detach(id);
        let old = self.root();
        self.dispatch(Event::new(EventType::STAGE_CLOSED).with_target(old.clone()));
        self.root = id;
        let new = self.root();
        self.dispatch(Event::new(EventType::STAGE_OPENED).with_target(new.clone()).with_related(old.clone()));
        self.focus.reset();
        self.pressed = None;
        self.title = self
            .config
            .title
            .clone()
            .unwrap_or_else(|| new.name().to_owned());
        self.mark_dirty(id);
        debug!(old = old.name(), new = new.name(), "root swapped");
        Ok(())
    }

    // ── Listeners ────────────────────────────────────────────────────

    fn next_listener_id(&mut self) -> ListenerId {
        self.next_listener += 1;
        ListenerId(self.next_listener)
    }

    /// Register a listener on `node`.
    ///
    /// Capture listeners fire during the capture phase on ancestors of the
    /// target, the others during bubbling; both fire at the target. Higher
    /// `priority` runs first, ties in registration order. Returns `None` if
    /// the node does not exist.
    pub fn add_event_listener<F>(
        &mut self,
        node: impl Into<NodeRef>,
        event_type: EventType,
        listener: F,
        use_capture: bool,
        priority: i32,
    ) -> Option<ListenerId>
    where
        F: Fn(&mut Scene, &mut Event) + 'static,
    {
        let id = self.id(node)?;
        let listener_id = self.next_listener_id();
        let node = self.store.get_mut(id)?;
        node.core
            .listeners
            .add(listener_id, event_type, std::rc::Rc::new(listener), use_capture, priority);
        Some(listener_id)
    }

    /// Register a non-capture listener with priority 0.
    pub fn on<F>(&mut self, node: impl Into<NodeRef>, event_type: EventType, listener: F) -> Option<ListenerId>
    where
        F: Fn(&mut Scene, &mut Event) + 'static,
    {
        self.add_event_listener(node, event_type, listener, false, 0)
    }

    /// Remove a listener from `node`. Returns whether it was registered.
    pub fn remove_event_listener(
        &mut self,
        node: impl Into<NodeRef>,
        event_type: EventType,
        listener: ListenerId,
    ) -> bool {
        self.core_mut(node)
            .is_some_and(|core| core.listeners.remove(event_type, listener))
    }

    /// Whether `node` has any listener for `event_type`.
    pub fn has_event_listener(&self, node: impl Into<NodeRef>, event_type: EventType) -> bool {
        self.core(node).is_some_and(|core| core.listeners.has(event_type))
    }

    /// Register a global listener, invoked for event types whose policy is global.
    pub fn add_global_listener<F>(&mut self, event_type: EventType, listener: F, priority: i32) -> ListenerId
    where
        F: Fn(&mut Scene, &mut Event) + 'static,
    {
        let id = self.next_listener_id();
        self.globals
            .add(id, event_type, std::rc::Rc::new(listener), false, priority);
        id
    }

    /// Remove a global listener.
    pub fn remove_global_listener(&mut self, event_type: EventType, listener: ListenerId) -> bool {
        self.globals.remove(event_type, listener)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("root", &self.root().name())
            .field("nodes", &self.store.len())
            .field("title", &self.title)
            .field("running", &self.running)
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
