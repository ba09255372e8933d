//! Per-frame driving: input pump, update and render passes.
//!
//! Producers push normalized input through an [`InputSender`] from any
//! thread; [`Scene::pump`] drains the queue and turns each input into events
//! on the scene's thread, applying the built-in reactions (click-to-focus,
//! tab navigation) unless a listener disabled the default behaviour.

use tracing::{debug, trace};

use super::Scene;
use crate::event::input::{
    InputEvent, InputSender, Key, KeyInput, Modifiers, PointerAction, PointerInput, RawEvent,
};
use crate::event::record::{Event, KeyState, PointerState};
use crate::event::types::EventType;
use crate::geometry::Point;
use crate::widget::RenderItem;

impl Scene {
    /// A sender that feeds this scene's input queue.
    pub fn input_sender(&self) -> InputSender {
        self.input.sender()
    }

    /// Queue one input for the next [`pump`](Self::pump).
    pub fn push_input(&self, input: InputEvent) -> bool {
        self.input.sender().send(input)
    }

    /// Drain queued input and dispatch it. Returns the number of inputs handled.
    pub fn pump(&mut self) -> usize {
        let pending = self.input.drain();
        let count = pending.len();
        for (input, raw) in pending {
            self.handle_input(input, raw);
        }
        if count > 0 {
            trace!(count, "input pumped");
        }
        count
    }

    /// Dispatch one input immediately.
    pub fn handle_input(&mut self, input: InputEvent, raw: Option<RawEvent>) {
        match input {
            InputEvent::Pointer(pointer) => self.handle_pointer(pointer, raw),
            InputEvent::Key(key) => self.handle_key(key, raw),
            InputEvent::Quit => {
                let mut event = Event::new(EventType::QUIT).with_target(self.root());
                if let Some(raw) = raw {
                    event = event.with_raw(raw);
                }
                self.dispatch(event);
                self.running = false;
                debug!("quit requested");
            }
        }
    }

    fn handle_pointer(&mut self, pointer: PointerInput, raw: Option<RawEvent>) {
        let point = Point::new(pointer.x, pointer.y);
        let state = PointerState {
            x: pointer.x,
            y: pointer.y,
            button: pointer.button,
            clicks: pointer.clicks,
        };
        let event = |ty: EventType| {
            let event = Event::new(ty).with_pointer(state);
            match &raw {
                Some(raw) => event.with_raw(raw.clone()),
                None => event,
            }
        };

        match pointer.action {
            PointerAction::Motion => {
                self.update_hover(point);
                if let Some(hit) = self.hit_test(point) {
                    self.dispatch(event(EventType::MOUSE_MOVE).with_target(hit));
                }
            }
            PointerAction::Down => {
                let Some(hit) = self.hit_test(point) else {
                    self.pressed = None;
                    return;
                };
                let down = self.dispatch(event(EventType::MOUSE_BUTTON_DOWN).with_target(hit.clone()));
                let focusable = self
                    .core(&hit)
                    .is_some_and(|c| c.clickable && c.enabled);
                if focusable && !down.is_default_behavior_disabled() {
                    self.set_keyboard_focus(&hit);
                }
                self.pressed = Some(hit);
            }
            PointerAction::Up => {
                let hit = self.hit_test(point);
                if let Some(hit) = &hit {
                    self.dispatch(event(EventType::MOUSE_BUTTON_UP).with_target(hit.clone()));
                }
                let pressed = self.pressed.take();
                if let (Some(hit), Some(pressed)) = (hit, pressed) {
                    if hit == pressed && self.is_valid(&hit) {
                        self.dispatch(event(EventType::MOUSE_CLICK).with_target(hit.clone()));
                        if pointer.clicks >= 2 {
                            self.dispatch(event(EventType::MOUSE_DOUBLE_CLICK).with_target(hit));
                        }
                    }
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyInput, raw: Option<RawEvent>) {
        let ty = if key.pressed { EventType::KEY_DOWN } else { EventType::KEY_UP };
        let mut event = Event::new(ty)
            .with_target(self.focused())
            .with_key(KeyState {
                key: key.key,
                scan_code: key.scan_code,
                modifiers: key.modifiers,
                ascii: key.ascii,
            });
        if let Some(raw) = raw {
            event = event.with_raw(raw);
        }
        let event = self.dispatch(event);
        if !key.pressed || event.is_default_behavior_disabled() {
            return;
        }
        match key.key {
            Key::Tab => {
                self.handle_tab_key_press(key.modifiers.contains(Modifiers::SHIFT));
            }
            Key::BackTab => {
                self.handle_tab_key_press(true);
            }
            _ => {}
        }
    }

    /// Run `on_update` for every staged node and dispatch `EnterFrame` at the root.
    pub fn update(&mut self, elapsed: f32) {
        let staged = self.store.walk_depth_first(self.root);
        for id in staged {
            if let Some(node) = self.store.get_mut(id) {
                node.behavior.on_update(elapsed);
            }
        }
        self.dispatch(
            Event::new(EventType::ENTER_FRAME)
                .with_target(self.root())
                .with_elapsed(elapsed),
        );
    }

    /// Visible staged nodes in painter's order with their world bounds and
    /// drawn content. Clears the dirty flag of every node rendered.
    pub fn render(&mut self) -> Vec<RenderItem> {
        let order = self.visible_walk();
        let mut items = Vec::with_capacity(order.len());
        for id in order {
            let bounds = self.world_bounds(id);
            let Some(node) = self.store.get_mut(id) else { continue };
            node.core.dirty = false;
            items.push(RenderItem {
                name: node.name().to_owned(),
                bounds,
                content: node.behavior.on_render(bounds),
            });
        }
        items
    }

    /// Whether no `Quit` has been handled yet.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop the scene without dispatching `Quit`.
    pub fn request_quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::dom::handle::Handle;
    use crate::event::input::PointerButton;
    use crate::factory::NodeInit;
    use crate::geometry::Region;
    use crate::widgets::{Panel, Stage};

    fn button(scene: &mut Scene, name: &str, x: f32, clickable: bool) -> Handle {
        let h = scene
            .create(
                "Box",
                NodeInit::named(name).with_bounds(x, 0.0, 10.0, 10.0).clickable(clickable),
            )
            .unwrap();
        scene.add_child(scene.root(), &h).unwrap();
        h
    }

    fn click(scene: &mut Scene, x: f32, y: f32) {
        scene.push_input(InputEvent::Pointer(PointerInput::down(x, y, PointerButton::Left)));
        scene.push_input(InputEvent::Pointer(PointerInput::up(x, y, PointerButton::Left)));
        scene.pump();
    }

    #[test]
    fn click_focus_is_gated_by_clickable() {
        let mut scene = Scene::default();
        let plain = button(&mut scene, "plain", 0.0, false);
        let ok = button(&mut scene, "ok", 20.0, true);
        click(&mut scene, 5.0, 5.0);
        assert_eq!(scene.focused().name(), "mainStage");
        assert_eq!(scene.behavior::<Panel>(&plain).unwrap().clicks(), 1);
        click(&mut scene, 25.0, 5.0);
        assert_eq!(scene.focused(), ok);
    }

    #[test]
    fn disabled_default_keeps_focus() {
        let mut scene = Scene::default();
        let ok = button(&mut scene, "ok", 0.0, true);
        scene.on(&ok, EventType::MOUSE_BUTTON_DOWN, |_, ev| ev.set_disable_default_behavior(true));
        click(&mut scene, 5.0, 5.0);
        assert_eq!(scene.focused().name(), "mainStage");
    }

    #[test]
    fn release_elsewhere_is_not_a_click() {
        let mut scene = Scene::default();
        let a = button(&mut scene, "a", 0.0, true);
        button(&mut scene, "b", 20.0, true);
        scene.push_input(InputEvent::Pointer(PointerInput::down(5.0, 5.0, PointerButton::Left)));
        scene.push_input(InputEvent::Pointer(PointerInput::up(25.0, 5.0, PointerButton::Left)));
        assert_eq!(scene.pump(), 2);
        assert_eq!(scene.behavior::<Panel>(&a).unwrap().clicks(), 0);
    }

    #[test]
    fn double_click_follows_click() {
        let mut scene = Scene::default();
        let a = button(&mut scene, "a", 0.0, true);
        let log = Rc::new(RefCell::new(Vec::new()));
        for ty in [EventType::MOUSE_CLICK, EventType::MOUSE_DOUBLE_CLICK] {
            let log = Rc::clone(&log);
            scene.on(&a, ty, move |_, ev| log.borrow_mut().push(ev.event_type().name()));
        }
        scene.push_input(InputEvent::Pointer(PointerInput::down(1.0, 1.0, PointerButton::Left)));
        scene.push_input(InputEvent::Pointer(
            PointerInput::up(1.0, 1.0, PointerButton::Left).with_clicks(2),
        ));
        scene.pump();
        assert_eq!(*log.borrow(), vec!["MouseClick", "MouseDoubleClick"]);
    }

    #[test]
    fn keys_go_to_focused_node_and_tab_navigates() {
        let mut scene = Scene::default();
        let a = scene.create("Box", NodeInit::named("a").tab_stop(0)).unwrap();
        let b = scene.create("Box", NodeInit::named("b").tab_stop(1)).unwrap();
        scene.add_child(scene.root(), &a).unwrap();
        scene.add_child(scene.root(), &b).unwrap();
        let keys = Rc::new(RefCell::new(Vec::new()));
        let k = Rc::clone(&keys);
        scene.on("mainStage", EventType::KEY_DOWN, move |_, ev| {
            let target = ev.target().map(|h| h.name().to_owned()).unwrap_or_default();
            k.borrow_mut().push(target);
        });

        scene.push_input(InputEvent::Key(KeyInput::press(Key::Tab, Modifiers::NONE)));
        scene.push_input(InputEvent::Key(KeyInput::press(Key::Char('x'), Modifiers::NONE)));
        scene.push_input(InputEvent::Key(KeyInput::press(Key::Tab, Modifiers::NONE)));
        scene.push_input(InputEvent::Key(KeyInput::press(Key::Tab, Modifiers::SHIFT)));
        scene.pump();
        assert_eq!(scene.focused(), a);
        assert_eq!(*keys.borrow(), vec!["mainStage", "a", "a", "b"]);

        scene.handle_input(InputEvent::Key(KeyInput::press(Key::BackTab, Modifiers::NONE)), None);
        assert_eq!(scene.focused(), b);
    }

    #[test]
    fn motion_updates_hover() {
        let mut scene = Scene::default();
        let a = button(&mut scene, "a", 0.0, false);
        scene.push_input(InputEvent::Pointer(PointerInput::motion(3.0, 3.0)));
        scene.pump();
        assert_eq!(scene.hovered(), Some(a));
    }

    #[test]
    fn quit_stops_and_reaches_globals() {
        let mut scene = Scene::default();
        let seen = Rc::new(RefCell::new(false));
        let s = Rc::clone(&seen);
        scene.add_global_listener(EventType::QUIT, move |_, _| *s.borrow_mut() = true, 0);
        scene.push_input(InputEvent::Quit);
        scene.pump();
        assert!(!scene.is_running());
        assert!(*seen.borrow());
    }

    #[test]
    fn raw_event_reaches_listeners() {
        let mut scene = Scene::default();
        let seen = Rc::new(RefCell::new(None));
        let s = Rc::clone(&seen);
        scene.on("mainStage", EventType::KEY_DOWN, move |_, ev| {
            *s.borrow_mut() = ev.raw::<&'static str>().copied();
        });
        scene.input_sender().send_with_raw(
            InputEvent::Key(KeyInput::press(Key::Enter, Modifiers::NONE)),
            std::sync::Arc::new("raw-enter"),
        );
        scene.pump();
        assert_eq!(*seen.borrow(), Some("raw-enter"));
    }

    #[test]
    fn update_and_render() {
        let mut scene = Scene::default();
        let a = button(&mut scene, "a", 5.0, false);
        let hidden = button(&mut scene, "hidden", 0.0, false);
        scene.set_hidden(&hidden, true);
        scene.update(0.5);
        assert_eq!(scene.behavior::<Stage>("mainStage").unwrap().frames(), 1);

        let items = scene.render();
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["mainStage", "a"]);
        assert_eq!(items[1].bounds, Region::new(5.0, 0.0, 10.0, 10.0));
        assert_eq!(items[1].content.as_deref(), Some("fill white 10x10"));
        assert!(!scene.is_dirty(&a));
        assert!(scene.is_dirty(&hidden));
    }
}
