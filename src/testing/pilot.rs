//! Pilot: programmatic interaction with a headless Scene.
//!
//! The `Pilot` owns a [`Scene`] and queues simulated input through the same
//! [`InputSender`](crate::event::InputSender) real producers use, so every
//! interaction goes through the pump exactly as it would at runtime.

use crate::event::input::{InputEvent, Key, KeyInput, Modifiers, PointerButton, PointerInput};
use crate::scene::{Scene, SceneConfig};

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless scene driver for testing.
///
/// Input methods only queue; call [`process`](Self::process) (or use the
/// `*_now` helpers) to pump the queue.
///
/// # Examples
///
/// ```
/// use stagegraph::testing::Pilot;
/// use stagegraph::event::Key;
///
/// let mut pilot = Pilot::new();
/// pilot.press_key(Key::Tab);
/// assert_eq!(pilot.process(), 1);
/// assert!(pilot.is_running());
/// ```
pub struct Pilot {
    scene: Scene,
}

impl Pilot {
    /// Pilot over a default scene.
    pub fn new() -> Self {
        Self::from_scene(Scene::default())
    }

    /// Pilot over a scene built from `config`.
    pub fn with_config(config: SceneConfig) -> Self {
        Self::from_scene(Scene::new(config))
    }

    /// Pilot over an existing scene.
    pub fn from_scene(scene: Scene) -> Self {
        Self { scene }
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Queue a key press with no modifiers.
    pub fn press_key(&mut self, key: Key) {
        self.press_key_with(key, Modifiers::NONE);
    }

    /// Queue a key press with the given modifiers.
    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) {
        self.scene
            .push_input(InputEvent::Key(KeyInput::press(key, modifiers)));
    }

    /// Queue a key release.
    pub fn release_key(&mut self, key: Key) {
        self.scene
            .push_input(InputEvent::Key(KeyInput::release(key, Modifiers::NONE)));
    }

    /// Queue each character of `text` as a key press.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press_key(Key::Char(ch));
        }
    }

    /// Queue Tab.
    pub fn tab(&mut self) {
        self.press_key(Key::Tab);
    }

    /// Queue Shift+Tab.
    pub fn shift_tab(&mut self) {
        self.press_key_with(Key::Tab, Modifiers::SHIFT);
    }

    /// Queue pointer motion to `(x, y)`.
    pub fn move_pointer(&mut self, x: f32, y: f32) {
        self.scene
            .push_input(InputEvent::Pointer(PointerInput::motion(x, y)));
    }

    /// Queue a left-button press and release at `(x, y)`.
    pub fn click(&mut self, x: f32, y: f32) {
        self.click_with(x, y, PointerButton::Left, 1);
    }

    /// Queue a left-button double click at `(x, y)`.
    pub fn double_click(&mut self, x: f32, y: f32) {
        self.click_with(x, y, PointerButton::Left, 2);
    }

    fn click_with(&mut self, x: f32, y: f32, button: PointerButton, clicks: u8) {
        self.scene.push_input(InputEvent::Pointer(
            PointerInput::down(x, y, button).with_clicks(clicks),
        ));
        self.scene.push_input(InputEvent::Pointer(
            PointerInput::up(x, y, button).with_clicks(clicks),
        ));
    }

    /// Queue a quit request.
    pub fn quit(&mut self) {
        self.scene.push_input(InputEvent::Quit);
    }

    // ── Processing ───────────────────────────────────────────────────

    /// Pump all queued input. Returns the number of inputs handled.
    pub fn process(&mut self) -> usize {
        self.scene.pump()
    }

    /// Simulate one frame: pump input, then update with `elapsed` seconds.
    pub fn tick(&mut self, elapsed: f32) -> usize {
        let handled = self.process();
        self.scene.update(elapsed);
        handled
    }

    /// Click at `(x, y)` and pump.
    pub fn click_now(&mut self, x: f32, y: f32) {
        self.click(x, y);
        self.process();
    }

    /// Press `key` and pump.
    pub fn press_key_now(&mut self, key: Key) {
        self.press_key(key);
        self.process();
    }

    // ── Query ────────────────────────────────────────────────────────

    /// Borrow the scene immutably.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Borrow the scene mutably.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Whether the scene is still running (has not quit).
    pub fn is_running(&self) -> bool {
        self.scene.is_running()
    }

    /// Name of the focused node.
    pub fn focused_name(&self) -> String {
        self.scene.focused().name().to_owned()
    }

    /// Name of the hovered node.
    pub fn hovered_name(&self) -> Option<String> {
        self.scene.hovered().map(|h| h.name().to_owned())
    }

    /// Render the scene and describe it as text.
    pub fn render_to_text(&mut self) -> String {
        super::snapshot::render_to_string(&mut self.scene)
    }
}

impl Default for Pilot {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::types::EventType;
    use crate::factory::NodeInit;
    use crate::widgets::Panel;

    fn pilot_with_buttons() -> Pilot {
        let mut pilot = Pilot::new();
        let scene = pilot.scene_mut();
        for (i, name) in ["first", "second"].into_iter().enumerate() {
            let init = NodeInit::named(name)
                .with_bounds(i as f32 * 20.0, 0.0, 10.0, 10.0)
                .clickable(true)
                .tab_stop(i as i32);
            let h = scene.create("Box", init).unwrap();
            scene.add_child(scene.root(), &h).unwrap();
        }
        pilot
    }

    #[test]
    fn new_starts_running_with_root_focus() {
        let pilot = Pilot::new();
        assert!(pilot.is_running());
        assert_eq!(pilot.focused_name(), "mainStage");
        assert!(pilot.hovered_name().is_none());
    }

    #[test]
    fn with_config_preserves_settings() {
        let pilot = Pilot::with_config(SceneConfig::new().with_root_name("stage").with_title("T"));
        assert_eq!(pilot.scene().root().name(), "stage");
        assert_eq!(pilot.scene().title(), "T");
    }

    #[test]
    fn input_is_queued_until_processed() {
        let mut pilot = pilot_with_buttons();
        pilot.click(25.0, 5.0);
        assert_eq!(pilot.focused_name(), "mainStage");
        assert_eq!(pilot.process(), 2);
        assert_eq!(pilot.focused_name(), "second");
        assert_eq!(pilot.scene().behavior::<Panel>("second").unwrap().clicks(), 1);
    }

    #[test]
    fn tab_and_shift_tab_cycle() {
        let mut pilot = pilot_with_buttons();
        pilot.tab();
        pilot.process();
        assert_eq!(pilot.focused_name(), "first");
        pilot.tab();
        pilot.tab();
        pilot.process();
        assert_eq!(pilot.focused_name(), "first");
        pilot.shift_tab();
        pilot.process();
        assert_eq!(pilot.focused_name(), "second");
    }

    #[test]
    fn move_pointer_hovers() {
        let mut pilot = pilot_with_buttons();
        pilot.move_pointer(3.0, 3.0);
        pilot.process();
        assert_eq!(pilot.hovered_name().as_deref(), Some("first"));
    }

    #[test]
    fn type_text_sends_one_key_per_char() {
        let mut pilot = Pilot::new();
        pilot.type_text("abc");
        assert_eq!(pilot.process(), 3);
        pilot.type_text("");
        assert_eq!(pilot.process(), 0);
    }

    #[test]
    fn double_click_reaches_listener() {
        let mut pilot = pilot_with_buttons();
        let hits = std::rc::Rc::new(std::cell::Cell::new(0));
        let h = std::rc::Rc::clone(&hits);
        pilot
            .scene_mut()
            .on("first", EventType::MOUSE_DOUBLE_CLICK, move |_, _| h.set(h.get() + 1));
        pilot.double_click(5.0, 5.0);
        pilot.process();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn tick_updates_and_quit_stops() {
        let mut pilot = Pilot::new();
        pilot.quit();
        assert_eq!(pilot.tick(0.016), 1);
        assert!(!pilot.is_running());
    }

    #[test]
    fn click_now_and_press_key_now() {
        let mut pilot = pilot_with_buttons();
        pilot.click_now(5.0, 5.0);
        assert_eq!(pilot.focused_name(), "first");
        pilot.press_key_now(Key::Tab);
        assert_eq!(pilot.focused_name(), "second");
    }
}
