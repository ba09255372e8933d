//! Stage: the root kind of a scene.

use std::any::Any;

use crate::dom::node::NodeCore;
use crate::error::Result;
use crate::factory::NodeInit;
use crate::widget::traits::Behavior;

/// Root of a scene. Clickable so clicks on empty space return focus to it.
#[derive(Debug, Default)]
pub struct Stage {
    clock: f32,
    frames: u64,
}

impl Stage {
    /// Create a stage behaviour.
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory constructor.
    pub fn construct(_init: &NodeInit) -> Result<Box<dyn Behavior>> {
        Ok(Box::new(Self::new()))
    }

    /// Seconds accumulated over all frames.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Number of frames this stage has been updated for.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Behavior for Stage {
    fn type_name(&self) -> &str {
        "Stage"
    }

    fn on_init(&mut self, core: &mut NodeCore) {
        core.clickable = true;
    }

    fn on_update(&mut self, elapsed: f32) {
        self.clock += elapsed;
        self.frames += 1;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
