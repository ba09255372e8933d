//! Label: a line of text.

use std::any::Any;

use crate::dom::node::NodeCore;
use crate::error::Result;
use crate::factory::NodeInit;
use crate::geometry::Region;
use crate::widget::traits::Behavior;

/// Nominal advance of one character, in scene units.
const CHAR_WIDTH: f32 = 8.0;
/// Nominal line height, in scene units.
const LINE_HEIGHT: f32 = 16.0;

/// A single line of text. Sizes itself from the text when built with a zero size.
#[derive(Debug)]
pub struct Label {
    text: String,
}

impl Label {
    /// Create a label.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Factory constructor. Text defaults to empty.
    pub fn construct(init: &NodeInit) -> Result<Box<dyn Behavior>> {
        Ok(Box::new(Self::new(init.text.clone().unwrap_or_default())))
    }

    /// The text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Behavior for Label {
    fn type_name(&self) -> &str {
        "Label"
    }

    fn on_init(&mut self, core: &mut NodeCore) {
        if core.geometry.width == 0.0 {
            core.geometry.width = self.text.chars().count() as f32 * CHAR_WIDTH;
        }
        if core.geometry.height == 0.0 {
            core.geometry.height = LINE_HEIGHT;
        }
    }

    fn on_render(&self, _bounds: Region) -> Option<String> {
        Some(format!("text {:?}", self.text))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
