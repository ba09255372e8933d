//! Panel: a filled box, registered under the `Box` type tag.

use std::any::Any;

use crate::error::Result;
use crate::event::record::Event;
use crate::event::types::EventType;
use crate::factory::NodeInit;
use crate::geometry::Region;
use crate::widget::traits::Behavior;

/// A filled rectangle. Counts the clicks it receives as a target.
#[derive(Debug)]
pub struct Panel {
    color: String,
    clicks: u32,
}

impl Panel {
    /// Create a panel with the given fill color.
    pub fn new(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            clicks: 0,
        }
    }

    /// Factory constructor. Color defaults to `"white"`.
    pub fn construct(init: &NodeInit) -> Result<Box<dyn Behavior>> {
        Ok(Box::new(Self::new(init.color.as_deref().unwrap_or("white"))))
    }

    /// The fill color.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Replace the fill color.
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    /// Clicks delivered with this panel as target.
    pub fn clicks(&self) -> u32 {
        self.clicks
    }
}

impl Behavior for Panel {
    fn type_name(&self) -> &str {
        "Box"
    }

    fn on_event(&mut self, event: &Event) {
        if event.event_type() == EventType::MOUSE_CLICK {
            self.clicks += 1;
        }
    }

    fn on_render(&self, bounds: Region) -> Option<String> {
        Some(format!(
            "fill {} {}x{}",
            self.color, bounds.width, bounds.height
        ))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_clicks_only() {
        let mut panel = Panel::new("red");
        panel.on_event(&Event::new(EventType::MOUSE_CLICK));
        panel.on_event(&Event::new(EventType::MOUSE_MOVE));
        assert_eq!(panel.clicks(), 1);
    }

    #[test]
    fn renders_fill() {
        let panel = Panel::new("blue");
        assert_eq!(
            panel.on_render(Region::new(0.0, 0.0, 10.0, 4.0)).as_deref(),
            Some("fill blue 10x4")
        );
    }

    #[test]
    fn construct_defaults_color() {
        let behavior = Panel::construct(&NodeInit::named("p")).unwrap();
        let panel = behavior.as_any().downcast_ref::<Panel>().unwrap();
        assert_eq!(panel.color(), "white");
    }
}
