//! Group: an invisible container.

use std::any::Any;

use crate::error::Result;
use crate::factory::NodeInit;
use crate::widget::traits::Behavior;

/// Container with no drawing of its own.
#[derive(Debug, Default)]
pub struct Group;

impl Group {
    /// Create a group behaviour.
    pub fn new() -> Self {
        Self
    }

    /// Factory constructor.
    pub fn construct(_init: &NodeInit) -> Result<Box<dyn Behavior>> {
        Ok(Box::new(Self))
    }
}

impl Behavior for Group {
    fn type_name(&self) -> &str {
        "Group"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
