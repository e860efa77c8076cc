//! Event bus for controller notifications

use glyphdust_core::{CanvasSize, Generation};
use glyphdust_particles::AnimationKind;

/// Something the controller reports to its host
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationEvent {
    /// A new particle field went live
    Built {
        generation: Generation,
        size: CanvasSize,
        font_size: f32,
    },
    /// Rasterization failed; no field runs until a later rebuild succeeds
    RasterFailed {
        generation: Generation,
        message: String,
    },
    /// An animation run completed
    Ended {
        generation: Generation,
        kind: AnimationKind,
    },
}

/// A simple event queue that the controller pushes to and the host drains
pub struct EventBus {
    events: Vec<AnimationEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event onto the bus
    pub fn push(&mut self, event: AnimationEvent) {
        self.events.push(event);
    }

    /// Drain all events from the bus, returning them
    pub fn drain(&mut self) -> Vec<AnimationEvent> {
        std::mem::take(&mut self.events)
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.events.len()
    }
}
