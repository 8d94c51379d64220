//! Pointer state shared by every particle during a tick.
//!
//! The input layer is the only writer: each [`PointerEvent::Move`] records
//! the pointer position and restores the full influence radius. The
//! scheduler shrinks the radius once per tick with [`PointerState::decay`],
//! so a pointer that stops moving gradually stops disturbing the field.

use glam::DVec2;

/// Influence radius restored on every pointer move.
pub const DEFAULT_INFLUENCE_RADIUS: f64 = 60.0;

/// Amount the influence radius shrinks per tick.
pub const RADIUS_DECAY: f64 = 0.5;

/// A normalized pointer input event, independent of the device that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// The pointer (mouse or touch) moved to `(x, y)` in particle space.
    Move { x: f64, y: f64 },
}

/// Current pointer position and the radius within which particles are repelled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    position: Option<DVec2>,
    influence_radius: f64,
}

impl PointerState {
    /// Pointer with no position yet and the default radius.
    pub fn new() -> Self {
        Self {
            position: None,
            influence_radius: DEFAULT_INFLUENCE_RADIUS,
        }
    }

    /// Last known pointer position, `None` before the first move.
    #[inline]
    pub fn position(&self) -> Option<DVec2> {
        self.position
    }

    /// Current influence radius.
    #[inline]
    pub fn influence_radius(&self) -> f64 {
        self.influence_radius
    }

    /// Record a pointer move and restore the full influence radius.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.position = Some(DVec2::new(x, y));
        self.influence_radius = DEFAULT_INFLUENCE_RADIUS;
    }

    /// Apply a normalized input event.
    pub fn apply(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Move { x, y } => self.on_pointer_move(x, y),
        }
    }

    /// Shrink the influence radius by one tick's worth, never below zero.
    pub fn decay(&mut self) {
        self.influence_radius = (self.influence_radius - RADIUS_DECAY).max(0.0);
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new()
    }
}
