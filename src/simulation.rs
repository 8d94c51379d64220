//! Frame-driven owner of the pointer and the particle field.

use crate::error::InvariantViolation;
use crate::field::ParticleField;
use crate::pointer::{PointerEvent, PointerState};
use crate::sprite::SpriteInstance;

/// One running image particle effect.
///
/// Input events are applied between ticks with [`handle_event`](Self::handle_event);
/// the scheduler calls [`tick`](Self::tick) exactly once per frame. Because
/// both need `&mut self`, an event can never land halfway through a pass.
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    pointer: PointerState,
    field: ParticleField,
    frame: u64,
}

impl Simulation {
    /// A simulation with no particles and an idle pointer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given field.
    pub fn with_field(mut self, field: ParticleField) -> Self {
        self.field = field;
        self
    }

    #[inline]
    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    #[inline]
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Sprites for the renderer, refreshed by the last tick.
    #[inline]
    pub fn sprites(&self) -> &[SpriteInstance] {
        self.field.sprites()
    }

    /// Number of ticks run so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Apply an input event. Its effect is first seen by the next tick.
    pub fn handle_event(&mut self, event: PointerEvent) {
        self.pointer.apply(event);
    }

    /// Swap in a freshly built field, returning the old one.
    ///
    /// The swap is all-or-nothing; pointer state carries over.
    pub fn replace_field(&mut self, field: ParticleField) -> ParticleField {
        log::debug!(
            "Replacing field of {} particles with {}",
            self.field.len(),
            field.len()
        );
        std::mem::replace(&mut self.field, field)
    }

    /// Run one frame: decay the influence radius, then advance every particle.
    pub fn tick(&mut self) -> Result<(), InvariantViolation> {
        self.pointer.decay();
        self.field.tick(&self.pointer);
        self.frame += 1;
        self.check_invariants()
    }

    /// Verify the state every tick must leave behind.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let radius = self.pointer.influence_radius();
        if radius < 0.0 {
            return Err(InvariantViolation::NegativeRadius(radius));
        }
        for (index, particle) in self.field.particles().iter().enumerate() {
            let value = particle.mouse_influence();
            if !(0.0..=1.0).contains(&value) {
                return Err(InvariantViolation::InfluenceOutOfRange { index, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldLayout;
    use crate::pixels::PixelBuffer;
    use crate::pointer::DEFAULT_INFLUENCE_RADIUS;

    fn small_field() -> ParticleField {
        let pixels = PixelBuffer::solid(30, 30, [255, 255, 255, 255]);
        ParticleField::build(&pixels, &FieldLayout::for_image(&pixels)).unwrap()
    }

    #[test]
    fn test_tick_decays_radius_once() {
        let mut sim = Simulation::new().with_field(small_field());
        for k in 1..=50u32 {
            sim.tick().unwrap();
            assert_eq!(
                sim.pointer().influence_radius(),
                (DEFAULT_INFLUENCE_RADIUS - 0.5 * k as f64).max(0.0)
            );
        }
        assert_eq!(sim.frame(), 50);
    }

    #[test]
    fn test_event_resets_radius_for_next_tick() {
        let mut sim = Simulation::new();
        for _ in 0..10 {
            sim.tick().unwrap();
        }
        sim.handle_event(PointerEvent::Move { x: 1.0, y: 2.0 });
        assert_eq!(sim.pointer().influence_radius(), DEFAULT_INFLUENCE_RADIUS);
        sim.tick().unwrap();
        assert_eq!(sim.pointer().influence_radius(), DEFAULT_INFLUENCE_RADIUS - 0.5);
    }

    #[test]
    fn test_replace_field_keeps_pointer() {
        let mut sim = Simulation::new().with_field(small_field());
        sim.handle_event(PointerEvent::Move { x: 15.0, y: 15.0 });
        sim.tick().unwrap();

        let old = sim.replace_field(ParticleField::empty());
        assert_eq!(old.len(), 100);
        assert!(sim.field().is_empty());
        assert!(sim.sprites().is_empty());
        assert!(sim.pointer().position().is_some());
        sim.tick().unwrap();
    }

    #[test]
    fn test_invariants_hold_under_interaction() {
        let mut sim = Simulation::new().with_field(small_field());
        for i in 0..300 {
            if i % 7 == 0 {
                let t = i as f64 * 0.1;
                sim.handle_event(PointerEvent::Move {
                    x: 15.0 + 10.0 * t.cos(),
                    y: 15.0 + 10.0 * t.sin(),
                });
            }
            sim.tick().unwrap();
        }
        for particle in sim.field().particles() {
            assert!(particle.position().is_finite());
            assert!(particle.velocity().is_finite());
        }
    }
}
