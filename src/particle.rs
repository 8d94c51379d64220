//! A single image particle and its force model.
//!
//! Each tick a particle feels three things, in order:
//!
//! 1. **Pointer repulsion** - inside the pointer's influence radius it is
//!    pushed away and its spring is weakened; outside it the spring and the
//!    mouse influence recover.
//! 2. **Origin spring** - velocity is pulled toward the origin in proportion
//!    to the current `gravity`.
//! 3. **Damping** - velocity shrinks by 5% and is integrated into position.
//!
//! A particle that was just disturbed has a soft spring and a scaled-down
//! velocity, so it drifts for a while before easing back home.

use glam::DVec2;
use rand::Rng;

use crate::distance::approx_distance;
use crate::pointer::PointerState;
use crate::sprite::{Rgba, SpriteInstance};

/// Spring strength every particle starts with.
pub const INITIAL_GRAVITY: f64 = 0.01;
/// Range of the per-particle spring ceiling.
pub const MAX_GRAVITY_RANGE: std::ops::Range<f64> = 0.01..0.04;
/// Range of the per-particle repulsion impulse.
pub const REPULSION_RANGE: std::ops::Range<f64> = 1.0..5.0;
/// Range of each initial velocity component.
pub const INITIAL_SPEED_RANGE: std::ops::Range<f64> = 0.0..50.0;

/// Spring multiplier applied while disturbed.
pub const DISTURBED_GRAVITY_FACTOR: f64 = 0.6;
/// Mouse influence multiplier applied while disturbed.
pub const INFLUENCE_DECAY_FACTOR: f64 = 0.5;
/// Mouse influence subtracted (after the multiplier) while disturbed.
pub const INFLUENCE_DECAY_BIAS: f64 = 0.01;
/// Fraction of the gap to `max_gravity` recovered per relaxed tick.
pub const GRAVITY_EASING: f64 = 0.1;
/// Mouse influence regained per relaxed tick.
pub const INFLUENCE_RECOVERY: f64 = 0.03;
/// Velocity multiplier applied every tick.
pub const DAMPING: f64 = 0.95;

/// One simulated point of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    position: DVec2,
    origin: DVec2,
    velocity: DVec2,
    repulsion: f64,
    mouse_influence: f64,
    gravity: f64,
    max_gravity: f64,
    scale: f64,
    color: Rgba,
}

impl Particle {
    /// Create a particle resting at `origin`, seeded from the thread RNG.
    pub fn new(origin: DVec2, scale: f64, color: Rgba) -> Self {
        Self::with_rng(origin, scale, color, &mut rand::thread_rng())
    }

    /// Create a particle resting at `origin`, drawing its random constants from `rng`.
    ///
    /// The initial velocity, repulsion and spring ceiling are all random, so
    /// a freshly built field bursts outward before settling.
    pub fn with_rng<R: Rng + ?Sized>(origin: DVec2, scale: f64, color: Rgba, rng: &mut R) -> Self {
        let velocity = DVec2::new(
            rng.gen_range(INITIAL_SPEED_RANGE),
            rng.gen_range(INITIAL_SPEED_RANGE),
        );
        Self {
            position: origin,
            origin,
            velocity,
            repulsion: rng.gen_range(REPULSION_RANGE),
            mouse_influence: 1.0,
            gravity: INITIAL_GRAVITY,
            max_gravity: rng.gen_range(MAX_GRAVITY_RANGE),
            scale,
            color,
        }
    }

    /// Move the particle away from its origin.
    pub fn with_position(mut self, position: DVec2) -> Self {
        self.position = position;
        self
    }

    /// Replace the current velocity.
    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.velocity = velocity;
        self
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        self.position
    }

    #[inline]
    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    #[inline]
    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    #[inline]
    pub fn repulsion(&self) -> f64 {
        self.repulsion
    }

    /// How far the particle has recovered from pointer repulsion, in `[0, 1]`.
    #[inline]
    pub fn mouse_influence(&self) -> f64 {
        self.mouse_influence
    }

    #[inline]
    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    #[inline]
    pub fn max_gravity(&self) -> f64 {
        self.max_gravity
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[inline]
    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Render-facing view of this particle.
    #[inline]
    pub fn sprite(&self) -> SpriteInstance {
        SpriteInstance::new(self.position, self.scale, self.color)
    }

    /// Advance one frame.
    pub fn tick(&mut self, pointer: &PointerState) {
        self.apply_pointer(pointer);
        self.apply_origin_spring();

        self.velocity *= DAMPING;
        self.position += self.velocity;
    }

    fn apply_pointer(&mut self, pointer: &PointerState) {
        let Some(target) = pointer.position() else {
            return;
        };

        let delta = target - self.position;
        let distance = approx_distance(delta.x, delta.y);
        // pointer sitting on the particle: no preferred direction
        let direction = if distance == 0.0 {
            DVec2::ZERO
        } else {
            delta / distance
        };

        if distance < pointer.influence_radius() {
            let invert = 1.0 - self.mouse_influence;
            self.gravity *= DISTURBED_GRAVITY_FACTOR;
            self.mouse_influence =
                (self.mouse_influence * INFLUENCE_DECAY_FACTOR - INFLUENCE_DECAY_BIAS).max(0.0);
            self.velocity = (self.velocity - direction * self.repulsion) * invert;
        } else {
            self.gravity += (self.max_gravity - self.gravity) * GRAVITY_EASING;
            self.mouse_influence = (self.mouse_influence + INFLUENCE_RECOVERY).min(1.0);
        }
    }

    fn apply_origin_spring(&mut self) {
        self.velocity += (self.origin - self.position) * self.gravity;
    }
}
