//! # Image Particles
//!
//! Turns an image into a field of particles that scatter away from the
//! pointer and spring back to their place in the picture.
//!
//! The simulation is plain CPU code with no windowing dependency: build a
//! [`ParticleField`] from a [`PixelBuffer`], hand it to a [`Simulation`], feed
//! it pointer events and call [`Simulation::tick`] once per frame. The
//! [`window`] module wires that to a winit window and a wgpu sprite renderer.
//!
//! ## Quick Start
//!
//! ```
//! use image_particles::prelude::*;
//!
//! let pixels = PixelBuffer::solid(60, 60, [200, 40, 40, 255]);
//! let layout = FieldLayout::for_image(&pixels);
//! let field = ParticleField::build(&pixels, &layout).unwrap();
//!
//! let mut sim = Simulation::new().with_field(field);
//! sim.handle_event(PointerEvent::Move { x: 30.0, y: 30.0 });
//! sim.tick().unwrap();
//!
//! assert_eq!(sim.sprites().len(), 400);
//! ```
//!
//! ## Core Concepts
//!
//! ### Particles
//!
//! Every `step`-th opaque pixel becomes a [`Particle`] anchored at its
//! position in the scaled image. Each tick a particle is pushed away from
//! the pointer while it is inside the influence radius, pulled back towards
//! its origin, and damped.
//!
//! ### Pointer
//!
//! [`PointerState`] holds the last pointer position and an influence radius
//! that shrinks by half a pixel per tick and snaps back to 60 on every move,
//! so a resting pointer slowly stops disturbing the image.
//!
//! ### Loading
//!
//! [`ImageLoader`] decodes images and builds fields on a worker thread. The
//! finished field replaces the running one in a single swap.

pub mod distance;
pub mod error;
pub mod field;
mod gpu;
pub mod input;
pub mod loader;
pub mod particle;
pub mod pixels;
pub mod pointer;
pub mod settings;
pub mod simulation;
pub mod sprite;
pub mod time;
pub mod window;

pub use distance::approx_distance;
pub use error::{FieldError, ImageError, InvariantViolation, LoadError, SettingsError};
pub use field::{FieldLayout, ParticleField};
pub use glam::DVec2;
pub use loader::{ImageLoader, LoadedImage};
pub use particle::Particle;
pub use pixels::{ImageSource, PixelBuffer};
pub use pointer::{PointerEvent, PointerState};
pub use settings::Settings;
pub use simulation::Simulation;
pub use sprite::{Rgba, SpriteInstance};

/// Everything needed to build and drive a simulation.
pub mod prelude {
    pub use crate::distance::approx_distance;
    pub use crate::field::{FieldLayout, ParticleField};
    pub use crate::particle::Particle;
    pub use crate::pixels::{ImageSource, PixelBuffer};
    pub use crate::pointer::{PointerEvent, PointerState};
    pub use crate::settings::Settings;
    pub use crate::simulation::Simulation;
    pub use crate::sprite::SpriteInstance;
    pub use glam::DVec2;
}
