//! Render-facing projection of the particle field.
//!
//! Physics state lives in [`Particle`](crate::Particle); renderers only ever
//! see [`SpriteInstance`]s, one per particle, refreshed after every tick.
//! The layout is `#[repr(C)]` and [`Pod`] so a slice of sprites can be
//! uploaded to a GPU vertex buffer as-is.

use bytemuck::{Pod, Zeroable};

/// An RGBA color with 8 bits per channel, as sampled from the source image.
pub type Rgba = [u8; 4];

/// Fully transparent black, returned for samples outside the image.
pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

/// One square sprite: where to draw it, how big, and what tint.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Top-left corner in particle space.
    pub position: [f32; 2],
    /// Uniform scale applied to the base sprite size.
    pub scale: f32,
    /// Normalized RGBA tint (0.0-1.0).
    pub color: [f32; 4],
}

impl SpriteInstance {
    pub(crate) fn new(position: glam::DVec2, scale: f64, color: Rgba) -> Self {
        Self {
            position: [position.x as f32, position.y as f32],
            scale: scale as f32,
            color: normalize_color(color),
        }
    }
}

/// Convert an 8-bit color to normalized floats.
pub fn normalize_color(color: Rgba) -> [f32; 4] {
    [
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
        color[3] as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    #[test]
    fn test_sprite_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 28);
    }

    #[test]
    fn test_sprite_from_particle_data() {
        let sprite = SpriteInstance::new(DVec2::new(10.5, -2.0), 0.75, [255, 0, 51, 255]);
        assert_eq!(sprite.position, [10.5, -2.0]);
        assert_eq!(sprite.scale, 0.75);
        assert_eq!(sprite.color[0], 1.0);
        assert_eq!(sprite.color[1], 0.0);
        assert!((sprite.color[2] - 0.2).abs() < 1e-6);
        assert_eq!(sprite.color[3], 1.0);
    }

    #[test]
    fn test_normalize_color_is_a_plain_rescale() {
        // no gamma curve: the surface is not sRGB, so bytes map straight to 0.0-1.0
        let color = normalize_color([22, 32, 58, 128]);
        let expected = [0.086_274_51, 0.125_490_2, 0.227_450_98, 0.501_960_8];
        for (got, want) in color.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "{} != {}", got, want);
        }
    }
}
