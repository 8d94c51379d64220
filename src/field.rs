//! The particle field: one particle per sampled, non-transparent pixel.
//!
//! A field is built once per image and replaced wholesale when the image
//! changes. Building walks the source on a regular grid (every `step`
//! pixels on both axes, row by row), skips transparent samples, and maps
//! each kept grid point into the padded target area.
//!
//! ```ignore
//! let pixels = PixelBuffer::open("logo.png")?;
//! let layout = FieldLayout::for_image(&pixels).with_step(4);
//! let mut field = ParticleField::build(&pixels, &layout)?;
//!
//! // once per frame
//! pointer.decay();
//! field.tick(&pointer);
//! renderer.draw(field.sprites());
//! ```
//!
//! Particles never read each other, so large fields tick in parallel with
//! rayon. Every worker sees the same `&PointerState` for the whole pass.

use glam::DVec2;
use rand::Rng;
use rayon::prelude::*;

use crate::error::FieldError;
use crate::particle::Particle;
use crate::pixels::PixelBuffer;
use crate::pointer::PointerState;
use crate::sprite::SpriteInstance;

/// Default sampling stride in source pixels.
pub const DEFAULT_STEP: u32 = 3;

/// Default margin kept clear around the image in the target area.
pub const DEFAULT_PADDING: u32 = 10;

/// Particle count from which a tick is spread across the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 32_768;

/// How source pixels map onto the output area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    /// Output area size `(width, height)`.
    pub target: (u32, u32),
    /// Sampling stride in source pixels.
    pub step: u32,
    /// Margin on every side of the output area.
    pub padding: u32,
}

impl FieldLayout {
    /// Layout for an output area of the given size with default step and padding.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: (width, height),
            step: DEFAULT_STEP,
            padding: DEFAULT_PADDING,
        }
    }

    /// Layout whose output area matches the image's own pixel size.
    pub fn for_image(pixels: &PixelBuffer) -> Self {
        Self::new(pixels.width(), pixels.height())
    }

    pub fn with_step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }

    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_target(mut self, width: u32, height: u32) -> Self {
        self.target = (width, height);
        self
    }

    /// Check that particles can be laid out at all.
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.step == 0 {
            return Err(FieldError::ZeroStep);
        }
        let (width, height) = self.drawable_size();
        if width <= 0.0 || height <= 0.0 {
            return Err(FieldError::NoDrawableArea {
                target: self.target,
                padding: self.padding,
            });
        }
        Ok(())
    }

    /// Output area left after padding.
    fn drawable_size(&self) -> (f64, f64) {
        let padding = self.padding as f64 * 2.0;
        (
            self.target.0 as f64 - padding,
            self.target.1 as f64 - padding,
        )
    }

    /// Uniform scale that fits an `image_width` x `image_height` image into the padded area.
    pub fn image_scale(&self, image_width: u32, image_height: u32) -> f64 {
        let (width, height) = self.drawable_size();
        (width / image_width as f64).min(height / image_height as f64)
    }

    /// Offset that centers the image along the longer output axis.
    pub fn offset(&self) -> DVec2 {
        let (width, height) = (self.target.0 as f64, self.target.1 as f64);
        let short = width.min(height);
        DVec2::new((width - short) / 2.0, (height - short) / 2.0)
    }

    /// Resting position for the source pixel at `pixel`.
    pub fn origin_for(&self, pixel: DVec2, image_scale: f64) -> DVec2 {
        pixel * image_scale + self.offset() + DVec2::splat(self.padding as f64)
    }
}

/// The full particle population for one image.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    sprites: Vec<SpriteInstance>,
    parallel_threshold: usize,
}

impl ParticleField {
    /// A field with no particles.
    pub fn empty() -> Self {
        Self {
            particles: Vec::new(),
            sprites: Vec::new(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Sample `pixels` and create one particle per opaque grid point.
    pub fn build(pixels: &PixelBuffer, layout: &FieldLayout) -> Result<Self, FieldError> {
        Self::build_with_rng(pixels, layout, &mut rand::thread_rng())
    }

    /// Like [`build`](Self::build), drawing particle constants from `rng`.
    pub fn build_with_rng<R: Rng + ?Sized>(
        pixels: &PixelBuffer,
        layout: &FieldLayout,
        rng: &mut R,
    ) -> Result<Self, FieldError> {
        layout.validate()?;

        let (width, height) = (pixels.width(), pixels.height());
        if width == 0 || height == 0 {
            log::warn!("Source image is empty, building an empty particle field");
            return Ok(Self::empty());
        }

        let image_scale = layout.image_scale(width, height);
        let columns = width / layout.step;
        let rows = height / layout.step;
        log::debug!(
            "Sampling {}x{} grid (step {}) at scale {:.4}, offset {:?}",
            columns,
            rows,
            layout.step,
            image_scale,
            layout.offset()
        );

        let mut particles = Vec::with_capacity(columns as usize * rows as usize);
        for gy in 0..rows {
            for gx in 0..columns {
                let x = gx * layout.step;
                let y = gy * layout.step;
                let color = pixels.sample(x as i64, y as i64);

                // transparent pixels produce no particle
                if color[3] == 0 {
                    continue;
                }

                let origin = layout.origin_for(DVec2::new(x as f64, y as f64), image_scale);
                particles.push(Particle::with_rng(origin, image_scale, color, rng));
            }
        }

        log::info!(
            "Built {} particles from {}x{} image",
            particles.len(),
            width,
            height
        );

        Ok(Self::from_particles(particles))
    }

    /// Wrap an existing particle collection.
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        let sprites = particles.iter().map(Particle::sprite).collect();
        Self {
            particles,
            sprites,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Set the particle count from which ticks run in parallel.
    ///
    /// `0` always runs in parallel, `usize::MAX` never does.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Render projection; index `i` always belongs to particle `i`.
    #[inline]
    pub fn sprites(&self) -> &[SpriteInstance] {
        &self.sprites
    }

    #[inline]
    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Advance every particle by one frame and refresh the sprites.
    pub fn tick(&mut self, pointer: &PointerState) {
        if self.particles.len() >= self.parallel_threshold {
            self.particles
                .par_iter_mut()
                .zip(self.sprites.par_iter_mut())
                .for_each(|(particle, sprite)| {
                    particle.tick(pointer);
                    *sprite = particle.sprite();
                });
        } else {
            for (particle, sprite) in self.particles.iter_mut().zip(self.sprites.iter_mut()) {
                particle.tick(pointer);
                *sprite = particle.sprite();
            }
        }
    }
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::TRANSPARENT;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const OPAQUE: [u8; 4] = [200, 100, 50, 255];

    fn build_seeded(pixels: &PixelBuffer, layout: &FieldLayout) -> ParticleField {
        let mut rng = StdRng::seed_from_u64(42);
        ParticleField::build_with_rng(pixels, layout, &mut rng).unwrap()
    }

    #[test]
    fn test_opaque_image_count() {
        for &(w, h) in &[(30u32, 30u32), (31, 29), (10, 7), (3, 3), (2, 9)] {
            let pixels = PixelBuffer::solid(w, h, OPAQUE);
            let field = build_seeded(&pixels, &FieldLayout::new(200, 200));
            assert_eq!(field.len(), ((w / 3) * (h / 3)) as usize, "{}x{}", w, h);
        }
    }

    #[test]
    fn test_transparent_origin_pixel_skipped() {
        let pixels = PixelBuffer::from_fn(9, 9, |x, y| if x == 0 && y == 0 { TRANSPARENT } else { OPAQUE });
        let layout = FieldLayout::new(9 + 20, 9 + 20).with_padding(10);
        let field = build_seeded(&pixels, &layout);

        assert_eq!(field.len(), 8);
        let corner = layout.origin_for(DVec2::ZERO, layout.image_scale(9, 9));
        assert!(field.particles().iter().all(|p| p.origin() != corner));
    }

    #[test]
    fn test_only_grid_samples_matter() {
        // transparent everywhere except the grid points
        let pixels = PixelBuffer::from_fn(12, 6, |x, y| {
            if x % 3 == 0 && y % 3 == 0 {
                OPAQUE
            } else {
                TRANSPARENT
            }
        });
        let field = build_seeded(&pixels, &FieldLayout::new(100, 100));
        assert_eq!(field.len(), 4 * 2);
    }

    #[test]
    fn test_origin_mapping_square() {
        let pixels = PixelBuffer::solid(30, 30, OPAQUE);
        let layout = FieldLayout::new(30, 30);
        let field = build_seeded(&pixels, &layout);

        // scale = (30 - 20) / 30, no offset for a square target
        let scale = 10.0 / 30.0;
        // raster order: second row, first column is grid index 10
        let p = &field.particles()[10];
        let expected = DVec2::new(10.0, 3.0 * scale + 10.0);
        assert!((p.origin() - expected).length() < 1e-9);
        assert!((p.scale() - scale).abs() < 1e-12);
        assert_eq!(p.color(), OPAQUE);
    }

    #[test]
    fn test_origin_mapping_wide_target() {
        let pixels = PixelBuffer::solid(6, 6, OPAQUE);
        let layout = FieldLayout::new(100, 50).with_padding(5).with_step(3);
        let field = build_seeded(&pixels, &layout);

        // scale = min(90 / 6, 40 / 6), offset = ((100 - 50) / 2, 0)
        let scale = 40.0 / 6.0;
        assert_eq!(layout.offset(), DVec2::new(25.0, 0.0));
        let last = field.particles().last().unwrap();
        let expected = DVec2::new(3.0 * scale + 25.0 + 5.0, 3.0 * scale + 5.0);
        assert!((last.origin() - expected).length() < 1e-9);
    }

    #[test]
    fn test_layout_errors() {
        let pixels = PixelBuffer::solid(9, 9, OPAQUE);
        assert_eq!(
            ParticleField::build(&pixels, &FieldLayout::new(50, 50).with_step(0)).unwrap_err(),
            FieldError::ZeroStep
        );
        assert_eq!(
            ParticleField::build(&pixels, &FieldLayout::new(20, 50)).unwrap_err(),
            FieldError::NoDrawableArea {
                target: (20, 50),
                padding: 10
            }
        );
    }

    #[test]
    fn test_empty_image_gives_empty_field() {
        let pixels = PixelBuffer::solid(0, 0, OPAQUE);
        let field = ParticleField::build(&pixels, &FieldLayout::new(40, 40)).unwrap();
        assert!(field.is_empty());
        assert!(field.sprites().is_empty());
    }

    #[test]
    fn test_sprites_follow_particles() {
        let pixels = PixelBuffer::solid(12, 12, OPAQUE);
        let mut field = build_seeded(&pixels, &FieldLayout::for_image(&pixels).with_padding(1));
        assert_eq!(field.sprites().len(), field.len());

        let mut pointer = PointerState::new();
        pointer.on_pointer_move(5.0, 5.0);
        field.tick(&pointer);

        for (particle, sprite) in field.particles().iter().zip(field.sprites()) {
            assert_eq!(*sprite, particle.sprite());
        }
    }

    #[test]
    fn test_parallel_matches_serial() {
        let pixels = PixelBuffer::solid(60, 45, OPAQUE);
        let layout = FieldLayout::for_image(&pixels);
        let mut serial = build_seeded(&pixels, &layout).with_parallel_threshold(usize::MAX);
        let mut parallel = build_seeded(&pixels, &layout).with_parallel_threshold(0);

        let mut pointer = PointerState::new();
        pointer.on_pointer_move(30.0, 20.0);
        for _ in 0..30 {
            pointer.decay();
            serial.tick(&pointer);
            parallel.tick(&pointer);
        }

        assert_eq!(serial.particles(), parallel.particles());
        assert_eq!(serial.sprites(), parallel.sprites());
    }
}
