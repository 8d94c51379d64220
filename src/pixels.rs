//! Source pixels for particle fields.
//!
//! A [`PixelBuffer`] is a plain RGBA8 image held in memory. It can be
//! decoded from a file or from bytes, or built procedurally. Sampling
//! outside the image is not an error: it yields [`TRANSPARENT`], which the
//! field builder treats as "no particle here".
//!
//! # Supported Formats
//!
//! - PNG (recommended)
//! - JPEG

use std::path::{Path, PathBuf};

use crate::error::ImageError;
use crate::sprite::{Rgba, TRANSPARENT};

/// Where an image comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// A file on the local filesystem.
    Path(PathBuf),
    /// Encoded image bytes already in memory.
    Bytes(Vec<u8>),
    /// A remote URL. Recognised so it can be rejected with a clear error.
    Url(String),
}

impl ImageSource {
    /// Interpret a user-supplied image reference.
    ///
    /// Anything with an `http://` or `https://` scheme is a [`ImageSource::Url`],
    /// everything else is treated as a path.
    pub fn parse(reference: &str) -> Self {
        let lower = reference.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            ImageSource::Url(reference.to_string())
        } else {
            ImageSource::Path(PathBuf::from(reference))
        }
    }

    /// Short human-readable description for logs.
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
            ImageSource::Url(url) => url.clone(),
        }
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        ImageSource::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

/// An RGBA8 image in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Wrap raw RGBA data (4 bytes per pixel, row-major).
    ///
    /// # Example
    ///
    /// ```
    /// use image_particles::PixelBuffer;
    ///
    /// // 2x1: one opaque red pixel, one transparent pixel
    /// let pixels = PixelBuffer::from_rgba(vec![255, 0, 0, 255, 0, 0, 0, 0], 2, 1).unwrap();
    /// assert_eq!(pixels.sample(0, 0), [255, 0, 0, 255]);
    /// assert_eq!(pixels.sample(1, 0), [0, 0, 0, 0]);
    /// ```
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self, ImageError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(ImageError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> Rgba,
    {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// A single-color image.
    pub fn solid(width: u32, height: u32, color: Rgba) -> Self {
        Self::from_fn(width, height, |_, _| color)
    }

    /// Decode an encoded image (PNG or JPEG) from memory.
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageError> {
        let img = image::load_from_memory(bytes)?.into_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            data: img.into_raw(),
            width,
            height,
        })
    }

    /// Read and decode an image file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::decode(&bytes)
    }

    /// Load pixels from any supported [`ImageSource`].
    pub fn load(source: &ImageSource) -> Result<Self, ImageError> {
        match source {
            ImageSource::Path(path) => Self::open(path),
            ImageSource::Bytes(bytes) => Self::decode(bytes),
            ImageSource::Url(url) => Err(ImageError::UnsupportedSource(url.clone())),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Color at `(x, y)`, or transparent black outside the image.
    pub fn sample(&self, x: i64, y: i64) -> Rgba {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return TRANSPARENT;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_checks_length() {
        let err = PixelBuffer::from_rgba(vec![0; 15], 2, 2).unwrap_err();
        match err {
            ImageError::BufferSize { expected, actual } => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 15);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_sample_row_major() {
        let pixels = PixelBuffer::from_fn(3, 2, |x, y| [x as u8, y as u8, 7, 255]);
        assert_eq!(pixels.sample(0, 0), [0, 0, 7, 255]);
        assert_eq!(pixels.sample(2, 0), [2, 0, 7, 255]);
        assert_eq!(pixels.sample(1, 1), [1, 1, 7, 255]);
        assert_eq!(pixels.data().len(), 3 * 2 * 4);
    }

    #[test]
    fn test_sample_out_of_bounds_is_transparent() {
        let pixels = PixelBuffer::solid(4, 3, [9, 9, 9, 255]);
        assert_eq!(pixels.sample(3, 2), [9, 9, 9, 255]);
        // one past the last valid index on each axis
        assert_eq!(pixels.sample(4, 0), TRANSPARENT);
        assert_eq!(pixels.sample(0, 3), TRANSPARENT);
        assert_eq!(pixels.sample(-1, 0), TRANSPARENT);
        assert_eq!(pixels.sample(0, -1), TRANSPARENT);
    }

    #[test]
    fn test_decode_png_roundtrip() {
        let mut img = image::RgbaImage::new(2, 2);
        img.put_pixel(1, 0, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let pixels = PixelBuffer::decode(&bytes).unwrap();
        assert_eq!((pixels.width(), pixels.height()), (2, 2));
        assert_eq!(pixels.sample(1, 0), [10, 20, 30, 255]);
        assert_eq!(pixels.sample(0, 0), TRANSPARENT);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = PixelBuffer::decode(b"definitely not a png").unwrap_err();
        assert!(matches!(err, ImageError::Decode(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PixelBuffer::open("/nonexistent/nowhere.png").unwrap_err();
        assert!(matches!(err, ImageError::Io(_)));
    }

    #[test]
    fn test_parse_source() {
        assert_eq!(
            ImageSource::parse("https://example.com/logo.png"),
            ImageSource::Url("https://example.com/logo.png".into())
        );
        assert_eq!(
            ImageSource::parse("assets/logo.png"),
            ImageSource::Path(PathBuf::from("assets/logo.png"))
        );
        let err = PixelBuffer::load(&ImageSource::parse("HTTP://example.com/a.png")).unwrap_err();
        assert!(matches!(err, ImageError::UnsupportedSource(_)));
    }
}
