//! Error types for image particles.
//!
//! This module provides error types for image loading, field layout,
//! per-tick invariant checks, and the windowed renderer.

use std::fmt;

/// Errors that can occur while loading source pixels.
#[derive(Debug)]
pub enum ImageError {
    /// The image data could not be decoded.
    Decode(image::ImageError),
    /// Failed to read the image from disk.
    Io(std::io::Error),
    /// A raw RGBA buffer did not match its stated dimensions.
    BufferSize { expected: usize, actual: usize },
    /// The image reference points somewhere we cannot fetch from.
    UnsupportedSource(String),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Decode(e) => write!(f, "Failed to decode image: {}", e),
            ImageError::Io(e) => write!(f, "Failed to read image file: {}", e),
            ImageError::BufferSize { expected, actual } => write!(
                f,
                "RGBA buffer size mismatch: expected {} bytes, got {}",
                expected, actual
            ),
            ImageError::UnsupportedSource(src) => {
                write!(f, "Unsupported image source '{}': only local files and in-memory bytes can be loaded", src)
            }
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImageError::Decode(e) => Some(e),
            ImageError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for ImageError {
    fn from(e: image::ImageError) -> Self {
        ImageError::Decode(e)
    }
}

impl From<std::io::Error> for ImageError {
    fn from(e: std::io::Error) -> Self {
        ImageError::Io(e)
    }
}

/// Errors that can occur when laying out a particle field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// The sampling stride was zero.
    ZeroStep,
    /// Padding leaves no room to draw the image in the target area.
    NoDrawableArea { target: (u32, u32), padding: u32 },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::ZeroStep => write!(f, "Particle step must be at least 1 pixel"),
            FieldError::NoDrawableArea { target, padding } => write!(
                f,
                "Padding of {}px leaves no drawable area in a {}x{} target",
                padding, target.0, target.1
            ),
        }
    }
}

impl std::error::Error for FieldError {}

/// Internal-logic errors detected after a simulation tick.
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    /// The pointer influence radius went below zero.
    NegativeRadius(f64),
    /// A particle's mouse influence left the unit interval.
    InfluenceOutOfRange { index: usize, value: f64 },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::NegativeRadius(r) => {
                write!(f, "Influence radius is negative after tick: {}", r)
            }
            InvariantViolation::InfluenceOutOfRange { index, value } => write!(
                f,
                "Particle {} has mouse influence {} outside [0, 1]",
                index, value
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when running the windowed viewer.
#[derive(Debug)]
pub enum AppError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// The settings file could not be read or parsed.
    Settings(SettingsError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            AppError::Window(e) => write!(f, "Failed to create window: {}", e),
            AppError::Gpu(e) => write!(f, "GPU error: {}", e),
            AppError::Settings(e) => write!(f, "Settings error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::EventLoop(e) => Some(e),
            AppError::Window(e) => Some(e),
            AppError::Gpu(e) => Some(e),
            AppError::Settings(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for AppError {
    fn from(e: winit::error::EventLoopError) -> Self {
        AppError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for AppError {
    fn from(e: winit::error::OsError) -> Self {
        AppError::Window(e)
    }
}

impl From<GpuError> for AppError {
    fn from(e: GpuError) -> Self {
        AppError::Gpu(e)
    }
}

impl From<SettingsError> for AppError {
    fn from(e: SettingsError) -> Self {
        AppError::Settings(e)
    }
}

/// Errors that can occur while loading [`Settings`](crate::settings::Settings).
#[derive(Debug)]
pub enum SettingsError {
    /// Failed to read the settings file.
    Io(std::io::Error),
    /// The file was not valid settings JSON.
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "Failed to read settings file: {}", e),
            SettingsError::Parse(e) => write!(f, "Failed to parse settings: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

/// Errors that can occur while turning an image reference into a field.
#[derive(Debug)]
pub enum LoadError {
    /// The image could not be read or decoded.
    Image(ImageError),
    /// The decoded image could not be laid out.
    Field(FieldError),
    /// The loading thread panicked before producing a field.
    WorkerPanicked,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Image(e) => write!(f, "{}", e),
            LoadError::Field(e) => write!(f, "{}", e),
            LoadError::WorkerPanicked => write!(f, "Image loading thread panicked"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Image(e) => Some(e),
            LoadError::Field(e) => Some(e),
            LoadError::WorkerPanicked => None,
        }
    }
}

impl From<ImageError> for LoadError {
    fn from(e: ImageError) -> Self {
        LoadError::Image(e)
    }
}

impl From<FieldError> for LoadError {
    fn from(e: FieldError) -> Self {
        LoadError::Field(e)
    }
}
