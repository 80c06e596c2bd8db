//! Error types for galaxy-field.
//!
//! Parameter validation is the only failure the generator and the
//! regeneration manager can produce. The remaining types cover the
//! configuration file, PNG previews and the GPU viewer.

use std::fmt;

/// Which of the two gradient endpoints a color error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRole {
    Inside,
    Outside,
}

impl fmt::Display for ColorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorRole::Inside => write!(f, "inside"),
            ColorRole::Outside => write!(f, "outside"),
        }
    }
}

/// A structural precondition of a [`ParameterSet`](crate::ParameterSet) was violated.
///
/// Raised synchronously by [`generate`](crate::generate) and returned unchanged by
/// [`FieldManager::regenerate`](crate::FieldManager::regenerate), which keeps the
/// previous field live when it sees one.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidParameterError {
    /// `count` was zero.
    ZeroCount,
    /// `radius` was zero, negative, or not finite.
    NonPositiveRadius(f32),
    /// `branches` was zero.
    ZeroBranches,
    /// A color channel was outside `0.0..=1.0` (or NaN).
    ColorOutOfRange {
        which: ColorRole,
        channel: char,
        value: f32,
    },
}

impl fmt::Display for InvalidParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidParameterError::ZeroCount => write!(f, "count must be at least 1"),
            InvalidParameterError::NonPositiveRadius(r) => {
                write!(f, "radius must be a finite value greater than 0 (got {})", r)
            }
            InvalidParameterError::ZeroBranches => write!(f, "branches must be at least 1"),
            InvalidParameterError::ColorOutOfRange { which, channel, value } => write!(
                f,
                "{} color channel '{}' must be within 0.0..=1.0 (got {})",
                which, channel, value
            ),
        }
    }
}

impl std::error::Error for InvalidParameterError {}

/// Errors that can occur while loading or saving a viewer configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or write the file.
    Io(std::io::Error),
    /// The file was not valid configuration JSON.
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to access config file: {}", e),
            ConfigError::Json(e) => write!(f, "Invalid config JSON: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// Errors that can occur while writing a preview image.
#[derive(Debug)]
pub enum PreviewError {
    /// Requested canvas had a zero dimension.
    EmptyCanvas,
    /// Failed to encode or write the image.
    Image(image::ImageError),
}

impl fmt::Display for PreviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviewError::EmptyCanvas => write!(f, "Preview width and height must be non-zero"),
            PreviewError::Image(e) => write!(f, "Failed to write preview image: {}", e),
        }
    }
}

impl std::error::Error for PreviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PreviewError::Image(e) => Some(e),
            PreviewError::EmptyCanvas => None,
        }
    }
}

impl From<image::ImageError> for PreviewError {
    fn from(e: image::ImageError) -> Self {
        PreviewError::Image(e)
    }
}

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

/// Errors that can occur when running the interactive viewer.
#[derive(Debug)]
pub enum ViewerError {
    /// Failed to create or run the event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// The initial parameters were rejected.
    Parameters(InvalidParameterError),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            ViewerError::Window(e) => write!(f, "Failed to create window: {}", e),
            ViewerError::Gpu(e) => write!(f, "GPU error: {}", e),
            ViewerError::Parameters(e) => write!(f, "Invalid initial parameters: {}", e),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::EventLoop(e) => Some(e),
            ViewerError::Window(e) => Some(e),
            ViewerError::Gpu(e) => Some(e),
            ViewerError::Parameters(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for ViewerError {
    fn from(e: winit::error::EventLoopError) -> Self {
        ViewerError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for ViewerError {
    fn from(e: winit::error::OsError) -> Self {
        ViewerError::Window(e)
    }
}

impl From<GpuError> for ViewerError {
    fn from(e: GpuError) -> Self {
        ViewerError::Gpu(e)
    }
}

impl From<InvalidParameterError> for ViewerError {
    fn from(e: InvalidParameterError) -> Self {
        ViewerError::Parameters(e)
    }
}
