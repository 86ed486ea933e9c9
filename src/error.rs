//! Error types for the particle field.
//!
//! Rendering-context errors are produced while acquiring a surface and are
//! swallowed by [`ParticleField::initialize`](crate::ParticleField::initialize)
//! (the field degrades to a blank background). Configuration and event-loop
//! errors are returned to the caller.

use std::fmt;

/// Errors that can occur while setting up or driving a particle field.
#[derive(Debug)]
pub enum FieldError {
    /// The host has no drawing surface (e.g. a non-visual render pass).
    NoSurface,
    /// Failed to create a GPU surface for the window.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create the GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// The surface could not provide a frame to draw into.
    SurfaceLost(wgpu::SurfaceError),
    /// Failed to create the event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create the window.
    Window(winit::error::OsError),
    /// Failed to read a configuration file.
    Io(std::io::Error),
    /// Configuration file is not valid JSON for [`FieldConfig`](crate::FieldConfig).
    ConfigParse(serde_json::Error),
    /// Configuration values are out of range.
    InvalidConfig(String),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::NoSurface => write!(f, "No drawing surface available"),
            FieldError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            FieldError::NoAdapter => write!(f, "No compatible GPU adapter found"),
            FieldError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            FieldError::SurfaceLost(e) => write!(f, "Failed to acquire surface frame: {}", e),
            FieldError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            FieldError::Window(e) => write!(f, "Failed to create window: {}", e),
            FieldError::Io(e) => write!(f, "Failed to read configuration: {}", e),
            FieldError::ConfigParse(e) => write!(f, "Failed to parse configuration: {}", e),
            FieldError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FieldError::SurfaceCreation(e) => Some(e),
            FieldError::DeviceCreation(e) => Some(e),
            FieldError::SurfaceLost(e) => Some(e),
            FieldError::EventLoop(e) => Some(e),
            FieldError::Window(e) => Some(e),
            FieldError::Io(e) => Some(e),
            FieldError::ConfigParse(e) => Some(e),
            FieldError::NoSurface | FieldError::NoAdapter | FieldError::InvalidConfig(_) => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for FieldError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        FieldError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for FieldError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        FieldError::DeviceCreation(e)
    }
}

impl From<wgpu::SurfaceError> for FieldError {
    fn from(e: wgpu::SurfaceError) -> Self {
        FieldError::SurfaceLost(e)
    }
}

impl From<winit::error::EventLoopError> for FieldError {
    fn from(e: winit::error::EventLoopError) -> Self {
        FieldError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for FieldError {
    fn from(e: winit::error::OsError) -> Self {
        FieldError::Window(e)
    }
}

impl From<std::io::Error> for FieldError {
    fn from(e: std::io::Error) -> Self {
        FieldError::Io(e)
    }
}

impl From<serde_json::Error> for FieldError {
    fn from(e: serde_json::Error) -> Self {
        FieldError::ConfigParse(e)
    }
}
