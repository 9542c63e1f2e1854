//! Error types for resource, scene and render failures
//!
//! Lifecycle misuse is not represented here: it panics at the call site.

use thiserror::Error;

/// Resource cache errors
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("resource `{0}` already exists")]
    AlreadyExists(String),

    #[error("resource `{name}` is not a {expected}")]
    TypeMismatch { name: String, expected: &'static str },
}

/// Scene load errors
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),
}

/// GPU setup and frame errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no compatible GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("mesh `{0}` is not registered in the resource cache")]
    MissingMesh(String),
}
