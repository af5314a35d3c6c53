//! Error types for GPU bring-up
//!
//! Everything else in the crate is silent by contract: resolving an unknown
//! viewport is a no-op and per-frame work never fails. Only acquiring the
//! adapter, device and surface can go wrong in a way worth reporting.

use thiserror::Error;

/// Errors raised while constructing the rendering backend
#[derive(Debug, Error)]
pub enum VitrineError {
    /// No GPU adapter was compatible with the window surface
    #[error("no suitable GPU adapter found")]
    AdapterRequest,

    /// The adapter refused to hand out a device
    #[error("failed to acquire GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    /// The window could not back a rendering surface
    #[error("failed to create rendering surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
}
