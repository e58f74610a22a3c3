use thiserror::Error;

/// Errors surfaced by renderer construction, resize, and frame updates.
///
/// Steady-state rendering has no recoverable errors: a failed frame is
/// dropped and the next `update` submits fresh.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("failed to acquire surface frame: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("render target allocation failed: {0}")]
    Allocation(String),
}
