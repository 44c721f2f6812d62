//! BodyView Render - GPU primitives for the skeleton overlay
//!
//! This crate provides:
//! - wgpu backend (adapter selection, device, surface creation)
//! - Circle and line primitives in screen space
//! - A shape renderer that replays a recorded draw list

use thiserror::Error;

pub mod backend;
pub mod pipeline;
pub mod primitives;
pub mod shape_renderer;

pub use backend::WgpuBackend;
pub use pipeline::{Allocation, UniformBufferAllocator};
pub use primitives::{ortho_projection, CircleGeometry, CircleStencil, LineSprite};
pub use shape_renderer::ShapeRenderer;

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Device error: {0}")]
    DeviceError(String),

    #[error("Surface error: {0}")]
    SurfaceError(String),
}

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, RenderError>;

/// Re-export commonly used wgpu types
pub use wgpu::{Device, Queue, Surface, SurfaceConfiguration, TextureFormat};
