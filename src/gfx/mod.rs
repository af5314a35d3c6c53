//! WGPU rendering backend
//!
//! One [`StageRenderer`] serves the whole window; every effect instance draws
//! through its own camera uniform and viewport rectangle, so no drawable is
//! ever rendered by another instance's camera.

pub mod renderer;
pub mod vertex;

pub use renderer::StageRenderer;
pub use vertex::LineVertex;
