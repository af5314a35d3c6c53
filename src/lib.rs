// src/lib.rs
//! Vitrine Scene Animations
//!
//! A small engine for decorative 3D scene animations built on wgpu and winit.
//! Each effect owns its own camera, scene graph and renderer attachment and is
//! ticked by a single cooperative event loop until the host exits or tears it
//! down explicitly.

pub mod app;
pub mod effect;
pub mod error;
pub mod events;
pub mod geometry;
pub mod gfx;
pub mod prelude;
pub mod scene;
pub mod viewport;

// Re-export main types for convenience
pub use app::VitrineApp;
pub use error::VitrineError;

/// Creates a default Vitrine application instance
pub fn default() -> VitrineApp {
    VitrineApp::new()
}
