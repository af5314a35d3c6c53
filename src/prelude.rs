//! # Vitrine Prelude
//!
//! Brings the commonly used types into scope for typical hosts:
//!
//! ```no_run
//! use vitrine::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut app = vitrine::default();
//!     app.register_viewport(Viewport::new("hero", 1200, 800));
//!     app.create_effect("hero", EffectKind::WireframeSphere(SphereOptions::default()));
//!     app.run()
//! }
//! ```

// Re-export core application types
pub use crate::app::VitrineApp;
pub use crate::default;
pub use crate::error::VitrineError;

// Re-export the effect framework
pub use crate::effect::{
    CubeOptions, Effect, EffectId, EffectKind, EffectStage, FlowOptions, FrameContext,
    HelixOptions, NetworkOptions, RingOptions, RunState, SphereOptions,
};

// Re-export scene and viewport types
pub use crate::scene::{EffectCamera, LineSet, PointSet, Scene};
pub use crate::viewport::{Region, Viewport, ViewportRegistry};

// Re-export geometry builders
pub use crate::geometry::{
    cube_edges, grid_points, helix_points, random_points_in_box, random_points_in_shell, ring,
    sphere_wireframe,
};

// Re-export common external dependencies
pub use cgmath::{InnerSpace, Vector2, Vector3, Zero};
