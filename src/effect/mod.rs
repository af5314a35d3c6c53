//! Effect variants and their shared capability interface
//!
//! The variant set is closed: six decorative effects, selected at
//! construction time through [`EffectKind`]. Every variant implements the
//! same two hooks, [`Effect::initialize_geometry`] and
//! [`Effect::update_per_frame`]; the lifecycle around them (attachment,
//! run state, event subscriptions, teardown) lives in [`stage::EffectStage`]
//! and is identical for all variants.

pub mod cubes;
pub mod flow;
pub mod helix;
pub mod network;
pub mod rings;
pub mod sphere;
pub mod stage;

pub use cubes::{CubeOptions, FloatingCubes};
pub use flow::{FlowOptions, FlowPipeline};
pub use helix::{HelixOptions, HelixStrand};
pub use network::{NetworkGraph, NetworkOptions};
pub use rings::{OrbitRings, RingOptions};
pub use sphere::{SphereOptions, WireframeSphere};
pub use stage::{EffectId, EffectStage, RunState};

use crate::scene::Scene;
use cgmath::Vector2;

/// Per-frame inputs handed to every running effect
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Seconds since the previous update
    pub dt: f32,
    /// Seconds of wall-clock time since the stage started
    pub elapsed: f32,
    /// Latest pointer position in normalized device coordinates, if any
    pub pointer: Option<Vector2<f32>>,
}

/// Capability interface shared by the closed set of effect variants
pub trait Effect {
    /// Builds the variant's drawables into its scene
    ///
    /// Called exactly once, synchronously, before the first frame renders.
    fn initialize_geometry(&mut self, scene: &mut Scene);

    /// Advances animation state by one frame and mutates scene drawables
    fn update_per_frame(&mut self, ctx: &FrameContext, scene: &mut Scene);

    /// Display name for logging
    fn name(&self) -> &str;

    /// Camera distance along +Z for this variant
    fn camera_distance(&self) -> f32 {
        6.0
    }
}

/// The closed set of effect variants with their options
#[derive(Debug, Clone)]
pub enum EffectKind {
    WireframeSphere(SphereOptions),
    NetworkGraph(NetworkOptions),
    FloatingCubes(CubeOptions),
    FlowPipeline(FlowOptions),
    OrbitRings(RingOptions),
    HelixStrand(HelixOptions),
}

impl EffectKind {
    /// Short label for logging
    pub fn label(&self) -> &'static str {
        match self {
            EffectKind::WireframeSphere(_) => "wireframe_sphere",
            EffectKind::NetworkGraph(_) => "network_graph",
            EffectKind::FloatingCubes(_) => "floating_cubes",
            EffectKind::FlowPipeline(_) => "flow_pipeline",
            EffectKind::OrbitRings(_) => "orbit_rings",
            EffectKind::HelixStrand(_) => "helix_strand",
        }
    }

    pub(crate) fn instantiate(self) -> Box<dyn Effect> {
        match self {
            EffectKind::WireframeSphere(options) => Box::new(WireframeSphere::new(options)),
            EffectKind::NetworkGraph(options) => Box::new(NetworkGraph::new(options)),
            EffectKind::FloatingCubes(options) => Box::new(FloatingCubes::new(options)),
            EffectKind::FlowPipeline(options) => Box::new(FlowPipeline::new(options)),
            EffectKind::OrbitRings(options) => Box::new(OrbitRings::new(options)),
            EffectKind::HelixStrand(options) => Box::new(HelixStrand::new(options)),
        }
    }

    /// All six variants with default options, in a fixed order
    pub fn all_defaults() -> Vec<EffectKind> {
        vec![
            EffectKind::WireframeSphere(SphereOptions::default()),
            EffectKind::NetworkGraph(NetworkOptions::default()),
            EffectKind::FloatingCubes(CubeOptions::default()),
            EffectKind::FlowPipeline(FlowOptions::default()),
            EffectKind::OrbitRings(RingOptions::default()),
            EffectKind::HelixStrand(HelixOptions::default()),
        ]
    }
}

/// Exponential smoothing of a rotation target driven by the pointer
///
/// Each step moves the current value a fixed fraction of the way toward
/// `pointer * sensitivity`. A pointer at the viewport centre therefore pulls
/// the rotation monotonically toward zero.
#[derive(Debug, Clone, Copy)]
pub struct PointerDamper {
    current: Vector2<f32>,
    sensitivity: f32,
    damping: f32,
}

impl PointerDamper {
    pub fn new(sensitivity: f32, damping: f32) -> Self {
        Self {
            current: Vector2::new(0.0, 0.0),
            sensitivity,
            damping,
        }
    }

    /// Advances one step toward the pointer-derived target
    ///
    /// With no pointer seen yet the current value holds steady.
    pub fn advance(&mut self, pointer: Option<Vector2<f32>>) -> Vector2<f32> {
        if let Some(p) = pointer {
            let target = p * self.sensitivity;
            self.current += (target - self.current) * self.damping;
        }
        self.current
    }

    pub fn current(&self) -> Vector2<f32> {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn test_centre_pointer_decays_rotation_monotonically() {
        let mut damper = PointerDamper::new(0.3, 0.05);
        // Swing away from centre first
        for _ in 0..20 {
            damper.advance(Some(Vector2::new(1.0, -0.8)));
        }
        let mut previous = damper.current().magnitude();
        assert!(previous > 0.0);

        // Pointer dead centre: angular distance from zero shrinks every step
        for _ in 0..200 {
            let current = damper.advance(Some(Vector2::new(0.0, 0.0))).magnitude();
            assert!(current <= previous + f32::EPSILON);
            previous = current;
        }
        assert!(previous < 1e-3);
    }

    #[test]
    fn test_no_pointer_holds_current_value() {
        let mut damper = PointerDamper::new(0.5, 0.1);
        damper.advance(Some(Vector2::new(1.0, 1.0)));
        let held = damper.current();
        damper.advance(None);
        assert_eq!(damper.current(), held);
    }

    #[test]
    fn test_labels_are_distinct() {
        let kinds = EffectKind::all_defaults();
        assert_eq!(kinds.len(), 6);
        for (i, a) in kinds.iter().enumerate() {
            for b in kinds.iter().skip(i + 1) {
                assert_ne!(a.label(), b.label());
            }
        }
    }
}
