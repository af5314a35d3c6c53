//! Rotating wireframe sphere
//!
//! A latitude/longitude wire cage with a sparse interior point cloud,
//! spinning at a fixed rate and tilting toward the pointer.

use crate::effect::{Effect, FrameContext, PointerDamper};
use crate::geometry::{random_points_in_shell, sphere_wireframe};
use crate::scene::{DrawableId, LineSet, PointSet, Scene};

/// Options for [`WireframeSphere`], immutable after construction
#[derive(Debug, Clone)]
pub struct SphereOptions {
    pub color: [f32; 3],
    pub radius: f32,
    pub lat_segments: u32,
    pub long_segments: u32,
    /// Fixed spin about Y in radians per second
    pub spin_speed: f32,
    /// Interior points scattered inside the cage
    pub interior_points: usize,
    pub pointer_sensitivity: f32,
    pub pointer_damping: f32,
}

impl Default for SphereOptions {
    fn default() -> Self {
        Self {
            color: [0.39, 0.80, 0.93],
            radius: 2.0,
            lat_segments: 12,
            long_segments: 16,
            spin_speed: 0.15,
            interior_points: 60,
            pointer_sensitivity: 0.35,
            pointer_damping: 0.05,
        }
    }
}

impl SphereOptions {
    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_spin_speed(mut self, spin_speed: f32) -> Self {
        self.spin_speed = spin_speed;
        self
    }
}

pub struct WireframeSphere {
    options: SphereOptions,
    wires: Option<DrawableId>,
    dust: Option<DrawableId>,
    spin: f32,
    damper: PointerDamper,
}

impl WireframeSphere {
    pub fn new(options: SphereOptions) -> Self {
        let damper = PointerDamper::new(options.pointer_sensitivity, options.pointer_damping);
        Self {
            options,
            wires: None,
            dust: None,
            spin: 0.0,
            damper,
        }
    }

    pub fn spin(&self) -> f32 {
        self.spin
    }
}

impl Effect for WireframeSphere {
    fn initialize_geometry(&mut self, scene: &mut Scene) {
        self.wires = Some(scene.add_lines(LineSet {
            segments: sphere_wireframe(
                self.options.radius,
                self.options.lat_segments,
                self.options.long_segments,
            ),
            color: self.options.color,
        }));
        self.dust = Some(scene.add_points(PointSet {
            positions: random_points_in_shell(
                self.options.interior_points,
                self.options.radius * 0.2,
                self.options.radius * 0.85,
            ),
            color: self.options.color,
        }));
    }

    fn update_per_frame(&mut self, ctx: &FrameContext, scene: &mut Scene) {
        self.spin += self.options.spin_speed * ctx.dt;
        let lean = self.damper.advance(ctx.pointer);

        for id in [self.wires, self.dust].into_iter().flatten() {
            if let Some(node) = scene.node_mut(id) {
                node.transform.rotation.y = self.spin + lean.x;
                node.transform.rotation.x = lean.y;
            }
        }
        // Interior dust counter-rotates slightly for depth
        if let Some(node) = self.dust.and_then(|id| scene.node_mut(id)) {
            node.transform.rotation.y = self.spin * 0.6 + lean.x;
        }
    }

    fn name(&self) -> &str {
        "Wireframe Sphere"
    }

    fn camera_distance(&self) -> f32 {
        self.options.radius * 3.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::EffectCamera;
    use cgmath::Vector2;

    fn scene() -> Scene {
        Scene::new(EffectCamera::new(6.0, 16.0 / 9.0))
    }

    #[test]
    fn test_initialize_builds_wires_and_dust() {
        let mut effect = WireframeSphere::new(SphereOptions::default());
        let mut scene = scene();
        effect.initialize_geometry(&mut scene);
        assert_eq!(scene.node_count(), 2);
        assert!(scene.vertex_count() > 0);
    }

    #[test]
    fn test_spin_advances_with_time() {
        let mut effect = WireframeSphere::new(SphereOptions::default().with_spin_speed(1.0));
        let mut scene = scene();
        effect.initialize_geometry(&mut scene);

        let ctx = FrameContext {
            dt: 0.5,
            elapsed: 0.5,
            pointer: None,
        };
        effect.update_per_frame(&ctx, &mut scene);
        assert!((effect.spin() - 0.5).abs() < 1e-6);

        let wires = effect.wires.unwrap();
        assert!((scene.node(wires).unwrap().transform.rotation.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_centre_pointer_levels_tilt() {
        let mut effect = WireframeSphere::new(SphereOptions::default());
        let mut scene = scene();
        effect.initialize_geometry(&mut scene);
        let ctx = |pointer| FrameContext {
            dt: 0.016,
            elapsed: 0.0,
            pointer,
        };

        // Tilt away first, then hold the pointer at dead centre
        for _ in 0..30 {
            effect.update_per_frame(&ctx(Some(Vector2::new(0.0, 1.0))), &mut scene);
        }
        let mut previous = effect.damper.current().y.abs();
        for _ in 0..100 {
            effect.update_per_frame(&ctx(Some(Vector2::new(0.0, 0.0))), &mut scene);
            let tilt = effect.damper.current().y.abs();
            assert!(tilt <= previous + f32::EPSILON);
            previous = tilt;
        }
    }
}
