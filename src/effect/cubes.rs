//! Floating wireframe cubes
//!
//! A handful of cubes scattered in a shell around the origin, each tumbling
//! with its own angular velocity and bobbing on its own phase. The whole
//! group shifts slightly toward the pointer for a parallax feel.

use crate::effect::{Effect, FrameContext, PointerDamper};
use crate::geometry::{cube_edges, random_points_in_shell};
use crate::scene::{DrawableId, LineSet, Scene};
use cgmath::Vector3;
use rand::Rng;
use std::f32::consts::TAU;

/// Options for [`FloatingCubes`], immutable after construction
#[derive(Debug, Clone)]
pub struct CubeOptions {
    pub color: [f32; 3],
    pub cube_count: usize,
    /// Inner and outer radius of the placement shell
    pub spread: (f32, f32),
    /// Edge lengths are drawn uniformly from this range
    pub edge_length: (f32, f32),
    /// Tumble rate bounds in radians per second
    pub tumble_speed: (f32, f32),
    /// Vertical bob amplitude
    pub bob_amplitude: f32,
    pub pointer_sensitivity: f32,
    pub pointer_damping: f32,
}

impl Default for CubeOptions {
    fn default() -> Self {
        Self {
            color: [0.98, 0.75, 0.37],
            cube_count: 8,
            spread: (1.5, 4.0),
            edge_length: (0.4, 1.0),
            tumble_speed: (0.2, 0.8),
            bob_amplitude: 0.3,
            pointer_sensitivity: 0.4,
            pointer_damping: 0.06,
        }
    }
}

impl CubeOptions {
    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn with_cube_count(mut self, cube_count: usize) -> Self {
        self.cube_count = cube_count;
        self
    }
}

struct Cube {
    id: DrawableId,
    anchor: Vector3<f32>,
    angular_velocity: Vector3<f32>,
    bob_phase: f32,
}

pub struct FloatingCubes {
    options: CubeOptions,
    cubes: Vec<Cube>,
    damper: PointerDamper,
}

impl FloatingCubes {
    pub fn new(options: CubeOptions) -> Self {
        let damper = PointerDamper::new(options.pointer_sensitivity, options.pointer_damping);
        Self {
            options,
            cubes: Vec::new(),
            damper,
        }
    }

    pub fn cube_count(&self) -> usize {
        self.cubes.len()
    }
}

impl Effect for FloatingCubes {
    fn initialize_geometry(&mut self, scene: &mut Scene) {
        let mut rng = rand::rng();
        let anchors = random_points_in_shell(
            self.options.cube_count,
            self.options.spread.0,
            self.options.spread.1,
        );

        for anchor in anchors {
            let edge = rng.random_range(self.options.edge_length.0..=self.options.edge_length.1);
            let id = scene.add_lines(LineSet {
                segments: cube_edges(edge),
                color: self.options.color,
            });
            if let Some(node) = scene.node_mut(id) {
                node.transform.translation = anchor;
            }
            let (lo, hi) = self.options.tumble_speed;
            self.cubes.push(Cube {
                id,
                anchor,
                angular_velocity: Vector3::new(
                    rng.random_range(lo..=hi),
                    rng.random_range(lo..=hi),
                    rng.random_range(lo..=hi),
                ),
                bob_phase: rng.random_range(0.0..TAU),
            });
        }
    }

    fn update_per_frame(&mut self, ctx: &FrameContext, scene: &mut Scene) {
        let drift = self.damper.advance(ctx.pointer);
        for cube in &self.cubes {
            if let Some(node) = scene.node_mut(cube.id) {
                node.transform.rotation += cube.angular_velocity * ctx.dt;
                node.transform.translation = cube.anchor
                    + Vector3::new(
                        drift.x,
                        drift.y + self.options.bob_amplitude * (ctx.elapsed + cube.bob_phase).sin(),
                        0.0,
                    );
            }
        }
    }

    fn name(&self) -> &str {
        "Floating Cubes"
    }

    fn camera_distance(&self) -> f32 {
        self.options.spread.1 * 2.2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::EffectCamera;

    fn scene() -> Scene {
        Scene::new(EffectCamera::new(8.0, 16.0 / 9.0))
    }

    #[test]
    fn test_one_drawable_per_cube() {
        let mut effect = FloatingCubes::new(CubeOptions::default().with_cube_count(5));
        let mut scene = scene();
        effect.initialize_geometry(&mut scene);
        assert_eq!(effect.cube_count(), 5);
        assert_eq!(scene.node_count(), 5);
        for node in scene.nodes() {
            assert_eq!(node.drawable.as_lines().unwrap().segments.len(), 12);
        }
    }

    #[test]
    fn test_bob_returns_to_anchor_over_full_period() {
        let mut effect = FloatingCubes::new(CubeOptions::default().with_cube_count(1));
        let mut scene = scene();
        effect.initialize_geometry(&mut scene);
        let anchor = effect.cubes[0].anchor;
        let phase = effect.cubes[0].bob_phase;

        // At elapsed = -phase the sine term vanishes
        let ctx = FrameContext {
            dt: 0.016,
            elapsed: -phase,
            pointer: None,
        };
        effect.update_per_frame(&ctx, &mut scene);
        let y = scene.node(effect.cubes[0].id).unwrap().transform.translation.y;
        assert!((y - anchor.y).abs() < 1e-5);
    }

    #[test]
    fn test_tumble_accumulates() {
        let mut effect = FloatingCubes::new(CubeOptions::default().with_cube_count(1));
        let mut scene = scene();
        effect.initialize_geometry(&mut scene);

        let ctx = FrameContext {
            dt: 1.0,
            elapsed: 1.0,
            pointer: None,
        };
        effect.update_per_frame(&ctx, &mut scene);
        let rotation = scene.node(effect.cubes[0].id).unwrap().transform.rotation;
        let expected = effect.cubes[0].angular_velocity;
        assert!((rotation.x - expected.x).abs() < 1e-5);
        assert!((rotation.y - expected.y).abs() < 1e-5);
    }
}
