//! Helix strand
//!
//! Two interleaved helical point strands joined by periodic rungs, spinning
//! about Y with a gentle sinusoidal sway. Another per-project accent shape.

use crate::effect::{Effect, FrameContext};
use crate::geometry::helix_points;
use crate::scene::{DrawableId, LineSet, PointSet, Scene};
use std::f32::consts::PI;

/// Options for [`HelixStrand`], immutable after construction
#[derive(Debug, Clone)]
pub struct HelixOptions {
    pub color: [f32; 3],
    pub radius: f32,
    pub height: f32,
    pub turns: u32,
    pub points_per_turn: u32,
    /// Every n-th point pair gets a connecting rung
    pub rung_stride: usize,
    pub spin_speed: f32,
    pub sway_amplitude: f32,
    pub sway_speed: f32,
}

impl Default for HelixOptions {
    fn default() -> Self {
        Self {
            color: [0.42, 0.86, 0.95],
            radius: 0.8,
            height: 4.0,
            turns: 4,
            points_per_turn: 24,
            rung_stride: 8,
            spin_speed: 0.4,
            sway_amplitude: 0.15,
            sway_speed: 0.8,
        }
    }
}

impl HelixOptions {
    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn with_turns(mut self, turns: u32) -> Self {
        self.turns = turns;
        self
    }
}

pub struct HelixStrand {
    options: HelixOptions,
    drawables: Vec<DrawableId>,
    spin: f32,
}

impl HelixStrand {
    pub fn new(options: HelixOptions) -> Self {
        Self {
            options,
            drawables: Vec::new(),
            spin: 0.0,
        }
    }
}

impl Effect for HelixStrand {
    fn initialize_geometry(&mut self, scene: &mut Scene) {
        let o = &self.options;
        let strand_a = helix_points(o.radius, o.height, o.turns, o.points_per_turn, 0.0);
        let strand_b = helix_points(o.radius, o.height, o.turns, o.points_per_turn, PI);

        let rungs = strand_a
            .iter()
            .zip(&strand_b)
            .enumerate()
            .filter(|(i, _)| i % o.rung_stride.max(1) == 0)
            .map(|(_, (a, b))| [*a, *b])
            .collect();

        self.drawables.push(scene.add_points(PointSet {
            positions: strand_a,
            color: o.color,
        }));
        self.drawables.push(scene.add_points(PointSet {
            positions: strand_b,
            color: o.color,
        }));
        self.drawables.push(scene.add_lines(LineSet {
            segments: rungs,
            color: o.color,
        }));
    }

    fn update_per_frame(&mut self, ctx: &FrameContext, scene: &mut Scene) {
        self.spin += self.options.spin_speed * ctx.dt;
        let sway = self.options.sway_amplitude * (ctx.elapsed * self.options.sway_speed).sin();

        for &id in &self.drawables {
            if let Some(node) = scene.node_mut(id) {
                node.transform.rotation.y = self.spin;
                node.transform.rotation.z = sway;
            }
        }
    }

    fn name(&self) -> &str {
        "Helix Strand"
    }

    fn camera_distance(&self) -> f32 {
        self.options.height * 1.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::EffectCamera;

    fn scene() -> Scene {
        Scene::new(EffectCamera::new(6.0, 16.0 / 9.0))
    }

    #[test]
    fn test_two_strands_and_rungs() {
        let mut effect = HelixStrand::new(HelixOptions::default());
        let mut scene = scene();
        effect.initialize_geometry(&mut scene);
        assert_eq!(scene.node_count(), 3);

        let points: Vec<_> = scene
            .nodes()
            .filter(|n| n.drawable.as_points().is_some())
            .collect();
        assert_eq!(points.len(), 2);

        let rungs = scene
            .nodes()
            .find_map(|n| n.drawable.as_lines())
            .unwrap();
        let total = (4 * 24) as usize;
        assert_eq!(rungs.segments.len(), total.div_ceil(8));
    }

    #[test]
    fn test_strands_share_transform() {
        let mut effect = HelixStrand::new(HelixOptions::default());
        let mut scene = scene();
        effect.initialize_geometry(&mut scene);

        let ctx = FrameContext {
            dt: 0.25,
            elapsed: 0.25,
            pointer: None,
        };
        effect.update_per_frame(&ctx, &mut scene);

        let spins: Vec<f32> = effect
            .drawables
            .iter()
            .map(|&id| scene.node(id).unwrap().transform.rotation.y)
            .collect();
        assert!(spins.windows(2).all(|w| (w[0] - w[1]).abs() < 1e-6));
        assert!(spins[0] > 0.0);
    }
}
