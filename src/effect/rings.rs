//! Orbit rings
//!
//! Concentric tilted rings spinning at staggered rates, with a slow radial
//! pulse. Used as a per-project accent shape; there is no pointer influence.

use crate::effect::{Effect, FrameContext};
use crate::geometry::ring;
use crate::scene::{DrawableId, LineSet, Scene};

/// Options for [`OrbitRings`], immutable after construction
#[derive(Debug, Clone)]
pub struct RingOptions {
    pub color: [f32; 3],
    pub ring_count: usize,
    pub base_radius: f32,
    pub ring_spacing: f32,
    pub segments: u32,
    /// Innermost ring spin rate; outer rings stagger off this
    pub spin_speed: f32,
    /// Fixed tilt about X applied to the whole stack
    pub tilt: f32,
    pub pulse_speed: f32,
    /// Fractional radial scale swing of the pulse
    pub pulse_depth: f32,
}

impl Default for RingOptions {
    fn default() -> Self {
        Self {
            color: [0.95, 0.42, 0.47],
            ring_count: 5,
            base_radius: 1.0,
            ring_spacing: 0.4,
            segments: 48,
            spin_speed: 0.3,
            tilt: 0.5,
            pulse_speed: 1.2,
            pulse_depth: 0.08,
        }
    }
}

impl RingOptions {
    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn with_ring_count(mut self, ring_count: usize) -> Self {
        self.ring_count = ring_count;
        self
    }
}

pub struct OrbitRings {
    options: RingOptions,
    rings: Vec<DrawableId>,
    spins: Vec<f32>,
}

impl OrbitRings {
    pub fn new(options: RingOptions) -> Self {
        Self {
            options,
            rings: Vec::new(),
            spins: Vec::new(),
        }
    }

    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }
}

impl Effect for OrbitRings {
    fn initialize_geometry(&mut self, scene: &mut Scene) {
        for i in 0..self.options.ring_count {
            let radius = self.options.base_radius + i as f32 * self.options.ring_spacing;
            let id = scene.add_lines(LineSet {
                segments: ring(radius, self.options.segments),
                color: self.options.color,
            });
            if let Some(node) = scene.node_mut(id) {
                node.transform.rotation.x = self.options.tilt;
            }
            self.rings.push(id);
            self.spins.push(0.0);
        }
    }

    fn update_per_frame(&mut self, ctx: &FrameContext, scene: &mut Scene) {
        for (i, (&id, spin)) in self.rings.iter().zip(self.spins.iter_mut()).enumerate() {
            // Alternate direction per ring, staggered rate outward
            let direction = if i % 2 == 0 { 1.0 } else { -1.0 };
            *spin += direction * self.options.spin_speed * (1.0 + i as f32 * 0.15) * ctx.dt;

            if let Some(node) = scene.node_mut(id) {
                node.transform.rotation.y = *spin;
                node.transform.scale = 1.0
                    + self.options.pulse_depth
                        * (ctx.elapsed * self.options.pulse_speed + i as f32 * 0.7).sin();
            }
        }
    }

    fn name(&self) -> &str {
        "Orbit Rings"
    }

    fn camera_distance(&self) -> f32 {
        let outer = self.options.base_radius
            + (self.options.ring_count.saturating_sub(1)) as f32 * self.options.ring_spacing;
        outer * 3.0
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
    fn test_one_drawable_per_ring() {
        let mut effect = OrbitRings::new(RingOptions::default().with_ring_count(4));
        let mut scene = scene();
        effect.initialize_geometry(&mut scene);
        assert_eq!(effect.ring_count(), 4);
        assert_eq!(scene.node_count(), 4);
    }

    #[test]
    fn test_adjacent_rings_spin_opposite_ways() {
        let mut effect = OrbitRings::new(RingOptions::default().with_ring_count(2));
        let mut scene = scene();
        effect.initialize_geometry(&mut scene);

        let ctx = FrameContext {
            dt: 1.0,
            elapsed: 1.0,
            pointer: None,
        };
        effect.update_per_frame(&ctx, &mut scene);
        let a = scene.node(effect.rings[0]).unwrap().transform.rotation.y;
        let b = scene.node(effect.rings[1]).unwrap().transform.rotation.y;
        assert!(a > 0.0);
        assert!(b < 0.0);
    }

    #[test]
    fn test_pulse_scale_stays_within_depth() {
        let options = RingOptions::default();
        let depth = options.pulse_depth;
        let mut effect = OrbitRings::new(options);
        let mut scene = scene();
        effect.initialize_geometry(&mut scene);

        for step in 0..200 {
            let elapsed = step as f32 * 0.05;
            let ctx = FrameContext {
                dt: 0.05,
                elapsed,
                pointer: None,
            };
            effect.update_per_frame(&ctx, &mut scene);
            for &id in &effect.rings {
                let scale = scene.node(id).unwrap().transform.scale;
                assert!(scale >= 1.0 - depth - 1e-5 && scale <= 1.0 + depth + 1e-5);
            }
        }
    }
}
