//! Drifting neural-network graph
//!
//! Nodes drift inside a bounded box with reflecting walls; edges connect
//! every pair of nodes closer than the link distance. The O(n²) relink is
//! rolled probabilistically (about one frame in ten) since node counts stay
//! in the tens.

use crate::effect::{Effect, FrameContext, PointerDamper};
use crate::geometry::random_points_in_box;
use crate::scene::{DrawableId, LineSet, PointSet, Scene};
use cgmath::{InnerSpace, Vector3};
use rand::Rng;

/// Options for [`NetworkGraph`], immutable after construction
#[derive(Debug, Clone)]
pub struct NetworkOptions {
    pub color: [f32; 3],
    pub node_count: usize,
    /// Half extent of the bounding box nodes drift inside
    pub half_extent: f32,
    /// Two nodes closer than this are linked
    pub link_distance: f32,
    /// Top drift speed per axis in units per second
    pub drift_speed: f32,
    /// Probability per frame of recomputing the edge set
    pub relink_chance: f32,
    /// Global yaw in radians per second
    pub yaw_speed: f32,
    pub pointer_sensitivity: f32,
    pub pointer_damping: f32,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            color: [0.55, 0.47, 0.91],
            node_count: 40,
            half_extent: 3.0,
            link_distance: 1.4,
            drift_speed: 0.4,
            relink_chance: 0.1,
            yaw_speed: 0.05,
            pointer_sensitivity: 0.25,
            pointer_damping: 0.04,
        }
    }
}

impl NetworkOptions {
    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn with_node_count(mut self, node_count: usize) -> Self {
        self.node_count = node_count;
        self
    }

    pub fn with_link_distance(mut self, link_distance: f32) -> Self {
        self.link_distance = link_distance;
        self
    }
}

pub struct NetworkGraph {
    options: NetworkOptions,
    positions: Vec<Vector3<f32>>,
    velocities: Vec<Vector3<f32>>,
    linked: Vec<(usize, usize)>,
    nodes_id: Option<DrawableId>,
    edges_id: Option<DrawableId>,
    yaw: f32,
    damper: PointerDamper,
}

impl NetworkGraph {
    pub fn new(options: NetworkOptions) -> Self {
        let damper = PointerDamper::new(options.pointer_sensitivity, options.pointer_damping);
        Self {
            options,
            positions: Vec::new(),
            velocities: Vec::new(),
            linked: Vec::new(),
            nodes_id: None,
            edges_id: None,
            yaw: 0.0,
            damper,
        }
    }

    /// Node pairs currently linked, in index order
    pub fn linked_pairs(&self) -> &[(usize, usize)] {
        &self.linked
    }

    pub fn positions(&self) -> &[Vector3<f32>] {
        &self.positions
    }

    /// Recomputes the edge set from current pairwise distances
    ///
    /// O(n²) over the node set; callable directly so a caller can pin the
    /// edge set to the current frame instead of waiting out the random roll.
    pub fn relink_edges(&mut self, scene: &mut Scene) {
        self.linked.clear();
        for i in 0..self.positions.len() {
            for j in (i + 1)..self.positions.len() {
                let distance = (self.positions[i] - self.positions[j]).magnitude();
                if distance < self.options.link_distance {
                    self.linked.push((i, j));
                }
            }
        }

        if let Some(lines) = self
            .edges_id
            .and_then(|id| scene.node_mut(id))
            .and_then(|node| node.drawable.as_lines_mut())
        {
            lines.segments = self
                .linked
                .iter()
                .map(|&(i, j)| [self.positions[i], self.positions[j]])
                .collect();
        }
    }

    fn sync_node_points(&self, scene: &mut Scene) {
        if let Some(points) = self
            .nodes_id
            .and_then(|id| scene.node_mut(id))
            .and_then(|node| node.drawable.as_points_mut())
        {
            points.positions.clone_from(&self.positions);
        }
    }
}

impl Effect for NetworkGraph {
    fn initialize_geometry(&mut self, scene: &mut Scene) {
        let mut rng = rand::rng();
        self.positions = random_points_in_box(self.options.node_count, self.options.half_extent);
        self.velocities = (0..self.options.node_count)
            .map(|_| {
                Vector3::new(
                    rng.random_range(-self.options.drift_speed..=self.options.drift_speed),
                    rng.random_range(-self.options.drift_speed..=self.options.drift_speed),
                    rng.random_range(-self.options.drift_speed..=self.options.drift_speed),
                )
            })
            .collect();

        self.nodes_id = Some(scene.add_points(PointSet {
            positions: self.positions.clone(),
            color: self.options.color,
        }));
        self.edges_id = Some(scene.add_lines(LineSet {
            segments: Vec::new(),
            color: self.options.color,
        }));
        self.relink_edges(scene);
    }

    fn update_per_frame(&mut self, ctx: &FrameContext, scene: &mut Scene) {
        let bound = self.options.half_extent;
        for (position, velocity) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            *position += *velocity * ctx.dt;
            for axis in 0..3 {
                if position[axis].abs() > bound {
                    position[axis] = position[axis].clamp(-bound, bound);
                    velocity[axis] = -velocity[axis];
                }
            }
        }
        self.sync_node_points(scene);

        if rand::rng().random::<f32>() < self.options.relink_chance {
            self.relink_edges(scene);
        }

        self.yaw += self.options.yaw_speed * ctx.dt;
        let lean = self.damper.advance(ctx.pointer);
        for id in [self.nodes_id, self.edges_id].into_iter().flatten() {
            if let Some(node) = scene.node_mut(id) {
                node.transform.rotation.y = self.yaw + lean.x;
                node.transform.rotation.x = lean.y;
            }
        }
    }

    fn name(&self) -> &str {
        "Network Graph"
    }

    fn camera_distance(&self) -> f32 {
        self.options.half_extent * 2.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::EffectCamera;

    fn scene() -> Scene {
        Scene::new(EffectCamera::new(6.0, 16.0 / 9.0))
    }

    fn brute_force_pairs(positions: &[Vector3<f32>], threshold: f32) -> usize {
        let mut count = 0;
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                if (positions[i] - positions[j]).magnitude() < threshold {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_edge_count_matches_pairs_under_threshold() {
        let options = NetworkOptions::default().with_node_count(25);
        let threshold = options.link_distance;
        let mut graph = NetworkGraph::new(options);
        let mut scene = scene();
        graph.initialize_geometry(&mut scene);

        let ctx = FrameContext {
            dt: 0.016,
            elapsed: 0.016,
            pointer: None,
        };
        for _ in 0..50 {
            graph.update_per_frame(&ctx, &mut scene);
        }
        // Pin the edge set to this exact frame
        graph.relink_edges(&mut scene);

        let expected = brute_force_pairs(graph.positions(), threshold);
        assert_eq!(graph.linked_pairs().len(), expected);

        let n = graph.positions().len();
        assert!(graph.linked_pairs().len() <= n * (n - 1) / 2);
    }

    #[test]
    fn test_rendered_segments_mirror_linked_pairs() {
        let mut graph = NetworkGraph::new(NetworkOptions::default().with_node_count(15));
        let mut scene = scene();
        graph.initialize_geometry(&mut scene);
        graph.relink_edges(&mut scene);

        let segments = scene
            .node(graph.edges_id.unwrap())
            .unwrap()
            .drawable
            .as_lines()
            .unwrap()
            .segments
            .len();
        assert_eq!(segments, graph.linked_pairs().len());
    }

    #[test]
    fn test_nodes_stay_inside_bounds() {
        let mut graph = NetworkGraph::new(NetworkOptions::default());
        let mut scene = scene();
        graph.initialize_geometry(&mut scene);

        let ctx = FrameContext {
            dt: 0.1,
            elapsed: 0.0,
            pointer: None,
        };
        for _ in 0..500 {
            graph.update_per_frame(&ctx, &mut scene);
        }
        let bound = NetworkOptions::default().half_extent + 1e-4;
        for p in graph.positions() {
            assert!(p.x.abs() <= bound && p.y.abs() <= bound && p.z.abs() <= bound);
        }
    }

    #[test]
    fn test_everything_links_when_threshold_is_huge() {
        let mut graph =
            NetworkGraph::new(NetworkOptions::default().with_node_count(10).with_link_distance(1e6));
        let mut scene = scene();
        graph.initialize_geometry(&mut scene);
        assert_eq!(graph.linked_pairs().len(), 45); // C(10, 2)
    }
}
