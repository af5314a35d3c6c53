//! Per-instance scene graph
//!
//! Each effect instance owns exactly one [`Scene`]: a camera plus a flat list
//! of drawable nodes (line sets and point sets). Nodes are addressed through
//! the [`DrawableId`] returned at insertion, so an effect can only ever touch
//! drawables it created itself.

pub mod camera;

pub use camera::{CameraUniform, EffectCamera};

use cgmath::{Matrix4, Rad, Vector3};

/// Handle to one drawable node inside a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawableId(usize);

/// A batch of line segments sharing one color
#[derive(Debug, Clone)]
pub struct LineSet {
    pub segments: Vec<[Vector3<f32>; 2]>,
    pub color: [f32; 3],
}

/// A point cloud sharing one color
#[derive(Debug, Clone)]
pub struct PointSet {
    pub positions: Vec<Vector3<f32>>,
    pub color: [f32; 3],
}

/// The drawable primitives an effect can put into its scene
#[derive(Debug, Clone)]
pub enum Drawable {
    Lines(LineSet),
    Points(PointSet),
}

impl Drawable {
    pub fn as_lines(&self) -> Option<&LineSet> {
        match self {
            Drawable::Lines(lines) => Some(lines),
            _ => None,
        }
    }

    pub fn as_lines_mut(&mut self) -> Option<&mut LineSet> {
        match self {
            Drawable::Lines(lines) => Some(lines),
            _ => None,
        }
    }

    pub fn as_points(&self) -> Option<&PointSet> {
        match self {
            Drawable::Points(points) => Some(points),
            _ => None,
        }
    }

    pub fn as_points_mut(&mut self) -> Option<&mut PointSet> {
        match self {
            Drawable::Points(points) => Some(points),
            _ => None,
        }
    }

    /// Number of vertices this drawable contributes per frame
    pub fn vertex_count(&self) -> usize {
        match self {
            Drawable::Lines(lines) => lines.segments.len() * 2,
            Drawable::Points(points) => points.positions.len(),
        }
    }
}

/// Euler rotation, translation and uniform scale applied to one drawable
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    /// Euler angles in radians, applied as Y then X then Z
    pub rotation: Vector3<f32>,
    pub translation: Vector3<f32>,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation: Vector3::new(0.0, 0.0, 0.0),
            translation: Vector3::new(0.0, 0.0, 0.0),
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_scale(self.scale)
    }
}

/// One drawable with its transform and visibility flag
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub drawable: Drawable,
    pub transform: Transform,
    pub visible: bool,
}

/// Scene owned by a single effect instance
pub struct Scene {
    pub camera: EffectCamera,
    nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new(camera: EffectCamera) -> Self {
        Self {
            camera,
            nodes: Vec::new(),
        }
    }

    /// Adds a line set and returns its handle
    pub fn add_lines(&mut self, lines: LineSet) -> DrawableId {
        self.push(Drawable::Lines(lines))
    }

    /// Adds a point cloud and returns its handle
    pub fn add_points(&mut self, points: PointSet) -> DrawableId {
        self.push(Drawable::Points(points))
    }

    fn push(&mut self, drawable: Drawable) -> DrawableId {
        let id = DrawableId(self.nodes.len());
        self.nodes.push(SceneNode {
            drawable,
            transform: Transform::default(),
            visible: true,
        });
        id
    }

    pub fn node(&self, id: DrawableId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: DrawableId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total vertices across visible drawables, used for buffer sizing
    pub fn vertex_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.visible)
            .map(|n| n.drawable.vertex_count())
            .sum()
    }

    /// Refreshes the camera uniform; called once per frame after updates
    pub fn update(&mut self) {
        self.camera.update_view_proj();
    }
}
