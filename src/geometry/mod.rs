//! # Primitive Shape Generation
//!
//! Line and point primitives for the effect variants: wireframe spheres and
//! cubes, rings, helices, grids and random clouds. All builders are
//! synchronous and allocate plain CPU-side vectors; effects hand the results
//! to their scene at construction time, before the first frame renders.
//!
//! Randomized builders draw from the thread-local generator; placement is
//! deliberately unseeded and not reproducible across runs.

use cgmath::Vector3;
use rand::Rng;
use std::f32::consts::PI;

/// A pair of endpoints making up one line segment
pub type Segment = [Vector3<f32>; 2];

/// Generate the latitude/longitude wire cage of a sphere
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `lat_segments` - Number of horizontal rings (poles excluded)
/// * `long_segments` - Number of vertical half-circles
pub fn sphere_wireframe(radius: f32, lat_segments: u32, long_segments: u32) -> Vec<Segment> {
    let lat_segs = lat_segments.max(2);
    let long_segs = long_segments.max(3);
    let mut segments = Vec::new();

    // Latitude rings
    for lat in 1..lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32;
        let ring_radius = radius * theta.sin();
        let y = radius * theta.cos();

        for long in 0..long_segs {
            let phi_a = long as f32 * 2.0 * PI / long_segs as f32;
            let phi_b = (long + 1) as f32 * 2.0 * PI / long_segs as f32;
            segments.push([
                Vector3::new(ring_radius * phi_a.cos(), y, ring_radius * phi_a.sin()),
                Vector3::new(ring_radius * phi_b.cos(), y, ring_radius * phi_b.sin()),
            ]);
        }
    }

    // Longitude arcs, pole to pole
    for long in 0..long_segs {
        let phi = long as f32 * 2.0 * PI / long_segs as f32;
        for lat in 0..lat_segs {
            let theta_a = lat as f32 * PI / lat_segs as f32;
            let theta_b = (lat + 1) as f32 * PI / lat_segs as f32;
            segments.push([
                Vector3::new(
                    radius * theta_a.sin() * phi.cos(),
                    radius * theta_a.cos(),
                    radius * theta_a.sin() * phi.sin(),
                ),
                Vector3::new(
                    radius * theta_b.sin() * phi.cos(),
                    radius * theta_b.cos(),
                    radius * theta_b.sin() * phi.sin(),
                ),
            ]);
        }
    }

    segments
}

/// Generate the 12 edges of a cube centered at the origin
pub fn cube_edges(edge_length: f32) -> Vec<Segment> {
    let h = edge_length * 0.5;
    let corners = [
        Vector3::new(-h, -h, -h),
        Vector3::new(h, -h, -h),
        Vector3::new(h, h, -h),
        Vector3::new(-h, h, -h),
        Vector3::new(-h, -h, h),
        Vector3::new(h, -h, h),
        Vector3::new(h, h, h),
        Vector3::new(-h, h, h),
    ];
    const EDGES: [(usize, usize); 12] = [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0), // back face
        (4, 5),
        (5, 6),
        (6, 7),
        (7, 4), // front face
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7), // connecting edges
    ];

    EDGES
        .iter()
        .map(|&(a, b)| [corners[a], corners[b]])
        .collect()
}

/// Generate a closed ring of line segments in the XZ plane
pub fn ring(radius: f32, segments: u32) -> Vec<Segment> {
    let segs = segments.max(3);
    (0..segs)
        .map(|i| {
            let phi_a = i as f32 * 2.0 * PI / segs as f32;
            let phi_b = (i + 1) as f32 * 2.0 * PI / segs as f32;
            [
                Vector3::new(radius * phi_a.cos(), 0.0, radius * phi_a.sin()),
                Vector3::new(radius * phi_b.cos(), 0.0, radius * phi_b.sin()),
            ]
        })
        .collect()
}

/// Generate points along a helix winding around the Y axis
///
/// # Arguments
/// * `radius` - Strand radius
/// * `height` - Total vertical extent, centered at the origin
/// * `turns` - Number of full revolutions
/// * `points_per_turn` - Sampling density
/// * `phase` - Angular offset, used to interleave strands
pub fn helix_points(
    radius: f32,
    height: f32,
    turns: u32,
    points_per_turn: u32,
    phase: f32,
) -> Vec<Vector3<f32>> {
    let total = (turns.max(1) * points_per_turn.max(3)) as usize;
    (0..total)
        .map(|i| {
            let t = i as f32 / (total - 1) as f32;
            let angle = phase + t * turns as f32 * 2.0 * PI;
            Vector3::new(
                radius * angle.cos(),
                (t - 0.5) * height,
                radius * angle.sin(),
            )
        })
        .collect()
}

/// Generate an evenly spaced grid of points in the XZ plane
pub fn grid_points(columns: u32, rows: u32, spacing: f32) -> Vec<Vector3<f32>> {
    let cols = columns.max(1);
    let rws = rows.max(1);
    let x_offset = (cols - 1) as f32 * spacing * 0.5;
    let z_offset = (rws - 1) as f32 * spacing * 0.5;

    let mut points = Vec::with_capacity((cols * rws) as usize);
    for row in 0..rws {
        for col in 0..cols {
            points.push(Vector3::new(
                col as f32 * spacing - x_offset,
                0.0,
                row as f32 * spacing - z_offset,
            ));
        }
    }
    points
}

/// Scatter points uniformly inside an axis-aligned box
pub fn random_points_in_box(count: usize, half_extent: f32) -> Vec<Vector3<f32>> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            Vector3::new(
                rng.random_range(-half_extent..=half_extent),
                rng.random_range(-half_extent..=half_extent),
                rng.random_range(-half_extent..=half_extent),
            )
        })
        .collect()
}

/// Scatter points uniformly in direction within a spherical shell
pub fn random_points_in_shell(count: usize, min_radius: f32, max_radius: f32) -> Vec<Vector3<f32>> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            // Uniform direction via normalized gaussian-free rejection-less
            // spherical sampling: uniform cos(theta), uniform phi.
            let cos_theta: f32 = rng.random_range(-1.0..=1.0);
            let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
            let phi: f32 = rng.random_range(0.0..2.0 * PI);
            let r = rng.random_range(min_radius..=max_radius);
            Vector3::new(
                r * sin_theta * phi.cos(),
                r * cos_theta,
                r * sin_theta * phi.sin(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn test_sphere_wireframe_segment_count() {
        let wires = sphere_wireframe(1.0, 6, 8);
        // 5 latitude rings of 8 segments plus 8 arcs of 6 segments
        assert_eq!(wires.len(), 5 * 8 + 8 * 6);
    }

    #[test]
    fn test_sphere_wireframe_points_lie_on_sphere() {
        let radius = 2.5;
        for segment in sphere_wireframe(radius, 5, 7) {
            for p in segment {
                assert!((p.magnitude() - radius).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_cube_has_twelve_edges() {
        let edges = cube_edges(1.0);
        assert_eq!(edges.len(), 12);
        for edge in &edges {
            // Every cube edge has the cube's edge length
            assert!(((edge[0] - edge[1]).magnitude() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_ring_closes() {
        let segments = ring(1.0, 16);
        assert_eq!(segments.len(), 16);
        let gap = (segments[15][1] - segments[0][0]).magnitude();
        assert!(gap < 1e-5);
    }

    #[test]
    fn test_helix_spans_height() {
        let points = helix_points(1.0, 4.0, 3, 16, 0.0);
        assert_eq!(points.len(), 48);
        assert!((points.first().unwrap().y + 2.0).abs() < 1e-5);
        assert!((points.last().unwrap().y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_grid_point_count_and_centering() {
        let points = grid_points(5, 3, 1.0);
        assert_eq!(points.len(), 15);
        let centroid = points
            .iter()
            .fold(Vector3::new(0.0, 0.0, 0.0), |acc, p| acc + *p)
            / 15.0;
        assert!(centroid.magnitude() < 1e-5);
    }

    #[test]
    fn test_random_box_points_stay_in_bounds() {
        let points = random_points_in_box(200, 3.0);
        assert_eq!(points.len(), 200);
        for p in points {
            assert!(p.x.abs() <= 3.0 && p.y.abs() <= 3.0 && p.z.abs() <= 3.0);
        }
    }

    #[test]
    fn test_shell_points_stay_in_radii() {
        let points = random_points_in_shell(200, 1.0, 2.0);
        for p in points {
            let r = p.magnitude();
            assert!(r >= 1.0 - 1e-4 && r <= 2.0 + 1e-4);
        }
    }
}
