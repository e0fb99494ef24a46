//! View normalization and GPU-ready geometry extraction.

use glam::Vec3;

use crate::mesh::halfedge::HalfEdgeMesh;
use crate::mesh::TriMesh;

/// Half-extents below this are treated as flat and excluded from scaling.
const FLAT_EXTENT: f32 = 1e-12;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Tightest box around `points`, or `None` when there are none.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (&first, rest) = points.split_first()?;
        let mut aabb = Self {
            min: first,
            max: first,
        };
        for &point in rest {
            aabb.min = aabb.min.min(point);
            aabb.max = aabb.max.max(point);
        }
        Some(aabb)
    }

    /// Midpoint of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Distance from the center to each face pair.
    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }
}

/// Uniform scale and recentring that maps a mesh into the [-1, 1] cube.
///
/// Applied as scale-after-translation: `p' = scale * (p - center)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f32,
    pub center: Vec3,
}

impl ViewTransform {
    /// Normalizing transform for the given bounding box.
    ///
    /// The scale is the reciprocal of the largest half-extent, so the box
    /// fits the unit cube exactly along its longest axis. Degenerate boxes
    /// (single points) keep a scale of 1.
    #[must_use]
    pub fn from_aabb(aabb: &Aabb) -> Self {
        let extents = aabb.half_extents();
        let largest = extents.x.max(extents.y).max(extents.z);
        let scale = if largest > FLAT_EXTENT {
            1.0 / largest
        } else {
            1.0
        };
        Self {
            scale,
            center: aabb.center(),
        }
    }
}

/// Flat vertex arrays and the adjacency-expanded element list.
///
/// `positions` and `normals` hold one `[x, y, z]` triple per mesh vertex.
/// `elements` holds six indices per face, alternating face corners with the
/// apex vertices of the three neighbouring faces, in the layout
/// `GL_TRIANGLES_ADJACENCY` expects.
#[derive(Debug, Clone, Default)]
pub struct GpuGeometry {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub elements: Vec<u32>,
}

impl GpuGeometry {
    /// Flatten `mesh` into GPU-ready arrays.
    ///
    /// For each face the element list walks its three edges, emitting the
    /// edge origin followed by the apex of the face across that edge. Edges
    /// without a neighbour fall back to the face's own apex, which presents
    /// the face to the geometry stage as its own mirrored neighbour.
    #[must_use]
    pub fn extract(mesh: &TriMesh) -> Self {
        let computed;
        let normals: &[Vec3] = match mesh.normals.as_deref() {
            Some(attached) => attached,
            None => {
                computed = mesh.compute_vertex_normals();
                &computed
            }
        };

        let connectivity = HalfEdgeMesh::build(&mesh.faces);
        let mut elements = Vec::with_capacity(connectivity.half_edge_count() * 2);
        for face in 0..mesh.faces.len() {
            let mut edge = connectivity.face_half_edge(face as u32);
            for _ in 0..3 {
                elements.push(connectivity.origin(edge));
                let apex = connectivity
                    .opposite_apex(edge)
                    .unwrap_or_else(|| connectivity.own_apex(edge));
                elements.push(apex);
                edge = connectivity.next(edge);
            }
        }

        Self {
            positions: flatten(&mesh.positions),
            normals: flatten(normals),
            elements,
        }
    }
}

fn flatten(vectors: &[Vec3]) -> Vec<f32> {
    let mut flat = Vec::with_capacity(vectors.len() * 3);
    for v in vectors {
        flat.extend_from_slice(&v.to_array());
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scattered_points() -> Vec<Vec3> {
        vec![
            Vec3::new(-3.0, 2.0, 0.5),
            Vec3::new(4.0, -1.0, 2.0),
            Vec3::new(0.0, 7.0, -6.0),
            Vec3::new(1.0, 1.0, 1.0),
        ]
    }

    #[test]
    fn bbox_orders_min_and_max() {
        let aabb = Aabb::from_points(&scattered_points()).unwrap();
        assert_eq!(aabb.min, Vec3::new(-3.0, -1.0, -6.0));
        assert_eq!(aabb.max, Vec3::new(4.0, 7.0, 2.0));
        assert!(aabb.min.cmple(aabb.max).all());
    }

    #[test]
    fn bbox_contains_every_input_point() {
        let points = scattered_points();
        let aabb = Aabb::from_points(&points).unwrap();
        for point in points {
            assert!(point.cmpge(aabb.min).all(), "{point} below {}", aabb.min);
            assert!(point.cmple(aabb.max).all(), "{point} above {}", aabb.max);
        }
    }

    #[test]
    fn bbox_of_nothing_is_none() {
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn normalization_fits_longest_axis_to_unit() {
        let aabb = Aabb::from_points(&scattered_points()).unwrap();
        let transform = ViewTransform::from_aabb(&aabb);
        let extents = aabb.half_extents();
        let largest = extents.x.max(extents.y).max(extents.z);
        assert!((transform.scale * largest - 1.0).abs() < 1e-6);
    }

    #[test]
    fn unit_cube_normalizes_to_identity() {
        let corners = [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
        ];
        let aabb = Aabb::from_points(&corners).unwrap();
        let transform = ViewTransform::from_aabb(&aabb);
        assert!((transform.scale - 1.0).abs() < 1e-6);
        assert!(transform.center.length() < 1e-6);
    }

    #[test]
    fn single_point_keeps_unit_scale() {
        let aabb = Aabb::from_points(&[Vec3::splat(2.0)]).unwrap();
        let transform = ViewTransform::from_aabb(&aabb);
        assert_eq!(transform.scale, 1.0);
        assert_eq!(transform.center, Vec3::splat(2.0));
    }

    #[test]
    fn normalized_points_land_in_the_unit_cube() {
        let points = scattered_points();
        let aabb = Aabb::from_points(&points).unwrap();
        let transform = ViewTransform::from_aabb(&aabb);
        for point in points {
            let mapped = (point - transform.center) * transform.scale;
            assert!(mapped.abs().cmple(Vec3::splat(1.0 + 1e-6)).all());
        }
    }

    #[test]
    fn lone_triangle_mirrors_itself() {
        let mesh = TriMesh {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: None,
            faces: vec![[0, 1, 2]],
        };
        let geometry = GpuGeometry::extract(&mesh);

        assert_eq!(geometry.positions.len(), 9);
        assert_eq!(geometry.normals.len(), 9);
        // Corners interleaved with the face's own apexes.
        assert_eq!(geometry.elements, vec![0, 2, 1, 0, 2, 1]);
    }

    #[test]
    fn interior_edges_use_the_neighbour_apex() {
        let mesh = TriMesh {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
            normals: None,
            faces: vec![[0, 1, 2], [0, 2, 3]],
        };
        let geometry = GpuGeometry::extract(&mesh);

        assert_eq!(geometry.elements.len(), 12);
        // Face 0 edges: 0->1 open, 1->2 open, 2->0 shared with face 1.
        assert_eq!(
            &geometry.elements[..6],
            &[0, 2, 1, 0, 2, 3],
            "face corners at even slots, apexes at odd slots"
        );
        // Face 1 sees face 0's apex across the shared edge.
        assert_eq!(&geometry.elements[6..], &[0, 1, 2, 0, 3, 2]);
    }

    #[test]
    fn element_count_is_six_per_face() {
        let mesh = TriMesh {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z],
            normals: None,
            faces: vec![[0, 1, 2], [0, 3, 1], [1, 3, 2], [2, 3, 0]],
        };
        let geometry = GpuGeometry::extract(&mesh);
        assert_eq!(geometry.elements.len(), 24);
        let max = geometry.elements.iter().copied().max().unwrap();
        assert!((max as usize) < mesh.vertex_count());
    }
}
