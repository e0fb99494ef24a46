//! Triangle mesh container.
//!
//! A [`TriMesh`] is an indexed triangle soup: a vertex position table, an
//! optional parallel vertex normal table, and faces as triples of `u32`
//! indices into those tables. Faces are wound counter-clockwise when viewed
//! from outside the surface.

pub mod halfedge;
pub mod obj;

use glam::Vec3;

/// Normals shorter than this after accumulation are left untouched.
const NORMAL_EPSILON: f32 = 1e-10;

/// An indexed triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Per-vertex normals, parallel to `positions` when present.
    pub normals: Option<Vec<Vec3>>,
    /// Triangles as indices into `positions`.
    pub faces: Vec<[u32; 3]>,
}

impl TriMesh {
    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangular faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// True when the mesh holds no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// True when a vertex normal table is attached.
    #[must_use]
    pub fn has_vertex_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Attach computed vertex normals unless the mesh already carries some.
    pub fn ensure_vertex_normals(&mut self) {
        if self.normals.is_none() {
            self.normals = Some(self.compute_vertex_normals());
        }
    }

    /// Area-weighted vertex normals.
    ///
    /// Each face contributes its (unnormalized) cross-product normal to its
    /// three corners, so larger faces weigh more. Vertices touched by no face
    /// keep a zero normal.
    #[must_use]
    pub fn compute_vertex_normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];

        for &[ia, ib, ic] in &self.faces {
            let a = self.positions[ia as usize];
            let b = self.positions[ib as usize];
            let c = self.positions[ic as usize];
            let face_normal = (b - a).cross(c - a);

            normals[ia as usize] += face_normal;
            normals[ib as usize] += face_normal;
            normals[ic as usize] += face_normal;
        }

        for normal in &mut normals {
            let len = normal.length();
            if len > NORMAL_EPSILON {
                *normal /= len;
            }
        }

        normals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_plate() -> TriMesh {
        // Two coplanar triangles in the XZ plane, wound so normals face +Y.
        TriMesh {
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 1.0),
            ],
            normals: None,
            faces: vec![[0, 1, 2], [2, 1, 3]],
        }
    }

    #[test]
    fn counts_match_tables() {
        let mesh = flat_plate();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        assert!(!mesh.is_empty());
        assert!(!mesh.has_vertex_normals());
    }

    #[test]
    fn computed_normals_are_unit_and_face_up() {
        let mesh = flat_plate();
        let normals = mesh.compute_vertex_normals();
        assert_eq!(normals.len(), 4);
        for normal in normals {
            assert!((normal.length() - 1.0).abs() < 1e-6);
            assert!((normal - Vec3::Y).length() < 1e-6);
        }
    }

    #[test]
    fn ensure_keeps_existing_normals() {
        let mut mesh = flat_plate();
        mesh.normals = Some(vec![Vec3::X; 4]);
        mesh.ensure_vertex_normals();
        assert_eq!(mesh.normals.as_deref(), Some(&[Vec3::X; 4][..]));
    }

    #[test]
    fn ensure_computes_when_absent() {
        let mut mesh = flat_plate();
        mesh.ensure_vertex_normals();
        assert!(mesh.has_vertex_normals());
    }

    #[test]
    fn isolated_vertex_keeps_zero_normal() {
        let mut mesh = flat_plate();
        mesh.positions.push(Vec3::new(5.0, 5.0, 5.0));
        let normals = mesh.compute_vertex_normals();
        assert_eq!(normals[4], Vec3::ZERO);
    }
}
