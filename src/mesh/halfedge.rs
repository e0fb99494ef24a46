//! Half-edge connectivity over a triangle face list.
//!
//! Every face contributes three directed half-edges stored contiguously in an
//! arena, so the half-edges of face `f` live at `3f..3f + 3`. Twin links pair
//! each half-edge with the oppositely directed one in the neighbouring face;
//! half-edges on an open boundary have no twin.

use std::collections::HashMap;

/// Index of a half-edge in the arena.
pub type HalfEdgeId = u32;
/// Index of a vertex in the owning mesh.
pub type VertexId = u32;
/// Index of a face in the owning mesh.
pub type FaceId = u32;

/// Sentinel for absent twin links.
const INVALID: u32 = u32::MAX;

/// One directed edge of a face.
#[derive(Debug, Clone, Copy)]
struct HalfEdge {
    /// Vertex this half-edge leaves from.
    origin: VertexId,
    /// Next half-edge around the same face.
    next: HalfEdgeId,
    /// Oppositely directed half-edge in the adjacent face, or [`INVALID`].
    twin: HalfEdgeId,
}

/// Connectivity arena for a triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct HalfEdgeMesh {
    half_edges: Vec<HalfEdge>,
}

impl HalfEdgeMesh {
    /// Build connectivity for a triangle face list.
    ///
    /// Directed edges are matched to their reverses to establish twins. If the
    /// same directed edge occurs twice the later face wins the pairing; this
    /// keeps non-manifold input loadable at the cost of one arbitrary link.
    #[must_use]
    pub fn build(faces: &[[u32; 3]]) -> Self {
        let mut half_edges = Vec::with_capacity(faces.len() * 3);
        let mut edge_map: HashMap<(VertexId, VertexId), HalfEdgeId> =
            HashMap::with_capacity(faces.len() * 3);

        for (face_index, face) in faces.iter().enumerate() {
            let base = (face_index * 3) as HalfEdgeId;
            for corner in 0..3 {
                let from = face[corner];
                let to = face[(corner + 1) % 3];
                let id = base + corner as HalfEdgeId;

                half_edges.push(HalfEdge {
                    origin: from,
                    next: base + ((corner as HalfEdgeId + 1) % 3),
                    twin: INVALID,
                });
                edge_map.insert((from, to), id);
            }
        }

        for id in 0..half_edges.len() {
            let HalfEdge { origin, next, .. } = half_edges[id];
            let to = half_edges[next as usize].origin;
            if let Some(&twin) = edge_map.get(&(to, origin)) {
                half_edges[id].twin = twin;
            }
        }

        Self { half_edges }
    }

    /// Number of half-edges in the arena, three per face.
    #[must_use]
    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }

    /// First half-edge of face `face`.
    #[must_use]
    pub fn face_half_edge(&self, face: FaceId) -> HalfEdgeId {
        face * 3
    }

    /// Origin vertex of half-edge `id`.
    #[must_use]
    pub fn origin(&self, id: HalfEdgeId) -> VertexId {
        self.half_edges[id as usize].origin
    }

    /// Next half-edge around the face of `id`.
    #[must_use]
    pub fn next(&self, id: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[id as usize].next
    }

    /// Twin of half-edge `id`, or `None` on an open boundary.
    #[must_use]
    pub fn twin(&self, id: HalfEdgeId) -> Option<HalfEdgeId> {
        let twin = self.half_edges[id as usize].twin;
        (twin != INVALID).then_some(twin)
    }

    /// Apex of the face across the edge of `id`.
    ///
    /// For the half-edge `a -> b` this is the one vertex of the neighbouring
    /// face that is neither `a` nor `b`. Returns `None` on a boundary.
    #[must_use]
    pub fn opposite_apex(&self, id: HalfEdgeId) -> Option<VertexId> {
        let twin = self.twin(id)?;
        Some(self.origin(self.next(self.next(twin))))
    }

    /// Apex of the own face of `id`: the corner not touching this edge.
    #[must_use]
    pub fn own_apex(&self, id: HalfEdgeId) -> VertexId {
        self.origin(self.next(self.next(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two triangles sharing the edge (0, 2):
    ///
    /// ```text
    /// 3---2
    /// | \ |
    /// 0---1
    /// ```
    fn shared_edge_faces() -> Vec<[u32; 3]> {
        vec![[0, 1, 2], [0, 2, 3]]
    }

    #[test]
    fn three_half_edges_per_face() {
        let he = HalfEdgeMesh::build(&shared_edge_faces());
        assert_eq!(he.half_edge_count(), 6);
        assert_eq!(he.face_half_edge(1), 3);
    }

    #[test]
    fn next_cycles_around_the_face() {
        let he = HalfEdgeMesh::build(&shared_edge_faces());
        let start = he.face_half_edge(0);
        let mut id = start;
        let mut origins = Vec::new();
        for _ in 0..3 {
            origins.push(he.origin(id));
            id = he.next(id);
        }
        assert_eq!(id, start);
        assert_eq!(origins, vec![0, 1, 2]);
    }

    #[test]
    fn twins_are_symmetric() {
        let he = HalfEdgeMesh::build(&shared_edge_faces());
        for id in 0..he.half_edge_count() as HalfEdgeId {
            if let Some(twin) = he.twin(id) {
                assert_eq!(he.twin(twin), Some(id));
                assert_ne!(he.origin(id), he.origin(twin));
            }
        }
    }

    #[test]
    fn interior_edge_finds_neighbour_apex() {
        let he = HalfEdgeMesh::build(&shared_edge_faces());
        // Face 0's half-edges start at origin 0, 1, 2; the edge 2 -> 0 is id 2.
        assert_eq!(he.origin(2), 2);
        assert_eq!(he.opposite_apex(2), Some(3));
        // And from the other side, edge 0 -> 2 in face 1 sees apex 1.
        assert_eq!(he.opposite_apex(3), Some(1));
    }

    #[test]
    fn boundary_edges_have_no_twin() {
        let he = HalfEdgeMesh::build(&shared_edge_faces());
        let boundary: Vec<HalfEdgeId> = (0..he.half_edge_count() as HalfEdgeId)
            .filter(|&id| he.twin(id).is_none())
            .collect();
        assert_eq!(boundary.len(), 4);
        for id in boundary {
            assert_eq!(he.opposite_apex(id), None);
        }
    }

    #[test]
    fn own_apex_is_the_remaining_corner() {
        let he = HalfEdgeMesh::build(&shared_edge_faces());
        // Edge 0 -> 1 of face 0 leaves corner 2 untouched.
        assert_eq!(he.own_apex(0), 2);
        assert_eq!(he.own_apex(1), 0);
        assert_eq!(he.own_apex(2), 1);
    }

    #[test]
    fn closed_fan_has_no_open_edges() {
        // A tetrahedron: every edge is interior.
        let faces = vec![[0, 1, 2], [0, 3, 1], [1, 3, 2], [2, 3, 0]];
        let he = HalfEdgeMesh::build(&faces);
        for id in 0..he.half_edge_count() as HalfEdgeId {
            assert!(he.twin(id).is_some(), "edge {id} unexpectedly open");
        }
    }
}
