//! Mesh construction utilities.
//!
//! This module builds half-edge meshes from face-vertex lists as found in mesh
//! file formats, and converts them back. Only closed, edge- and
//! vertex-manifold triangle meshes with consistent winding are accepted.

use std::collections::HashMap;

use nalgebra::Point3;

use super::halfedge::{Edge, Face, HalfEdge, HalfEdgeMesh};
use super::index::{EdgeId, FaceId, HalfEdgeId, VertexId};
use crate::error::{MeshError, Result};

/// Build a half-edge mesh from vertices and triangle faces.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangle faces, each as [v0, v1, v2] indices with a
///   consistent (counter-clockwise seen from outside) winding
///
/// # Errors
/// Fails with a malformed-mesh error if the faces are empty, reference
/// missing vertices, repeat a vertex, leave an edge open, share a directed
/// edge, pinch a vertex, or leave a vertex unused.
///
/// # Example
/// ```
/// use spheremap::mesh::{build_from_triangles, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(1.0, 1.0, 1.0),
///     Point3::new(1.0, -1.0, -1.0),
///     Point3::new(-1.0, 1.0, -1.0),
///     Point3::new(-1.0, -1.0, 1.0),
/// ];
/// let faces = vec![[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]];
///
/// let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_edges(), 6);
/// ```
pub fn build_from_triangles(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> Result<HalfEdgeMesh> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(MeshError::DegenerateFace { face: fi });
        }
    }

    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), faces.len());
    for &pos in vertices {
        mesh.add_vertex(pos);
    }

    // Directed edge (v0, v1) -> half-edge running from v0 to v1
    let mut edge_map: HashMap<(usize, usize), HalfEdgeId> = HashMap::with_capacity(faces.len() * 3);
    let mut outgoing = vec![0usize; vertices.len()];

    for (fi, face) in faces.iter().enumerate() {
        let face_id = FaceId::new(fi);
        let base = mesh.num_halfedges();
        let ids = [
            HalfEdgeId::new(base),
            HalfEdgeId::new(base + 1),
            HalfEdgeId::new(base + 2),
        ];

        mesh.faces.push(Face { halfedge: ids[0] });

        for k in 0..3 {
            let from = face[k];
            let to = face[(k + 1) % 3];
            mesh.halfedges.push(HalfEdge {
                origin: VertexId::new(from),
                next: ids[(k + 1) % 3],
                prev: ids[(k + 2) % 3],
                face: face_id,
                ..HalfEdge::default()
            });
            mesh.vertex_mut(VertexId::new(from)).halfedge = ids[k];
            outgoing[from] += 1;

            if edge_map.insert((from, to), ids[k]).is_some() {
                return Err(MeshError::NonManifoldEdge { v0: from, v1: to });
            }
        }
    }

    // Pair twins in half-edge order so edge numbering is deterministic
    for i in 0..mesh.num_halfedges() {
        let he = HalfEdgeId::new(i);
        if mesh.twin(he).is_valid() {
            continue;
        }
        let from = mesh.origin(he).index();
        let to = mesh.origin(mesh.next(he)).index();
        let twin = *edge_map
            .get(&(to, from))
            .ok_or(MeshError::BoundaryEdge { v0: from, v1: to })?;

        let edge = EdgeId::new(mesh.num_edges());
        mesh.edges.push(Edge { halfedge: he });
        {
            let h = mesh.halfedge_mut(he);
            h.twin = twin;
            h.edge = edge;
        }
        {
            let t = mesh.halfedge_mut(twin);
            t.twin = he;
            t.edge = edge;
        }
    }

    // A manifold vertex reaches all of its outgoing half-edges in one ring walk
    for v in 0..mesh.num_vertices() {
        let vid = VertexId::new(v);
        if !mesh.vertex(vid).halfedge.is_valid() {
            return Err(MeshError::IsolatedVertex { vertex: v });
        }
        if mesh.valence(vid) != outgoing[v] {
            return Err(MeshError::NonManifoldVertex { vertex: v });
        }
    }

    Ok(mesh)
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Returns (vertices, faces) tuple.
pub fn to_face_vertex(mesh: &HalfEdgeMesh) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices = mesh.positions();

    let faces: Vec<[usize; 3]> = mesh
        .face_ids()
        .map(|f| {
            let [v0, v1, v2] = mesh.face_triangle(f);
            [v0.index(), v1.index(), v2.index()]
        })
        .collect();

    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        (vertices, faces)
    }

    #[test]
    fn test_closed_tetrahedron() {
        let (vertices, faces) = tetrahedron();
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 4);
        assert_eq!(mesh.num_halfedges(), 12);
        assert_eq!(mesh.num_edges(), 6);
        assert_eq!(mesh.euler_characteristic(), 2);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_roundtrip() {
        let (vertices, faces) = tetrahedron();
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        let (out_verts, out_faces) = to_face_vertex(&mesh);

        assert_eq!(out_faces, faces);
        for (v_in, v_out) in vertices.iter().zip(out_verts.iter()) {
            assert!((v_in - v_out).norm() < 1e-10);
        }
    }

    #[test]
    fn test_open_mesh_rejected() {
        let (vertices, faces) = tetrahedron();
        let result = build_from_triangles(&vertices, &faces[..3]);
        assert!(matches!(result, Err(MeshError::BoundaryEdge { .. })));
    }

    #[test]
    fn test_flipped_face_rejected() {
        let (vertices, mut faces) = tetrahedron();
        faces[0] = [0, 1, 2];
        let result = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::NonManifoldEdge { .. })));
    }

    #[test]
    fn test_pinched_vertex_rejected() {
        // Two tetrahedra sharing only vertex 0
        let (mut vertices, mut faces) = tetrahedron();
        vertices.extend([
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(-0.5, -1.0, 0.0),
            Point3::new(-0.5, -0.5, -1.0),
        ]);
        faces.extend([[0, 5, 4], [0, 4, 6], [4, 5, 6], [5, 0, 6]]);
        let result = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::NonManifoldVertex { vertex: 0 })));
    }

    #[test]
    fn test_isolated_vertex_rejected() {
        let (mut vertices, faces) = tetrahedron();
        vertices.push(Point3::new(5.0, 5.0, 5.0));
        let result = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::IsolatedVertex { vertex: 4 })));
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let faces = vec![[0, 1, 2]];
        let result = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::InvalidVertexIndex { face: 0, vertex: 1 })));
    }

    #[test]
    fn test_degenerate_face() {
        let (vertices, _) = tetrahedron();
        let result = build_from_triangles(&vertices, &[[0, 0, 2]]);
        assert!(matches!(result, Err(MeshError::DegenerateFace { face: 0 })));
    }

    #[test]
    fn test_empty_faces() {
        let (vertices, _) = tetrahedron();
        assert!(matches!(build_from_triangles(&vertices, &[]), Err(MeshError::EmptyMesh)));
    }
}
