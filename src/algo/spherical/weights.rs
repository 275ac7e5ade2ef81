//! Cotangent edge weights and face normals.
//!
//! Both are computed once from the input embedding, before the mesh is
//! projected onto the sphere, and stay constant for the whole run.

use std::ops::Index;

use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};
use crate::mesh::{EdgeId, HalfEdgeMesh};

/// Triangles whose two edge vectors at a corner span an angle with sine below
/// this are treated as having zero area.
pub(crate) const DEGENERATE_SINE: f64 = 1e-12;

/// One weight per edge, indexed by [`EdgeId`].
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeWeights {
    weights: Vec<f64>,
}

impl EdgeWeights {
    /// All weights equal to one.
    pub fn uniform(num_edges: usize) -> Self {
        Self {
            weights: vec![1.0; num_edges],
        }
    }

    /// Get the weight of an edge.
    #[inline]
    pub fn get(&self, e: EdgeId) -> f64 {
        self.weights[e.index()]
    }

    /// Weights in edge index order.
    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    /// Number of edges covered.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether there are no weights.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl Index<EdgeId> for EdgeWeights {
    type Output = f64;

    fn index(&self, e: EdgeId) -> &f64 {
        &self.weights[e.index()]
    }
}

/// Compute `w = ½(cot α + cot β)` for every edge, where α and β are the angles
/// opposite the edge in its two triangles.
///
/// # Errors
/// [`MeshError::ZeroAreaFace`] if either triangle next to an edge is
/// degenerate, since its cotangent is undefined.
pub fn cotangent_weights(mesh: &HalfEdgeMesh) -> Result<EdgeWeights> {
    let mut weights = Vec::with_capacity(mesh.num_edges());

    for e in mesh.edge_ids() {
        let [v1, v2] = mesh.edge_vertices(e);
        let p1 = mesh.position(v1);
        let p2 = mesh.position(v2);

        let he = mesh.edge_halfedge(e);
        let mut weight = 0.0;
        for side in [he, mesh.twin(he)] {
            let p3 = mesh.position(mesh.opposite_vertex(side));
            weight += half_cotangent(p1, p2, p3).ok_or(MeshError::ZeroAreaFace {
                face: mesh.face_of(side).index(),
            })?;
        }
        weights.push(weight);
    }

    Ok(EdgeWeights { weights })
}

/// Half the cotangent of the angle at `p3` in triangle (p1, p2, p3), or `None`
/// for a degenerate triangle.
fn half_cotangent(p1: &Point3<f64>, p2: &Point3<f64>, p3: &Point3<f64>) -> Option<f64> {
    let a = p1 - p3;
    let b = p2 - p3;
    let cross = a.cross(&b).norm();
    if !(cross > DEGENERATE_SINE * a.norm() * b.norm()) {
        return None;
    }
    Some(a.dot(&b) / cross / 2.0)
}

/// Compute the outward unit normal of every face from its winding.
///
/// # Errors
/// [`MeshError::ZeroAreaFace`] for a face whose normal is undefined.
pub fn face_normals(mesh: &HalfEdgeMesh) -> Result<Vec<Vector3<f64>>> {
    mesh.face_ids()
        .map(|f| {
            let [p0, p1, p2] = mesh.face_positions(f);
            let e1 = p1 - p0;
            let e2 = p2 - p0;
            let n = e1.cross(&e2);
            let len = n.norm();
            if !(len > DEGENERATE_SINE * e1.norm() * e2.norm()) {
                return Err(MeshError::ZeroAreaFace { face: f.index() });
            }
            Ok(n / len)
        })
        .collect()
}
