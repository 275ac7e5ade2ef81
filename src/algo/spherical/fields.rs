//! Per-vertex working state of the mapping drivers.

use nalgebra::{Point3, Vector3};

use crate::mesh::VertexId;

/// Scratch attributes kept for every vertex, indexed by [`VertexId`].
///
/// All vectors have one entry per vertex and are allocated zeroed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexFields {
    /// Unit direction of the vertex from the centroid, fixed at projection.
    pub normal: Vec<Vector3<f64>>,
    /// Raw Dirichlet gradient.
    pub gradient: Vec<Vector3<f64>>,
    /// Gradient with its component along `normal` removed.
    pub tangential_gradient: Vec<Vector3<f64>>,
    /// Tangential gradient of the previous conjugate-gradient step.
    pub previous_tangential_gradient: Vec<Vector3<f64>>,
    /// Conjugate search direction.
    pub search_direction: Vec<Vector3<f64>>,
    /// Best position seen during the current line search.
    pub best_position: Vec<Point3<f64>>,
    /// A third of the area of the incident faces.
    pub area: Vec<f64>,
    /// Last Fletcher-Reeves coefficient.
    pub beta: Vec<f64>,
}

impl VertexFields {
    /// Allocate zeroed fields for `num_vertices` vertices.
    pub fn new(num_vertices: usize) -> Self {
        let zeros = vec![Vector3::zeros(); num_vertices];
        Self {
            normal: zeros.clone(),
            gradient: zeros.clone(),
            tangential_gradient: zeros.clone(),
            previous_tangential_gradient: zeros.clone(),
            search_direction: zeros,
            best_position: vec![Point3::origin(); num_vertices],
            area: vec![0.0; num_vertices],
            beta: vec![0.0; num_vertices],
        }
    }

    /// Number of vertices covered.
    pub fn len(&self) -> usize {
        self.normal.len()
    }

    /// Whether there are no vertices.
    pub fn is_empty(&self) -> bool {
        self.normal.is_empty()
    }

    /// Get the fixed normal of a vertex.
    #[inline]
    pub fn normal(&self, v: VertexId) -> &Vector3<f64> {
        &self.normal[v.index()]
    }

    /// Get the tangential gradient of a vertex.
    #[inline]
    pub fn tangential_gradient(&self, v: VertexId) -> &Vector3<f64> {
        &self.tangential_gradient[v.index()]
    }

    /// Get the search direction of a vertex.
    #[inline]
    pub fn search_direction(&self, v: VertexId) -> &Vector3<f64> {
        &self.search_direction[v.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let fields = VertexFields::new(4);
        assert_eq!(fields.len(), 4);
        assert!(!fields.is_empty());
        assert_eq!(fields.best_position.len(), 4);
        assert_eq!(*fields.normal(VertexId::new(3)), Vector3::zeros());
        assert!(fields.area.iter().all(|&a| a == 0.0));
    }
}
