//! Dirichlet energy of a spherical embedding.

use crate::mesh::{EdgeId, HalfEdgeMesh};

use super::weights::EdgeWeights;

/// Edge weighting used by the energy and its gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnergyMode {
    /// Every edge weighs one. Drives the Tutte map.
    #[default]
    Uniform,
    /// Cotangent weights of the input embedding. Drives the harmonic map.
    Cotangent,
}

impl EnergyMode {
    /// Weight of an edge under this mode.
    #[inline]
    pub fn weight(self, weights: &EdgeWeights, e: EdgeId) -> f64 {
        match self {
            EnergyMode::Uniform => 1.0,
            EnergyMode::Cotangent => weights[e],
        }
    }
}

/// Sum of `w(e) * |p(v1) - p(v2)|²` over all edges.
pub fn dirichlet_energy(mesh: &HalfEdgeMesh, weights: &EdgeWeights, mode: EnergyMode) -> f64 {
    mesh.edge_ids()
        .map(|e| {
            let [a, b] = mesh.edge_vertices(e);
            mode.weight(weights, e) * (mesh.position(a) - mesh.position(b)).norm_squared()
        })
        .sum()
}
