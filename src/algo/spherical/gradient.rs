//! Gradient of the Dirichlet energy, projected onto the tangent planes.

use nalgebra::Vector3;

use crate::mesh::HalfEdgeMesh;

use super::energy::EnergyMode;
use super::fields::VertexFields;
use super::weights::EdgeWeights;

/// Fill `fields.gradient` and `fields.tangential_gradient` for every vertex.
///
/// The gradient at `v` is `Σ w(v, u) (p(v) - p(u))` over its neighbors `u`.
/// The tangential part removes the component along `fields.normal`, which
/// stays at the direction recorded when the mesh was projected.
pub fn compute_tangential_gradients(
    mesh: &HalfEdgeMesh,
    weights: &EdgeWeights,
    mode: EnergyMode,
    fields: &mut VertexFields,
) {
    for v in mesh.vertex_ids() {
        let p = mesh.position(v);
        let mut gradient = Vector3::zeros();
        for he in mesh.vertex_halfedges(v) {
            let w = mode.weight(weights, mesh.edge_of(he));
            gradient += (p - mesh.position(mesh.dest(he))) * w;
        }

        let i = v.index();
        let normal = fields.normal[i];
        fields.gradient[i] = gradient;
        fields.tangential_gradient[i] = gradient - normal * gradient.dot(&normal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::spherical::weights::cotangent_weights;
    use crate::mesh::{primitives, VertexId};
    use nalgebra::Point3;

    fn fields_with_radial_normals(mesh: &HalfEdgeMesh) -> VertexFields {
        let mut fields = VertexFields::new(mesh.num_vertices());
        for v in mesh.vertex_ids() {
            fields.normal[v.index()] = mesh.position(v).coords.normalize();
        }
        fields
    }

    #[test]
    fn test_octahedron_gradient_is_radial() {
        let mesh = primitives::octahedron().unwrap();
        let weights = EdgeWeights::uniform(mesh.num_edges());
        let mut fields = fields_with_radial_normals(&mesh);

        compute_tangential_gradients(&mesh, &weights, EnergyMode::Uniform, &mut fields);

        let g = fields.gradient[0];
        assert!((g - Vector3::new(4.0, 0.0, 0.0)).norm() < 1e-12);
        for v in mesh.vertex_ids() {
            assert!(fields.tangential_gradient(v).norm() < 1e-12);
        }
    }

    #[test]
    fn test_tangential_gradient_orthogonal_to_normal() {
        let mut mesh = primitives::icosphere(1).unwrap();
        mesh.set_position(VertexId::new(0), Point3::new(0.1, 0.6, -0.7));
        mesh.set_position(VertexId::new(5), Point3::new(-0.9, 0.2, 0.3));
        let weights = cotangent_weights(&mesh).unwrap();
        let mut fields = fields_with_radial_normals(&mesh);

        for mode in [EnergyMode::Uniform, EnergyMode::Cotangent] {
            compute_tangential_gradients(&mesh, &weights, mode, &mut fields);
            for v in mesh.vertex_ids() {
                let t = fields.tangential_gradient(v);
                assert!(t.dot(fields.normal(v)).abs() < 1e-12);
            }
        }
        assert!(fields.tangential_gradient[0].norm() > 1e-3);
    }
}
