//! Mesh plus the attribute tables the mapping drivers work on.

use nalgebra::Vector3;

use crate::error::{MeshError, Result};
use crate::mesh::HalfEdgeMesh;

use super::energy::{dirichlet_energy, EnergyMode};
use super::fields::VertexFields;
use super::gradient::compute_tangential_gradients;
use super::update;
use super::weights::{cotangent_weights, face_normals, EdgeWeights};

/// A closed genus-0 mesh being mapped onto the unit sphere.
///
/// Owns the mesh for the duration of the run together with the edge weights
/// and face normals of the input embedding and the per-vertex scratch fields.
#[derive(Debug, Clone)]
pub struct SphereContext {
    pub(super) mesh: HalfEdgeMesh,
    pub(super) weights: EdgeWeights,
    pub(super) face_normals: Vec<Vector3<f64>>,
    pub(super) face_areas: Vec<f64>,
    pub(super) fields: VertexFields,
}

impl SphereContext {
    /// Take ownership of `mesh`, check its topology, and compute the cotangent
    /// weights and face normals of its current embedding.
    ///
    /// # Errors
    /// [`MeshError::EmptyMesh`] without faces, [`MeshError::NotGenusZero`] when
    /// `V - E + F != 2`, and [`MeshError::ZeroAreaFace`] for a degenerate face.
    pub fn new(mesh: HalfEdgeMesh) -> Result<Self> {
        if mesh.num_faces() == 0 {
            return Err(MeshError::EmptyMesh);
        }
        let euler = mesh.euler_characteristic();
        if euler != 2 {
            return Err(MeshError::NotGenusZero { euler });
        }

        let weights = cotangent_weights(&mesh)?;
        let face_normals = face_normals(&mesh)?;
        let fields = VertexFields::new(mesh.num_vertices());
        let face_areas = vec![0.0; mesh.num_faces()];

        log::debug!(
            "prepared {} vertices, {} edges, {} faces",
            mesh.num_vertices(),
            mesh.num_edges(),
            mesh.num_faces()
        );

        Ok(Self {
            mesh,
            weights,
            face_normals,
            face_areas,
            fields,
        })
    }

    /// The mesh in its current embedding.
    pub fn mesh(&self) -> &HalfEdgeMesh {
        &self.mesh
    }

    /// Give the mesh back.
    pub fn into_mesh(self) -> HalfEdgeMesh {
        self.mesh
    }

    /// Cotangent weights of the input embedding.
    pub fn weights(&self) -> &EdgeWeights {
        &self.weights
    }

    /// Unit normals of the input embedding, indexed by face.
    pub fn face_normals(&self) -> &[Vector3<f64>] {
        &self.face_normals
    }

    /// Face areas as of the last [`recenter_by_area`](Self::recenter_by_area).
    pub fn face_areas(&self) -> &[f64] {
        &self.face_areas
    }

    /// Per-vertex scratch fields.
    pub fn fields(&self) -> &VertexFields {
        &self.fields
    }

    /// Star map onto the unit sphere. Also fixes the vertex normals used by
    /// every later gradient projection.
    pub fn project_to_unit_sphere(&mut self) -> Result<()> {
        update::project_to_unit_sphere(&mut self.mesh, &mut self.fields)
    }

    /// Dirichlet energy of the current embedding.
    pub fn energy(&self, mode: EnergyMode) -> f64 {
        dirichlet_energy(&self.mesh, &self.weights, mode)
    }

    /// Refresh the raw and tangential gradients.
    pub fn compute_gradients(&mut self, mode: EnergyMode) {
        compute_tangential_gradients(&self.mesh, &self.weights, mode, &mut self.fields);
    }

    /// Step against the tangential gradient and re-normalize.
    pub fn apply_gradient_step(&mut self, step_size: f64) {
        update::apply_gradient_step(&mut self.mesh, &self.fields, step_size);
    }

    /// Re-center on the area-weighted center of mass.
    pub fn recenter_by_area(&mut self) -> Result<()> {
        update::recenter_by_area(&mut self.mesh, &mut self.fields, &mut self.face_areas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_triangles, primitives, to_face_vertex};
    use nalgebra::Point3;

    #[test]
    fn test_new_computes_tables() {
        let ctx = SphereContext::new(primitives::icosahedron().unwrap()).unwrap();
        assert_eq!(ctx.weights().len(), 30);
        assert_eq!(ctx.face_normals().len(), 20);
        assert_eq!(ctx.face_areas().len(), 20);
        assert_eq!(ctx.fields().len(), 12);
    }

    #[test]
    fn test_torus_rejected() {
        // 3x3 grid on a torus: V=9, E=27, F=18
        let n = 3;
        let mut vertices = Vec::new();
        for i in 0..n {
            for j in 0..n {
                let u = i as f64 / n as f64 * std::f64::consts::TAU;
                let v = j as f64 / n as f64 * std::f64::consts::TAU;
                vertices.push(Point3::new(
                    (2.0 + v.cos()) * u.cos(),
                    (2.0 + v.cos()) * u.sin(),
                    v.sin(),
                ));
            }
        }
        let idx = |i: usize, j: usize| (i % n) * n + (j % n);
        let mut faces = Vec::new();
        for i in 0..n {
            for j in 0..n {
                faces.push([idx(i, j), idx(i + 1, j), idx(i + 1, j + 1)]);
                faces.push([idx(i, j), idx(i + 1, j + 1), idx(i, j + 1)]);
            }
        }
        let mesh = build_from_triangles(&vertices, &faces).unwrap();
        let result = SphereContext::new(mesh);
        assert!(matches!(result, Err(MeshError::NotGenusZero { euler: 0 })));
    }

    #[test]
    fn test_projection_then_energy() {
        let (vertices, faces) = to_face_vertex(&primitives::octahedron().unwrap());
        let scaled: Vec<Point3<f64>> = vertices.iter().map(|p| Point3::from(p.coords * 5.0)).collect();
        let mut ctx = SphereContext::new(build_from_triangles(&scaled, &faces).unwrap()).unwrap();

        assert!((ctx.energy(EnergyMode::Uniform) - 600.0).abs() < 1e-9);
        ctx.project_to_unit_sphere().unwrap();
        assert!((ctx.energy(EnergyMode::Uniform) - 24.0).abs() < 1e-12);

        ctx.compute_gradients(EnergyMode::Uniform);
        ctx.apply_gradient_step(0.01);
        ctx.recenter_by_area().unwrap();
        let mesh = ctx.into_mesh();
        assert!((mesh.position(crate::mesh::VertexId::new(0)).coords - nalgebra::Vector3::x()).norm() < 1e-12);
    }
}
