//! # Spheremap
//!
//! Spherical parameterization of closed genus-0 triangle meshes.
//!
//! Spheremap maps every vertex of a closed, manifold, genus-0 mesh onto the
//! unit sphere while keeping the mesh connectivity. It runs three stages:
//! a star map (central projection from the vertex centroid), a Tutte map
//! (gradient descent on the uniform Dirichlet energy), and a harmonic map
//! (nonlinear conjugate gradient on the cotangent-weighted Dirichlet energy).
//!
//! ## Features
//!
//! - **Half-edge data structure**: O(1) adjacency queries with type-safe indices
//! - **Strict input validation**: open, non-manifold, degenerate, and
//!   higher-genus meshes are rejected with a typed [`error::MeshError`]
//! - **File formats**: OBJ and PLY, read and written at `f64` precision
//! - **Progress reporting**: optional callbacks on a sparse iteration schedule
//!
//! ## Quick Start
//!
//! ```no_run
//! use spheremap::prelude::*;
//!
//! let mesh = spheremap::io::load("bunny.obj").unwrap();
//! let (sphere, report) = spherical_parameterization(
//!     mesh,
//!     &SphericalOptions::default(),
//!     &Progress::none(),
//!     |stage, mesh| spheremap::io::save(mesh, format!("out_{}.obj", stage.file_suffix())),
//! )
//! .unwrap();
//!
//! println!("Tutte: {} iterations", report.tutte.iterations);
//! println!("{} vertices on the sphere", sphere.num_vertices());
//! ```
//!
//! ## Driving the Stages by Hand
//!
//! ```
//! use spheremap::prelude::*;
//! use spheremap::algo::spherical::{harmonic_map, tutte_map, HarmonicOptions, TutteOptions};
//!
//! let mesh = spheremap::mesh::primitives::icosahedron().unwrap();
//! let mut ctx = SphereContext::new(mesh).unwrap();
//! ctx.project_to_unit_sphere().unwrap();
//!
//! let tutte = tutte_map(&mut ctx, &TutteOptions::default(), &Progress::none()).unwrap();
//! let harmonic = harmonic_map(&mut ctx, &HarmonicOptions::default(), &Progress::none()).unwrap();
//! assert!(tutte.converged && harmonic.converged);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use spheremap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::spherical::{
        spherical_parameterization, EnergyMode, MapReport, SphereContext, SphericalOptions, Stage,
    };
    pub use crate::algo::{IterationUpdate, Progress};
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_triangles, to_face_vertex, EdgeId, FaceId, HalfEdgeId, HalfEdgeMesh, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_tetrahedron_maps_to_sphere() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![
            [0, 2, 1], // bottom
            [0, 1, 3], // front
            [1, 2, 3], // right
            [2, 0, 3], // left
        ];
        let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();

        let (sphere, report) =
            spherical_parameterization(mesh, &SphericalOptions::default(), &Progress::none(), |_, _| Ok(()))
                .unwrap();

        assert_eq!(report.tutte.stage, Stage::Tutte);
        assert!(report.harmonic.is_some());
        assert_eq!(to_face_vertex(&sphere).1, faces);
        for v in sphere.vertex_ids() {
            assert!((sphere.position(v).coords.norm() - 1.0).abs() < 1e-9);
        }
    }
}
