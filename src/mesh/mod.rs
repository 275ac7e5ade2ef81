//! Core mesh data structures.
//!
//! This module provides the half-edge mesh representation used by the
//! spherical mapping algorithms.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`], which represents a closed triangle
//! mesh using a half-edge (doubly-connected edge list) data structure. Every
//! traversal the mapping passes need (all vertices, all edges, all faces, the
//! 1-ring of a vertex, the vertices opposite an edge) is an O(1) step or a
//! restartable iterator.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`EdgeId`] - Identifies a full edge
//! - [`FaceId`] - Identifies a face
//!
//! # Construction
//!
//! Meshes are constructed from file I/O, from face-vertex lists, or from the
//! [`primitives`]:
//!
//! ```
//! use spheremap::mesh::{build_from_triangles, primitives, HalfEdgeMesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(1.0, 1.0, 1.0),
//!     Point3::new(1.0, -1.0, -1.0),
//!     Point3::new(-1.0, 1.0, -1.0),
//!     Point3::new(-1.0, -1.0, 1.0),
//! ];
//! let faces = vec![[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]];
//! let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let octahedron = primitives::octahedron().unwrap();
//! assert_eq!(octahedron.num_edges(), 12);
//! ```

mod builder;
mod halfedge;
mod index;
pub mod primitives;

pub use builder::{build_from_triangles, to_face_vertex};
pub use halfedge::{Edge, Face, FaceHalfEdgeIter, HalfEdge, HalfEdgeMesh, Vertex, VertexHalfEdgeIter};
pub use index::{EdgeId, FaceId, HalfEdgeId, VertexId};
