//! Error types for spheremap.
//!
//! Errors fall into three groups: malformed input meshes (see
//! [`MeshError::is_malformed`]), file I/O failures, and optimization loops
//! that hit their iteration ceiling.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while loading, validating or mapping a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face repeats a vertex index.
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A directed edge is used by more than one face, so the undirected edge
    /// has more than two incident faces or inconsistent winding.
    #[error("edge ({v0}, {v1}) has more than two incident faces or inconsistent orientation")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// An edge has only one incident face.
    #[error("edge ({v0}, {v1}) lies on an open boundary")]
    BoundaryEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// The faces around a vertex do not form a single fan.
    #[error("vertex {vertex} is non-manifold (its faces form more than one fan)")]
    NonManifoldVertex {
        /// The vertex index.
        vertex: usize,
    },

    /// A vertex is not referenced by any face.
    #[error("vertex {vertex} is not used by any face")]
    IsolatedVertex {
        /// The vertex index.
        vertex: usize,
    },

    /// The surface is closed but not topologically a sphere.
    #[error("mesh is not genus 0 (Euler characteristic {euler}, expected 2)")]
    NotGenusZero {
        /// The Euler characteristic V - E + F.
        euler: i64,
    },

    /// A triangle has zero area, so its normal and cotangents are undefined.
    #[error("face {face} has zero area")]
    ZeroAreaFace {
        /// The face index.
        face: usize,
    },

    /// A vertex coincides with the centroid it is projected away from.
    #[error("vertex {vertex} coincides with the centroid and cannot be projected onto the sphere")]
    CoincidentVertex {
        /// The vertex index.
        vertex: usize,
    },

    /// Every face of the mesh has zero area.
    #[error("mesh has zero total area")]
    ZeroTotalArea,

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// An optimization loop stopped at its iteration ceiling.
    #[error("{stage} map failed to converge after {iterations} iterations")]
    ConvergenceFailed {
        /// Name of the map being computed.
        stage: &'static str,
        /// Number of iterations attempted.
        iterations: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Whether this error describes input that is not a valid closed,
    /// manifold, genus-0 triangle mesh with non-degenerate geometry.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            MeshError::EmptyMesh
                | MeshError::InvalidVertexIndex { .. }
                | MeshError::DegenerateFace { .. }
                | MeshError::NonManifoldEdge { .. }
                | MeshError::BoundaryEdge { .. }
                | MeshError::NonManifoldVertex { .. }
                | MeshError::IsolatedVertex { .. }
                | MeshError::NotGenusZero { .. }
                | MeshError::ZeroAreaFace { .. }
                | MeshError::CoincidentVertex { .. }
                | MeshError::ZeroTotalArea
        )
    }
}
