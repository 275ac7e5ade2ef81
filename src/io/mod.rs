//! Mesh file I/O.
//!
//! This module provides functions for loading and saving closed triangle
//! meshes. Polygons are fan-triangulated on load. Positions are read and
//! written as `f64` so a saved embedding reloads onto the same sphere.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | Default output format |
//! | PLY | `.ply` | ✓ | ✓ | Stanford polygon format, ASCII output |
//!
//! # Usage
//!
//! ```no_run
//! use spheremap::io::{load, save};
//!
//! let mesh = load("model.obj").unwrap();
//! save(&mesh, "copy.ply").unwrap();
//! ```

pub mod obj;
pub mod ply;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::HalfEdgeMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Wavefront OBJ format.
    #[default]
    Obj,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }

    /// File extension written for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Obj => "obj",
            Format::Ply => "ply",
        }
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file with automatic format detection.
///
/// The format is determined by the file extension.
pub fn load<P: AsRef<Path>>(path: P) -> Result<HalfEdgeMesh> {
    let path = path.as_ref();
    let mesh = match detect(path)? {
        Format::Obj => obj::load(path)?,
        Format::Ply => ply::load(path)?,
    };
    log::debug!(
        "loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(mesh)
}

/// Save a mesh to a file with automatic format detection.
///
/// The format is determined by the file extension.
pub fn save<P: AsRef<Path>>(mesh: &HalfEdgeMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::save(mesh, path),
        Format::Ply => ply::save(mesh, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::primitives;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b/mesh.OBJ"), Some(Format::Obj));
        assert_eq!(Format::from_path("mesh.ply"), Some(Format::Ply));
        assert_eq!(Format::from_path("mesh.stl"), None);
        assert_eq!(Format::from_path("mesh"), None);
        assert_eq!(Format::Ply.extension(), "ply");
    }

    #[test]
    fn test_unsupported_extension() {
        let mesh = primitives::tetrahedron().unwrap();
        let err = save(&mesh, std::env::temp_dir().join("spheremap_unsupported.stl")).unwrap_err();
        assert!(matches!(err, MeshError::UnsupportedFormat { ref extension } if extension == "stl"));

        let err = load("no_extension").unwrap_err();
        assert!(matches!(err, MeshError::UnsupportedFormat { ref extension } if extension == "(none)"));
    }

    #[test]
    fn test_save_load_both_formats() {
        let mesh = primitives::icosphere(1).unwrap();
        for format in [Format::Obj, Format::Ply] {
            let path = std::env::temp_dir().join(format!(
                "spheremap_io_{}.{}",
                std::process::id(),
                format.extension()
            ));
            save(&mesh, &path).unwrap();
            let loaded = load(&path).unwrap();
            std::fs::remove_file(&path).ok();

            assert_eq!(loaded.num_vertices(), mesh.num_vertices());
            assert_eq!(loaded.num_faces(), mesh.num_faces());
            for v in mesh.vertex_ids() {
                assert_eq!(loaded.position(v), mesh.position(v));
            }
        }
    }
}
