//! Wavefront OBJ format support.
//!
//! Only vertex positions and faces are read. Texture coordinates, normals,
//! groups, and materials are ignored, and polygons are fan-triangulated.
//! Every object in the file becomes part of the same mesh, and vertices
//! with bit-identical positions are merged into one.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, to_face_vertex, HalfEdgeMesh};

/// Load a mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use spheremap::io::obj;
///
/// let mesh = obj::load("bunny.obj").unwrap();
/// println!("{} vertices", mesh.num_vertices());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<HalfEdgeMesh> {
    let path = path.as_ref();
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: false,
        ..Default::default()
    };
    let (models, _) = tobj::load_obj(path, &options).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    // tobj renumbers positions per group, so vertices shared between groups
    // are merged back on their exact coordinates
    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut merged: HashMap<[u64; 3], usize> = HashMap::new();
    let mut faces: Vec<[usize; 3]> = Vec::new();
    for model in models {
        let mesh = model.mesh;
        if mesh.positions.len() % 3 != 0 || mesh.indices.len() % 3 != 0 {
            return Err(MeshError::LoadError {
                path: path.to_path_buf(),
                message: format!("object '{}' has a truncated coordinate or index list", model.name),
            });
        }
        let remap: Vec<usize> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| {
                let key = [p[0].to_bits(), p[1].to_bits(), p[2].to_bits()];
                *merged.entry(key).or_insert_with(|| {
                    vertices.push(Point3::new(p[0], p[1], p[2]));
                    vertices.len() - 1
                })
            })
            .collect();
        for f in mesh.indices.chunks_exact(3) {
            let mut face = [0; 3];
            for (slot, &i) in face.iter_mut().zip(f) {
                *slot = *remap.get(i as usize).ok_or_else(|| MeshError::LoadError {
                    path: path.to_path_buf(),
                    message: format!("object '{}' references missing position {}", model.name, i),
                })?;
            }
            faces.push(face);
        }
    }

    build_from_triangles(&vertices, &faces)
}

/// Save a mesh to an OBJ file.
///
/// Coordinates are written with the shortest representation that reads back
/// as the same `f64`.
pub fn save<P: AsRef<Path>>(mesh: &HalfEdgeMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let (vertices, faces) = to_face_vertex(mesh);

    writeln!(writer, "# Generated by spheremap")?;
    writeln!(writer, "# {} vertices, {} faces", vertices.len(), faces.len())?;
    for v in &vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for f in &faces {
        writeln!(writer, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::primitives;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("spheremap_obj_{}_{}.obj", std::process::id(), name))
    }

    #[test]
    fn test_roundtrip_is_exact() {
        let mesh = primitives::icosphere(2).unwrap();
        let path = temp_path("roundtrip");
        save(&mesh, &path).unwrap();
        let loaded = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.num_vertices(), mesh.num_vertices());
        assert_eq!(to_face_vertex(&loaded).1, to_face_vertex(&mesh).1);
        for v in mesh.vertex_ids() {
            assert_eq!(loaded.position(v), mesh.position(v));
        }
    }

    #[test]
    fn test_quads_and_extra_attributes() {
        let path = temp_path("quads");
        let text = "# cube\nv -1 -1 -1\nv 1 -1 -1\nv 1 1 -1\nv -1 1 -1\n\
                    v -1 -1 1\nv 1 -1 1\nv 1 1 1\nv -1 1 1\nvn 0 0 1\n\
                    f 4 3 2 1\nf 3 7 6 2\nf 6 7 8 5\nf 1 5 8 4\nf 4 8 7 3\nf 2 6 5 1\n";
        std::fs::write(&path, text).unwrap();
        let mesh = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_faces(), 12);
        assert_eq!(mesh.num_edges(), 18);
    }

    #[test]
    fn test_groups_share_vertices() {
        let path = temp_path("groups");
        let text = "v 1 0 0\nv 0 1 0\nv -1 0 0\nv 0 -1 0\nv 0 0 1\nv 0 0 -1\n\
                    g top\nf 1 2 5\nf 2 3 5\nf 3 4 5\nf 4 1 5\n\
                    g bottom\nf 2 1 6\nf 3 2 6\nf 4 3 6\nf 1 4 6\n";
        std::fs::write(&path, text).unwrap();
        let mesh = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.num_faces(), 8);
        assert_eq!(mesh.num_edges(), 12);
        assert_eq!(mesh.euler_characteristic(), 2);
        for v in mesh.vertex_ids() {
            assert_eq!(mesh.valence(v), 4);
        }
    }

    #[test]
    fn test_open_mesh_is_malformed() {
        let path = temp_path("open");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let result = load(&path);
        std::fs::remove_file(&path).ok();

        let err = result.unwrap_err();
        assert!(err.is_malformed());
        assert!(matches!(err, MeshError::BoundaryEdge { .. }));
    }

    #[test]
    fn test_missing_file() {
        let result = load(temp_path("missing"));
        assert!(matches!(result, Err(MeshError::LoadError { .. })));
    }
}
