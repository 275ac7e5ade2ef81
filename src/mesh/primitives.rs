//! Closed primitive meshes.
//!
//! Platonic solids centered at the origin with unit circumradius, plus an
//! icosphere built by repeated midpoint subdivision. All faces are wound
//! counter-clockwise when seen from outside, so every primitive is a valid
//! genus-0 input for the spherical maps.

use std::collections::HashMap;

use nalgebra::Point3;

use super::builder::build_from_triangles;
use super::halfedge::HalfEdgeMesh;
use crate::error::Result;

/// Create a regular tetrahedron.
pub fn tetrahedron() -> Result<HalfEdgeMesh> {
    let a = 1.0 / 3.0;
    let b = (8.0f64 / 9.0).sqrt();
    let c = (2.0f64 / 9.0).sqrt();
    let d = (2.0f64 / 3.0).sqrt();
    let vertices = [
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(-c, d, -a),
        Point3::new(-c, -d, -a),
        Point3::new(b, 0.0, -a),
    ];
    let faces = [[0, 1, 2], [0, 2, 3], [0, 3, 1], [3, 2, 1]];
    build_from_triangles(&vertices, &faces)
}

/// Create a regular octahedron with vertices on the coordinate axes.
pub fn octahedron() -> Result<HalfEdgeMesh> {
    let vertices = [
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(-1.0, 0.0, 0.0),
        Point3::new(0.0, -1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(0.0, 0.0, -1.0),
    ];
    let faces = [
        [0, 4, 3],
        [1, 4, 0],
        [2, 4, 1],
        [3, 4, 2],
        [3, 5, 0],
        [0, 5, 1],
        [1, 5, 2],
        [2, 5, 3],
    ];
    build_from_triangles(&vertices, &faces)
}

/// Create a cube whose square sides are each split into two triangles.
pub fn cube() -> Result<HalfEdgeMesh> {
    let a = 1.0 / 3.0f64.sqrt();
    let vertices = [
        Point3::new(-a, -a, -a),
        Point3::new(a, -a, -a),
        Point3::new(a, a, -a),
        Point3::new(-a, a, -a),
        Point3::new(-a, -a, a),
        Point3::new(a, -a, a),
        Point3::new(a, a, a),
        Point3::new(-a, a, a),
    ];
    let quads = [
        [3, 2, 1, 0],
        [2, 6, 5, 1],
        [5, 6, 7, 4],
        [0, 4, 7, 3],
        [3, 7, 6, 2],
        [1, 5, 4, 0],
    ];
    let faces: Vec<[usize; 3]> = quads
        .iter()
        .flat_map(|&[a, b, c, d]| [[a, b, c], [a, c, d]])
        .collect();
    build_from_triangles(&vertices, &faces)
}

const ICO_A: f64 = 0.5257311121191336;
const ICO_B: f64 = 0.8506508083520399;

fn icosahedron_soup() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices = vec![
        Point3::new(0.0, ICO_A, -ICO_B),
        Point3::new(ICO_A, ICO_B, 0.0),
        Point3::new(-ICO_A, ICO_B, 0.0),
        Point3::new(0.0, ICO_A, ICO_B),
        Point3::new(0.0, -ICO_A, ICO_B),
        Point3::new(-ICO_B, 0.0, ICO_A),
        Point3::new(0.0, -ICO_A, -ICO_B),
        Point3::new(ICO_B, 0.0, -ICO_A),
        Point3::new(ICO_B, 0.0, ICO_A),
        Point3::new(-ICO_B, 0.0, -ICO_A),
        Point3::new(ICO_A, -ICO_B, 0.0),
        Point3::new(-ICO_A, -ICO_B, 0.0),
    ];
    let faces = vec![
        [2, 1, 0],
        [1, 2, 3],
        [5, 4, 3],
        [4, 8, 3],
        [7, 6, 0],
        [6, 9, 0],
        [11, 10, 4],
        [10, 11, 6],
        [9, 5, 2],
        [5, 9, 11],
        [8, 7, 1],
        [7, 8, 10],
        [2, 5, 3],
        [8, 1, 3],
        [9, 2, 0],
        [1, 7, 0],
        [11, 9, 6],
        [7, 10, 6],
        [5, 11, 4],
        [10, 8, 4],
    ];
    (vertices, faces)
}

/// Create a regular icosahedron.
pub fn icosahedron() -> Result<HalfEdgeMesh> {
    let (vertices, faces) = icosahedron_soup();
    build_from_triangles(&vertices, &faces)
}

/// Create an icosphere by splitting every triangle of an icosahedron into four
/// `levels` times, pushing new vertices onto the unit sphere.
///
/// Level `n` has `20 * 4^n` faces.
pub fn icosphere(levels: usize) -> Result<HalfEdgeMesh> {
    let (mut vertices, mut faces) = icosahedron_soup();

    for _ in 0..levels {
        let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
        let mut split = Vec::with_capacity(faces.len() * 4);

        let mut midpoint = |a: usize, b: usize, vertices: &mut Vec<Point3<f64>>| {
            let key = (a.min(b), a.max(b));
            *midpoints.entry(key).or_insert_with(|| {
                let m = (vertices[a].coords + vertices[b].coords).normalize();
                vertices.push(Point3::from(m));
                vertices.len() - 1
            })
        };

        for &[a, b, c] in &faces {
            let ab = midpoint(a, b, &mut vertices);
            let bc = midpoint(b, c, &mut vertices);
            let ca = midpoint(c, a, &mut vertices);
            split.extend([[a, ab, ca], [ab, b, bc], [ca, bc, c], [ab, bc, ca]]);
        }
        faces = split;
    }

    build_from_triangles(&vertices, &faces)
}
