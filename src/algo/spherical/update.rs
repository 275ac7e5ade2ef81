//! Position updates that keep every vertex on the unit sphere.

use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeMesh, VertexId};

use super::fields::VertexFields;

/// Vertices closer than this to the projection center have no direction.
pub(crate) const MIN_RADIUS: f64 = 1e-12;

/// Unit direction from `center` to `p`, or the offending vertex as an error.
fn direction(v: VertexId, p: &Point3<f64>, center: &Point3<f64>) -> Result<Vector3<f64>> {
    let r = p - center;
    let len = r.norm();
    if !(len > MIN_RADIUS) {
        return Err(MeshError::CoincidentVertex { vertex: v.index() });
    }
    Ok(r / len)
}

/// Move `p` back onto the unit sphere. A zero vector has no direction and
/// leaves `fallback` in place.
#[inline]
fn reproject(moved: Vector3<f64>, fallback: Point3<f64>) -> Point3<f64> {
    let len = moved.norm();
    if len > 0.0 {
        Point3::from(moved / len)
    } else {
        fallback
    }
}

/// Central projection about the vertex centroid (the star map).
///
/// Every vertex becomes its unit direction from the centroid, and that
/// direction is stored as the vertex normal.
///
/// # Errors
/// [`MeshError::CoincidentVertex`] if a vertex sits on the centroid. The mesh
/// is left untouched in that case.
pub fn project_to_unit_sphere(mesh: &mut HalfEdgeMesh, fields: &mut VertexFields) -> Result<()> {
    let center = mesh.centroid().ok_or(MeshError::EmptyMesh)?;
    let directions = mesh
        .vertex_ids()
        .map(|v| direction(v, mesh.position(v), &center))
        .collect::<Result<Vec<_>>>()?;

    for (i, dir) in directions.into_iter().enumerate() {
        mesh.set_position(VertexId::new(i), Point3::from(dir));
        fields.normal[i] = dir;
    }
    Ok(())
}

/// One explicit descent step: `p ← normalize(p - step * tangential_gradient)`.
pub fn apply_gradient_step(mesh: &mut HalfEdgeMesh, fields: &VertexFields, step_size: f64) {
    for (i, t) in fields.tangential_gradient.iter().enumerate() {
        let v = VertexId::new(i);
        let p = *mesh.position(v);
        mesh.set_position(v, reproject(p.coords - t * step_size, p));
    }
}

/// Displace along the search direction: `p ← normalize(p + alpha * search)`.
pub fn displace_along_search(mesh: &mut HalfEdgeMesh, fields: &VertexFields, alpha: f64) {
    for (i, d) in fields.search_direction.iter().enumerate() {
        let v = VertexId::new(i);
        let p = *mesh.position(v);
        mesh.set_position(v, reproject(p.coords + d * alpha, p));
    }
}

/// Copy the current positions into `out`.
pub(crate) fn snapshot_positions(mesh: &HalfEdgeMesh, out: &mut [Point3<f64>]) {
    for (slot, v) in out.iter_mut().zip(mesh.vertex_ids()) {
        *slot = *mesh.position(v);
    }
}

/// Re-center the embedding on its area-weighted center of mass and project
/// back onto the unit sphere.
///
/// Refreshes `face_areas` and `fields.area` (a third of the incident face
/// area per vertex) from the current positions. Normals are not updated.
///
/// # Errors
/// [`MeshError::ZeroTotalArea`] when all faces have collapsed, and
/// [`MeshError::CoincidentVertex`] when a vertex sits on the center of mass.
/// The positions are left untouched in both cases.
pub fn recenter_by_area(
    mesh: &mut HalfEdgeMesh,
    fields: &mut VertexFields,
    face_areas: &mut [f64],
) -> Result<()> {
    for f in mesh.face_ids() {
        face_areas[f.index()] = mesh.face_area(f);
    }
    for v in mesh.vertex_ids() {
        fields.area[v.index()] = mesh.vertex_faces(v).map(|f| face_areas[f.index()]).sum::<f64>() / 3.0;
    }

    let mass: f64 = fields.area.iter().sum();
    if !(mass > 0.0) {
        return Err(MeshError::ZeroTotalArea);
    }
    let weighted = mesh
        .vertex_ids()
        .fold(Vector3::zeros(), |acc, v| acc + mesh.position(v).coords * fields.area[v.index()]);
    let center = Point3::from(weighted / mass);

    let directions = mesh
        .vertex_ids()
        .map(|v| direction(v, mesh.position(v), &center))
        .collect::<Result<Vec<_>>>()?;
    for (i, dir) in directions.into_iter().enumerate() {
        mesh.set_position(VertexId::new(i), Point3::from(dir));
    }
    Ok(())
}
