//! OBJ format support via the `obj` crate

use crate::error::Result;
use obj::Obj;
use pose6d_core::{Point3f, TriangleMesh};
use std::path::Path;

/// Read a triangle mesh from an OBJ file, fan-triangulating polygons
pub fn read_obj_mesh(path: &Path) -> Result<TriangleMesh> {
    let obj = Obj::load(path)?;

    let vertices: Vec<Point3f> = obj
        .data
        .position
        .iter()
        .map(|p| Point3f::new(p[0], p[1], p[2]))
        .collect();

    let mut faces = Vec::new();
    for object in &obj.data.objects {
        for group in &object.groups {
            for poly in &group.polys {
                let indices: Vec<usize> = poly.0.iter().map(|tuple| tuple.0).collect();
                for i in 1..indices.len().saturating_sub(1) {
                    faces.push([indices[0], indices[i], indices[i + 1]]);
                }
            }
        }
    }

    Ok(TriangleMesh::from_vertices_and_faces(vertices, faces))
}
