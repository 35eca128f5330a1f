//! Vertex color codings for pose solving
//!
//! NOCS (Normalized Object Coordinate Space) colors a vertex by its position
//! normalized into the mesh bounding box, which makes the coding directly
//! invertible: a rendered pixel color decodes back to the 3D point it came
//! from. The latitude/longitude coding uses the per-vertex anatomical mapping
//! instead and needs a nearest-color lookup to invert.

use pose6d_core::{Bounds, Error, LatLonTable, Point3f, Result, TriangleMesh};

/// NOCS colors for every vertex: position normalized into the bounding box
pub fn nocs_colors(mesh: &TriangleMesh) -> Result<Vec<[f32; 3]>> {
    let bounds = mesh.bounds()?;
    let extent = bounds.extent();
    for i in 0..3 {
        if extent[i] <= 0.0 {
            return Err(Error::InvalidData(
                "mesh is flat along an axis, NOCS coding is not invertible".into(),
            ));
        }
    }
    Ok(mesh
        .vertices
        .iter()
        .map(|v| {
            [
                (v.x - bounds.min.x) / extent.x,
                (v.y - bounds.min.y) / extent.y,
                (v.z - bounds.min.z) / extent.z,
            ]
        })
        .collect())
}

/// Invert [`nocs_colors`]: the object-space point a NOCS color encodes
pub fn nocs_to_point(color: [f32; 3], bounds: &Bounds) -> Point3f {
    let extent = bounds.extent();
    Point3f::new(
        bounds.min.x + color[0] * extent.x,
        bounds.min.y + color[1] * extent.y,
        bounds.min.z + color[2] * extent.z,
    )
}

/// Latitude/longitude colors: `[latitude, longitude, 0]` per vertex
pub fn latlon_colors(table: &LatLonTable) -> Vec<[f32; 3]> {
    table.iter().map(|(lat, lon)| [lat, lon, 0.0]).collect()
}

/// Uniform gray, the coloring used for meshes without an identifying coding
pub fn uniform_colors(mesh: &TriangleMesh) -> Vec<[f32; 3]> {
    vec![[0.5, 0.5, 0.5]; mesh.vertex_count()]
}

/// Whether a color array can identify vertices: a constant coloring carries
/// no correspondence information
pub fn has_gradient(colors: &[[f32; 3]]) -> bool {
    colors.windows(2).any(|w| w[0] != w[1])
}
