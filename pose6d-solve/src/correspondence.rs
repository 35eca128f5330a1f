//! 2D-3D correspondence extraction from color-coded renders

use crate::color::nocs_to_point;
use crate::render::ColorRender;
use kiddo::{KdTree, SquaredEuclidean};
use pose6d_core::{Bounds, Error, Point2d, Point3d, Point3f, Result};
use rayon::prelude::*;

/// Paired 2D pixel positions and 3D object points
#[derive(Debug, Clone, Default)]
pub struct Correspondences {
    pub points2d: Vec<Point2d>,
    pub points3d: Vec<Point3d>,
}

impl Correspondences {
    pub fn len(&self) -> usize {
        self.points2d.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points2d.is_empty()
    }
}

/// Pixel center of the sample at `(x, y)`
fn pixel_center(x: u32, y: u32) -> Point2d {
    Point2d::new(x as f64, y as f64)
}

/// Decode a NOCS-colored render into correspondences
///
/// Every non-background pixel color is inverted through the mesh bounds back
/// to the object-space point it encodes.
pub fn correspondences_nocs(render: &ColorRender, bounds: &Bounds) -> Correspondences {
    let rows: Vec<(Vec<Point2d>, Vec<Point3d>)> = (0..render.height)
        .into_par_iter()
        .map(|y| {
            let mut points2d = Vec::new();
            let mut points3d = Vec::new();
            for (x, &color) in render.row(y).iter().enumerate() {
                if ColorRender::is_background(color) {
                    continue;
                }
                points2d.push(pixel_center(x as u32, y));
                points3d.push(nocs_to_point(color, bounds).cast::<f64>());
            }
            (points2d, points3d)
        })
        .collect();

    let mut all = Correspondences::default();
    for (points2d, points3d) in rows {
        all.points2d.extend(points2d);
        all.points3d.extend(points3d);
    }
    all
}

/// Decode a render whose coloring is not invertible (latitude/longitude) by
/// nearest-color lookup against the per-vertex colors
///
/// `colors[i]` is the color vertex `vertices[i]` was rendered with.
pub fn correspondences_lookup(
    render: &ColorRender,
    colors: &[[f32; 3]],
    vertices: &[Point3f],
) -> Result<Correspondences> {
    if colors.len() != vertices.len() {
        return Err(Error::InvalidData(format!(
            "color count {} does not match vertex count {}",
            colors.len(),
            vertices.len()
        )));
    }
    if vertices.is_empty() {
        return Err(Error::NoMesh);
    }

    let mut tree: KdTree<f64, 3> = KdTree::new();
    for (i, color) in colors.iter().enumerate() {
        tree.add(
            &[color[0] as f64, color[1] as f64, color[2] as f64],
            i as u64,
        );
    }

    let rows: Vec<(Vec<Point2d>, Vec<Point3d>)> = (0..render.height)
        .into_par_iter()
        .map(|y| {
            let mut points2d = Vec::new();
            let mut points3d = Vec::new();
            for (x, &color) in render.row(y).iter().enumerate() {
                if ColorRender::is_background(color) {
                    continue;
                }
                let query = [color[0] as f64, color[1] as f64, color[2] as f64];
                let nearest = tree.nearest_one::<SquaredEuclidean>(&query);
                let vertex = vertices[nearest.item as usize];
                points2d.push(pixel_center(x as u32, y));
                points3d.push(vertex.cast::<f64>());
            }
            (points2d, points3d)
        })
        .collect();

    let mut all = Correspondences::default();
    for (points2d, points3d) in rows {
        all.points2d.extend(points2d);
        all.points3d.extend(points3d);
    }
    Ok(all)
}
