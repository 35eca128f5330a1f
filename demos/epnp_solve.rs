//! Recover a planted pose from a color-coded render.
//!
//! A synthetic point cloud is NOCS-colored, posed, and splatted through the
//! default annotation camera into an off-screen color buffer. The buffer is
//! then decoded back into 2D-3D correspondences and handed to the EPnP solver,
//! and the recovered pose is compared against the one that was planted.

use anyhow::{Context, Result};
use nalgebra::{Rotation3, Vector3};
use pose6d_core::{Camera, Point3f, Pose, TriangleMesh};
use pose6d_solve::{correspondences_nocs, nocs_colors, solve_world_pose, ColorRender};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const WIDTH: u32 = 1920;
const HEIGHT: u32 = 1080;
const FOCAL_LENGTH: f64 = 5e4;

/// A loose blob of points spanning a few millimeters, stand-in for a mesh
/// surface sampled at render time.
fn synthetic_cloud(n: usize, rng: &mut StdRng) -> TriangleMesh {
    let vertices = (0..n)
        .map(|_| {
            Point3f::new(
                rng.gen_range(-4.0..4.0),
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-2.0..2.0),
            )
        })
        .collect();
    TriangleMesh::from_vertices_and_faces(vertices, Vec::new())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(17);
    let mut mesh = synthetic_cloud(5_000, &mut rng);
    let colors = nocs_colors(&mesh).context("color-coding the cloud")?;
    mesh.set_colors(colors.clone())?;
    let bounds = mesh.bounds()?;

    let gt_pose = Pose::from_rot_trans(
        Rotation3::from_euler_angles(0.15, -0.3, 0.5).into_inner(),
        Vector3::new(1.0, -2.0, 0.5),
    );

    let camera = Camera::annotation_default(WIDTH, HEIGHT, FOCAL_LENGTH)?;

    // Splat each posed vertex into the buffer, carrying its code color
    let mut render = ColorRender::black(WIDTH, HEIGHT);
    for (vertex, color) in mesh.vertices.iter().zip(&colors) {
        let world = gt_pose.transform_point(&vertex.cast::<f64>());
        if let Some(px) = camera.project_world(&world)? {
            let (x, y) = (px.x.round() as i64, px.y.round() as i64);
            if (0..WIDTH as i64).contains(&x) && (0..HEIGHT as i64).contains(&y) {
                render.set_pixel(x as u32, y as u32, *color);
            }
        }
    }

    let corr = correspondences_nocs(&render, &bounds);
    println!("extracted {} correspondences", corr.len());

    let solution = solve_world_pose(&corr, &camera)?;
    let err = solution.error_against(&gt_pose);
    println!("planted translation:   {:?}", gt_pose.translation());
    println!("recovered translation: {:?}", solution.world_pose.translation());
    println!("pose matrix deviation: {err:.6}");

    Ok(())
}
