//! Walk through a pose annotation session without a GUI: load meshes into the
//! registry, move the reference around, mirror, undo, and export the result.

use anyhow::{Context, Result};
use nalgebra::{Rotation3, Vector3};
use pose6d_core::{MirrorAxis, Point3f, Pose, TriangleMesh};
use pose6d_io::write_pose;
use pose6d_scene::{ImagePlane, MeshActor, SceneRegistry};

fn tetrahedron() -> TriangleMesh {
    TriangleMesh::from_vertices_and_faces(
        vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
            Point3f::new(0.0, 0.0, 1.0),
        ],
        vec![[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]],
    )
}

fn main() -> Result<()> {
    env_logger::init();

    let gt = Pose::from_rot_trans(
        Rotation3::from_euler_angles(0.1, -0.2, 0.4).into_inner(),
        Vector3::new(2.0, -1.0, 6.0),
    );

    let mut scene = SceneRegistry::new();
    scene.insert(MeshActor::new("ossicles", tetrahedron()).with_pose(gt));
    scene.insert(MeshActor::new("facial_nerve", tetrahedron()).with_pose(gt));
    scene.set_reference("ossicles")?;
    scene.set_image(ImagePlane::new(1920, 1080));

    // Nudge the reference, keeping the undo history current
    scene.record_pose()?;
    scene
        .get_mut("ossicles")
        .context("ossicles actor missing")?
        .pose = Pose::from_rot_trans(
        gt.rotation(),
        gt.translation() + Vector3::new(0.5, 0.0, 0.0),
    );
    scene.broadcast_pose()?;
    println!(
        "after nudge: {:?}",
        scene.reference_actor()?.pose.translation()
    );

    // Mirror across x and back
    scene.mirror("ossicles", MirrorAxis::X)?;
    println!(
        "mirrored display pose det: {}",
        scene.reference_actor()?.display_pose().rotation().determinant()
    );
    scene.mirror("ossicles", MirrorAxis::X)?;

    // Undo the nudge and adopt the result as the new ground truth
    scene.undo_pose()?;
    scene.update_gt_pose()?;
    println!(
        "after undo: {:?}",
        scene.reference_actor()?.pose.translation()
    );

    let out = std::env::temp_dir().join("ossicles_pose.json");
    write_pose(&scene.reference_actor()?.pose, &out)?;
    println!("exported pose to {}", out.display());

    Ok(())
}
