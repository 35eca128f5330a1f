//! Integration tests for the scene registry pose operations

use approx::assert_relative_eq;
use nalgebra::Vector3;
use pose6d_core::{Error, Matrix3, MirrorAxis, Point3f, Pose, TriangleMesh};
use pose6d_scene::{ImagePlane, MeshActor, SceneRegistry, UNDO_CAPACITY};

fn mesh() -> TriangleMesh {
    TriangleMesh::from_vertices_and_faces(
        vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
        ],
        vec![[0, 1, 2]],
    )
}

fn translation(x: f64, y: f64, z: f64) -> Pose {
    Pose::from_rot_trans(Matrix3::identity(), Vector3::new(x, y, z))
}

fn scene_with(names: &[&str]) -> SceneRegistry {
    let mut scene = SceneRegistry::new();
    for name in names {
        scene.insert(MeshActor::new(*name, mesh()).with_pose(translation(1.0, 2.0, 3.0)));
    }
    scene
}

#[test]
fn first_inserted_actor_becomes_reference() {
    let scene = scene_with(&["ossicles", "facial_nerve"]);
    assert_eq!(scene.reference_name(), Some("ossicles"));
}

#[test]
fn operations_without_meshes_report_no_mesh() {
    let mut scene = SceneRegistry::new();
    assert!(matches!(scene.reset_gt_pose(), Err(Error::NoMesh)));
    assert!(matches!(scene.reference_actor(), Err(Error::NoMesh)));
    assert!(matches!(
        scene.set_gt_pose(Pose::identity()),
        Err(Error::NoMesh)
    ));
}

#[test]
fn removing_the_reference_clears_it() {
    let mut scene = scene_with(&["ossicles"]);
    scene.remove("ossicles").unwrap();
    assert!(scene.reference_name().is_none());
    assert!(scene.is_empty());
    assert_eq!(scene.undo_len(), 0);
}

#[test]
fn update_gt_pose_propagates_to_all_actors() {
    let mut scene = scene_with(&["chorda", "ossicles"]);
    scene.set_reference("ossicles").unwrap();
    let moved = translation(9.0, -4.0, 2.0);
    scene.get_mut("ossicles").unwrap().pose = moved;
    scene.update_gt_pose().unwrap();
    for actor in scene.actors() {
        assert_eq!(actor.pose, moved);
        assert_eq!(actor.gt_pose, Some(moved));
    }
}

#[test]
fn reset_gt_pose_restores_each_actor() {
    let mut scene = scene_with(&["ossicles"]);
    let gt = scene.get("ossicles").unwrap().gt_pose.unwrap();
    scene.get_mut("ossicles").unwrap().pose = translation(100.0, 0.0, 0.0);
    scene.reset_gt_pose().unwrap();
    assert_eq!(scene.get("ossicles").unwrap().pose, gt);
}

#[test]
fn undo_skips_the_unchanged_pose() {
    let mut scene = scene_with(&["ossicles"]);
    let first = translation(1.0, 0.0, 0.0);
    let second = translation(2.0, 0.0, 0.0);

    scene.get_mut("ossicles").unwrap().pose = first;
    scene.record_pose().unwrap();
    scene.get_mut("ossicles").unwrap().pose = second;
    scene.record_pose().unwrap();

    // The top of the stack equals the current pose, so undo pops twice
    assert!(scene.undo_pose().unwrap());
    assert_eq!(scene.get("ossicles").unwrap().pose, first);
}

#[test]
fn undo_on_empty_history_is_a_no_op() {
    let mut scene = scene_with(&["ossicles"]);
    let before = scene.get("ossicles").unwrap().pose;
    assert!(!scene.undo_pose().unwrap());
    assert_eq!(scene.get("ossicles").unwrap().pose, before);
}

#[test]
fn undo_history_stays_bounded() {
    let mut scene = scene_with(&["ossicles"]);
    for i in 0..100 {
        scene.get_mut("ossicles").unwrap().pose = translation(i as f64, 0.0, 0.0);
        scene.record_pose().unwrap();
        assert!(scene.undo_len() <= UNDO_CAPACITY);
    }
    assert_eq!(scene.undo_len(), UNDO_CAPACITY);
}

#[test]
fn broadcast_copies_reference_pose_without_touching_gt() {
    let mut scene = scene_with(&["incus", "ossicles"]);
    scene.set_reference("ossicles").unwrap();
    let gt = scene.get("incus").unwrap().gt_pose.unwrap();
    let moved = translation(5.0, 5.0, 5.0);
    scene.get_mut("ossicles").unwrap().pose = moved;
    scene.broadcast_pose().unwrap();
    assert_eq!(scene.get("incus").unwrap().pose, moved);
    assert_eq!(scene.get("incus").unwrap().gt_pose, Some(gt));
}

#[test]
fn realign_bound_actors_follows_main() {
    let mut scene = scene_with(&["malleus", "incus", "stapes"]);
    scene.bind("malleus").unwrap();
    let moved = translation(-3.0, 1.0, 0.5);
    scene.get_mut("malleus").unwrap().pose = moved;
    scene.realign_bound("malleus").unwrap();
    for name in ["incus", "stapes"] {
        assert_eq!(scene.get(name).unwrap().pose, moved);
    }
}

#[test]
fn anchored_mirror_lands_on_the_reference() {
    let mut scene = scene_with(&["incus", "ossicles"]);
    scene.set_reference("ossicles").unwrap();
    scene.mirror("incus", MirrorAxis::X).unwrap();
    assert!(scene.get("ossicles").unwrap().mirror_x);
    assert!(!scene.get("incus").unwrap().mirror_x);

    // Mirroring again restores the reference display pose
    let display = scene.get("ossicles").unwrap().display_pose();
    scene.mirror("ossicles", MirrorAxis::X).unwrap();
    let restored = scene.get("ossicles").unwrap().display_pose();
    assert_relative_eq!(
        restored.matrix(),
        display.mirrored(MirrorAxis::X).matrix(),
        epsilon = 0.0
    );
}

#[test]
fn mirror_recomputes_the_display_pose_from_ground_truth() {
    let mut scene = scene_with(&["ossicles"]);
    let gt = scene.get("ossicles").unwrap().gt_pose.unwrap();

    // An in-progress edit away from the ground truth is discarded by mirror
    scene.get_mut("ossicles").unwrap().pose = translation(42.0, 0.0, 0.0);
    scene.mirror("ossicles", MirrorAxis::X).unwrap();

    let actor = scene.get("ossicles").unwrap();
    assert_eq!(actor.pose, gt);
    assert_relative_eq!(
        actor.display_pose().matrix(),
        gt.mirrored(MirrorAxis::X).matrix(),
        epsilon = 0.0
    );
}

#[test]
fn unanchored_mirror_targets_the_named_actor() {
    let mut scene = scene_with(&["incus", "ossicles"]);
    scene.anchored = false;
    scene.mirror("incus", MirrorAxis::Y).unwrap();
    assert!(scene.get("incus").unwrap().mirror_y);
    assert!(!scene.get("ossicles").unwrap().mirror_y);
}

#[test]
fn toggle_hidden_spares_the_reference_and_restores() {
    let mut scene = scene_with(&["incus", "ossicles"]);
    scene.set_reference("ossicles").unwrap();
    scene.set_opacity("incus", 0.7).unwrap();

    scene.toggle_hidden().unwrap();
    assert_eq!(scene.get("incus").unwrap().opacity, 0.0);
    assert_eq!(scene.get("ossicles").unwrap().opacity, 1.0);

    scene.toggle_hidden().unwrap();
    assert_eq!(scene.get("incus").unwrap().opacity, 0.7);
}

#[test]
fn image_plane_opacity_is_scene_state() {
    let mut scene = scene_with(&["ossicles"]);
    scene.set_image(ImagePlane::new(1920, 1080));
    scene.image_mut().unwrap().step_opacity(false);
    assert!((scene.image().unwrap().opacity - 0.8).abs() < 1e-6);
}
