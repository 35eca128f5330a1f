//! Mesh actor: a mesh plus its display state

use pose6d_core::{MirrorAxis, Pose, TriangleMesh};
use serde::{Deserialize, Serialize};

/// Opacity step for mesh actors
pub const MESH_OPACITY_STEP: f32 = 0.05;

/// A mesh with the pose and display state a viewer would render it with
///
/// `pose` is the canonical (unmirrored) transform; mirrored display variants
/// are derived from the mirror flags, so toggling a mirror twice restores the
/// original display pose exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshActor {
    pub name: String,
    pub mesh: TriangleMesh,
    pub pose: Pose,
    /// Ground-truth pose, the restore point for reset operations
    pub gt_pose: Option<Pose>,
    pub mirror_x: bool,
    pub mirror_y: bool,
    pub opacity: f32,
    previous_opacity: f32,
}

impl MeshActor {
    pub fn new(name: impl Into<String>, mesh: TriangleMesh) -> Self {
        Self {
            name: name.into(),
            mesh,
            pose: Pose::identity(),
            gt_pose: None,
            mirror_x: false,
            mirror_y: false,
            opacity: 1.0,
            previous_opacity: 1.0,
        }
    }

    /// Set the canonical pose and record it as ground truth
    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self.gt_pose = Some(pose);
        self
    }

    /// The pose a renderer should display: canonical pose with the active
    /// mirror reflections applied
    pub fn display_pose(&self) -> Pose {
        self.pose.with_mirrors(self.mirror_x, self.mirror_y)
    }

    /// Toggle a mirror flag
    ///
    /// The pose is rebased onto the stored ground truth first, so the
    /// reflection always applies to the ground-truth matrix and any
    /// in-progress edit is discarded. If no ground truth was recorded yet the
    /// current pose becomes it.
    pub fn toggle_mirror(&mut self, axis: MirrorAxis) {
        match self.gt_pose {
            Some(gt) => self.pose = gt,
            None => self.gt_pose = Some(self.pose),
        }
        match axis {
            MirrorAxis::X => self.mirror_x = !self.mirror_x,
            MirrorAxis::Y => self.mirror_y = !self.mirror_y,
        }
    }

    /// Set the opacity, clamped to `[0, 1]`
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Step the opacity up or down by [`MESH_OPACITY_STEP`], saturating
    pub fn step_opacity(&mut self, up: bool) {
        let step = if up {
            MESH_OPACITY_STEP
        } else {
            -MESH_OPACITY_STEP
        };
        self.set_opacity(self.opacity + step);
    }

    /// Hide the actor, stashing the current opacity for [`Self::unhide`]
    pub fn hide(&mut self) {
        self.previous_opacity = self.opacity;
        self.opacity = 0.0;
    }

    /// Restore the opacity stashed by [`Self::hide`]
    pub fn unhide(&mut self) {
        self.opacity = self.previous_opacity;
    }
}
