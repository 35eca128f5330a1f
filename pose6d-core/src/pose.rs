//! Rigid pose matrices with mirror support
//!
//! A pose is the 4x4 homogeneous transform a viewer would attach to a mesh
//! actor. Mirrored display variants are produced by left-multiplying fixed
//! reflection matrices across the x or y axis.

use crate::error::{Error, Result};
use crate::point::{Point3d, Point3f, Vector3d};
use nalgebra::{Matrix3, Matrix4};
use serde::{Deserialize, Serialize};

/// Axis across which a mesh actor can be mirrored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MirrorAxis {
    X,
    Y,
}

/// Reflection matrix for the given axis, `diag(-1,1,1,1)` or `diag(1,-1,1,1)`
pub fn reflection(axis: MirrorAxis) -> Matrix4<f64> {
    let mut m = Matrix4::identity();
    match axis {
        MirrorAxis::X => m[(0, 0)] = -1.0,
        MirrorAxis::Y => m[(1, 1)] = -1.0,
    }
    m
}

/// A 6-DOF pose stored as a 4x4 homogeneous matrix
///
/// Invariant: the bottom row is always `[0, 0, 0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    matrix: Matrix4<f64>,
}

impl Pose {
    /// The identity pose
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Create a pose from a 4x4 matrix, validating the bottom row
    pub fn from_matrix(matrix: Matrix4<f64>) -> Result<Self> {
        let bottom = matrix.row(3);
        if bottom[0] != 0.0 || bottom[1] != 0.0 || bottom[2] != 0.0 || bottom[3] != 1.0 {
            return Err(Error::InvalidPose(format!(
                "bottom row must be [0, 0, 0, 1], got {:?}",
                [bottom[0], bottom[1], bottom[2], bottom[3]]
            )));
        }
        Ok(Self { matrix })
    }

    /// Stack a 3x3 rotation and a translation vector over `[0, 0, 0, 1]`
    pub fn from_rot_trans(rot: Matrix3<f64>, trans: Vector3d) -> Self {
        let mut matrix = Matrix4::identity();
        matrix.fixed_view_mut::<3, 3>(0, 0).copy_from(&rot);
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&trans);
        Self { matrix }
    }

    /// The underlying 4x4 matrix
    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// The rotation block of the pose
    pub fn rotation(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// The translation component of the pose
    pub fn translation(&self) -> Vector3d {
        self.matrix.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// Left-multiply the fixed reflection matrix for `axis`
    pub fn mirrored(&self, axis: MirrorAxis) -> Self {
        Self {
            matrix: reflection(axis) * self.matrix,
        }
    }

    /// Apply the active mirror flags of an actor to this pose
    pub fn with_mirrors(&self, mirror_x: bool, mirror_y: bool) -> Self {
        let mut pose = *self;
        if mirror_x {
            pose = pose.mirrored(MirrorAxis::X);
        }
        if mirror_y {
            pose = pose.mirrored(MirrorAxis::Y);
        }
        pose
    }

    /// Compose this pose with another: `self * other`
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// The inverse pose, if the matrix is invertible
    pub fn try_inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }

    /// Apply the pose to a double precision point
    pub fn transform_point(&self, point: &Point3d) -> Point3d {
        Point3d::from(self.rotation() * point.coords + self.translation())
    }

    /// Apply the pose to a mesh vertex
    pub fn transform_vertex(&self, vertex: &Point3f) -> Point3f {
        let p = self.transform_point(&vertex.cast::<f64>());
        Point3f::new(p.x as f32, p.y as f32, p.z as f32)
    }

    /// Sum of absolute differences against another pose, the error metric
    /// reported after a solve
    pub fn abs_diff(&self, other: &Self) -> f64 {
        (self.matrix - other.matrix).abs().sum()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Pose {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(&rhs)
    }
}
