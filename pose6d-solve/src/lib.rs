//! Pose solvers for pose6d
//!
//! Recovers a 6-DOF pose from a color-coded render of a mesh: vertices are
//! identified by NOCS or latitude/longitude colors, pixel colors are decoded
//! back into 2D-3D correspondences, and an EPnP solve followed by Kabsch
//! alignment produces the pose.

pub mod color;
pub mod correspondence;
pub mod epnp;
pub mod render;

pub use color::*;
pub use correspondence::*;
pub use epnp::*;
pub use render::*;
