//! Core data structures for pose6d
//!
//! This crate provides the fundamental types for 6-DOF pose annotation:
//! triangle meshes with per-vertex color, rigid pose matrices with mirror
//! support, and a pinhole camera model that maps calibration intrinsics to
//! renderer view parameters.

pub mod camera;
pub mod error;
pub mod mesh;
pub mod point;
pub mod pose;

pub use camera::*;
pub use error::*;
pub use mesh::*;
pub use point::*;
pub use pose::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector3};
