//! I/O glue for pose6d
//!
//! Thin format wrappers with no parsing of their own: meshes go through
//! `ply-rs` and `obj`, images through `image`, pose matrices and the
//! latitude/longitude coordinate mapping through `serde_json`.

pub mod error;
pub mod image_file;
pub mod latlon;
pub mod obj_file;
pub mod ply;
pub mod pose_file;

pub use error::*;
pub use image_file::*;
pub use latlon::*;
pub use pose_file::*;

use pose6d_core::TriangleMesh;
use std::path::Path;

/// Auto-detect the format from the extension and read a mesh
pub fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("ply") => ply::read_ply_mesh(path),
        Some("obj") => obj_file::read_obj_mesh(path),
        other => Err(IoError::UnsupportedFormat(format!(
            "unsupported mesh format: {other:?}"
        ))),
    }
}

/// Write a mesh; only PLY output is supported
pub fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("ply") => ply::write_ply_mesh(mesh, path),
        other => Err(IoError::UnsupportedFormat(format!(
            "unsupported mesh output format: {other:?}"
        ))),
    }
}
