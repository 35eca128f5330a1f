//! Scene state for pose6d
//!
//! This crate owns the mutable state of an annotation session: the registry
//! of mesh actors with their poses, the reference selection, the bounded undo
//! history, and the reference image plane. Every operation a viewer's key
//! bindings would trigger lives here as an explicit method, so the GUI layer
//! stays a thin dispatch table.

pub mod actor;
pub mod image_plane;
pub mod registry;
pub mod undo;

pub use actor::*;
pub use image_plane::*;
pub use registry::*;
pub use undo::*;
