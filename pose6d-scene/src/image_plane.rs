//! The 2D reference image entity

use serde::{Deserialize, Serialize};

/// Opacity step for the reference image
pub const IMAGE_OPACITY_STEP: f32 = 0.2;

/// The reference image a mesh is registered against
///
/// Pixel data stays with the renderer; the scene only tracks the dimensions
/// and the blend opacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagePlane {
    pub width: u32,
    pub height: u32,
    pub opacity: f32,
}

impl ImagePlane {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            opacity: 1.0,
        }
    }

    /// Set the opacity, clamped to `[0, 1]`
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Step the opacity up or down by [`IMAGE_OPACITY_STEP`], saturating
    pub fn step_opacity(&mut self, up: bool) {
        let step = if up {
            IMAGE_OPACITY_STEP
        } else {
            -IMAGE_OPACITY_STEP
        };
        self.set_opacity(self.opacity + step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_steps_clamp_at_both_ends() {
        let mut plane = ImagePlane::new(1920, 1080);
        plane.step_opacity(true);
        assert_eq!(plane.opacity, 1.0);
        for _ in 0..6 {
            plane.step_opacity(false);
        }
        assert_eq!(plane.opacity, 0.0);
        plane.step_opacity(true);
        assert!((plane.opacity - 0.2).abs() < 1e-6);
    }
}
