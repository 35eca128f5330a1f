//! Color-coded render buffers

use pose6d_core::{Error, Result};

/// An RGB render of a color-coded mesh over a black background
///
/// Produced by an external offscreen renderer (or synthesized in tests);
/// the solvers only read it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRender {
    pub width: u32,
    pub height: u32,
    pixels: Vec<[f32; 3]>,
}

impl ColorRender {
    /// Create a black render of the given size
    pub fn black(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 3]; (width * height) as usize],
        }
    }

    /// Wrap an existing pixel buffer, row-major
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<[f32; 3]>) -> Result<Self> {
        if pixels.len() != (width * height) as usize {
            return Err(Error::InvalidData(format!(
                "pixel count {} does not match {}x{}",
                pixels.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Convert an 8-bit RGB buffer into normalized colors
    pub fn from_rgb8(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        if data.len() != (width * height * 3) as usize {
            return Err(Error::InvalidData(format!(
                "byte count {} does not match {}x{} RGB",
                data.len(),
                width,
                height
            )));
        }
        let pixels = data
            .chunks_exact(3)
            .map(|c| {
                [
                    c[0] as f32 / 255.0,
                    c[1] as f32 / 255.0,
                    c[2] as f32 / 255.0,
                ]
            })
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: [f32; 3]) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// One row of pixels
    pub fn row(&self, y: u32) -> &[[f32; 3]] {
        let start = (y * self.width) as usize;
        &self.pixels[start..start + self.width as usize]
    }

    /// Background pixels are pure black
    pub fn is_background(color: [f32; 3]) -> bool {
        color == [0.0, 0.0, 0.0]
    }
}
