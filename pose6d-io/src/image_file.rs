//! Reference image loading via the `image` crate

use crate::error::{IoError, Result};
use image::RgbImage;
use std::path::Path;

/// Read a `.png`/`.jpg` reference image as 8-bit RGB
pub fn read_image<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("png") | Some("jpg") | Some("jpeg") => {}
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported image format: {other:?}"
            )))
        }
    }
    Ok(image::open(path)?.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn png_round_trips() {
        let path = std::env::temp_dir().join("pose6d_ref.png");
        let mut img = RgbImage::new(4, 2);
        img.put_pixel(1, 0, image::Rgb([255, 0, 128]));
        img.save(&path).unwrap();

        let loaded = read_image(&path).unwrap();
        assert_eq!(loaded.dimensions(), (4, 2));
        assert_eq!(loaded.get_pixel(1, 0), &image::Rgb([255, 0, 128]));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        assert!(matches!(
            read_image("frame.tiff"),
            Err(IoError::UnsupportedFormat(_))
        ));
    }
}
