//! Pose file support: 4x4 matrices as JSON or whitespace text

use crate::error::{IoError, Result};
use log::debug;
use nalgebra::Matrix4;
use pose6d_core::Pose;
use std::fs;
use std::path::Path;

/// Read a 4x4 pose matrix
///
/// `.json` files hold a `[[f64; 4]; 4]` row-major array; anything else is
/// parsed as 16 whitespace-separated numbers in row order. The bottom row is
/// validated either way.
pub fn read_pose<P: AsRef<Path>>(path: P) -> Result<Pose> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let rows: [[f64; 4]; 4] = if path.extension().and_then(|s| s.to_str()) == Some("json") {
        serde_json::from_str(&text)?
    } else {
        parse_text_matrix(&text)?
    };

    let matrix = Matrix4::from_fn(|r, c| rows[r][c]);
    let pose = Pose::from_matrix(matrix)?;
    debug!("read pose from {}", path.display());
    Ok(pose)
}

/// Write a pose matrix in the format matching the path extension
pub fn write_pose<P: AsRef<Path>>(pose: &Pose, path: P) -> Result<()> {
    let path = path.as_ref();
    let m = pose.matrix();
    if path.extension().and_then(|s| s.to_str()) == Some("json") {
        let rows: [[f64; 4]; 4] =
            std::array::from_fn(|r| std::array::from_fn(|c| m[(r, c)]));
        fs::write(path, serde_json::to_string_pretty(&rows)?)?;
    } else {
        let mut text = String::new();
        for r in 0..4 {
            let row: Vec<String> = (0..4).map(|c| format!("{}", m[(r, c)])).collect();
            text.push_str(&row.join(" "));
            text.push('\n');
        }
        fs::write(path, text)?;
    }
    debug!("wrote pose to {}", path.display());
    Ok(())
}

fn parse_text_matrix(text: &str) -> Result<[[f64; 4]; 4]> {
    let values: Vec<f64> = text
        .split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|e| IoError::Parse(format!("bad pose value {token:?}: {e}")))
        })
        .collect::<Result<_>>()?;
    if values.len() != 16 {
        return Err(IoError::Parse(format!(
            "pose file must hold 16 values, got {}",
            values.len()
        )));
    }
    Ok(std::array::from_fn(|r| {
        std::array::from_fn(|c| values[r * 4 + c])
    }))
}
