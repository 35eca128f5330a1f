//! Mesh data structures and functionality

use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box of a mesh
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point3f,
    pub max: Point3f,
}

impl Bounds {
    /// Extent of the box along each axis
    pub fn extent(&self) -> Vector3f {
        self.max - self.min
    }
}

/// A triangle mesh with vertices, faces and optional per-vertex color
///
/// Colors are floating point RGB in `[0, 1]`, which is what the color-coded
/// pose solvers consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    pub colors: Option<Vec<[f32; 3]>>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            colors: None,
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            colors: None,
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Set per-vertex colors, validating the count against the vertices
    pub fn set_colors(&mut self, colors: Vec<[f32; 3]>) -> Result<()> {
        if colors.len() != self.vertices.len() {
            return Err(Error::InvalidData(format!(
                "color count {} does not match vertex count {}",
                colors.len(),
                self.vertices.len()
            )));
        }
        self.colors = Some(colors);
        Ok(())
    }

    /// Axis-aligned bounding box of the vertices
    pub fn bounds(&self) -> Result<Bounds> {
        if self.vertices.is_empty() {
            return Err(Error::NoMesh);
        }
        let mut min = self.vertices[0];
        let mut max = self.vertices[0];
        for v in &self.vertices[1..] {
            for i in 0..3 {
                if v[i] < min[i] {
                    min[i] = v[i];
                }
                if v[i] > max[i] {
                    max[i] = v[i];
                }
            }
        }
        Ok(Bounds { min, max })
    }

    /// Clear the mesh
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
        self.colors = None;
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-vertex latitude/longitude coordinate mapping
///
/// Anatomical color coding: each vertex carries a latitude and longitude
/// value used as its identifying color.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatLonTable {
    latitude: Vec<f32>,
    longitude: Vec<f32>,
}

impl LatLonTable {
    /// Build a table, validating that both arrays have the same length
    pub fn new(latitude: Vec<f32>, longitude: Vec<f32>) -> Result<Self> {
        if latitude.len() != longitude.len() {
            return Err(Error::InvalidData(format!(
                "latitude count {} does not match longitude count {}",
                latitude.len(),
                longitude.len()
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn len(&self) -> usize {
        self.latitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latitude.is_empty()
    }

    /// Iterate `(latitude, longitude)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.latitude
            .iter()
            .copied()
            .zip(self.longitude.iter().copied())
    }
}
