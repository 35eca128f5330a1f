//! PLY format support via `ply-rs`

use crate::error::{IoError, Result};
use pose6d_core::{Point3f, TriangleMesh};
use ply_rs::{
    parser::Parser,
    ply::{
        Addable, DefaultElement, ElementDef, Ply, Property, PropertyDef, PropertyType, ScalarType,
    },
    writer::Writer,
};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Read a triangle mesh, picking up per-vertex `red/green/blue` colors when
/// the file carries them
pub fn read_ply_mesh(path: &Path) -> Result<TriangleMesh> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let parser = Parser::<DefaultElement>::new();
    let ply = parser.read_ply(&mut reader)?;

    let mut vertices = Vec::new();
    let mut colors = Vec::new();
    let mut has_colors = true;
    if let Some(vertex_element) = ply.payload.get("vertex") {
        for vertex in vertex_element {
            let x = scalar_value(vertex, "x")?;
            let y = scalar_value(vertex, "y")?;
            let z = scalar_value(vertex, "z")?;
            vertices.push(Point3f::new(x, y, z));

            if has_colors {
                match (
                    color_value(vertex, "red"),
                    color_value(vertex, "green"),
                    color_value(vertex, "blue"),
                ) {
                    (Some(r), Some(g), Some(b)) => colors.push([r, g, b]),
                    _ => has_colors = false,
                }
            }
        }
    }

    let mut faces = Vec::new();
    if let Some(face_element) = ply.payload.get("face") {
        for face in face_element {
            let indices = face_indices(face)?;
            // Fan-triangulate polygons with more than three vertices
            for i in 1..indices.len().saturating_sub(1) {
                faces.push([indices[0], indices[i], indices[i + 1]]);
            }
        }
    }

    let mut mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);
    if has_colors && !colors.is_empty() {
        mesh.set_colors(colors)?;
    }
    Ok(mesh)
}

/// Write a triangle mesh, including vertex colors when present
pub fn write_ply_mesh(mesh: &TriangleMesh, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let mut ply = Ply::<DefaultElement>::new();

    let mut vertex_element = ElementDef::new("vertex".to_string());
    vertex_element.count = mesh.vertex_count();
    for name in ["x", "y", "z"] {
        vertex_element.properties.add(PropertyDef::new(
            name.to_string(),
            PropertyType::Scalar(ScalarType::Float),
        ));
    }
    if mesh.colors.is_some() {
        for name in ["red", "green", "blue"] {
            vertex_element.properties.add(PropertyDef::new(
                name.to_string(),
                PropertyType::Scalar(ScalarType::UChar),
            ));
        }
    }
    ply.header.elements.add(vertex_element);

    let mut face_element = ElementDef::new("face".to_string());
    face_element.count = mesh.face_count();
    face_element.properties.add(PropertyDef::new(
        "vertex_indices".to_string(),
        PropertyType::List(ScalarType::UChar, ScalarType::Int),
    ));
    ply.header.elements.add(face_element);

    let mut vertices = Vec::with_capacity(mesh.vertex_count());
    for (i, point) in mesh.vertices.iter().enumerate() {
        let mut vertex = DefaultElement::new();
        vertex.insert("x".to_string(), Property::Float(point.x));
        vertex.insert("y".to_string(), Property::Float(point.y));
        vertex.insert("z".to_string(), Property::Float(point.z));
        if let Some(colors) = &mesh.colors {
            let c = colors[i];
            vertex.insert("red".to_string(), Property::UChar(to_u8(c[0])));
            vertex.insert("green".to_string(), Property::UChar(to_u8(c[1])));
            vertex.insert("blue".to_string(), Property::UChar(to_u8(c[2])));
        }
        vertices.push(vertex);
    }
    ply.payload.insert("vertex".to_string(), vertices);

    let mut faces = Vec::with_capacity(mesh.face_count());
    for face in &mesh.faces {
        let mut element = DefaultElement::new();
        element.insert(
            "vertex_indices".to_string(),
            Property::ListInt(face.iter().map(|&i| i as i32).collect()),
        );
        faces.push(element);
    }
    ply.payload.insert("face".to_string(), faces);

    let writer_instance = Writer::new();
    writer_instance.write_ply(&mut writer, &mut ply)?;

    Ok(())
}

fn to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn scalar_value(element: &DefaultElement, name: &str) -> Result<f32> {
    match element.get(name) {
        Some(Property::Float(v)) => Ok(*v),
        Some(Property::Double(v)) => Ok(*v as f32),
        Some(Property::Int(v)) => Ok(*v as f32),
        Some(Property::UInt(v)) => Ok(*v as f32),
        Some(Property::Short(v)) => Ok(*v as f32),
        Some(Property::UShort(v)) => Ok(*v as f32),
        Some(Property::Char(v)) => Ok(*v as f32),
        Some(Property::UChar(v)) => Ok(*v as f32),
        _ => Err(IoError::Parse(format!("missing vertex property {name:?}"))),
    }
}

fn color_value(element: &DefaultElement, name: &str) -> Option<f32> {
    match element.get(name) {
        Some(Property::UChar(v)) => Some(*v as f32 / 255.0),
        Some(Property::Float(v)) => Some(*v),
        Some(Property::Double(v)) => Some(*v as f32),
        _ => None,
    }
}

fn face_indices(element: &DefaultElement) -> Result<Vec<usize>> {
    let property = element
        .get("vertex_indices")
        .or_else(|| element.get("vertex_index"))
        .ok_or_else(|| IoError::Parse("face has no vertex index list".into()))?;
    match property {
        Property::ListInt(list) => Ok(list.iter().map(|&i| i as usize).collect()),
        Property::ListUInt(list) => Ok(list.iter().map(|&i| i as usize).collect()),
        Property::ListUShort(list) => Ok(list.iter().map(|&i| i as usize).collect()),
        Property::ListUChar(list) => Ok(list.iter().map(|&i| i as usize).collect()),
        _ => Err(IoError::Parse("unsupported face index list type".into())),
    }
}
