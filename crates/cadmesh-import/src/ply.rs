//! PLY (Polygon File Format) decoding via `ply-rs`.
//!
//! ASCII, binary little-endian and binary big-endian files are supported.
//! Only vertex positions (`x`, `y`, `z`) and face index lists
//! (`vertex_indices` or `vertex_index`) are read.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use cadmesh_math::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};
use tracing::debug;

use crate::error::{ImportError, Result};
use crate::scene::PolygonMesh;

/// Load the mesh stored in a PLY file.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn load_ply<P: AsRef<Path>>(path: P) -> Result<PolygonMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ImportError::from_open(path, e))?;
    let mesh = read_ply(&mut BufReader::new(file))?;
    debug!(
        vertices = mesh.vertices.len(),
        faces = mesh.polygons.len(),
        "decoded PLY"
    );
    Ok(mesh)
}

/// Decode PLY from a buffered reader.
pub fn read_ply<R: BufRead>(reader: &mut R) -> Result<PolygonMesh> {
    let parser = Parser::<DefaultElement>::new();
    let header = parser
        .read_header(reader)
        .map_err(|e| ImportError::invalid_content(format!("failed to parse PLY header: {e}")))?;
    let payload = parser
        .read_payload(reader, &header)
        .map_err(|e| ImportError::invalid_content(format!("failed to read PLY payload: {e}")))?;

    let mut mesh = PolygonMesh::default();

    if let Some(vertices) = payload.get("vertex") {
        mesh.vertices.reserve(vertices.len());
        for element in vertices {
            let coord = |key: &str| {
                scalar(element, key).ok_or_else(|| {
                    ImportError::invalid_content(format!("PLY vertex is missing `{key}`"))
                })
            };
            mesh.vertices
                .push(Point3::new(coord("x")?, coord("y")?, coord("z")?));
        }
    }

    if let Some(faces) = payload.get("face") {
        mesh.polygons.reserve(faces.len());
        for element in faces {
            mesh.polygons.push(index_list(element)?);
        }
    }

    Ok(mesh)
}

fn scalar(element: &DefaultElement, key: &str) -> Option<f64> {
    Some(match element.get(key)? {
        Property::Float(v) => f64::from(*v),
        Property::Double(v) => *v,
        Property::Char(v) => f64::from(*v),
        Property::UChar(v) => f64::from(*v),
        Property::Short(v) => f64::from(*v),
        Property::UShort(v) => f64::from(*v),
        Property::Int(v) => f64::from(*v),
        Property::UInt(v) => f64::from(*v),
        _ => return None,
    })
}

fn index_list(element: &DefaultElement) -> Result<Vec<u32>> {
    fn unsigned<T: Copy + TryInto<u32>>(v: &[T]) -> Result<Vec<u32>> {
        v.iter()
            .map(|&i| {
                i.try_into()
                    .map_err(|_| ImportError::invalid_content("negative PLY face index"))
            })
            .collect()
    }

    for key in ["vertex_indices", "vertex_index"] {
        if let Some(prop) = element.get(key) {
            return match prop {
                Property::ListInt(v) => unsigned(v),
                Property::ListUInt(v) => Ok(v.clone()),
                Property::ListUChar(v) => unsigned(v),
                Property::ListChar(v) => unsigned(v),
                Property::ListShort(v) => unsigned(v),
                Property::ListUShort(v) => unsigned(v),
                _ => continue,
            };
        }
    }
    Err(ImportError::invalid_content("PLY face has no vertex index list"))
}
