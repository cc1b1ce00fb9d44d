//! STL (Stereolithography) decoding, ASCII and binary.
//!
//! A file whose length is exactly `84 + 50 * count`, with `count` read from
//! bytes 80..84, is binary even when its header starts with `solid`. Other
//! files are ASCII when they start with `solid` and contain no NUL bytes in
//! the first 80 bytes. Each `solid ... endsolid` block becomes its own mesh, named after
//! the text following `solid`. Binary files produce a single unnamed mesh.
//!
//! Vertices are emitted unwelded, three per facet.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::Path;

use cadmesh_math::Point3;
use tracing::debug;

use crate::error::{ImportError, Result};
use crate::scene::PolygonMesh;

const HEADER_SIZE: usize = 80;
const TRIANGLE_SIZE: usize = 50;

/// Load all solids from an STL file.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn load_stl<P: AsRef<Path>>(path: P) -> Result<Vec<PolygonMesh>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ImportError::from_open(path, e))?;
    let mut bytes = Vec::new();
    BufReader::new(file).read_to_end(&mut bytes)?;
    let meshes = read_stl(&bytes)?;
    debug!(solids = meshes.len(), "decoded STL");
    Ok(meshes)
}

/// Decode STL from an in-memory buffer.
pub fn read_stl(bytes: &[u8]) -> Result<Vec<PolygonMesh>> {
    if bytes.len() < 6 {
        return Err(ImportError::invalid_content("file too small to be valid STL"));
    }
    let head = &bytes[..bytes.len().min(HEADER_SIZE)];
    let looks_ascii = String::from_utf8_lossy(head).trim_start().starts_with("solid");
    let sized_binary = face_count(bytes)
        .and_then(binary_len)
        .is_some_and(|len| len == bytes.len());
    if looks_ascii && !head.contains(&0) && !sized_binary {
        read_stl_ascii(Cursor::new(bytes))
    } else {
        read_stl_binary(bytes).map(|m| vec![m])
    }
}

/// Facet count stored after the binary header.
fn face_count(bytes: &[u8]) -> Option<u32> {
    let count = bytes.get(HEADER_SIZE..HEADER_SIZE + 4)?;
    Some(u32::from_le_bytes([count[0], count[1], count[2], count[3]]))
}

/// Total length of a binary file holding `faces` facets.
fn binary_len(faces: u32) -> Option<usize> {
    (faces as usize)
        .checked_mul(TRIANGLE_SIZE)?
        .checked_add(HEADER_SIZE + 4)
}

fn read_stl_binary(bytes: &[u8]) -> Result<PolygonMesh> {
    let Some(face_count) = face_count(bytes) else {
        return Err(ImportError::InvalidHeader {
            expected: HEADER_SIZE + 4,
            got: bytes.len(),
        });
    };
    let body = &bytes[HEADER_SIZE + 4..];
    if binary_len(face_count).map_or(true, |len| len > bytes.len()) {
        return Err(ImportError::InvalidFaceCount {
            expected: face_count,
            got: (body.len() / TRIANGLE_SIZE) as u32,
        });
    }

    let faces = face_count as usize;
    let mut mesh = PolygonMesh::default();
    mesh.vertices.reserve(faces * 3);
    mesh.polygons.reserve(faces);

    for tri in body.chunks_exact(TRIANGLE_SIZE).take(faces) {
        // normal occupies the first 12 bytes
        let base = mesh.vertices.len() as u32;
        mesh.vertices.push(read_vertex(&tri[12..24]));
        mesh.vertices.push(read_vertex(&tri[24..36]));
        mesh.vertices.push(read_vertex(&tri[36..48]));
        mesh.polygons.push(vec![base, base + 1, base + 2]);
    }
    Ok(mesh)
}

fn read_vertex(buf: &[u8]) -> Point3 {
    let f = |o: usize| f64::from(f32::from_le_bytes([buf[o], buf[o + 1], buf[o + 2], buf[o + 3]]));
    Point3::new(f(0), f(4), f(8))
}

fn read_stl_ascii<R: BufRead>(reader: R) -> Result<Vec<PolygonMesh>> {
    let mut meshes = Vec::new();
    let mut current: Option<PolygonMesh> = None;
    let mut corners: Vec<Point3> = Vec::with_capacity(3);
    let mut in_loop = false;

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        let mut parts = trimmed.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "solid" => {
                if let Some(done) = current.take() {
                    meshes.push(done);
                }
                let name = trimmed["solid".len()..].trim();
                current = Some(PolygonMesh::named(name));
            }
            "outer" => {
                in_loop = true;
                corners.clear();
            }
            "vertex" if in_loop => {
                let mut coord = || -> Result<f64> {
                    parts
                        .next()
                        .ok_or_else(|| {
                            ImportError::invalid_content("vertex with fewer than 3 coordinates")
                        })?
                        .parse::<f64>()
                        .map_err(ImportError::from)
                };
                let (x, y, z) = (coord()?, coord()?, coord()?);
                corners.push(Point3::new(x, y, z));
            }
            "endloop" => in_loop = false,
            "endfacet" => {
                let mesh = current.get_or_insert_with(PolygonMesh::default);
                let base = mesh.vertices.len() as u32;
                let n = corners.len() as u32;
                mesh.vertices.append(&mut corners);
                mesh.polygons.push((base..base + n).collect());
            }
            "endsolid" => {
                if let Some(done) = current.take() {
                    meshes.push(done);
                }
            }
            _ => {}
        }
    }
    if let Some(done) = current.take() {
        meshes.push(done);
    }
    Ok(meshes)
}
