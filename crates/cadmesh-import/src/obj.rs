//! Wavefront OBJ decoding.
//!
//! Positions are global to the file; `o` and `g` statements start a new
//! named mesh. Each mesh keeps only the vertices its faces reference.
//! Face corners may be `v`, `v/vt`, `v//vn` or `v/vt/vn`, with 1-based or
//! negative (relative) position indices.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use cadmesh_math::Point3;
use tracing::debug;

use crate::error::{ImportError, Result};
use crate::scene::PolygonMesh;

/// Name given to faces that appear before any `o`/`g` statement.
pub const DEFAULT_OBJECT_NAME: &str = "defaultobject";

/// Load all objects from an OBJ file.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Vec<PolygonMesh>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ImportError::from_open(path, e))?;
    let meshes = read_obj(BufReader::new(file))?;
    debug!(objects = meshes.len(), "decoded OBJ");
    Ok(meshes)
}

struct Group {
    name: String,
    polygons: Vec<Vec<usize>>,
}

/// Decode OBJ from a buffered reader. Objects without faces are skipped.
pub fn read_obj<R: BufRead>(reader: R) -> Result<Vec<PolygonMesh>> {
    let mut positions: Vec<Point3> = Vec::new();
    let mut groups: Vec<Group> = Vec::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.split('#').next().unwrap_or("").trim();
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword {
            "v" => {
                let coords: Vec<f64> = parts
                    .take(3)
                    .map(str::parse::<f64>)
                    .collect::<std::result::Result<_, _>>()?;
                if coords.len() < 3 {
                    return Err(ImportError::invalid_content(format!(
                        "line {}: vertex with fewer than 3 coordinates",
                        lineno + 1
                    )));
                }
                positions.push(Point3::new(coords[0], coords[1], coords[2]));
            }
            "o" | "g" => {
                let name = parts.collect::<Vec<_>>().join(" ");
                groups.push(Group {
                    name,
                    polygons: Vec::new(),
                });
            }
            "f" => {
                let mut poly = Vec::new();
                for corner in parts {
                    poly.push(resolve_index(corner, positions.len(), lineno + 1)?);
                }
                if groups.is_empty() {
                    groups.push(Group {
                        name: DEFAULT_OBJECT_NAME.to_string(),
                        polygons: Vec::new(),
                    });
                }
                if let Some(group) = groups.last_mut() {
                    group.polygons.push(poly);
                }
            }
            _ => {}
        }
    }

    Ok(groups
        .into_iter()
        .filter(|g| !g.polygons.is_empty())
        .map(|g| compact(g, &positions))
        .collect())
}

/// Turn a corner token into a 0-based position index.
fn resolve_index(corner: &str, count: usize, lineno: usize) -> Result<usize> {
    let raw: i64 = corner.split('/').next().unwrap_or("").parse()?;
    let index = match raw {
        0 => None,
        r if r > 0 => Some(r as usize - 1),
        r => count.checked_sub(r.unsigned_abs() as usize),
    };
    index.filter(|&i| i < count).ok_or_else(|| {
        ImportError::invalid_content(format!(
            "line {lineno}: face index {raw} out of range for {count} vertices"
        ))
    })
}

/// Build a mesh holding only the positions `group` references.
fn compact(group: Group, positions: &[Point3]) -> PolygonMesh {
    let mut local: HashMap<usize, u32> = HashMap::new();
    let mut mesh = PolygonMesh::named(group.name);
    for poly in group.polygons {
        let corners = poly
            .into_iter()
            .map(|global| {
                *local.entry(global).or_insert_with(|| {
                    mesh.vertices.push(positions[global]);
                    mesh.vertices.len() as u32 - 1
                })
            })
            .collect();
        mesh.polygons.push(corners);
    }
    mesh
}
