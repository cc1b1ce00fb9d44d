//! Decoded scenes and the post-processing steps applied to them.

use std::collections::HashMap;

use cadmesh_math::{Point3, Vec3};
use tracing::warn;

use crate::error::{ImportError, Result};

/// Post-processing requested from the importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PostProcess {
    /// Fan-split polygons with more than three corners.
    pub triangulate: bool,
    /// Merge vertices with bit-identical positions.
    pub join_identical_vertices: bool,
    /// Compute per-vertex tangents.
    pub calc_tangent_space: bool,
}

impl PostProcess {
    /// The flags used when importing surface meshes: all steps enabled.
    pub const MESH_IMPORT: Self = Self {
        triangulate: true,
        join_identical_vertices: true,
        calc_tangent_space: true,
    };
}

/// A mesh as it comes out of a file decoder, before post-processing.
///
/// Polygons may have any number of corners and index into `vertices`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonMesh {
    /// Mesh name, empty when the format has none.
    pub name: String,
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Polygon corner indices.
    pub polygons: Vec<Vec<u32>>,
}

impl PolygonMesh {
    /// Create an empty named mesh.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Check that every polygon index refers to an existing vertex.
    pub fn check_indices(&self) -> Result<()> {
        let n = self.vertices.len();
        for (fi, poly) in self.polygons.iter().enumerate() {
            if let Some(&bad) = poly.iter().find(|&&i| i as usize >= n) {
                return Err(ImportError::invalid_content(format!(
                    "face {fi} of mesh `{}` references vertex {bad}, but only {n} exist",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// One triangulated mesh within a [`Scene`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubMesh {
    /// Mesh name, empty when the format has none.
    pub name: String,
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Triangles as vertex index triples.
    pub faces: Vec<[u32; 3]>,
    /// Per-vertex tangents, empty unless tangent space was requested.
    pub tangents: Vec<Vec3>,
}

impl SubMesh {
    /// Positions of the three corners of face `i`.
    pub fn face_vertices(&self, i: usize) -> Option<[Point3; 3]> {
        let [a, b, c] = *self.faces.get(i)?;
        Some([
            *self.vertices.get(a as usize)?,
            *self.vertices.get(b as usize)?,
            *self.vertices.get(c as usize)?,
        ])
    }
}

/// The decoded contents of one file: an ordered list of sub-meshes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Sub-meshes in file order.
    pub meshes: Vec<SubMesh>,
}

impl Scene {
    /// Sub-mesh by position.
    pub fn mesh(&self, index: usize) -> Option<&SubMesh> {
        self.meshes.get(index)
    }

    /// First sub-mesh whose name equals `name` exactly.
    pub fn find_mesh(&self, name: &str) -> Option<&SubMesh> {
        self.meshes.iter().find(|m| m.name == name)
    }

    /// Number of sub-meshes.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// True when the scene has no sub-meshes.
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Total number of triangles over all sub-meshes.
    pub fn face_count(&self) -> usize {
        self.meshes.iter().map(|m| m.faces.len()).sum()
    }
}

/// Turn a decoded polygon mesh into a triangulated sub-mesh.
pub fn process(mesh: PolygonMesh, flags: PostProcess) -> Result<SubMesh> {
    mesh.check_indices()?;
    let PolygonMesh {
        name,
        mut vertices,
        polygons,
    } = mesh;

    let mut faces = Vec::with_capacity(polygons.len());
    let mut dropped = 0usize;
    for poly in &polygons {
        match poly.len() {
            3 => faces.push([poly[0], poly[1], poly[2]]),
            n if n > 3 && flags.triangulate => {
                for i in 1..n - 1 {
                    faces.push([poly[0], poly[i], poly[i + 1]]);
                }
            }
            _ => dropped += 1,
        }
    }
    if dropped > 0 {
        warn!(mesh = %name, dropped, "skipped faces that are not triangles");
    }

    if flags.join_identical_vertices {
        let (welded, remap) = weld(&vertices);
        for face in &mut faces {
            for idx in face.iter_mut() {
                *idx = remap[*idx as usize];
            }
        }
        vertices = welded;
    }

    let tangents = if flags.calc_tangent_space {
        tangents(&vertices, &faces)
    } else {
        Vec::new()
    };

    Ok(SubMesh {
        name,
        vertices,
        faces,
        tangents,
    })
}

fn position_key(p: &Point3) -> [u64; 3] {
    // +0.0 and -0.0 weld together
    let bits = |v: f64| if v == 0.0 { 0u64 } else { v.to_bits() };
    [bits(p.x), bits(p.y), bits(p.z)]
}

/// Merge bit-identical positions; returns the unique list and an old-to-new remap.
fn weld(vertices: &[Point3]) -> (Vec<Point3>, Vec<u32>) {
    let mut seen: HashMap<[u64; 3], u32> = HashMap::with_capacity(vertices.len());
    let mut unique = Vec::with_capacity(vertices.len());
    let mut remap = Vec::with_capacity(vertices.len());
    for p in vertices {
        let next = unique.len() as u32;
        let idx = *seen.entry(position_key(p)).or_insert_with(|| {
            unique.push(*p);
            next
        });
        remap.push(idx);
    }
    (unique, remap)
}

/// Per-vertex tangents, averaged from the first edge of each incident face.
fn tangents(vertices: &[Point3], faces: &[[u32; 3]]) -> Vec<Vec3> {
    let mut acc = vec![Vec3::zeros(); vertices.len()];
    for &[a, b, _] in faces {
        let edge = vertices[b as usize] - vertices[a as usize];
        let len = edge.norm();
        if len == 0.0 {
            continue;
        }
        let t = edge / len;
        for &i in &[a, b] {
            acc[i as usize] += t;
        }
    }
    for t in &mut acc {
        let len = t.norm();
        if len > 0.0 {
            *t /= len;
        }
    }
    acc
}
