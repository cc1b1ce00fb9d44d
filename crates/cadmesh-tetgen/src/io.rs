//! Flat mesher buffers and the surface loaders that fill them.

use std::path::Path;

use cadmesh_import::{ply, stl, PolygonMesh, PostProcess};
use cadmesh_math::Point3;
use tracing::debug;

use crate::error::{MesherError, MesherResult};

/// Point, facet and tetrahedron buffers exchanged with the mesher.
///
/// `points` holds `x, y, z` triples. `tetrahedra` holds
/// `corners_per_tet` 0-based point indices per tetrahedron.
#[derive(Debug, Clone, PartialEq)]
pub struct TetgenIo {
    /// Flat coordinate array.
    pub points: Vec<f64>,
    /// Boundary polygons as point indices.
    pub facets: Vec<Vec<usize>>,
    /// Flat tetrahedron corner indices.
    pub tetrahedra: Vec<usize>,
    /// Corners stored per tetrahedron (4, or 10 for second order).
    pub corners_per_tet: usize,
}

impl Default for TetgenIo {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            facets: Vec::new(),
            tetrahedra: Vec::new(),
            corners_per_tet: 4,
        }
    }
}

impl TetgenIo {
    /// Number of points.
    pub fn number_of_points(&self) -> usize {
        self.points.len() / 3
    }

    /// Number of tetrahedra.
    pub fn number_of_tetrahedra(&self) -> usize {
        if self.corners_per_tet == 0 {
            0
        } else {
            self.tetrahedra.len() / self.corners_per_tet
        }
    }

    /// Point `i`.
    pub fn point(&self, i: usize) -> Option<Point3> {
        let c = self.points.get(3 * i..3 * i + 3)?;
        Some(Point3::new(c[0], c[1], c[2]))
    }

    /// Corner indices of tetrahedron `i`.
    pub fn tetrahedron(&self, i: usize) -> Option<&[usize]> {
        let n = self.corners_per_tet;
        self.tetrahedra.get(n * i..n * i + n)
    }

    /// Append a point, returning its index.
    pub fn push_point(&mut self, p: &Point3) -> usize {
        self.points.extend_from_slice(&[p.x, p.y, p.z]);
        self.number_of_points() - 1
    }

    /// Check that all facet and tetrahedron indices refer to existing points.
    pub fn validate(&self) -> MesherResult<()> {
        let count = self.number_of_points();
        let bad = self
            .facets
            .iter()
            .flatten()
            .chain(self.tetrahedra.iter())
            .find(|&&i| i >= count);
        match bad {
            Some(&index) => Err(MesherError::IndexOutOfRange { index, count }),
            None => Ok(()),
        }
    }

    fn append_polygons(&mut self, mesh: PolygonMesh) {
        let base = self.number_of_points();
        for p in &mesh.vertices {
            self.push_point(p);
        }
        self.facets.extend(
            mesh.polygons
                .into_iter()
                .map(|poly| poly.into_iter().map(|i| base + i as usize).collect::<Vec<_>>()),
        );
    }
}

/// Load an STL surface: welded points and one triangle facet per face.
///
/// All solids in the file are merged into a single input.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn load_stl<P: AsRef<Path>>(path: P) -> MesherResult<TetgenIo> {
    let flags = PostProcess {
        triangulate: true,
        join_identical_vertices: true,
        calc_tangent_space: false,
    };
    let mut merged = PolygonMesh::default();
    for solid in stl::load_stl(path)? {
        let base = merged.vertices.len() as u32;
        merged.vertices.extend(solid.vertices);
        merged.polygons.extend(
            solid
                .polygons
                .into_iter()
                .map(|p| p.into_iter().map(|i| base + i).collect::<Vec<u32>>()),
        );
    }
    let sub = cadmesh_import::process(merged, flags)?;

    let mut io = TetgenIo::default();
    io.append_polygons(PolygonMesh {
        name: sub.name,
        vertices: sub.vertices,
        polygons: sub.faces.into_iter().map(|f| f.to_vec()).collect(),
    });
    debug!(
        points = io.number_of_points(),
        facets = io.facets.len(),
        "loaded STL surface"
    );
    Ok(io)
}

/// Load a PLY surface, keeping polygon facets as they are.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn load_ply<P: AsRef<Path>>(path: P) -> MesherResult<TetgenIo> {
    let mesh = ply::load_ply(path)?;
    mesh.check_indices()?;
    let mut io = TetgenIo::default();
    io.append_polygons(mesh);
    debug!(
        points = io.number_of_points(),
        facets = io.facets.len(),
        "loaded PLY surface"
    );
    Ok(io)
}

/// Load an OFF polyhedron. No tetrahedra are produced.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn load_off<P: AsRef<Path>>(path: P) -> MesherResult<TetgenIo> {
    let mut io = TetgenIo::default();
    io.append_polygons(cadmesh_import::off::load_off(path)?);
    debug!(
        points = io.number_of_points(),
        facets = io.facets.len(),
        "loaded OFF polyhedron"
    );
    Ok(io)
}
