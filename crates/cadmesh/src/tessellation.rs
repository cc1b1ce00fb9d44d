//! Surface tessellation: decoded sub-mesh to closed tessellated solid.

use std::path::Path;
use std::sync::Arc;

use cadmesh_geom::{TessellatedSolid, TriangularFacet};
use cadmesh_import::{FileImporter, ImportError, PostProcess, SceneImporter, SubMesh};
use cadmesh_math::Tolerance;
use tracing::{debug, error, warn};

use crate::descriptor::MeshDescriptor;
use crate::error::{CadMeshError, Result};

/// Which sub-mesh of a scene to tessellate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MeshSelector {
    /// The first sub-mesh.
    #[default]
    Default,
    /// Sub-mesh by position.
    Index(usize),
    /// First sub-mesh with exactly this name.
    Name(String),
}

impl From<usize> for MeshSelector {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

impl From<&str> for MeshSelector {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for MeshSelector {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl MeshDescriptor {
    /// Tessellate a sub-mesh of the file using the built-in importer.
    pub fn tessellated_mesh(
        &mut self,
        selector: impl Into<MeshSelector>,
    ) -> Result<Arc<TessellatedSolid>> {
        self.tessellated_mesh_with(&FileImporter, selector)
    }

    /// Tessellate a sub-mesh of the file using `importer`.
    ///
    /// Every triangle becomes one facet with vertices `raw * units + offset`,
    /// first two swapped when `reverse` is set. The solid is named after the
    /// file and marked closed. A solid with no facets is an error.
    #[tracing::instrument(skip_all, fields(path = %self.file_name))]
    pub fn tessellated_mesh_with(
        &mut self,
        importer: &dyn SceneImporter,
        selector: impl Into<MeshSelector>,
    ) -> Result<Arc<TessellatedSolid>> {
        let selector = selector.into();
        debug!(?selector, "tessellating");
        let scene = importer
            .read_file(Path::new(&self.file_name), PostProcess::MESH_IMPORT)
            .map_err(|e| {
                error!(error = %e, "failed to import {}", self.file_name);
                self.empty_geometry(Some(e))
            })?;

        let mesh = match &selector {
            MeshSelector::Default => scene.mesh(0),
            MeshSelector::Index(i) => {
                let mesh = scene.mesh(*i).ok_or_else(|| self.not_found(format!("#{i}")))?;
                Some(mesh)
            }
            MeshSelector::Name(name) => {
                let mesh = scene
                    .find_mesh(name)
                    .ok_or_else(|| self.not_found(name.clone()))?;
                Some(mesh)
            }
        };

        let mut solid = TessellatedSolid::new(self.file_name.clone());
        if let Some(mesh) = mesh {
            self.add_facets(&mut solid, mesh)?;
        }
        solid.set_solid_closed(true);

        if solid.number_of_facets() == 0 {
            error!("mesh has 0 faces, {} may not exist", self.file_name);
            return Err(self.empty_geometry(None));
        }
        if let Err(e) = solid.validate(&Tolerance::DEFAULT) {
            warn!(error = %e, "tessellated solid has degenerate facets");
        }
        debug!(facets = solid.number_of_facets(), "built tessellated solid");

        let solid = Arc::new(solid);
        self.solid = Some(Arc::clone(&solid));
        Ok(solid)
    }

    fn add_facets(&self, solid: &mut TessellatedSolid, mesh: &SubMesh) -> Result<()> {
        for i in 0..mesh.faces.len() {
            let [a, b, c] = mesh.face_vertices(i).ok_or_else(|| {
                self.empty_geometry(Some(ImportError::invalid_content(format!(
                    "face {i} of mesh `{}` references a missing vertex",
                    mesh.name
                ))))
            })?;
            let [a, b, c] = [a, b, c].map(|p| self.transform.surface_point(&p));
            let facet = if self.reverse {
                TriangularFacet::new(b, a, c)
            } else {
                TriangularFacet::new(a, b, c)
            };
            solid.add_facet(facet);
        }
        Ok(())
    }

    fn not_found(&self, name: String) -> CadMeshError {
        error!(mesh = %name, "mesh not found in {}", self.file_name);
        CadMeshError::NotFound {
            name,
            path: self.file_name.clone(),
        }
    }

    fn empty_geometry(&self, source: Option<ImportError>) -> CadMeshError {
        CadMeshError::EmptyGeometry {
            path: self.file_name.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadmesh_import::Scene;
    use cadmesh_math::{Point3, Vec3};

    /// Hands back a fixed scene regardless of the path.
    struct FixedScene(Scene);

    impl SceneImporter for FixedScene {
        fn read_file(&self, _path: &Path, flags: PostProcess) -> cadmesh_import::Result<Scene> {
            assert_eq!(flags, PostProcess::MESH_IMPORT);
            Ok(self.0.clone())
        }
    }

    fn triangle(name: &str) -> SubMesh {
        SubMesh {
            name: name.into(),
            vertices: vec![
                Point3::new(1.0, 2.0, 3.0),
                Point3::new(4.0, 5.0, 6.0),
                Point3::new(7.0, 8.0, 10.0),
            ],
            faces: vec![[0, 1, 2]],
            tangents: Vec::new(),
        }
    }

    fn scene(meshes: Vec<SubMesh>) -> FixedScene {
        FixedScene(Scene { meshes })
    }

    #[test]
    fn test_scale_and_offset_are_applied() {
        let mut d = MeshDescriptor::builder("tri.stl")
            .units(2.5)
            .offset(Vec3::new(-1.0, 0.5, 100.0))
            .build()
            .unwrap();
        let solid = d
            .tessellated_mesh_with(&scene(vec![triangle("t")]), MeshSelector::Default)
            .unwrap();
        let raw = triangle("t").vertices;
        for (v, p) in solid.facets()[0].vertices().iter().zip(&raw) {
            let expected = Point3::from(p.coords * 2.5 + Vec3::new(-1.0, 0.5, 100.0));
            approx::assert_relative_eq!(*v, expected);
        }
        assert_eq!(solid.name(), "tri.stl");
        assert!(solid.is_closed());
    }

    #[test]
    fn test_reverse_swaps_first_two_vertices() {
        let importer = scene(vec![triangle("t")]);
        let mut fwd = MeshDescriptor::builder("tri.stl").build().unwrap();
        let mut rev = MeshDescriptor::builder("tri.stl").reverse(true).build().unwrap();
        let f = fwd.tessellated_mesh_with(&importer, 0usize).unwrap();
        let r = rev.tessellated_mesh_with(&importer, 0usize).unwrap();
        let [a, b, c] = f.facets()[0].vertices();
        assert_eq!(r.facets()[0].vertices(), &[*b, *a, *c]);
        approx::assert_relative_eq!(
            r.facets()[0].normal(),
            -f.facets()[0].normal(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_selects_by_name_and_index() {
        let mut second = triangle("second");
        second.faces.push([2, 1, 0]);
        let importer = scene(vec![triangle("first"), second]);
        let mut d = MeshDescriptor::builder("multi.obj").build().unwrap();
        assert_eq!(d.tessellated_mesh_with(&importer, "second").unwrap().number_of_facets(), 2);
        assert_eq!(d.tessellated_mesh_with(&importer, 0usize).unwrap().number_of_facets(), 1);
        assert_eq!(d.solid().unwrap().number_of_facets(), 1);
    }

    #[test]
    fn test_missing_name_and_index() {
        let importer = scene(vec![triangle("first")]);
        let mut d = MeshDescriptor::builder("multi.obj").build().unwrap();
        match d.tessellated_mesh_with(&importer, "absent") {
            Err(CadMeshError::NotFound { name, path }) => {
                assert_eq!(name, "absent");
                assert_eq!(path, "multi.obj");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert!(matches!(
            d.tessellated_mesh_with(&importer, 3usize),
            Err(CadMeshError::NotFound { .. })
        ));
        assert!(d.solid().is_none());
    }

    #[test]
    fn test_empty_scene_is_empty_geometry() {
        let mut d = MeshDescriptor::builder("empty.stl").build().unwrap();
        let err = d
            .tessellated_mesh_with(&scene(Vec::new()), MeshSelector::Default)
            .unwrap_err();
        assert!(matches!(err, CadMeshError::EmptyGeometry { source: None, .. }));

        let mut no_faces = triangle("t");
        no_faces.faces.clear();
        let err = d
            .tessellated_mesh_with(&scene(vec![no_faces]), MeshSelector::Default)
            .unwrap_err();
        assert!(matches!(err, CadMeshError::EmptyGeometry { .. }));
    }

    #[test]
    fn test_bad_face_index_is_reported() {
        let mut bad = triangle("t");
        bad.faces.push([0, 1, 7]);
        let mut d = MeshDescriptor::builder("bad.stl").build().unwrap();
        assert!(matches!(
            d.tessellated_mesh_with(&scene(vec![bad]), MeshSelector::Default),
            Err(CadMeshError::EmptyGeometry { source: Some(_), .. })
        ));
    }

    #[test]
    fn test_missing_file_is_empty_geometry() {
        let mut d = MeshDescriptor::builder("/no/such/mesh.stl").build().unwrap();
        assert!(matches!(
            d.tessellated_mesh(MeshSelector::Default),
            Err(CadMeshError::EmptyGeometry { source: Some(ImportError::FileNotFound { .. }), .. })
        ));
    }
}
