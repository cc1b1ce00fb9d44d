//! Volumetric decomposition: mesh file to an assembly of tetrahedra.

use std::path::Path;
use std::sync::Arc;

use cadmesh_geom::{AssemblyVolume, LogicalVolume, Tet};
use cadmesh_math::{Point3, Transform, Vec3};
use cadmesh_tetgen::{
    load_off, load_ply, load_stl, load_tetmesh, Behavior, MesherError, Tetgen, TetgenIo,
    Tetrahedralizer,
};
use tracing::{debug, error, info};

use crate::descriptor::{FileType, MeshDescriptor};
use crate::error::{CadMeshError, Result};

/// Tetrahedra between progress reports.
const PROGRESS_INTERVAL: usize = 1000;

// Reported at info when the descriptor is verbose, debug otherwise.
macro_rules! chatty {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose > 0 {
            info!($($arg)+);
        } else {
            debug!($($arg)+);
        }
    };
}

impl MeshDescriptor {
    /// Build the tetrahedral assembly using the TetGen executable named by
    /// [`TETGEN_ENV`](cadmesh_tetgen::TETGEN_ENV), or `tetgen` on the `PATH`.
    pub fn tetrahedral_mesh(&mut self) -> Result<Arc<AssemblyVolume>> {
        self.tetrahedral_mesh_with(&Tetgen::from_env())
    }

    /// Build the tetrahedral assembly, tetrahedralizing with `mesher`.
    ///
    /// STL and PLY surfaces are loaded and tetrahedralized with
    /// [`Behavior::new`]`(quality)`. TET and OFF files are used as they are.
    /// Each tetrahedron `i` becomes a [`Tet`] named `<file>_tet_<i>_solid`
    /// with corners `raw * units - offset`, wrapped in a logical volume
    /// `<file>_tet_<i>_logical` and placed at the identity.
    ///
    /// Fails with [`CadMeshError::MissingMaterial`] before loading anything
    /// when no material is set.
    #[tracing::instrument(skip_all, fields(path = %self.file_name, file_type = %self.file_type))]
    pub fn tetrahedral_mesh_with(
        &mut self,
        mesher: &dyn Tetrahedralizer,
    ) -> Result<Arc<AssemblyVolume>> {
        let Some(material) = self.material.clone() else {
            error!("no material set for {}", self.file_name);
            return Err(CadMeshError::MissingMaterial {
                path: self.file_name.clone(),
            });
        };
        if !self.file_type.is_volumetric() {
            error!("no volumetric loader for file type {}", self.file_type);
            return Err(CadMeshError::UnsupportedType {
                file_type: self.file_type.to_string(),
            });
        }

        let (input_points, output) = self.load_volume(mesher)?;
        let tetrahedra = output.number_of_tetrahedra();

        chatty!(self.verbose, tetrahedra, "tetrahedra available");
        chatty!(
            self.verbose,
            units = self.transform.scale,
            offset = ?self.transform.offset,
            "placing tetrahedra"
        );

        let mut assembly = AssemblyVolume::new();
        for i in 0..tetrahedra {
            let [p1, p2, p3, p4] = self.tet_corners(&output, i)?;
            let name = format!("{}_tet_{}", self.file_name, i);
            let tet = Tet::new(format!("{name}_solid"), p1, p2, p3, p4, 0.0);
            let logical =
                LogicalVolume::new(tet, Some(Arc::clone(&material)), format!("{name}_logical"))?;
            assembly.add_placed_volume(Arc::new(logical), Vec3::zeros(), &Transform::identity());

            if (i + 1) % PROGRESS_INTERVAL == 0 {
                chatty!(self.verbose, done = i + 1, total = tetrahedra, "placing tetrahedra");
            }
        }

        chatty!(
            self.verbose,
            tetrahedra = assembly.len(),
            material = %material.name,
            "built tetrahedral assembly"
        );

        let assembly = Arc::new(assembly);
        self.input_points = input_points;
        self.output_points = output.number_of_points();
        self.tetrahedra = tetrahedra;
        self.assembly = Some(Arc::clone(&assembly));
        Ok(assembly)
    }

    /// Load the file and tetrahedralize it if needed.
    ///
    /// Returns the input point count (0 when no tetrahedralization ran) and
    /// the final buffers.
    fn load_volume(&self, mesher: &dyn Tetrahedralizer) -> Result<(usize, TetgenIo)> {
        let path = Path::new(&self.file_name);
        let input = match self.file_type {
            FileType::Stl => load_stl(path)?,
            FileType::Ply => load_ply(path)?,
            FileType::Tet => return Ok((0, load_tetmesh(path)?)),
            FileType::Off => return Ok((0, load_off(path)?)),
            FileType::Obj | FileType::Other(_) => {
                return Err(CadMeshError::UnsupportedType {
                    file_type: self.file_type.to_string(),
                })
            }
        };

        let behavior = Behavior::new(self.quality);
        debug!(
            points = input.number_of_points(),
            facets = input.facets.len(),
            quality = behavior.quality,
            "tetrahedralizing"
        );
        let output = mesher.tetrahedralize(&behavior, &input)?;
        Ok((input.number_of_points(), output))
    }

    /// World-space corners of tetrahedron `i`.
    fn tet_corners(&self, output: &TetgenIo, i: usize) -> Result<[Point3; 4]> {
        let count = output.number_of_points();
        let corners = output
            .tetrahedron(i)
            .filter(|c| c.len() >= 4)
            .ok_or_else(|| MesherError::invalid_content(format!("tetrahedron {i} is incomplete")))?;
        let mut points = [Point3::origin(); 4];
        for (k, &index) in corners[..4].iter().enumerate() {
            let raw = output
                .point(index)
                .ok_or(MesherError::IndexOutOfRange { index, count })?;
            points[k] = self.transform.volumetric_point(&raw);
        }
        Ok(points)
    }
}
