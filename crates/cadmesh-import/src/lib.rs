#![warn(missing_docs)]

//! Mesh file importer for cadmesh.
//!
//! Decodes surface mesh files into a [`Scene`] of named, triangulated
//! [`SubMesh`]es:
//!
//! - **STL**: ASCII (one mesh per `solid` block) and binary
//! - **PLY**: ASCII and binary, via `ply-rs`
//! - **OBJ**: one mesh per `o`/`g` statement
//! - **OFF**: single polyhedron
//!
//! The [`SceneImporter`] trait is the seam callers depend on;
//! [`FileImporter`] is the default implementation.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use cadmesh_import::{FileImporter, PostProcess, SceneImporter};
//!
//! let scene = FileImporter
//!     .read_file(Path::new("model.obj"), PostProcess::MESH_IMPORT)
//!     .unwrap();
//! for mesh in &scene.meshes {
//!     println!("{}: {} triangles", mesh.name, mesh.faces.len());
//! }
//! ```

mod error;
pub mod obj;
pub mod off;
pub mod ply;
mod scene;
pub mod stl;

pub use error::{ImportError, Result};
pub use scene::{process, PolygonMesh, PostProcess, Scene, SubMesh};

use std::path::Path;

use tracing::debug;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// Stereolithography.
    Stl,
    /// Polygon File Format.
    Ply,
    /// Wavefront OBJ.
    Obj,
    /// Object File Format.
    Off,
}

impl MeshFormat {
    /// Detect format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "stl" => Some(Self::Stl),
            "ply" => Some(Self::Ply),
            "obj" => Some(Self::Obj),
            "off" => Some(Self::Off),
            _ => None,
        }
    }

    /// Detect format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Something that can decode a file into a [`Scene`].
pub trait SceneImporter {
    /// Decode `path`, applying the requested post-processing.
    fn read_file(&self, path: &Path, flags: PostProcess) -> Result<Scene>;
}

/// The built-in importer, dispatching on file extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImporter;

impl SceneImporter for FileImporter {
    #[tracing::instrument(level = "debug", skip_all, fields(path = %path.display(), ?flags))]
    fn read_file(&self, path: &Path, flags: PostProcess) -> Result<Scene> {
        let format = MeshFormat::from_path(path).ok_or_else(|| ImportError::UnknownFormat {
            extension: path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
        })?;
        if !path.exists() {
            return Err(ImportError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let raw = match format {
            MeshFormat::Stl => stl::load_stl(path)?,
            MeshFormat::Ply => vec![ply::load_ply(path)?],
            MeshFormat::Obj => obj::load_obj(path)?,
            MeshFormat::Off => vec![off::load_off(path)?],
        };

        let meshes = raw
            .into_iter()
            .map(|m| process(m, flags))
            .collect::<Result<Vec<_>>>()?;
        let scene = Scene { meshes };
        debug!(
            ?format,
            meshes = scene.len(),
            faces = scene.face_count(),
            "imported scene"
        );
        Ok(scene)
    }
}
