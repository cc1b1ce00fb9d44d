//! Error types for mesh loading.

use cadmesh_geom::GeomError;
use cadmesh_import::ImportError;
use cadmesh_tetgen::MesherError;
use thiserror::Error;

/// Errors returned by [`MeshDescriptor`](crate::MeshDescriptor) operations.
#[derive(Error, Debug)]
pub enum CadMeshError {
    /// The requested sub-mesh is not in the decoded scene.
    #[error("mesh `{name}` not found in {path}")]
    NotFound {
        /// Requested name, or `#<index>` for index lookups.
        name: String,
        /// Source file.
        path: String,
    },

    /// No facets could be built: the file is missing, unreadable or empty.
    #[error("mesh has 0 faces, {path} may not exist")]
    EmptyGeometry {
        /// Source file.
        path: String,
        /// Importer failure, if that is why nothing was built.
        #[source]
        source: Option<ImportError>,
    },

    /// A tetrahedral mesh was requested without a material.
    #[error("no material set for tetrahedral mesh of {path}")]
    MissingMaterial {
        /// Source file.
        path: String,
    },

    /// The file type has no volumetric loader.
    #[error("unsupported file type for tetrahedral meshing: {file_type}")]
    UnsupportedType {
        /// The declared file type.
        file_type: String,
    },

    /// A descriptor setting is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Volumetric loader or mesher failure.
    #[error(transparent)]
    Mesher(#[from] MesherError),

    /// Kernel object construction failure.
    #[error(transparent)]
    Geom(#[from] GeomError),

    /// TOML configuration could not be parsed.
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CadMeshError {
    /// Create an `InvalidConfig` error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

/// Result type for cadmesh operations.
pub type Result<T> = std::result::Result<T, CadMeshError>;
