#![warn(missing_docs)]

//! Load CAD mesh files as simulation geometry.
//!
//! A [`MeshDescriptor`] names a mesh file together with a unit scale, an
//! offset, a winding flag and (for volumetric use) a material. From it you
//! can build either:
//!
//! - a closed [`TessellatedSolid`] with one facet per triangle of a chosen
//!   sub-mesh ([`MeshDescriptor::tessellated_mesh`]), or
//! - an [`AssemblyVolume`] holding one placed tetrahedron per cell of a
//!   TetGen tetrahedralization ([`MeshDescriptor::tetrahedral_mesh`]).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cadmesh::{units, Material, MeshDescriptor, MeshSelector};
//!
//! let mut surface = MeshDescriptor::builder("bunny.stl")
//!     .units(units::CM)
//!     .build()
//!     .unwrap();
//! let solid = surface.tessellated_mesh(MeshSelector::Default).unwrap();
//! println!("{} facets", solid.number_of_facets());
//!
//! let mut volume = MeshDescriptor::builder("bunny.stl")
//!     .material(Arc::new(Material::new("G4_WATER", 1.0)))
//!     .quality(2.0)
//!     .build()
//!     .unwrap();
//! let assembly = volume.tetrahedral_mesh().unwrap();
//! println!("{} tetrahedra", assembly.len());
//! ```

mod config;
mod descriptor;
mod error;
mod tessellation;
mod tetrahedral;

pub use config::MeshConfig;
pub use descriptor::{FileType, MeshDescriptor, MeshDescriptorBuilder};
pub use error::{CadMeshError, Result};
pub use tessellation::MeshSelector;

// Re-exports so callers need only this crate.
pub use cadmesh_geom::{
    AssemblyVolume, LogicalVolume, Material, MaterialState, PhysicalVolume, PlacedVolume, Solid,
    TessellatedSolid, Tet, TriangularFacet,
};
pub use cadmesh_import::{FileImporter, PostProcess, Scene, SceneImporter, SubMesh};
pub use cadmesh_math::{units, Point3, Transform, UnitTransform, Vec3};
pub use cadmesh_tetgen::{Behavior, MesherError, MesherResult, Tetgen, TetgenIo, Tetrahedralizer};
