#![warn(missing_docs)]

//! Host geometry kernel model for cadmesh.
//!
//! The shapes and containers that imported meshes are turned into:
//! triangular facets gathered into a [`TessellatedSolid`], single
//! tetrahedra ([`Tet`]) wrapped in [`LogicalVolume`]s with a [`Material`],
//! and [`AssemblyVolume`]s that group many placed volumes and imprint them
//! into a parent.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use cadmesh_geom::{AssemblyVolume, LogicalVolume, Material, Tet};
//! use cadmesh_math::{Point3, Transform, Vec3};
//!
//! let water = Arc::new(Material::new("G4_WATER", 1.0));
//! let tet = Tet::new(
//!     "t_solid",
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//!     0.0,
//! );
//! let lv = LogicalVolume::new(tet, Some(water), "t_logical").unwrap();
//!
//! let mut assembly = AssemblyVolume::new();
//! assembly.add_placed_volume(Arc::new(lv), Vec3::zeros(), &Transform::identity());
//! assert_eq!(assembly.len(), 1);
//! ```

mod assembly;
mod error;
mod facet;
mod material;
mod solid;
mod tet;
mod volume;

pub use assembly::{AssemblyVolume, PlacedVolume};
pub use error::{GeomError, Result};
pub use facet::TriangularFacet;
pub use material::{Material, MaterialState};
pub use solid::{Aabb3, TessellatedSolid};
pub use tet::Tet;
pub use volume::{LogicalVolume, PhysicalVolume, Solid};
