#![warn(missing_docs)]

//! Volumetric mesher seam for cadmesh.
//!
//! [`TetgenIo`] holds the flat point, facet and tetrahedron buffers that
//! move between loaders and the mesher. Surfaces come in through
//! [`load_stl`], [`load_ply`] and [`load_off`]; finished tetrahedral meshes
//! through [`load_tetmesh`]. A [`Tetrahedralizer`] turns a surface into
//! tetrahedra; [`Tetgen`] does so by running the TetGen executable, so every
//! [`Behavior`] switch (`-p`, `-Y`, `-q`) is passed on as given.
//!
//! # Example
//!
//! ```no_run
//! use cadmesh_tetgen::{load_stl, Behavior, Tetgen, Tetrahedralizer};
//!
//! let input = load_stl("cube.stl").unwrap();
//! let output = Tetgen::from_env().tetrahedralize(&Behavior::new(1.5), &input).unwrap();
//! println!("{} tetrahedra", output.number_of_tetrahedra());
//! ```

mod error;
mod io;
mod mesher;
mod tetmesh;

pub use error::{MesherError, MesherResult};
pub use io::{load_off, load_ply, load_stl, TetgenIo};
pub use mesher::{Behavior, Tetgen, Tetrahedralizer, DEFAULT_PROGRAM, TETGEN_ENV};
pub use tetmesh::{load_tetmesh, tetmesh_prefix};
