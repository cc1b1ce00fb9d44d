//! Error types for geometry construction.

use thiserror::Error;

/// Errors raised while building kernel geometry objects.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeomError {
    /// A logical volume was requested without a material.
    #[error("logical volume `{name}` has no material")]
    MissingMaterial {
        /// Name of the logical volume being built.
        name: String,
    },

    /// A facet has (near) zero area.
    #[error("facet {index} of solid `{solid}` is degenerate")]
    DegenerateFacet {
        /// Name of the owning solid.
        solid: String,
        /// Index of the facet within the solid.
        index: usize,
    },
}

impl GeomError {
    /// Create a missing-material error.
    pub fn missing_material(name: impl Into<String>) -> Self {
        Self::MissingMaterial { name: name.into() }
    }
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeomError>;
