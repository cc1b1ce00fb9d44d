//! Tessellated solids built from triangular facets.

use cadmesh_math::{Point3, Tolerance};

use crate::error::{GeomError, Result};
use crate::facet::TriangularFacet;

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }
}

/// A solid whose boundary is a list of triangular facets.
#[derive(Debug, Clone, PartialEq)]
pub struct TessellatedSolid {
    name: String,
    facets: Vec<TriangularFacet>,
    closed: bool,
}

impl TessellatedSolid {
    /// Create an empty, open solid.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            facets: Vec::new(),
            closed: false,
        }
    }

    /// Solid name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a facet. Facets keep insertion order.
    pub fn add_facet(&mut self, facet: TriangularFacet) {
        self.facets.push(facet);
    }

    /// Mark the facet set as a watertight boundary (or not).
    pub fn set_solid_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    /// Whether the solid has been marked closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of facets.
    pub fn number_of_facets(&self) -> usize {
        self.facets.len()
    }

    /// All facets in insertion order.
    pub fn facets(&self) -> &[TriangularFacet] {
        &self.facets
    }

    /// Total facet area.
    pub fn surface_area(&self) -> f64 {
        self.facets.iter().map(TriangularFacet::area).sum()
    }

    /// Enclosed volume by the divergence theorem.
    ///
    /// Only meaningful for closed, consistently wound solids. Inward winding
    /// gives a negative value.
    pub fn volume(&self) -> f64 {
        self.facets.iter().map(TriangularFacet::signed_volume).sum()
    }

    /// Bounding box of all facet vertices, or `None` when there are no facets.
    pub fn bounding_box(&self) -> Option<Aabb3> {
        if self.facets.is_empty() {
            return None;
        }
        let mut aabb = Aabb3::empty();
        for p in self.facets.iter().flat_map(|f| f.vertices().iter()) {
            aabb.include_point(p);
        }
        Some(aabb)
    }

    /// Fail on the first degenerate facet.
    pub fn validate(&self, tol: &Tolerance) -> Result<()> {
        match self.facets.iter().position(|f| f.is_degenerate(tol)) {
            Some(index) => Err(GeomError::DegenerateFacet {
                solid: self.name.clone(),
                index,
            }),
            None => Ok(()),
        }
    }
}
