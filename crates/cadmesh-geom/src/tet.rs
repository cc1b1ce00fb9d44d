//! Tetrahedral solid primitive.

use cadmesh_math::{Point3, Tolerance};

/// A solid tetrahedron given by four absolute corners.
#[derive(Debug, Clone, PartialEq)]
pub struct Tet {
    name: String,
    corners: [Point3; 4],
    tolerance: f64,
}

impl Tet {
    /// Create a tetrahedron, keeping the corner order.
    ///
    /// `tolerance` is extra slack used by [`Tet::is_degenerate`]; builders pass 0.
    pub fn new(
        name: impl Into<String>,
        p1: Point3,
        p2: Point3,
        p3: Point3,
        p4: Point3,
        tolerance: f64,
    ) -> Self {
        Self {
            name: name.into(),
            corners: [p1, p2, p3, p4],
            tolerance,
        }
    }

    /// Solid name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Corners in construction order.
    pub fn vertices(&self) -> &[Point3; 4] {
        &self.corners
    }

    /// Extra tolerance given at construction.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Unsigned volume.
    pub fn volume(&self) -> f64 {
        let [a, b, c, d] = &self.corners;
        ((b - a).dot(&(c - a).cross(&(d - a))) / 6.0).abs()
    }

    /// True when the volume is within `tol` (plus the tet's own tolerance) of zero.
    pub fn is_degenerate(&self, tol: &Tolerance) -> bool {
        self.volume() <= tol.linear + self.tolerance
    }
}
