//! Triangular facets.

use cadmesh_math::{Point3, Tolerance, Vec3};

/// A planar triangle given by three absolute vertices.
///
/// The vertex order defines the outward side: the normal follows the
/// right-hand rule over `(a, b, c)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangularFacet {
    vertices: [Point3; 3],
}

impl TriangularFacet {
    /// Create a facet from three absolute vertices, keeping their order.
    pub fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// The three vertices in construction order.
    pub fn vertices(&self) -> &[Point3; 3] {
        &self.vertices
    }

    /// Vertex `i` (0..3).
    pub fn vertex(&self, i: usize) -> Option<&Point3> {
        self.vertices.get(i)
    }

    fn cross(&self) -> Vec3 {
        let [a, b, c] = &self.vertices;
        (b - a).cross(&(c - a))
    }

    /// Unit outward normal. Zero for a degenerate facet.
    pub fn normal(&self) -> Vec3 {
        let n = self.cross();
        let len = n.norm();
        if len > 0.0 {
            n / len
        } else {
            Vec3::zeros()
        }
    }

    /// Facet area.
    pub fn area(&self) -> f64 {
        0.5 * self.cross().norm()
    }

    /// True if the facet area is below the tolerance.
    pub fn is_degenerate(&self, tol: &Tolerance) -> bool {
        tol.is_zero(self.area())
    }

    /// Signed volume of the tetrahedron spanned by the origin and this facet.
    pub(crate) fn signed_volume(&self) -> f64 {
        let [a, b, c] = &self.vertices;
        a.coords.dot(&b.coords.cross(&c.coords)) / 6.0
    }
}
