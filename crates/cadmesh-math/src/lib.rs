#![warn(missing_docs)]

//! Math types for cadmesh.
//!
//! Thin wrappers around nalgebra: points, vectors, placement transforms,
//! tolerances, length units, and the [`UnitTransform`] that maps raw mesh
//! coordinates into the host kernel's world space.

use nalgebra::{Matrix4, Vector3, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// Length units expressed in the kernel's base unit (millimetres).
pub mod units {
    /// Micrometre.
    pub const UM: f64 = 1e-3;
    /// Millimetre, the base length unit.
    pub const MM: f64 = 1.0;
    /// Centimetre.
    pub const CM: f64 = 10.0;
    /// Metre.
    pub const M: f64 = 1000.0;
    /// Inch.
    pub const INCH: f64 = 25.4;
}

/// Maps raw mesh-space coordinates to world space.
///
/// Surface meshes add the offset after scaling, volumetric meshes subtract
/// it. Both conventions are kept as they are relied upon by existing models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitTransform {
    /// Multiplier applied to every raw coordinate.
    pub scale: f64,
    /// Offset applied after scaling.
    pub offset: Vec3,
}

impl UnitTransform {
    /// Create a transform from a unit scale and an offset.
    pub fn new(scale: f64, offset: Vec3) -> Self {
        Self { scale, offset }
    }

    /// `raw * scale + offset`, used for tessellated surfaces.
    #[inline]
    pub fn surface_point(&self, raw: &Point3) -> Point3 {
        Point3::from(raw.coords * self.scale + self.offset)
    }

    /// `raw * scale - offset`, used for tetrahedron corners.
    #[inline]
    pub fn volumetric_point(&self, raw: &Point3) -> Point3 {
        Point3::from(raw.coords * self.scale - self.offset)
    }
}

impl Default for UnitTransform {
    fn default() -> Self {
        Self::new(units::MM, Vec3::zeros())
    }
}

/// A 4x4 affine transformation matrix used for placements.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Placement from a translation and a rotation (rotation applied first).
    pub fn from_parts(position: &Vec3, rotation: &Transform) -> Self {
        Self::translation(position.x, position.y, position.z).then(rotation)
    }

    /// Compose: `self` then `other` (self * other).
    ///
    /// Applying the result to a point applies `other` first, then `self`.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Translation component of the transform.
    pub fn translation_part(&self) -> Vec3 {
        Vec3::new(
            self.matrix[(0, 3)],
            self.matrix[(1, 3)],
            self.matrix[(2, 3)],
        )
    }

    /// True when the matrix is exactly the identity.
    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix4::identity()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in mm.
    pub linear: f64,
}

impl Tolerance {
    /// Default tolerance (1e-9 mm).
    pub const DEFAULT: Self = Self { linear: 1e-9 };

    /// Check if a scalar is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_surface_point_adds_offset() {
        let t = UnitTransform::new(2.0, Vec3::new(1.0, -1.0, 0.5));
        let p = t.surface_point(&Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(p, Point3::new(3.0, 3.0, 6.5));
    }

    #[test]
    fn test_volumetric_point_subtracts_offset() {
        let t = UnitTransform::new(2.0, Vec3::new(1.0, -1.0, 0.5));
        let p = t.volumetric_point(&Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(p, Point3::new(1.0, 5.0, 5.5));
    }

    #[test]
    fn test_default_unit_transform_is_identity() {
        let t = UnitTransform::default();
        let raw = Point3::new(-4.0, 0.25, 9.0);
        assert_eq!(t.surface_point(&raw), raw);
        assert_eq!(t.volumetric_point(&raw), raw);
    }

    #[test]
    fn test_units() {
        assert_relative_eq!(units::M, 1000.0 * units::MM);
        assert_relative_eq!(units::CM, 10.0 * units::MM);
        assert_relative_eq!(units::INCH, 2.54 * units::CM);
        assert_relative_eq!(units::UM * 1000.0, units::MM);
    }

    #[test]
    fn test_translation() {
        let t = Transform::translation(10.0, 20.0, 30.0);
        let result = t.apply_point(&Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(result, Point3::new(11.0, 22.0, 33.0));
        assert_eq!(t.translation_part(), Vec3::new(10.0, 20.0, 30.0));
    }

    #[test]
    fn test_from_parts_rotates_then_translates() {
        let quarter_turn = Transform {
            matrix: nalgebra::Rotation3::from_axis_angle(&Vec3::z_axis(), PI / 2.0)
                .to_homogeneous(),
        };
        let placement = Transform::from_parts(&Vec3::new(5.0, 0.0, 0.0), &quarter_turn);
        let result = placement.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((result.x - 5.0).abs() < 1e-12);
        assert!((result.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_identity() {
        assert!(Transform::identity().is_identity());
        assert!(Transform::default().is_identity());
        assert!(!Transform::translation(0.0, 0.0, 1.0).is_identity());
    }

    #[test]
    fn test_tolerance() {
        let tol = Tolerance::DEFAULT;
        assert_eq!(Tolerance::default().linear, tol.linear);
        assert!(tol.is_zero(1e-12));
        assert!(tol.is_zero(0.0));
        assert!(!tol.is_zero(1e-3));
    }
}
