//! Logical and physical volumes.

use std::sync::Arc;

use cadmesh_math::Transform;

use crate::error::{GeomError, Result};
use crate::material::Material;
use crate::solid::TessellatedSolid;
use crate::tet::Tet;

/// Shape carried by a logical volume.
#[derive(Debug, Clone, PartialEq)]
pub enum Solid {
    /// Faceted boundary solid.
    Tessellated(Arc<TessellatedSolid>),
    /// Single tetrahedron.
    Tet(Tet),
}

impl Solid {
    /// Name of the underlying solid.
    pub fn name(&self) -> &str {
        match self {
            Solid::Tessellated(s) => s.name(),
            Solid::Tet(t) => t.name(),
        }
    }

    /// Enclosed volume.
    pub fn volume(&self) -> f64 {
        match self {
            Solid::Tessellated(s) => s.volume(),
            Solid::Tet(t) => t.volume(),
        }
    }
}

impl From<Tet> for Solid {
    fn from(t: Tet) -> Self {
        Solid::Tet(t)
    }
}

impl From<Arc<TessellatedSolid>> for Solid {
    fn from(s: Arc<TessellatedSolid>) -> Self {
        Solid::Tessellated(s)
    }
}

/// A solid paired with a material, plus any daughter placements.
#[derive(Debug, Clone)]
pub struct LogicalVolume {
    name: String,
    solid: Solid,
    material: Arc<Material>,
    daughters: Vec<PhysicalVolume>,
}

impl LogicalVolume {
    /// Create a logical volume. Fails when no material is given.
    pub fn new(
        solid: impl Into<Solid>,
        material: Option<Arc<Material>>,
        name: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let material = material.ok_or_else(|| GeomError::missing_material(&name))?;
        Ok(Self {
            name,
            solid: solid.into(),
            material,
            daughters: Vec::new(),
        })
    }

    /// Volume name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shape.
    pub fn solid(&self) -> &Solid {
        &self.solid
    }

    /// The material.
    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    /// Daughter placements in insertion order.
    pub fn daughters(&self) -> &[PhysicalVolume] {
        &self.daughters
    }

    /// Place a daughter inside this volume.
    pub fn add_daughter(&mut self, daughter: PhysicalVolume) {
        self.daughters.push(daughter);
    }
}

/// A logical volume placed in a mother volume.
#[derive(Debug, Clone)]
pub struct PhysicalVolume {
    /// Placement name.
    pub name: String,
    /// The placed volume.
    pub logical: Arc<LogicalVolume>,
    /// Placement relative to the mother volume.
    pub transform: Transform,
    /// Copy number.
    pub copy_no: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadmesh_math::Point3;

    fn tet() -> Tet {
        Tet::new(
            "t_solid",
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            0.0,
        )
    }

    #[test]
    fn test_logical_volume_requires_material() {
        let err = LogicalVolume::new(tet(), None, "t_logical").unwrap_err();
        assert_eq!(err, GeomError::missing_material("t_logical"));
    }

    #[test]
    fn test_logical_volume_keeps_solid_and_material() {
        let water = Arc::new(Material::new("G4_WATER", 1.0));
        let lv = LogicalVolume::new(tet(), Some(water.clone()), "t_logical").unwrap();
        assert_eq!(lv.name(), "t_logical");
        assert_eq!(lv.solid().name(), "t_solid");
        assert!(Arc::ptr_eq(lv.material(), &water));
        assert!(lv.daughters().is_empty());
    }
}
