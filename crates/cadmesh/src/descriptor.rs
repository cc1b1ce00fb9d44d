//! The mesh descriptor: source file, unit transform, material and outputs.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use cadmesh_geom::{AssemblyVolume, Material, TessellatedSolid};
use cadmesh_math::{units, UnitTransform, Vec3};

use crate::error::{CadMeshError, Result};

// =============================================================================
// File type
// =============================================================================

/// Declared type of the source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileType {
    /// Stereolithography surface.
    Stl,
    /// Polygon File Format surface.
    Ply,
    /// TetGen `.node`/`.ele` tetrahedral mesh.
    Tet,
    /// Object File Format polyhedron.
    Off,
    /// Wavefront OBJ surface (surface path only).
    Obj,
    /// Anything else, upper-cased.
    Other(String),
}

impl FileType {
    /// Parse a type name, ignoring case.
    pub fn parse(name: &str) -> Self {
        let upper = name.trim().to_ascii_uppercase();
        match upper.as_str() {
            "STL" => Self::Stl,
            "PLY" => Self::Ply,
            "TET" | "NODE" | "ELE" => Self::Tet,
            "OFF" => Self::Off,
            "OBJ" => Self::Obj,
            _ => Self::Other(upper),
        }
    }

    /// Infer from a path's extension; no extension gives `Other("")`.
    pub fn from_path(path: &Path) -> Self {
        Self::parse(path.extension().and_then(|e| e.to_str()).unwrap_or(""))
    }

    /// Whether the volumetric builder can load this type.
    pub fn is_volumetric(&self) -> bool {
        matches!(self, Self::Stl | Self::Ply | Self::Tet | Self::Off)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stl => f.write_str("STL"),
            Self::Ply => f.write_str("PLY"),
            Self::Tet => f.write_str("TET"),
            Self::Off => f.write_str("OFF"),
            Self::Obj => f.write_str("OBJ"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FileType {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

// =============================================================================
// Validation
// =============================================================================

fn check_units(scale: f64) -> Result<()> {
    if scale.is_finite() && scale != 0.0 {
        Ok(())
    } else {
        Err(CadMeshError::invalid_config(format!(
            "unit scale must be finite and non-zero, got {scale}"
        )))
    }
}

fn check_offset(offset: &Vec3) -> Result<()> {
    if offset.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(CadMeshError::invalid_config("offset must be finite"))
    }
}

fn check_quality(quality: f64) -> Result<()> {
    if quality.is_finite() && quality >= 0.0 {
        Ok(())
    } else {
        Err(CadMeshError::invalid_config(format!(
            "quality must be finite and >= 0, got {quality}"
        )))
    }
}

// =============================================================================
// Descriptor
// =============================================================================

/// Configuration and results for one mesh file.
///
/// Build one with [`MeshDescriptor::builder`], then call
/// [`tessellated_mesh`](MeshDescriptor::tessellated_mesh) or
/// [`tetrahedral_mesh`](MeshDescriptor::tetrahedral_mesh). Each call
/// replaces the previous output of the same kind.
#[derive(Debug, Clone)]
pub struct MeshDescriptor {
    pub(crate) file_name: String,
    pub(crate) file_type: FileType,
    pub(crate) transform: UnitTransform,
    pub(crate) reverse: bool,
    pub(crate) material: Option<Arc<Material>>,
    pub(crate) quality: f64,
    pub(crate) verbose: u32,
    pub(crate) solid: Option<Arc<TessellatedSolid>>,
    pub(crate) assembly: Option<Arc<AssemblyVolume>>,
    pub(crate) input_points: usize,
    pub(crate) output_points: usize,
    pub(crate) tetrahedra: usize,
}

impl MeshDescriptor {
    /// Start building a descriptor for `file_name`.
    pub fn builder(file_name: impl Into<String>) -> MeshDescriptorBuilder {
        MeshDescriptorBuilder::new(file_name)
    }

    /// Source file path.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Alias of [`file_name`](Self::file_name).
    #[deprecated(note = "use `file_name`")]
    pub fn mesh_name(&self) -> &str {
        self.file_name()
    }

    /// Declared file type.
    pub fn file_type(&self) -> &FileType {
        &self.file_type
    }

    /// Unit scale applied to raw coordinates.
    pub fn units(&self) -> f64 {
        self.transform.scale
    }

    /// Offset applied after scaling.
    pub fn offset(&self) -> Vec3 {
        self.transform.offset
    }

    /// The combined scale and offset.
    pub fn unit_transform(&self) -> &UnitTransform {
        &self.transform
    }

    /// Whether facet winding is reversed.
    pub fn reverse(&self) -> bool {
        self.reverse
    }

    /// Material given to every tetrahedron.
    pub fn material(&self) -> Option<&Arc<Material>> {
        self.material.as_ref()
    }

    /// Tetrahedralization quality bound.
    pub fn quality(&self) -> f64 {
        self.quality
    }

    /// Diagnostic verbosity.
    pub fn verbose(&self) -> u32 {
        self.verbose
    }

    /// Last tessellated solid built, if any.
    pub fn solid(&self) -> Option<Arc<TessellatedSolid>> {
        self.solid.clone()
    }

    /// Last assembly built, if any.
    pub fn assembly(&self) -> Option<Arc<AssemblyVolume>> {
        self.assembly.clone()
    }

    /// Points handed to the mesher in the last tetrahedral build.
    pub fn input_point_count(&self) -> usize {
        self.input_points
    }

    /// Points in the mesher output of the last tetrahedral build.
    pub fn output_point_count(&self) -> usize {
        self.output_points
    }

    /// Tetrahedra in the mesher output of the last tetrahedral build.
    pub fn tetrahedron_count(&self) -> usize {
        self.tetrahedra
    }

    /// Set the unit scale.
    pub fn set_units(&mut self, scale: f64) -> Result<()> {
        check_units(scale)?;
        self.transform.scale = scale;
        Ok(())
    }

    /// Set the offset.
    pub fn set_offset(&mut self, offset: Vec3) -> Result<()> {
        check_offset(&offset)?;
        self.transform.offset = offset;
        Ok(())
    }

    /// Set winding reversal.
    pub fn set_reverse(&mut self, reverse: bool) {
        self.reverse = reverse;
    }

    /// Set or clear the material.
    pub fn set_material(&mut self, material: Option<Arc<Material>>) {
        self.material = material;
    }

    /// Set the quality bound.
    pub fn set_quality(&mut self, quality: f64) -> Result<()> {
        check_quality(quality)?;
        self.quality = quality;
        Ok(())
    }

    /// Set diagnostic verbosity.
    pub fn set_verbose(&mut self, verbose: u32) {
        self.verbose = verbose;
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`MeshDescriptor`].
#[derive(Debug, Clone)]
pub struct MeshDescriptorBuilder {
    file_name: String,
    file_type: Option<FileType>,
    units: f64,
    offset: Vec3,
    reverse: bool,
    material: Option<Arc<Material>>,
    quality: f64,
    verbose: u32,
}

impl MeshDescriptorBuilder {
    fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            file_type: None,
            units: units::MM,
            offset: Vec3::zeros(),
            reverse: false,
            material: None,
            quality: 0.0,
            verbose: 0,
        }
    }

    /// Declare the file type instead of inferring it from the extension.
    pub fn file_type(mut self, file_type: impl Into<FileType>) -> Self {
        self.file_type = Some(file_type.into());
        self
    }

    /// Unit scale (default [`units::MM`]).
    pub fn units(mut self, scale: f64) -> Self {
        self.units = scale;
        self
    }

    /// Offset (default zero).
    pub fn offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Reverse facet winding.
    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Material for tetrahedral meshes.
    pub fn material(mut self, material: Arc<Material>) -> Self {
        self.material = Some(material);
        self
    }

    /// Quality bound (default 0, no refinement).
    pub fn quality(mut self, quality: f64) -> Self {
        self.quality = quality;
        self
    }

    /// Diagnostic verbosity.
    pub fn verbose(mut self, verbose: u32) -> Self {
        self.verbose = verbose;
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<MeshDescriptor> {
        if self.file_name.is_empty() {
            return Err(CadMeshError::invalid_config("file name must not be empty"));
        }
        check_units(self.units)?;
        check_offset(&self.offset)?;
        check_quality(self.quality)?;

        let file_type = self
            .file_type
            .unwrap_or_else(|| FileType::from_path(Path::new(&self.file_name)));

        Ok(MeshDescriptor {
            file_name: self.file_name,
            file_type,
            transform: UnitTransform::new(self.units, self.offset),
            reverse: self.reverse,
            material: self.material,
            quality: self.quality,
            verbose: self.verbose,
            solid: None,
            assembly: None,
            input_points: 0,
            output_points: 0,
            tetrahedra: 0,
        })
    }
}
