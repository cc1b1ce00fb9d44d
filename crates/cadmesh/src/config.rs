//! TOML configuration for mesh descriptors.
//!
//! ```toml
//! file_name = "detector/housing.stl"
//! file_type = "stl"      # optional, inferred from the extension
//! units = 10.0           # optional, default 1.0 (mm)
//! offset = [0.0, 0.0, -5.0]
//! reverse = false
//! quality = 1.5
//! verbose = 1
//! ```
//!
//! The material is not part of the file; pass it to the builder.

use std::path::Path;

use cadmesh_math::{units, Vec3};
use serde::{Deserialize, Serialize};

use crate::descriptor::MeshDescriptorBuilder;
use crate::error::Result;
use crate::MeshDescriptor;

fn default_units() -> f64 {
    units::MM
}

/// Serializable descriptor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeshConfig {
    /// Source file path.
    pub file_name: String,
    /// Declared file type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    /// Unit scale.
    #[serde(default = "default_units")]
    pub units: f64,
    /// Offset as `[x, y, z]`.
    #[serde(default)]
    pub offset: [f64; 3],
    /// Reverse facet winding.
    #[serde(default)]
    pub reverse: bool,
    /// Tetrahedralization quality bound.
    #[serde(default)]
    pub quality: f64,
    /// Diagnostic verbosity.
    #[serde(default)]
    pub verbose: u32,
}

impl MeshConfig {
    /// Settings for `file_name` with every other field at its default.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            file_type: None,
            units: units::MM,
            offset: [0.0; 3],
            reverse: false,
            quality: 0.0,
            verbose: 0,
        }
    }

    /// Parse from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serialize to a TOML string.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// A descriptor builder preloaded with these settings.
    pub fn into_builder(self) -> MeshDescriptorBuilder {
        let [x, y, z] = self.offset;
        let mut builder = MeshDescriptor::builder(self.file_name)
            .units(self.units)
            .offset(Vec3::new(x, y, z))
            .reverse(self.reverse)
            .quality(self.quality)
            .verbose(self.verbose);
        if let Some(ft) = self.file_type.as_deref() {
            builder = builder.file_type(ft);
        }
        builder
    }
}

impl From<&MeshDescriptor> for MeshConfig {
    fn from(d: &MeshDescriptor) -> Self {
        let o = d.offset();
        Self {
            file_name: d.file_name().to_string(),
            file_type: Some(d.file_type().to_string()),
            units: d.units(),
            offset: [o.x, o.y, o.z],
            reverse: d.reverse(),
            quality: d.quality(),
            verbose: d.verbose(),
        }
    }
}
