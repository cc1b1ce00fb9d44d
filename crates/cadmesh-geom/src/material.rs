//! Bulk materials attached to logical volumes.

/// Physical state of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaterialState {
    /// Not specified.
    #[default]
    Undefined,
    /// Solid.
    Solid,
    /// Liquid.
    Liquid,
    /// Gas.
    Gas,
}

/// A named bulk material. Shared between volumes through `Arc<Material>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Material name.
    pub name: String,
    /// Density in g/cm3.
    pub density: f64,
    /// Physical state.
    pub state: MaterialState,
}

impl Material {
    /// Create a material with an undefined state.
    pub fn new(name: impl Into<String>, density: f64) -> Self {
        Self {
            name: name.into(),
            density,
            state: MaterialState::Undefined,
        }
    }

    /// Set the physical state.
    pub fn with_state(mut self, state: MaterialState) -> Self {
        self.state = state;
        self
    }
}
