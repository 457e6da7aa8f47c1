//! Pipe wall materials and their equivalent sand roughness.

use hn_core::Real;

/// Pipe material, determining the equivalent roughness used by the
/// Colebrook-White friction correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Material {
    Steel,
    Polyethylene,
}

impl Material {
    /// Equivalent sand roughness, meters.
    pub fn roughness_m(self) -> Real {
        match self {
            Material::Steel => 1.5e-4,
            Material::Polyethylene => 1.5e-6,
        }
    }
}
