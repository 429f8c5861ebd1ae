//! Surface materials.

use std::f32::consts::FRAC_PI_2;

use tessera_core::MaterialDescription;
use tessera_math::Vec3;

/// Color type alias (linear RGB radiance)
pub type Color = Vec3;

/// Cone half-angle reached at roughness 1.
pub const MAX_CONE_ANGLE: f32 = FRAC_PI_2;

/// A surface material.
///
/// Every bounce picks between a glossy reflection (with probability
/// `reflectivity`) and a diffuse one; both are weighted by `diffuse` and
/// add `emission`.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub diffuse: Color,
    pub emission: Color,
    pub reflectivity: f32,
    pub roughness: f32,
}

impl Material {
    /// Create a new material. `reflectivity` and `roughness` are clamped to [0, 1].
    pub fn new(diffuse: Color, emission: Color, reflectivity: f32, roughness: f32) -> Self {
        Self {
            diffuse,
            emission,
            reflectivity: reflectivity.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
        }
    }

    /// A matte, non-emissive material.
    pub fn lambertian(diffuse: Color) -> Self {
        Self::new(diffuse, Color::ZERO, 0.0, 0.0)
    }

    /// A black emitter.
    pub fn light(emission: Color) -> Self {
        Self::new(Color::ZERO, emission, 0.0, 0.0)
    }

    /// Half-angle (radians) of the cone that glossy bounces are drawn from.
    pub fn reflection_cone_angle(&self) -> f32 {
        self.roughness * MAX_CONE_ANGLE
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::lambertian(Color::splat(0.5))
    }
}

impl From<&MaterialDescription> for Material {
    fn from(desc: &MaterialDescription) -> Self {
        Self::new(desc.diffuse, desc.emission, desc.reflectivity, desc.roughness)
    }
}
