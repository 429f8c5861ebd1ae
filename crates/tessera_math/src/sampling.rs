//! Direction warps used by the radiance estimator.
//!
//! All samplers take a pair of canonical numbers `u, v` in `[0,1)` so that
//! callers control stratification.

use crate::{OrthoNormalBasis, Vec3};
use std::f32::consts::PI;

/// Reflect `v` about the normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Cosine-weighted direction over the hemisphere around `basis.z`.
///
/// With this density a Lambertian bounce needs no extra weighting: the
/// estimator multiplies by the albedo only.
pub fn hemisphere_sample(basis: &OrthoNormalBasis, u: f32, v: f32) -> Vec3 {
    let r = u.sqrt();
    let phi = 2.0 * PI * v;
    let local = Vec3::new(r * phi.cos(), r * phi.sin(), (1.0 - u).max(0.0).sqrt());
    basis.to_world(local).normalize()
}

/// Direction uniformly distributed (by solid angle) in the cone of
/// `half_angle` radians around `axis`.
pub fn cone_sample(axis: Vec3, half_angle: f32, u: f32, v: f32) -> Vec3 {
    let cos_max = half_angle.cos();
    let cos_theta = 1.0 - u * (1.0 - cos_max);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * PI * v;
    let basis = OrthoNormalBasis::from_z(axis);
    basis
        .to_world(Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta))
        .normalize()
}
