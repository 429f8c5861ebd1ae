//! Thin-lens camera.

use crate::{gen_f32, Ray};
use rand::RngCore;
use tessera_core::CameraDescription;
use tessera_math::Vec3;

/// Maps normalized device coordinates to primary rays.
///
/// `ndc_x` runs left to right and `ndc_y` top to bottom, both in [-1, 1],
/// matching image row order.
#[derive(Debug, Clone)]
pub struct Camera {
    center: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    half_width: f32,
    half_height: f32,
    focus_dist: f32,
    lens_radius: f32,
}

impl Camera {
    /// Create a camera.
    ///
    /// - `vfov`: vertical field of view in degrees
    /// - `aspect`: image width / height
    /// - `aperture`: lens diameter, 0 for a pinhole
    pub fn new(
        look_from: Vec3,
        look_at: Vec3,
        vup: Vec3,
        vfov: f32,
        aspect: f32,
        aperture: f32,
        focus_dist: f32,
    ) -> Self {
        let half_height = (vfov.to_radians() / 2.0).tan();
        let w = (look_from - look_at).normalize();
        let u = vup.cross(w).normalize();
        let v = w.cross(u);

        Self {
            center: look_from,
            u,
            v,
            w,
            half_width: half_height * aspect,
            half_height,
            focus_dist,
            lens_radius: aperture / 2.0,
        }
    }

    /// Build from a scene description for an image of the given aspect ratio.
    pub fn from_description(desc: &CameraDescription, aspect: f32) -> Self {
        let focus_dist = desc
            .focus_distance
            .unwrap_or_else(|| (desc.look_at - desc.look_from).length());
        Self::new(
            desc.look_from,
            desc.look_at,
            desc.up,
            desc.vfov,
            aspect,
            desc.aperture,
            focus_dist,
        )
    }

    /// Primary ray through the given normalized device coordinates.
    ///
    /// With a non-zero aperture the origin is jittered over the lens.
    pub fn ray(&self, ndc_x: f32, ndc_y: f32, rng: &mut dyn RngCore) -> Ray {
        let target = self.center
            + self.focus_dist
                * (ndc_x * self.half_width * self.u - ndc_y * self.half_height * self.v - self.w);

        let origin = if self.lens_radius <= 0.0 {
            self.center
        } else {
            let p = random_in_unit_disk(rng) * self.lens_radius;
            self.center + p.x * self.u + p.y * self.v
        };

        Ray::new(origin, target - origin)
    }

    /// Camera position.
    pub fn center(&self) -> Vec3 {
        self.center
    }
}

/// Sample a random point in the unit disk.
fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_f32(rng) * 2.0 - 1.0, gen_f32(rng) * 2.0 - 1.0, 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
