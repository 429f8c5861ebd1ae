//! Intersection records and the scene-facing traits.

use crate::{Color, Material, Ray};
use tessera_math::{Interval, Vec3};

/// Record of a ray-surface intersection.
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub position: Vec3,
    /// Unit surface normal (always points against the ray)
    pub normal: Vec3,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// Material at the intersection point
    pub material: &'a Material,
}

impl<'a> Intersection<'a> {
    /// Build a record, flipping `outward_normal` to face the incoming ray.
    pub fn new(ray: &Ray, t: f32, outward_normal: Vec3, material: &'a Material) -> Self {
        let front_face = ray.direction().dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            t,
            position: ray.at(t),
            normal,
            front_face,
            material,
        }
    }
}

/// A single intersectable shape.
pub trait Primitive: Send + Sync {
    /// Nearest hit with `t` strictly inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Intersection<'_>>;
}

/// What the radiance estimator needs from a scene.
pub trait Scene: Send + Sync {
    /// Closest intersection along the ray.
    fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>>;

    /// Radiance arriving along a ray that escapes the scene.
    fn environment(&self, ray: &Ray) -> Color;
}
