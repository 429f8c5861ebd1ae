//! The renderable world: a flat list of primitives plus an environment.

use tessera_core::{EnvironmentDescription, ObjectDescription, SceneDescription};
use tessera_math::Interval;

use crate::{Color, Intersection, Material, Primitive, Ray, Scene, Sphere, Triangle};

/// Hits closer than this are treated as self-intersections.
const HIT_EPSILON: f32 = 1e-3;

/// Radiance for rays that leave the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Solid(Color),
    /// Blend from `horizon` (straight down) to `zenith` (straight up).
    Sky { horizon: Color, zenith: Color },
}

impl Environment {
    pub fn radiance(&self, ray: &Ray) -> Color {
        match self {
            Environment::Solid(color) => *color,
            Environment::Sky { horizon, zenith } => {
                let a = 0.5 * (ray.direction().y + 1.0);
                *horizon * (1.0 - a) + *zenith * a
            }
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Solid(Color::ZERO)
    }
}

impl From<&EnvironmentDescription> for Environment {
    fn from(desc: &EnvironmentDescription) -> Self {
        match desc {
            EnvironmentDescription::Solid { color } => Environment::Solid(*color),
            EnvironmentDescription::Sky { horizon, zenith } => Environment::Sky {
                horizon: *horizon,
                zenith: *zenith,
            },
        }
    }
}

/// A list of primitives with linear closest-hit search.
pub struct World {
    objects: Vec<Box<dyn Primitive>>,
    environment: Environment,
}

impl World {
    /// Create an empty world.
    pub fn new(environment: Environment) -> Self {
        Self {
            objects: Vec::new(),
            environment,
        }
    }

    /// Build the primitives for a scene description.
    pub fn from_description(desc: &SceneDescription) -> Self {
        let mut world = World::new(Environment::from(&desc.environment));

        for object in &desc.objects {
            match object {
                ObjectDescription::Sphere {
                    center,
                    radius,
                    material,
                } => world.add(Box::new(Sphere::new(*center, *radius, Material::from(material)))),
                ObjectDescription::Triangle {
                    vertices: [a, b, c],
                    material,
                } => world.add(Box::new(Triangle::new(*a, *b, *c, Material::from(material)))),
            }
        }

        log::debug!("Built world '{}' with {} primitives", desc.name, world.len());
        world
    }

    /// Add an object to the world.
    pub fn add(&mut self, object: Box<dyn Primitive>) {
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}

impl Scene for World {
    fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        let mut ray_t = Interval::new(HIT_EPSILON, f32::INFINITY);
        let mut closest = None;

        for object in &self.objects {
            if let Some(hit) = object.hit(ray, ray_t) {
                ray_t = ray_t.with_max(hit.t);
                closest = Some(hit);
            }
        }

        closest
    }

    fn environment(&self, ray: &Ray) -> Color {
        self.environment.radiance(ray)
    }
}
