//! Built-in scenes, selectable by name from the command line.

use tessera_math::Vec3;

use crate::scene::{
    CameraDescription, EnvironmentDescription, MaterialDescription, ObjectDescription,
    SceneDescription,
};

/// Names accepted by [`builtin_scene`].
pub const BUILTIN_SCENES: &[&str] = &["cornell", "spheres", "emissive"];

/// Look up a built-in scene by name.
pub fn builtin_scene(name: &str) -> Option<SceneDescription> {
    match name {
        "cornell" => Some(cornell_box()),
        "spheres" => Some(spheres()),
        "emissive" => Some(emissive()),
        _ => None,
    }
}

/// Two triangles spanning the quad `a b c d` (counter-clockwise).
fn quad(a: Vec3, b: Vec3, c: Vec3, d: Vec3, material: &MaterialDescription) -> [ObjectDescription; 2] {
    [
        ObjectDescription::Triangle {
            vertices: [a, b, c],
            material: material.clone(),
        },
        ObjectDescription::Triangle {
            vertices: [a, c, d],
            material: material.clone(),
        },
    ]
}

/// A closed box in [-1,1]^3 lit by a ceiling panel, holding a glossy
/// and a matte sphere.
fn cornell_box() -> SceneDescription {
    let white = MaterialDescription::diffuse(Vec3::splat(0.75));
    let red = MaterialDescription::diffuse(Vec3::new(0.75, 0.25, 0.25));
    let green = MaterialDescription::diffuse(Vec3::new(0.25, 0.75, 0.25));
    let light = MaterialDescription::light(Vec3::splat(12.0));

    let (lo, hi) = (-1.0, 1.0);
    let p = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);

    let mut scene = SceneDescription::new("cornell").with_camera(CameraDescription {
        look_from: p(0.0, 0.0, 3.4),
        look_at: p(0.0, 0.0, 0.0),
        up: Vec3::Y,
        vfov: 40.0,
        aperture: 0.0,
        focus_distance: None,
    });

    let walls = [
        // Floor, ceiling, back
        quad(p(lo, lo, hi), p(hi, lo, hi), p(hi, lo, lo), p(lo, lo, lo), &white),
        quad(p(lo, hi, lo), p(hi, hi, lo), p(hi, hi, hi), p(lo, hi, hi), &white),
        quad(p(lo, lo, lo), p(hi, lo, lo), p(hi, hi, lo), p(lo, hi, lo), &white),
        // Left (red), right (green)
        quad(p(lo, lo, hi), p(lo, lo, lo), p(lo, hi, lo), p(lo, hi, hi), &red),
        quad(p(hi, lo, lo), p(hi, lo, hi), p(hi, hi, hi), p(hi, hi, lo), &green),
        // Ceiling light, just below the ceiling
        quad(
            p(-0.3, 0.99, -0.3),
            p(0.3, 0.99, -0.3),
            p(0.3, 0.99, 0.3),
            p(-0.3, 0.99, 0.3),
            &light,
        ),
    ];
    scene.objects.extend(walls.into_iter().flatten());

    scene
        .with_object(ObjectDescription::Sphere {
            center: p(-0.45, -0.65, -0.3),
            radius: 0.35,
            material: MaterialDescription::glossy(Vec3::splat(0.95), 0.9, 0.05),
        })
        .with_object(ObjectDescription::Sphere {
            center: p(0.45, -0.65, 0.25),
            radius: 0.35,
            material: white,
        })
}

/// Three spheres on a large ground sphere under a sky gradient.
fn spheres() -> SceneDescription {
    SceneDescription::new("spheres")
        .with_camera(CameraDescription {
            look_from: Vec3::new(0.0, 1.0, 6.0),
            look_at: Vec3::new(0.0, 0.6, 0.0),
            up: Vec3::Y,
            vfov: 35.0,
            aperture: 0.05,
            focus_distance: None,
        })
        .with_environment(EnvironmentDescription::Sky {
            horizon: Vec3::ONE,
            zenith: Vec3::new(0.5, 0.7, 1.0),
        })
        .with_object(ObjectDescription::Sphere {
            center: Vec3::new(0.0, -1000.0, 0.0),
            radius: 1000.0,
            material: MaterialDescription::diffuse(Vec3::splat(0.5)),
        })
        .with_object(ObjectDescription::Sphere {
            center: Vec3::new(-1.6, 0.7, 0.0),
            radius: 0.7,
            material: MaterialDescription::diffuse(Vec3::new(0.4, 0.2, 0.1)),
        })
        .with_object(ObjectDescription::Sphere {
            center: Vec3::new(0.0, 0.7, 0.0),
            radius: 0.7,
            material: MaterialDescription::glossy(Vec3::new(0.9, 0.9, 0.9), 0.6, 0.3),
        })
        .with_object(ObjectDescription::Sphere {
            center: Vec3::new(1.6, 0.7, 0.0),
            radius: 0.7,
            material: MaterialDescription::glossy(Vec3::new(0.7, 0.6, 0.5), 1.0, 0.0),
        })
}

/// The camera sits inside a single emissive sphere, so every primary ray
/// sees the same light. Useful as a convergence check.
fn emissive() -> SceneDescription {
    SceneDescription::new("emissive")
        .with_camera(CameraDescription::default())
        .with_object(ObjectDescription::Sphere {
            center: Vec3::ZERO,
            radius: 10.0,
            material: MaterialDescription::light(Vec3::new(1.0, 0.5, 0.25)),
        })
}
