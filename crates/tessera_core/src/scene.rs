//! Scene description types.
//!
//! These are plain data that (de)serialize to JSON. The renderer turns them
//! into intersectable geometry; nothing here knows about rays.

use serde::{Deserialize, Serialize};
use tessera_math::Vec3;

use crate::loader::{LoadError, LoadResult};

/// Surface description.
///
/// `reflectivity` is the probability that a bounce is glossy rather than
/// diffuse. `roughness` widens the glossy lobe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDescription {
    /// Diffuse/albedo color (RGB, 0-1)
    pub diffuse: Vec3,

    /// Emitted radiance (RGB, may exceed 1)
    pub emission: Vec3,

    /// Probability of a glossy bounce (0-1)
    pub reflectivity: f32,

    /// Glossy lobe width (0=mirror, 1=widest cone)
    pub roughness: f32,
}

impl Default for MaterialDescription {
    fn default() -> Self {
        Self {
            diffuse: Vec3::splat(0.5), // Grey default
            emission: Vec3::ZERO,
            reflectivity: 0.0,
            roughness: 0.0,
        }
    }
}

impl MaterialDescription {
    /// A purely diffuse material.
    pub fn diffuse(color: Vec3) -> Self {
        Self {
            diffuse: color,
            ..Default::default()
        }
    }

    /// A light source: black diffuse, emitting `emission`.
    pub fn light(emission: Vec3) -> Self {
        Self {
            diffuse: Vec3::ZERO,
            emission,
            ..Default::default()
        }
    }

    /// A glossy material that reflects with probability `reflectivity`.
    pub fn glossy(color: Vec3, reflectivity: f32, roughness: f32) -> Self {
        Self {
            diffuse: color,
            reflectivity,
            roughness,
            ..Default::default()
        }
    }

    /// Check if this material emits light.
    pub fn is_emissive(&self) -> bool {
        self.emission.length_squared() > 0.0
    }

    fn validate(&self) -> LoadResult<()> {
        if !(0.0..=1.0).contains(&self.reflectivity) {
            return Err(LoadError::Invalid(format!(
                "reflectivity {} outside [0, 1]",
                self.reflectivity
            )));
        }
        if !(0.0..=1.0).contains(&self.roughness) {
            return Err(LoadError::Invalid(format!(
                "roughness {} outside [0, 1]",
                self.roughness
            )));
        }
        if self.diffuse.min_element() < 0.0 || self.emission.min_element() < 0.0 {
            return Err(LoadError::Invalid("negative material color".into()));
        }
        Ok(())
    }
}

/// Camera placement and lens.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDescription {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,

    /// Vertical field of view in degrees
    pub vfov: f32,

    /// Lens diameter; 0 disables depth of field
    pub aperture: f32,

    /// Distance to the plane of perfect focus (defaults to |look_at - look_from|)
    pub focus_distance: Option<f32>,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            up: Vec3::Y,
            vfov: 60.0,
            aperture: 0.0,
            focus_distance: None,
        }
    }
}

impl CameraDescription {
    fn validate(&self) -> LoadResult<()> {
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(LoadError::Invalid(format!("vfov {} outside (0, 180)", self.vfov)));
        }
        let view = self.look_from - self.look_at;
        if view.length_squared() == 0.0 {
            return Err(LoadError::Invalid("camera looks at its own position".into()));
        }
        if self.up.normalize_or_zero().cross(view.normalize()).length() < 1e-6 {
            return Err(LoadError::Invalid(
                "camera up vector is zero or parallel to the view direction".into(),
            ));
        }
        if self.aperture < 0.0 {
            return Err(LoadError::Invalid("negative aperture".into()));
        }
        if matches!(self.focus_distance, Some(d) if d <= 0.0) {
            return Err(LoadError::Invalid("focus distance must be positive".into()));
        }
        Ok(())
    }
}

/// Radiance returned for rays that escape the scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnvironmentDescription {
    /// Constant color in every direction.
    Solid { color: Vec3 },
    /// Vertical blend from `horizon` (looking down) to `zenith` (looking up).
    Sky { horizon: Vec3, zenith: Vec3 },
}

impl Default for EnvironmentDescription {
    fn default() -> Self {
        EnvironmentDescription::Solid { color: Vec3::ZERO }
    }
}

impl EnvironmentDescription {
    fn validate(&self) -> LoadResult<()> {
        let negative = match self {
            EnvironmentDescription::Solid { color } => color.min_element() < 0.0,
            EnvironmentDescription::Sky { horizon, zenith } => {
                horizon.min_element() < 0.0 || zenith.min_element() < 0.0
            }
        };
        if negative {
            return Err(LoadError::Invalid("negative environment color".into()));
        }
        Ok(())
    }
}

/// A primitive in the scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDescription {
    Sphere {
        center: Vec3,
        radius: f32,
        #[serde(default)]
        material: MaterialDescription,
    },
    Triangle {
        vertices: [Vec3; 3],
        #[serde(default)]
        material: MaterialDescription,
    },
}

impl ObjectDescription {
    /// Get the material of this object.
    pub fn material(&self) -> &MaterialDescription {
        match self {
            ObjectDescription::Sphere { material, .. } => material,
            ObjectDescription::Triangle { material, .. } => material,
        }
    }

    fn validate(&self) -> LoadResult<()> {
        match self {
            ObjectDescription::Sphere { radius, .. } if *radius <= 0.0 => {
                return Err(LoadError::Invalid(format!("sphere radius {radius} must be positive")));
            }
            ObjectDescription::Triangle { vertices: [a, b, c], .. }
                if (*b - *a).cross(*c - *a).length_squared() == 0.0 =>
            {
                return Err(LoadError::Invalid("degenerate triangle".into()));
            }
            _ => {}
        }
        self.material().validate()
    }
}

/// A complete renderable scene.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub camera: CameraDescription,

    #[serde(default)]
    pub environment: EnvironmentDescription,

    pub objects: Vec<ObjectDescription>,
}

impl SceneDescription {
    /// Create an empty scene with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the camera.
    pub fn with_camera(mut self, camera: CameraDescription) -> Self {
        self.camera = camera;
        self
    }

    /// Set the environment.
    pub fn with_environment(mut self, environment: EnvironmentDescription) -> Self {
        self.environment = environment;
        self
    }

    /// Add an object.
    pub fn with_object(mut self, object: ObjectDescription) -> Self {
        self.objects.push(object);
        self
    }

    /// Number of emissive objects.
    pub fn light_count(&self) -> usize {
        self.objects
            .iter()
            .filter(|o| o.material().is_emissive())
            .count()
    }

    /// Reject values the renderer cannot handle.
    pub fn validate(&self) -> LoadResult<()> {
        self.camera.validate()?;
        self.environment.validate()?;
        for (index, object) in self.objects.iter().enumerate() {
            object.validate().map_err(|e| match e {
                LoadError::Invalid(msg) => LoadError::Invalid(format!("object {index}: {msg}")),
                other => other,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_defaults_fill_missing_fields() {
        let material: MaterialDescription =
            serde_json::from_str(r#"{ "emission": [4.0, 4.0, 4.0] }"#).unwrap();

        assert_eq!(material.emission, Vec3::splat(4.0));
        assert_eq!(material.diffuse, Vec3::splat(0.5));
        assert_eq!(material.reflectivity, 0.0);
        assert!(material.is_emissive());
    }

    #[test]
    fn test_object_tagging() {
        let json = r#"{ "type": "sphere", "center": [0, 1, 0], "radius": 2.0 }"#;
        let object: ObjectDescription = serde_json::from_str(json).unwrap();

        match object {
            ObjectDescription::Sphere { center, radius, .. } => {
                assert_eq!(center, Vec3::Y);
                assert_eq!(radius, 2.0);
            }
            other => panic!("expected sphere, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_reflectivity() {
        let scene = SceneDescription::new("bad").with_object(ObjectDescription::Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
            material: MaterialDescription::glossy(Vec3::ONE, 1.5, 0.0),
        });

        let err = scene.validate().unwrap_err();
        assert!(err.to_string().contains("object 0"), "{err}");
    }

    #[test]
    fn test_validate_rejects_degenerate_triangle() {
        let scene = SceneDescription::new("flat").with_object(ObjectDescription::Triangle {
            vertices: [Vec3::ZERO, Vec3::X, Vec3::X * 2.0],
            material: MaterialDescription::default(),
        });

        assert!(matches!(scene.validate(), Err(LoadError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_camera_without_direction() {
        let scene = SceneDescription::new("cam").with_camera(CameraDescription {
            look_at: Vec3::ZERO,
            ..Default::default()
        });

        assert!(scene.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_up_parallel_to_view() {
        let json = r#"{
            "camera": { "look_from": [0, 5, 0], "look_at": [0, 0, 0], "up": [0, 1, 0] },
            "environment": { "type": "sky", "horizon": [1, 1, 1], "zenith": [0.5, 0.7, 1.0] },
            "objects": []
        }"#;
        let scene: SceneDescription = serde_json::from_str(json).unwrap();

        let err = scene.validate().unwrap_err();
        assert!(err.to_string().contains("up vector"), "{err}");

        let tilted = scene.with_camera(CameraDescription {
            look_from: Vec3::new(0.0, 5.0, 0.0),
            up: Vec3::Z,
            ..Default::default()
        });
        assert!(tilted.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_environment() {
        let solid = SceneDescription::new("env").with_environment(EnvironmentDescription::Solid {
            color: Vec3::new(0.2, -0.1, 0.2),
        });
        assert!(matches!(solid.validate(), Err(LoadError::Invalid(_))));

        let sky = SceneDescription::new("env").with_environment(EnvironmentDescription::Sky {
            horizon: Vec3::ONE,
            zenith: Vec3::new(-1.0, 0.5, 1.0),
        });
        assert!(sky.validate().is_err());
    }
}
