//! Tessera Core - scene descriptions for the Tessera path tracer.
//!
//! This crate provides:
//!
//! - **Description types**: `SceneDescription`, `CameraDescription`,
//!   `ObjectDescription`, `MaterialDescription`, `EnvironmentDescription`
//! - **Presets**: a few built-in scenes selectable by name
//! - **Loading**: JSON scene files via serde
//!
//! # Example
//!
//! ```ignore
//! use tessera_core::resolve_scene;
//!
//! // A preset name or a path to a JSON file
//! let scene = resolve_scene("cornell")?;
//! println!("{} has {} objects", scene.name, scene.objects.len());
//! ```

pub mod loader;
pub mod presets;
pub mod scene;

// Re-export commonly used types
pub use loader::{load_scene, load_scene_from_str, resolve_scene, LoadError, LoadResult};
pub use presets::{builtin_scene, BUILTIN_SCENES};
pub use scene::{
    CameraDescription, EnvironmentDescription, MaterialDescription, ObjectDescription,
    SceneDescription,
};
