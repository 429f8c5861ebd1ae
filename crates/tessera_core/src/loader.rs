//! Scene loading.
//!
//! Scenes come either from the built-in presets or from JSON files that
//! deserialize into [`SceneDescription`].

use std::path::Path;

use thiserror::Error;

use crate::presets::{builtin_scene, BUILTIN_SCENES};
use crate::scene::SceneDescription;

/// Errors that can occur during scene loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown scene '{0}' (presets: {presets})", presets = BUILTIN_SCENES.join(", "))]
    UnknownScene(String),

    #[error("Invalid scene: {0}")]
    Invalid(String),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Parse and validate a scene from a JSON string.
pub fn load_scene_from_str(json: &str) -> LoadResult<SceneDescription> {
    let scene: SceneDescription = serde_json::from_str(json)?;
    scene.validate()?;
    Ok(scene)
}

/// Load and validate a scene from a JSON file.
///
/// An unnamed scene takes the file stem as its name.
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<SceneDescription> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let mut scene = load_scene_from_str(&json)?;

    if scene.name.is_empty() {
        scene.name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed")
            .to_string();
    }

    log::info!(
        "Loaded scene '{}' from {:?}: {} objects, {} lights",
        scene.name,
        path,
        scene.objects.len(),
        scene.light_count()
    );
    Ok(scene)
}

/// Resolve a `--scene` argument: a preset name first, then a file path.
pub fn resolve_scene(name_or_path: &str) -> LoadResult<SceneDescription> {
    if let Some(scene) = builtin_scene(name_or_path) {
        log::info!("Using built-in scene '{}'", name_or_path);
        return Ok(scene);
    }

    let path = Path::new(name_or_path);
    if path.is_file() {
        load_scene(path)
    } else {
        Err(LoadError::UnknownScene(name_or_path.to_string()))
    }
}
