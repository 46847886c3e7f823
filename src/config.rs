use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::sizes::{WindowSize, WindowSizes, MAX_DIMENSION, PRESETS};
use crate::transform::Projection;

/// Demo settings, every field falls back to its default when missing.
///
/// ```json5
/// {
///     title: "Random Colour Square",
///     presets: [{ width: 640, height: 360 }, { width: 1280, height: 720 }],
///     walk_speed: 0.5,
///     rotation_speed: 0.1,
///     clear_color: [0.0, 0.0, 0.4],
///     vertex_shader: "shaders/quad.vert.glsl",
///     fragment_shader: "shaders/quad.frag.glsl",
///     projection: { fov_y: 45.0, aspect: 1.333, near: 0.1, far: 100.0 },
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub title: String,
    pub presets: Vec<WindowSize>,
    /// Distance covered by one movement key press.
    pub walk_speed: f32,
    /// Degrees of rotation per unit of pointer motion.
    pub rotation_speed: f32,
    pub clear_color: [f32; 3],
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub projection: Projection,
}

impl Settings {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path)?;

        Self::parse(&src)
    }

    pub fn parse(src: &str) -> Result<Self, ConfigError> {
        let settings: Settings = json5::from_str(src)?;
        settings.validate()?;

        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.presets.is_empty() {
            return Err(ConfigError::Invalid("at least one window preset is needed".into()));
        }

        if let Some(size) = self
            .presets
            .iter()
            .find(|s| !(1..=MAX_DIMENSION).contains(&s.width) || !(1..=MAX_DIMENSION).contains(&s.height))
        {
            let msg = format!(
                "window preset {}x{} must be between 1 and {MAX_DIMENSION} on each side",
                size.width, size.height
            );
            return Err(ConfigError::Invalid(msg));
        }

        if !positive(self.walk_speed) || !positive(self.rotation_speed) {
            return Err(ConfigError::Invalid("speeds must be positive and finite".into()));
        }

        if !self.clear_color.iter().all(|c| c.is_finite()) {
            return Err(ConfigError::Invalid("clear_color must be finite".into()));
        }

        let p = &self.projection;
        if ![p.fov_y, p.aspect, p.near, p.far].iter().all(|v| v.is_finite()) {
            return Err(ConfigError::Invalid("projection values must be finite".into()));
        }
        if !(p.fov_y > 0.0 && p.fov_y < 180.0) {
            return Err(ConfigError::Invalid("fov_y must be between 0 and 180 degrees".into()));
        }
        if !positive(p.aspect) {
            return Err(ConfigError::Invalid("aspect must be positive".into()));
        }
        if !(p.near > 0.0 && p.near < p.far) {
            return Err(ConfigError::Invalid("expected 0 < near < far".into()));
        }

        Ok(())
    }

    pub fn window_sizes(&self) -> Result<WindowSizes, ConfigError> {
        WindowSizes::new(self.presets.clone())
            .ok_or_else(|| ConfigError::Invalid("at least one window preset is needed".into()))
    }
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "Random Colour Square".into(),
            presets: PRESETS.to_vec(),
            walk_speed: 0.5,
            rotation_speed: 0.1,
            clear_color: [0.0, 0.0, 0.4],
            vertex_shader: PathBuf::from("shaders/quad.vert.glsl"),
            fragment_shader: PathBuf::from("shaders/quad.frag.glsl"),
            projection: Projection::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read settings: {0}")]
    Input(#[from] std::io::Error),
    #[error("invalid settings format: {0}")]
    Format(#[from] json5::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}
