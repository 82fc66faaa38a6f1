//! Scene configuration loaded from JSON.
//!
//! The expected document looks like:
//!
//! ```json
//! {
//!   "time": 12.5,
//!   "camera": {
//!     "position": [0.0, 6.0, 18.0],
//!     "look_at": [0.0, 0.0, 0.0],
//!     "up": [0.0, 1.0, 0.0]
//!   },
//!   "render": { "width": 400, "samples_per_pixel": 8 }
//! }
//! ```
//!
//! `camera.fov` and the whole `render` block are optional.

use std::path::Path;

use helios_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a scene configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid camera: {0}")]
    InvalidCamera(String),

    #[error("Invalid render settings: {0}")]
    InvalidRender(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub look_at: [f32; 3],
    pub up: [f32; 3],
    /// Vertical field of view in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fov: Option<f32>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 6.0, 18.0],
            look_at: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            fov: None,
        }
    }
}

impl CameraConfig {
    pub fn eye(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn target(&self) -> Vec3 {
        Vec3::from_array(self.look_at)
    }

    pub fn up(&self) -> Vec3 {
        Vec3::from_array(self.up)
    }

    fn validate(&self) -> ConfigResult<()> {
        let forward = self.target() - self.eye();
        if forward.length_squared() < 1e-12 {
            return Err(ConfigError::InvalidCamera(
                "position and look_at coincide".to_string(),
            ));
        }
        if forward.cross(self.up()).length_squared() < 1e-12 {
            return Err(ConfigError::InvalidCamera(
                "up is parallel to the view direction".to_string(),
            ));
        }
        if let Some(fov) = self.fov {
            if !(fov > 0.0 && fov < 180.0) {
                return Err(ConfigError::InvalidCamera(format!(
                    "fov must be in (0, 180) degrees, got {fov}"
                )));
            }
        }
        Ok(())
    }
}

/// Image and sampling settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    /// Ambient light factor
    pub ambient: f32,
    pub max_depth: u32,
    /// Area-light samples for soft shadows; `None` selects hard shadows
    pub shadow_samples: Option<u32>,
    pub seed: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            samples_per_pixel: 4,
            ambient: 0.1,
            max_depth: 5,
            shadow_samples: None,
            seed: 0,
        }
    }
}

impl RenderSettings {
    fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidRender(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::InvalidRender(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }
        if self.shadow_samples == Some(0) {
            return Err(ConfigError::InvalidRender(
                "shadow_samples must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Simulation time, camera placement and render settings for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub time: f32,
    pub camera: CameraConfig,
    #[serde(default)]
    pub render: RenderSettings,
}

impl SceneConfig {
    /// Read and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::from_json_str(&text)?;
        log::info!(
            "Loaded scene config {} (t = {}, {}x{} @ {} spp)",
            path.display(),
            config.time,
            config.render.width,
            config.render.height,
            config.render.samples_per_pixel
        );
        Ok(config)
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: SceneConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check camera and render settings, e.g. after command-line overrides.
    pub fn validate(&self) -> ConfigResult<()> {
        self.camera.validate()?;
        self.render.validate()
    }

    /// Serialize back to pretty JSON.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC: &str = r#"{
        "time": 3.5,
        "camera": {
            "position": [0.0, 6.0, 18.0],
            "look_at": [0.0, 0.0, 0.0],
            "up": [0.0, 1.0, 0.0]
        }
    }"#;

    #[test]
    fn test_parse_minimal_config() {
        let config = SceneConfig::from_json_str(BASIC).unwrap();

        assert_eq!(config.time, 3.5);
        assert_eq!(config.camera.eye(), Vec3::new(0.0, 6.0, 18.0));
        assert_eq!(config.camera.target(), Vec3::ZERO);
        assert_eq!(config.camera.up(), Vec3::Y);
        assert_eq!(config.camera.fov, None);
        assert_eq!(config.render, RenderSettings::default());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.camera.eye(), Vec3::new(0.0, 6.0, 18.0));
    }

    #[test]
    fn test_partial_render_block_keeps_defaults() {
        let text = r#"{
            "time": 0.0,
            "camera": {"position": [0, 0, 5], "look_at": [0, 0, 0], "up": [0, 1, 0], "fov": 45},
            "render": {"width": 64, "shadow_samples": 16}
        }"#;
        let config = SceneConfig::from_json_str(text).unwrap();

        assert_eq!(config.camera.fov, Some(45.0));
        assert_eq!(config.render.width, 64);
        assert_eq!(config.render.height, 800);
        assert_eq!(config.render.shadow_samples, Some(16));
        assert_eq!(config.render.samples_per_pixel, 4);
    }

    #[test]
    fn test_missing_camera_is_an_error() {
        let err = SceneConfig::from_json_str(r#"{"time": 1.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_degenerate_camera_is_rejected() {
        let text = r#"{"time": 0, "camera": {"position": [1, 1, 1], "look_at": [1, 1, 1], "up": [0, 1, 0]}}"#;
        assert!(matches!(
            SceneConfig::from_json_str(text),
            Err(ConfigError::InvalidCamera(_))
        ));

        let text = r#"{"time": 0, "camera": {"position": [0, 5, 0], "look_at": [0, 0, 0], "up": [0, 1, 0]}}"#;
        assert!(matches!(
            SceneConfig::from_json_str(text),
            Err(ConfigError::InvalidCamera(_))
        ));
    }

    #[test]
    fn test_zero_samples_rejected() {
        let text = r#"{"time": 0, "camera": {"position": [0, 0, 5], "look_at": [0, 0, 0], "up": [0, 1, 0]},
                      "render": {"samples_per_pixel": 0}}"#;
        assert!(matches!(
            SceneConfig::from_json_str(text),
            Err(ConfigError::InvalidRender(_))
        ));
    }

    #[test]
    fn test_json_round_trip_preserves_config() {
        let config = SceneConfig::from_json_str(BASIC).unwrap();
        let text = config.to_json_string().unwrap();
        assert_eq!(SceneConfig::from_json_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SceneConfig::load("/nonexistent/scene_config.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
