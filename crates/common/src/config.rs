//! Immutable sketch configuration.
//!
//! One `SketchConfig` is built (or loaded) up front and handed by reference to
//! each component that needs a slice of it. Nothing reads configuration from
//! shared global state.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::Color;

/// Default fixed simulation step: 60 Hz.
pub const DEFAULT_FIXED_UPDATE_INTERVAL: f64 = 1.0 / 60.0;

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0:?} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
    #[error("invalid color {0:?}: expected #rrggbb")]
    InvalidColor(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// GPU power/performance hint passed through to the render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerPreference {
    #[default]
    Default,
    LowPower,
    HighPerformance,
}

/// Drawable surface options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub antialias: bool,
    /// Transparent surface (composited over whatever is behind the window).
    pub alpha: bool,
    pub clear_color: Color,
    /// Upper bound on the device pixel ratio applied to the surface.
    pub max_pixel_ratio: f64,
    pub power_preference: PowerPreference,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            antialias: true,
            alpha: false,
            clear_color: Color(0xeeeeee),
            max_pixel_ratio: 1.0,
            power_preference: PowerPreference::HighPerformance,
        }
    }
}

/// Perspective camera frustum and starting position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 45.0,
            near: 1.0,
            far: 1000.0,
            position: Vec3::new(0.0, 0.0, 100.0),
        }
    }
}

/// Top-level configuration for a sketch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    pub surface: SurfaceConfig,
    pub camera: CameraConfig,
    /// Seconds per fixed update.
    pub fixed_update_interval: f64,
    /// Cap on fixed updates dispatched in a single frame. `None` lets the loop
    /// catch up without limit after a stall.
    pub max_fixed_steps_per_frame: Option<u32>,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            surface: SurfaceConfig::default(),
            camera: CameraConfig::default(),
            fixed_update_interval: DEFAULT_FIXED_UPDATE_INTERVAL,
            max_fixed_steps_per_frame: None,
        }
    }
}

impl SketchConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, choosing the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let text = std::fs::read_to_string(path)?;
        match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text),
            "json" => Self::from_json_str(&text),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let interval = self.fixed_update_interval;
        if !interval.is_finite() || interval <= 0.0 {
            return Err(invalid(
                "fixed_update_interval",
                format!("must be a positive number of seconds, got {interval}"),
            ));
        }
        if self.max_fixed_steps_per_frame == Some(0) {
            return Err(invalid(
                "max_fixed_steps_per_frame",
                "must be at least 1 when set".into(),
            ));
        }

        let ratio = self.surface.max_pixel_ratio;
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(invalid(
                "surface.max_pixel_ratio",
                format!("must be positive, got {ratio}"),
            ));
        }

        let cam = &self.camera;
        if !(cam.fov > 0.0 && cam.fov < 180.0) {
            return Err(invalid(
                "camera.fov",
                format!("must be within (0, 180) degrees, got {}", cam.fov),
            ));
        }
        if !cam.near.is_finite() || cam.near <= 0.0 {
            return Err(invalid(
                "camera.near",
                format!("must be positive and finite, got {}", cam.near),
            ));
        }
        if !cam.far.is_finite() || cam.far <= cam.near {
            return Err(invalid(
                "camera.far",
                format!(
                    "must be finite and greater than near ({}), got {}",
                    cam.near, cam.far
                ),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidValue { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_settings() {
        let config = SketchConfig::default();
        assert!(config.surface.antialias);
        assert!(!config.surface.alpha);
        assert_eq!(config.surface.clear_color, Color(0xeeeeee));
        assert_eq!(config.surface.max_pixel_ratio, 1.0);
        assert_eq!(
            config.surface.power_preference,
            PowerPreference::HighPerformance
        );
        assert_eq!(config.camera.fov, 45.0);
        assert_eq!(config.camera.near, 1.0);
        assert_eq!(config.camera.far, 1000.0);
        assert_eq!(config.camera.position, Vec3::new(0.0, 0.0, 100.0));
        assert_eq!(config.fixed_update_interval, 1.0 / 60.0);
        assert_eq!(config.max_fixed_steps_per_frame, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_overrides_only_named_fields() {
        let yaml = r##"
surface:
  clear_color: "#102030"
  power_preference: low-power
fixed_update_interval: 0.02
"##;
        let config = SketchConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.surface.clear_color, Color(0x102030));
        assert_eq!(config.surface.power_preference, PowerPreference::LowPower);
        assert!(config.surface.antialias);
        assert_eq!(config.fixed_update_interval, 0.02);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn yaml_roundtrip_preserves_config() {
        let mut config = SketchConfig::default();
        config.max_fixed_steps_per_frame = Some(5);
        config.camera.position = Vec3::new(1.0, 2.0, 3.0);
        let yaml = config.to_yaml().unwrap();
        let back = SketchConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn json_config_parses() {
        let json = r#"{ "camera": { "fov": 60.0, "position": [0.0, 5.0, 10.0] } }"#;
        let config = SketchConfig::from_json_str(json).unwrap();
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.camera.position, Vec3::new(0.0, 5.0, 10.0));
    }

    #[test]
    fn invalid_color_is_rejected() {
        let yaml = "surface:\n  clear_color: \"#12\"\n";
        let err = SketchConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = SketchConfig::default();
        config.fixed_update_interval = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "fixed_update_interval",
                ..
            })
        ));

        let mut config = SketchConfig::default();
        config.fixed_update_interval = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = SketchConfig::default();
        config.max_fixed_steps_per_frame = Some(0);
        assert!(config.validate().is_err());

        let mut config = SketchConfig::default();
        config.surface.max_pixel_ratio = 0.0;
        assert!(config.validate().is_err());

        let mut config = SketchConfig::default();
        config.camera.far = 0.5;
        assert!(config.validate().is_err());

        let mut config = SketchConfig::default();
        config.camera.fov = 180.0;
        assert!(config.validate().is_err());

        let mut config = SketchConfig::default();
        config.camera.near = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "camera.near",
                ..
            })
        ));

        let mut config = SketchConfig::default();
        config.camera.far = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "camera.far",
                ..
            })
        ));

        let mut config = SketchConfig::default();
        config.camera.far = f32::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("sketch.yaml");
        std::fs::write(&yaml_path, "fixed_update_interval: 0.05\n").unwrap();
        let config = SketchConfig::load(&yaml_path).unwrap();
        assert_eq!(config.fixed_update_interval, 0.05);

        let json_path = dir.path().join("sketch.json");
        std::fs::write(&json_path, r#"{"max_fixed_steps_per_frame": 8}"#).unwrap();
        let config = SketchConfig::load(&json_path).unwrap();
        assert_eq!(config.max_fixed_steps_per_frame, Some(8));

        let toml_path = dir.path().join("sketch.toml");
        std::fs::write(&toml_path, "").unwrap();
        assert!(matches!(
            SketchConfig::load(&toml_path),
            Err(ConfigError::UnsupportedFormat(_))
        ));

        assert!(matches!(
            SketchConfig::load(dir.path().join("missing.yaml")),
            Err(ConfigError::Io(_))
        ));
    }
}
