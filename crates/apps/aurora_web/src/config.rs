//! Host-supplied view configuration.
//!
//! The page passes a JSON object to `configure`; any field it omits keeps its
//! default, so `{}` is a complete configuration.

use layers::borders::DEFAULT_BORDERS_URL;
use scene::camera::{MAX_DISTANCE, MIN_DISTANCE, OrbitSettings};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DAY_TEXTURE_URL: &str =
    "https://unpkg.com/three-globe/example/img/earth-blue-marble.jpg";
pub const DEFAULT_WATER_TEXTURE_URL: &str =
    "https://unpkg.com/three-globe/example/img/earth-water.png";
pub const DEFAULT_NIGHT_TEXTURE_URL: &str =
    "https://unpkg.com/three-globe/example/img/earth-night.jpg";

pub const DEFAULT_CANVAS_ID: &str = "aurora-globe-canvas";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureUrls {
    pub day: String,
    /// White = ocean.
    pub water: String,
    pub night: String,
}

impl Default for TextureUrls {
    fn default() -> Self {
        Self {
            day: DEFAULT_DAY_TEXTURE_URL.to_string(),
            water: DEFAULT_WATER_TEXTURE_URL.to_string(),
            night: DEFAULT_NIGHT_TEXTURE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub canvas_id: String,
    pub borders_url: String,
    pub textures: TextureUrls,
    pub camera: OrbitSettings,
    /// `EnvFilter` directive string, e.g. `"info"` or `"layers=debug,info"`.
    pub log_filter: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            canvas_id: DEFAULT_CANVAS_ID.to_string(),
            borders_url: DEFAULT_BORDERS_URL.to_string(),
            textures: TextureUrls::default(),
            camera: OrbitSettings::default(),
            log_filter: "info".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "invalid configuration JSON: {e}"),
            ConfigError::Invalid(reason) => write!(f, "invalid configuration: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl ViewConfig {
    /// Parses and validates a configuration. Blank input yields the defaults.
    pub fn from_json(payload: &str) -> Result<Self, ConfigError> {
        if payload.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(payload)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        if !(camera.min_distance >= MIN_DISTANCE
            && camera.min_distance <= camera.max_distance
            && camera.max_distance <= MAX_DISTANCE)
        {
            return Err(ConfigError::Invalid(format!(
                "camera distance bounds [{}, {}] must lie within [{MIN_DISTANCE}, {MAX_DISTANCE}]",
                camera.min_distance, camera.max_distance
            )));
        }
        if !(camera.fov_deg > 0.0 && camera.fov_deg < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera fov {} is outside (0, 180)",
                camera.fov_deg
            )));
        }
        if self.borders_url.trim().is_empty() {
            return Err(ConfigError::Invalid("borders_url is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, DEFAULT_DAY_TEXTURE_URL, ViewConfig};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_inputs_give_defaults() {
        assert_eq!(ViewConfig::from_json("").unwrap(), ViewConfig::default());
        assert_eq!(ViewConfig::from_json("{}").unwrap(), ViewConfig::default());
    }

    #[test]
    fn partial_objects_keep_other_defaults() {
        let config = ViewConfig::from_json(
            r#"{"log_filter": "debug", "camera": {"max_distance": 10}, "textures": {"night": "n.jpg"}}"#,
        )
        .unwrap();
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.camera.max_distance, 10.0);
        assert_eq!(config.camera.min_distance, 3.5);
        assert_eq!(config.textures.night, "n.jpg");
        assert_eq!(config.textures.day, DEFAULT_DAY_TEXTURE_URL);
    }

    #[test]
    fn malformed_and_inconsistent_configs_are_rejected() {
        assert!(matches!(
            ViewConfig::from_json("{not json"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            ViewConfig::from_json(r#"{"camera": {"min_distance": 15}}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn distance_bounds_outside_the_camera_limits_are_rejected() {
        for payload in [
            r#"{"camera": {"min_distance": 1, "max_distance": 40}}"#,
            r#"{"camera": {"max_distance": 20}}"#,
            r#"{"camera": {"min_distance": 2}}"#,
        ] {
            assert!(
                matches!(ViewConfig::from_json(payload), Err(ConfigError::Invalid(_))),
                "{payload} was accepted"
            );
        }
        assert!(ViewConfig::from_json(r#"{"camera": {"min_distance": 4, "max_distance": 12}}"#).is_ok());
    }
}
