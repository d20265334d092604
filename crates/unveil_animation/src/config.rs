//! Motion defaults
//!
//! Project-wide defaults for every motion component, loadable from TOML:
//!
//! ```toml
//! duration_ms = 600
//! easing = "cubic-bezier(0.22, 1, 0.36, 1)"
//! threshold = 0.2
//! root_margin = "0px 0px -10% 0px"
//!
//! [float]
//! amplitude_px = 12
//! randomize = false
//!
//! [parallax]
//! speed = 0.3
//! ```
//!
//! Missing keys fall back to [`MotionDefaults::default`]. Unknown keys are rejected.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use unveil_core::{Easing, Length, RootMargin};

/// Errors from loading or validating motion defaults
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML (including invalid lengths or easing names)
    #[error("Failed to parse motion defaults: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("Failed to serialize motion defaults: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Parsed, but out of range
    #[error("Invalid motion defaults: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Defaults for [`Float`](crate::Float)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FloatDefaults {
    pub amplitude_px: f32,
    pub duration_ms: u32,
    pub randomize: bool,
    pub seed: u64,
}

impl Default for FloatDefaults {
    fn default() -> Self {
        Self {
            amplitude_px: 10.0,
            duration_ms: 3000,
            randomize: true,
            seed: 0x5EED,
        }
    }
}

/// Defaults for [`Parallax`](crate::Parallax)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParallaxDefaults {
    pub speed: f32,
    /// Recompute at most once per animation frame instead of on every scroll event
    pub coalesce: bool,
}

impl Default for ParallaxDefaults {
    fn default() -> Self {
        Self {
            speed: 0.5,
            coalesce: true,
        }
    }
}

/// Defaults shared by all motion components
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionDefaults {
    pub duration_ms: u32,
    pub delay_ms: u32,
    pub easing: Easing,
    pub threshold: f32,
    pub root_margin: RootMargin,
    pub trigger_once: bool,
    pub fade_distance: Length,
    pub slide_distance: Length,
    /// Render final states immediately when the host prefers reduced motion
    pub respect_reduced_motion: bool,
    pub float: FloatDefaults,
    pub parallax: ParallaxDefaults,
}

impl Default for MotionDefaults {
    fn default() -> Self {
        Self {
            duration_ms: 700,
            delay_ms: 0,
            easing: Easing::EaseOut,
            threshold: 0.1,
            root_margin: RootMargin::default(),
            trigger_once: true,
            fade_distance: Length::Px(20.0),
            slide_distance: Length::Percent(100.0),
            respect_reduced_motion: true,
            float: FloatDefaults::default(),
            parallax: ParallaxDefaults::default(),
        }
    }
}

impl MotionDefaults {
    /// Parse and validate from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let defaults: MotionDefaults = toml::from_str(content)?;
        defaults.validate()?;
        Ok(defaults)
    }

    /// Load and validate from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let defaults = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded motion defaults from {}", path.display());
        Ok(defaults)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check value ranges that the type system does not
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::Invalid(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        if !self.float.amplitude_px.is_finite() || self.float.amplitude_px < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "float.amplitude_px must be a non-negative number, got {}",
                self.float.amplitude_px
            )));
        }
        if self.float.duration_ms == 0 {
            return Err(ConfigError::Invalid(
                "float.duration_ms must be greater than zero".to_string(),
            ));
        }
        if !self.parallax.speed.is_finite() || self.parallax.speed < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "parallax.speed must be a non-negative number, got {}",
                self.parallax.speed
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let defaults = MotionDefaults::from_toml_str("").unwrap();
        assert_eq!(defaults, MotionDefaults::default());
    }

    #[test]
    fn test_partial_config() {
        let defaults = MotionDefaults::from_toml_str(
            r#"
            duration_ms = 500
            easing = "cubic-bezier(0.22, 1, 0.36, 1)"
            root_margin = "0px 0px -10% 0px"
            slide_distance = "40px"

            [parallax]
            speed = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(defaults.duration_ms, 500);
        assert_eq!(defaults.easing, Easing::CubicBezier(0.22, 1.0, 0.36, 1.0));
        assert_eq!(defaults.root_margin.bottom, Length::Percent(-10.0));
        assert_eq!(defaults.slide_distance, Length::Px(40.0));
        assert_eq!(defaults.parallax.speed, 0.25);
        assert!(defaults.parallax.coalesce);
        assert_eq!(defaults.float, FloatDefaults::default());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            MotionDefaults::from_toml_str("threshold = 1.5"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MotionDefaults::from_toml_str("easing = \"wobble\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            MotionDefaults::from_toml_str("fade_distance = \"20pt\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            MotionDefaults::from_toml_str("unknown_key = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let defaults = MotionDefaults::default();
        let text = defaults.to_toml().unwrap();
        assert_eq!(MotionDefaults::from_toml_str(&text).unwrap(), defaults);
    }

    #[test]
    fn test_load_missing_file() {
        let err = MotionDefaults::load(Path::new("/nonexistent/unveil.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
