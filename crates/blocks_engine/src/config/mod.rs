//! Configuration system
//!
//! Anything a host may want to keep on disk (controller tuning, scene
//! definitions) implements [`Config`] and can be read from or written to
//! `.toml` and `.ron` files.

pub use serde::{Serialize, Deserialize};
use std::path::Path;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;

        match format {
            ConfigFormat::Toml => Self::from_toml_str(&contents),
            ConfigFormat::Ron => Self::from_ron_str(&contents),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => self.to_toml_string()?,
            ConfigFormat::Ron => self.to_ron_string()?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    /// Parse configuration from a TOML document
    fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse configuration from a RON document
    fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Render configuration as a TOML document
    fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Render configuration as a RON document
    fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// On-disk formats understood by [`Config`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Ron,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that parse but make no sense
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// # Controller Configuration
///
/// Tuning for the grasper protocol. The defaults match the classic scene's
/// scale (a 1×1 table with objects a few tenths of a unit tall).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Distance under which two positions are considered coincident, both
    /// horizontally (grasper over an object's centre) and vertically
    /// (grasper tip against an object's top)
    pub grasp_tolerance: f32,

    /// Gap left between the highest resting object and whatever a raised
    /// grasper carries
    pub raise_clearance: f32,
}

impl ControllerConfig {
    /// Set the grasp tolerance
    pub fn with_grasp_tolerance(mut self, tolerance: f32) -> Self {
        self.grasp_tolerance = tolerance;
        self
    }

    /// Set the raise clearance
    pub fn with_raise_clearance(mut self, clearance: f32) -> Self {
        self.raise_clearance = clearance;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grasp_tolerance.is_nan() || self.grasp_tolerance <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "grasp_tolerance must be positive, got {}",
                self.grasp_tolerance
            )));
        }

        if self.raise_clearance.is_nan() || self.raise_clearance <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "raise_clearance must be positive, got {}",
                self.raise_clearance
            )));
        }

        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            grasp_tolerance: 1e-4,
            raise_clearance: 0.1,
        }
    }
}

impl Config for ControllerConfig {}
