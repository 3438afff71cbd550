use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    effects::DEFAULT_EDGE_THRESHOLD,
    error::{ConfigError, Result},
    styles::{BuiltinStyle, StylePreset, StyleRegistry},
};

/// Main configuration for garden-stylizer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cartoon pipeline settings
    pub stylize: StylizeConfig,

    /// Dominant color sampling settings
    pub palette: PaletteConfig,

    /// Batch processing settings
    pub batch: BatchConfig,

    /// Pod image store settings
    pub store: StoreConfig,

    /// Extra style presets by name
    pub presets: HashMap<String, StylePreset>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.stylize.validate()?;
        self.palette.validate()?;
        self.batch.validate()?;

        let registry = self.style_registry()?;
        if !registry.has_style(&self.stylize.default_style) {
            return Err(ConfigError::InvalidValue {
                key: "stylize.default_style".to_string(),
                value: self.stylize.default_style.clone()
            }.into());
        }
        Ok(())
    }

    /// Build the style table: built-ins, then configured presets, then the default style
    pub fn style_registry(&self) -> Result<StyleRegistry> {
        let mut registry = StyleRegistry::with_presets(&self.presets)?;
        registry.set_default_style(&self.stylize.default_style);
        Ok(registry)
    }
}

/// Cartoon pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylizeConfig {
    /// Style used when none, or an unknown one, is requested
    pub default_style: String,

    /// Largest output width in pixels
    pub max_width: u32,

    /// Largest output height in pixels
    pub max_height: u32,

    /// Scaled edge magnitude above which pixels are darkened
    pub edge_threshold: f64,
}

impl Default for StylizeConfig {
    fn default() -> Self {
        Self {
            default_style: BuiltinStyle::DEFAULT.name().to_string(),
            max_width: 400,
            max_height: 400,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
        }
    }
}

impl StylizeConfig {
    fn validate(&self) -> Result<()> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(ConfigError::InvalidValue {
                key: "stylize.max_size".to_string(),
                value: format!("{}x{}", self.max_width, self.max_height)
            }.into());
        }

        if !self.edge_threshold.is_finite() || self.edge_threshold < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "stylize.edge_threshold".to_string(),
                value: self.edge_threshold.to_string()
            }.into());
        }

        Ok(())
    }
}

/// Dominant color extraction configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Images larger than this on either side are downsampled before counting
    pub sample_size: u32,

    /// Maximum number of colors returned
    pub max_colors: usize,

    /// Channels are floored to a multiple of this value before counting
    pub quantize_step: u8,

    /// Pixels with alpha below this are skipped
    pub alpha_threshold: u8,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            sample_size: 50,
            max_colors: 5,
            quantize_step: 16,
            alpha_threshold: 128,
        }
    }
}

impl PaletteConfig {
    fn validate(&self) -> Result<()> {
        if self.sample_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "palette.sample_size".to_string(),
                value: self.sample_size.to_string()
            }.into());
        }

        if !(1..=128).contains(&self.quantize_step) {
            return Err(ConfigError::InvalidValue {
                key: "palette.quantize_step".to_string(),
                value: self.quantize_step.to_string()
            }.into());
        }

        Ok(())
    }
}

/// Batch processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of images stylized in parallel
    pub threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            threads: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(ConfigError::InvalidValue {
                key: "batch.threads".to_string(),
                value: self.threads.to_string()
            }.into());
        }
        Ok(())
    }
}

/// Pod image store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding original and cartoon images per pod
    pub root: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("pod-images"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let mut original_config = Config::default();
        original_config.stylize.max_width = 320;
        original_config.presets.insert("mossy".to_string(), BuiltinStyle::Watercolor.preset());

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(loaded_config.stylize.max_width, 320);
        assert_eq!(loaded_config.palette, original_config.palette);
        assert_eq!(loaded_config.presets["mossy"].blur_radius, 2);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [stylize]
            default_style = "sketch"

            [presets.neon]
            saturation = 2.0
            contrast = 1.5
            brightness = 1.0
            blur_radius = 0
            posterize_levels = 4
            edge_strength = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.stylize.max_height, 400);
        assert_eq!(config.palette.max_colors, 5);
        assert!(config.validate().is_ok());

        let registry = config.style_registry().unwrap();
        assert_eq!(registry.resolve(Some("unknown")).name, "sketch");
        assert_eq!(registry.resolve(Some("neon")).posterize_levels, 4);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.stylize.max_width = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.palette.quantize_step = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.batch.threads = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.stylize.default_style = "oil".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(Config::from_file("/no/such/garden.toml").is_err());
    }
}
