use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::effects::MAX_BLUR_RADIUS;
use crate::error::{ConfigError, Result};

/// Immutable bundle of cartoon filter parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StylePreset {
    /// Name the preset is registered under
    #[serde(default)]
    pub name: String,

    /// Multiplier for HSL saturation (result clamped to 1.0)
    pub saturation: f64,

    /// Contrast stretch around mid-gray (1.0 = unchanged)
    pub contrast: f64,

    /// Multiplier for HSL lightness (result clamped to 1.0)
    pub brightness: f64,

    /// Stack blur radius in pixels, 0 disables the blur stage
    pub blur_radius: u32,

    /// Number of evenly spaced levels per channel (at least 2)
    pub posterize_levels: u32,

    /// Scale applied to edge magnitude, 0 disables the edge stage
    pub edge_strength: f64,
}

impl StylePreset {
    /// Validate that every parameter is usable by the pipeline
    pub fn validate(&self) -> Result<()> {
        let key = |field: &str| format!("presets.{}.{}", self.name, field);

        for (field, value) in [
            ("saturation", self.saturation),
            ("contrast", self.contrast),
            ("brightness", self.brightness),
            ("edge_strength", self.edge_strength),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    key: key(field),
                    value: value.to_string(),
                }
                .into());
            }
        }

        if self.blur_radius > MAX_BLUR_RADIUS {
            return Err(ConfigError::InvalidValue {
                key: key("blur_radius"),
                value: self.blur_radius.to_string(),
            }
            .into());
        }

        if self.posterize_levels < 2 {
            return Err(ConfigError::InvalidValue {
                key: key("posterize_levels"),
                value: self.posterize_levels.to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Whether the edge darkening stage runs for this preset
    pub fn uses_edges(&self) -> bool {
        self.edge_strength > 0.0
    }

    /// Whether the blur stage runs for this preset
    pub fn uses_blur(&self) -> bool {
        self.blur_radius > 0
    }
}

/// The preset table shipped with the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinStyle {
    /// Punchy colors, few levels, light outlines
    Kawaii,
    /// Nearly grayscale with heavy outlines and a soft blur
    Sketch,
    /// Bright and soft with barely any outlines
    Watercolor,
}

impl BuiltinStyle {
    pub const ALL: [BuiltinStyle; 3] = [
        BuiltinStyle::Kawaii,
        BuiltinStyle::Sketch,
        BuiltinStyle::Watercolor,
    ];

    /// Style used when no name, or an unknown name, is requested
    pub const DEFAULT: BuiltinStyle = BuiltinStyle::Kawaii;

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinStyle::Kawaii => "kawaii",
            BuiltinStyle::Sketch => "sketch",
            BuiltinStyle::Watercolor => "watercolor",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BuiltinStyle::Kawaii => "Saturated, high-contrast cartoon with five color levels",
            BuiltinStyle::Sketch => "Washed-out pencil look with strong outlines",
            BuiltinStyle::Watercolor => "Bright, blurred washes of color",
        }
    }

    pub fn preset(&self) -> StylePreset {
        let (saturation, contrast, brightness, blur_radius, posterize_levels, edge_strength) =
            match self {
                BuiltinStyle::Kawaii => (1.4, 1.8, 0.9, 0, 5, 0.3),
                BuiltinStyle::Sketch => (0.2, 2.0, 1.0, 1, 8, 0.7),
                BuiltinStyle::Watercolor => (1.3, 1.2, 1.1, 2, 7, 0.1),
            };

        StylePreset {
            name: self.name().to_string(),
            saturation,
            contrast,
            brightness,
            blur_radius,
            posterize_levels,
            edge_strength,
        }
    }
}

impl fmt::Display for BuiltinStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuiltinStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        BuiltinStyle::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown style: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_presets_are_valid() {
        for style in BuiltinStyle::ALL {
            assert!(style.preset().validate().is_ok(), "{}", style);
        }
    }

    #[test]
    fn test_builtin_values() {
        let sketch = BuiltinStyle::Sketch.preset();
        assert_eq!(sketch.saturation, 0.2);
        assert_eq!(sketch.blur_radius, 1);
        assert_eq!(sketch.posterize_levels, 8);

        let kawaii = BuiltinStyle::Kawaii.preset();
        assert!(!kawaii.uses_blur());
        assert!(kawaii.uses_edges());
    }

    #[test]
    fn test_parse_style_name() {
        assert_eq!("Watercolor".parse::<BuiltinStyle>(), Ok(BuiltinStyle::Watercolor));
        assert!("oil".parse::<BuiltinStyle>().is_err());
    }

    #[test]
    fn test_invalid_presets_rejected() {
        let mut preset = BuiltinStyle::Kawaii.preset();
        preset.posterize_levels = 1;
        assert!(preset.validate().is_err());

        let mut preset = BuiltinStyle::Kawaii.preset();
        preset.edge_strength = -0.1;
        assert!(preset.validate().is_err());

        let mut preset = BuiltinStyle::Kawaii.preset();
        preset.contrast = f64::NAN;
        assert!(preset.validate().is_err());

        let mut preset = BuiltinStyle::Watercolor.preset();
        preset.blur_radius = MAX_BLUR_RADIUS + 1;
        assert!(preset.validate().is_err());
    }
}
