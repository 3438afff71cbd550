use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::Result;
use crate::styles::{BuiltinStyle, StylePreset};

/// Registry of named style presets
///
/// The registry is the table the engine consults at call time. It always contains the
/// built-in presets; extra presets can be registered from configuration. Lookups with an
/// unknown name fall back to the default style rather than failing.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    presets: HashMap<String, StylePreset>,
    default_style: String,
}

impl StyleRegistry {
    /// Create a new style registry with all built-in styles
    pub fn new() -> Self {
        let mut registry = Self {
            presets: HashMap::new(),
            default_style: BuiltinStyle::DEFAULT.name().to_string(),
        };

        registry.register_builtin_styles();
        registry
    }

    /// Create a registry with the built-ins plus the given named presets
    pub fn with_presets<'a, I>(presets: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a StylePreset)>,
    {
        let mut registry = Self::new();
        for (name, preset) in presets {
            let mut preset = preset.clone();
            preset.name = name.clone();
            preset.validate()?;
            registry.register(preset);
        }
        Ok(registry)
    }

    fn register_builtin_styles(&mut self) {
        for style in BuiltinStyle::ALL {
            self.presets.insert(style.name().to_string(), style.preset());
        }
    }

    /// Register a preset under its own name, replacing any existing entry
    pub fn register(&mut self, preset: StylePreset) {
        if self.presets.contains_key(&preset.name) {
            warn!("Style preset '{}' replaces an existing preset", preset.name);
        } else {
            debug!("Registered style preset '{}'", preset.name);
        }
        self.presets.insert(preset.name.clone(), preset);
    }

    /// Change the fallback style; ignored if no preset has that name
    pub fn set_default_style(&mut self, name: &str) -> bool {
        if self.presets.contains_key(name) {
            self.default_style = name.to_string();
            true
        } else {
            false
        }
    }

    pub fn default_style(&self) -> &str {
        &self.default_style
    }

    /// Get a preset by exact name
    pub fn get_style(&self, name: &str) -> Option<&StylePreset> {
        self.presets.get(name)
    }

    /// Resolve an optional style name, falling back to the default preset
    pub fn resolve(&self, name: Option<&str>) -> &StylePreset {
        let requested = name.and_then(|name| {
            let preset = self.presets.get(name);
            if preset.is_none() {
                debug!("Unknown style '{}', using '{}'", name, self.default_style);
            }
            preset
        });

        requested
            .or_else(|| self.presets.get(&self.default_style))
            .unwrap_or_else(|| &self.presets[BuiltinStyle::DEFAULT.name()])
    }

    /// Get all available style names, sorted
    pub fn available_styles(&self) -> Vec<String> {
        let mut names: Vec<String> = self.presets.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn has_style(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_styles_available() {
        let registry = StyleRegistry::new();

        assert!(registry.has_style("kawaii"));
        assert!(registry.has_style("sketch"));
        assert!(registry.has_style("watercolor"));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.available_styles(), vec!["kawaii", "sketch", "watercolor"]);
    }

    #[test]
    fn test_unknown_style_falls_back_to_kawaii() {
        let registry = StyleRegistry::new();

        assert_eq!(registry.resolve(Some("oil-paint")), &BuiltinStyle::Kawaii.preset());
        assert_eq!(registry.resolve(None), &BuiltinStyle::Kawaii.preset());
        assert_eq!(registry.resolve(Some("sketch")).name, "sketch");
        assert!(registry.get_style("oil-paint").is_none());
    }

    #[test]
    fn test_custom_style_registration() {
        let mut presets = HashMap::new();
        presets.insert(
            "neon".to_string(),
            StylePreset {
                name: String::new(),
                saturation: 2.0,
                contrast: 1.5,
                brightness: 1.0,
                blur_radius: 0,
                posterize_levels: 4,
                edge_strength: 0.5,
            },
        );

        let registry = StyleRegistry::with_presets(&presets).unwrap();
        assert!(registry.has_style("neon"));
        assert_eq!(registry.get_style("neon").unwrap().name, "neon");
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_invalid_custom_style_rejected() {
        let mut bad = BuiltinStyle::Sketch.preset();
        bad.posterize_levels = 0;

        let mut presets = HashMap::new();
        presets.insert("broken".to_string(), bad);
        assert!(StyleRegistry::with_presets(&presets).is_err());
    }

    #[test]
    fn test_set_default_style() {
        let mut registry = StyleRegistry::new();
        assert!(registry.set_default_style("watercolor"));
        assert!(!registry.set_default_style("missing"));
        assert_eq!(registry.resolve(Some("missing")).name, "watercolor");
    }
}
