//! # Cartoon Style Presets
//!
//! Styles are plain data: a [`StylePreset`] names the saturation, contrast, brightness,
//! blur, posterization and edge parameters the pipeline runs with. The
//! [`StyleRegistry`] holds the table of presets and resolves names at call time.
//!
//! ## Built-in Styles
//!
//! - **kawaii**: saturated, high contrast, five levels, light outlines
//! - **sketch**: nearly grayscale, strong outlines, radius-1 blur
//! - **watercolor**: bright, soft, radius-2 blur
//!
//! ## Usage
//!
//! ```rust
//! use garden_stylizer::styles::StyleRegistry;
//!
//! let registry = StyleRegistry::new();
//! // Unknown names resolve to kawaii
//! let preset = registry.resolve(Some("impressionist"));
//! assert_eq!(preset.name, "kawaii");
//! ```

pub mod preset;
pub mod registry;

pub use preset::{BuiltinStyle, StylePreset};
pub use registry::StyleRegistry;
