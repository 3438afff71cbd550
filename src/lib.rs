//! # garden-stylizer
//!
//! Cartoonize hydroponic plant photos and derive kawaii plant portraits from their
//! dominant colors.
//!
//! The heart of the crate is a three-stage raster pipeline: per-pixel HSL and contrast
//! adjustment with posterization, Sobel edge darkening and a stack blur. Named style
//! presets pick the parameters.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use garden_stylizer::{config::Config, source::ImageSource, StylizationEngine};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let engine = StylizationEngine::new(&Config::default())?;
//! let cartoon = engine
//!     .stylize(&ImageSource::parse("photos/basil.jpg"), Some("watercolor"))
//!     .await?;
//! cartoon.save("basil-cartoon.png").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`raster`] - RGBA buffers and PNG encoding
//! - [`effects`] - color filters, edge detection and stack blur
//! - [`styles`] - style presets and the registry that resolves them
//! - [`stylize`] - the engine tying the stages together
//! - [`palette`] - dominant colors and SVG portraits
//! - [`source`] - loading images from files, bytes, data URLs and the web
//! - [`store`] - per-pod image cache on disk
//! - [`config`] - configuration management
//!
//! ## Custom Presets
//!
//! Presets are data, so new looks need no code:
//!
//! ```rust
//! use garden_stylizer::styles::{StylePreset, StyleRegistry};
//!
//! let mut registry = StyleRegistry::new();
//! registry.register(StylePreset {
//!     name: "neon".to_string(),
//!     saturation: 2.0,
//!     contrast: 1.6,
//!     brightness: 1.0,
//!     blur_radius: 0,
//!     posterize_levels: 4,
//!     edge_strength: 0.5,
//! });
//! assert!(registry.has_style("neon"));
//! ```

pub mod config;
pub mod effects;
pub mod error;
pub mod palette;
pub mod raster;
pub mod source;
pub mod store;
pub mod styles;
pub mod stylize;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{ImageLoadError, ProcessingError, Result, StylizerError},
    palette::{DominantColorExtractor, KawaiiPalette, Rgb8},
    raster::{EncodedImage, RasterImage},
    source::ImageSource,
    store::{ImageKind, PodImageStore},
    styles::{BuiltinStyle, StylePreset, StyleRegistry},
    stylize::StylizationEngine,
};
