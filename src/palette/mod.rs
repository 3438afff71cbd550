//! # Dominant Colors and Kawaii Portraits
//!
//! A simpler path than the cartoon pipeline: sample a photo's most frequent colors
//! and use them to recolor a fixed vector portrait of a potted plant.

pub mod color;
pub mod extractor;
pub mod svg;

pub use color::Rgb8;
pub use extractor::{dominant_colors, sample_image, ColorSample, DominantColorExtractor};
pub use svg::{render_kawaii_svg, svg_data_url, thematic_portrait, KawaiiPalette};
