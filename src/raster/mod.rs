//! # Raster Module
//!
//! RGBA pixel buffers shared by every pipeline stage, plus PNG encoding of the result.

pub mod encode;
pub mod types;

pub use encode::{EncodedImage, OutputFormat};
pub use types::{fit_within, RasterImage};
