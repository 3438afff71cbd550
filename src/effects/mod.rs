//! # Pixel Effects
//!
//! The three stages of the cartoon pipeline. Each stage is a plain function over
//! [`RasterImage`](crate::raster::RasterImage) buffers so it can be run and tested on its own.
//!
//! - [`adjust`] - per-pixel saturation, brightness, contrast and posterization
//! - [`edges`] - Sobel edge darkening driven by the unfiltered image
//! - [`blur`] - stack blur, rows then columns

pub mod adjust;
pub mod blur;
pub mod color;
pub mod edges;

pub use adjust::{apply_color_filters, filter_pixel, posterize};
pub use blur::{stack_blur, MAX_BLUR_RADIUS};
pub use color::{hsl_to_rgb, rgb_to_hsl, Hsl};
pub use edges::{detect_edges, DEFAULT_EDGE_THRESHOLD};
