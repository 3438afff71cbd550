//! # Image Sources
//!
//! Where a photo comes from (a file, bytes already in memory, a `data:` URL or a
//! remote URL) and how it is turned into a [`RasterImage`](crate::raster::RasterImage).

pub mod loader;
pub mod types;

pub use loader::ImageLoader;
pub use types::ImageSource;
