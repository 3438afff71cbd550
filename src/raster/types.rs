use image::{imageops::FilterType, DynamicImage, ImageBuffer, Rgba, RgbaImage};

use crate::error::{ProcessingError, Result};

/// Number of interleaved channels per pixel (red, green, blue, alpha)
pub const CHANNELS: usize = 4;

/// An RGBA raster image handed from one pipeline stage to the next
///
/// This is a thin wrapper around an RGBA image buffer. The backing storage always
/// holds exactly `width * height * 4` bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    buffer: RgbaImage,
}

impl RasterImage {
    /// Create a new raster from an RGBA image buffer
    pub fn new(buffer: RgbaImage) -> Self {
        Self { buffer }
    }

    /// Create a new raster with the given dimensions filled with the specified color
    pub fn new_filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let buffer = ImageBuffer::from_fn(width, height, |_, _| Rgba(color));
        Self { buffer }
    }

    /// Create a raster from raw interleaved RGBA bytes
    ///
    /// Fails when the byte count does not match `width * height * 4`.
    pub fn from_rgba_bytes(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        let actual = data.len();
        if actual != expected {
            return Err(ProcessingError::BufferSize { width, height, expected, actual }.into());
        }

        ImageBuffer::from_raw(width, height, data)
            .map(|buffer| Self { buffer })
            .ok_or_else(|| {
                ProcessingError::BufferSize { width, height, expected, actual }.into()
            })
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// True when the image has no pixels at all
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Get a pixel at the given coordinates (returns RGBA array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.buffer.get_pixel(x, y).0
    }

    /// Get a mutable reference to a pixel at the given coordinates
    pub fn get_pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8; 4] {
        &mut self.buffer.get_pixel_mut(x, y).0
    }

    /// Set a pixel at the given coordinates
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        self.buffer.put_pixel(x, y, Rgba(color));
    }

    /// Raw interleaved RGBA bytes
    pub fn as_raw(&self) -> &[u8] {
        &self.buffer
    }

    /// Mutable raw interleaved RGBA bytes
    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Consume the raster and return its RGBA bytes
    pub fn into_raw(self) -> Vec<u8> {
        self.buffer.into_raw()
    }

    /// Get the underlying image buffer
    pub fn as_image(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Resample to the given dimensions with a bilinear filter
    pub fn resized(&self, width: u32, height: u32) -> Self {
        if self.dimensions() == (width, height) {
            return self.clone();
        }
        Self {
            buffer: image::imageops::resize(&self.buffer, width, height, FilterType::Triangle),
        }
    }
}

impl From<DynamicImage> for RasterImage {
    fn from(image: DynamicImage) -> Self {
        Self::new(image.to_rgba8())
    }
}

/// Compute dimensions that fit inside `max_width x max_height` while keeping the aspect ratio
///
/// Images are only ever scaled down. Width is fitted first, then height, and neither
/// side drops below one pixel.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }

    let mut w = width as f64;
    let mut h = height as f64;

    if w > max_width as f64 {
        h *= max_width as f64 / w;
        w = max_width as f64;
    }

    if h > max_height as f64 {
        w *= max_height as f64 / h;
        h = max_height as f64;
    }

    ((w.round() as u32).max(1), (h.round() as u32).max(1))
}
