use std::collections::HashMap;

use tracing::debug;

use crate::config::PaletteConfig;
use crate::error::Result;
use crate::palette::Rgb8;
use crate::raster::{types::CHANNELS, RasterImage};
use crate::source::{ImageLoader, ImageSource};

/// A quantized color and how many sampled pixels fell into it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSample {
    pub color: Rgb8,
    pub count: usize,
}

/// Finds the most frequent colors of a photo
///
/// This is a frequency heuristic, not a perceptual one: similar colors are grouped by
/// flooring each channel to a multiple of the quantization step, then counted.
#[derive(Debug, Clone)]
pub struct DominantColorExtractor {
    loader: ImageLoader,
    config: PaletteConfig,
}

impl DominantColorExtractor {
    pub fn new(config: PaletteConfig) -> Self {
        Self::with_loader(config, ImageLoader::new())
    }

    pub fn with_loader(config: PaletteConfig, loader: ImageLoader) -> Self {
        Self { loader, config }
    }

    pub fn config(&self) -> &PaletteConfig {
        &self.config
    }

    /// Load a source and return up to `max_colors` colors, most frequent first
    pub async fn extract(&self, source: &ImageSource) -> Result<Vec<Rgb8>> {
        let image = self.loader.load(source).await?;
        let samples = dominant_colors(&image, &self.config);

        debug!(
            "Extracted {} dominant colors from {}",
            samples.len(),
            source.describe()
        );
        Ok(samples.into_iter().map(|sample| sample.color).collect())
    }
}

/// Shrink an image to at most `sample_size` pixels per side
///
/// Images already within the sample size are returned as-is so no resampling blends
/// neighbouring colors together.
pub fn sample_image(image: &RasterImage, sample_size: u32) -> RasterImage {
    let (width, height) = image.dimensions();
    if width <= sample_size && height <= sample_size {
        return image.clone();
    }
    image.resized(width.min(sample_size), height.min(sample_size))
}

/// Count quantized colors of the (downsampled) image and return the most frequent ones
///
/// Pixels whose alpha is below the configured threshold are ignored. Ties keep the
/// order in which the colors were first seen.
pub fn dominant_colors(image: &RasterImage, config: &PaletteConfig) -> Vec<ColorSample> {
    let sample = sample_image(image, config.sample_size);

    // color -> (count, first seen)
    let mut tally: HashMap<Rgb8, (usize, usize)> = HashMap::new();

    for (index, pixel) in sample.as_raw().chunks_exact(CHANNELS).enumerate() {
        if pixel[3] < config.alpha_threshold {
            continue;
        }

        let color = Rgb8::new(
            quantize(pixel[0], config.quantize_step),
            quantize(pixel[1], config.quantize_step),
            quantize(pixel[2], config.quantize_step),
        );
        tally.entry(color).or_insert((0, index)).0 += 1;
    }

    let mut samples: Vec<(ColorSample, usize)> = tally
        .into_iter()
        .map(|(color, (count, first_seen))| (ColorSample { color, count }, first_seen))
        .collect();

    samples.sort_by(|(a, a_first), (b, b_first)| {
        b.count.cmp(&a.count).then(a_first.cmp(b_first))
    });

    samples
        .into_iter()
        .take(config.max_colors)
        .map(|(sample, _)| sample)
        .collect()
}

#[inline]
fn quantize(channel: u8, step: u8) -> u8 {
    let step = step.max(1);
    (channel / step) * step
}
