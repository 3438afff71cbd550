use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    config::{Config, StylizeConfig},
    effects::{apply_color_filters, detect_edges, stack_blur},
    error::{ProcessingError, Result},
    raster::{fit_within, EncodedImage, RasterImage},
    source::{ImageLoader, ImageSource},
    styles::{StylePreset, StyleRegistry},
};

/// Turns plant photos into cartoon-styled images
///
/// The engine follows a fixed pipeline:
/// 1. Decode - load the source into an RGBA raster
/// 2. Fit - scale down (never up) to the configured bounds, keeping the aspect ratio
/// 3. Color - saturation, brightness, contrast and posterization per pixel
/// 4. Edges - darken strong edges of the unfiltered image (when the style asks for it)
/// 5. Blur - stack blur (when the style asks for it)
/// 6. Encode - PNG
///
/// Every run works on its own buffers; the source image is never modified and a failed
/// run never hands back a partially processed image.
pub struct StylizationEngine {
    config: StylizeConfig,
    registry: StyleRegistry,
    loader: ImageLoader,
    batch_threads: usize,
}

impl StylizationEngine {
    /// Create an engine from the full configuration, including any extra presets
    pub fn new(config: &Config) -> Result<Self> {
        let registry = config.style_registry()?;
        Ok(Self::with_registry(config.stylize.clone(), registry)
            .with_batch_threads(config.batch.threads))
    }

    /// Create an engine with an explicit preset table
    pub fn with_registry(config: StylizeConfig, registry: StyleRegistry) -> Self {
        Self {
            config,
            registry,
            loader: ImageLoader::new(),
            batch_threads: num_cpus::get(),
        }
    }

    pub fn with_batch_threads(mut self, threads: usize) -> Self {
        self.batch_threads = threads.max(1);
        self
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &StylizeConfig {
        &self.config
    }

    /// Load a photo and return its stylized PNG
    ///
    /// Unknown or missing style names use the default preset. Load failures are
    /// reported as image load errors; anything that goes wrong afterwards is a
    /// processing error.
    pub async fn stylize(&self, source: &ImageSource, style: Option<&str>) -> Result<EncodedImage> {
        let preset = self.registry.resolve(style).clone();
        info!("🎨 Stylizing {} with '{}'", source.describe(), preset.name);

        let image = self.loader.load(source).await.map_err(|e| {
            warn!("Failed to load {}: {}", source.describe(), e);
            e
        })?;

        self.run_pipeline(image, preset).await
    }

    /// Stylize an image that has already been loaded and decoded
    ///
    /// Used when the caller also needs the source bytes, so the source is only read once.
    pub async fn stylize_decoded(&self, image: RasterImage, style: Option<&str>) -> Result<EncodedImage> {
        let preset = self.registry.resolve(style).clone();
        debug!("Stylizing decoded {:?} image with '{}'", image.dimensions(), preset.name);
        self.run_pipeline(image, preset).await
    }

    async fn run_pipeline(&self, image: RasterImage, preset: StylePreset) -> Result<EncodedImage> {
        let config = self.config.clone();
        let encoded = tokio::task::spawn_blocking(move || {
            let stylized = stylize_image(&image, &preset, &config)?;
            EncodedImage::encode_png(&stylized)
        })
        .await
        .map_err(|e| ProcessingError::StageFailed {
            stage: "pipeline".to_string(),
            reason: e.to_string(),
        })??;

        info!("   ✅ {}x{}, {} bytes", encoded.width, encoded.height, encoded.len());
        Ok(encoded)
    }

    /// Stylize an already decoded raster on the calling thread
    pub fn stylize_raster(&self, image: &RasterImage, style: Option<&str>) -> Result<RasterImage> {
        stylize_image(image, self.registry.resolve(style), &self.config)
    }

    /// Stylize many photos, running the pixel work in parallel
    ///
    /// Results come back in input order; one failing photo does not affect the others.
    pub async fn stylize_batch(
        &self,
        sources: &[ImageSource],
        style: Option<&str>,
    ) -> Result<Vec<Result<EncodedImage>>> {
        let preset = self.registry.resolve(style).clone();
        info!("📦 Stylizing {} photos with '{}' on {} threads",
              sources.len(), preset.name, self.batch_threads);

        let mut loaded = Vec::with_capacity(sources.len());
        for source in sources {
            loaded.push(self.loader.load(source).await);
        }

        let config = self.config.clone();
        let threads = self.batch_threads;

        let results = tokio::task::spawn_blocking(move || -> Result<Vec<Result<EncodedImage>>> {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| ProcessingError::StageFailed {
                    stage: "batch".to_string(),
                    reason: e.to_string(),
                })?;

            Ok(pool.install(|| {
                loaded
                    .into_par_iter()
                    .map(|image| {
                        let stylized = stylize_image(&image?, &preset, &config)?;
                        EncodedImage::encode_png(&stylized)
                    })
                    .collect()
            }))
        })
        .await
        .map_err(|e| ProcessingError::StageFailed {
            stage: "batch".to_string(),
            reason: e.to_string(),
        })??;

        let failures = results.iter().filter(|result| result.is_err()).count();
        if failures > 0 {
            warn!("{} of {} photos failed to stylize", failures, results.len());
        }
        Ok(results)
    }
}

/// Run the full cartoon pipeline on a decoded image
///
/// Returns a new raster no larger than the configured bounds; `image` is left untouched.
pub fn stylize_image(
    image: &RasterImage,
    preset: &StylePreset,
    config: &StylizeConfig,
) -> Result<RasterImage> {
    let (width, height) = fit_within(image.width(), image.height(), config.max_width, config.max_height);
    debug!("Pipeline '{}': {:?} -> {}x{}", preset.name, image.dimensions(), width, height);

    let original = image.resized(width, height);

    let mut filtered = original.clone();
    apply_color_filters(&mut filtered, preset);

    let mut output = if preset.uses_edges() {
        detect_edges(&filtered, &original, preset.edge_strength, config.edge_threshold)?
    } else {
        filtered
    };

    if preset.uses_blur() {
        stack_blur(&mut output, preset.blur_radius);
    }

    Ok(output)
}
