use base64::{engine::general_purpose, Engine as _};
use tracing::debug;

use crate::error::{ImageLoadError, Result};
use crate::raster::RasterImage;
use crate::source::ImageSource;

/// Loads and decodes images from any [`ImageSource`]
///
/// Decoding is the only place the pipeline waits on I/O; everything after it is
/// synchronous pixel work.
#[derive(Debug, Clone, Default)]
pub struct ImageLoader {
    client: reqwest::Client,
}

impl ImageLoader {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Load and decode a source into an RGBA raster
    pub async fn load(&self, source: &ImageSource) -> Result<RasterImage> {
        let bytes = self.load_bytes(source).await?;
        Self::decode(&bytes, &source.describe())
    }

    /// Fetch the still-encoded bytes behind a source
    pub async fn load_bytes(&self, source: &ImageSource) -> Result<Vec<u8>> {
        match source {
            ImageSource::Path(path) => {
                debug!("Reading image from {:?}", path);
                tokio::fs::read(path).await.map_err(|e| {
                    ImageLoadError::ReadFailed {
                        source_name: path.display().to_string(),
                        reason: e.to_string(),
                    }
                    .into()
                })
            }
            ImageSource::Bytes(bytes) => Ok(bytes.clone()),
            ImageSource::DataUrl(data) => decode_data_url(data),
            ImageSource::Url(url) => self.fetch(url).await,
        }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!("Fetching image from {}", url);

        let fetch_failed = |reason: String| ImageLoadError::FetchFailed {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| fetch_failed(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| fetch_failed(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    /// Decode PNG or JPEG bytes into an RGBA raster
    pub fn decode(bytes: &[u8], source_name: &str) -> Result<RasterImage> {
        let image = image::load_from_memory(bytes).map_err(|e| ImageLoadError::DecodeFailed {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })?;

        let raster = RasterImage::from(image);
        debug!("Decoded {} as {}x{}", source_name, raster.width(), raster.height());
        Ok(raster)
    }
}

/// Decode a `data:...;base64,` URL or a bare base64 string
fn decode_data_url(data: &str) -> Result<Vec<u8>> {
    let payload = match data.split_once(',') {
        Some((header, payload)) => {
            if !header.to_ascii_lowercase().ends_with(";base64") {
                return Err(ImageLoadError::InvalidBase64 {
                    reason: format!("'{}' is not a base64 data URL", header),
                }
                .into());
            }
            payload
        }
        None => data,
    };

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    general_purpose::STANDARD.decode(compact).map_err(|e| {
        ImageLoadError::InvalidBase64 {
            reason: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StylizerError;
    use crate::raster::EncodedImage;

    fn sample_png() -> Vec<u8> {
        let image = RasterImage::new_filled(3, 2, [40, 160, 70, 255]);
        EncodedImage::encode_png(&image).unwrap().bytes
    }

    #[tokio::test]
    async fn test_load_from_bytes() {
        let loader = ImageLoader::new();
        let raster = loader.load(&ImageSource::Bytes(sample_png())).await.unwrap();
        assert_eq!(raster.dimensions(), (3, 2));
        assert_eq!(raster.get_pixel(0, 0), [40, 160, 70, 255]);
    }

    #[tokio::test]
    async fn test_load_from_data_url() {
        let url = EncodedImage::encode_png(&RasterImage::new_filled(1, 1, [9, 9, 9, 255]))
            .unwrap()
            .to_data_url();

        let loader = ImageLoader::new();
        let raster = loader.load(&ImageSource::parse(&url)).await.unwrap();
        assert_eq!(raster.get_pixel(0, 0), [9, 9, 9, 255]);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pod.png");
        std::fs::write(&path, sample_png()).unwrap();

        let raster = ImageLoader::new().load(&path.into()).await.unwrap();
        assert_eq!(raster.dimensions(), (3, 2));
    }

    #[tokio::test]
    async fn test_missing_file_is_load_error() {
        let result = ImageLoader::new()
            .load(&ImageSource::parse("/definitely/not/here.png"))
            .await;
        assert!(matches!(result, Err(StylizerError::Load(ImageLoadError::ReadFailed { .. }))));
    }

    #[test]
    fn test_corrupt_bytes_are_decode_error() {
        let result = ImageLoader::decode(b"not an image", "junk");
        assert!(matches!(result, Err(StylizerError::Load(ImageLoadError::DecodeFailed { .. }))));
    }

    #[test]
    fn test_data_url_must_be_base64() {
        assert!(decode_data_url("data:image/svg+xml;utf8,<svg/>").is_err());
        assert_eq!(decode_data_url("aGk=").unwrap(), b"hi".to_vec());
    }
}
