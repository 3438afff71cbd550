use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::raster::RasterImage;

/// Lossless output encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
}

impl OutputFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
        }
    }
}

/// An encoded image ready for display or storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// Encode a raster as an 8-bit RGBA PNG
    pub fn encode_png(image: &RasterImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        let mut bytes = Vec::new();

        {
            let mut encoder = png::Encoder::new(&mut bytes, width, height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            let mut writer = encoder.write_header().map_err(encoding_failed)?;
            writer.write_image_data(image.as_raw()).map_err(encoding_failed)?;
            writer.finish().map_err(encoding_failed)?;
        }

        Ok(Self {
            format: OutputFormat::Png,
            width,
            height,
            bytes,
        })
    }

    /// Render as a `data:` URL suitable for an `<img src>` attribute
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    /// Write the encoded bytes to disk
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        tokio::fs::write(path, &self.bytes).await?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn encoding_failed(err: png::EncodingError) -> ProcessingError {
    ProcessingError::EncodingFailed { reason: err.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_decodes_back_to_same_pixels() {
        let mut image = RasterImage::new_filled(3, 2, [12, 200, 40, 255]);
        image.set_pixel(2, 1, [0, 0, 0, 128]);

        let encoded = EncodedImage::encode_png(&image).unwrap();
        assert_eq!((encoded.width, encoded.height), (3, 2));
        assert!(encoded.bytes.starts_with(&[0x89, b'P', b'N', b'G']));

        let decoded = image::load_from_memory(&encoded.bytes).unwrap().to_rgba8();
        assert_eq!(decoded.as_raw(), image.as_raw());
    }

    #[test]
    fn test_data_url_prefix() {
        let image = RasterImage::new_filled(1, 1, [255, 0, 0, 255]);
        let url = EncodedImage::encode_png(&image).unwrap().to_data_url();
        assert!(url.starts_with("data:image/png;base64,iVBOR"));
    }
}
