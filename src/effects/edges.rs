use crate::error::{ProcessingError, Result};
use crate::raster::RasterImage;

/// Edge magnitude (after scaling by strength) above which a pixel gets darkened
pub const DEFAULT_EDGE_THRESHOLD: f64 = 50.0;

const SOBEL_X: [[f64; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: [[f64; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Darken the filtered image wherever the unfiltered image has strong edges
///
/// Gradients are measured on `original` (the image before color filtering) and the
/// darkening is applied to `filtered`. The one-pixel border and all alpha values are
/// copied through unchanged. A `strength` of zero returns an identical copy.
pub fn detect_edges(
    filtered: &RasterImage,
    original: &RasterImage,
    strength: f64,
    threshold: f64,
) -> Result<RasterImage> {
    if filtered.dimensions() != original.dimensions() {
        return Err(ProcessingError::DimensionMismatch {
            left: filtered.dimensions(),
            right: original.dimensions(),
        }
        .into());
    }

    let mut output = filtered.clone();
    if strength == 0.0 {
        return Ok(output);
    }

    let (width, height) = filtered.dimensions();
    if width < 3 || height < 3 {
        return Ok(output);
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let edge = gradient_magnitude(original, x, y) * strength;
            if edge <= threshold {
                continue;
            }

            let pixel = output.get_pixel_mut(x, y);
            for channel in pixel.iter_mut().take(3) {
                *channel = (*channel as f64 - edge).max(0.0).round() as u8;
            }
        }
    }

    Ok(output)
}

/// Sobel gradient magnitude of the grayscale neighbourhood around an interior pixel
fn gradient_magnitude(image: &RasterImage, x: u32, y: u32) -> f64 {
    let mut gx = 0.0;
    let mut gy = 0.0;

    for ky in 0..3 {
        for kx in 0..3 {
            let pixel = image.get_pixel(x + kx - 1, y + ky - 1);
            let gray = (pixel[0] as f64 + pixel[1] as f64 + pixel[2] as f64) / 3.0;

            gx += gray * SOBEL_X[ky as usize][kx as usize];
            gy += gray * SOBEL_Y[ky as usize][kx as usize];
        }
    }

    (gx * gx + gy * gy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Left half black, right half white
    fn split_image(width: u32, height: u32) -> RasterImage {
        let mut image = RasterImage::new_filled(width, height, [0, 0, 0, 255]);
        for y in 0..height {
            for x in width / 2..width {
                image.set_pixel(x, y, [255, 255, 255, 255]);
            }
        }
        image
    }

    #[test]
    fn test_zero_strength_is_noop() {
        let original = split_image(6, 6);
        let filtered = RasterImage::new_filled(6, 6, [200, 180, 160, 255]);
        let output = detect_edges(&filtered, &original, 0.0, DEFAULT_EDGE_THRESHOLD).unwrap();
        assert_eq!(output, filtered);
    }

    #[test]
    fn test_darkens_edge_pixels_only() {
        let original = split_image(6, 6);
        let filtered = RasterImage::new_filled(6, 6, [200, 180, 160, 90]);
        let output = detect_edges(&filtered, &original, 0.3, DEFAULT_EDGE_THRESHOLD).unwrap();

        // Column 2 sits next to the boundary: gx = 4 * 255, edge = 306 -> fully dark
        assert_eq!(output.get_pixel(2, 2), [0, 0, 0, 90]);
        // Column 1 only sees black
        assert_eq!(output.get_pixel(1, 2), [200, 180, 160, 90]);
        // Border rows are never touched
        assert_eq!(output.get_pixel(2, 0), [200, 180, 160, 90]);
        assert_eq!(output.get_pixel(2, 5), [200, 180, 160, 90]);
    }

    #[test]
    fn test_weak_edges_below_threshold_pass_through() {
        let mut original = RasterImage::new_filled(5, 5, [100, 100, 100, 255]);
        original.set_pixel(2, 2, [110, 110, 110, 255]);
        let filtered = RasterImage::new_filled(5, 5, [50, 60, 70, 255]);

        let output = detect_edges(&filtered, &original, 0.3, DEFAULT_EDGE_THRESHOLD).unwrap();
        assert_eq!(output, filtered);
    }

    #[test]
    fn test_dimension_mismatch_is_error() {
        let original = RasterImage::new_filled(4, 4, [0, 0, 0, 255]);
        let filtered = RasterImage::new_filled(4, 5, [0, 0, 0, 255]);
        assert!(detect_edges(&filtered, &original, 0.5, DEFAULT_EDGE_THRESHOLD).is_err());
    }

    #[test]
    fn test_tiny_images_have_no_interior() {
        let image = RasterImage::new_filled(1, 1, [10, 20, 30, 255]);
        let output = detect_edges(&image, &image, 0.7, DEFAULT_EDGE_THRESHOLD).unwrap();
        assert_eq!(output, image);
    }
}
