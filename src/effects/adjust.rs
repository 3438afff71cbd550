use crate::effects::color::{hsl_to_rgb, rgb_to_hsl, Hsl};
use crate::raster::{types::CHANNELS, RasterImage};
use crate::styles::StylePreset;

/// Apply saturation, brightness, contrast and posterization to every pixel in place
///
/// Each pixel is mapped from its own value alone; the alpha channel is left untouched.
pub fn apply_color_filters(image: &mut RasterImage, preset: &StylePreset) {
    for pixel in image.as_raw_mut().chunks_exact_mut(CHANNELS) {
        let [r, g, b] = filter_pixel([pixel[0], pixel[1], pixel[2]], preset);
        pixel[0] = r;
        pixel[1] = g;
        pixel[2] = b;
    }
}

/// Run the full per-pixel color chain on a single RGB triple
pub fn filter_pixel(rgb: [u8; 3], preset: &StylePreset) -> [u8; 3] {
    let hsl = rgb_to_hsl(
        rgb[0] as f64 / 255.0,
        rgb[1] as f64 / 255.0,
        rgb[2] as f64 / 255.0,
    );

    let adjusted = Hsl {
        h: hsl.h,
        s: (hsl.s * preset.saturation).clamp(0.0, 1.0),
        l: (hsl.l * preset.brightness).clamp(0.0, 1.0),
    };

    let (r, g, b) = hsl_to_rgb(adjusted);

    [r, g, b].map(|channel| {
        let contrasted = contrast(channel, preset.contrast);
        to_channel(posterize(contrasted, preset.posterize_levels))
    })
}

/// Stretch a normalized channel around mid-gray and scale it back to 0-255
#[inline]
fn contrast(value: f64, factor: f64) -> f64 {
    ((value - 0.5) * factor + 0.5) * 255.0
}

/// Quantize a 0-255 channel value onto `levels` evenly spaced buckets
///
/// The result is not clamped; callers run it through [`to_channel`].
#[inline]
pub fn posterize(value: f64, levels: u32) -> f64 {
    let step = 255.0 / levels.max(1) as f64;
    (value / step).round() * step
}

/// Clamp to 0-255 and round to the nearest integer channel value
#[inline]
pub fn to_channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::BuiltinStyle;
    use proptest::prelude::*;

    #[test]
    fn test_kawaii_saturates_red() {
        let kawaii = BuiltinStyle::Kawaii.preset();
        assert_eq!(filter_pixel([255, 0, 0], &kawaii), [255, 0, 0]);
    }

    #[test]
    fn test_kawaii_darkens_mid_gray() {
        let kawaii = BuiltinStyle::Kawaii.preset();
        // l = 0.502 * 0.9, contrast 1.8 -> ~105, posterized to 2 * 51
        assert_eq!(filter_pixel([128, 128, 128], &kawaii), [102, 102, 102]);
    }

    #[test]
    fn test_bucket_boundaries_round_in_double_precision() {
        let kawaii = BuiltinStyle::Kawaii.preset();
        // Contrasted green lands within 1e-6 of a bucket midpoint
        assert_eq!(filter_pixel([10, 135, 160], &kawaii), [0, 102, 153]);
        assert_eq!(filter_pixel([20, 155, 105], &kawaii), [0, 204, 102]);
    }

    #[test]
    fn test_alpha_untouched() {
        let sketch = BuiltinStyle::Sketch.preset();
        let mut image = RasterImage::new_filled(4, 3, [90, 160, 40, 77]);
        apply_color_filters(&mut image, &sketch);

        for pixel in image.as_raw().chunks_exact(CHANNELS) {
            assert_eq!(pixel[3], 77);
        }
    }

    #[test]
    fn test_stateless_per_pixel() {
        let watercolor = BuiltinStyle::Watercolor.preset();
        let mut image = RasterImage::new_filled(2, 1, [30, 140, 60, 255]);
        image.set_pixel(1, 0, [220, 40, 180, 255]);
        apply_color_filters(&mut image, &watercolor);

        let expected = filter_pixel([30, 140, 60], &watercolor);
        assert_eq!(&image.get_pixel(0, 0)[..3], &expected[..]);
    }

    #[test]
    fn test_posterize_snaps_to_buckets() {
        assert_eq!(posterize(100.0, 5), 102.0);
        assert_eq!(posterize(0.0, 8), 0.0);
        assert_eq!(to_channel(posterize(255.0, 7)), 255);
        assert_eq!(to_channel(-40.0), 0);
        assert_eq!(to_channel(300.0), 255);
    }

    proptest! {
        #[test]
        fn prop_posterize_is_idempotent(value in 0u8..=255, levels in 2u32..=64) {
            let once = to_channel(posterize(value as f64, levels));
            let twice = to_channel(posterize(once as f64, levels));
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_filter_pixel_is_deterministic(
            r in 0u8..=255,
            g in 0u8..=255,
            b in 0u8..=255,
            saturation in 0.0f64..3.0,
            contrast in 0.0f64..3.0,
            brightness in 0.0f64..2.0,
            levels in 2u32..16,
        ) {
            let preset = StylePreset {
                saturation,
                contrast,
                brightness,
                posterize_levels: levels,
                ..BuiltinStyle::Kawaii.preset()
            };
            prop_assert_eq!(filter_pixel([r, g, b], &preset), filter_pixel([r, g, b], &preset));
        }
    }
}
