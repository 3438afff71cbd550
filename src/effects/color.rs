//! HSL (Hue-Saturation-Lightness) conversions with every component normalized to 0.0-1.0

/// HSL color with hue, saturation and lightness all in 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Convert normalized RGB (0.0-1.0) to HSL
///
/// Achromatic input (all channels equal) yields hue and saturation of zero.
#[inline]
pub fn rgb_to_hsl(r: f64, g: f64, b: f64) -> Hsl {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let delta = max - min;
    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let h = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    Hsl { h: h / 6.0, s, l }
}

/// Convert HSL back to normalized RGB (0.0-1.0)
#[inline]
pub fn hsl_to_rgb(hsl: Hsl) -> (f64, f64, f64) {
    let Hsl { h, s, l } = hsl;

    if s == 0.0 {
        return (l, l, l);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

#[inline]
fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-5;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < EPSILON, "{} != {}", a, b);
    }

    #[test]
    fn test_primaries() {
        let red = rgb_to_hsl(1.0, 0.0, 0.0);
        assert_close(red.h, 0.0);
        assert_close(red.s, 1.0);
        assert_close(red.l, 0.5);

        let green = rgb_to_hsl(0.0, 1.0, 0.0);
        assert_close(green.h, 1.0 / 3.0);

        let blue = rgb_to_hsl(0.0, 0.0, 1.0);
        assert_close(blue.h, 2.0 / 3.0);
    }

    #[test]
    fn test_achromatic_has_no_hue() {
        let gray = rgb_to_hsl(0.4, 0.4, 0.4);
        assert_eq!(gray.h, 0.0);
        assert_eq!(gray.s, 0.0);
        assert_close(gray.l, 0.4);
        assert_eq!(hsl_to_rgb(gray), (0.4, 0.4, 0.4));
    }

    #[test]
    fn test_roundtrip_leafy_green() {
        let (r, g, b) = (0.35, 0.62, 0.21);
        let (r2, g2, b2) = hsl_to_rgb(rgb_to_hsl(r, g, b));
        assert_close(r, r2);
        assert_close(g, g2);
        assert_close(b, b2);
    }
}
