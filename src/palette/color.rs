use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An opaque 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Parse a CSS functional color such as `rgb(12, 34, 56)`
    pub fn from_css_rgb(css: &str) -> Option<Self> {
        let inner = css
            .trim()
            .strip_prefix("rgb(")?
            .strip_suffix(')')?;

        let mut parts = inner.split(',').map(|part| part.trim().parse::<u8>().ok());
        let color = Self::new(parts.next()??, parts.next()??, parts.next()??);
        if parts.next().is_some() {
            return None;
        }
        Some(color)
    }

    /// Format as lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Format as `rgb(r,g,b)`
    pub fn to_css_rgb(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }

    /// Shift every channel by `percent` of full scale, clamped to 0-255
    ///
    /// Positive values lighten, negative values darken. Halves round toward
    /// positive infinity, so -10% of full scale is -25, not -26.
    pub fn adjust_brightness(&self, percent: f64) -> Self {
        let amount = (2.55 * percent + 0.5).floor() as i32;
        let shift = |channel: u8| (channel as i32 + amount).clamp(0, 255) as u8;
        Self::new(shift(self.r), shift(self.g), shift(self.b))
    }

    pub fn to_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css_rgb())
    }
}

impl FromStr for Rgb8 {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
            .or_else(|| Self::from_css_rgb(s))
            .ok_or_else(|| format!("not a color: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let amber = Rgb8::from_hex("#F9A825").unwrap();
        assert_eq!(amber, Rgb8::new(0xf9, 0xa8, 0x25));
        assert_eq!(amber.to_hex(), "#f9a825");
        assert!(Rgb8::from_hex("#F9A8").is_none());
        assert!(Rgb8::from_hex("#GGGGGG").is_none());
    }

    #[test]
    fn test_css_rgb_parsing() {
        assert_eq!("rgb(240, 0, 16)".parse::<Rgb8>(), Ok(Rgb8::new(240, 0, 16)));
        assert!(Rgb8::from_css_rgb("rgb(1,2)").is_none());
        assert!(Rgb8::from_css_rgb("rgb(1,2,3,4)").is_none());
        assert_eq!(Rgb8::new(1, 2, 3).to_string(), "rgb(1,2,3)");
    }

    #[test]
    fn test_adjust_brightness_clamps() {
        let color = Rgb8::new(10, 128, 250);
        // -20% of 255 = -51
        assert_eq!(color.adjust_brightness(-20.0), Rgb8::new(0, 77, 199));
        // 10% of 255 = 25.5, rounds to 26
        assert_eq!(color.adjust_brightness(10.0), Rgb8::new(36, 154, 255));
    }

    #[test]
    fn test_adjust_brightness_negative_halves_round_up() {
        let gray = Rgb8::new(100, 100, 100);
        // -25.5 -> -25
        assert_eq!(gray.adjust_brightness(-10.0), Rgb8::new(75, 75, 75));
        // -76.5 -> -76
        assert_eq!(gray.adjust_brightness(-30.0), Rgb8::new(24, 24, 24));
    }
}
