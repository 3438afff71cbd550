//! Kawaii plant portrait: a fixed 200x200 SVG template recolored from a photo's palette.

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::palette::{DominantColorExtractor, Rgb8};
use crate::source::ImageSource;

/// Fill colors for every part of the portrait template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KawaiiPalette {
    pub background: Rgb8,
    pub pot: Rgb8,
    pub pot_dark: Rgb8,
    pub stem: Rgb8,
    pub leaves: Rgb8,
    pub leaf_border: Rgb8,
    pub face: Rgb8,
    pub face_detail: Rgb8,
    pub blush: Rgb8,
    pub accent1: Rgb8,
    pub accent2: Rgb8,
}

impl Default for KawaiiPalette {
    fn default() -> Self {
        Self {
            background: Rgb8::new(0xf5, 0xf5, 0xf5),
            pot: Rgb8::new(0xf9, 0xa8, 0x25),
            pot_dark: Rgb8::new(0xf5, 0x7f, 0x17),
            stem: Rgb8::new(0x8d, 0xc2, 0x6f),
            leaves: Rgb8::new(0xa5, 0xd6, 0xa7),
            leaf_border: Rgb8::new(0x8d, 0xc2, 0x6f),
            face: Rgb8::new(0xc5, 0xe1, 0xa5),
            face_detail: Rgb8::new(0x51, 0x36, 0x14),
            blush: Rgb8::new(0xf8, 0xbb, 0xd0),
            accent1: Rgb8::new(0x95, 0x75, 0xcd),
            accent2: Rgb8::new(0xf9, 0xa8, 0x25),
        }
    }
}

impl KawaiiPalette {
    /// Map dominant colors (most frequent first) onto the template
    ///
    /// Colors 0-4 become the pot, stem, leaves and the two accents. Darker and lighter
    /// tones are derived from them; missing colors keep the default tone. Background,
    /// face details and blush always stay at their defaults.
    pub fn from_dominant(colors: &[Rgb8]) -> Self {
        let defaults = Self::default();
        let pick = |index: usize, fallback: Rgb8| colors.get(index).copied().unwrap_or(fallback);

        let pot = pick(0, defaults.pot);
        let leaves = pick(2, defaults.leaves);

        Self {
            pot,
            pot_dark: pick(0, defaults.pot_dark).adjust_brightness(-20.0),
            stem: pick(1, defaults.stem),
            leaves,
            leaf_border: pick(2, defaults.leaf_border).adjust_brightness(-10.0),
            face: pick(2, defaults.face).adjust_brightness(10.0),
            accent1: pick(3, defaults.accent1),
            accent2: pick(4, defaults.accent2),
            ..defaults
        }
    }
}

/// Render the portrait template with the given palette
pub fn render_kawaii_svg(palette: &KawaiiPalette) -> String {
    let background = palette.background.to_hex();
    let pot = palette.pot.to_hex();
    let pot_dark = palette.pot_dark.to_hex();
    let stem = palette.stem.to_hex();
    let leaves = palette.leaves.to_hex();
    let leaf_border = palette.leaf_border.to_hex();
    let face = palette.face.to_hex();
    let detail = palette.face_detail.to_hex();
    let blush = palette.blush.to_hex();
    let accent1 = palette.accent1.to_hex();
    let accent2 = palette.accent2.to_hex();

    let leaf = |path: &str| {
        format!(
            r#"  <path d="{path}" fill="{leaves}" stroke="{leaf_border}" stroke-width="2" />"#
        )
    };

    let eye = |dx: i32| {
        format!(
            r#"    <g transform="translate({dx} -3)">
      <ellipse cx="0" cy="0" rx="3" ry="4" fill="{detail}" />
      <circle cx="-1" cy="-1" r="1" fill="white" />
    </g>"#
        )
    };

    let lines = [
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 200">"#.to_string(),
        format!(r#"  <circle cx="100" cy="100" r="95" fill="{background}" />"#),
        // Pot with a face
        format!(
            r#"  <path d="M60 150 Q80 140 100 140 Q120 140 140 150 L140 150 Q140 160 140 170 Q120 180 80 180 Q60 180 60 170 Z" fill="{pot}" />"#
        ),
        format!(r#"  <ellipse cx="100" cy="180" rx="40" ry="10" fill="{pot_dark}" />"#),
        format!(r#"  <circle cx="90" cy="160" r="3" fill="{detail}" />"#),
        format!(r#"  <circle cx="110" cy="160" r="3" fill="{detail}" />"#),
        format!(
            r#"  <path d="M95 170 Q100 173 105 170" fill="none" stroke="{detail}" stroke-width="2" stroke-linecap="round" />"#
        ),
        // Stem and leaves
        format!(
            r#"  <path d="M100 140 C105 120 95 110 100 90 C105 70 95 60 100 40" stroke="{stem}" stroke-width="5" stroke-linecap="round" fill="none" />"#
        ),
        leaf("M100 90 C110 85 120 90 125 80 C120 70 110 75 100 70"),
        leaf("M100 90 C90 85 80 90 75 80 C80 70 90 75 100 70"),
        leaf("M100 110 C110 115 120 110 125 120 C120 130 110 125 100 130"),
        leaf("M100 110 C90 115 80 110 75 120 C80 130 90 125 100 130"),
        // Head
        format!(r#"  <circle cx="100" cy="50" r="15" fill="{face}" />"#),
        r#"  <g transform="translate(100 50)">"#.to_string(),
        eye(-7),
        eye(7),
        format!(r#"    <circle cx="-9" cy="3" r="2.5" fill="{blush}" opacity="0.7" />"#),
        format!(r#"    <circle cx="9" cy="3" r="2.5" fill="{blush}" opacity="0.7" />"#),
        format!(
            r#"    <path d="M-5 5 Q0 8 5 5" fill="none" stroke="{detail}" stroke-width="2" stroke-linecap="round" />"#
        ),
        "  </g>".to_string(),
        // Decorative dots
        format!(r#"  <circle cx="70" cy="100" r="3" fill="{accent1}" opacity="0.7" />"#),
        format!(r#"  <circle cx="130" cy="100" r="3" fill="{accent1}" opacity="0.7" />"#),
        format!(r#"  <circle cx="80" cy="60" r="2" fill="{accent2}" opacity="0.7" />"#),
        format!(r#"  <circle cx="120" cy="60" r="2" fill="{accent2}" opacity="0.7" />"#),
        "</svg>".to_string(),
    ];

    let mut svg = lines.join("\n");
    svg.push('\n');
    svg
}

/// Wrap SVG markup in a base64 `data:` URL
pub fn svg_data_url(svg: &str) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        general_purpose::STANDARD.encode(svg.as_bytes())
    )
}

/// Render a portrait themed on the photo's dominant colors
///
/// If the photo cannot be loaded the default palette is used instead.
pub async fn thematic_portrait(extractor: &DominantColorExtractor, source: &ImageSource) -> String {
    let palette = match extractor.extract(source).await {
        Ok(colors) => KawaiiPalette::from_dominant(&colors),
        Err(e) => {
            warn!("Falling back to default portrait colors for {}: {}", source.describe(), e);
            KawaiiPalette::default()
        }
    };

    render_kawaii_svg(&palette)
}
