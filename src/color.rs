//! Color sampling for ingot and template textures.

use std::fmt;

use image::RgbaImage;

use crate::error::ColorError;

/// Pixels with alpha below this are treated as invisible: they never count
/// toward an average and are copied through untouched when recoloring.
pub const VISIBILITY_THRESHOLD: u8 = 128;

/// Opaque mid-gray used when no visible pixel is available.
pub const DEFAULT_COLOR: Color = Color::rgb(170, 170, 170);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert a hex string like "#RRGGBB" or "RRGGBB" into an opaque color
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.trim_start_matches('#');

        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorError::Length(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>, channel: &'static str| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorError::Channel {
                channel,
                hex: hex.to_string(),
            })
        };

        Ok(Self::rgb(
            channel(0..2, "red")?,
            channel(2..4, "green")?,
            channel(4..6, "blue")?,
        ))
    }

    /// Linear brightness of the color channels.
    pub fn brightness(&self) -> f32 {
        brightness(self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Plain mean of the three channels; no perceptual weighting.
pub fn brightness(r: u8, g: u8, b: u8) -> f32 {
    (u16::from(r) + u16::from(g) + u16::from(b)) as f32 / 3.0
}

/// Mean RGB over every pixel whose alpha reaches [`VISIBILITY_THRESHOLD`].
///
/// Falls back to [`DEFAULT_COLOR`] for zero-area or fully transparent images.
/// The mean is truncated per channel and the result is always opaque.
pub fn average_color(image: &RgbaImage) -> Color {
    let (mut total_r, mut total_g, mut total_b, mut count) = (0u64, 0u64, 0u64, 0u64);

    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        if a < VISIBILITY_THRESHOLD {
            continue;
        }

        total_r += u64::from(r);
        total_g += u64::from(g);
        total_b += u64::from(b);
        count += 1;
    }

    if count == 0 {
        return DEFAULT_COLOR;
    }

    // Each mean is bounded by 255, so the narrowing is lossless.
    Color::rgb(
        (total_r / count) as u8,
        (total_g / count) as u8,
        (total_b / count) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn fully_transparent_image_gives_default() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([10, 200, 30, 127]));
        assert_eq!(average_color(&img), DEFAULT_COLOR);
    }

    #[test]
    fn zero_area_image_gives_default() {
        let img = RgbaImage::new(0, 0);
        assert_eq!(average_color(&img), DEFAULT_COLOR);
    }

    #[test]
    fn single_opaque_pixel_is_returned_exactly() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([12, 34, 56, 255]));
        assert_eq!(average_color(&img), Color::rgb(12, 34, 56));
    }

    #[test]
    fn uniform_color_survives_transparent_neighbours() {
        let mut img = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 0]));
        img.put_pixel(0, 0, Rgba([90, 80, 70, 255]));
        img.put_pixel(2, 2, Rgba([90, 80, 70, 200]));
        assert_eq!(average_color(&img), Color::rgb(90, 80, 70));
    }

    #[test]
    fn only_visible_pixels_count_and_mean_truncates() {
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(0, 0, Rgba([10, 0, 255, 255]));
        img.put_pixel(1, 0, Rgba([11, 3, 0, 128]));
        // Just under the threshold: ignored even though it is bright.
        img.put_pixel(2, 0, Rgba([255, 255, 255, 127]));
        assert_eq!(average_color(&img), Color::rgb(10, 1, 127));
    }

    #[test]
    fn sampled_colors_are_opaque() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 130]));
        assert_eq!(average_color(&img).a, 255);
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(Color::from_hex("#AAAAAA"), Ok(DEFAULT_COLOR));
        assert_eq!(Color::from_hex("00ff7f"), Ok(Color::rgb(0, 255, 127)));
        assert!(matches!(Color::from_hex("#fff"), Err(ColorError::Length(_))));
        assert!(matches!(
            Color::from_hex("#gg0000"),
            Err(ColorError::Channel { channel: "red", .. })
        ));
    }

    #[test]
    fn display_is_lower_hex() {
        assert_eq!(Color::rgb(200, 100, 50).to_string(), "#c86432");
    }
}
