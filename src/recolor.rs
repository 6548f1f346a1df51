use image::{ImageBuffer, Rgba, RgbaImage};

use crate::color::{Color, VISIBILITY_THRESHOLD, average_color};

/// Recolor a template toward `target`, keeping its shading.
///
/// Every visible pixel takes the target hue scaled by the pixel's brightness
/// relative to the template's mean brightness. Pixels below the visibility
/// threshold are copied byte-for-byte.
pub fn recolor(template: &RgbaImage, target: Color) -> RgbaImage {
    let template_brightness = average_color(template).brightness();

    ImageBuffer::from_fn(template.width(), template.height(), |x, y| {
        let pixel = *template.get_pixel(x, y);
        let [r, g, b, alpha] = pixel.0;

        if alpha < VISIBILITY_THRESHOLD {
            return pixel;
        }

        // An all-black template has nothing to scale against.
        let factor = if template_brightness > 0.0 {
            crate::color::brightness(r, g, b) / template_brightness
        } else {
            1.0
        };

        Rgba([
            scale(target.r, factor),
            scale(target.g, factor),
            scale(target.b, factor),
            alpha,
        ])
    })
}

fn scale(channel: u8, factor: f32) -> u8 {
    (f32::from(channel) * factor).trunc().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_visible_pixel_takes_target_exactly() {
        let mut template = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        template.put_pixel(0, 0, Rgba([200, 100, 50, 255]));
        template.put_pixel(1, 1, Rgba([9, 8, 7, 0]));

        let out = recolor(&template, Color::rgb(0, 255, 0));

        assert_eq!(out.dimensions(), (2, 2));
        assert_eq!(out.get_pixel(0, 0), &Rgba([0, 255, 0, 255]));
        assert_eq!(out.get_pixel(1, 0), &Rgba([0, 0, 0, 0]));
        assert_eq!(out.get_pixel(0, 1), &Rgba([0, 0, 0, 0]));
        assert_eq!(out.get_pixel(1, 1), &Rgba([9, 8, 7, 0]));
    }

    #[test]
    fn transparent_pixels_pass_through() {
        let mut template = RgbaImage::new(3, 1);
        template.put_pixel(0, 0, Rgba([120, 120, 120, 255]));
        template.put_pixel(1, 0, Rgba([33, 44, 55, 127]));
        template.put_pixel(2, 0, Rgba([1, 2, 3, 0]));

        let out = recolor(&template, Color::rgb(250, 10, 10));

        assert_eq!(out.get_pixel(1, 0), template.get_pixel(1, 0));
        assert_eq!(out.get_pixel(2, 0), template.get_pixel(2, 0));
    }

    #[test]
    fn shading_is_preserved_relative_to_mean() {
        // Mean brightness 100; the dark pixel is half, the bright one 1.5x.
        let mut template = RgbaImage::new(2, 1);
        template.put_pixel(0, 0, Rgba([50, 50, 50, 255]));
        template.put_pixel(1, 0, Rgba([150, 150, 150, 200]));

        let out = recolor(&template, Color::rgb(100, 60, 20));

        assert_eq!(out.get_pixel(0, 0), &Rgba([50, 30, 10, 255]));
        assert_eq!(out.get_pixel(1, 0), &Rgba([150, 90, 30, 200]));
    }

    #[test]
    fn bright_pixels_clamp_at_255() {
        let mut template = RgbaImage::new(2, 1);
        template.put_pixel(0, 0, Rgba([10, 10, 10, 255]));
        template.put_pixel(1, 0, Rgba([250, 250, 250, 255]));

        let out = recolor(&template, Color::rgb(255, 255, 128));

        // Factor is 250 / 130; blue lands at 246.15 and truncates.
        assert_eq!(out.get_pixel(1, 0), &Rgba([255, 255, 246, 255]));
        assert_eq!(out.get_pixel(0, 0), &Rgba([19, 19, 9, 255]));
    }

    #[test]
    fn black_template_uses_target_as_is() {
        let mut template = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        template.put_pixel(1, 1, Rgba([5, 5, 5, 10]));

        let out = recolor(&template, Color::rgb(12, 200, 77));

        assert_eq!(out.get_pixel(0, 0), &Rgba([12, 200, 77, 255]));
        assert_eq!(out.get_pixel(1, 0), &Rgba([12, 200, 77, 255]));
        assert_eq!(out.get_pixel(1, 1), &Rgba([5, 5, 5, 10]));
    }

    #[test]
    fn dimensions_are_kept() {
        for (w, h) in [(0, 0), (1, 7), (16, 16), (5, 3)] {
            let template = RgbaImage::from_pixel(w, h, Rgba([80, 90, 100, 255]));
            assert_eq!(recolor(&template, Color::rgb(1, 2, 3)).dimensions(), (w, h));
        }
    }
}
