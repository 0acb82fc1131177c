//! Alpha-blended drawing helpers on top of `imageproc`.

use image::imageops::overlay;
use image::{Pixel, Rgba, RgbaImage};
use imageproc::drawing::{Blend, draw_filled_rect_mut};
use imageproc::rect::Rect;

/// Run `f` against a blending canvas over `image`.
pub fn with_blend<F>(image: &mut RgbaImage, f: F)
where
    F: FnOnce(&mut Blend<RgbaImage>),
{
    let mut canvas = Blend(std::mem::take(image));
    f(&mut canvas);
    *image = canvas.0;
}

pub fn fill(image: &mut RgbaImage, color: Rgba<u8>) {
    let (w, h) = image.dimensions();
    with_blend(image, |canvas| {
        draw_filled_rect_mut(canvas, Rect::at(0, 0).of_size(w, h), color);
    });
}

/// Fill a rectangle with quarter-circle corners of radius `r`.
pub fn fill_rounded_rect(
    image: &mut RgbaImage,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    r: u32,
    color: Rgba<u8>,
) {
    if width == 0 || height == 0 {
        return;
    }
    let r = r.min(width / 2).min(height / 2) as f32;
    with_blend(image, |canvas| {
        for row in 0..height {
            let cy = row as f32 + 0.5;
            let dy = if cy < r {
                r - cy
            } else if cy > height as f32 - r {
                cy - (height as f32 - r)
            } else {
                0.0
            };
            let inset = if dy > 0.0 {
                (r - (r * r - dy * dy).max(0.0).sqrt()).round() as u32
            } else {
                0
            };
            let span = width.saturating_sub(inset * 2);
            if span == 0 {
                continue;
            }
            draw_filled_rect_mut(
                canvas,
                Rect::at(x + inset as i32, y + row as i32).of_size(span, 1),
                color,
            );
        }
    });
}

/// Fill every pixel whose center lies within `radius` of (`cx`, `cy`).
pub fn fill_disc(image: &mut RgbaImage, cx: f32, cy: f32, radius: f32, color: Rgba<u8>) {
    let (w, h) = (image.width() as i32, image.height() as i32);
    let min_x = (cx - radius).floor() as i32;
    let max_x = (cx + radius).ceil() as i32;
    let min_y = (cy - radius).floor() as i32;
    let max_y = (cy + radius).ceil() as i32;
    for py in min_y.max(0)..=max_y.min(h - 1) {
        for px in min_x.max(0)..=max_x.min(w - 1) {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= radius * radius {
                image.get_pixel_mut(px as u32, py as u32).blend(&color);
            }
        }
    }
}

/// Diagonal linear gradient from `color` at the top-left corner to transparent
/// at the bottom-right, matching a canvas gradient from (0,0) to (w,h).
pub fn diagonal_fade(image: &mut RgbaImage, color: Rgba<u8>) {
    let (w, h) = (image.width() as f32, image.height() as f32);
    let norm = w * w + h * h;
    let base_alpha = f32::from(color[3]);
    for (x, y, px) in image.enumerate_pixels_mut() {
        let t = ((x as f32 + 0.5) * w + (y as f32 + 0.5) * h) / norm;
        let alpha = (base_alpha * (1.0 - t.clamp(0.0, 1.0))).round() as u8;
        if alpha == 0 {
            continue;
        }
        px.blend(&Rgba([color[0], color[1], color[2], alpha]));
    }
}

/// Composite `top` at (`x`, `y`) with its alpha scaled by `opacity`.
pub fn overlay_with_opacity(base: &mut RgbaImage, top: &RgbaImage, x: i64, y: i64, opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity >= 1.0 {
        overlay(base, top, x, y);
        return;
    }
    let mut faded = top.clone();
    for px in faded.pixels_mut() {
        px[3] = (f32::from(px[3]) * opacity).round() as u8;
    }
    overlay(base, &faded, x, y);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounded_rect_leaves_corners_untouched() {
        let mut img = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 0, 255]));
        fill_rounded_rect(&mut img, 0, 0, 40, 40, 10, Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(img.get_pixel(20, 20), &Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(20, 0), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn disc_is_symmetric() {
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        fill_disc(&mut img, 5.0, 5.0, 1.6, Rgba([255, 255, 255, 255]));
        let lit = |x: u32, y: u32| img.get_pixel(x, y)[0] == 255;
        assert_eq!(img.pixels().filter(|p| p[0] == 255).count(), 12);
        assert!(lit(3, 4) && lit(6, 5) && lit(4, 3) && lit(5, 6));
        assert!(!lit(3, 3) && !lit(6, 6));
    }

    #[test]
    fn fade_is_strongest_top_left() {
        let mut img = RgbaImage::from_pixel(100, 50, Rgba([255, 255, 255, 255]));
        diagonal_fade(&mut img, Rgba([0, 0, 0, 115]));
        assert!(img.get_pixel(0, 0)[0] < img.get_pixel(50, 25)[0]);
        assert!(img.get_pixel(99, 49)[0] >= 250);
    }
}
