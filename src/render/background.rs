use image::imageops::{FilterType, crop_imm, overlay, resize};
use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::core::color::{color_or, rgba, with_alpha};
use crate::core::profile::{BackgroundMode, CardProfile};
use crate::render::assets::Asset;
use crate::render::draw::fill;
use crate::render::pattern::paint_pattern;

const FALLBACK_BG: Rgba<u8> = Rgba([0x11, 0x18, 0x27, 0xff]);
const FALLBACK_PRIMARY: Rgba<u8> = Rgba([0x0f, 0x17, 0x2a, 0xff]);
const UPLOAD_TINT_ALPHA: f32 = 0.25;

/// Overwrite every pixel of `image` with the profile's background.
///
/// `upload` without a decoded image paints the pattern instead.
pub fn paint_background(image: &mut RgbaImage, profile: &CardProfile, upload: &Asset) {
    let base = color_or(&profile.solid_bg, FALLBACK_BG);
    // every mode fully replaces prior content
    fill_opaque(image, rgba(0, 0, 0, 0xff));
    match (profile.bg_mode, upload.image()) {
        (BackgroundMode::Solid, _) => fill(image, base),
        (BackgroundMode::Upload, Some(source)) => {
            paint_cover(image, source);
            let primary = color_or(&profile.primary_color, FALLBACK_PRIMARY);
            fill(image, with_alpha(primary, UPLOAD_TINT_ALPHA));
        }
        (BackgroundMode::Upload, None) => {
            debug!("no background image, painting pattern instead");
            paint_pattern(image, profile.pattern, base);
        }
        (BackgroundMode::Pattern, _) => paint_pattern(image, profile.pattern, base),
    }
}

fn fill_opaque(image: &mut RgbaImage, color: Rgba<u8>) {
    for px in image.pixels_mut() {
        *px = color;
    }
}

/// Cover fit: scale by the larger axis ratio, center, crop to the canvas.
pub fn cover_fit(source: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (sw, sh) = (source.width() as f32, source.height() as f32);
    let ratio = (width as f32 / sw).max(height as f32 / sh);
    let scaled_w = ((sw * ratio).round() as u32).max(width);
    let scaled_h = ((sh * ratio).round() as u32).max(height);
    let scaled = resize(source, scaled_w, scaled_h, FilterType::Triangle);
    let x = (scaled_w - width) / 2;
    let y = (scaled_h - height) / 2;
    crop_imm(&scaled, x, y, width, height).to_image()
}

fn paint_cover(image: &mut RgbaImage, source: &RgbaImage) {
    let fitted = cover_fit(source, image.width(), image.height());
    overlay(image, &fitted, 0, 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profile::PatternVariant;
    use crate::render::surface::{CARD_HEIGHT, CARD_WIDTH};

    fn canvas() -> RgbaImage {
        RgbaImage::from_pixel(CARD_WIDTH, CARD_HEIGHT, Rgba([200, 0, 0, 255]))
    }

    #[test]
    fn upload_without_image_matches_pattern() {
        for variant in [PatternVariant::Grid, PatternVariant::Wave] {
            let pattern = CardProfile {
                bg_mode: BackgroundMode::Pattern,
                pattern: variant,
                ..CardProfile::default()
            };
            let upload = CardProfile {
                bg_mode: BackgroundMode::Upload,
                ..pattern.clone()
            };
            let missing = Asset::Unavailable("not configured".to_string());

            let mut a = canvas();
            let mut b = canvas();
            paint_background(&mut a, &pattern, &missing);
            paint_background(&mut b, &upload, &missing);
            assert!(a == b);
        }
    }

    #[test]
    fn solid_fills_every_pixel() {
        let profile = CardProfile {
            bg_mode: BackgroundMode::Solid,
            solid_bg: "#336699".to_string(),
            ..CardProfile::default()
        };
        let mut img = canvas();
        paint_background(&mut img, &profile, &Asset::Unavailable(String::new()));
        assert!(img.pixels().all(|p| *p == Rgba([0x33, 0x66, 0x99, 0xff])));
    }

    #[test]
    fn upload_is_cover_fitted_and_tinted() {
        let profile = CardProfile {
            bg_mode: BackgroundMode::Upload,
            primary_color: "#000000".to_string(),
            ..CardProfile::default()
        };
        let source = RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255]));
        let mut img = canvas();
        paint_background(&mut img, &profile, &Asset::Ready(source));
        // white under a 25% black tint
        let px = img.get_pixel(500, 300);
        assert!(px[0] > 180 && px[0] < 200, "{px:?}");
        assert_eq!(px[0], px[1]);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn cover_fit_crops_the_long_axis() {
        let mut source = RgbaImage::from_pixel(300, 100, Rgba([0, 0, 255, 255]));
        for y in 0..100 {
            for x in 0..50 {
                source.put_pixel(x, y, Rgba([255, 0, 0, 255]));
            }
        }
        let fitted = cover_fit(&source, 100, 100);
        assert_eq!(fitted.dimensions(), (100, 100));
        // the red strip on the far left is cropped away
        assert_eq!(fitted.get_pixel(0, 50)[2], 255);
    }
}
