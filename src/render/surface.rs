use anyhow::{Context, Result};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

/// Card width in device pixels (85.6 mm at 300 DPI).
pub const CARD_WIDTH: u32 = 1011;
/// Card height in device pixels (54 mm at 300 DPI).
pub const CARD_HEIGHT: u32 = 638;
/// Print bleed, about 3 mm at 300 DPI. Also the content origin offset.
pub const BLEED: i32 = 35;
/// Safe margin inside the trim line.
pub const SAFE: i32 = 24;

/// One fixed-size card face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// Fully transparent surface of card size.
    pub fn new() -> Self {
        Self {
            image: RgbaImage::from_pixel(CARD_WIDTH, CARD_HEIGHT, Rgba([0, 0, 0, 0])),
        }
    }

    pub fn clear(&mut self) {
        for px in self.image.pixels_mut() {
            *px = Rgba([0, 0, 0, 0]);
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    /// Encode as PNG with fixed settings so identical pixels give identical bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let encoder =
            PngEncoder::new_with_quality(&mut bytes, CompressionType::Default, FilterType::Adaptive);
        encoder
            .write_image(
                self.image.as_raw(),
                self.image.width(),
                self.image.height(),
                ExtendedColorType::Rgba8,
            )
            .context("failed to encode card face as PNG")?;
        Ok(bytes)
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_has_card_dimensions() {
        let surface = Surface::new();
        assert_eq!(surface.image().dimensions(), (1011, 638));
    }

    #[test]
    fn png_round_trips_pixels() {
        let mut surface = Surface::new();
        surface.image_mut().put_pixel(3, 4, Rgba([10, 20, 30, 255]));
        let png = surface.to_png().unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(3, 4), &Rgba([10, 20, 30, 255]));
        assert_eq!(png, surface.to_png().unwrap());
    }
}
