//! Bitmap text measurement, drawing and greedy word wrap.

use image::{GrayImage, Luma, Pixel, Rgba, RgbaImage};

use crate::render::glyphs::{GLYPH_HEIGHT, GLYPH_WIDTH, glyph_pattern};

/// Horizontal advance per character, in font units (glyph plus one column of spacing).
const ADVANCE: u32 = GLYPH_WIDTH as u32 + 1;

/// Size and weight for bitmap text. `scale` is the pixel size of one font unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub scale: u32,
    pub bold: bool,
}

impl TextStyle {
    pub const fn regular(scale: u32) -> Self {
        Self { scale, bold: false }
    }

    pub const fn bold(scale: u32) -> Self {
        Self { scale, bold: true }
    }

    fn embolden(&self) -> u32 {
        if self.bold { (self.scale / 3).max(1) } else { 0 }
    }

    /// Rendered width of `text` in pixels.
    pub fn measure(&self, text: &str) -> u32 {
        let count = text.chars().count() as u32;
        if count == 0 {
            return 0;
        }
        (count * ADVANCE - 1) * self.scale + self.embolden()
    }

    pub fn height(&self) -> u32 {
        GLYPH_HEIGHT as u32 * self.scale
    }

    /// Coverage mask for `text`: 255 where ink lands, 0 elsewhere.
    pub fn rasterize(&self, text: &str) -> GrayImage {
        let mut mask = GrayImage::new(self.measure(text).max(1), self.height().max(1));
        let block = self.scale + self.embolden();
        for (idx, ch) in text.chars().enumerate() {
            let origin_x = idx as u32 * ADVANCE * self.scale;
            for (row, bits) in glyph_pattern(ch).iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                        continue;
                    }
                    let px = origin_x + col as u32 * self.scale;
                    let py = row as u32 * self.scale;
                    for dy in 0..self.scale {
                        for dx in 0..block {
                            let (x, y) = (px + dx, py + dy);
                            if x < mask.width() && y < mask.height() {
                                mask.put_pixel(x, y, Luma([255]));
                            }
                        }
                    }
                }
            }
        }
        mask
    }
}

/// Draw `text` with its top-left corner at (`x`, `y`), alpha-blending `color`.
pub fn draw_text(image: &mut RgbaImage, x: i32, y: i32, text: &str, style: TextStyle, color: Rgba<u8>) {
    if text.is_empty() {
        return;
    }
    let mask = style.rasterize(text);
    let (width, height) = (image.width() as i32, image.height() as i32);
    for (mx, my, coverage) in mask.enumerate_pixels() {
        if coverage[0] == 0 {
            continue;
        }
        let (px, py) = (x + mx as i32, y + my as i32);
        if px < 0 || py < 0 || px >= width || py >= height {
            continue;
        }
        image.get_pixel_mut(px as u32, py as u32).blend(&color);
    }
}

/// Greedy word wrap.
///
/// Words are separated by single spaces; runs of spaces produce empty words
/// and are kept, so joining the lines with `" "` gives back `text`. Words are
/// appended while the measured line, including the next word, stays within
/// `max_width`. A word wider than `max_width` gets a line of its own and is
/// never split. Blank text yields no lines.
pub fn wrap<F>(text: &str, max_width: u32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> u32,
{
    if text.trim().is_empty() {
        return Vec::new();
    }
    let mut words = text.split(' ');
    let mut line = words.next().unwrap_or_default().to_string();
    let mut lines = Vec::new();
    for word in words {
        let candidate = format!("{line} {word}");
        if line.is_empty() || measure(&candidate) <= max_width {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }
    lines.push(line);
    lines
}

/// Uppercase the first alphanumeric character of every word and lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut seen_start = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            seen_start = false;
            out.push(ch);
        } else if !seen_start && ch.is_alphanumeric() {
            seen_start = true;
            out.extend(ch.to_uppercase());
        } else if seen_start {
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Largest scale up to `preferred` at which `text` fits in `max_width`, never below `min`.
pub fn fit_scale(text: &str, max_width: u32, preferred: TextStyle, min: u32) -> TextStyle {
    let mut style = preferred;
    while style.scale > min && style.measure(text) > max_width {
        style.scale -= 1;
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn char_width(s: &str) -> u32 {
        s.chars().count() as u32
    }

    #[test]
    fn wrap_keeps_lines_within_width() {
        let text = "the quick brown fox jumps over the lazy dog again and again";
        let lines = wrap(text, 12, char_width);
        for line in &lines {
            assert!(char_width(line) <= 12, "{line:?} too wide");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn wrap_places_oversized_word_alone() {
        let lines = wrap("a supercalifragilistic b", 5, char_width);
        assert_eq!(lines, ["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn wrap_preserves_runs_of_spaces_and_tabs() {
        let text = "a  b\tc   d";
        assert_eq!(wrap(text, 100, char_width).join(" "), text);
        let narrow = wrap(text, 3, char_width);
        assert_eq!(narrow.join(" "), text);
        assert!(narrow.iter().all(|l| char_width(l) <= 3));
    }

    #[test]
    fn wrap_of_blank_text_is_empty() {
        assert!(wrap("   ", 10, char_width).is_empty());
    }

    #[test]
    fn wrap_with_bitmap_measure() {
        let style = TextStyle::regular(2);
        let text = "This card can't be transferred or redeemed for cash or re-sale";
        let lines = wrap(text, 240, |s| style.measure(s));
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| style.measure(l) <= 240));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn measure_matches_rasterized_width() {
        let style = TextStyle::bold(3);
        let mask = style.rasterize("MH000001");
        assert_eq!(mask.width(), style.measure("MH000001"));
        assert_eq!(mask.height(), 21);
        assert_eq!(TextStyle::regular(1).measure(""), 0);
        assert_eq!(TextStyle::regular(1).measure("ab"), 11);
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("jane DOE-smith"), "Jane Doe-smith");
        assert_eq!(title_case("THE BRAND NAME"), "The Brand Name");
        assert_eq!(title_case("  (ann) o'neil"), "  (Ann) O'neil");
    }

    #[test]
    fn fit_scale_shrinks_long_text() {
        let preferred = TextStyle::regular(5);
        assert_eq!(fit_scale("Ada", 552, preferred, 2).scale, 5);
        let long = "Bartholomew Maximilian Fitzgerald";
        let fitted = fit_scale(long, 552, preferred, 2);
        assert!(fitted.scale < 5);
        assert!(fitted.measure(long) <= 552 || fitted.scale == 2);
    }

    #[test]
    fn draw_text_blends_inside_bounds_only() {
        let mut img = RgbaImage::from_pixel(20, 10, Rgba([0, 0, 0, 255]));
        draw_text(&mut img, -3, 2, "I", TextStyle::regular(1), Rgba([255, 255, 255, 255]));
        draw_text(&mut img, 1, 2, "I", TextStyle::regular(1), Rgba([255, 255, 255, 255]));
        // top bar of 'I' spans columns 1..=3 of the glyph
        assert_eq!(img.get_pixel(2, 2), &Rgba([255, 255, 255, 255]));
        assert_eq!(img.get_pixel(1, 2), &Rgba([0, 0, 0, 255]));
    }
}
