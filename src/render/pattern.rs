//! Deterministic background tilings.
//!
//! Each variant is first expanded into a list of [`Mark`]s, a pure function of
//! the canvas size, and then painted over the base color.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_circle_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::core::color::with_alpha;
use crate::core::profile::PatternVariant;
use crate::render::draw::{fill, fill_disc, with_blend};

/// Tile pitch shared by grid, dots and rings.
pub const STEP: u32 = 20;

const INK: Rgba<u8> = Rgba([0, 0, 0, 0xff]);
const MARK_ALPHA: f32 = 0.18;
const RING_ALPHA: f32 = 0.16;
const WAVE_ALPHA: f32 = 0.12;
const DOT_RADIUS: f32 = 1.6;
const RING_RADIUS: i32 = 7;
const RING_OFFSET: i32 = 10;
const WAVE_ROW_SPACING: u32 = 18;
const WAVE_SAMPLE_STEP: u32 = 18;
const WAVE_PERIOD: f32 = 28.0;
const WAVE_AMPLITUDE: f32 = 6.0;

/// One drawing primitive of a pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    /// 1px full-height rule.
    VerticalRule { x: i32 },
    /// 1px full-width rule.
    HorizontalRule { y: i32 },
    Dot { cx: f32, cy: f32 },
    Ring { cx: i32, cy: i32 },
    /// 2px polyline through the listed points.
    Wave { points: Vec<(f32, f32)> },
}

/// Expand `variant` into marks covering a `width` x `height` canvas.
pub fn pattern_marks(variant: PatternVariant, width: u32, height: u32) -> Vec<Mark> {
    let mut marks = Vec::new();
    match variant {
        PatternVariant::Grid => {
            for x in (0..width).step_by(STEP as usize) {
                marks.push(Mark::VerticalRule { x: x as i32 });
            }
            for y in (0..height).step_by(STEP as usize) {
                marks.push(Mark::HorizontalRule { y: y as i32 });
            }
        }
        PatternVariant::Dots => {
            for y in (0..height).step_by(STEP as usize) {
                for x in (0..width).step_by(STEP as usize) {
                    marks.push(Mark::Dot {
                        cx: x as f32,
                        cy: y as f32,
                    });
                }
            }
        }
        PatternVariant::Wave => {
            for y in (0..height).step_by(WAVE_ROW_SPACING as usize) {
                let points = (0..=width)
                    .step_by(WAVE_SAMPLE_STEP as usize)
                    .map(|x| {
                        let x = x as f32;
                        (x, y as f32 + (x / WAVE_PERIOD).sin() * WAVE_AMPLITUDE)
                    })
                    .collect();
                marks.push(Mark::Wave { points });
            }
        }
        PatternVariant::Rings => {
            for y in (0..height).step_by(STEP as usize) {
                for x in (0..width).step_by(STEP as usize) {
                    marks.push(Mark::Ring {
                        cx: x as i32 + RING_OFFSET,
                        cy: y as i32 + RING_OFFSET,
                    });
                }
            }
        }
    }
    marks
}

/// Fill `image` with `base` and draw the chosen tiling over it.
pub fn paint_pattern(image: &mut RgbaImage, variant: PatternVariant, base: Rgba<u8>) {
    fill(image, base);
    let (width, height) = image.dimensions();
    let marks = pattern_marks(variant, width, height);
    let ink = with_alpha(INK, MARK_ALPHA);
    let ring_ink = with_alpha(INK, RING_ALPHA);
    let wave_ink = with_alpha(INK, WAVE_ALPHA);

    for mark in &marks {
        if let Mark::Dot { cx, cy } = mark {
            fill_disc(image, *cx, *cy, DOT_RADIUS, ink);
        }
    }
    with_blend(image, |canvas| {
        for mark in &marks {
            match mark {
                Mark::VerticalRule { x } => {
                    draw_filled_rect_mut(canvas, Rect::at(*x, 0).of_size(1, height), ink);
                }
                Mark::HorizontalRule { y } => {
                    draw_filled_rect_mut(canvas, Rect::at(0, *y).of_size(width, 1), ink);
                }
                Mark::Ring { cx, cy } => {
                    draw_hollow_circle_mut(canvas, (*cx, *cy), RING_RADIUS, ring_ink);
                }
                Mark::Wave { points } => {
                    for pair in points.windows(2) {
                        let (a, b) = (pair[0], pair[1]);
                        draw_line_segment_mut(canvas, a, b, wave_ink);
                        draw_line_segment_mut(canvas, (a.0, a.1 + 1.0), (b.0, b.1 + 1.0), wave_ink);
                    }
                }
                Mark::Dot { .. } => {}
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::{CARD_HEIGHT, CARD_WIDTH};

    fn count(marks: &[Mark], pred: fn(&Mark) -> bool) -> usize {
        marks.iter().filter(|m| pred(m)).count()
    }

    #[test]
    fn grid_rule_counts_follow_canvas_size() {
        let marks = pattern_marks(PatternVariant::Grid, CARD_WIDTH, CARD_HEIGHT);
        let vertical = count(&marks, |m| matches!(m, Mark::VerticalRule { .. }));
        let horizontal = count(&marks, |m| matches!(m, Mark::HorizontalRule { .. }));
        assert_eq!(vertical, CARD_WIDTH.div_ceil(STEP) as usize);
        assert_eq!(horizontal, CARD_HEIGHT.div_ceil(STEP) as usize);
        assert_eq!((vertical, horizontal), (51, 32));
    }

    #[test]
    fn grid_rules_are_visible_regardless_of_base_color() {
        for base in [Rgba([0x11, 0x18, 0x27, 0xff]), Rgba([0xf0, 0xe0, 0xd0, 0xff])] {
            let mut img = RgbaImage::new(CARD_WIDTH, CARD_HEIGHT);
            paint_pattern(&mut img, PatternVariant::Grid, base);
            let darker = (0..CARD_WIDTH)
                .filter(|x| img.get_pixel(*x, 1)[1] < base[1])
                .count();
            assert_eq!(darker, 51);
        }
    }

    #[test]
    fn rings_are_offset_into_each_cell() {
        let marks = pattern_marks(PatternVariant::Rings, 40, 40);
        assert_eq!(marks.len(), 4);
        assert_eq!(marks[0], Mark::Ring { cx: 10, cy: 10 });
        assert_eq!(marks[3], Mark::Ring { cx: 30, cy: 30 });
    }

    #[test]
    fn wave_rows_are_spaced_and_bounded() {
        let marks = pattern_marks(PatternVariant::Wave, 100, 40);
        assert_eq!(marks.len(), 3);
        for (row, mark) in marks.iter().enumerate() {
            let Mark::Wave { points } = mark else {
                panic!("expected wave");
            };
            let base = (row as u32 * WAVE_ROW_SPACING) as f32;
            assert!(points.iter().all(|(_, y)| (y - base).abs() <= WAVE_AMPLITUDE));
        }
    }

    #[test]
    fn painting_is_deterministic() {
        for variant in [
            PatternVariant::Grid,
            PatternVariant::Dots,
            PatternVariant::Wave,
            PatternVariant::Rings,
        ] {
            let base = Rgba([0x11, 0x18, 0x27, 0xff]);
            let mut a = RgbaImage::new(200, 120);
            let mut b = RgbaImage::new(200, 120);
            paint_pattern(&mut a, variant, base);
            paint_pattern(&mut b, variant, base);
            assert!(a == b, "{variant} differs between runs");
        }
    }
}
