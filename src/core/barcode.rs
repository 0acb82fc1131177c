use image::imageops::{FilterType, resize};
use image::{Rgba, RgbaImage};
use thiserror::Error;

/// Pixel width of a single module before the raster is scaled to its target box.
pub const MODULE_WIDTH: u32 = 2;

const START_B: usize = 104;
const STOP: usize = 106;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BarcodeError {
    #[error("cannot encode an empty value")]
    Empty,
    #[error("unsupported character: '{0}' (U+{1:04X})")]
    Unsupported(char, u32),
    #[error("invalid barcode size {0}x{1}")]
    InvalidSize(u32, u32),
}

/// Linear symbology that turns a string into a bar raster.
pub trait BarcodeEncoder {
    fn name(&self) -> &'static str;

    /// Module sequence, `true` for a bar. No quiet zone.
    fn modules(&self, value: &str) -> Result<Vec<bool>, BarcodeError>;

    /// Black-on-white raster scaled to `width` x `height`, without label or margin.
    fn render(&self, value: &str, width: u32, height: u32) -> Result<RgbaImage, BarcodeError> {
        if width == 0 || height == 0 {
            return Err(BarcodeError::InvalidSize(width, height));
        }
        let modules = self.modules(value)?;
        let native = modules_to_image(&modules, height);
        Ok(resize(&native, width, height, FilterType::Nearest))
    }
}

/// Draw modules at [`MODULE_WIDTH`] px each.
pub fn modules_to_image(modules: &[bool], height: u32) -> RgbaImage {
    let width = (modules.len() as u32 * MODULE_WIDTH).max(1);
    let white = Rgba([0xff, 0xff, 0xff, 0xff]);
    let black = Rgba([0x00, 0x00, 0x00, 0xff]);
    RgbaImage::from_fn(width, height.max(1), |x, _| {
        let idx = (x / MODULE_WIDTH) as usize;
        if modules.get(idx).copied().unwrap_or(false) {
            black
        } else {
            white
        }
    })
}

/// CODE128 using code set B, which covers printable ASCII.
///
/// Symbol layout: start B, one symbol per character, mod-103 checksum, stop.
#[derive(Debug, Default, Clone, Copy)]
pub struct Code128Encoder;

impl Code128Encoder {
    pub fn new() -> Self {
        Self
    }

    /// Symbol values (start, data, checksum, stop) for `value`.
    pub fn symbols(&self, value: &str) -> Result<Vec<usize>, BarcodeError> {
        if value.is_empty() {
            return Err(BarcodeError::Empty);
        }
        let mut symbols = Vec::with_capacity(value.len() + 3);
        symbols.push(START_B);
        for ch in value.chars() {
            symbols.push(set_b_value(ch)?);
        }
        let checksum = symbols
            .iter()
            .enumerate()
            .map(|(pos, sym)| if pos == 0 { *sym } else { pos * sym })
            .sum::<usize>()
            % 103;
        symbols.push(checksum);
        symbols.push(STOP);
        Ok(symbols)
    }
}

impl BarcodeEncoder for Code128Encoder {
    fn name(&self) -> &'static str {
        "CODE128"
    }

    fn modules(&self, value: &str) -> Result<Vec<bool>, BarcodeError> {
        let symbols = self.symbols(value)?;
        let mut out = Vec::with_capacity(symbols.len() * 11 + 2);
        for sym in symbols {
            let mut bar = true;
            for width in PATTERNS[sym].bytes() {
                for _ in 0..(width - b'0') {
                    out.push(bar);
                }
                bar = !bar;
            }
        }
        Ok(out)
    }
}

fn set_b_value(ch: char) -> Result<usize, BarcodeError> {
    let code = ch as u32;
    if (32..=127).contains(&code) {
        Ok((code - 32) as usize)
    } else {
        Err(BarcodeError::Unsupported(ch, code))
    }
}

/// Bar/space widths for symbol values 0..=106, starting with a bar.
#[rustfmt::skip]
const PATTERNS: [&str; 107] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312",
    "132212", "221213", "221312", "231212", "112232", "122132", "122231", "113222",
    "123122", "123221", "223211", "221132", "221231", "213212", "223112", "312131",
    "311222", "321122", "321221", "312212", "322112", "322211", "212123", "212321",
    "232121", "111323", "131123", "131321", "112313", "132113", "132311", "211313",
    "231113", "231311", "112133", "112331", "132131", "113123", "113321", "133121",
    "313121", "211331", "231131", "213113", "213311", "213131", "311123", "311321",
    "331121", "312113", "312311", "332111", "314111", "221411", "431111", "111224",
    "111422", "121124", "121421", "141122", "141221", "112214", "112412", "122114",
    "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111",
    "111242", "121142", "121241", "114212", "124112", "124211", "411212", "421112",
    "421211", "212141", "214121", "412121", "111143", "111341", "131141", "114113",
    "114311", "411113", "411311", "113141", "114131", "311141", "411131", "211412",
    "211214", "211232", "2331112",
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_symbol_spans_eleven_modules() {
        for (value, pattern) in PATTERNS.iter().enumerate() {
            let width: u32 = pattern.bytes().map(|b| u32::from(b - b'0')).sum();
            let expected = if value == STOP { 13 } else { 11 };
            assert_eq!(width, expected, "symbol {value}");
        }
    }

    #[test]
    fn checksum_follows_weighted_sum() {
        let enc = Code128Encoder::new();
        // 'A' = 33; (104 + 1 * 33) % 103 = 34
        assert_eq!(enc.symbols("A").unwrap(), vec![104, 33, 34, 106]);
        // "MH" = 45, 40; (104 + 45 + 80) % 103 = 23
        assert_eq!(enc.symbols("MH").unwrap(), vec![104, 45, 40, 23, 106]);
    }

    #[test]
    fn module_count_matches_symbol_count() {
        let enc = Code128Encoder::new();
        let modules = enc.modules("MH000001").unwrap();
        assert_eq!(modules.len(), 11 * (8 + 3) + 2);
        assert!(modules[0], "starts with a bar");
        assert!(modules[modules.len() - 1], "ends with the stop bar");
    }

    #[test]
    fn rejects_empty_and_non_ascii() {
        let enc = Code128Encoder::new();
        assert_eq!(enc.modules(""), Err(BarcodeError::Empty));
        assert_eq!(enc.modules("MH\u{e9}"), Err(BarcodeError::Unsupported('\u{e9}', 0xe9)));
    }

    #[test]
    fn render_scales_to_target_box() {
        let enc = Code128Encoder::new();
        let img = enc.render("MH000001", 420, 68).unwrap();
        assert_eq!(img.dimensions(), (420, 68));
        assert_eq!(img.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert!(matches!(
            enc.render("X", 0, 10),
            Err(BarcodeError::InvalidSize(0, 10))
        ));
    }
}
