use image::Rgba;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid hex color '{0}' (expected #rgb or #rrggbb)")]
    InvalidHex(String),
}

/// Parse `#rgb` / `#rrggbb` (leading `#` optional) into an opaque RGBA color.
pub fn parse_hex_color(input: &str) -> Result<Rgba<u8>, ColorError> {
    let raw = input.trim().trim_start_matches('#');
    let invalid = || ColorError::InvalidHex(input.to_string());
    if !raw.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let value = u32::from_str_radix(raw, 16).map_err(|_| invalid())?;
    match raw.len() {
        3 => {
            let r = ((value >> 8) & 0xF) as u8 * 17;
            let g = ((value >> 4) & 0xF) as u8 * 17;
            let b = (value & 0xF) as u8 * 17;
            Ok(Rgba([r, g, b, 0xff]))
        }
        6 => Ok(Rgba([
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
            0xff,
        ])),
        _ => Err(invalid()),
    }
}

/// Parse a color, substituting `fallback` when the string is malformed.
pub fn color_or(input: &str, fallback: Rgba<u8>) -> Rgba<u8> {
    parse_hex_color(input).unwrap_or(fallback)
}

/// Replace the alpha channel with `alpha` in `0.0..=1.0`.
pub fn with_alpha(color: Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba([color[0], color[1], color[2], a])
}

pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Rgba<u8> {
    Rgba([r, g, b, a])
}
