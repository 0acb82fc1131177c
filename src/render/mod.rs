//! Raster composition of card faces.

pub mod assets;
pub mod background;
pub mod draw;
pub mod glyphs;
pub mod paint;
pub mod pattern;
pub mod surface;
pub mod text;

pub use assets::{Asset, AssetSet};
pub use background::paint_background;
pub use paint::{CardRenderer, RenderError, RenderedCard};
pub use pattern::{Mark, paint_pattern, pattern_marks};
pub use surface::{BLEED, CARD_HEIGHT, CARD_WIDTH, SAFE, Surface};
pub use text::{TextStyle, title_case, wrap};
