//! Core domain primitives: card profile, colors, identifiers and barcodes.

pub mod barcode;
pub mod color;
pub mod profile;
pub mod sequence;

pub use barcode::{BarcodeEncoder, BarcodeError, Code128Encoder};
pub use color::{ColorError, parse_hex_color};
pub use profile::{BackgroundMode, CardProfile, PREFS_KEY, PatternVariant, ProfileStore};
pub use sequence::{IdentifierError, IdentifierSequencer, check_identifier, preview_id};
