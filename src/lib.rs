//! Membership card rendering and batch production.

pub mod batch;
pub mod core;
pub mod render;

pub use batch::{
    Archive, ArchiveError, BatchError, BatchOutput, BatchPipeline, BatchReport, Row, run_batch,
    sha256_hex,
};
pub use crate::core::{
    BackgroundMode, BarcodeEncoder, BarcodeError, CardProfile, Code128Encoder, ColorError,
    IdentifierError, IdentifierSequencer, PREFS_KEY, PatternVariant, ProfileStore,
    check_identifier, preview_id,
};
pub use render::{CardRenderer, RenderError, RenderedCard, Surface};

use anyhow::Result;

/// Render both faces of a single card for `profile`, loading its images.
pub fn render_single(profile: &CardProfile) -> Result<RenderedCard> {
    let renderer = CardRenderer::for_profile(profile);
    Ok(renderer.render_card(profile)?)
}
