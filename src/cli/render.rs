//! Single-card rendering (`cardforge render`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use cardforge::{CardRenderer, check_identifier, preview_id};
use clap::Args;
use tracing::info;

use crate::cli::common::ProfileArgs;
use crate::cli::utils::write_bytes;

/// Arguments for `cardforge render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,
    /// Member name printed on the front.
    #[arg(long)]
    pub name: Option<String>,
    /// Explicit identifier; otherwise the first sequenced id is previewed.
    #[arg(long = "member-id")]
    pub member_id: Option<String>,
    /// Directory receiving `<id>_front.png` and `<id>_back.png`.
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

pub fn handle(args: RenderArgs) -> Result<()> {
    let mut profile = args.profile.resolve()?;
    if let Some(name) = args.name {
        profile.member_name = name;
    }
    if let Some(id) = args.member_id {
        profile.member_id = id;
    }

    let identifier = preview_id(&profile);
    check_identifier(&identifier).context("refusing to write card files")?;

    let renderer = CardRenderer::for_profile(&profile);
    let card = renderer
        .render_card(&profile)
        .with_context(|| format!("failed to render card {identifier}"))?;

    let front_path = args.output.join(format!("{}_front.png", card.identifier));
    let back_path = args.output.join(format!("{}_back.png", card.identifier));
    write_bytes(&front_path, &card.front.to_png()?)?;
    write_bytes(&back_path, &card.back.to_png()?)?;
    info!(identifier = %card.identifier, "card rendered");

    println!("Card {}:", card.identifier);
    println!("  front -> {}", front_path.display());
    println!("  back  -> {}", back_path.display());
    Ok(())
}
