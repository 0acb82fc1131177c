//! Stand-alone barcode output (`cardforge barcode`).

use std::io::Cursor;
use std::path::PathBuf;

use anyhow::{Context, Result};
use cardforge::{BarcodeEncoder, Code128Encoder};
use clap::Args;
use image::ImageFormat;

use crate::cli::utils::write_bytes;

/// Arguments for `cardforge barcode`.
#[derive(Args, Debug)]
pub struct BarcodeArgs {
    /// Value to encode (printable ASCII).
    pub value: String,
    /// PNG destination.
    #[arg(short, long, default_value = "barcode.png")]
    pub output: PathBuf,
    #[arg(long, default_value_t = 420)]
    pub width: u32,
    #[arg(long, default_value_t = 68)]
    pub height: u32,
}

pub fn handle(args: BarcodeArgs) -> Result<()> {
    let encoder = Code128Encoder::new();
    let raster = encoder
        .render(&args.value, args.width, args.height)
        .with_context(|| format!("cannot encode {:?} as {}", args.value, encoder.name()))?;

    let mut bytes = Vec::new();
    raster
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .context("failed to encode PNG")?;
    write_bytes(&args.output, &bytes)?;
    println!(
        "{} {}x{} -> {}",
        encoder.name(),
        args.width,
        args.height,
        args.output.display()
    );
    Ok(())
}
