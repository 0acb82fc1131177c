//! Command-line interface wiring for the `cardforge` binary.
//!
//! This module owns the clap definitions and delegates execution to
//! specialized submodules that encapsulate each command family.

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub mod barcode;
pub mod batch;
pub mod common;
pub mod profile;
pub mod render;
pub mod utils;

/// Parsed CLI entrypoint for the `cardforge` binary.
#[derive(Parser, Debug)]
#[command(name = "cardforge", version, about = "Membership card renderer")]
pub struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Top-level command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// High-level command families made available to end users.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the front and back of a single card.
    Render(render::RenderArgs),
    /// Render one card per CSV row into a ZIP archive.
    Batch(batch::BatchArgs),
    #[command(subcommand)]
    Profile(profile::ProfileCommand),
    /// Render only the barcode for a value.
    Barcode(barcode::BarcodeArgs),
}

/// Install the stderr log subscriber.
pub fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render(args) => render::handle(args),
        Command::Batch(args) => batch::handle(args),
        Command::Profile(cmd) => profile::handle(cmd),
        Command::Barcode(args) => barcode::handle(args),
    }
}
