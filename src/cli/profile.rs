//! Saved style profile management (`cardforge profile ...`).

use std::path::PathBuf;

use anyhow::{Result, bail};
use cardforge::{CardProfile, ProfileStore};
use clap::{Args, Subcommand};

use crate::cli::utils::default_profile_path;

/// Subcommands under `cardforge profile`.
#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Write the built-in defaults to a profile file.
    Init(InitArgs),
    /// Print the effective profile as JSON.
    Show(LocationArgs),
    /// Delete the saved profile.
    Clear(LocationArgs),
}

#[derive(Args, Debug)]
pub struct LocationArgs {
    /// Profile file (defaults to ./cardforge_prefs_v1.json).
    #[arg(long)]
    pub profile: Option<PathBuf>,
}

impl LocationArgs {
    fn store(&self) -> ProfileStore {
        ProfileStore::new(self.profile.clone().unwrap_or_else(default_profile_path))
    }
}

#[derive(Args, Debug)]
pub struct InitArgs {
    #[command(flatten)]
    pub location: LocationArgs,
    /// Overwrite an existing profile.
    #[arg(long)]
    pub force: bool,
}

pub fn handle(command: ProfileCommand) -> Result<()> {
    match command {
        ProfileCommand::Init(args) => init(args),
        ProfileCommand::Show(args) => show(args),
        ProfileCommand::Clear(args) => clear(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    let store = args.location.store();
    if store.path().exists() && !args.force {
        bail!(
            "profile {} already exists (use --force to overwrite)",
            store.path().display()
        );
    }
    store.save(&CardProfile::default())?;
    println!("Profile written to {}", store.path().display());
    Ok(())
}

fn show(args: LocationArgs) -> Result<()> {
    let store = args.store();
    let profile = match store.load()? {
        Some(profile) => profile,
        None => {
            eprintln!("No saved profile at {}; showing defaults.", store.path().display());
            CardProfile::default()
        }
    };
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

fn clear(args: LocationArgs) -> Result<()> {
    let store = args.store();
    if store.clear()? {
        println!("Removed {}", store.path().display());
    } else {
        println!("Nothing to remove at {}", store.path().display());
    }
    Ok(())
}
