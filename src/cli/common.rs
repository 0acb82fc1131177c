//! Shared clap helper types for CLI commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use cardforge::{BackgroundMode, CardProfile, PatternVariant, ProfileStore};
use clap::{Args, ValueEnum};
use tracing::debug;

use crate::cli::utils::default_profile_path;

/// Background modes accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum BackgroundModeArg {
    Solid,
    Pattern,
    Upload,
}

impl From<BackgroundModeArg> for BackgroundMode {
    fn from(value: BackgroundModeArg) -> BackgroundMode {
        match value {
            BackgroundModeArg::Solid => BackgroundMode::Solid,
            BackgroundModeArg::Pattern => BackgroundMode::Pattern,
            BackgroundModeArg::Upload => BackgroundMode::Upload,
        }
    }
}

/// Pattern variants accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum PatternArg {
    Grid,
    Dots,
    Wave,
    Rings,
}

impl From<PatternArg> for PatternVariant {
    fn from(value: PatternArg) -> PatternVariant {
        match value {
            PatternArg::Grid => PatternVariant::Grid,
            PatternArg::Dots => PatternVariant::Dots,
            PatternArg::Wave => PatternVariant::Wave,
            PatternArg::Rings => PatternVariant::Rings,
        }
    }
}

/// Where the style profile comes from, plus one-off overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    /// Saved profile (defaults to ./cardforge_prefs_v1.json; built-in defaults if absent).
    #[arg(long)]
    pub profile: Option<PathBuf>,
    #[arg(long)]
    pub brand_name: Option<String>,
    #[arg(long)]
    pub tagline: Option<String>,
    /// Primary brand color, e.g. #0f172a.
    #[arg(long)]
    pub primary_color: Option<String>,
    #[arg(long)]
    pub accent_color: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long = "bg-mode", value_enum)]
    pub bg_mode: Option<BackgroundModeArg>,
    #[arg(long, value_enum)]
    pub pattern: Option<PatternArg>,
    /// Background color for solid and pattern modes.
    #[arg(long)]
    pub solid_bg: Option<String>,
    /// Background image; implies `--bg-mode upload`.
    #[arg(long)]
    pub bg_image: Option<PathBuf>,
    /// Full logo lockup, drawn as a watermark on the front.
    #[arg(long)]
    pub logo_full: Option<PathBuf>,
    /// Logo mark, drawn top-right on the front and in the contact panel.
    #[arg(long)]
    pub logo_mark: Option<PathBuf>,
    #[arg(long)]
    pub id_prefix: Option<String>,
    #[arg(long)]
    pub start_num: Option<u64>,
}

impl ProfileArgs {
    /// Load the saved profile (or defaults) and apply command-line overrides.
    pub fn resolve(&self) -> Result<CardProfile> {
        let path = self.profile.clone().unwrap_or_else(default_profile_path);
        let store = ProfileStore::new(&path);
        let mut profile = store.load_or_default()?;
        debug!(path = %path.display(), "profile resolved");

        let text_overrides = [
            (&self.brand_name, &mut profile.brand_name),
            (&self.tagline, &mut profile.brand_tag),
            (&self.primary_color, &mut profile.primary_color),
            (&self.accent_color, &mut profile.accent_color),
            (&self.phone, &mut profile.phone),
            (&self.website, &mut profile.website),
            (&self.solid_bg, &mut profile.solid_bg),
            (&self.id_prefix, &mut profile.id_prefix),
        ];
        for (value, field) in text_overrides {
            if let Some(value) = value {
                *field = value.clone();
            }
        }
        if let Some(mode) = self.bg_mode {
            profile.bg_mode = mode.into();
        }
        if let Some(pattern) = self.pattern {
            profile.pattern = pattern.into();
        }
        if let Some(path) = &self.bg_image {
            profile.bg_upload = Some(path.clone());
            if self.bg_mode.is_none() {
                profile.bg_mode = BackgroundMode::Upload;
            }
        }
        if let Some(path) = &self.logo_full {
            profile.logo_full = Some(path.clone());
        }
        if let Some(path) = &self.logo_mark {
            profile.logo_mark = Some(path.clone());
        }
        if let Some(start) = self.start_num {
            profile.start_num = start;
        }

        profile
            .validate()
            .with_context(|| format!("invalid profile {}", path.display()))?;
        Ok(profile)
    }
}
