use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::color::{ColorError, parse_hex_color};

/// Storage key written into every persisted snapshot.
pub const PREFS_KEY: &str = "cardforge_prefs_v1";

const DEFAULT_LEGAL: &str = "\u{2022} This card is not a credit card\n\
\u{2022} This card can't be transferred or redeemed for cash or re-sale\n\
\u{2022} The company is not responsible if the card is lost, stolen or damaged\n\
\u{2022} This card is subject to company regulations";

/// How the card background is painted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum BackgroundMode {
    Solid,
    #[default]
    Pattern,
    Upload,
}

impl From<String> for BackgroundMode {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "solid" => BackgroundMode::Solid,
            "upload" => BackgroundMode::Upload,
            _ => BackgroundMode::Pattern,
        }
    }
}

impl fmt::Display for BackgroundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundMode::Solid => write!(f, "solid"),
            BackgroundMode::Pattern => write!(f, "pattern"),
            BackgroundMode::Upload => write!(f, "upload"),
        }
    }
}

/// Procedural tiling used by [`BackgroundMode::Pattern`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum PatternVariant {
    Grid,
    Dots,
    Wave,
    #[default]
    Rings,
}

impl From<String> for PatternVariant {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "grid" => PatternVariant::Grid,
            "dots" => PatternVariant::Dots,
            "wave" => PatternVariant::Wave,
            _ => PatternVariant::Rings,
        }
    }
}

impl fmt::Display for PatternVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternVariant::Grid => write!(f, "grid"),
            PatternVariant::Dots => write!(f, "dots"),
            PatternVariant::Wave => write!(f, "wave"),
            PatternVariant::Rings => write!(f, "rings"),
        }
    }
}

/// Complete style and content configuration for one card.
///
/// Every field has a default, so snapshots written by older builds load by
/// merging onto [`CardProfile::default`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CardProfile {
    pub brand_name: String,
    pub brand_tag: String,
    pub primary_color: String,
    pub accent_color: String,
    pub phone: String,
    pub website: String,
    pub address: String,
    pub legal: String,
    pub bg_mode: BackgroundMode,
    pub pattern: PatternVariant,
    pub solid_bg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_upload: Option<PathBuf>,
    pub id_prefix: String,
    pub start_num: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_full: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_mark: Option<PathBuf>,
    pub member_name: String,
    pub member_id: String,
}

impl Default for CardProfile {
    fn default() -> Self {
        Self {
            brand_name: "THE BRAND NAME".to_string(),
            brand_tag: "PRIME MEMBERSHIP CARD".to_string(),
            primary_color: "#0f172a".to_string(),
            accent_color: "#38bdf8".to_string(),
            phone: "+91 9544319000".to_string(),
            website: "www.brandname.in".to_string(),
            address: "TC 30/104 (1) Kamaleswaram, Manacaud PO - 695009".to_string(),
            legal: DEFAULT_LEGAL.to_string(),
            bg_mode: BackgroundMode::Pattern,
            pattern: PatternVariant::Rings,
            solid_bg: "#111827".to_string(),
            bg_upload: None,
            id_prefix: "MH".to_string(),
            start_num: 1,
            logo_full: None,
            logo_mark: None,
            member_name: "Member Name".to_string(),
            member_id: String::new(),
        }
    }
}

impl CardProfile {
    /// Explicit member identifier, if one is set and non-blank.
    pub fn explicit_member_id(&self) -> Option<&str> {
        if self.member_id.trim().is_empty() {
            None
        } else {
            Some(self.member_id.as_str())
        }
    }

    /// Copy of this profile carrying a different member; every other field is shared.
    pub fn for_member(&self, name: &str, member_id: &str) -> Self {
        Self {
            member_name: name.to_string(),
            member_id: member_id.to_string(),
            ..self.clone()
        }
    }

    /// Check that every color field parses.
    pub fn validate(&self) -> Result<(), ColorError> {
        for value in [&self.primary_color, &self.accent_color, &self.solid_bg] {
            parse_hex_color(value)?;
        }
        Ok(())
    }
}

/// On-disk envelope for a saved profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Snapshot {
    key: String,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    profile: CardProfile,
}

/// File-backed persistence for a single [`CardProfile`].
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, profile: &CardProfile) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("failed to write profile {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        let snapshot = Snapshot {
            key: PREFS_KEY.to_string(),
            saved_at: Some(Utc::now()),
            profile: profile.clone(),
        };
        serde_json::to_writer_pretty(&mut writer, &snapshot)
            .context("failed to serialize profile")?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Load the saved profile; `None` when nothing was saved under [`PREFS_KEY`].
    pub fn load(&self) -> Result<Option<CardProfile>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = fs::File::open(&self.path)
            .with_context(|| format!("failed to open profile {}", self.path.display()))?;
        let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse profile {}", self.path.display()))?;
        if snapshot.key != PREFS_KEY {
            warn!(
                path = %self.path.display(),
                key = %snapshot.key,
                "ignoring profile saved under a different key"
            );
            return Ok(None);
        }
        Ok(Some(snapshot.profile))
    }

    /// Load the saved profile or fall back to defaults.
    pub fn load_or_default(&self) -> Result<CardProfile> {
        Ok(self.load()?.unwrap_or_default())
    }

    /// Remove the snapshot. Returns whether a file was deleted.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("failed to remove profile {}", self.path.display()))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_modes_fall_back_to_pattern_and_rings() {
        let profile: CardProfile =
            serde_json::from_str(r#"{"bg_mode": "hologram", "pattern": "zigzag"}"#).unwrap();
        assert_eq!(profile.bg_mode, BackgroundMode::Pattern);
        assert_eq!(profile.pattern, PatternVariant::Rings);
    }

    #[test]
    fn partial_snapshot_merges_onto_defaults() {
        let json = r#"{"key": "cardforge_prefs_v1", "profile": {"brand_name": "Bakehouse", "bg_mode": "solid"}}"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, json).unwrap();

        let loaded = ProfileStore::new(&path).load().unwrap().unwrap();
        let expected = CardProfile {
            brand_name: "Bakehouse".to_string(),
            bg_mode: BackgroundMode::Solid,
            ..CardProfile::default()
        };
        assert_eq!(loaded, expected);
    }

    #[test]
    fn save_load_clear_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("prefs.json"));
        assert_eq!(store.load().unwrap(), None);

        let profile = CardProfile {
            id_prefix: "ZZ".to_string(),
            start_num: 40,
            logo_mark: Some(PathBuf::from("mark.png")),
            ..CardProfile::default()
        };
        store.save(&profile).unwrap();
        assert_eq!(store.load().unwrap(), Some(profile));

        assert!(store.clear().unwrap());
        assert!(!store.clear().unwrap());
        assert_eq!(store.load_or_default().unwrap(), CardProfile::default());
    }

    #[test]
    fn foreign_key_is_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"key": "cardforge_prefs_v0", "profile": {}}"#).unwrap();
        assert_eq!(ProfileStore::new(&path).load().unwrap(), None);
    }

    #[test]
    fn member_override_keeps_shared_fields() {
        let base = CardProfile {
            brand_name: "Shared".to_string(),
            ..CardProfile::default()
        };
        let row = base.for_member("Ada", "X1");
        assert_eq!(row.brand_name, "Shared");
        assert_eq!(row.member_name, "Ada");
        assert_eq!(row.explicit_member_id(), Some("X1"));
        assert_eq!(base.for_member("Ada", "   ").explicit_member_id(), None);
    }

    #[test]
    fn validate_reports_bad_colors() {
        let profile = CardProfile {
            solid_bg: "nope".to_string(),
            ..CardProfile::default()
        };
        assert!(profile.validate().is_err());
        assert!(CardProfile::default().validate().is_ok());
    }
}
