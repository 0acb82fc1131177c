//! Optional image assets (background upload, logos).
//!
//! A missing or undecodable file is not an error: it resolves to
//! [`Asset::Unavailable`] and the element that needs it is left out.

use std::fs;
use std::path::Path;

use image::RgbaImage;
use tracing::{debug, warn};

use crate::core::profile::CardProfile;

/// Upper bound on the size of any single asset file.
pub const MAX_ASSET_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asset {
    Ready(RgbaImage),
    Unavailable(String),
}

impl Asset {
    /// Read and decode `path`. `None` means the profile did not set this asset.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Asset::Unavailable("not configured".to_string());
        };
        match decode(path) {
            Ok(image) => {
                debug!(path = %path.display(), width = image.width(), height = image.height(), "asset loaded");
                Asset::Ready(image)
            }
            Err(reason) => {
                warn!(path = %path.display(), %reason, "asset unavailable, element omitted");
                Asset::Unavailable(reason)
            }
        }
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        match self {
            Asset::Ready(image) => Some(image),
            Asset::Unavailable(_) => None,
        }
    }
}

fn decode(path: &Path) -> Result<RgbaImage, String> {
    let meta = fs::metadata(path).map_err(|err| err.to_string())?;
    if meta.len() > MAX_ASSET_BYTES {
        return Err(format!(
            "file is {} bytes, limit is {}",
            meta.len(),
            MAX_ASSET_BYTES
        ));
    }
    let bytes = fs::read(path).map_err(|err| err.to_string())?;
    let image = image::load_from_memory(&bytes).map_err(|err| err.to_string())?;
    if image.width() == 0 || image.height() == 0 {
        return Err("image has no pixels".to_string());
    }
    Ok(image.to_rgba8())
}

/// Every external image a card may draw, resolved once per profile.
#[derive(Debug, Clone)]
pub struct AssetSet {
    pub background: Asset,
    pub logo_full: Asset,
    pub logo_mark: Asset,
}

impl AssetSet {
    pub fn load(profile: &CardProfile) -> Self {
        Self {
            background: Asset::load(profile.bg_upload.as_deref()),
            logo_full: Asset::load(profile.logo_full.as_deref()),
            logo_mark: Asset::load(profile.logo_mark.as_deref()),
        }
    }

    pub fn empty() -> Self {
        let none = || Asset::Unavailable("not configured".to_string());
        Self {
            background: none(),
            logo_full: none(),
            logo_mark: none(),
        }
    }
}
