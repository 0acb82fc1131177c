//! Convenience helpers shared across command handlers.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cardforge::PREFS_KEY;

/// Profile location used when `--profile` is not given.
pub fn default_profile_path() -> PathBuf {
    PathBuf::from(format!("{PREFS_KEY}.json"))
}

/// Open a file for reading, or stdin when the path is `-`.
pub fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(io::stdin()));
    }
    let file =
        fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(Box::new(file))
}

/// Write bytes to `path`, creating parent directories as needed.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory {}", parent.display())
            })?;
        }
    }
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}
