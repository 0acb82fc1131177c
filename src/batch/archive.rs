use std::collections::HashSet;
use std::io::{Cursor, Write};

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::core::sequence::check_identifier;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive already contains an entry named '{0}'")]
    Duplicate(String),
    #[error("'{0}' is not a plain file name")]
    UnsafeName(String),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Named blob waiting to be packaged.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// In-memory collection of named blobs, finalized into one ZIP container.
/// Entries keep insertion order.
#[derive(Debug, Default)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
    names: HashSet<String>,
}

pub fn front_name(identifier: &str) -> String {
    format!("{identifier}_front.png")
}

pub fn back_name(identifier: &str) -> String {
    format!("{identifier}_back.png")
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn add(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> Result<(), ArchiveError> {
        let name = name.into();
        if check_identifier(&name).is_err() {
            return Err(ArchiveError::UnsafeName(name));
        }
        if self.names.contains(&name) {
            return Err(ArchiveError::Duplicate(name));
        }
        self.names.insert(name.clone());
        self.entries.push(ArchiveEntry { name, bytes });
        Ok(())
    }

    /// Add both faces of a card. Nothing is added if either name is taken or unsafe.
    pub fn add_card(&mut self, identifier: &str, front: Vec<u8>, back: Vec<u8>) -> Result<(), ArchiveError> {
        let (front_name, back_name) = (front_name(identifier), back_name(identifier));
        for name in [&front_name, &back_name] {
            if check_identifier(name).is_err() {
                return Err(ArchiveError::UnsafeName(name.clone()));
            }
            if self.names.contains(name) {
                return Err(ArchiveError::Duplicate(name.clone()));
            }
        }
        self.add(front_name, front)?;
        self.add(back_name, back)
    }

    /// Write every entry into a ZIP container with fixed timestamps.
    pub fn finalize(self) -> Result<Vec<u8>, ArchiveError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());
        for entry in self.entries {
            writer.start_file(entry.name, options)?;
            writer.write_all(&entry.bytes)?;
        }
        Ok(writer.finish()?.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn finalized_zip_keeps_order_and_contents() {
        let mut archive = Archive::new();
        archive.add_card("MH000001", b"front-1".to_vec(), b"back-1".to_vec()).unwrap();
        archive.add_card("X1", b"front-2".to_vec(), b"back-2".to_vec()).unwrap();
        let bytes = archive.finalize().unwrap();

        let mut zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(
            names,
            ["MH000001_front.png", "MH000001_back.png", "X1_front.png", "X1_back.png"]
        );
        let mut content = String::new();
        zip.by_name("X1_back.png").unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "back-2");
    }

    #[test]
    fn duplicate_card_is_rejected_without_partial_insert() {
        let mut archive = Archive::new();
        archive.add("X1_back.png", vec![1]).unwrap();
        let err = archive.add_card("X1", vec![2], vec![3]).unwrap_err();
        assert!(matches!(err, ArchiveError::Duplicate(name) if name == "X1_back.png"));
        assert_eq!(archive.len(), 1);
        assert!(!archive.contains("X1_front.png"));
    }

    #[test]
    fn traversal_names_never_reach_the_zip() {
        let mut archive = Archive::new();
        let err = archive.add_card("../../tmp/pwned", vec![1], vec![2]).unwrap_err();
        assert!(matches!(err, ArchiveError::UnsafeName(_)));
        assert!(matches!(
            archive.add("/etc/cron.d/x_front.png", vec![1]),
            Err(ArchiveError::UnsafeName(_))
        ));
        assert!(archive.is_empty());
    }

    #[test]
    fn empty_archive_is_still_a_valid_zip() {
        let archive = Archive::new();
        assert!(archive.is_empty());
        let bytes = archive.finalize().unwrap();
        let zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(zip.len(), 0);
    }
}
