use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One card written to the archive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardEntry {
    /// 1-based data row (header excluded).
    pub row: usize,
    pub identifier: String,
    pub front: String,
    pub back: String,
    pub front_sha256: String,
    pub back_sha256: String,
}

/// A row that was valid but could not be turned into a card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowFailure {
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub reason: String,
}

/// Outcome of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub rows_read: usize,
    /// Rows without a name, or records the parser could not read.
    pub skipped: usize,
    pub cards: Vec<CardEntry>,
    pub failures: Vec<RowFailure>,
}

impl BatchReport {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            rows_read: 0,
            skipped: 0,
            cards: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Number of cards produced (two archive entries each).
    pub fn produced(&self) -> usize {
        self.cards.len()
    }

    pub fn fail<S: Into<String>>(&mut self, row: usize, identifier: Option<String>, reason: S) {
        self.failures.push(RowFailure {
            row,
            identifier,
            reason: reason.into(),
        });
    }
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn report_serializes_counts() {
        let mut report = BatchReport::start();
        report.rows_read = 2;
        report.fail(2, Some("X1".to_string()), "duplicate identifier");
        report.finish();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["rows_read"], 2);
        assert_eq!(json["failures"][0]["identifier"], "X1");
        assert!(json["finished_at"].is_string());
        assert_eq!(report.produced(), 0);
    }
}
