//! Batch production: one card per input row, packaged into a ZIP archive.
//!
//! Rows are processed strictly in input order. Each row renders into fresh
//! surfaces from the shared base profile with only the member name and
//! identifier overridden. Problems with a single row are logged, recorded in
//! the [`BatchReport`] and skipped; only an unreadable input table or a
//! failure to package the archive aborts the run.

mod archive;
mod report;

use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::barcode::{BarcodeEncoder, Code128Encoder};
use crate::core::profile::CardProfile;
use crate::core::sequence::{IdentifierSequencer, check_identifier};
use crate::render::paint::CardRenderer;

pub use archive::{Archive, ArchiveEntry, ArchiveError, back_name, front_name};
pub use report::{BatchReport, CardEntry, RowFailure, sha256_hex};

const NAME_COLUMN: &str = "name";

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to read input table: {0}")]
    Read(#[from] csv::Error),
    #[error("no rows found")]
    NoRows,
    #[error("input table has no '{0}' column")]
    MissingColumn(&'static str),
    #[error("failed to package archive: {0}")]
    Archive(#[from] ArchiveError),
}

/// One input record. Unknown columns are ignored.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Row {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub member_id: Option<String>,
}

impl Row {
    /// Trimmed name, `None` when blank or missing.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Trimmed explicit identifier, `None` when blank or missing.
    pub fn member_id(&self) -> Option<&str> {
        self.member_id.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Finished ZIP bytes and the run summary.
#[derive(Debug)]
pub struct BatchOutput {
    pub archive: Vec<u8>,
    pub report: BatchReport,
}

/// Replays the single-card renderer once per row.
#[derive(Debug)]
pub struct BatchPipeline<E = Code128Encoder> {
    base: CardProfile,
    renderer: CardRenderer<E>,
}

impl BatchPipeline<Code128Encoder> {
    /// Pipeline for `base`, loading its images once for the whole run.
    pub fn new(base: CardProfile) -> Self {
        let renderer = CardRenderer::for_profile(&base);
        Self { base, renderer }
    }
}

impl<E: BarcodeEncoder> BatchPipeline<E> {
    pub fn with_renderer(base: CardProfile, renderer: CardRenderer<E>) -> Self {
        Self { base, renderer }
    }

    /// Render every valid row of the CSV in `input` and package the archive.
    pub fn run<R: Read>(&self, input: R) -> Result<BatchOutput, BatchError> {
        let mut report = BatchReport::start();
        let records = read_rows(input)?;
        if records.is_empty() {
            return Err(BatchError::NoRows);
        }
        report.rows_read = records.len();
        info!(rows = records.len(), "rendering cards");

        let mut sequencer = IdentifierSequencer::new(&self.base);
        let mut archive = Archive::new();

        for (idx, record) in records.into_iter().enumerate() {
            let row_no = idx + 1;
            let row = match record {
                Ok(row) => row,
                Err(err) => {
                    warn!(row = row_no, error = %err, "unreadable record skipped");
                    report.skipped += 1;
                    continue;
                }
            };
            let Some(name) = row.name() else {
                debug!(row = row_no, "blank name, row skipped");
                report.skipped += 1;
                continue;
            };

            let identifier = match sequencer.next(row.member_id()) {
                Ok(identifier) => identifier,
                Err(err) => {
                    warn!(row = row_no, error = %err, "no identifier for row");
                    report.fail(row_no, None, err.to_string());
                    continue;
                }
            };
            if let Err(err) = check_identifier(&identifier) {
                warn!(row = row_no, %identifier, "unsafe identifier, row skipped");
                report.fail(row_no, Some(identifier), err.to_string());
                continue;
            }
            if archive.contains(&front_name(&identifier)) || archive.contains(&back_name(&identifier)) {
                warn!(row = row_no, %identifier, "duplicate identifier, row skipped");
                report.fail(row_no, Some(identifier), "duplicate identifier");
                continue;
            }

            match self.render_row(row_no, name, &identifier, &mut archive) {
                Ok(entry) => {
                    debug!(row = row_no, %identifier, "card rendered");
                    report.cards.push(entry);
                }
                Err(reason) => {
                    warn!(row = row_no, %identifier, %reason, "row failed");
                    report.fail(row_no, Some(identifier), reason);
                }
            }
        }

        if archive.is_empty() {
            warn!("no cards produced, archive will be empty");
        }
        info!(entries = archive.len(), "packaging archive");
        let bytes = archive.finalize()?;
        report.finish();
        info!(
            produced = report.produced(),
            skipped = report.skipped,
            failed = report.failures.len(),
            "batch complete"
        );
        Ok(BatchOutput {
            archive: bytes,
            report,
        })
    }

    fn render_row(
        &self,
        row: usize,
        name: &str,
        identifier: &str,
        archive: &mut Archive,
    ) -> Result<CardEntry, String> {
        let profile = self.base.for_member(name, identifier);
        let card = self.renderer.render_card(&profile).map_err(|e| e.to_string())?;
        let front = card.front.to_png().map_err(|e| format!("{e:#}"))?;
        let back = card.back.to_png().map_err(|e| format!("{e:#}"))?;
        let entry = CardEntry {
            row,
            identifier: identifier.to_string(),
            front: front_name(identifier),
            back: back_name(identifier),
            front_sha256: sha256_hex(&front),
            back_sha256: sha256_hex(&back),
        };
        archive
            .add_card(identifier, front, back)
            .map_err(|e| e.to_string())?;
        Ok(entry)
    }
}

/// Convenience wrapper: build a pipeline for `base` and run it over `input`.
pub fn run_batch<R: Read>(input: R, base: &CardProfile) -> Result<BatchOutput, BatchError> {
    BatchPipeline::new(base.clone()).run(input)
}

/// Parse the header and every record. Per-record parse errors are kept in place.
fn read_rows<R: Read>(input: R) -> Result<Vec<Result<Row, csv::Error>>, BatchError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input);

    let headers: StringRecord = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_ascii_lowercase())
        .collect();
    if headers.iter().all(str::is_empty) {
        return Err(BatchError::NoRows);
    }
    if !headers.iter().any(|h| h == NAME_COLUMN) {
        return Err(BatchError::MissingColumn(NAME_COLUMN));
    }
    reader.set_headers(headers);

    Ok(reader.deserialize::<Row>().collect())
}
