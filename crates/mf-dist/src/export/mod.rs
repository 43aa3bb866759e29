//! Export pipeline: lookup tables, compressed books and manifests
//!
//! Layout under the output directory:
//!
//! ```text
//! <dir>/
//! ├── lookUpTable_<mode>.csv     id,weight,payoutMultiplier (no header)
//! ├── books_<mode>.jsonl.zst     one JSON object per round, zstd block
//! ├── events.json                every configured event (optional)
//! └── index.json                 mode manifest, written last
//! ```
//!
//! The directory must already exist. The index is rendered before anything is
//! written, so an invalid mode cost leaves the directory untouched. Any write
//! failure aborts the remaining steps, so a present `index.json` means every
//! mode artifact was written.

mod books;
mod lookup;
mod manifest;

use std::path::{Path, PathBuf};

use serde::Serialize;

use mf_event::EventManager;

use crate::engine::Distribution;
use crate::error::{ExportError, ExportResult};

pub use books::{encode_books, read_books, write_books};
pub use lookup::{encode_lookup_table, write_lookup_table};
pub use manifest::{render_index, write_events_manifest};

pub const INDEX_FILE: &str = "index.json";
pub const EVENTS_FILE: &str = "events.json";

/// zstd level used for books
pub const BOOKS_COMPRESSION_LEVEL: i32 = 3;

pub fn lookup_table_file_name(mode: &str) -> String {
    format!("lookUpTable_{mode}.csv")
}

pub fn books_file_name(mode: &str) -> String {
    format!("books_{mode}.jsonl.zst")
}

/// Files written for one mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeArtifacts {
    pub mode: String,
    pub lookup_table: PathBuf,
    pub books: PathBuf,
    pub simulations: usize,
}

/// Everything a successful export wrote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub modes: Vec<ModeArtifacts>,
    pub events: Option<PathBuf>,
    pub index: PathBuf,
}

impl ExportReport {
    /// All written paths in write order
    pub fn files(&self) -> Vec<&Path> {
        let mut files: Vec<&Path> = self
            .modes
            .iter()
            .flat_map(|m| [m.lookup_table.as_path(), m.books.as_path()])
            .collect();
        if let Some(events) = &self.events {
            files.push(events);
        }
        files.push(&self.index);
        files
    }
}

/// Export every mode of `distribution` into `dir`.
///
/// Order: per mode CSV then books, then `events.json` when `events` is
/// given, then `index.json`.
pub fn export_all(
    distribution: &Distribution,
    events: Option<&EventManager>,
    dir: &Path,
) -> ExportResult<ExportReport> {
    let mut report = ExportReport::default();
    let index = render_index(distribution)?;

    for mode in distribution.modes() {
        let simulations = mode.simulations();

        let lookup_table = dir.join(lookup_table_file_name(mode.name()));
        write_lookup_table(&lookup_table, simulations)?;

        let books = dir.join(books_file_name(mode.name()));
        write_books(&books, simulations)?;

        log::debug!(
            "Exported mode '{}' ({} rounds) to {:?}",
            mode.name(),
            simulations.len(),
            dir
        );
        report.modes.push(ModeArtifacts {
            mode: mode.name().to_string(),
            lookup_table,
            books,
            simulations: simulations.len(),
        });
    }

    if let Some(events) = events {
        let path = dir.join(EVENTS_FILE);
        write_events_manifest(&path, events)?;
        report.events = Some(path);
    }

    report.index = dir.join(INDEX_FILE);
    std::fs::write(&report.index, index).map_err(|e| io_error(&report.index, e))?;

    log::info!(
        "Exported {} mode(s) to {:?}",
        report.modes.len(),
        dir
    );
    Ok(report)
}

pub(crate) fn io_error(path: &Path, source: std::io::Error) -> ExportError {
    log::error!("Cannot write {:?}: {}", path, source);
    ExportError::Io {
        path: path.to_path_buf(),
        source,
    }
}
