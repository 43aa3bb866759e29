//! Books: newline-delimited JSON rounds compressed as one zstd block

use std::path::Path;

use serde::Serialize;

use crate::error::{ExportError, ExportResult};
use crate::mode::{BookEvent, Simulation};

use super::{BOOKS_COMPRESSION_LEVEL, io_error};

/// One line of the books file
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BookLine<'a> {
    id: u64,
    events: &'a [BookEvent],
    payout_multiplier: u64,
}

/// Uncompressed JSONL text, every line newline-terminated
pub fn encode_books(simulations: &[Simulation]) -> ExportResult<String> {
    let mut out = String::new();
    for sim in simulations {
        let line = BookLine {
            id: sim.id,
            events: &sim.events,
            payout_multiplier: sim.payout_multiplier,
        };
        out.push_str(&serde_json::to_string(&line)?);
        out.push('\n');
    }
    Ok(out)
}

pub fn write_books(path: &Path, simulations: &[Simulation]) -> ExportResult<()> {
    let text = encode_books(simulations)?;
    let compressed = zstd::bulk::compress(text.as_bytes(), BOOKS_COMPRESSION_LEVEL).map_err(|source| {
        log::error!("Compression failed for {:?}: {}", path, source);
        ExportError::Compression {
            path: path.to_path_buf(),
            source,
        }
    })?;
    std::fs::write(path, compressed).map_err(|e| io_error(path, e))
}

/// Decompress a books file back into its JSONL text
pub fn read_books(path: &Path) -> ExportResult<String> {
    let file = std::fs::File::open(path).map_err(|e| io_error(path, e))?;
    let bytes = zstd::decode_all(file).map_err(|source| ExportError::Compression {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|e| ExportError::Compression {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })
}
