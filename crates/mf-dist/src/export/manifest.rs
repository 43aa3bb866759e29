//! `index.json` and `events.json`

use std::path::Path;

use mf_event::EventManager;

use crate::engine::Distribution;
use crate::error::{ExportError, ExportResult};

use super::{books_file_name, io_error, lookup_table_file_name};

/// Render the index manifest.
///
/// Fixed two-space layout with `cost` always carrying one decimal, so the
/// downstream loader sees identical bytes for identical mode sets.
/// A negative or non-finite cost is an [`ExportError::InvalidCost`].
pub fn render_index(distribution: &Distribution) -> ExportResult<String> {
    let mut entries = Vec::with_capacity(distribution.mode_count());
    for mode in distribution.modes() {
        let name = mode.name();
        let cost = mode.cost();
        if !cost.is_finite() || cost < 0.0 {
            log::error!("Mode '{}' has invalid cost {}", name, cost);
            return Err(ExportError::InvalidCost {
                mode: name.to_string(),
                cost,
            });
        }
        entries.push(format!(
            "    {{\n      \"name\": {},\n      \"cost\": {:.1},\n      \"events\": {},\n      \"weights\": {}\n    }}",
            serde_json::to_string(name)?,
            cost,
            serde_json::to_string(&books_file_name(name))?,
            serde_json::to_string(&lookup_table_file_name(name))?,
        ));
    }
    Ok(format!("{{\n  \"modes\": [\n{}\n  ]\n}}\n", entries.join(",\n")))
}

/// Write every event (active or not) as a JSON array
pub fn write_events_manifest(path: &Path, events: &EventManager) -> ExportResult<()> {
    let json = events.to_json()?;
    std::fs::write(path, json).map_err(|e| io_error(path, e))?;
    log::debug!("Wrote {} event(s) to {:?}", events.len(), path);
    Ok(())
}
