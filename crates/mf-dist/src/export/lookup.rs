//! Lookup table CSV: `id,weight,payoutMultiplier`, one row per round

use std::fmt::Write;
use std::path::Path;

use crate::error::ExportResult;
use crate::mode::Simulation;

use super::io_error;

/// Render the table in memory
pub fn encode_lookup_table(simulations: &[Simulation]) -> String {
    let mut out = String::with_capacity(simulations.len() * 12);
    for sim in simulations {
        // Writing to a String cannot fail
        let _ = writeln!(out, "{},{},{}", sim.id, sim.weight, sim.payout_multiplier);
    }
    out
}

pub fn write_lookup_table(path: &Path, simulations: &[Simulation]) -> ExportResult<()> {
    std::fs::write(path, encode_lookup_table(simulations)).map_err(|e| io_error(path, e))
}
