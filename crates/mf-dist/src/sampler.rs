//! Weighted sampler: roulette-wheel selection over a mode's multipliers
//!
//! One uniform integer roll in `[0, total_weight)` picks the first entry whose
//! cumulative weight exceeds the roll. Entry order is the tie-break order, so
//! the multiplier list must keep insertion order.

use rand::Rng;

use crate::error::{DistError, DistResult};
use crate::mode::{GameMode, MultiplierConfig, PAYOUT_SCALE};

/// Convert a payout ratio to hundredths, rounding to the nearest hundredth.
///
/// Negative and NaN ratios map to 0.
pub fn to_hundredths(multiplier: f64) -> u64 {
    (multiplier * PAYOUT_SCALE).round() as u64
}

/// Draw one payout (in hundredths) by walking the list.
///
/// Returns `None` when `total_weight` is 0.
pub fn pick_multiplier<R: Rng + ?Sized>(
    multipliers: &[MultiplierConfig],
    total_weight: u64,
    rng: &mut R,
) -> Option<u64> {
    if total_weight == 0 {
        return None;
    }
    let roll = rng.random_range(0..total_weight);
    let mut cumulative = 0u64;
    for config in multipliers {
        cumulative += config.weight;
        if roll < cumulative {
            return Some(to_hundredths(config.multiplier));
        }
    }
    None
}

/// Precomputed cumulative table for repeated draws from one mode.
///
/// Consumes exactly one roll per draw and selects the same entry as
/// [`pick_multiplier`] for every roll.
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    cumulative: Vec<u64>,
    payouts: Vec<u64>,
    total_weight: u64,
}

impl WeightedSampler {
    /// Build from a mode, rejecting zero-weight distributions
    pub fn new(mode: &GameMode) -> DistResult<Self> {
        mode.validate()?;
        Self::from_multipliers(mode.name(), mode.multipliers())
    }

    /// Build from a raw multiplier list
    pub fn from_multipliers(name: &str, multipliers: &[MultiplierConfig]) -> DistResult<Self> {
        let mut cumulative = Vec::with_capacity(multipliers.len());
        let mut payouts = Vec::with_capacity(multipliers.len());
        let mut running = 0u64;

        for config in multipliers {
            running = running
                .checked_add(config.weight)
                .ok_or_else(|| DistError::InvalidMode {
                    mode: name.to_string(),
                    reason: "total weight overflows u64".into(),
                })?;
            cumulative.push(running);
            payouts.push(to_hundredths(config.multiplier));
        }

        if running == 0 {
            return Err(DistError::EmptyDistribution(name.to_string()));
        }

        Ok(Self {
            cumulative,
            payouts,
            total_weight: running,
        })
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Draw one payout in hundredths
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let roll = rng.random_range(0..self.total_weight);
        let index = self.cumulative.partition_point(|&c| c <= roll);
        self.payouts[index]
    }
}
