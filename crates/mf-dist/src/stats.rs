//! Payout statistics over a simulation set
//!
//! Everything is derived from the simulations on each call. Empty sets yield
//! 0.0 for every metric.

use serde::{Deserialize, Serialize};

use crate::mode::{PAYOUT_SCALE, Simulation};

/// Means below this are treated as zero when computing volatility
pub const VOLATILITY_MEAN_EPSILON: f64 = 0.0001;

/// Weighted mean payout: Σ(wᵢ·pᵢ) / Σwᵢ
pub fn rtp(simulations: &[Simulation]) -> f64 {
    let total_weight: u64 = simulations.iter().map(|s| s.weight).sum();
    if total_weight == 0 {
        return 0.0;
    }
    let total_payout: f64 = simulations
        .iter()
        .map(|s| s.weight as f64 * s.payout())
        .sum();
    total_payout / total_weight as f64
}

/// Unweighted mean payout: Σpᵢ / n
pub fn mean_payout(simulations: &[Simulation]) -> f64 {
    if simulations.is_empty() {
        return 0.0;
    }
    let total: f64 = simulations.iter().map(Simulation::payout).sum();
    total / simulations.len() as f64
}

/// Population variance (divisor n)
pub fn variance(simulations: &[Simulation]) -> f64 {
    if simulations.is_empty() {
        return 0.0;
    }
    let mean = mean_payout(simulations);
    let squared: f64 = simulations
        .iter()
        .map(|s| {
            let diff = s.payout() - mean;
            diff * diff
        })
        .sum();
    squared / simulations.len() as f64
}

pub fn std_deviation(simulations: &[Simulation]) -> f64 {
    variance(simulations).sqrt()
}

/// Coefficient of variation (σ / mean), 0 when the mean is ~0
pub fn volatility(simulations: &[Simulation]) -> f64 {
    let mean = mean_payout(simulations);
    if mean < VOLATILITY_MEAN_EPSILON {
        return 0.0;
    }
    std_deviation(simulations) / mean
}

/// Percentage of rounds with a non-zero payout
pub fn hit_frequency(simulations: &[Simulation]) -> f64 {
    if simulations.is_empty() {
        return 0.0;
    }
    let hits = simulations.iter().filter(|s| s.is_win()).count();
    100.0 * hits as f64 / simulations.len() as f64
}

pub fn min_payout(simulations: &[Simulation]) -> f64 {
    simulations
        .iter()
        .map(|s| s.payout_multiplier)
        .min()
        .map_or(0.0, |p| p as f64 / PAYOUT_SCALE)
}

pub fn max_payout(simulations: &[Simulation]) -> f64 {
    simulations
        .iter()
        .map(|s| s.payout_multiplier)
        .max()
        .map_or(0.0, |p| p as f64 / PAYOUT_SCALE)
}

/// Snapshot of every metric for one mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeStatistics {
    pub simulations: usize,
    pub rtp: f64,
    pub mean_payout: f64,
    pub variance: f64,
    pub std_deviation: f64,
    pub volatility: f64,
    pub hit_frequency: f64,
    pub min_payout: f64,
    pub max_payout: f64,
}

impl ModeStatistics {
    pub fn from_simulations(simulations: &[Simulation]) -> Self {
        Self {
            simulations: simulations.len(),
            rtp: rtp(simulations),
            mean_payout: mean_payout(simulations),
            variance: variance(simulations),
            std_deviation: std_deviation(simulations),
            volatility: volatility(simulations),
            hit_frequency: hit_frequency(simulations),
            min_payout: min_payout(simulations),
            max_payout: max_payout(simulations),
        }
    }

    /// RTP as a percentage
    pub fn rtp_percent(&self) -> f64 {
        self.rtp * 100.0
    }
}
