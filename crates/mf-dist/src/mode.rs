//! Game modes, simulated rounds and per-round book events

use serde::{Deserialize, Serialize};

use crate::error::{DistError, DistResult};

/// Payout ratios are stored in hundredths: 150 = 1.50x
pub const PAYOUT_SCALE: f64 = 100.0;

// ═══════════════════════════════════════════════════════════════════════════════
// MULTIPLIERS
// ═══════════════════════════════════════════════════════════════════════════════

/// One weighted outcome of a mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplierConfig {
    /// Payout ratio (bet multiplier)
    pub multiplier: f64,
    /// Relative selection share. Zero-weight entries are never selected.
    pub weight: u64,
}

impl MultiplierConfig {
    pub fn new(multiplier: f64, weight: u64) -> Self {
        Self { multiplier, weight }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// GAME MODE
// ═══════════════════════════════════════════════════════════════════════════════

/// A named payout distribution with an entry cost.
///
/// `total_weight` always equals the sum of the multiplier weights; the
/// multiplier list is only mutated through methods that keep it in sync.
#[derive(Debug, Clone)]
pub struct GameMode {
    name: String,
    cost: f64,
    multipliers: Vec<MultiplierConfig>,
    total_weight: u64,
    simulations: Vec<Simulation>,
}

impl GameMode {
    pub fn new(name: impl Into<String>, cost: f64) -> Self {
        Self {
            name: name.into(),
            cost,
            multipliers: Vec::new(),
            total_weight: 0,
            simulations: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn set_cost(&mut self, cost: f64) {
        self.cost = cost;
    }

    /// Multipliers in insertion order (the sampling tie-break order)
    pub fn multipliers(&self) -> &[MultiplierConfig] {
        &self.multipliers
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Results of the last run
    pub fn simulations(&self) -> &[Simulation] {
        &self.simulations
    }

    /// Append a weighted multiplier.
    ///
    /// Rejected (and not added) when the total weight would overflow `u64`.
    pub fn add_multiplier(&mut self, multiplier: f64, weight: u64) -> DistResult<()> {
        let total_weight = self
            .total_weight
            .checked_add(weight)
            .ok_or_else(|| DistError::InvalidMode {
                mode: self.name.clone(),
                reason: "total weight overflows u64".into(),
            })?;
        self.multipliers.push(MultiplierConfig::new(multiplier, weight));
        self.total_weight = total_weight;
        debug_assert_eq!(Some(self.total_weight), self.weight_sum());
        Ok(())
    }

    pub fn clear_multipliers(&mut self) {
        self.multipliers.clear();
        self.total_weight = 0;
    }

    /// Expected payout ratio of the configured distribution: Σ wᵢ·mᵢ / W
    pub fn theoretical_rtp(&self) -> f64 {
        if self.total_weight == 0 {
            return 0.0;
        }
        let weighted: f64 = self
            .multipliers
            .iter()
            .map(|m| m.weight as f64 * m.multiplier)
            .sum();
        weighted / self.total_weight as f64
    }

    /// A mode can be sampled and exported only with a non-empty name, a finite
    /// non-negative cost and a positive total weight
    pub fn validate(&self) -> DistResult<()> {
        if self.name.is_empty() {
            return Err(DistError::InvalidMode {
                mode: self.name.clone(),
                reason: "name is empty".into(),
            });
        }
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err(DistError::InvalidMode {
                mode: self.name.clone(),
                reason: format!("cost {} is negative or not finite", self.cost),
            });
        }
        if self.total_weight == 0 {
            return Err(DistError::EmptyDistribution(self.name.clone()));
        }
        Ok(())
    }

    pub(crate) fn replace_simulations(&mut self, simulations: Vec<Simulation>) {
        self.simulations = simulations;
    }

    fn weight_sum(&self) -> Option<u64> {
        self.multipliers
            .iter()
            .try_fold(0u64, |acc, m| acc.checked_add(m.weight))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SIMULATION
// ═══════════════════════════════════════════════════════════════════════════════

/// One simulated round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    /// 1-based, sequential within a run
    pub id: u64,
    /// Always 1 for plain sampling
    pub weight: u64,
    /// Payout in hundredths
    pub payout_multiplier: u64,
    #[serde(default)]
    pub events: Vec<BookEvent>,
}

impl Simulation {
    pub fn new(id: u64, payout_multiplier: u64) -> Self {
        Self {
            id,
            weight: 1,
            payout_multiplier,
            events: Vec::new(),
        }
    }

    /// Payout as a ratio (`payout_multiplier / 100`)
    pub fn payout(&self) -> f64 {
        self.payout_multiplier as f64 / PAYOUT_SCALE
    }

    pub fn is_win(&self) -> bool {
        self.payout_multiplier > 0
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BOOK EVENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Kind of narrative step inside a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameEventKind {
    Reveal,
    WinInfo,
    SetWin,
    FinalWin,
}

/// What happened inside one simulated round, for replay downstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub index: u32,
    #[serde(rename = "type")]
    pub kind: GameEventKind,
    pub multiplier: f64,
    pub amount: i64,
}

impl GameEvent {
    pub fn new(index: u32, kind: GameEventKind, payout_multiplier: u64) -> Self {
        Self {
            index,
            kind,
            multiplier: payout_multiplier as f64 / PAYOUT_SCALE,
            amount: i64::try_from(payout_multiplier).unwrap_or(i64::MAX),
        }
    }

    /// The fixed `reveal` → `finalWin` pair describing a drawn payout
    pub fn round(payout_multiplier: u64) -> Vec<BookEvent> {
        vec![
            BookEvent::Game(Self::new(0, GameEventKind::Reveal, payout_multiplier)),
            BookEvent::Game(Self::new(1, GameEventKind::FinalWin, payout_multiplier)),
        ]
    }
}

/// A promotional event that fired on a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationEvent {
    pub event_id: String,
    pub rtp_boost: f64,
}

/// Entry in a round's `events` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookEvent {
    Game(GameEvent),
    Triggered(SimulationEvent),
}
