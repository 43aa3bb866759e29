//! Distribution engine: owns every game mode and runs simulations
//!
//! Modes are kept in insertion order; that order drives export order.
//! Unknown mode names are ignored by every call (no error, zero results).
//! Each run replaces the mode's previous simulations.

use indexmap::IndexMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use mf_event::{EventManager, TriggerContext};

use crate::error::DistResult;
use crate::mode::{BookEvent, GameEvent, GameMode, Simulation, SimulationEvent};
use crate::sampler::WeightedSampler;
use crate::stats::{self, ModeStatistics};

/// Collection of game modes and their simulated rounds
#[derive(Debug, Clone, Default)]
pub struct Distribution {
    modes: IndexMap<String, GameMode>,
}

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // MODES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Add a mode. Re-adding an existing name resets it in place.
    pub fn add_mode(&mut self, name: &str, cost: f64) {
        if self.modes.contains_key(name) {
            log::debug!("Mode '{}' redefined, previous multipliers dropped", name);
        }
        self.modes.insert(name.to_string(), GameMode::new(name, cost));
    }

    /// Append a weighted multiplier. Returns `Ok(false)` for an unknown mode.
    ///
    /// Fails with [`DistError::InvalidMode`](crate::DistError::InvalidMode) when the mode's total weight would
    /// overflow; the multiplier is not added.
    pub fn add_multiplier(&mut self, mode: &str, multiplier: f64, weight: u64) -> DistResult<bool> {
        match self.modes.get_mut(mode) {
            Some(m) => {
                m.add_multiplier(multiplier, weight)?;
                Ok(true)
            }
            None => {
                log::warn!("add_multiplier: unknown mode '{}'", mode);
                Ok(false)
            }
        }
    }

    pub fn remove_mode(&mut self, mode: &str) -> Option<GameMode> {
        self.modes.shift_remove(mode)
    }

    pub fn set_cost(&mut self, mode: &str, cost: f64) -> bool {
        self.modes.get_mut(mode).map(|m| m.set_cost(cost)).is_some()
    }

    pub fn clear_multipliers(&mut self, mode: &str) -> bool {
        self.modes.get_mut(mode).map(GameMode::clear_multipliers).is_some()
    }

    pub fn mode(&self, mode: &str) -> Option<&GameMode> {
        self.modes.get(mode)
    }

    /// Modes in insertion order
    pub fn modes(&self) -> impl Iterator<Item = &GameMode> {
        self.modes.values()
    }

    pub fn mode_names(&self) -> impl Iterator<Item = &str> {
        self.modes.keys().map(String::as_str)
    }

    pub fn mode_count(&self) -> usize {
        self.modes.len()
    }

    /// Simulations of the last run; empty for unknown modes
    pub fn simulations(&self, mode: &str) -> &[Simulation] {
        self.modes
            .get(mode)
            .map(GameMode::simulations)
            .unwrap_or_default()
    }

    pub fn simulation_count(&self, mode: &str) -> usize {
        self.simulations(mode).len()
    }

    pub fn total_weight(&self, mode: &str) -> u64 {
        self.modes.get(mode).map_or(0, GameMode::total_weight)
    }

    pub fn theoretical_rtp(&self, mode: &str) -> f64 {
        self.modes.get(mode).map_or(0.0, GameMode::theoretical_rtp)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SIMULATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Run `count` rounds seeded with `seed`. Rounds carry no events.
    ///
    /// Returns the number of simulations produced (0 for an unknown mode).
    pub fn run_simulations(&mut self, mode: &str, count: usize, seed: u64) -> DistResult<usize> {
        self.run_with(mode, count, seed, |_, _| Vec::new())
    }

    /// Same draws as [`run_simulations`](Self::run_simulations), each round
    /// annotated with a `reveal` → `finalWin` pair.
    pub fn run_simulations_with_game_events(
        &mut self,
        mode: &str,
        count: usize,
        seed: u64,
    ) -> DistResult<usize> {
        self.run_with(mode, count, seed, |_, payout| GameEvent::round(payout))
    }

    /// Same draws as [`run_simulations`](Self::run_simulations), each round
    /// annotated with the events that fire for it.
    ///
    /// The round id is the only trigger signal, so time triggers never fire.
    /// `trigger_rng` feeds random triggers and is independent of the draw seed.
    pub fn run_simulations_with_events<R: Rng + ?Sized>(
        &mut self,
        mode: &str,
        count: usize,
        seed: u64,
        events: &EventManager,
        trigger_rng: &mut R,
    ) -> DistResult<usize> {
        self.run_simulations_with_events_at(
            mode,
            count,
            seed,
            events,
            &TriggerContext::default(),
            trigger_rng,
        )
    }

    /// Event run evaluated against `clock`. Its weekday and time are kept
    /// for every round while `game_count` is replaced by the round id.
    pub fn run_simulations_with_events_at<R: Rng + ?Sized>(
        &mut self,
        mode: &str,
        count: usize,
        seed: u64,
        events: &EventManager,
        clock: &TriggerContext,
        trigger_rng: &mut R,
    ) -> DistResult<usize> {
        let mut ctx = clock.clone();
        self.run_with(mode, count, seed, |round, _| {
            ctx.game_count = round;
            events
                .triggered_events(&ctx, &mut *trigger_rng)
                .into_iter()
                .map(|event| {
                    BookEvent::Triggered(SimulationEvent {
                        event_id: event.id.clone(),
                        rtp_boost: event.modifiers.rtp_boost,
                    })
                })
                .collect()
        })
    }

    fn run_with<F>(&mut self, mode: &str, count: usize, seed: u64, mut annotate: F) -> DistResult<usize>
    where
        F: FnMut(u64, u64) -> Vec<BookEvent>,
    {
        let Some(game_mode) = self.modes.get_mut(mode) else {
            log::warn!("run_simulations: unknown mode '{}'", mode);
            return Ok(0);
        };

        let sampler = WeightedSampler::new(game_mode)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut simulations = Vec::with_capacity(count);

        for id in 1..=count as u64 {
            let payout = sampler.sample(&mut rng);
            let mut simulation = Simulation::new(id, payout);
            simulation.events = annotate(id, payout);
            simulations.push(simulation);
        }

        log::debug!(
            "Mode '{}': {} simulations (seed {})",
            mode,
            simulations.len(),
            seed
        );
        game_mode.replace_simulations(simulations);
        Ok(count)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STATISTICS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn rtp(&self, mode: &str) -> f64 {
        stats::rtp(self.simulations(mode))
    }

    pub fn mean_payout(&self, mode: &str) -> f64 {
        stats::mean_payout(self.simulations(mode))
    }

    pub fn variance(&self, mode: &str) -> f64 {
        stats::variance(self.simulations(mode))
    }

    pub fn std_deviation(&self, mode: &str) -> f64 {
        stats::std_deviation(self.simulations(mode))
    }

    pub fn volatility(&self, mode: &str) -> f64 {
        stats::volatility(self.simulations(mode))
    }

    pub fn hit_frequency(&self, mode: &str) -> f64 {
        stats::hit_frequency(self.simulations(mode))
    }

    pub fn min_payout(&self, mode: &str) -> f64 {
        stats::min_payout(self.simulations(mode))
    }

    pub fn max_payout(&self, mode: &str) -> f64 {
        stats::max_payout(self.simulations(mode))
    }

    /// All metrics at once
    pub fn statistics(&self, mode: &str) -> ModeStatistics {
        ModeStatistics::from_simulations(self.simulations(mode))
    }
}
