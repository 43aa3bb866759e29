//! Mode manager: editable mode list feeding a fresh distribution per run
//!
//! Front ends edit [`ModeEntry`] buffers freely; nothing touches the
//! [`Distribution`] until a run rebuilds it from scratch. Results (RTP, round
//! count, statistics) are cached back into each entry for display.

use std::collections::HashSet;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use mf_event::{EventManager, TriggerContext};

use crate::config::{DEFAULT_BASE_SEED, MathConfig};
use crate::engine::Distribution;
use crate::error::{DistError, DistResult, ExportError, ExportResult};
use crate::export::{self, ExportReport};
use crate::mode::MultiplierConfig;
use crate::stats::ModeStatistics;

/// Multipliers given to every mode created by [`ModeManager::add_default_mode`]
pub const DEFAULT_MODE_MULTIPLIERS: [(f64, u64); 3] = [(0.0, 350), (1.0, 200), (2.0, 100)];

/// Edit buffer for one mode plus the results of its last run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeEntry {
    pub name: String,
    pub cost: f64,
    pub multipliers: Vec<MultiplierConfig>,
    /// Set once a run covered this entry
    pub simulated: bool,
    pub rtp: f64,
    pub sim_count: usize,
    pub stats: Option<ModeStatistics>,
}

impl ModeEntry {
    pub fn new(name: impl Into<String>, cost: f64) -> Self {
        Self {
            name: name.into(),
            cost,
            multipliers: Vec::new(),
            simulated: false,
            rtp: 0.0,
            sim_count: 0,
            stats: None,
        }
    }

    /// Builder: append a weighted multiplier
    pub fn with_multiplier(mut self, multiplier: f64, weight: u64) -> Self {
        self.multipliers.push(MultiplierConfig::new(multiplier, weight));
        self
    }

    fn record(&mut self, distribution: &Distribution) {
        let stats = distribution.statistics(&self.name);
        self.simulated = true;
        self.rtp = stats.rtp;
        self.sim_count = stats.simulations;
        self.stats = Some(stats);
    }
}

/// Ordered mode buffers, the event set and the last simulated distribution
#[derive(Debug, Clone)]
pub struct ModeManager {
    modes: Vec<ModeEntry>,
    events: EventManager,
    distribution: Distribution,
    base_seed: u64,
}

impl Default for ModeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeManager {
    pub fn new() -> Self {
        Self {
            modes: Vec::new(),
            events: EventManager::new(),
            distribution: Distribution::new(),
            base_seed: DEFAULT_BASE_SEED,
        }
    }

    /// Mode `i` is seeded with `base_seed + i`
    pub fn with_base_seed(mut self, base_seed: u64) -> Self {
        self.base_seed = base_seed;
        self
    }

    pub fn from_config(config: &MathConfig) -> Self {
        let mut manager = Self::new().with_base_seed(config.base_seed);
        for mode in &config.modes {
            let mut entry = ModeEntry::new(mode.name.clone(), mode.cost);
            entry.multipliers = mode.multipliers.clone();
            manager.add_mode(entry);
        }
        manager.events = config.event_manager();
        manager
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EDITING
    // ═══════════════════════════════════════════════════════════════════════════

    /// Append `mode_<n>` with cost 1.0 and the starter multipliers
    pub fn add_default_mode(&mut self) -> &mut ModeEntry {
        let mut entry = ModeEntry::new(format!("mode_{}", self.modes.len()), 1.0);
        for (multiplier, weight) in DEFAULT_MODE_MULTIPLIERS {
            entry.multipliers.push(MultiplierConfig::new(multiplier, weight));
        }
        self.add_mode(entry)
    }

    pub fn add_mode(&mut self, entry: ModeEntry) -> &mut ModeEntry {
        self.modes.push(entry);
        let last = self.modes.len() - 1;
        &mut self.modes[last]
    }

    pub fn remove_last_mode(&mut self) -> Option<ModeEntry> {
        self.modes.pop()
    }

    pub fn modes(&self) -> &[ModeEntry] {
        &self.modes
    }

    pub fn modes_mut(&mut self) -> &mut [ModeEntry] {
        &mut self.modes
    }

    pub fn mode_count(&self) -> usize {
        self.modes.len()
    }

    pub fn events(&self) -> &EventManager {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventManager {
        &mut self.events
    }

    /// Distribution produced by the last successful run
    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // RUNS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Simulate every mode with plain rounds
    pub fn run_all_simulations(&mut self, count: usize) -> DistResult<usize> {
        let Self {
            modes,
            distribution,
            base_seed,
            ..
        } = self;
        Self::run_all(modes, distribution, *base_seed, |dist, name, seed| {
            dist.run_simulations(name, count, seed)
        })
    }

    /// Simulate every mode with reveal/finalWin pairs on each round
    pub fn run_all_simulations_with_game_events(&mut self, count: usize) -> DistResult<usize> {
        let Self {
            modes,
            distribution,
            base_seed,
            ..
        } = self;
        Self::run_all(modes, distribution, *base_seed, |dist, name, seed| {
            dist.run_simulations_with_game_events(name, count, seed)
        })
    }

    /// Simulate every mode, evaluating the managed events on each round.
    /// Only the round id is supplied as a trigger signal.
    pub fn run_all_simulations_with_events<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        trigger_rng: &mut R,
    ) -> DistResult<usize> {
        self.run_all_simulations_with_events_at(count, &TriggerContext::default(), trigger_rng)
    }

    /// Like [`run_all_simulations_with_events`](Self::run_all_simulations_with_events),
    /// with `clock`'s weekday and time passed to every round
    pub fn run_all_simulations_with_events_at<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        clock: &TriggerContext,
        trigger_rng: &mut R,
    ) -> DistResult<usize> {
        let Self {
            modes,
            events,
            distribution,
            base_seed,
        } = self;
        Self::run_all(modes, distribution, *base_seed, |dist, name, seed| {
            dist.run_simulations_with_events_at(name, count, seed, &*events, clock, &mut *trigger_rng)
        })
    }

    /// Validate every entry, rebuild the distribution and run each mode.
    ///
    /// On error the previous distribution and cached results are kept.
    fn run_all<F>(
        modes: &mut [ModeEntry],
        current: &mut Distribution,
        base_seed: u64,
        mut run: F,
    ) -> DistResult<usize>
    where
        F: FnMut(&mut Distribution, &str, u64) -> DistResult<usize>,
    {
        let mut names = HashSet::new();
        let mut distribution = Distribution::new();
        for entry in modes.iter() {
            if !names.insert(entry.name.as_str()) {
                return Err(DistError::InvalidMode {
                    mode: entry.name.clone(),
                    reason: "defined more than once".into(),
                });
            }
            distribution.add_mode(&entry.name, entry.cost);
            for m in &entry.multipliers {
                distribution.add_multiplier(&entry.name, m.multiplier, m.weight)?;
            }
            if let Some(mode) = distribution.mode(&entry.name) {
                mode.validate()?;
            }
        }

        let mut total = 0;
        for (i, entry) in modes.iter().enumerate() {
            let seed = base_seed.wrapping_add(i as u64);
            total += run(&mut distribution, &entry.name, seed)?;
        }

        for entry in modes.iter_mut() {
            entry.record(&distribution);
        }
        *current = distribution;

        log::info!(
            "Simulated {} mode(s), {} rounds total",
            modes.len(),
            total
        );
        Ok(total)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EXPORT
    // ═══════════════════════════════════════════════════════════════════════════

    /// Export the last run, including `events.json`.
    ///
    /// Creates `dir` itself but not its parents.
    pub fn export_files(&self, dir: &Path) -> ExportResult<ExportReport> {
        if self.distribution.mode_count() == 0 {
            return Err(ExportError::NothingToExport);
        }
        match std::fs::create_dir(dir) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(export::io_error(dir, e)),
        }
        export::export_all(&self.distribution, Some(&self.events), dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mf_event::{Event, EventModifiers, EventTrigger, Weekday};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_default_modes_are_numbered() {
        let mut manager = ModeManager::new();
        manager.add_default_mode();
        manager.add_default_mode();
        assert_eq!(manager.modes()[0].name, "mode_0");
        assert_eq!(manager.modes()[1].name, "mode_1");
        assert_eq!(manager.modes()[1].multipliers.len(), 3);
        assert!(!manager.modes()[0].simulated);

        assert_eq!(manager.remove_last_mode().map(|m| m.name), Some("mode_1".into()));
        assert_eq!(manager.mode_count(), 1);
        manager.remove_last_mode();
        assert!(manager.remove_last_mode().is_none());
    }

    #[test]
    fn test_run_caches_results() {
        let mut manager = ModeManager::new();
        manager.add_default_mode();
        manager.add_default_mode().cost = 5.0;

        assert_eq!(manager.run_all_simulations(2000).unwrap(), 4000);

        for entry in manager.modes() {
            assert!(entry.simulated);
            assert_eq!(entry.sim_count, 2000);
            assert_eq!(entry.rtp, manager.distribution().rtp(&entry.name));
            assert_eq!(entry.stats.map(|s| s.simulations), Some(2000));
        }
        assert_eq!(manager.distribution().mode("mode_1").unwrap().cost(), 5.0);
    }

    #[test]
    fn test_mode_seeds_follow_position() {
        let mut manager = ModeManager::new().with_base_seed(7);
        manager.add_default_mode();
        manager.add_default_mode();
        manager.run_all_simulations(500).unwrap();

        let mut direct = Distribution::new();
        direct.add_mode("mode_1", 1.0);
        for (m, w) in DEFAULT_MODE_MULTIPLIERS {
            direct.add_multiplier("mode_1", m, w).unwrap();
        }
        direct.run_simulations("mode_1", 500, 8).unwrap();

        assert_eq!(
            manager.distribution().simulations("mode_1"),
            direct.simulations("mode_1")
        );
    }

    #[test]
    fn test_rebuild_drops_removed_modes() {
        let mut manager = ModeManager::new();
        manager.add_default_mode();
        manager.add_default_mode();
        manager.run_all_simulations(10).unwrap();
        manager.remove_last_mode();
        manager.run_all_simulations(10).unwrap();
        assert_eq!(manager.distribution().mode_count(), 1);
    }

    #[test]
    fn test_invalid_entry_keeps_previous_run() {
        let mut manager = ModeManager::new();
        manager.add_default_mode();
        manager.run_all_simulations(100).unwrap();

        manager.add_mode(ModeEntry::new("empty", 1.0));
        assert!(matches!(
            manager.run_all_simulations(50),
            Err(DistError::EmptyDistribution(_))
        ));
        assert_eq!(manager.distribution().simulation_count("mode_0"), 100);
        assert_eq!(manager.modes()[0].sim_count, 100);

        manager.remove_last_mode();
        manager.add_default_mode().name = "mode_0".into();
        assert!(matches!(
            manager.run_all_simulations(50),
            Err(DistError::InvalidMode { .. })
        ));
    }

    #[test]
    fn test_event_run_annotates_rounds() {
        let mut manager = ModeManager::new();
        manager.add_default_mode();
        manager.events_mut().add_event(
            Event::new("every_ten", "Every ten")
                .with_trigger(EventTrigger::game_count(10))
                .with_modifiers(EventModifiers::rtp_boost(2.0)),
        );

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        manager.run_all_simulations_with_events(100, &mut rng).unwrap();

        let annotated = manager
            .distribution()
            .simulations("mode_0")
            .iter()
            .filter(|s| !s.events.is_empty())
            .count();
        assert_eq!(annotated, 10);
    }

    #[test]
    fn test_weight_overflow_keeps_previous_run() {
        let mut manager = ModeManager::new();
        manager.add_default_mode();
        manager.run_all_simulations(100).unwrap();

        manager.add_mode(
            ModeEntry::new("big", 1.0)
                .with_multiplier(1.0, u64::MAX)
                .with_multiplier(2.0, 1),
        );
        assert!(matches!(
            manager.run_all_simulations(50),
            Err(DistError::InvalidMode { ref mode, ref reason })
                if mode == "big" && reason.contains("overflows")
        ));
        assert_eq!(manager.distribution().simulation_count("mode_0"), 100);
        assert!(!manager.modes()[1].simulated);
    }

    #[test]
    fn test_clock_reaches_time_events() {
        let mut manager = ModeManager::new();
        manager.add_default_mode();
        manager.add_default_mode();
        manager.events_mut().add_event(
            Event::new("midday", "Midday")
                .with_trigger(EventTrigger::time([Weekday::Tue, Weekday::Wed], "11:00", "13:00")),
        );

        let annotated = |manager: &ModeManager, mode: &str| {
            manager
                .distribution()
                .simulations(mode)
                .iter()
                .filter(|s| !s.events.is_empty())
                .count()
        };

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let clock = TriggerContext::default().with_clock(Weekday::Wed, "12:30");
        manager.run_all_simulations_with_events_at(40, &clock, &mut rng).unwrap();
        assert_eq!(annotated(&manager, "mode_0"), 40);
        assert_eq!(annotated(&manager, "mode_1"), 40);

        let late = TriggerContext::default().with_clock(Weekday::Wed, "18:00");
        manager.run_all_simulations_with_events_at(40, &late, &mut rng).unwrap();
        assert_eq!(annotated(&manager, "mode_0"), 0);

        manager.run_all_simulations_with_events(40, &mut rng).unwrap();
        assert_eq!(annotated(&manager, "mode_0"), 0);
    }

    #[test]
    fn test_export_requires_a_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = ModeManager::new();
        manager.add_default_mode();
        assert!(matches!(
            manager.export_files(dir.path()),
            Err(ExportError::NothingToExport)
        ));
    }

    #[test]
    fn test_export_creates_single_level_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = ModeManager::new();
        manager.add_default_mode();
        manager.run_all_simulations_with_game_events(20).unwrap();

        let out = dir.path().join("output");
        let report = manager.export_files(&out).unwrap();
        assert!(out.join("index.json").exists());
        assert!(report.events.is_some());

        // Existing directory is fine
        manager.export_files(&out).unwrap();

        let nested = dir.path().join("a").join("b");
        assert!(matches!(
            manager.export_files(&nested),
            Err(ExportError::Io { .. })
        ));
    }

    #[test]
    fn test_from_config() {
        let mut config = MathConfig::demo();
        config.base_seed = 100;
        config.events.push(Event::new("e", "E"));

        let manager = ModeManager::from_config(&config);
        assert_eq!(manager.base_seed(), 100);
        assert_eq!(manager.mode_count(), 2);
        assert_eq!(manager.modes()[1].cost, 100.0);
        assert_eq!(manager.modes()[1].multipliers.len(), 7);
        assert_eq!(manager.events().len(), 1);
    }
}
