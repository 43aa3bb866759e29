//! Run configuration
//!
//! A [`MathConfig`] describes a whole run: which modes exist, how many rounds
//! to simulate, how to seed them and which promotional events apply.
//! Loaded from JSON or YAML.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use mf_event::{Event, EventManager};

use crate::engine::Distribution;
use crate::error::{DistError, DistResult};
use crate::mode::MultiplierConfig;

pub const DEFAULT_SIMULATIONS: usize = 100_000;
pub const DEFAULT_BASE_SEED: u64 = 42;
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// One mode as written in a config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeConfig {
    pub name: String,
    #[serde(default = "default_cost")]
    pub cost: f64,
    #[serde(default)]
    pub multipliers: Vec<MultiplierConfig>,
}

fn default_cost() -> f64 {
    1.0
}

impl ModeConfig {
    pub fn new(name: impl Into<String>, cost: f64) -> Self {
        Self {
            name: name.into(),
            cost,
            multipliers: Vec::new(),
        }
    }

    /// Builder: append a weighted multiplier
    pub fn with_multiplier(mut self, multiplier: f64, weight: u64) -> Self {
        self.multipliers.push(MultiplierConfig::new(multiplier, weight));
        self
    }

    /// Sum of the multiplier weights, `None` on `u64` overflow
    pub fn total_weight(&self) -> Option<u64> {
        self.multipliers
            .iter()
            .try_fold(0u64, |acc, m| acc.checked_add(m.weight))
    }
}

/// Complete run description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MathConfig {
    /// Rounds per mode
    pub simulations: usize,
    /// Mode `i` (config order) is seeded with `base_seed + i`
    pub base_seed: u64,
    pub output_dir: PathBuf,
    /// Attach the reveal/finalWin pair to every round
    pub game_events: bool,
    /// Evaluate `events` on every round
    pub use_events: bool,
    /// Seed for random triggers; fresh entropy when absent
    pub event_seed: Option<u64>,
    pub modes: Vec<ModeConfig>,
    pub events: Vec<Event>,
}

impl Default for MathConfig {
    fn default() -> Self {
        Self {
            simulations: DEFAULT_SIMULATIONS,
            base_seed: DEFAULT_BASE_SEED,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            game_events: false,
            use_events: false,
            event_seed: None,
            modes: Vec::new(),
            events: Vec::new(),
        }
    }
}

impl MathConfig {
    /// The built-in two-mode setup: a low-volatility base game and a
    /// 100x-cost bonus buy
    pub fn demo() -> Self {
        Self {
            modes: vec![
                ModeConfig::new("base", 1.0)
                    .with_multiplier(0.0, 350)
                    .with_multiplier(0.5, 250)
                    .with_multiplier(1.0, 200)
                    .with_multiplier(1.5, 120)
                    .with_multiplier(2.0, 80),
                ModeConfig::new("bonus", 100.0)
                    .with_multiplier(0.0, 100)
                    .with_multiplier(1.0, 200)
                    .with_multiplier(2.0, 300)
                    .with_multiplier(5.0, 250)
                    .with_multiplier(10.0, 100)
                    .with_multiplier(50.0, 40)
                    .with_multiplier(100.0, 10),
            ],
            ..Self::default()
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // LOADING
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn from_json(json: &str) -> DistResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> DistResult<Self> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Load by extension: `.yaml`/`.yml` as YAML, anything else as JSON
    pub fn load(path: &Path) -> DistResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let config = if is_yaml {
            Self::from_yaml(&text)?
        } else {
            Self::from_json(&text)?
        };
        log::debug!(
            "Loaded config {:?}: {} mode(s), {} event(s)",
            path,
            config.modes.len(),
            config.events.len()
        );
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> DistResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> DistResult<String> {
        Ok(serde_yml::to_string(self)?)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Every problem found, in config order. Empty when the config is usable.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.modes.is_empty() {
            problems.push("no modes configured".to_string());
        }

        let mut names = HashSet::new();
        for (i, mode) in self.modes.iter().enumerate() {
            if mode.name.is_empty() {
                problems.push(format!("mode #{} has an empty name", i + 1));
            } else if !names.insert(mode.name.as_str()) {
                problems.push(format!("mode '{}' is defined more than once", mode.name));
            }
            if !mode.cost.is_finite() || mode.cost < 0.0 {
                problems.push(format!("mode '{}' has invalid cost {}", mode.name, mode.cost));
            }
            match mode.total_weight() {
                Some(0) => problems.push(format!("mode '{}' has a total weight of 0", mode.name)),
                None => problems.push(format!("mode '{}' total weight overflows u64", mode.name)),
                Some(_) => {}
            }
            if mode.multipliers.iter().any(|m| !m.multiplier.is_finite() || m.multiplier < 0.0) {
                problems.push(format!("mode '{}' has a negative or non-finite multiplier", mode.name));
            }
        }

        let mut ids = HashSet::new();
        for event in &self.events {
            if !ids.insert(event.id.as_str()) {
                problems.push(format!("event '{}' is defined more than once", event.id));
            }
            if let Err(e) = event.validate() {
                problems.push(e.to_string());
            }
        }

        problems
    }

    pub fn validate(&self) -> DistResult<()> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(DistError::Config(problems.join("; ")))
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BUILDERS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Distribution with every configured mode (no simulations yet)
    pub fn distribution(&self) -> DistResult<Distribution> {
        let mut dist = Distribution::new();
        for mode in &self.modes {
            dist.add_mode(&mode.name, mode.cost);
            for m in &mode.multipliers {
                dist.add_multiplier(&mode.name, m.multiplier, m.weight)?;
            }
        }
        Ok(dist)
    }

    pub fn event_manager(&self) -> EventManager {
        EventManager::from_events(self.events.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mf_event::EventTrigger;

    #[test]
    fn test_defaults() {
        let config = MathConfig::default();
        assert_eq!(config.simulations, 100_000);
        assert_eq!(config.base_seed, 42);
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert!(!config.use_events);
        assert!(config.event_seed.is_none());
    }

    #[test]
    fn test_json_with_partial_fields() {
        let config = MathConfig::from_json(
            r#"{
                "simulations": 500,
                "modes": [
                    {"name": "base", "multipliers": [{"multiplier": 0.0, "weight": 3}, {"multiplier": 2.0, "weight": 1}]}
                ],
                "events": [
                    {"id": "m", "name": "Milestone", "trigger": {"type": "game_count", "everyNGames": 100}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.simulations, 500);
        assert_eq!(config.base_seed, DEFAULT_BASE_SEED);
        assert_eq!(config.modes[0].cost, 1.0);
        assert_eq!(config.modes[0].total_weight(), Some(4));
        assert_eq!(config.events[0].trigger, EventTrigger::game_count(100));
        assert!(config.events[0].active);
        config.validate().unwrap();
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = MathConfig::demo();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(MathConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let demo = MathConfig::demo();

        let yaml_path = dir.path().join("math.yml");
        std::fs::write(&yaml_path, demo.to_yaml().unwrap()).unwrap();
        assert_eq!(MathConfig::load(&yaml_path).unwrap(), demo);

        let json_path = dir.path().join("math.json");
        std::fs::write(&json_path, demo.to_json_pretty().unwrap()).unwrap();
        assert_eq!(MathConfig::load(&json_path).unwrap(), demo);

        assert!(matches!(
            MathConfig::load(&dir.path().join("missing.json")),
            Err(DistError::Io(_))
        ));
    }

    #[test]
    fn test_problems_are_collected() {
        let config = MathConfig {
            modes: vec![
                ModeConfig::new("base", 1.0).with_multiplier(1.0, 1),
                ModeConfig::new("base", -1.0).with_multiplier(1.0, 0),
                ModeConfig::new("", 1.0).with_multiplier(-3.0, 1),
            ],
            events: vec![
                Event::new("e", "E").with_trigger(EventTrigger::game_count(0)),
                Event::new("e", "E again"),
            ],
            ..MathConfig::default()
        };

        let problems = config.problems();
        assert!(problems.iter().any(|p| p.contains("more than once") && p.contains("'base'")));
        assert!(problems.iter().any(|p| p.contains("invalid cost")));
        assert!(problems.iter().any(|p| p.contains("total weight of 0")));
        assert!(problems.iter().any(|p| p.contains("empty name")));
        assert!(problems.iter().any(|p| p.contains("non-finite multiplier")));
        assert!(problems.iter().any(|p| p.contains("event 'e'")));
        assert!(matches!(config.validate(), Err(DistError::Config(_))));

        assert!(MathConfig::default().problems().iter().any(|p| p == "no modes configured"));
        MathConfig::demo().validate().unwrap();
    }

    #[test]
    fn test_weight_overflow_is_a_problem() {
        let config = MathConfig {
            modes: vec![
                ModeConfig::new("big", 1.0)
                    .with_multiplier(1.0, u64::MAX)
                    .with_multiplier(2.0, 1),
            ],
            ..MathConfig::default()
        };

        assert_eq!(config.modes[0].total_weight(), None);
        assert!(config.problems().iter().any(|p| p == "mode 'big' total weight overflows u64"));
        assert!(matches!(config.validate(), Err(DistError::Config(_))));
        assert!(matches!(config.distribution(), Err(DistError::InvalidMode { .. })));
    }

    #[test]
    fn test_distribution_keeps_config_order() {
        let dist = MathConfig::demo().distribution().unwrap();
        assert_eq!(dist.mode_names().collect::<Vec<_>>(), vec!["base", "bonus"]);
        assert_eq!(dist.total_weight("base"), 1000);
        assert_eq!(dist.total_weight("bonus"), 1000);
    }
}
