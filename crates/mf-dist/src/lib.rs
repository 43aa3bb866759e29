//! # mf-dist — Game Mode Distribution Engine for MathForge
//!
//! Builds weighted payout distributions for slot game modes, simulates
//! them deterministically and exports the results in the lookup-table/books
//! layout consumed by the downstream math validation pipeline.
//!
//! ## Features
//!
//! - **Weighted Sampler**: one integer roll per round over insertion-ordered weights
//! - **Simulation Engine**: seeded, reproducible runs with optional round events
//! - **Statistics**: RTP, variance, volatility, hit frequency, payout range
//! - **Export**: `lookUpTable_<mode>.csv`, `books_<mode>.jsonl.zst`, `events.json`, `index.json`
//! - **Mode Manager**: editable mode buffers rebuilt into a fresh distribution per run
//!
//! ## Architecture
//!
//! ```text
//! MathConfig ──> ModeManager
//!                    │
//!                    ├── ModeEntry (name, cost, multipliers, cached stats)
//!                    ├── EventManager (mf-event)
//!                    └── Distribution
//!                          │
//!                          ├── GameMode ── WeightedSampler
//!                          └── Vec<Simulation> ──> ModeStatistics
//!                                    │
//!                                    v
//!                              export_all(dir) → ExportReport
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use mf_dist::Distribution;
//!
//! let mut dist = Distribution::new();
//! dist.add_mode("base", 1.0);
//! dist.add_multiplier("base", 0.0, 350).unwrap();
//! dist.add_multiplier("base", 2.0, 150).unwrap();
//!
//! let rounds = dist.run_simulations("base", 10_000, 42).unwrap();
//! assert_eq!(rounds, 10_000);
//! assert!(dist.rtp("base") > 0.4 && dist.rtp("base") < 0.8);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod manager;
pub mod mode;
pub mod sampler;
pub mod stats;

pub use config::{MathConfig, ModeConfig};
pub use engine::Distribution;
pub use error::{DistError, DistResult, ExportError, ExportResult};
pub use export::{ExportReport, ModeArtifacts, export_all};
pub use manager::{ModeEntry, ModeManager};
pub use mode::{
    BookEvent, GameEvent, GameEventKind, GameMode, MultiplierConfig, PAYOUT_SCALE, Simulation,
    SimulationEvent,
};
pub use sampler::WeightedSampler;
pub use stats::ModeStatistics;
