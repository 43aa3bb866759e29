//! MathForge Event System
//!
//! Promotional events layered on top of game-mode distributions:
//! - Event definitions with a trigger and a set of modifiers
//! - Time-window, every-N-games and random triggers
//! - Ordered, id-keyed event manager with batch trigger evaluation
//!
//! ## Architecture
//!
//! ```text
//! EventManager (ordered by insertion, unique ids)
//!     │
//!     └── Event
//!           ├── EventTrigger   Time | GameCount | Random
//!           └── EventModifiers rtpBoost, hitFrequencyBoost, overrides
//!                 │
//!                 v
//!     triggered_events(TriggerContext, &mut Rng) → Vec<&Event>
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use mf_event::{Event, EventManager, EventModifiers, EventTrigger, TriggerContext};
//! use rand::SeedableRng;
//!
//! let mut manager = EventManager::new();
//! manager.add_event(
//!     Event::new("milestone", "Every 1000 games")
//!         .with_trigger(EventTrigger::game_count(1000))
//!         .with_modifiers(EventModifiers::rtp_boost(1.05)),
//! );
//!
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
//! let fired = manager.triggered_events(&TriggerContext::game(2000), &mut rng);
//! assert_eq!(fired.len(), 1);
//! ```

pub mod error;
pub mod event;
pub mod manager;
pub mod modifiers;
pub mod trigger;

// Re-exports
pub use error::{EventError, EventResult};
pub use event::Event;
pub use manager::EventManager;
pub use modifiers::{EventModifiers, FreeSpinsAward, ProgressiveJackpot};
pub use trigger::{
    EventTrigger, TriggerContext, parse_clock_minutes, weekday_name, DEFAULT_END_TIME,
    DEFAULT_EVERY_N_GAMES, DEFAULT_PROBABILITY, DEFAULT_START_TIME,
};

pub use chrono::Weekday;
