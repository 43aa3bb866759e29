//! Event definition

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EventError, EventResult};
use crate::modifiers::EventModifiers;
use crate::trigger::{EventTrigger, TriggerContext};

/// A promotional event: a trigger plus the modifiers it applies.
///
/// Independent of the per-round narrative events recorded in simulation books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique key inside an [`EventManager`](crate::EventManager)
    pub id: String,
    /// Display name
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Inactive events never trigger
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub trigger: EventTrigger,
    #[serde(default)]
    pub modifiers: EventModifiers,
}

fn default_active() -> bool {
    true
}

impl Event {
    /// Create an active event with a default random trigger and neutral modifiers
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            active: true,
            trigger: EventTrigger::default(),
            modifiers: EventModifiers::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_trigger(mut self, trigger: EventTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_modifiers(mut self, modifiers: EventModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether this event fires for the given round.
    ///
    /// Inactive events return `false` without touching `rng`.
    pub fn should_trigger<R: Rng + ?Sized>(&self, ctx: &TriggerContext, rng: &mut R) -> bool {
        self.active && self.trigger.evaluate(ctx, rng)
    }

    /// Check id, name and trigger parameters
    pub fn validate(&self) -> EventResult<()> {
        let invalid = |reason: String| EventError::InvalidEvent {
            id: self.id.clone(),
            reason,
        };
        if self.id.is_empty() {
            return Err(invalid("id is empty".into()));
        }
        if self.name.is_empty() {
            return Err(invalid("name is empty".into()));
        }
        self.trigger.validate().map_err(invalid)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Rough fraction of rounds on which this event is active
    pub fn estimated_activation_rate(&self) -> f64 {
        self.trigger.estimated_activation_rate()
    }

    /// Blend `base_rtp` with its boosted value by the activation rate
    pub fn estimated_rtp_with_event(&self, base_rtp: f64) -> f64 {
        let rate = self.estimated_activation_rate();
        base_rtp * (1.0 - rate) + base_rtp * self.modifiers.rtp_boost * rate
    }

    /// Single-event JSON object, as written to the events manifest
    pub fn to_json(&self) -> EventResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
