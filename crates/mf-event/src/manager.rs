//! Event Manager
//!
//! Owns the configured events in insertion order, keyed by id.
//! - Duplicate ids are rejected on insert, never overwritten
//! - Unknown ids are ignored by every mutating call
//! - Trigger evaluation takes the caller's generator

use indexmap::IndexMap;
use rand::Rng;

use crate::error::EventResult;
use crate::event::Event;
use crate::trigger::TriggerContext;

/// Ordered collection of events keyed by unique id
#[derive(Debug, Clone, Default)]
pub struct EventManager {
    events: IndexMap<String, Event>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list, dropping later duplicates
    pub fn from_events(events: impl IntoIterator<Item = Event>) -> Self {
        let mut manager = Self::new();
        for event in events {
            manager.add_event(event);
        }
        manager
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // REGISTRATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Add an event. Returns `false` (and keeps the existing one) if the id is taken.
    pub fn add_event(&mut self, event: Event) -> bool {
        if self.events.contains_key(&event.id) {
            log::warn!("Event '{}' already registered, ignoring duplicate", event.id);
            return false;
        }
        log::debug!("Registered event '{}' ({})", event.id, event.trigger.kind());
        self.events.insert(event.id.clone(), event);
        true
    }

    /// Remove an event, keeping the order of the rest
    pub fn remove_event(&mut self, id: &str) -> Option<Event> {
        self.events.shift_remove(id)
    }

    /// Replace an event in place.
    ///
    /// The replacement may carry a new id as long as no other event uses it.
    /// Returns `false` when `id` is unknown or the new id collides.
    pub fn update_event(&mut self, id: &str, updated: Event) -> bool {
        let Some(index) = self.events.get_index_of(id) else {
            return false;
        };

        if updated.id == id {
            self.events[index] = updated;
            return true;
        }

        if self.events.contains_key(&updated.id) {
            log::warn!(
                "Cannot rename event '{}' to '{}': id already in use",
                id,
                updated.id
            );
            return false;
        }

        self.events.shift_remove_index(index);
        self.events.shift_insert(index, updated.id.clone(), updated);
        true
    }

    /// Remove all events
    pub fn clear(&mut self) {
        self.events.clear();
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // LOOKUP
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.get(id)
    }

    pub fn event_mut(&mut self, id: &str) -> Option<&mut Event> {
        self.events.get_mut(id)
    }

    /// All events in insertion order
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    /// Active events in insertion order
    pub fn active_events(&self) -> impl Iterator<Item = &Event> {
        self.events.values().filter(|event| event.active)
    }

    /// Events failing validation
    pub fn invalid_events(&self) -> impl Iterator<Item = &Event> {
        self.events.values().filter(|event| !event.is_valid())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.active_events().count()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACTIVATION
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn activate(&mut self, id: &str) {
        self.set_active(id, true);
    }

    pub fn deactivate(&mut self, id: &str) {
        self.set_active(id, false);
    }

    pub fn toggle(&mut self, id: &str) {
        if let Some(event) = self.events.get_mut(id) {
            event.active = !event.active;
        }
    }

    fn set_active(&mut self, id: &str, active: bool) {
        if let Some(event) = self.events.get_mut(id) {
            event.active = active;
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EVALUATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Events firing for this round, in insertion order.
    ///
    /// Every event is evaluated, so `rng` advances once per active random trigger.
    pub fn triggered_events<R: Rng + ?Sized>(
        &self,
        ctx: &TriggerContext,
        rng: &mut R,
    ) -> Vec<&Event> {
        self.events
            .values()
            .filter(|event| event.should_trigger(ctx, rng))
            .collect()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON array of every event, active or not
    pub fn to_json(&self) -> EventResult<String> {
        let events: Vec<&Event> = self.events.values().collect();
        Ok(serde_json::to_string(&events)?)
    }

    /// Pretty-printed variant of [`to_json`](Self::to_json)
    pub fn to_json_pretty(&self) -> EventResult<String> {
        let events: Vec<&Event> = self.events.values().collect();
        Ok(serde_json::to_string_pretty(&events)?)
    }

    /// Parse a JSON array of events, dropping later duplicates
    pub fn from_json(json: &str) -> EventResult<Self> {
        let events: Vec<Event> = serde_json::from_str(json)?;
        Ok(Self::from_events(events))
    }
}
