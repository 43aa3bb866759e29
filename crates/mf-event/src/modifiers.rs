//! Event modifiers: what an event changes while it is active

use serde::{Deserialize, Serialize};

/// Free spins awarded by an event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FreeSpinsAward {
    pub count: u32,
    pub multiplier: f64,
}

/// Progressive jackpot attached to an event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressiveJackpot {
    /// Starting pool value
    pub seed_value: f64,
    /// Fraction of each bet added to the pool
    pub contribution: f64,
}

/// Modifiers applied when an event triggers.
///
/// Optional blocks serialize as `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventModifiers {
    /// RTP multiplier (1.0 = unchanged)
    pub rtp_boost: f64,
    /// Hit-frequency multiplier (1.0 = unchanged)
    pub hit_frequency_boost: f64,
    #[serde(default)]
    pub max_multiplier_override: Option<i64>,
    #[serde(default)]
    pub free_spins: Option<FreeSpinsAward>,
    #[serde(default)]
    pub progressive_jackpot: Option<ProgressiveJackpot>,
}

impl Default for EventModifiers {
    fn default() -> Self {
        Self {
            rtp_boost: 1.0,
            hit_frequency_boost: 1.0,
            max_multiplier_override: None,
            free_spins: None,
            progressive_jackpot: None,
        }
    }
}

impl EventModifiers {
    /// Neutral modifiers with an RTP boost
    pub fn rtp_boost(boost: f64) -> Self {
        Self {
            rtp_boost: boost,
            ..Self::default()
        }
    }

    pub fn with_hit_frequency_boost(mut self, boost: f64) -> Self {
        self.hit_frequency_boost = boost;
        self
    }

    pub fn with_max_multiplier(mut self, max: i64) -> Self {
        self.max_multiplier_override = Some(max);
        self
    }

    pub fn with_free_spins(mut self, count: u32, multiplier: f64) -> Self {
        self.free_spins = Some(FreeSpinsAward { count, multiplier });
        self
    }

    pub fn with_progressive_jackpot(mut self, seed_value: f64, contribution: f64) -> Self {
        self.progressive_jackpot = Some(ProgressiveJackpot {
            seed_value,
            contribution,
        });
        self
    }

    /// True when nothing is changed
    pub fn is_neutral(&self) -> bool {
        self.rtp_boost == 1.0
            && self.hit_frequency_boost == 1.0
            && self.max_multiplier_override.is_none()
            && self.free_spins.is_none()
            && self.progressive_jackpot.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_is_neutral() {
        assert!(EventModifiers::default().is_neutral());
        assert!(!EventModifiers::rtp_boost(1.05).is_neutral());
    }

    #[test]
    fn test_absent_optionals_serialize_as_null() {
        let json = serde_json::to_value(EventModifiers::rtp_boost(1.1)).unwrap();
        assert_eq!(
            json,
            json!({
                "rtpBoost": 1.1,
                "hitFrequencyBoost": 1.0,
                "maxMultiplierOverride": null,
                "freeSpins": null,
                "progressiveJackpot": null,
            })
        );
    }

    #[test]
    fn test_present_optionals() {
        let modifiers = EventModifiers::default()
            .with_max_multiplier(500)
            .with_free_spins(10, 2.0)
            .with_progressive_jackpot(1000.0, 0.01);
        let json = serde_json::to_value(&modifiers).unwrap();
        assert_eq!(json["maxMultiplierOverride"], 500);
        assert_eq!(json["freeSpins"], json!({"count": 10, "multiplier": 2.0}));
        assert_eq!(
            json["progressiveJackpot"],
            json!({"seedValue": 1000.0, "contribution": 0.01})
        );

        let back: EventModifiers = serde_json::from_value(json).unwrap();
        assert_eq!(back, modifiers);
    }

    #[test]
    fn test_missing_optionals_deserialize_as_none() {
        let modifiers: EventModifiers =
            serde_json::from_str(r#"{"rtpBoost":1.2,"hitFrequencyBoost":0.9}"#).unwrap();
        assert_eq!(modifiers.max_multiplier_override, None);
        assert_eq!(modifiers.free_spins, None);
        assert_eq!(modifiers.progressive_jackpot, None);
    }
}
