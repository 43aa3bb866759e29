//! Event triggers
//!
//! A trigger decides, for one game round, whether its event fires:
//! - `Time`: weekday set plus an inclusive `HH:MM` window
//! - `GameCount`: every N-th game (N > 0)
//! - `Random`: independent draw per evaluation
//!
//! Random triggers never own a generator. The caller passes one in, so a
//! seeded generator makes evaluation reproducible.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default window start for new time triggers
pub const DEFAULT_START_TIME: &str = "00:00";
/// Default window end for new time triggers
pub const DEFAULT_END_TIME: &str = "23:59";
/// Default interval for new game-count triggers
pub const DEFAULT_EVERY_N_GAMES: u32 = 1000;
/// Default chance for new random triggers
pub const DEFAULT_PROBABILITY: f64 = 0.05;

/// Share of a selected day a time window is assumed to cover when estimating
/// activation rates.
const TIME_WINDOW_DAY_SHARE: f64 = 0.5;

// ═══════════════════════════════════════════════════════════════════════════════
// TRIGGER
// ═══════════════════════════════════════════════════════════════════════════════

/// Condition under which an event fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventTrigger {
    /// Fires on the configured weekdays inside `[start_time, end_time]`
    #[serde(rename_all = "camelCase")]
    Time {
        #[serde(with = "weekday_names")]
        days_of_week: Vec<Weekday>,
        start_time: String,
        end_time: String,
    },
    /// Fires on every N-th game
    #[serde(rename_all = "camelCase")]
    GameCount { every_n_games: u32 },
    /// Fires with the given probability on each evaluation
    Random { probability: f64 },
}

impl Default for EventTrigger {
    fn default() -> Self {
        Self::Random {
            probability: DEFAULT_PROBABILITY,
        }
    }
}

impl EventTrigger {
    /// Time window trigger. Duplicate days are dropped, first occurrence wins.
    pub fn time(
        days: impl IntoIterator<Item = Weekday>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        let mut days_of_week = Vec::new();
        for day in days {
            if !days_of_week.contains(&day) {
                days_of_week.push(day);
            }
        }
        Self::Time {
            days_of_week,
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    /// Game-count trigger
    pub fn game_count(every_n_games: u32) -> Self {
        Self::GameCount { every_n_games }
    }

    /// Random trigger
    pub fn random(probability: f64) -> Self {
        Self::Random { probability }
    }

    /// Tag used in the events manifest
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Time { .. } => "time",
            Self::GameCount { .. } => "game_count",
            Self::Random { .. } => "random",
        }
    }

    /// Evaluate against one round.
    ///
    /// `rng` is only consumed by `Random` triggers.
    pub fn evaluate<R: Rng + ?Sized>(&self, ctx: &TriggerContext, rng: &mut R) -> bool {
        match self {
            Self::Time {
                days_of_week,
                start_time,
                end_time,
            } => {
                let Some(day) = ctx.day else {
                    return false;
                };
                if !days_of_week.contains(&day) {
                    return false;
                }
                let window = (
                    ctx.time.as_deref().and_then(parse_clock_minutes),
                    parse_clock_minutes(start_time),
                    parse_clock_minutes(end_time),
                );
                match window {
                    (Some(now), Some(start), Some(end)) => now >= start && now <= end,
                    _ => false,
                }
            }
            Self::GameCount { every_n_games } => {
                *every_n_games > 0
                    && ctx.game_count > 0
                    && ctx.game_count % u64::from(*every_n_games) == 0
            }
            Self::Random { probability } => rng.random::<f64>() < *probability,
        }
    }

    /// Check the trigger's own parameters
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Time {
                days_of_week,
                start_time,
                end_time,
            } => {
                if days_of_week.is_empty() {
                    return Err("time trigger needs at least one day".into());
                }
                if parse_clock_minutes(start_time).is_none() {
                    return Err(format!("malformed start time '{start_time}'"));
                }
                if parse_clock_minutes(end_time).is_none() {
                    return Err(format!("malformed end time '{end_time}'"));
                }
                Ok(())
            }
            Self::GameCount { every_n_games } => {
                if *every_n_games == 0 {
                    Err("everyNGames must be greater than 0".into())
                } else {
                    Ok(())
                }
            }
            Self::Random { probability } => {
                if (0.0..=1.0).contains(probability) {
                    Ok(())
                } else {
                    Err(format!("probability {probability} outside [0, 1]"))
                }
            }
        }
    }

    /// Rough fraction of rounds on which this trigger fires
    pub fn estimated_activation_rate(&self) -> f64 {
        match self {
            Self::Time { days_of_week, .. } => {
                days_of_week.len() as f64 / 7.0 * TIME_WINDOW_DAY_SHARE
            }
            Self::GameCount { every_n_games } => {
                if *every_n_games == 0 {
                    0.0
                } else {
                    1.0 / f64::from(*every_n_games)
                }
            }
            Self::Random { probability } => probability.clamp(0.0, 1.0),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONTEXT
// ═══════════════════════════════════════════════════════════════════════════════

/// Signals a trigger is evaluated against
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerContext {
    /// 1-based round number (0 never fires a game-count trigger)
    pub game_count: u64,
    /// Current weekday, if known
    pub day: Option<Weekday>,
    /// Current wall-clock time as `HH:MM`, if known
    pub time: Option<String>,
}

impl TriggerContext {
    /// Round-count signal only
    pub fn game(game_count: u64) -> Self {
        Self {
            game_count,
            day: None,
            time: None,
        }
    }

    /// Round count plus weekday/time taken from a timestamp
    pub fn at(game_count: u64, datetime: &NaiveDateTime) -> Self {
        Self {
            game_count,
            day: Some(datetime.weekday()),
            time: Some(format!("{:02}:{:02}", datetime.hour(), datetime.minute())),
        }
    }

    /// Set weekday and time explicitly
    pub fn with_clock(mut self, day: Weekday, time: impl Into<String>) -> Self {
        self.day = Some(day);
        self.time = Some(time.into());
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Parse `HH:MM` into minutes since midnight (`hours * 60 + minutes`).
///
/// Returns `None` for anything that is not two unsigned integers around a colon.
pub fn parse_clock_minutes(time: &str) -> Option<u32> {
    let (hours, minutes) = time.trim().split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    hours.checked_mul(60)?.checked_add(minutes)
}

/// Full English weekday name, as written to the events manifest
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

mod weekday_names {
    use chrono::Weekday;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(days: &[Weekday], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(days.iter().map(|day| super::weekday_name(*day)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Weekday>, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        let mut days = Vec::with_capacity(names.len());
        for name in names {
            let day = name
                .parse::<Weekday>()
                .map_err(|_| D::Error::custom(format!("unknown weekday '{name}'")))?;
            if !days.contains(&day) {
                days.push(day);
            }
        }
        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn test_parse_clock_minutes() {
        assert_eq!(parse_clock_minutes("00:00"), Some(0));
        assert_eq!(parse_clock_minutes("23:59"), Some(23 * 60 + 59));
        assert_eq!(parse_clock_minutes("9:05"), Some(545));
        assert_eq!(parse_clock_minutes("0905"), None);
        assert_eq!(parse_clock_minutes("ab:cd"), None);
        assert_eq!(parse_clock_minutes(""), None);
        assert_eq!(parse_clock_minutes("-1:00"), None);
    }

    #[test]
    fn test_time_window_is_inclusive() {
        let trigger = EventTrigger::time([Weekday::Fri, Weekday::Sat], "18:00", "22:00");
        let mut rng = rng();

        let at = |time: &str| TriggerContext::game(1).with_clock(Weekday::Fri, time);
        assert!(trigger.evaluate(&at("18:00"), &mut rng));
        assert!(trigger.evaluate(&at("20:30"), &mut rng));
        assert!(trigger.evaluate(&at("22:00"), &mut rng));
        assert!(!trigger.evaluate(&at("17:59"), &mut rng));
        assert!(!trigger.evaluate(&at("22:01"), &mut rng));

        let monday = TriggerContext::game(1).with_clock(Weekday::Mon, "19:00");
        assert!(!trigger.evaluate(&monday, &mut rng));
    }

    #[test]
    fn test_time_trigger_without_clock_never_fires() {
        let trigger = EventTrigger::time([Weekday::Mon], "00:00", "23:59");
        assert!(!trigger.evaluate(&TriggerContext::game(10), &mut rng()));
    }

    #[test]
    fn test_malformed_times_never_fire() {
        let trigger = EventTrigger::time([Weekday::Mon], "noon", "23:59");
        let ctx = TriggerContext::game(1).with_clock(Weekday::Mon, "12:00");
        assert!(!trigger.evaluate(&ctx, &mut rng()));

        let trigger = EventTrigger::time([Weekday::Mon], "00:00", "23:59");
        let ctx = TriggerContext::game(1).with_clock(Weekday::Mon, "later");
        assert!(!trigger.evaluate(&ctx, &mut rng()));
    }

    #[test]
    fn test_context_from_datetime() {
        let dt = chrono::NaiveDate::from_ymd_opt(2024, 3, 15)
            .and_then(|d| d.and_hms_opt(9, 7, 30))
            .unwrap();
        let ctx = TriggerContext::at(3, &dt);
        assert_eq!(ctx.day, Some(Weekday::Fri));
        assert_eq!(ctx.time.as_deref(), Some("09:07"));
    }

    #[test]
    fn test_game_count_fires_on_multiples_only() {
        let trigger = EventTrigger::game_count(1000);
        let mut rng = rng();

        for round in 0..=10_000u64 {
            let fired = trigger.evaluate(&TriggerContext::game(round), &mut rng);
            assert_eq!(fired, round > 0 && round % 1000 == 0, "round {round}");
        }
    }

    #[test]
    fn test_game_count_zero_interval_never_fires() {
        let trigger = EventTrigger::game_count(0);
        assert!(!trigger.evaluate(&TriggerContext::game(1000), &mut rng()));
    }

    #[test]
    fn test_random_extremes() {
        let mut rng = rng();
        let never = EventTrigger::random(0.0);
        let always = EventTrigger::random(1.0);
        for round in 1..=1000 {
            assert!(!never.evaluate(&TriggerContext::game(round), &mut rng));
            assert!(always.evaluate(&TriggerContext::game(round), &mut rng));
        }
    }

    #[test]
    fn test_random_is_reproducible_with_seeded_rng() {
        let trigger = EventTrigger::random(0.3);
        let run = || {
            let mut rng = ChaCha8Rng::seed_from_u64(99);
            (1..=500)
                .map(|n| trigger.evaluate(&TriggerContext::game(n), &mut rng))
                .collect::<Vec<_>>()
        };
        let first = run();
        assert_eq!(first, run());

        let hits = first.iter().filter(|&&fired| fired).count();
        assert!(hits > 100 && hits < 200, "hits = {hits}");
    }

    #[test]
    fn test_validate() {
        assert!(EventTrigger::time([Weekday::Mon], "00:00", "23:59").validate().is_ok());
        assert!(EventTrigger::time(Vec::<Weekday>::new(), "00:00", "23:59").validate().is_err());
        assert!(EventTrigger::time([Weekday::Mon], "bad", "23:59").validate().is_err());
        assert!(EventTrigger::time([Weekday::Mon], "00:00", "").validate().is_err());
        assert!(EventTrigger::game_count(1).validate().is_ok());
        assert!(EventTrigger::game_count(0).validate().is_err());
        assert!(EventTrigger::random(0.0).validate().is_ok());
        assert!(EventTrigger::random(1.0).validate().is_ok());
        assert!(EventTrigger::random(1.01).validate().is_err());
        assert!(EventTrigger::random(-0.1).validate().is_err());
    }

    #[test]
    fn test_duplicate_days_dropped() {
        let trigger = EventTrigger::time([Weekday::Sat, Weekday::Sun, Weekday::Sat], "10:00", "11:00");
        match trigger {
            EventTrigger::Time { days_of_week, .. } => {
                assert_eq!(days_of_week, vec![Weekday::Sat, Weekday::Sun]);
            }
            _ => panic!("expected time trigger"),
        }
    }

    #[test]
    fn test_serialized_tags() {
        let time = EventTrigger::time([Weekday::Mon, Weekday::Sun], "08:00", "12:30");
        let json = serde_json::to_value(&time).unwrap();
        assert_eq!(json["type"], "time");
        assert_eq!(json["daysOfWeek"], serde_json::json!(["Monday", "Sunday"]));
        assert_eq!(json["startTime"], "08:00");
        assert_eq!(json["endTime"], "12:30");

        let count = serde_json::to_value(EventTrigger::game_count(250)).unwrap();
        assert_eq!(count, serde_json::json!({"type": "game_count", "everyNGames": 250}));

        let random = serde_json::to_value(EventTrigger::random(0.25)).unwrap();
        assert_eq!(random, serde_json::json!({"type": "random", "probability": 0.25}));
    }

    #[test]
    fn test_deserialize_accepts_short_day_names() {
        let json = r#"{"type":"time","daysOfWeek":["Mon","friday","Mon"],"startTime":"01:00","endTime":"02:00"}"#;
        let trigger: EventTrigger = serde_json::from_str(json).unwrap();
        assert_eq!(
            trigger,
            EventTrigger::time([Weekday::Mon, Weekday::Fri], "01:00", "02:00")
        );

        let bad = r#"{"type":"time","daysOfWeek":["Someday"],"startTime":"01:00","endTime":"02:00"}"#;
        assert!(serde_json::from_str::<EventTrigger>(bad).is_err());
    }

    #[test]
    fn test_estimated_activation_rate() {
        let time = EventTrigger::time([Weekday::Sat, Weekday::Sun], "00:00", "23:59");
        assert!((time.estimated_activation_rate() - 2.0 / 7.0 * 0.5).abs() < 1e-12);
        assert!((EventTrigger::game_count(200).estimated_activation_rate() - 0.005).abs() < 1e-12);
        assert_eq!(EventTrigger::random(0.1).estimated_activation_rate(), 0.1);
    }
}
