//! Scheduling defaults, overridable from the environment.

use serde::{Deserialize, Serialize};

/// Defaults applied when a fixture, group or pitch does not say otherwise.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    /// Minutes per generated fixture.
    pub default_duration: u32,
    /// Minutes a pitch stays free after each fixture.
    pub default_slack: u32,
    /// Pitch opening time (`HH:mm`) used when a pitch has none or it does not parse.
    pub default_start_time: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_duration: 20,
            default_slack: 5,
            default_start_time: "10:00".to_string(),
        }
    }
}

impl SchedulerConfig {
    /// Defaults overridden by `SCHEDULER_DEFAULT_DURATION`, `SCHEDULER_DEFAULT_SLACK` and
    /// `SCHEDULER_DEFAULT_START`. Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(v) = env_u32("SCHEDULER_DEFAULT_DURATION") {
            config.default_duration = v;
        }
        if let Some(v) = env_u32("SCHEDULER_DEFAULT_SLACK") {
            config.default_slack = v;
        }
        if let Ok(v) = std::env::var("SCHEDULER_DEFAULT_START") {
            if crate::logic::parse_time(&v).is_some() {
                config.default_start_time = v.trim().to_string();
            } else {
                log::warn!("Ignoring SCHEDULER_DEFAULT_START={:?}: not HH:mm", v);
            }
        }
        config
    }

    /// Default pitch opening as minutes from midnight (10:00 if the configured value is malformed).
    pub fn default_start_minutes(&self) -> u32 {
        crate::logic::time_to_minutes(Some(&self.default_start_time), crate::logic::DEFAULT_START_MINUTES)
    }
}

fn env_u32(key: &str) -> Option<u32> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("Ignoring {}={:?}: not a whole number of minutes", key, raw);
            None
        }
    }
}
