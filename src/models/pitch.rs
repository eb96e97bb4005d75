//! Pitch and PitchBreakItem: the tournament-wide playing resources.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a pitch.
pub type PitchId = Uuid;

/// Unique identifier for a break window.
pub type BreakId = Uuid;

/// A physical pitch shared by every competition of the tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pitch {
    pub id: PitchId,
    pub name: String,
    /// Daily opening time (`HH:mm`); schedulers fall back to the configured default.
    #[serde(default)]
    pub start_time: Option<String>,
    /// Daily closing time (`HH:mm`). Informational only, placements are not checked against it.
    #[serde(default)]
    pub end_time: Option<String>,
}

impl Pitch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start_time: None,
            end_time: None,
        }
    }

    /// Same pitch opening at `start` (`HH:mm`).
    pub fn opening_at(mut self, start: impl Into<String>) -> Self {
        self.start_time = Some(start.into());
        self
    }
}

/// A maintenance or lunch window during which a pitch hosts nothing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchBreakItem {
    pub id: BreakId,
    pub pitch_id: PitchId,
    /// Window start (`HH:mm`).
    pub start_time: String,
    /// Window length in minutes.
    pub duration: u32,
    #[serde(default)]
    pub label: String,
}

impl PitchBreakItem {
    pub fn new(
        pitch_id: PitchId,
        start_time: impl Into<String>,
        duration: u32,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            pitch_id,
            start_time: start_time.into(),
            duration,
            label: label.into(),
        }
    }
}
