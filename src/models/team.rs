//! Team and Group data structures.

use crate::models::pitch::PitchId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (used in fixtures and lookups).
pub type TeamId = Uuid;

/// Unique identifier for a group within a competition.
pub type GroupId = Uuid;

/// A team entered in a competition.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Group this team plays its group stage in, if any.
    #[serde(default)]
    pub group_id: Option<GroupId>,
    /// Display colour (e.g. `#1f77b4`), purely visual.
    #[serde(default)]
    pub color: Option<String>,
}

impl Team {
    /// Create a new team with the given name and no group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            group_id: None,
            color: None,
        }
    }

    /// Same team placed in a group.
    pub fn in_group(mut self, group_id: GroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }
}

/// A group-stage pool of teams with its own timing defaults and pitch pool.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    /// Minutes per fixture when a fixture carries no duration of its own.
    #[serde(default)]
    pub default_duration: Option<u32>,
    /// Minutes the pitch stays free after each fixture of this group.
    #[serde(default)]
    pub default_slack: Option<u32>,
    /// Minimum recovery minutes between a team's fixtures (carried, not enforced).
    #[serde(default)]
    pub default_rest: Option<u32>,
    /// Ordered pitch pool the group's fixtures rotate over.
    #[serde(default)]
    pub pitch_ids: Vec<PitchId>,
    /// Fallback pitch when the pool is empty or stale.
    #[serde(default)]
    pub primary_pitch_id: Option<PitchId>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Same group restricted to the given pitch pool.
    pub fn with_pitches(mut self, pitch_ids: Vec<PitchId>) -> Self {
        self.pitch_ids = pitch_ids;
        self
    }

    /// Drop every reference to a deleted pitch.
    pub fn forget_pitch(&mut self, pitch_id: PitchId) {
        self.pitch_ids.retain(|p| *p != pitch_id);
        if self.primary_pitch_id == Some(pitch_id) {
            self.primary_pitch_id = None;
        }
    }
}
