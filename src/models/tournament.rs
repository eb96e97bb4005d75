//! Tournament snapshot and TournamentError.

use crate::models::competition::Competition;
use crate::models::fixture::{CompetitionId, FixtureId};
use crate::models::pitch::{BreakId, Pitch, PitchBreakItem, PitchId};
use crate::models::team::{GroupId, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur while applying a command to a tournament.
///
/// The scheduling passes themselves never fail; only structural edits that name a missing
/// entity or carry malformed input do.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    CompetitionNotFound(CompetitionId),
    TeamNotFound(TeamId),
    GroupNotFound(GroupId),
    PitchNotFound(PitchId),
    BreakNotFound(BreakId),
    FixtureNotFound(FixtureId),
    /// Competition codes are 2-3 letters.
    InvalidCompetitionCode(String),
    /// Names must not be blank.
    EmptyName,
    /// Not a `HH:mm` time.
    InvalidTime(String),
    /// Target position outside the fixture list.
    IndexOutOfRange(usize),
    /// A knockout bracket cannot start at this stage.
    InvalidStage(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::CompetitionNotFound(_) => write!(f, "Competition not found"),
            TournamentError::TeamNotFound(_) => write!(f, "Team not found"),
            TournamentError::GroupNotFound(_) => write!(f, "Group not found"),
            TournamentError::PitchNotFound(_) => write!(f, "Pitch not found"),
            TournamentError::BreakNotFound(_) => write!(f, "Break not found"),
            TournamentError::FixtureNotFound(_) => write!(f, "Fixture not found"),
            TournamentError::InvalidCompetitionCode(code) => {
                write!(f, "Competition code must be 2-3 letters (got '{}')", code)
            }
            TournamentError::EmptyName => write!(f, "Name must not be empty"),
            TournamentError::InvalidTime(t) => write!(f, "Invalid time '{}', expected HH:mm", t),
            TournamentError::IndexOutOfRange(i) => write!(f, "Position {} is out of range", i),
            TournamentError::InvalidStage(stage) => {
                write!(f, "A knockout bracket cannot start at '{}'", stage)
            }
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Whole-tournament snapshot: every competition plus the shared pitches and their breaks.
///
/// Commands consume a snapshot and return the next one; nothing mutates it in place from outside.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    /// Bumped by every applied command.
    pub version: u64,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub competitions: Vec<Competition>,
    #[serde(default)]
    pub pitches: Vec<Pitch>,
    #[serde(default)]
    pub breaks: Vec<PitchBreakItem>,
}

impl Default for Tournament {
    fn default() -> Self {
        Self::new()
    }
}

impl Tournament {
    /// Create an empty tournament at version 0.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            version: 0,
            updated_at: Utc::now(),
            competitions: Vec::new(),
            pitches: Vec::new(),
            breaks: Vec::new(),
        }
    }

    pub fn competition(&self, id: CompetitionId) -> Option<&Competition> {
        self.competitions.iter().find(|c| c.id == id)
    }

    /// Mutable competition lookup that reports a missing id as an error.
    pub fn competition_mut(
        &mut self,
        id: CompetitionId,
    ) -> Result<&mut Competition, TournamentError> {
        self.competitions
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(TournamentError::CompetitionNotFound(id))
    }

    pub fn pitch(&self, id: PitchId) -> Option<&Pitch> {
        self.pitches.iter().find(|p| p.id == id)
    }

    /// Delete a pitch: its breaks go, group pools forget it, and every fixture on it becomes unplaced.
    pub fn remove_pitch(&mut self, id: PitchId) -> Result<Pitch, TournamentError> {
        let idx = self
            .pitches
            .iter()
            .position(|p| p.id == id)
            .ok_or(TournamentError::PitchNotFound(id))?;
        let pitch = self.pitches.remove(idx);
        self.breaks.retain(|b| b.pitch_id != id);
        for c in &mut self.competitions {
            for g in &mut c.groups {
                g.forget_pitch(id);
            }
            for f in &mut c.fixtures {
                if f.pitch_id == Some(id) {
                    f.clear_placement();
                }
            }
        }
        Ok(pitch)
    }

    /// Mark a new snapshot version.
    pub fn touch(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }

    /// Fixtures across all competitions that have no pitch.
    pub fn unscheduled_count(&self) -> usize {
        self.competitions
            .iter()
            .flat_map(|c| c.fixtures.iter())
            .filter(|f| !f.is_placed())
            .count()
    }
}
