//! Fixture (match), Stage, Participant and the fixture timing state.

use crate::models::pitch::PitchId;
use crate::models::team::{GroupId, TeamId};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a fixture.
pub type FixtureId = Uuid;

/// Unique identifier for a competition.
pub type CompetitionId = Uuid;

/// Placeholder used for a slot whose team is not known yet.
pub const TBD: &str = "TBD";

/// Phase of the competition a fixture belongs to.
///
/// Serialized as its display label so free-form knockout labels survive a round trip.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Stage {
    #[default]
    Group,
    RoundOf16,
    QuarterFinal,
    SemiFinal,
    ThirdPlacePlayoff,
    Final,
    /// Any other knockout label.
    Knockout(String),
}

impl Stage {
    pub fn label(&self) -> &str {
        match self {
            Stage::Group => "Group",
            Stage::RoundOf16 => "Round of 16",
            Stage::QuarterFinal => "Quarter-Final",
            Stage::SemiFinal => "Semi-Final",
            Stage::ThirdPlacePlayoff => "3rd Place Playoff",
            Stage::Final => "Final",
            Stage::Knockout(label) => label,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Stage::Group)
    }

    /// Rounds produced by the bracket builder. Free-form labels are not.
    pub fn is_bracket(&self) -> bool {
        matches!(
            self,
            Stage::RoundOf16
                | Stage::QuarterFinal
                | Stage::SemiFinal
                | Stage::ThirdPlacePlayoff
                | Stage::Final
        )
    }

    /// Knockout precedence tier. `None` for the group stage.
    ///
    /// Final and 3rd Place Playoff share a tier; free-form labels sit in the first tier.
    pub fn tier(&self) -> Option<u32> {
        match self {
            Stage::Group => None,
            Stage::RoundOf16 | Stage::Knockout(_) => Some(0),
            Stage::QuarterFinal => Some(1),
            Stage::SemiFinal => Some(2),
            Stage::ThirdPlacePlayoff | Stage::Final => Some(3),
        }
    }

    /// Short prefix for bracket placeholders ("Winner QF1").
    pub fn short_code(&self) -> &str {
        match self {
            Stage::Group => "G",
            Stage::RoundOf16 => "R16",
            Stage::QuarterFinal => "QF",
            Stage::SemiFinal => "SF",
            Stage::ThirdPlacePlayoff => "3P",
            Stage::Final => "F",
            Stage::Knockout(label) => label,
        }
    }
}

impl From<String> for Stage {
    fn from(label: String) -> Self {
        match label.trim() {
            "" | "Group" => Stage::Group,
            "Round of 16" => Stage::RoundOf16,
            "Quarter-Final" => Stage::QuarterFinal,
            "Semi-Final" => Stage::SemiFinal,
            "3rd Place Playoff" => Stage::ThirdPlacePlayoff,
            "Final" => Stage::Final,
            other => Stage::Knockout(other.to_string()),
        }
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        stage.label().to_string()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One side of a fixture: a real team, or a placeholder such as `"TBD"` or `"Winner SF1"`.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Participant {
    Team(TeamId),
    Placeholder(String),
}

impl Participant {
    pub fn tbd() -> Self {
        Participant::Placeholder(TBD.to_string())
    }

    pub fn team_id(&self) -> Option<TeamId> {
        match self {
            Participant::Team(id) => Some(*id),
            Participant::Placeholder(_) => None,
        }
    }

    pub fn is_team(&self, team_id: TeamId) -> bool {
        self.team_id() == Some(team_id)
    }
}

impl From<TeamId> for Participant {
    fn from(id: TeamId) -> Self {
        Participant::Team(id)
    }
}

/// Where a fixture is in the timing lifecycle.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingState {
    /// No pitch assigned.
    #[default]
    Unplaced,
    /// Pitch and start time come from an allocator or recalculation pass.
    Tentative,
    /// Survived an overlap-enforcement pass without being moved.
    Confirmed,
}

/// A single match between two teams (or placeholders) within a competition.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub id: FixtureId,
    pub competition_id: CompetitionId,
    pub home_team_id: Participant,
    pub away_team_id: Participant,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub stage: Stage,
    #[serde(default)]
    pub pitch_id: Option<PitchId>,
    /// Kick-off (`HH:mm`).
    #[serde(default)]
    pub start_time: Option<String>,
    /// Minutes.
    pub duration: u32,
    /// Per-fixture override of the group's slack.
    #[serde(default)]
    pub slack: Option<u32>,
    /// Per-fixture override of the group's rest.
    #[serde(default)]
    pub rest: Option<u32>,
    /// Idle minutes a scheduler inserted before this fixture beyond the pitch's natural continuation.
    #[serde(default)]
    pub slack_before: Option<u32>,
    /// `CODE.NN`, regenerated from list position.
    #[serde(default)]
    pub match_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub timing: TimingState,
}

impl Fixture {
    pub fn new(
        competition_id: CompetitionId,
        home: impl Into<Participant>,
        away: impl Into<Participant>,
        stage: Stage,
        duration: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            competition_id,
            home_team_id: home.into(),
            away_team_id: away.into(),
            group_id: None,
            stage,
            pitch_id: None,
            start_time: None,
            duration,
            slack: None,
            rest: None,
            slack_before: None,
            match_id: None,
            description: None,
            timing: TimingState::Unplaced,
        }
    }

    /// `stage` absent or `Group`.
    pub fn is_group_stage(&self) -> bool {
        self.stage.is_group()
    }

    pub fn involves(&self, team_id: TeamId) -> bool {
        self.home_team_id.is_team(team_id) || self.away_team_id.is_team(team_id)
    }

    pub fn is_placed(&self) -> bool {
        self.pitch_id.is_some() && self.start_time.is_some()
    }

    /// Back to `Unplaced`: no pitch, no time, no gap.
    pub fn clear_placement(&mut self) {
        self.pitch_id = None;
        self.start_time = None;
        self.slack_before = None;
        self.timing = TimingState::Unplaced;
    }
}
