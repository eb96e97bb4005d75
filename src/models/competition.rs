//! Competition: owns teams, groups and the ordered fixture list.

use crate::models::fixture::{CompetitionId, Fixture, FixtureId, Participant, Stage};
use crate::models::team::{Group, GroupId, Team, TeamId};
use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A competition (e.g. "U12 Boys") inside a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: CompetitionId,
    pub name: String,
    /// 2-3 uppercase letters, prefix of every `matchId`.
    pub code: String,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub groups: Vec<Group>,
    /// Ordered; list position drives `matchId`.
    #[serde(default)]
    pub fixtures: Vec<Fixture>,
}

/// `"<code>.<NN>"` for a 0-based list position.
pub fn match_id_for(code: &str, position: usize) -> String {
    format!("{}.{:02}", code, position + 1)
}

/// Validate and normalise a competition code: 2-3 ASCII letters, uppercased.
pub fn normalize_code(code: &str) -> Result<String, TournamentError> {
    let code = code.trim();
    let len_ok = (2..=3).contains(&code.len());
    if !len_ok || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(TournamentError::InvalidCompetitionCode(code.to_string()));
    }
    Ok(code.to_ascii_uppercase())
}

impl Competition {
    /// Create an empty competition. Fails on an empty name or a malformed code.
    pub fn new(name: impl Into<String>, code: &str) -> Result<Self, TournamentError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            code: normalize_code(code)?,
            teams: Vec::new(),
            groups: Vec::new(),
            fixtures: Vec::new(),
        })
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == id)
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn fixture(&self, id: FixtureId) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| f.id == id)
    }

    pub fn fixture_mut(&mut self, id: FixtureId) -> Option<&mut Fixture> {
        self.fixtures.iter_mut().find(|f| f.id == id)
    }

    /// Teams of one group, in entry order.
    pub fn teams_in_group(&self, group_id: GroupId) -> Vec<Team> {
        self.teams
            .iter()
            .filter(|t| t.group_id == Some(group_id))
            .cloned()
            .collect()
    }

    /// Rewrite every fixture's `matchId` from its current list position.
    pub fn regenerate_match_ids(&mut self) {
        let code = self.code.clone();
        for (i, f) in self.fixtures.iter_mut().enumerate() {
            f.match_id = Some(match_id_for(&code, i));
        }
    }

    /// Append a fixture and renumber.
    pub fn add_fixture(&mut self, mut fixture: Fixture) {
        fixture.competition_id = self.id;
        self.fixtures.push(fixture);
        self.regenerate_match_ids();
    }

    /// Insert or replace fixtures keyed by `matchId`.
    ///
    /// An incoming fixture whose `matchId` matches an existing one replaces it in place and keeps
    /// the existing fixture's id; anything else is appended. Ids are renumbered afterwards.
    pub fn upsert_fixtures(&mut self, incoming: Vec<Fixture>) {
        for mut fixture in incoming {
            fixture.competition_id = self.id;
            let existing = fixture.match_id.as_ref().and_then(|mid| {
                self.fixtures
                    .iter()
                    .position(|f| f.match_id.as_ref() == Some(mid))
            });
            match existing {
                Some(idx) => {
                    fixture.id = self.fixtures[idx].id;
                    self.fixtures[idx] = fixture;
                }
                None => self.fixtures.push(fixture),
            }
        }
        self.regenerate_match_ids();
    }

    /// Swap in a freshly built bracket.
    ///
    /// Every existing bracket fixture is dropped and the new ones are appended; everything else
    /// keeps its place. A new fixture takes over the id of the old one at the same stage and
    /// position within that stage.
    pub fn replace_bracket(&mut self, bracket: Vec<Fixture>) {
        let (old, kept): (Vec<Fixture>, Vec<Fixture>) = std::mem::take(&mut self.fixtures)
            .into_iter()
            .partition(|f| f.stage.is_bracket());
        self.fixtures = kept;
        let mut seen: Vec<(Stage, usize)> = Vec::new();
        for mut fixture in bracket {
            let nth = match seen.iter_mut().find(|(stage, _)| *stage == fixture.stage) {
                Some((_, n)) => {
                    *n += 1;
                    *n
                }
                None => {
                    seen.push((fixture.stage.clone(), 0));
                    0
                }
            };
            if let Some(previous) = old.iter().filter(|f| f.stage == fixture.stage).nth(nth) {
                fixture.id = previous.id;
            }
            fixture.competition_id = self.id;
            self.fixtures.push(fixture);
        }
        self.regenerate_match_ids();
    }

    /// Remove one fixture and renumber the rest.
    pub fn remove_fixture(&mut self, id: FixtureId) -> Result<Fixture, TournamentError> {
        let idx = self
            .fixtures
            .iter()
            .position(|f| f.id == id)
            .ok_or(TournamentError::FixtureNotFound(id))?;
        let removed = self.fixtures.remove(idx);
        self.regenerate_match_ids();
        Ok(removed)
    }

    /// Move a fixture to `to_index` in the list and renumber.
    pub fn move_fixture(&mut self, id: FixtureId, to_index: usize) -> Result<(), TournamentError> {
        let from = self
            .fixtures
            .iter()
            .position(|f| f.id == id)
            .ok_or(TournamentError::FixtureNotFound(id))?;
        if to_index >= self.fixtures.len() {
            return Err(TournamentError::IndexOutOfRange(to_index));
        }
        let fixture = self.fixtures.remove(from);
        self.fixtures.insert(to_index, fixture);
        self.regenerate_match_ids();
        Ok(())
    }

    /// Delete a group, its group-stage fixtures, and unassign its teams.
    pub fn remove_group(&mut self, id: GroupId) -> Result<Group, TournamentError> {
        let idx = self
            .groups
            .iter()
            .position(|g| g.id == id)
            .ok_or(TournamentError::GroupNotFound(id))?;
        let group = self.groups.remove(idx);
        self.fixtures.retain(|f| f.group_id != Some(id));
        for t in &mut self.teams {
            if t.group_id == Some(id) {
                t.group_id = None;
            }
        }
        self.regenerate_match_ids();
        Ok(group)
    }

    /// Delete a team. Its group-stage fixtures go; knockout slots naming it become `TBD`.
    pub fn remove_team(&mut self, id: TeamId) -> Result<Team, TournamentError> {
        let idx = self
            .teams
            .iter()
            .position(|t| t.id == id)
            .ok_or(TournamentError::TeamNotFound(id))?;
        let team = self.teams.remove(idx);
        self.fixtures
            .retain(|f| !(f.is_group_stage() && f.involves(id)));
        for f in &mut self.fixtures {
            if f.home_team_id.is_team(id) {
                f.home_team_id = Participant::tbd();
            }
            if f.away_team_id.is_team(id) {
                f.away_team_id = Participant::tbd();
            }
        }
        self.regenerate_match_ids();
        Ok(team)
    }
}
