//! Tournament commands: every user-facing mutation as a transition from one snapshot to the next.
//!
//! Any command that can change pitch occupancy ends with overlap enforcement across all
//! competitions, so the returned snapshot always satisfies the no-overlap invariant.

use crate::config::SchedulerConfig;
use crate::logic::allocator::{schedule_competition, ScheduleScope};
use crate::logic::breaks::BreakIndex;
use crate::logic::knockout::build_knockout;
use crate::logic::overlap::enforce_no_overlaps;
use crate::logic::recalculate::recalculate_competition;
use crate::logic::round_robin::generate_competition_fixtures;
use crate::logic::time::parse_time;
use crate::models::{
    BreakId, Competition, CompetitionId, Fixture, FixtureId, Group, GroupId, Participant, Pitch,
    PitchBreakItem, PitchId, Stage, Team, TeamId, Tournament, TournamentError,
};
use serde::{Deserialize, Serialize};

/// Timing defaults and pitch pool of a group.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupSettings {
    pub default_duration: Option<u32>,
    pub default_slack: Option<u32>,
    pub default_rest: Option<u32>,
    pub pitch_ids: Vec<PitchId>,
    pub primary_pitch_id: Option<PitchId>,
}

/// A fixture entered by hand.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFixture {
    pub home_team_id: Participant,
    pub away_team_id: Participant,
    #[serde(default)]
    pub stage: Stage,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Fields of a fixture to overwrite; absent fields are left alone.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FixturePatch {
    pub home_team_id: Option<Participant>,
    pub away_team_id: Option<Participant>,
    pub stage: Option<Stage>,
    pub group_id: Option<GroupId>,
    pub pitch_id: Option<PitchId>,
    pub start_time: Option<String>,
    pub duration: Option<u32>,
    pub slack: Option<u32>,
    pub rest: Option<u32>,
    pub description: Option<String>,
}

/// Every mutation the surrounding application can request.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    AddCompetition {
        name: String,
        code: String,
    },
    RemoveCompetition {
        competition_id: CompetitionId,
    },
    AddTeam {
        competition_id: CompetitionId,
        name: String,
        #[serde(default)]
        group_id: Option<GroupId>,
        #[serde(default)]
        color: Option<String>,
    },
    RemoveTeam {
        competition_id: CompetitionId,
        team_id: TeamId,
    },
    AddGroup {
        competition_id: CompetitionId,
        name: String,
        #[serde(default)]
        settings: GroupSettings,
    },
    UpdateGroup {
        competition_id: CompetitionId,
        group_id: GroupId,
        #[serde(default)]
        name: Option<String>,
        settings: GroupSettings,
    },
    RemoveGroup {
        competition_id: CompetitionId,
        group_id: GroupId,
    },
    AddPitch {
        name: String,
        #[serde(default)]
        start_time: Option<String>,
        #[serde(default)]
        end_time: Option<String>,
    },
    RemovePitch {
        pitch_id: PitchId,
    },
    AddBreak {
        pitch_id: PitchId,
        start_time: String,
        duration: u32,
        #[serde(default)]
        label: String,
    },
    RemoveBreak {
        break_id: BreakId,
    },
    GenerateFixtures {
        competition_id: CompetitionId,
        #[serde(default)]
        group_id: Option<GroupId>,
    },
    BuildKnockout {
        competition_id: CompetitionId,
        first_stage: Stage,
    },
    AddFixture {
        competition_id: CompetitionId,
        fixture: NewFixture,
    },
    UpsertFixtures {
        competition_id: CompetitionId,
        fixtures: Vec<Fixture>,
    },
    UpdateFixture {
        competition_id: CompetitionId,
        fixture_id: FixtureId,
        patch: FixturePatch,
        #[serde(default)]
        recalculate: bool,
    },
    MoveFixture {
        competition_id: CompetitionId,
        fixture_id: FixtureId,
        to_index: usize,
    },
    RemoveFixture {
        competition_id: CompetitionId,
        fixture_id: FixtureId,
        #[serde(default)]
        recalculate: bool,
    },
    AutoSchedule {
        competition_id: CompetitionId,
        #[serde(default)]
        scope: ScheduleScope,
    },
    Recalculate {
        competition_id: CompetitionId,
    },
    ResetSchedule {
        competition_id: CompetitionId,
    },
}

fn require_name(name: &str) -> Result<String, TournamentError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TournamentError::EmptyName);
    }
    Ok(name.to_string())
}

fn require_time(time: &str) -> Result<(), TournamentError> {
    parse_time(time)
        .map(|_| ())
        .ok_or_else(|| TournamentError::InvalidTime(time.to_string()))
}

fn require_pitches(tournament: &Tournament, ids: &[PitchId]) -> Result<(), TournamentError> {
    match ids.iter().find(|id| tournament.pitch(**id).is_none()) {
        Some(missing) => Err(TournamentError::PitchNotFound(*missing)),
        None => Ok(()),
    }
}

fn require_participant(competition: &Competition, p: &Participant) -> Result<(), TournamentError> {
    match p.team_id() {
        Some(id) if competition.team(id).is_none() => Err(TournamentError::TeamNotFound(id)),
        _ => Ok(()),
    }
}

fn require_group(competition: &Competition, id: Option<GroupId>) -> Result<(), TournamentError> {
    match id {
        Some(id) if competition.group(id).is_none() => Err(TournamentError::GroupNotFound(id)),
        _ => Ok(()),
    }
}

fn apply_settings(group: &mut Group, settings: GroupSettings) {
    group.default_duration = settings.default_duration;
    group.default_slack = settings.default_slack;
    group.default_rest = settings.default_rest;
    group.pitch_ids = settings.pitch_ids;
    group.primary_pitch_id = settings.primary_pitch_id;
}

fn enforce(tournament: &mut Tournament, config: &SchedulerConfig) {
    let breaks = BreakIndex::build(&tournament.breaks);
    tournament.competitions = enforce_no_overlaps(
        std::mem::take(&mut tournament.competitions),
        &tournament.pitches,
        &breaks,
        config,
    );
}

/// Apply one command, returning the next snapshot (version bumped).
pub fn apply(
    mut tournament: Tournament,
    command: Command,
    config: &SchedulerConfig,
) -> Result<Tournament, TournamentError> {
    let mut needs_enforcement = false;

    match command {
        Command::AddCompetition { name, code } => {
            tournament.competitions.push(Competition::new(name, &code)?);
        }
        Command::RemoveCompetition { competition_id } => {
            let before = tournament.competitions.len();
            tournament.competitions.retain(|c| c.id != competition_id);
            if tournament.competitions.len() == before {
                return Err(TournamentError::CompetitionNotFound(competition_id));
            }
        }
        Command::AddTeam {
            competition_id,
            name,
            group_id,
            color,
        } => {
            let name = require_name(&name)?;
            let competition = tournament.competition_mut(competition_id)?;
            require_group(competition, group_id)?;
            let mut team = Team::new(name);
            team.group_id = group_id;
            team.color = color;
            competition.teams.push(team);
        }
        Command::RemoveTeam {
            competition_id,
            team_id,
        } => {
            tournament.competition_mut(competition_id)?.remove_team(team_id)?;
        }
        Command::AddGroup {
            competition_id,
            name,
            settings,
        } => {
            let name = require_name(&name)?;
            require_pitches(&tournament, &settings.pitch_ids)?;
            require_pitches(&tournament, settings.primary_pitch_id.as_slice())?;
            let mut group = Group::new(name);
            apply_settings(&mut group, settings);
            tournament.competition_mut(competition_id)?.groups.push(group);
        }
        Command::UpdateGroup {
            competition_id,
            group_id,
            name,
            settings,
        } => {
            require_pitches(&tournament, &settings.pitch_ids)?;
            require_pitches(&tournament, settings.primary_pitch_id.as_slice())?;
            let name = name.as_deref().map(require_name).transpose()?;
            let group = tournament
                .competition_mut(competition_id)?
                .group_mut(group_id)
                .ok_or(TournamentError::GroupNotFound(group_id))?;
            if let Some(name) = name {
                group.name = name;
            }
            apply_settings(group, settings);
        }
        Command::RemoveGroup {
            competition_id,
            group_id,
        } => {
            tournament.competition_mut(competition_id)?.remove_group(group_id)?;
        }
        Command::AddPitch {
            name,
            start_time,
            end_time,
        } => {
            let mut pitch = Pitch::new(require_name(&name)?);
            for t in start_time.iter().chain(end_time.iter()) {
                require_time(t)?;
            }
            pitch.start_time = start_time;
            pitch.end_time = end_time;
            tournament.pitches.push(pitch);
        }
        Command::RemovePitch { pitch_id } => {
            tournament.remove_pitch(pitch_id)?;
        }
        Command::AddBreak {
            pitch_id,
            start_time,
            duration,
            label,
        } => {
            require_pitches(&tournament, &[pitch_id])?;
            require_time(&start_time)?;
            tournament
                .breaks
                .push(PitchBreakItem::new(pitch_id, start_time, duration, label));
            needs_enforcement = true;
        }
        Command::RemoveBreak { break_id } => {
            let before = tournament.breaks.len();
            tournament.breaks.retain(|b| b.id != break_id);
            if tournament.breaks.len() == before {
                return Err(TournamentError::BreakNotFound(break_id));
            }
        }
        Command::GenerateFixtures {
            competition_id,
            group_id,
        } => {
            let competition = tournament.competition_mut(competition_id)?;
            generate_competition_fixtures(competition, group_id, config)?;
            needs_enforcement = true;
        }
        Command::BuildKnockout {
            competition_id,
            first_stage,
        } => {
            let competition = tournament.competition_mut(competition_id)?;
            let bracket = build_knockout(competition, first_stage, config)?;
            competition.replace_bracket(bracket);
            needs_enforcement = true;
        }
        Command::AddFixture {
            competition_id,
            fixture,
        } => {
            let competition = tournament.competition_mut(competition_id)?;
            require_participant(competition, &fixture.home_team_id)?;
            require_participant(competition, &fixture.away_team_id)?;
            require_group(competition, fixture.group_id)?;
            let duration = fixture
                .duration
                .or_else(|| {
                    fixture
                        .group_id
                        .and_then(|g| competition.group(g))
                        .and_then(|g| g.default_duration)
                })
                .unwrap_or(config.default_duration);
            let mut f = Fixture::new(
                competition.id,
                fixture.home_team_id,
                fixture.away_team_id,
                fixture.stage,
                duration,
            );
            f.group_id = fixture.group_id;
            f.description = fixture.description;
            competition.add_fixture(f);
        }
        Command::UpsertFixtures {
            competition_id,
            fixtures,
        } => {
            for f in &fixtures {
                if let Some(p) = f.pitch_id {
                    require_pitches(&tournament, &[p])?;
                }
            }
            tournament
                .competition_mut(competition_id)?
                .upsert_fixtures(fixtures);
            needs_enforcement = true;
        }
        Command::UpdateFixture {
            competition_id,
            fixture_id,
            patch,
            recalculate,
        } => {
            if let Some(p) = patch.pitch_id {
                require_pitches(&tournament, &[p])?;
            }
            if let Some(t) = &patch.start_time {
                require_time(t)?;
            }
            let competition = tournament.competition_mut(competition_id)?;
            for p in patch.home_team_id.iter().chain(patch.away_team_id.iter()) {
                require_participant(competition, p)?;
            }
            require_group(competition, patch.group_id)?;
            let f = competition
                .fixture_mut(fixture_id)
                .ok_or(TournamentError::FixtureNotFound(fixture_id))?;
            apply_patch(f, patch);
            if recalculate {
                return Ok(finish(recalculate_competition(tournament, competition_id, config)?));
            }
            needs_enforcement = true;
        }
        Command::MoveFixture {
            competition_id,
            fixture_id,
            to_index,
        } => {
            tournament
                .competition_mut(competition_id)?
                .move_fixture(fixture_id, to_index)?;
        }
        Command::RemoveFixture {
            competition_id,
            fixture_id,
            recalculate,
        } => {
            tournament
                .competition_mut(competition_id)?
                .remove_fixture(fixture_id)?;
            if recalculate {
                return Ok(finish(recalculate_competition(tournament, competition_id, config)?));
            }
        }
        Command::AutoSchedule {
            competition_id,
            scope,
        } => {
            return Ok(finish(schedule_competition(tournament, competition_id, scope, config)?));
        }
        Command::Recalculate { competition_id } => {
            return Ok(finish(recalculate_competition(tournament, competition_id, config)?));
        }
        Command::ResetSchedule { competition_id } => {
            for f in &mut tournament.competition_mut(competition_id)?.fixtures {
                f.clear_placement();
            }
        }
    }

    if needs_enforcement {
        enforce(&mut tournament, config);
    }
    Ok(finish(tournament))
}

fn finish(mut tournament: Tournament) -> Tournament {
    tournament.touch();
    tournament
}

fn apply_patch(f: &mut Fixture, patch: FixturePatch) {
    if let Some(home) = patch.home_team_id {
        f.home_team_id = home;
    }
    if let Some(away) = patch.away_team_id {
        f.away_team_id = away;
    }
    if let Some(stage) = patch.stage {
        f.stage = stage;
    }
    if let Some(group_id) = patch.group_id {
        f.group_id = Some(group_id);
    }
    if let Some(pitch_id) = patch.pitch_id {
        f.pitch_id = Some(pitch_id);
    }
    if let Some(start) = patch.start_time {
        f.start_time = Some(start.trim().to_string());
        // A hand-set time is taken as requested; no scheduler gap applies to it.
        f.slack_before = None;
    }
    if let Some(duration) = patch.duration {
        f.duration = duration;
    }
    if let Some(slack) = patch.slack {
        f.slack = Some(slack);
    }
    if let Some(rest) = patch.rest {
        f.rest = Some(rest);
    }
    if let Some(description) = patch.description {
        f.description = Some(description);
    }
}
