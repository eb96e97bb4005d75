//! Data structures for the tournament: teams, groups, pitches, fixtures, competitions.

mod competition;
mod fixture;
mod pitch;
mod team;
mod tournament;

pub use competition::{match_id_for, normalize_code, Competition};
pub use fixture::{CompetitionId, Fixture, FixtureId, Participant, Stage, TimingState, TBD};
pub use pitch::{BreakId, Pitch, PitchBreakItem, PitchId};
pub use team::{Group, GroupId, Team, TeamId};
pub use tournament::{Tournament, TournamentError, TournamentId};
