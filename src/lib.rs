//! Tournament pitch scheduler: library with models and scheduling logic.

pub mod config;
pub mod logic;
pub mod models;

pub use config::SchedulerConfig;
pub use logic::{
    apply, auto_schedule, avoid_breaks, build_knockout, enforce_no_overlaps, generate,
    generate_competition_fixtures, minutes_to_time, parse_start, parse_time, recalculate,
    recalculate_competition, resolve_timing, round_robin_pairings, schedule_competition,
    schedule_csv, time_to_minutes, BreakIndex, BreakInterval, Command, FixturePatch, GroupContext,
    GroupSettings, NewFixture, ScheduleScope, Timing, DEFAULT_START_MINUTES,
};
pub use models::{
    match_id_for, BreakId, Competition, CompetitionId, Fixture, FixtureId, Group, GroupId,
    Participant, Pitch, PitchBreakItem, PitchId, Stage, Team, TeamId, TimingState, Tournament,
    TournamentError, TournamentId, TBD,
};
