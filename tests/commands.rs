//! Integration tests for tournament commands, driven the way the web host drives them.

use pitch_scheduler::{
    apply, Command, CompetitionId, FixturePatch, GroupSettings, NewFixture, Participant, PitchId,
    ScheduleScope, SchedulerConfig, Stage, TimingState, Tournament, TournamentError,
};

fn run(t: Tournament, command: Command) -> Tournament {
    apply(t, command, &SchedulerConfig::default()).unwrap()
}

/// One pitch opening at 10:00, one competition "UT" with a single group of four teams.
fn setup() -> (Tournament, CompetitionId, PitchId) {
    let mut t = Tournament::new();
    t = run(
        t,
        Command::AddPitch {
            name: "Pitch 1".into(),
            start_time: Some("10:00".into()),
            end_time: None,
        },
    );
    let pitch_id = t.pitches[0].id;
    t = run(
        t,
        Command::AddCompetition {
            name: "Under 12".into(),
            code: "ut".into(),
        },
    );
    let competition_id = t.competitions[0].id;
    t = run(
        t,
        Command::AddGroup {
            competition_id,
            name: "Group A".into(),
            settings: GroupSettings {
                pitch_ids: vec![pitch_id],
                ..GroupSettings::default()
            },
        },
    );
    let group_id = t.competitions[0].groups[0].id;
    for name in ["Lions", "Tigers", "Bears", "Wolves"] {
        t = run(
            t,
            Command::AddTeam {
                competition_id,
                name: name.into(),
                group_id: Some(group_id),
                color: None,
            },
        );
    }
    (t, competition_id, pitch_id)
}

fn scheduled() -> (Tournament, CompetitionId, PitchId) {
    let (t, competition_id, pitch_id) = setup();
    let t = run(
        t,
        Command::GenerateFixtures {
            competition_id,
            group_id: None,
        },
    );
    let t = run(
        t,
        Command::BuildKnockout {
            competition_id,
            first_stage: Stage::SemiFinal,
        },
    );
    let t = run(
        t,
        Command::AutoSchedule {
            competition_id,
            scope: ScheduleScope::All,
        },
    );
    (t, competition_id, pitch_id)
}

#[test]
fn every_command_bumps_the_version() {
    let (t, _, _) = setup();
    // Pitch, competition, group, four teams.
    assert_eq!(t.version, 7);
    assert_eq!(t.competitions[0].code, "UT");
    assert_eq!(t.competitions[0].teams.len(), 4);
}

#[test]
fn full_flow_schedules_everything() {
    let (t, _, pitch_id) = scheduled();
    let c = &t.competitions[0];
    assert_eq!(c.fixtures.len(), 6 + 4);
    assert_eq!(t.unscheduled_count(), 0);
    assert!(c.fixtures.iter().all(|f| f.pitch_id == Some(pitch_id)));

    let starts: Vec<&str> = c
        .fixtures
        .iter()
        .map(|f| f.start_time.as_deref().unwrap())
        .collect();
    assert_eq!(
        starts,
        vec![
            "10:00", "10:25", "10:50", "11:15", "11:40", "12:05", // group stage
            "12:30", "12:55", // semi-finals
            "13:20", "13:45", // 3rd place, final
        ]
    );
    let stages: Vec<&Stage> = c.fixtures[6..].iter().map(|f| &f.stage).collect();
    assert_eq!(
        stages,
        vec![&Stage::SemiFinal, &Stage::SemiFinal, &Stage::ThirdPlacePlayoff, &Stage::Final]
    );
    assert_eq!(c.fixtures[9].match_id.as_deref(), Some("UT.10"));
    assert!(c.fixtures.iter().all(|f| f.timing == TimingState::Confirmed));
}

#[test]
fn duration_change_with_recalculation_shifts_the_day() {
    let (t, competition_id, _) = scheduled();
    let first = t.competitions[0].fixtures[0].id;
    let t = run(
        t,
        Command::UpdateFixture {
            competition_id,
            fixture_id: first,
            patch: FixturePatch {
                duration: Some(40),
                ..FixturePatch::default()
            },
            recalculate: true,
        },
    );
    let c = &t.competitions[0];
    assert_eq!(c.fixtures[0].duration, 40);
    assert_eq!(c.fixtures[0].start_time.as_deref(), Some("10:00"));
    assert_eq!(c.fixtures[1].start_time.as_deref(), Some("10:45"));
    assert_eq!(c.fixtures[9].start_time.as_deref(), Some("14:05"));
}

#[test]
fn hand_set_time_is_kept_clear_of_neighbours() {
    let (t, competition_id, _) = scheduled();
    let second = t.competitions[0].fixtures[1].id;
    let t = run(
        t,
        Command::UpdateFixture {
            competition_id,
            fixture_id: second,
            patch: FixturePatch {
                start_time: Some("10:10".into()),
                ..FixturePatch::default()
            },
            recalculate: false,
        },
    );
    // 10:00 + 20 + 5 slack: the earliest the pitch is free again.
    assert_eq!(t.competitions[0].fixtures[1].start_time.as_deref(), Some("10:25"));
    assert_eq!(t.competitions[0].fixtures[1].slack_before, None);
}

#[test]
fn removing_a_pitch_unplaces_its_fixtures() {
    let (t, _, pitch_id) = scheduled();
    let t = run(t, Command::RemovePitch { pitch_id });
    assert!(t.pitches.is_empty());
    assert_eq!(t.unscheduled_count(), 10);
    assert!(t.competitions[0].groups[0].pitch_ids.is_empty());
    assert!(t.competitions[0]
        .fixtures
        .iter()
        .all(|f| f.timing == TimingState::Unplaced));
}

#[test]
fn breaks_push_fixtures_when_added() {
    let (t, _, pitch_id) = scheduled();
    let t = run(
        t,
        Command::AddBreak {
            pitch_id,
            start_time: "10:30".into(),
            duration: 30,
            label: "Lunch".into(),
        },
    );
    let c = &t.competitions[0];
    assert_eq!(c.fixtures[0].start_time.as_deref(), Some("10:00"));
    assert_eq!(c.fixtures[1].start_time.as_deref(), Some("11:00"));
    assert_eq!(c.fixtures[1].timing, TimingState::Tentative);
}

#[test]
fn added_fixture_can_be_moved_to_the_front() {
    let (t, competition_id, _) = scheduled();
    let c = &t.competitions[0];
    let (home, away) = (c.teams[0].id, c.teams[1].id);
    let old_first = c.fixtures[0].id;

    let t = run(
        t,
        Command::AddFixture {
            competition_id,
            fixture: NewFixture {
                home_team_id: home.into(),
                away_team_id: away.into(),
                stage: Stage::Group,
                group_id: None,
                duration: None,
                description: Some("Friendly".into()),
            },
        },
    );
    let added = t.competitions[0].fixtures.last().unwrap();
    assert_eq!(added.match_id.as_deref(), Some("UT.11"));
    assert_eq!(added.duration, 20);
    assert_eq!(added.timing, TimingState::Unplaced);
    let added_id = added.id;

    let t = run(
        t,
        Command::MoveFixture {
            competition_id,
            fixture_id: added_id,
            to_index: 0,
        },
    );
    let c = &t.competitions[0];
    assert_eq!(c.fixtures[0].id, added_id);
    assert_eq!(c.fixtures[0].match_id.as_deref(), Some("UT.01"));
    assert_eq!(c.fixtures[1].id, old_first);
    assert_eq!(c.fixtures[1].match_id.as_deref(), Some("UT.02"));
}

#[test]
fn unplaced_only_scheduling_fills_in_new_fixtures() {
    let (t, competition_id, _) = scheduled();
    let c = &t.competitions[0];
    let (home, away) = (c.teams[2].id, c.teams[3].id);
    let t = run(
        t,
        Command::AddFixture {
            competition_id,
            fixture: NewFixture {
                home_team_id: home.into(),
                away_team_id: away.into(),
                stage: Stage::Group,
                group_id: None,
                duration: Some(20),
                description: None,
            },
        },
    );
    let t = run(
        t,
        Command::AutoSchedule {
            competition_id,
            scope: ScheduleScope::UnplacedOnly,
        },
    );
    let c = &t.competitions[0];
    assert_eq!(c.fixtures[0].start_time.as_deref(), Some("10:00"));
    assert_eq!(c.fixtures[5].start_time.as_deref(), Some("12:05"));
    // Joins the end of the group stage; the knockouts move back behind it.
    assert_eq!(c.fixtures[10].start_time.as_deref(), Some("12:30"));
    assert_eq!(c.fixtures[6].start_time.as_deref(), Some("12:55"));
    assert_eq!(c.fixtures[9].start_time.as_deref(), Some("14:10"));
}

#[test]
fn removing_a_group_drops_its_fixtures() {
    let (t, competition_id, _) = scheduled();
    let group_id = t.competitions[0].groups[0].id;
    let t = run(t, Command::RemoveGroup { competition_id, group_id });
    let c = &t.competitions[0];
    assert!(c.groups.is_empty());
    assert_eq!(c.fixtures.len(), 4);
    assert!(c.teams.iter().all(|team| team.group_id.is_none()));
    assert_eq!(c.fixtures[0].match_id.as_deref(), Some("UT.01"));
}

#[test]
fn removing_a_team_blanks_its_knockout_slots() {
    let (t, competition_id, _) = scheduled();
    let team_id = t.competitions[0].teams[0].id;
    let final_id = t.competitions[0].fixtures[9].id;
    let t = run(
        t,
        Command::UpdateFixture {
            competition_id,
            fixture_id: final_id,
            patch: FixturePatch {
                home_team_id: Some(team_id.into()),
                ..FixturePatch::default()
            },
            recalculate: false,
        },
    );
    let t = run(t, Command::RemoveTeam { competition_id, team_id });
    let c = &t.competitions[0];
    assert_eq!(c.teams.len(), 3);
    // The team played three group fixtures.
    assert_eq!(c.fixtures.len(), 3 + 4);
    let fin = c.fixtures.iter().find(|f| f.id == final_id).unwrap();
    assert_eq!(fin.home_team_id, Participant::tbd());
}

#[test]
fn rebuilding_the_bracket_replaces_it() {
    let (t, competition_id, _) = scheduled();
    let t = run(
        t,
        Command::BuildKnockout {
            competition_id,
            first_stage: Stage::SemiFinal,
        },
    );
    assert_eq!(t.competitions[0].fixtures.len(), 10);
}

#[test]
fn rebuilding_the_bracket_keeps_a_late_group_fixture() {
    let (t, competition_id, _) = scheduled();
    let c = &t.competitions[0];
    let (home, away) = (c.teams[0].id, c.teams[3].id);
    let t = run(
        t,
        Command::AddFixture {
            competition_id,
            fixture: NewFixture {
                home_team_id: home.into(),
                away_team_id: away.into(),
                stage: Stage::Group,
                group_id: None,
                duration: None,
                description: Some("Replay".into()),
            },
        },
    );
    let t = run(
        t,
        Command::BuildKnockout {
            competition_id,
            first_stage: Stage::SemiFinal,
        },
    );
    let c = &t.competitions[0];
    assert_eq!(c.fixtures.len(), 11);
    assert_eq!(c.fixtures.iter().filter(|f| f.is_group_stage()).count(), 7);
    assert_eq!(c.fixtures[6].description.as_deref(), Some("Replay"));
    assert_eq!(c.fixtures.iter().filter(|f| f.stage == Stage::SemiFinal).count(), 2);
    assert_eq!(c.fixtures[10].stage, Stage::Final);
    assert_eq!(c.fixtures[10].match_id.as_deref(), Some("UT.11"));
}

#[test]
fn invalid_input_is_rejected() {
    let (t, competition_id, pitch_id) = setup();
    let config = SchedulerConfig::default();

    let err = apply(
        t.clone(),
        Command::AddCompetition {
            name: "Under 12".into(),
            code: "u12".into(),
        },
        &config,
    );
    assert_eq!(err.unwrap_err(), TournamentError::InvalidCompetitionCode("u12".into()));

    let err = apply(
        t.clone(),
        Command::AddBreak {
            pitch_id,
            start_time: "noon".into(),
            duration: 30,
            label: String::new(),
        },
        &config,
    );
    assert_eq!(err.unwrap_err(), TournamentError::InvalidTime("noon".into()));

    let err = apply(
        t.clone(),
        Command::AddTeam {
            competition_id,
            name: "   ".into(),
            group_id: None,
            color: None,
        },
        &config,
    );
    assert_eq!(err.unwrap_err(), TournamentError::EmptyName);

    let err = apply(
        t.clone(),
        Command::BuildKnockout {
            competition_id,
            first_stage: Stage::ThirdPlacePlayoff,
        },
        &config,
    );
    assert!(matches!(err, Err(TournamentError::InvalidStage(_))));

    let ghost = Tournament::new().id;
    let err = apply(t, Command::Recalculate { competition_id: ghost }, &config);
    assert_eq!(err.unwrap_err(), TournamentError::CompetitionNotFound(ghost));
}

#[test]
fn commands_deserialize_from_tagged_json() {
    let (t, competition_id, pitch_id) = setup();
    let body = format!(r#"{{"type":"auto_schedule","competition_id":"{competition_id}"}}"#);
    let command: Command = serde_json::from_str(&body).unwrap();
    assert_eq!(
        command,
        Command::AutoSchedule {
            competition_id,
            scope: ScheduleScope::All,
        }
    );

    let body = format!(
        r#"{{"type":"add_break","pitch_id":"{pitch_id}","start_time":"12:00","duration":30}}"#
    );
    let command: Command = serde_json::from_str(&body).unwrap();
    let t = run(t, command);
    assert_eq!(t.breaks.len(), 1);
    assert_eq!(t.breaks[0].label, "");

    let body = r#"{"type":"build_knockout","competition_id":"00000000-0000-0000-0000-000000000000","first_stage":"Quarter-Final"}"#;
    let command: Command = serde_json::from_str(body).unwrap();
    assert!(matches!(
        command,
        Command::BuildKnockout {
            first_stage: Stage::QuarterFinal,
            ..
        }
    ));
}
