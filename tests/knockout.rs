//! Integration tests for the knockout bracket builder and stage handling.

use pitch_scheduler::{
    build_knockout, Competition, Fixture, Group, Participant, SchedulerConfig, Stage, Team,
};

fn placeholder(text: &str) -> Participant {
    Participant::Placeholder(text.to_string())
}

fn competition_with_groups(n: usize) -> Competition {
    let mut c = Competition::new("Open", "OP").unwrap();
    for name in ["Group A", "Group B", "Group C", "Group D"].iter().take(n) {
        c.groups.push(Group::new(*name));
    }
    c
}

#[test]
fn semi_final_bracket_has_a_third_place_playoff() {
    let c = competition_with_groups(0);
    let bracket = build_knockout(&c, Stage::SemiFinal, &SchedulerConfig::default()).unwrap();
    let stages: Vec<&Stage> = bracket.iter().map(|f| &f.stage).collect();
    assert_eq!(
        stages,
        vec![&Stage::SemiFinal, &Stage::SemiFinal, &Stage::ThirdPlacePlayoff, &Stage::Final]
    );
    assert_eq!(bracket[0].home_team_id, Participant::tbd());
    assert_eq!(bracket[2].home_team_id, placeholder("Loser SF1"));
    assert_eq!(bracket[2].away_team_id, placeholder("Loser SF2"));
    assert_eq!(bracket[3].home_team_id, placeholder("Winner SF1"));
    assert_eq!(bracket[3].away_team_id, placeholder("Winner SF2"));
    assert_eq!(bracket[0].description.as_deref(), Some("Semi-Final 1"));
    assert_eq!(bracket[3].description.as_deref(), Some("Final"));
    assert!(bracket.iter().all(|f| f.duration == 20 && f.pitch_id.is_none()));
}

#[test]
fn quarter_finals_seed_from_four_groups() {
    let c = competition_with_groups(4);
    let bracket = build_knockout(&c, Stage::QuarterFinal, &SchedulerConfig::default()).unwrap();
    assert_eq!(bracket.len(), 4 + 2 + 1 + 1);
    assert_eq!(bracket[0].home_team_id, placeholder("1st Group A"));
    assert_eq!(bracket[0].away_team_id, placeholder("2nd Group B"));
    assert_eq!(bracket[3].home_team_id, placeholder("1st Group D"));
    assert_eq!(bracket[3].away_team_id, placeholder("2nd Group A"));
    assert_eq!(bracket[4].home_team_id, placeholder("Winner QF1"));
    assert_eq!(bracket[5].away_team_id, placeholder("Winner QF4"));
}

#[test]
fn semi_finals_pair_group_winners_from_four_groups() {
    let c = competition_with_groups(4);
    let bracket = build_knockout(&c, Stage::SemiFinal, &SchedulerConfig::default()).unwrap();
    assert_eq!(bracket[0].home_team_id, placeholder("1st Group A"));
    assert_eq!(bracket[0].away_team_id, placeholder("1st Group B"));
    assert_eq!(bracket[1].home_team_id, placeholder("1st Group C"));
    assert_eq!(bracket[1].away_team_id, placeholder("1st Group D"));
}

#[test]
fn bracket_match_ids_follow_the_group_stage() {
    let mut c = competition_with_groups(1);
    for _ in 0..3 {
        let f = Fixture::new(c.id, Participant::tbd(), Participant::tbd(), Stage::Group, 20);
        c.add_fixture(f);
    }
    let bracket = build_knockout(&c, Stage::Final, &SchedulerConfig::default()).unwrap();
    assert_eq!(bracket.len(), 1);
    assert_eq!(bracket[0].match_id.as_deref(), Some("OP.04"));

    c.replace_bracket(bracket.clone());
    c.replace_bracket(build_knockout(&c, Stage::Final, &SchedulerConfig::default()).unwrap());
    assert_eq!(c.fixtures.len(), 4);
    assert_eq!(c.fixtures[3].id, bracket[0].id);
    assert_eq!(c.fixtures[3].match_id.as_deref(), Some("OP.04"));
}

#[test]
fn rebuilding_after_a_late_group_fixture_keeps_it() {
    let config = SchedulerConfig::default();
    let mut c = competition_with_groups(1);
    for _ in 0..2 {
        let f = Fixture::new(c.id, Participant::tbd(), Participant::tbd(), Stage::Group, 20);
        c.add_fixture(f);
    }
    let first = build_knockout(&c, Stage::SemiFinal, &config).unwrap();
    c.replace_bracket(first.clone());

    let mut late = Fixture::new(c.id, Participant::tbd(), Participant::tbd(), Stage::Group, 20);
    late.description = Some("Replayed".into());
    let late_id = late.id;
    c.add_fixture(late);

    let rebuilt = build_knockout(&c, Stage::SemiFinal, &config).unwrap();
    assert_eq!(rebuilt[0].match_id.as_deref(), Some("OP.04"));
    c.replace_bracket(rebuilt);

    let stages: Vec<&Stage> = c.fixtures.iter().map(|f| &f.stage).collect();
    assert_eq!(
        stages,
        vec![
            &Stage::Group,
            &Stage::Group,
            &Stage::Group,
            &Stage::SemiFinal,
            &Stage::SemiFinal,
            &Stage::ThirdPlacePlayoff,
            &Stage::Final,
        ]
    );
    assert_eq!(c.fixtures[2].id, late_id);
    let ids: Vec<_> = c.fixtures[3..].iter().map(|f| f.id).collect();
    let first_ids: Vec<_> = first.iter().map(|f| f.id).collect();
    assert_eq!(ids, first_ids);
    assert_eq!(c.fixtures[6].match_id.as_deref(), Some("OP.07"));
}

#[test]
fn rebuilding_from_a_later_round_drops_the_earlier_one() {
    let config = SchedulerConfig::default();
    let mut c = competition_with_groups(4);
    c.replace_bracket(build_knockout(&c, Stage::QuarterFinal, &config).unwrap());
    assert_eq!(c.fixtures.len(), 8);

    c.replace_bracket(build_knockout(&c, Stage::SemiFinal, &config).unwrap());
    assert_eq!(c.fixtures.len(), 4);
    assert!(c.fixtures.iter().all(|f| f.stage != Stage::QuarterFinal));
    assert_eq!(c.fixtures[0].home_team_id, placeholder("1st Group A"));
}

#[test]
fn free_form_knockouts_survive_a_rebuild() {
    let config = SchedulerConfig::default();
    let mut c = competition_with_groups(0);
    let plate = Fixture::new(
        c.id,
        Participant::tbd(),
        Participant::tbd(),
        Stage::Knockout("Plate Final".into()),
        20,
    );
    let plate_id = plate.id;
    c.add_fixture(plate);
    c.replace_bracket(build_knockout(&c, Stage::Final, &config).unwrap());
    assert_eq!(c.fixtures.len(), 2);
    assert_eq!(c.fixtures[0].id, plate_id);
    assert_eq!(c.fixtures[1].stage, Stage::Final);
    assert!(Stage::Final.is_bracket());
    assert!(!Stage::Knockout("Plate Final".into()).is_bracket());
}

#[test]
fn stages_without_a_bracket_are_rejected() {
    let c = competition_with_groups(0);
    let config = SchedulerConfig::default();
    assert!(build_knockout(&c, Stage::Group, &config).is_err());
    assert!(build_knockout(&c, Stage::Knockout("Plate".into()), &config).is_err());
}

#[test]
fn stage_labels_round_trip_through_json() {
    let c = competition_with_groups(0);
    let mut f = Fixture::new(c.id, Participant::tbd(), Participant::tbd(), Stage::SemiFinal, 20);
    f.description = Some("Semi-Final 1".into());
    let json = serde_json::to_value(&f).unwrap();
    assert_eq!(json["stage"], "Semi-Final");
    assert_eq!(json["homeTeamId"], "TBD");
    assert_eq!(json["timing"], "unplaced");

    let plate: Stage = serde_json::from_str(r#""Plate Final""#).unwrap();
    assert_eq!(plate, Stage::Knockout("Plate Final".into()));
    assert_eq!(plate.tier(), Some(0));
    let group: Stage = serde_json::from_str(r#""""#).unwrap();
    assert_eq!(group, Stage::Group);
    assert_eq!(group.tier(), None);
}

#[test]
fn team_participants_serialize_as_their_id() {
    let team = Team::new("Lions");
    let p: Participant = team.id.into();
    let json = serde_json::to_string(&p).unwrap();
    assert_eq!(json, format!("\"{}\"", team.id));
    let back: Participant = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Participant::Team(team.id));
    let tbd: Participant = serde_json::from_str(r#""TBD""#).unwrap();
    assert_eq!(tbd, Participant::tbd());
}

#[test]
fn tiers_order_the_knockout_stages() {
    assert!(Stage::RoundOf16.tier() < Stage::QuarterFinal.tier());
    assert!(Stage::QuarterFinal.tier() < Stage::SemiFinal.tier());
    assert!(Stage::SemiFinal.tier() < Stage::Final.tier());
    assert_eq!(Stage::ThirdPlacePlayoff.tier(), Stage::Final.tier());
}
