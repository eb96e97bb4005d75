//! Integration tests for the CSV schedule export.

use pitch_scheduler::{
    schedule_csv, Competition, Fixture, Participant, Pitch, Stage, Team, Tournament,
};

#[test]
fn csv_lists_placed_fixtures_by_pitch_then_time() {
    let p1 = Pitch::new("North").opening_at("10:00");
    let p2 = Pitch::new("South").opening_at("10:00");
    let mut c = Competition::new("Under 12", "UT").unwrap();
    let lions = Team::new("Lions");
    let tigers = Team::new("Tigers");
    c.teams = vec![lions.clone(), tigers.clone()];

    let mut late = Fixture::new(c.id, lions.id, tigers.id, Stage::Group, 20);
    late.pitch_id = Some(p1.id);
    late.start_time = Some("11:00".into());
    c.add_fixture(late);
    let mut south = Fixture::new(c.id, Participant::tbd(), Participant::tbd(), Stage::Final, 30);
    south.pitch_id = Some(p2.id);
    south.start_time = Some("09:30".into());
    c.add_fixture(south);
    let mut early = Fixture::new(c.id, tigers.id, lions.id, Stage::Group, 20);
    early.pitch_id = Some(p1.id);
    early.start_time = Some("10:00".into());
    c.add_fixture(early);
    let unplaced = Fixture::new(c.id, lions.id, tigers.id, Stage::Group, 20);
    c.add_fixture(unplaced);

    let mut t = Tournament::new();
    t.pitches = vec![p1, p2];
    t.competitions.push(c);

    let csv = schedule_csv(&t).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "competition,match_id,stage,pitch,start,end,home,away",
            "Under 12,UT.03,Group,North,10:00,10:20,Tigers,Lions",
            "Under 12,UT.01,Group,North,11:00,11:20,Lions,Tigers",
            "Under 12,UT.02,Final,South,09:30,10:00,TBD,TBD",
        ]
    );
}

#[test]
fn empty_tournament_exports_nothing() {
    let csv = schedule_csv(&Tournament::new()).unwrap();
    assert!(csv.is_empty());
}
