//! Printable schedule export (CSV), one row per placed fixture.

use crate::logic::time::{minutes_to_time, parse_start};
use crate::models::{Competition, Participant, Tournament};
use serde::Serialize;

#[derive(Serialize)]
struct ScheduleRow<'a> {
    competition: &'a str,
    match_id: &'a str,
    stage: &'a str,
    pitch: &'a str,
    start: String,
    end: String,
    home: String,
    away: String,
}

fn side_name(competition: &Competition, p: &Participant) -> String {
    match p {
        Participant::Team(id) => competition
            .team(*id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| id.to_string()),
        Participant::Placeholder(text) => text.clone(),
    }
}

/// Render the placed fixtures of every competition as CSV, ordered by pitch (configured order)
/// then start time.
pub fn schedule_csv(tournament: &Tournament) -> Result<String, csv::Error> {
    let mut rows: Vec<(usize, u32, ScheduleRow<'_>)> = Vec::new();
    for c in &tournament.competitions {
        for f in &c.fixtures {
            let (Some(pitch_id), Some(start)) = (f.pitch_id, f.start_time.as_deref()) else {
                continue;
            };
            let Some(pitch_pos) = tournament.pitches.iter().position(|p| p.id == pitch_id) else {
                continue;
            };
            let start_min = parse_start(start).unwrap_or(0);
            rows.push((
                pitch_pos,
                start_min,
                ScheduleRow {
                    competition: &c.name,
                    match_id: f.match_id.as_deref().unwrap_or(""),
                    stage: f.stage.label(),
                    pitch: &tournament.pitches[pitch_pos].name,
                    start: minutes_to_time(start_min),
                    end: minutes_to_time(start_min.saturating_add(f.duration)),
                    home: side_name(c, &f.home_team_id),
                    away: side_name(c, &f.away_team_id),
                },
            ));
        }
    }
    rows.sort_by_key(|(pitch, start, _)| (*pitch, *start));

    let mut writer = csv::Writer::from_writer(Vec::new());
    for (_, _, row) in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
