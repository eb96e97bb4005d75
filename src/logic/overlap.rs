//! Cross-competition overlap enforcement: the last word on published start times.

use crate::config::SchedulerConfig;
use crate::logic::breaks::BreakIndex;
use crate::logic::cursors::{resolve_timing, GroupTable, PitchTable, Timing};
use crate::logic::time::{minutes_to_time, parse_start};
use crate::models::{Competition, Pitch, PitchId, TimingState};
use std::collections::HashMap;

/// One fixture occupying a pitch, as discovered during the pass.
struct Occupant {
    competition: usize,
    fixture: usize,
    requested: Option<u32>,
    /// Discovery order across all competitions; breaks ties on equal requested times.
    seq: usize,
    timing: Timing,
    slack_before: u32,
}

/// Make every pitch's fixtures pairwise non-overlapping and clear of breaks, across all competitions.
///
/// Per pitch, fixtures are walked in (requested start, discovery order). Each starts at the later of
/// its requested time and `cursor + slack_before`, pushed past breaks; the cursor then moves to
/// `start + duration + slack`. Only fixtures whose time actually changes are rewritten. Fixtures
/// pointing at a pitch that no longer exists become unplaced.
pub fn enforce_no_overlaps(
    mut competitions: Vec<Competition>,
    pitches: &[Pitch],
    breaks: &BreakIndex,
    config: &SchedulerConfig,
) -> Vec<Competition> {
    let pitch_table = PitchTable::build(pitches, config);
    let mut lanes: HashMap<PitchId, Vec<Occupant>> = HashMap::new();
    let mut seq = 0usize;

    for (ci, competition) in competitions.iter_mut().enumerate() {
        let (groups, fixtures) = (&competition.groups, &mut competition.fixtures);
        let groups = GroupTable::build(groups);
        for (fi, f) in fixtures.iter_mut().enumerate() {
            let Some(pitch) = f.pitch_id else {
                continue;
            };
            if !pitch_table.contains(pitch) {
                log::warn!("Fixture {} referenced missing pitch {}; unplacing it", f.id, pitch);
                f.clear_placement();
                continue;
            }
            lanes.entry(pitch).or_default().push(Occupant {
                competition: ci,
                fixture: fi,
                requested: f.start_time.as_deref().and_then(parse_start),
                seq,
                timing: resolve_timing(f, groups.get(f.group_id), config),
                slack_before: f.slack_before.unwrap_or(0),
            });
            seq += 1;
        }
    }

    let mut moved = 0usize;
    for pitch in pitch_table.ids() {
        let Some(lane) = lanes.get_mut(pitch) else {
            continue;
        };
        lane.sort_by_key(|o| (o.requested.unwrap_or(u32::MAX), o.seq));

        let mut cursor = pitch_table.opening(*pitch);
        for o in lane.iter() {
            let earliest = cursor.saturating_add(o.slack_before);
            let start = earliest.max(o.requested.unwrap_or(0));
            let start = breaks.avoid(*pitch, start, o.timing.duration);
            cursor = start
                .saturating_add(o.timing.duration)
                .saturating_add(o.timing.slack);

            let f = &mut competitions[o.competition].fixtures[o.fixture];
            let new_time = minutes_to_time(start);
            if f.start_time.as_deref() == Some(new_time.as_str()) {
                f.timing = TimingState::Confirmed;
            } else {
                log::debug!(
                    "Fixture {} on pitch {} moved from {:?} to {}",
                    f.id,
                    pitch,
                    f.start_time,
                    new_time
                );
                f.start_time = Some(new_time);
                f.timing = TimingState::Tentative;
                moved += 1;
            }
        }
    }

    if moved > 0 {
        log::info!("Overlap enforcement moved {} fixture(s)", moved);
    }
    competitions
}
