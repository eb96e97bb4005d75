//! Recompute start times of already-placed fixtures after an edit.
//!
//! Pitches never change here. Each pitch keeps its current running order (by current start time,
//! untimed fixtures last, then list position); only the times are re-derived.

use crate::config::SchedulerConfig;
use crate::logic::breaks::BreakIndex;
use crate::logic::cursors::{
    apply_placement, place, resolve_timing, GroupTable, PitchCursors, PitchTable,
};
use crate::logic::overlap::enforce_no_overlaps;
use crate::logic::time::parse_start;
use crate::models::{Competition, CompetitionId, Fixture, Pitch, PitchId, Tournament, TournamentError};
use std::collections::{BTreeMap, HashMap};

/// Running-order key: current start (untimed last), then list position.
fn order_key(fixtures: &[Fixture], index: usize) -> (u32, usize) {
    let start = fixtures[index]
        .start_time
        .as_deref()
        .and_then(parse_start)
        .unwrap_or(u32::MAX);
    (start, index)
}

/// Re-derive start times for one competition, keeping pitch assignments and running order.
pub fn recalculate(
    mut competition: Competition,
    pitches: &[Pitch],
    breaks: &BreakIndex,
    config: &SchedulerConfig,
) -> Competition {
    let pitch_table = PitchTable::build(pitches, config);
    let groups = GroupTable::build(&competition.groups);
    let mut fixtures = std::mem::take(&mut competition.fixtures);
    let mut cursors = PitchCursors::new();

    let mut group_lanes: HashMap<PitchId, Vec<usize>> = HashMap::new();
    let mut tiers: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (i, f) in fixtures.iter_mut().enumerate() {
        let Some(pitch) = f.pitch_id.filter(|p| pitch_table.contains(*p)) else {
            if f.pitch_id.is_some() || f.start_time.is_some() {
                f.clear_placement();
            }
            continue;
        };
        match f.stage.tier() {
            None => group_lanes.entry(pitch).or_default().push(i),
            Some(tier) => tiers.entry(tier).or_default().push(i),
        }
    }

    // Group stage: each pitch compacts its own running order.
    for (pitch, lane) in group_lanes.iter_mut() {
        lane.sort_by_key(|&i| order_key(&fixtures, i));
        for &i in lane.iter() {
            let timing = resolve_timing(&fixtures[i], groups.get(fixtures[i].group_id), config);
            let at = cursors.get(*pitch, &pitch_table);
            let placement = place(*pitch, at, at, timing, breaks);
            apply_placement(&mut fixtures[i], &placement, false);
            cursors.set(*pitch, placement.next_free);
        }
    }

    let mut tier_min = cursors.max_over(group_lanes.keys(), &pitch_table).unwrap_or(0);

    for (tier, members) in tiers.iter_mut() {
        members.sort_by_key(|&i| order_key(&fixtures, i));

        let mut natural: HashMap<PitchId, u32> = HashMap::new();
        for &i in members.iter() {
            if let Some(pitch) = fixtures[i].pitch_id {
                natural
                    .entry(pitch)
                    .or_insert_with(|| cursors.get(pitch, &pitch_table));
            }
        }
        for pitch in natural.keys() {
            cursors.raise(*pitch, tier_min, &pitch_table);
        }

        let mut tier_max = tier_min;
        for &i in members.iter() {
            let Some(pitch) = fixtures[i].pitch_id else {
                continue;
            };
            let timing = resolve_timing(&fixtures[i], groups.get(fixtures[i].group_id), config);
            let earliest = cursors.get(pitch, &pitch_table).max(tier_min);
            let from = natural.get(&pitch).copied().unwrap_or(earliest);
            let placement = place(pitch, earliest, from, timing, breaks);
            apply_placement(&mut fixtures[i], &placement, true);
            cursors.set(pitch, placement.next_free);
            natural.insert(pitch, placement.next_free);
            tier_max = tier_max.max(placement.tier_end);
        }
        log::debug!("Recalculated tier {}: ends at minute {}", tier, tier_max);
        tier_min = tier_max;
    }

    competition.fixtures = fixtures;
    log::info!("Recalculated schedule of competition {}", competition.code);
    competition
}

/// Recalculate one competition of a tournament, then enforce no overlaps across all of them.
pub fn recalculate_competition(
    mut tournament: Tournament,
    competition_id: CompetitionId,
    config: &SchedulerConfig,
) -> Result<Tournament, TournamentError> {
    let idx = tournament
        .competitions
        .iter()
        .position(|c| c.id == competition_id)
        .ok_or(TournamentError::CompetitionNotFound(competition_id))?;
    let breaks = BreakIndex::build(&tournament.breaks);
    let competition = tournament.competitions.remove(idx);
    let recalculated = recalculate(competition, &tournament.pitches, &breaks, config);
    tournament.competitions.insert(idx, recalculated);
    tournament.competitions = enforce_no_overlaps(
        std::mem::take(&mut tournament.competitions),
        &tournament.pitches,
        &breaks,
        config,
    );
    Ok(tournament)
}
