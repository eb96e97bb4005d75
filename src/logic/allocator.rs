//! Automatic scheduler: assigns a pitch and start time to a competition's fixtures.

use crate::config::SchedulerConfig;
use crate::logic::breaks::BreakIndex;
use crate::logic::cursors::{
    apply_placement, place, resolve_timing, GroupTable, PitchCursors, PitchTable, Timing,
};
use crate::logic::overlap::enforce_no_overlaps;
use crate::logic::time::parse_start;
use crate::models::{
    Competition, CompetitionId, Fixture, FixtureId, Group, GroupId, Pitch, PitchId, Tournament,
    TournamentError,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Which fixtures an allocation pass may (re)place.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleScope {
    /// Full re-run: every fixture is placed from scratch.
    #[default]
    All,
    /// Fixtures that already have a valid pitch and time stay put and occupy their slots, unless
    /// they belong to a later stage than a fixture that still needs placing.
    UnplacedOnly,
}

/// Per-group FIFO key. Fixtures without a (live) group each get their own queue.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
enum QueueKey {
    Group(GroupId),
    Loose(FixtureId),
}

struct Queued {
    index: usize,
    pool: Vec<PitchId>,
    timing: Timing,
}

struct GroupQueue {
    items: VecDeque<Queued>,
    next_pitch: usize,
}

/// Pitch pool of a group-stage fixture.
///
/// The group's live `pitch_ids`, else its live primary pitch, else the fixture's current pitch,
/// else the first configured pitch. Empty only when there are no pitches at all.
fn pitch_pool(fixture: &Fixture, group: Option<&Group>, pitches: &PitchTable) -> Vec<PitchId> {
    if let Some(g) = group {
        let mut pool: Vec<PitchId> = Vec::with_capacity(g.pitch_ids.len());
        for p in &g.pitch_ids {
            if pitches.contains(*p) && !pool.contains(p) {
                pool.push(*p);
            }
        }
        if !pool.is_empty() {
            return pool;
        }
        if let Some(p) = g.primary_pitch_id.filter(|p| pitches.contains(*p)) {
            return vec![p];
        }
    }
    if let Some(p) = fixture.pitch_id.filter(|p| pitches.contains(*p)) {
        return vec![p];
    }
    pitches.first().into_iter().collect()
}

/// Live pitch and parsed start of a fixture that already has both.
fn seeded_slot(fixture: &Fixture, pitches: &PitchTable) -> Option<(PitchId, u32)> {
    let pitch = fixture.pitch_id.filter(|p| pitches.contains(*p))?;
    let start = fixture.start_time.as_deref().and_then(parse_start)?;
    Some((pitch, start))
}

/// Running order of stages: the group stage, then knockout tiers.
fn stage_rank(fixture: &Fixture) -> u32 {
    fixture.stage.tier().map_or(0, |tier| tier + 1)
}

/// Assign pitch and start time to the fixtures of one competition.
///
/// 1. Group-stage fixtures go into per-group FIFO queues; queues are served round robin, each
///    fixture taking the next pitch of its pool at that pitch's cursor, pushed past breaks.
/// 2. The group stage ends at the highest cursor it touched.
/// 3. Knockout fixtures are placed tier by tier on the pitches the group stage used (or all
///    pitches). No tier starts before the previous one has ended.
///
/// Match ids are regenerated afterwards. Cross-competition overlaps are not resolved here; see
/// [`schedule_competition`].
pub fn auto_schedule(
    mut competition: Competition,
    pitches: &[Pitch],
    breaks: &BreakIndex,
    scope: ScheduleScope,
    config: &SchedulerConfig,
) -> Competition {
    let pitch_table = PitchTable::build(pitches, config);
    let groups = GroupTable::build(&competition.groups);
    let mut fixtures = std::mem::take(&mut competition.fixtures);
    let mut cursors = PitchCursors::new();
    let mut group_pitches: Vec<PitchId> = Vec::new();
    let mut tier_seed_end: BTreeMap<u32, u32> = BTreeMap::new();
    let mut to_place: Vec<usize> = Vec::new();

    // Seeded fixtures ranked after the earliest stage that still needs placing are placed again,
    // so no stage ends up behind a later one.
    let reopen_after = fixtures
        .iter()
        .filter(|f| scope == ScheduleScope::All || seeded_slot(f, &pitch_table).is_none())
        .map(stage_rank)
        .min();

    for (i, f) in fixtures.iter_mut().enumerate() {
        let seeded = match (scope, seeded_slot(f, &pitch_table)) {
            (ScheduleScope::UnplacedOnly, Some(slot))
                if reopen_after.map_or(true, |rank| stage_rank(f) <= rank) =>
            {
                Some(slot)
            }
            _ => None,
        };
        match seeded {
            Some((pitch, start)) => {
                let timing = resolve_timing(f, groups.get(f.group_id), config);
                let occupied = place(pitch, start, start, timing, &BreakIndex::default());
                cursors.raise(pitch, occupied.next_free, &pitch_table);
                match f.stage.tier() {
                    None => {
                        if !group_pitches.contains(&pitch) {
                            group_pitches.push(pitch);
                        }
                    }
                    Some(tier) => {
                        let end = tier_seed_end.entry(tier).or_insert(0);
                        *end = (*end).max(occupied.tier_end);
                    }
                }
            }
            None => {
                if f.pitch_id.is_some_and(|p| !pitch_table.contains(p)) {
                    f.clear_placement();
                }
                to_place.push(i);
            }
        }
    }

    let mut unplaced = 0usize;

    // Group stage: fair interleaving of groups across shared pitches.
    let mut queues: Vec<GroupQueue> = Vec::new();
    let mut queue_of: HashMap<QueueKey, usize> = HashMap::new();
    for &i in &to_place {
        let f = &fixtures[i];
        if !f.is_group_stage() {
            continue;
        }
        let group = groups.get(f.group_id);
        let timing = resolve_timing(f, group, config);
        let pool = pitch_pool(f, group, &pitch_table);
        if pool.is_empty() {
            let f = &mut fixtures[i];
            f.duration = timing.duration;
            f.clear_placement();
            unplaced += 1;
            continue;
        }
        let key = match group {
            Some(g) => QueueKey::Group(g.id),
            None => QueueKey::Loose(f.id),
        };
        let q = *queue_of.entry(key).or_insert_with(|| {
            queues.push(GroupQueue {
                items: VecDeque::new(),
                next_pitch: 0,
            });
            queues.len() - 1
        });
        queues[q].items.push_back(Queued { index: i, pool, timing });
    }

    while queues.iter().any(|q| !q.items.is_empty()) {
        for queue in queues.iter_mut() {
            let Some(item) = queue.items.pop_front() else {
                continue;
            };
            let pitch = item.pool[queue.next_pitch % item.pool.len()];
            queue.next_pitch += 1;
            let at = cursors.get(pitch, &pitch_table);
            let placement = place(pitch, at, at, item.timing, breaks);
            apply_placement(&mut fixtures[item.index], &placement, false);
            cursors.set(pitch, placement.next_free);
            if !group_pitches.contains(&pitch) {
                group_pitches.push(pitch);
            }
            log::debug!(
                "Group fixture {} on pitch {} at minute {}",
                fixtures[item.index].id,
                pitch,
                placement.start
            );
        }
    }

    let group_stage_end = cursors.max_over(&group_pitches, &pitch_table);

    // Knockout stage, tier by tier.
    let knockout_pool: Vec<PitchId> = {
        let used: Vec<PitchId> = pitch_table
            .ids()
            .iter()
            .copied()
            .filter(|p| group_pitches.contains(p))
            .collect();
        if used.is_empty() {
            pitch_table.ids().to_vec()
        } else {
            used
        }
    };

    let mut tiers: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for &i in &to_place {
        if let Some(tier) = fixtures[i].stage.tier() {
            tiers.entry(tier).or_default().push(i);
        }
    }
    for tier in tier_seed_end.keys() {
        tiers.entry(*tier).or_default();
    }

    let mut tier_min = group_stage_end.unwrap_or(0);
    for (tier, members) in &tiers {
        let mut tier_max = tier_min.max(tier_seed_end.get(tier).copied().unwrap_or(0));
        if members.is_empty() {
            tier_min = tier_max;
            continue;
        }
        if knockout_pool.is_empty() {
            for &i in members {
                let timing = resolve_timing(&fixtures[i], groups.get(fixtures[i].group_id), config);
                let f = &mut fixtures[i];
                f.duration = timing.duration;
                f.clear_placement();
                unplaced += 1;
            }
            continue;
        }

        let mut natural: HashMap<PitchId, u32> = HashMap::new();
        for p in &knockout_pool {
            natural.insert(*p, cursors.get(*p, &pitch_table));
            cursors.raise(*p, tier_min, &pitch_table);
        }

        for (n, &i) in members.iter().enumerate() {
            let pitch = knockout_pool[n % knockout_pool.len()];
            let timing = resolve_timing(&fixtures[i], groups.get(fixtures[i].group_id), config);
            let earliest = cursors.get(pitch, &pitch_table).max(tier_min);
            let from = natural.get(&pitch).copied().unwrap_or(earliest);
            let placement = place(pitch, earliest, from, timing, breaks);
            apply_placement(&mut fixtures[i], &placement, true);
            cursors.set(pitch, placement.next_free);
            natural.insert(pitch, placement.next_free);
            tier_max = tier_max.max(placement.tier_end);
            log::debug!(
                "Tier {} fixture {} on pitch {} at minute {} (gap {})",
                tier,
                fixtures[i].id,
                pitch,
                placement.start,
                placement.slack_before
            );
        }
        tier_min = tier_max;
    }

    competition.fixtures = fixtures;
    competition.regenerate_match_ids();
    log::info!(
        "Auto-scheduled competition {}: {} fixture(s) considered, {} left unplaced",
        competition.code,
        to_place.len(),
        unplaced
    );
    competition
}

/// Auto-schedule one competition of a tournament, then enforce no overlaps across all of them.
pub fn schedule_competition(
    mut tournament: Tournament,
    competition_id: CompetitionId,
    scope: ScheduleScope,
    config: &SchedulerConfig,
) -> Result<Tournament, TournamentError> {
    let idx = tournament
        .competitions
        .iter()
        .position(|c| c.id == competition_id)
        .ok_or(TournamentError::CompetitionNotFound(competition_id))?;
    let breaks = BreakIndex::build(&tournament.breaks);
    let competition = tournament.competitions.remove(idx);
    let scheduled = auto_schedule(competition, &tournament.pitches, &breaks, scope, config);
    tournament.competitions.insert(idx, scheduled);
    tournament.competitions = enforce_no_overlaps(
        std::mem::take(&mut tournament.competitions),
        &tournament.pitches,
        &breaks,
        config,
    );
    Ok(tournament)
}
