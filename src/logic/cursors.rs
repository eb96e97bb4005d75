//! Lookup tables and the per-pitch cursor table shared by every scheduling pass.
//!
//! Tables are built once per pass and passed read-only into the placement steps; the cursor
//! table is the only thing a pass updates, and only from the value a placement returns.

use crate::config::SchedulerConfig;
use crate::logic::breaks::BreakIndex;
use crate::logic::time::{minutes_to_time, time_to_minutes};
use crate::models::{Fixture, Group, GroupId, Pitch, PitchId, TimingState};
use std::collections::HashMap;

/// Pitches by id, plus their configured order and resolved opening times.
#[derive(Clone, Debug)]
pub struct PitchTable {
    order: Vec<PitchId>,
    opening: HashMap<PitchId, u32>,
}

impl PitchTable {
    pub fn build(pitches: &[Pitch], config: &SchedulerConfig) -> Self {
        let fallback = config.default_start_minutes();
        let mut order = Vec::with_capacity(pitches.len());
        let mut opening = HashMap::with_capacity(pitches.len());
        for p in pitches {
            if opening.contains_key(&p.id) {
                log::warn!("Duplicate pitch id {} ignored", p.id);
                continue;
            }
            order.push(p.id);
            opening.insert(p.id, time_to_minutes(p.start_time.as_deref(), fallback));
        }
        Self { order, opening }
    }

    pub fn contains(&self, id: PitchId) -> bool {
        self.opening.contains_key(&id)
    }

    /// Daily opening time in minutes. Unknown pitches open at midnight.
    pub fn opening(&self, id: PitchId) -> u32 {
        self.opening.get(&id).copied().unwrap_or(0)
    }

    pub fn first(&self) -> Option<PitchId> {
        self.order.first().copied()
    }

    /// Pitch ids in configured order.
    pub fn ids(&self) -> &[PitchId] {
        &self.order
    }
}

/// Groups of one competition by id. Dangling group references resolve to `None`.
#[derive(Clone, Debug)]
pub struct GroupTable<'a> {
    by_id: HashMap<GroupId, &'a Group>,
}

impl<'a> GroupTable<'a> {
    pub fn build(groups: &'a [Group]) -> Self {
        Self {
            by_id: groups.iter().map(|g| (g.id, g)).collect(),
        }
    }

    pub fn get(&self, id: Option<GroupId>) -> Option<&'a Group> {
        id.and_then(|id| self.by_id.get(&id).copied())
    }
}

/// Resolved timing of one fixture, in minutes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Timing {
    pub duration: u32,
    pub slack: u32,
    pub rest: u32,
}

/// Fixture override, then group default, then config default.
pub fn resolve_timing(fixture: &Fixture, group: Option<&Group>, config: &SchedulerConfig) -> Timing {
    let duration = if fixture.duration > 0 {
        fixture.duration
    } else {
        group
            .and_then(|g| g.default_duration)
            .unwrap_or(config.default_duration)
    };
    Timing {
        duration,
        slack: fixture
            .slack
            .or_else(|| group.and_then(|g| g.default_slack))
            .unwrap_or(config.default_slack),
        rest: fixture
            .rest
            .or_else(|| group.and_then(|g| g.default_rest))
            .unwrap_or(0),
    }
}

/// Where the next fixture may start on each pitch.
#[derive(Clone, Debug, Default)]
pub struct PitchCursors {
    cursors: HashMap<PitchId, u32>,
}

impl PitchCursors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cursor, or the pitch's opening time if nothing was placed yet.
    pub fn get(&self, pitch_id: PitchId, pitches: &PitchTable) -> u32 {
        self.cursors
            .get(&pitch_id)
            .copied()
            .unwrap_or_else(|| pitches.opening(pitch_id))
    }

    pub fn set(&mut self, pitch_id: PitchId, minutes: u32) {
        self.cursors.insert(pitch_id, minutes);
    }

    /// Raise the cursor to at least `minutes`.
    pub fn raise(&mut self, pitch_id: PitchId, minutes: u32, pitches: &PitchTable) {
        let current = self.get(pitch_id, pitches);
        self.set(pitch_id, current.max(minutes));
    }

    /// Highest cursor among the given pitches.
    pub fn max_over<'p>(
        &self,
        pitch_ids: impl IntoIterator<Item = &'p PitchId>,
        pitches: &PitchTable,
    ) -> Option<u32> {
        pitch_ids
            .into_iter()
            .map(|p| self.get(*p, pitches))
            .max()
    }
}

/// Outcome of placing one fixture on one pitch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Placement {
    pub pitch_id: PitchId,
    pub start: u32,
    pub duration: u32,
    /// Pitch cursor after this fixture (`start + duration + slack`).
    pub next_free: u32,
    /// End used for knockout tier sequencing (`start + duration + max(slack, rest)`).
    pub tier_end: u32,
    /// Idle minutes beyond the pitch's natural continuation.
    pub slack_before: u32,
}

/// Place a fixture at `earliest` or later, clear of breaks.
///
/// `natural` is where the pitch would have continued without any tier clamp; the difference to the
/// final start becomes `slack_before`.
pub fn place(
    pitch_id: PitchId,
    earliest: u32,
    natural: u32,
    timing: Timing,
    breaks: &BreakIndex,
) -> Placement {
    let start = breaks.avoid(pitch_id, earliest, timing.duration);
    Placement {
        pitch_id,
        start,
        duration: timing.duration,
        next_free: start.saturating_add(timing.duration).saturating_add(timing.slack),
        tier_end: start
            .saturating_add(timing.duration)
            .saturating_add(timing.slack.max(timing.rest)),
        slack_before: start.saturating_sub(natural),
    }
}

/// Write a placement onto a fixture. Group-stage placements carry no `slack_before`.
pub fn apply_placement(fixture: &mut Fixture, placement: &Placement, record_gap: bool) {
    fixture.pitch_id = Some(placement.pitch_id);
    fixture.start_time = Some(minutes_to_time(placement.start));
    fixture.duration = placement.duration;
    fixture.slack_before = if record_gap {
        Some(placement.slack_before)
    } else {
        None
    };
    fixture.timing = TimingState::Tentative;
}
