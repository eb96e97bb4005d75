//! Per-pitch index of unavailable intervals built from break items.

use crate::logic::time::parse_time;
use crate::models::{PitchBreakItem, PitchId};
use std::collections::HashMap;

/// Half-open `[start, end)` interval in minutes from midnight.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BreakInterval {
    pub start: u32,
    pub end: u32,
}

impl BreakInterval {
    /// Whether `[start, start + duration)` intersects this interval. Touching ends do not count.
    pub fn overlaps(&self, start: u32, duration: u32) -> bool {
        let end = start.saturating_add(duration);
        if duration == 0 {
            return self.start <= start && start < self.end;
        }
        start < self.end && self.start < end
    }
}

/// Sorted break intervals keyed by pitch.
#[derive(Clone, Debug, Default)]
pub struct BreakIndex {
    by_pitch: HashMap<PitchId, Vec<BreakInterval>>,
}

impl BreakIndex {
    /// Build the index. Items with an unparseable start or zero duration are skipped.
    pub fn build(breaks: &[PitchBreakItem]) -> Self {
        let mut by_pitch: HashMap<PitchId, Vec<BreakInterval>> = HashMap::new();
        for b in breaks {
            let Some(start) = parse_time(&b.start_time) else {
                log::warn!(
                    "Ignoring break '{}' on pitch {}: start '{}' is not HH:mm",
                    b.label,
                    b.pitch_id,
                    b.start_time
                );
                continue;
            };
            if b.duration == 0 {
                continue;
            }
            by_pitch.entry(b.pitch_id).or_default().push(BreakInterval {
                start,
                end: start.saturating_add(b.duration),
            });
        }
        for intervals in by_pitch.values_mut() {
            intervals.sort_by_key(|i| (i.start, i.end));
        }
        Self { by_pitch }
    }

    /// Sorted intervals for one pitch (empty if it has none).
    pub fn intervals(&self, pitch_id: PitchId) -> &[BreakInterval] {
        self.by_pitch
            .get(&pitch_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Earliest start at or after `start` where `[start, start + duration)` clears every break
    /// on the pitch. Cascading breaks are handled by re-checking after each move.
    pub fn avoid(&self, pitch_id: PitchId, start: u32, duration: u32) -> u32 {
        avoid_breaks(start, duration, self.intervals(pitch_id))
    }
}

/// Push `start` past every overlapping interval until none overlaps.
///
/// Each move only goes forward past one interval, so `intervals.len() + 1` passes always suffice.
pub fn avoid_breaks(start: u32, duration: u32, intervals: &[BreakInterval]) -> u32 {
    let mut start = start;
    let max_passes = intervals.len() + 1;
    for _ in 0..max_passes {
        match intervals.iter().find(|b| b.overlaps(start, duration)) {
            Some(b) => start = b.end,
            None => return start,
        }
    }
    log::warn!(
        "Break avoidance did not settle after {} passes; keeping start {}",
        max_passes,
        start
    );
    start
}
