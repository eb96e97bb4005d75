//! Scheduling logic: fixture generation, pitch allocation, recalculation, overlap enforcement.

mod allocator;
mod breaks;
mod commands;
mod cursors;
mod export;
mod knockout;
mod overlap;
mod recalculate;
mod round_robin;
mod time;

pub use allocator::{auto_schedule, schedule_competition, ScheduleScope};
pub use breaks::{avoid_breaks, BreakIndex, BreakInterval};
pub use commands::{apply, Command, FixturePatch, GroupSettings, NewFixture};
pub use cursors::{resolve_timing, Timing};
pub use export::schedule_csv;
pub use knockout::build_knockout;
pub use overlap::enforce_no_overlaps;
pub use recalculate::{recalculate, recalculate_competition};
pub use round_robin::{generate, generate_competition_fixtures, round_robin_pairings, GroupContext};
pub use time::{minutes_to_time, parse_start, parse_time, time_to_minutes, DEFAULT_START_MINUTES};
