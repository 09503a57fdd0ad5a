//! Schedule assembly.

use crate::models::{Schedule, ScheduledGame};

/// Concatenates generated buckets into one season schedule.
///
/// Nothing is dropped, deduplicated or reordered within a bucket. A length
/// mismatch after concatenation is a defect and panics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleAssembler;

impl ScheduleAssembler {
    /// Creates an assembler.
    pub fn new() -> Self {
        Self
    }

    /// Joins `parts` in order.
    pub fn assemble(&self, parts: Vec<Vec<ScheduledGame>>) -> Schedule {
        let expected: usize = parts.iter().map(Vec::len).sum();
        let mut games = Vec::with_capacity(expected);
        for part in parts {
            games.extend(part);
        }
        assert_eq!(games.len(), expected, "assembled schedule lost games");
        Schedule::from_games(games)
    }
}
