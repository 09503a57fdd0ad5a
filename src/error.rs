//! Error taxonomy for schedule generation.
//!
//! Only two kinds of failure ever reach the caller:
//!
//! - [`ConfigurationError`]: the topology / game-count combination has no
//!   exact solution. Detected before any pairing work and never retried.
//! - [`ScheduleError::GenerationRetryExhausted`]: every seeded attempt failed
//!   validation.
//!
//! Internal defects (e.g. the assembler losing games) are not represented
//! here; they panic.

use thiserror::Error;

use crate::models::{ConferenceId, DivisionId, Tid};
use crate::validation::Violation;

/// The requested league cannot be scheduled exactly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("league needs at least 2 teams, got {count}")]
    TooFewTeams { count: usize },

    #[error("team {tid} appears more than once")]
    DuplicateTeam { tid: Tid },

    #[error("division {division} belongs to conferences {first} and {second}")]
    DivisionSpansConferences {
        division: DivisionId,
        first: ConferenceId,
        second: ConferenceId,
    },

    #[error("division {division} has {size} team(s); at least 2 are required")]
    DivisionTooSmall { division: DivisionId, size: usize },

    #[error("conference {conference} has {size} team(s); at least 2 are required")]
    ConferenceTooSmall { conference: ConferenceId, size: usize },

    #[error("games per team must be positive")]
    NoGames,

    #[error("{teams} teams x {games} games is odd; games cannot pair up")]
    OddTotalGames { teams: usize, games: u32 },

    #[error("{games} games per team is odd and uneven home/away splits are not enabled")]
    OddGamesPerTeam { games: u32 },

    #[error("expected {expected} teams, topology has {actual}")]
    TeamCountMismatch { expected: usize, actual: usize },

    #[error("no exact quota plan exists: {reason}")]
    Infeasible { reason: String },

    #[error("quota sum for team {tid} is {actual}, expected {expected}")]
    QuotaSumMismatch { tid: Tid, expected: u32, actual: u32 },
}

/// Errors returned by the schedule generation pipeline.
#[derive(Error, Debug, Clone)]
pub enum ScheduleError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("no valid schedule after {attempts} attempt(s); last attempt had {} violation(s)", .last_violations.len())]
    GenerationRetryExhausted {
        attempts: u32,
        last_violations: Vec<Violation>,
    },
}

impl ScheduleError {
    /// Whether another attempt with a different seed could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ScheduleError::Configuration(_) => false,
            ScheduleError::GenerationRetryExhausted { .. } => true,
        }
    }
}
