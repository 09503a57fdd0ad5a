//! League settings captured at the call boundary.
//!
//! Generation reads no ambient state: everything it needs arrives in a
//! [`ScheduleConfig`] plus a seed. The config deserializes with defaults so
//! a host can store only the fields it overrides.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Games per team in the classic 30-team league.
pub const DEFAULT_GAMES_PER_TEAM: u32 = 82;

/// Seeded attempts before generation gives up.
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Settings for one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Games each team plays.
    pub num_games_per_team: u32,
    /// Permit odd `num_games_per_team`; each team's home and away counts
    /// then differ by exactly one.
    pub allow_uneven_home_away: bool,
    /// Seeded attempts before `GenerationRetryExhausted`.
    pub max_retries: u32,
    /// The caller's team count, checked against the topology when set.
    pub expected_team_count: Option<usize>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            num_games_per_team: DEFAULT_GAMES_PER_TEAM,
            allow_uneven_home_away: false,
            max_retries: DEFAULT_MAX_RETRIES,
            expected_team_count: None,
        }
    }
}

impl ScheduleConfig {
    /// Creates a config for `num_games_per_team`.
    pub fn new(num_games_per_team: u32) -> Self {
        Self {
            num_games_per_team,
            ..Default::default()
        }
    }

    /// Allows odd per-team game totals.
    pub fn with_uneven_home_away(mut self, allow: bool) -> Self {
        self.allow_uneven_home_away = allow;
        self
    }

    /// Sets the retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the expected team count.
    pub fn with_expected_team_count(mut self, count: usize) -> Self {
        self.expected_team_count = Some(count);
        self
    }

    /// Checks the settings against a team count.
    ///
    /// # Errors
    /// Zero games, a team-count mismatch, an odd league-wide game total, or
    /// an odd per-team total without `allow_uneven_home_away`.
    pub fn check(&self, num_teams: usize) -> Result<(), ConfigurationError> {
        let games = self.num_games_per_team;
        if games == 0 {
            return Err(ConfigurationError::NoGames);
        }
        if let Some(expected) = self.expected_team_count {
            if expected != num_teams {
                return Err(ConfigurationError::TeamCountMismatch {
                    expected,
                    actual: num_teams,
                });
            }
        }
        if (num_teams as u64 * games as u64) % 2 == 1 {
            return Err(ConfigurationError::OddTotalGames {
                teams: num_teams,
                games,
            });
        }
        if games % 2 == 1 && !self.allow_uneven_home_away {
            return Err(ConfigurationError::OddGamesPerTeam { games });
        }
        Ok(())
    }
}

/// A fresh seed from OS entropy, for "regenerate schedule" requests.
pub fn fresh_seed() -> u64 {
    rand::random()
}
