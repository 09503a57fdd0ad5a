//! Schedule (solution) model.
//!
//! A schedule is the complete multiset of (home, away) games for one
//! season. Games carry no date or result; ordering them into a calendar is
//! a downstream concern, so the order of `games` has no meaning.

use serde::{Deserialize, Serialize};

use super::{TeamPair, Tid};

/// A single game: `home` hosts `away`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScheduledGame {
    /// Hosting team.
    pub home: Tid,
    /// Visiting team.
    pub away: Tid,
}

impl ScheduledGame {
    /// Creates a game.
    pub fn new(home: Tid, away: Tid) -> Self {
        Self { home, away }
    }

    /// The unordered pair playing this game. `None` for a self-game.
    pub fn pair(&self) -> Option<TeamPair> {
        TeamPair::new(self.home, self.away)
    }

    /// Whether `tid` plays in this game.
    #[inline]
    pub fn involves(&self, tid: Tid) -> bool {
        self.home == tid || self.away == tid
    }
}

/// A complete season schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// All games, in no particular order.
    pub games: Vec<ScheduledGame>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a list of games.
    pub fn from_games(games: Vec<ScheduledGame>) -> Self {
        Self { games }
    }

    /// Adds a game.
    pub fn add_game(&mut self, game: ScheduledGame) {
        self.games.push(game);
    }

    /// Number of games.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether there are no games.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Iterates the games.
    pub fn iter(&self) -> std::slice::Iter<'_, ScheduledGame> {
        self.games.iter()
    }

    /// Consumes the schedule, returning the games.
    pub fn into_games(self) -> Vec<ScheduledGame> {
        self.games
    }

    /// Home games played by `tid`.
    pub fn home_count(&self, tid: Tid) -> usize {
        self.games.iter().filter(|g| g.home == tid).count()
    }

    /// Away games played by `tid`.
    pub fn away_count(&self, tid: Tid) -> usize {
        self.games.iter().filter(|g| g.away == tid).count()
    }

    /// Games between two teams, regardless of venue.
    pub fn games_between(&self, pair: TeamPair) -> usize {
        self.games
            .iter()
            .filter(|g| g.pair() == Some(pair))
            .count()
    }

    /// Whether any game involves `tid`.
    pub fn involves(&self, tid: Tid) -> bool {
        self.games.iter().any(|g| g.involves(tid))
    }

    /// Games sorted by (home, away); a canonical form for multiset comparison.
    pub fn sorted_games(&self) -> Vec<ScheduledGame> {
        let mut games = self.games.clone();
        games.sort_unstable();
        games
    }
}

impl IntoIterator for Schedule {
    type Item = ScheduledGame;
    type IntoIter = std::vec::IntoIter<ScheduledGame>;

    fn into_iter(self) -> Self::IntoIter {
        self.games.into_iter()
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a ScheduledGame;
    type IntoIter = std::slice::Iter<'a, ScheduledGame>;

    fn into_iter(self) -> Self::IntoIter {
        self.games.iter()
    }
}
