//! Per-pair game quotas.
//!
//! A quota fixes how many times two teams meet and how those games split
//! between the two home venues. The [`QuotaTable`] covers every unordered
//! pair of a topology and is the contract between the planner, the pair
//! generator and the validator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{OpponentClass, TeamPair, Tid};

/// Required games between one pair of teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quota {
    /// Opponent class of the pair.
    pub class: OpponentClass,
    /// Total games between the two teams.
    pub total_games: u32,
    /// Home games for `pair.first`.
    pub home_first: u32,
    /// Home games for `pair.second`.
    pub home_second: u32,
}

impl Quota {
    /// Creates an evenly split quota. `total_games` must be even.
    pub fn symmetric(class: OpponentClass, total_games: u32) -> Self {
        debug_assert!(total_games % 2 == 0);
        Self {
            class,
            total_games,
            home_first: total_games / 2,
            home_second: total_games / 2,
        }
    }

    /// Creates an odd quota where one side hosts the extra game.
    pub fn with_extra_home(
        class: OpponentClass,
        total_games: u32,
        first_hosts_extra: bool,
    ) -> Self {
        let low = total_games / 2;
        let high = total_games - low;
        let (home_first, home_second) = if first_hosts_extra {
            (high, low)
        } else {
            (low, high)
        };
        Self {
            class,
            total_games,
            home_first,
            home_second,
        }
    }

    /// Whether the home split is uneven.
    #[inline]
    pub fn is_asymmetric(&self) -> bool {
        self.home_first != self.home_second
    }

    /// Home games for `tid` within `pair`. Zero if `tid` is not in the pair.
    pub fn home_for(&self, pair: TeamPair, tid: Tid) -> u32 {
        if tid == pair.first {
            self.home_first
        } else if tid == pair.second {
            self.home_second
        } else {
            0
        }
    }
}

/// Quotas for every unordered pair of a league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaTable {
    games_per_team: u32,
    uneven_home_away: bool,
    entries: BTreeMap<TeamPair, Quota>,
}

impl QuotaTable {
    /// Creates an empty table for a league playing `games_per_team`.
    pub fn new(games_per_team: u32, uneven_home_away: bool) -> Self {
        Self {
            games_per_team,
            uneven_home_away,
            entries: BTreeMap::new(),
        }
    }

    /// Sets the quota for a pair.
    pub fn insert(&mut self, pair: TeamPair, quota: Quota) {
        debug_assert_eq!(quota.home_first + quota.home_second, quota.total_games);
        self.entries.insert(pair, quota);
    }

    /// Quota for a pair.
    pub fn get(&self, pair: TeamPair) -> Option<&Quota> {
        self.entries.get(&pair)
    }

    /// All pairs with their quotas, in pair order.
    pub fn iter(&self) -> impl Iterator<Item = (TeamPair, &Quota)> + '_ {
        self.entries.iter().map(|(&p, q)| (p, q))
    }

    /// Number of pairs covered.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Target games per team.
    pub fn games_per_team(&self) -> u32 {
        self.games_per_team
    }

    /// Whether home and away counts may differ by one (odd game totals).
    pub fn allows_uneven_home_away(&self) -> bool {
        self.uneven_home_away
    }

    /// Games scheduled for `tid` across all its pairs.
    pub fn total_for_team(&self, tid: Tid) -> u32 {
        self.entries
            .iter()
            .filter(|(p, _)| p.contains(tid))
            .map(|(_, q)| q.total_games)
            .sum()
    }

    /// Home games for `tid` across all its pairs.
    pub fn home_for_team(&self, tid: Tid) -> u32 {
        self.entries
            .iter()
            .map(|(&p, q)| q.home_for(p, tid))
            .sum()
    }

    /// Total games in the season.
    pub fn total_games(&self) -> u64 {
        self.entries.values().map(|q| q.total_games as u64).sum()
    }
}
