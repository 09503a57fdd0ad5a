//! Schedule summary statistics.
//!
//! Computes per-team venue counts and the home-games matrix from a finished
//! schedule, for reporting and for checking class profiles.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Home / away | Games hosted / visited per team |
//! | Home matrix | `home[a][b]` = games `a` hosts against `b` |
//! | Class profile | Histogram of `home[t][o]` over every `o`, zero outside the class |
//! | Max imbalance | Largest per-team `|home - away|` |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{LeagueTopology, OpponentClass, Schedule, Tid};

/// Venue statistics for one schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Total games.
    pub total_games: usize,
    /// Home games per team.
    pub home_by_team: BTreeMap<Tid, u32>,
    /// Away games per team.
    pub away_by_team: BTreeMap<Tid, u32>,
    /// Largest per-team `|home - away|`.
    pub max_imbalance: u32,
    /// Teams in topology order.
    tids: Vec<Tid>,
    /// Row-major `home[a][b]` over `tids` indices.
    home_matrix: Vec<u32>,
    /// Opponent class per `(a, b)` index, `None` on the diagonal.
    classes: Vec<Option<OpponentClass>>,
}

impl ScheduleSummary {
    /// Computes the summary of a schedule on its topology.
    ///
    /// Games naming teams outside the topology are ignored.
    pub fn calculate(schedule: &Schedule, topology: &LeagueTopology) -> Self {
        let tids: Vec<Tid> = topology.tids().collect();
        let n = tids.len();
        let index: BTreeMap<Tid, usize> = tids.iter().enumerate().map(|(i, &t)| (t, i)).collect();

        let mut home_matrix = vec![0u32; n * n];
        let mut home_by_team: BTreeMap<Tid, u32> = tids.iter().map(|&t| (t, 0)).collect();
        let mut away_by_team = home_by_team.clone();

        for game in schedule {
            let (Some(&h), Some(&a)) = (index.get(&game.home), index.get(&game.away)) else {
                continue;
            };
            home_matrix[h * n + a] += 1;
            *home_by_team.entry(game.home).or_insert(0) += 1;
            *away_by_team.entry(game.away).or_insert(0) += 1;
        }

        let mut classes = Vec::with_capacity(n * n);
        for &a in &tids {
            for &b in &tids {
                classes.push(topology.classify(a, b));
            }
        }

        let max_imbalance = tids
            .iter()
            .map(|t| home_by_team[t].abs_diff(away_by_team[t]))
            .max()
            .unwrap_or(0);

        Self {
            total_games: schedule.len(),
            home_by_team,
            away_by_team,
            max_imbalance,
            tids,
            home_matrix,
            classes,
        }
    }

    /// Home games of `tid`. Zero for unknown teams.
    pub fn home_count(&self, tid: Tid) -> u32 {
        self.home_by_team.get(&tid).copied().unwrap_or(0)
    }

    /// Away games of `tid`. Zero for unknown teams.
    pub fn away_count(&self, tid: Tid) -> u32 {
        self.away_by_team.get(&tid).copied().unwrap_or(0)
    }

    /// Games `home` hosts against `away`.
    pub fn home_games(&self, home: Tid, away: Tid) -> u32 {
        match (self.position(home), self.position(away)) {
            (Some(h), Some(a)) => self.home_matrix[h * self.tids.len() + a],
            _ => 0,
        }
    }

    /// Histogram of `tid`'s home games per opponent within `class`.
    ///
    /// Every team of the league (including `tid` itself) contributes one
    /// entry; opponents outside `class` count as zero. In the 30-team
    /// 82-game league each team's division profile is `{0: 26, 2: 4}`.
    pub fn class_profile(&self, tid: Tid, class: OpponentClass) -> BTreeMap<u32, usize> {
        let mut profile = BTreeMap::new();
        let Some(row) = self.position(tid) else {
            return profile;
        };
        let n = self.tids.len();
        for col in 0..n {
            let value = if self.classes[row * n + col] == Some(class) {
                self.home_matrix[row * n + col]
            } else {
                0
            };
            *profile.entry(value).or_insert(0) += 1;
        }
        profile
    }

    /// Whether every team's home and away counts differ by at most `tolerance`.
    pub fn is_balanced(&self, tolerance: u32) -> bool {
        self.max_imbalance <= tolerance
    }

    fn position(&self, tid: Tid) -> Option<usize> {
        self.tids.binary_search(&tid).ok()
    }
}
