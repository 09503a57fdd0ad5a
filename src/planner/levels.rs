//! Per-class game levels.
//!
//! A level is the number of games every pair of a class plays before any
//! supplement is added. Levels are league-wide; per-division shortfalls are
//! left as residuals for the supplement search.
//!
//! # Rule
//!
//! Levels must satisfy `division > conference > cross` over the classes the
//! league has, and no division's base games may exceed the target `G`.
//! [`ClassLevels::candidates`] lists every such triple in preference order:
//!
//! 1. highest cross level first (`cross <= G / (n-1)`), so cross-conference
//!    games are the first bucket given up;
//! 2. then the highest conference level;
//! 3. then the lowest division level above it.
//!
//! A league with a single division has one class and takes the highest
//! level that fits. The planner walks the candidates until a supplement
//! keeps every team's per-class averages in the same strict order
//! ([`class_order_holds`]).
//!
//! The reference league (30 teams, 82 games) takes the first candidate,
//! 4 / 3 / 2, with a residual of 6 per team.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::supplement::SupplementCaps;
use crate::models::{DivisionId, LeagueTopology, OpponentClass, TeamPair, Tid};

/// Opponent counts shared by every member of one division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivisionShape {
    /// Division rivals (division size - 1).
    pub division: u32,
    /// Same-conference, other-division opponents.
    pub conference: u32,
    /// Other-conference opponents.
    pub cross: u32,
}

impl DivisionShape {
    /// Opponent count in a class.
    pub fn count(&self, class: OpponentClass) -> u32 {
        match class {
            OpponentClass::SameDivision => self.division,
            OpponentClass::SameConferenceOtherDivision => self.conference,
            OpponentClass::DifferentConference => self.cross,
        }
    }
}

/// Computes the opponent shape of every division.
pub fn division_shapes(topology: &LeagueTopology) -> BTreeMap<DivisionId, DivisionShape> {
    let n = topology.num_teams() as u32;
    let mut conference_sizes: BTreeMap<u32, u32> = BTreeMap::new();
    for (did, members) in topology.divisions() {
        if let Some(cid) = topology.conference_of_division(did) {
            *conference_sizes.entry(cid).or_insert(0) += members.len() as u32;
        }
    }

    topology
        .divisions()
        .map(|(did, members)| {
            let size = members.len() as u32;
            let conf_size = topology
                .conference_of_division(did)
                .and_then(|cid| conference_sizes.get(&cid).copied())
                .unwrap_or(size);
            let shape = DivisionShape {
                division: size - 1,
                conference: conf_size - size,
                cross: n - conf_size,
            };
            (did, shape)
        })
        .collect()
}

/// Base games per pair, by opponent class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLevels {
    /// Games per division rival.
    pub division: u32,
    /// Games per same-conference, other-division opponent (before supplement).
    pub conference: u32,
    /// Games per cross-conference opponent (before supplement).
    pub cross: u32,
}

impl ClassLevels {
    /// Strictly ordered levels that fit `games_per_team`, most preferred
    /// first.
    pub fn candidates(topology: &LeagueTopology, games_per_team: u32) -> Vec<ClassLevels> {
        let shapes: Vec<DivisionShape> = division_shapes(topology).into_values().collect();
        let opponents = topology.num_teams().saturating_sub(1) as u32;
        if opponents == 0 {
            return Vec::new();
        }
        let has_conference = shapes.iter().any(|s| s.conference > 0);
        let has_cross = shapes.iter().any(|s| s.cross > 0);
        let fits = |levels: &ClassLevels| {
            shapes
                .iter()
                .all(|shape| levels.base_games(shape) <= games_per_team)
        };

        let mut out = Vec::new();
        if !has_conference && !has_cross {
            for division in (0..=games_per_team / opponents).rev() {
                out.push(ClassLevels {
                    division,
                    conference: 0,
                    cross: 0,
                });
            }
            return out;
        }

        let max_cross = if has_cross {
            games_per_team / opponents
        } else {
            0
        };
        for cross in (0..=max_cross).rev() {
            // Without conference rivals the conference level mirrors cross.
            let conferences = if has_conference {
                let floor = if has_cross { cross + 1 } else { 0 };
                (floor..=games_per_team).rev()
            } else {
                (cross..=cross).rev()
            };
            for conference in conferences {
                let mut division = conference + 1;
                loop {
                    let levels = ClassLevels {
                        division,
                        conference,
                        cross,
                    };
                    if !fits(&levels) {
                        break;
                    }
                    out.push(levels);
                    division += 1;
                }
            }
        }
        out
    }

    /// Level for a class.
    pub fn level(&self, class: OpponentClass) -> u32 {
        match class {
            OpponentClass::SameDivision => self.division,
            OpponentClass::SameConferenceOtherDivision => self.conference,
            OpponentClass::DifferentConference => self.cross,
        }
    }

    /// Games a team of the given shape plays at base levels.
    pub fn base_games(&self, shape: &DivisionShape) -> u32 {
        OpponentClass::ALL
            .iter()
            .map(|&c| self.level(c) * shape.count(c))
            .sum()
    }

    /// Supplement caps that keep a division's averages strictly ordered.
    ///
    /// A class may take every one of its opponents only when the next level
    /// up is at least two higher; otherwise one opponent is left out so the
    /// class average stays below that level.
    pub fn supplement_caps(&self, shape: &DivisionShape) -> SupplementCaps {
        let conference = match shape.conference {
            0 => 0,
            c if self.division >= self.conference + 2 => c,
            c => c - 1,
        };
        let above_cross = if shape.conference > 0 {
            self.conference
        } else {
            self.division
        };
        let cross = match shape.cross {
            0 => 0,
            x if above_cross >= self.cross + 2 => x,
            x => x - 1,
        };
        SupplementCaps {
            division: shape.division,
            conference,
            cross,
        }
    }
}

/// Whether every team's average games per opponent strictly decrease from
/// division to conference to cross-conference, over the classes it faces.
///
/// `totals` lists each pair with its class and total games.
pub fn class_order_holds<I>(topology: &LeagueTopology, totals: I) -> bool
where
    I: IntoIterator<Item = (TeamPair, OpponentClass, u32)>,
{
    let mut sums: BTreeMap<Tid, [u64; 3]> = BTreeMap::new();
    for (pair, class, total) in totals {
        let slot = OpponentClass::ALL.iter().position(|&c| c == class).unwrap_or(0);
        for tid in [pair.first, pair.second] {
            sums.entry(tid).or_insert([0; 3])[slot] += u64::from(total);
        }
    }

    let shapes = division_shapes(topology);
    topology.tids().all(|tid| {
        let Some(shape) = topology.division_of(tid).and_then(|did| shapes.get(&did)) else {
            return false;
        };
        let games = sums.get(&tid).copied().unwrap_or([0; 3]);
        // (games, opponents) for each class the team actually faces
        let faced: Vec<(u64, u64)> = OpponentClass::ALL
            .iter()
            .zip(games)
            .map(|(&class, sum)| (sum, u64::from(shape.count(class))))
            .filter(|&(_, count)| count > 0)
            .collect();
        faced
            .windows(2)
            .all(|w| w[0].0 * w[1].1 > w[1].0 * w[0].1)
    })
}
