//! Schedule validation.
//!
//! Re-derives every schedule invariant from the raw games and the topology,
//! without touching planner or generator internals. Detects:
//! - Wrong season game count
//! - Self-games and games naming unknown teams
//! - Per-team game count and home/away imbalance
//! - Missing or misclassified pair quotas
//! - Per-pair head-to-head totals and home splits differing from the quota
//!
//! All violations are collected; the schedule is never modified.

use std::collections::HashMap;

use crate::models::{LeagueTopology, QuotaTable, Schedule, TeamPair, Tid};

/// Validation result.
pub type ValidationResult = Result<(), Vec<Violation>>;

/// A violated schedule invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Violation category.
    pub kind: ViolationKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of schedule violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// Season length differs from `teams * games / 2`.
    TotalGameCount,
    /// A team is scheduled against itself.
    SelfGame,
    /// A game names a team outside the topology.
    UnknownTeam,
    /// A team's home + away differs from games per team.
    TeamGameCount,
    /// A team's home and away counts are not balanced.
    HomeAwayImbalance,
    /// A pair has no quota.
    MissingQuota,
    /// A quota's opponent class disagrees with the topology.
    ClassMismatch,
    /// Games between a pair differ from the quota total.
    PairTotalMismatch,
    /// A pair's home split differs from the quota.
    PairHomeSplitMismatch,
}

impl Violation {
    fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a schedule against its topology and quota table.
///
/// Checks:
/// 1. `|schedule| == teams * games_per_team / 2`
/// 2. No self-games, no unknown teams
/// 3. Every team plays `games_per_team` games
/// 4. Home == away (even totals) or differ by exactly one (odd totals,
///    only when the table allows it)
/// 5. Every pair has a quota whose class matches the topology
/// 6. Every pair's head-to-head total and home split match its quota
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(violations)` with every detected issue.
pub fn validate_schedule(
    schedule: &Schedule,
    topology: &LeagueTopology,
    quotas: &QuotaTable,
) -> ValidationResult {
    let mut violations = Vec::new();
    let games_per_team = quotas.games_per_team() as u64;

    let expected_total = topology.num_teams() as u64 * games_per_team / 2;
    if schedule.len() as u64 != expected_total {
        violations.push(Violation::new(
            ViolationKind::TotalGameCount,
            format!(
                "Schedule has {} games, expected {expected_total}",
                schedule.len()
            ),
        ));
    }

    // Tally venues per team and per pair straight from the games
    let mut venues: HashMap<Tid, (u64, u64)> = HashMap::new();
    let mut hosted: HashMap<(Tid, Tid), u64> = HashMap::new();
    for game in schedule {
        if game.home == game.away {
            violations.push(Violation::new(
                ViolationKind::SelfGame,
                format!("Team {} is scheduled against itself", game.home),
            ));
            continue;
        }
        let mut known = true;
        for tid in [game.home, game.away] {
            if !topology.contains(tid) {
                known = false;
                violations.push(Violation::new(
                    ViolationKind::UnknownTeam,
                    format!("Game {}@{} names unknown team {tid}", game.away, game.home),
                ));
            }
        }
        if !known {
            continue;
        }
        venues.entry(game.home).or_default().0 += 1;
        venues.entry(game.away).or_default().1 += 1;
        *hosted.entry((game.home, game.away)).or_insert(0) += 1;
    }

    for tid in topology.tids() {
        let (home, away) = venues.get(&tid).copied().unwrap_or((0, 0));
        if home + away != games_per_team {
            violations.push(Violation::new(
                ViolationKind::TeamGameCount,
                format!(
                    "Team {tid} plays {} games, expected {games_per_team}",
                    home + away
                ),
            ));
        }
        let diff = home.abs_diff(away);
        let balanced = if games_per_team % 2 == 0 {
            diff == 0
        } else {
            diff == 1 && quotas.allows_uneven_home_away()
        };
        if !balanced {
            violations.push(Violation::new(
                ViolationKind::HomeAwayImbalance,
                format!("Team {tid} has {home} home and {away} away games"),
            ));
        }
    }

    for pair in topology.pairs() {
        check_pair(pair, topology, quotas, &hosted, &mut violations);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn check_pair(
    pair: TeamPair,
    topology: &LeagueTopology,
    quotas: &QuotaTable,
    hosted: &HashMap<(Tid, Tid), u64>,
    violations: &mut Vec<Violation>,
) {
    let Some(quota) = quotas.get(pair) else {
        violations.push(Violation::new(
            ViolationKind::MissingQuota,
            format!("Pair {pair} has no quota"),
        ));
        return;
    };

    if let Some(class) = topology.classify(pair.first, pair.second) {
        if class != quota.class {
            violations.push(Violation::new(
                ViolationKind::ClassMismatch,
                format!(
                    "Pair {pair} is {class} but its quota is for {}",
                    quota.class
                ),
            ));
        }
    }

    let first_home = hosted.get(&(pair.first, pair.second)).copied().unwrap_or(0);
    let second_home = hosted.get(&(pair.second, pair.first)).copied().unwrap_or(0);
    let total = first_home + second_home;
    if total != quota.total_games as u64 {
        violations.push(Violation::new(
            ViolationKind::PairTotalMismatch,
            format!(
                "Pair {pair} meets {total} times, quota is {}",
                quota.total_games
            ),
        ));
    } else if first_home != quota.home_first as u64 || second_home != quota.home_second as u64 {
        violations.push(Violation::new(
            ViolationKind::PairHomeSplitMismatch,
            format!(
                "Pair {pair} splits {first_home}/{second_home}, quota is {}/{}",
                quota.home_first, quota.home_second
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OpponentClass, Quota, ScheduledGame, Team};

    /// Three teams in one division, 4 games each: two per pair, split 1/1.
    fn sample() -> (LeagueTopology, QuotaTable, Schedule) {
        let topo = LeagueTopology::new(&[
            Team::new(1, 0, 0),
            Team::new(2, 0, 0),
            Team::new(3, 0, 0),
        ])
        .unwrap();
        let mut quotas = QuotaTable::new(4, false);
        for pair in topo.pairs() {
            quotas.insert(pair, Quota::symmetric(OpponentClass::SameDivision, 2));
        }
        let schedule = Schedule::from_games(vec![
            ScheduledGame::new(1, 2),
            ScheduledGame::new(2, 1),
            ScheduledGame::new(1, 3),
            ScheduledGame::new(3, 1),
            ScheduledGame::new(2, 3),
            ScheduledGame::new(3, 2),
        ]);
        (topo, quotas, schedule)
    }

    fn kinds(result: ValidationResult) -> Vec<ViolationKind> {
        result.unwrap_err().into_iter().map(|v| v.kind).collect()
    }

    #[test]
    fn test_valid_schedule() {
        let (topo, quotas, schedule) = sample();
        assert!(validate_schedule(&schedule, &topo, &quotas).is_ok());
    }

    #[test]
    fn test_missing_game() {
        let (topo, quotas, mut schedule) = sample();
        schedule.games.pop();
        let kinds = kinds(validate_schedule(&schedule, &topo, &quotas));
        assert!(kinds.contains(&ViolationKind::TotalGameCount));
        assert!(kinds.contains(&ViolationKind::TeamGameCount));
        assert!(kinds.contains(&ViolationKind::PairTotalMismatch));
    }

    #[test]
    fn test_flipped_venue() {
        let (topo, quotas, mut schedule) = sample();
        // 1@2 becomes a second 2-hosts-1: totals intact, split wrong
        schedule.games[0] = ScheduledGame::new(2, 1);
        let kinds = kinds(validate_schedule(&schedule, &topo, &quotas));
        assert!(!kinds.contains(&ViolationKind::TotalGameCount));
        assert!(kinds.contains(&ViolationKind::HomeAwayImbalance));
        assert!(kinds.contains(&ViolationKind::PairHomeSplitMismatch));
    }

    #[test]
    fn test_self_game() {
        let (topo, quotas, mut schedule) = sample();
        schedule.games[0] = ScheduledGame::new(1, 1);
        let kinds = kinds(validate_schedule(&schedule, &topo, &quotas));
        assert!(kinds.contains(&ViolationKind::SelfGame));
    }

    #[test]
    fn test_unknown_team() {
        let (topo, quotas, mut schedule) = sample();
        schedule.games[0] = ScheduledGame::new(1, 99);
        let kinds = kinds(validate_schedule(&schedule, &topo, &quotas));
        assert!(kinds.contains(&ViolationKind::UnknownTeam));
    }

    #[test]
    fn test_missing_and_misclassified_quota() {
        let (topo, _, schedule) = sample();
        let mut quotas = QuotaTable::new(4, false);
        quotas.insert(
            TeamPair::new(1, 2).unwrap(),
            Quota::symmetric(OpponentClass::DifferentConference, 2),
        );
        quotas.insert(
            TeamPair::new(1, 3).unwrap(),
            Quota::symmetric(OpponentClass::SameDivision, 2),
        );
        let kinds = kinds(validate_schedule(&schedule, &topo, &quotas));
        assert_eq!(
            kinds,
            vec![ViolationKind::ClassMismatch, ViolationKind::MissingQuota]
        );
    }

    #[test]
    fn test_uneven_split_requires_opt_in() {
        // Two teams, 3 games each
        let topo = LeagueTopology::new(&[Team::new(1, 0, 0), Team::new(2, 0, 0)]).unwrap();
        let schedule = Schedule::from_games(vec![
            ScheduledGame::new(1, 2),
            ScheduledGame::new(1, 2),
            ScheduledGame::new(2, 1),
        ]);
        let pair = TeamPair::new(1, 2).unwrap();

        let mut allowed = QuotaTable::new(3, true);
        allowed.insert(pair, Quota::with_extra_home(OpponentClass::SameDivision, 3, true));
        assert!(validate_schedule(&schedule, &topo, &allowed).is_ok());

        let mut strict = QuotaTable::new(3, false);
        strict.insert(pair, Quota::with_extra_home(OpponentClass::SameDivision, 3, true));
        let kinds = kinds(validate_schedule(&schedule, &topo, &strict));
        assert_eq!(
            kinds,
            vec![
                ViolationKind::HomeAwayImbalance,
                ViolationKind::HomeAwayImbalance
            ]
        );
    }
}
