//! Pair generator: expands quotas into concrete games.
//!
//! # Algorithm
//!
//! 1. For each division, every pair inside it.
//! 2. For each conference, every pair across two of its divisions.
//! 3. Every pair across two conferences.
//!
//! Each pair emits `home_first` games hosted by `pair.first` and
//! `home_second` games hosted by `pair.second`. The three buckets are kept
//! apart so callers can inspect them by class; the generator never checks
//! totals, that is the validator's job.
//!
//! # Complexity
//! O(n² + g) where n = teams, g = games emitted.

use tracing::warn;

use crate::models::{LeagueTopology, QuotaTable, ScheduledGame, TeamPair, Tid};

/// Generated games, bucketed by opponent class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameBuckets {
    /// Games between division rivals.
    pub division: Vec<ScheduledGame>,
    /// Games between conference rivals in different divisions.
    pub conference: Vec<ScheduledGame>,
    /// Games between teams of different conferences.
    pub cross_conference: Vec<ScheduledGame>,
}

impl GameBuckets {
    /// Games across all buckets.
    pub fn total_len(&self) -> usize {
        self.division.len() + self.conference.len() + self.cross_conference.len()
    }

    /// Buckets in emission order.
    pub fn into_parts(self) -> Vec<Vec<ScheduledGame>> {
        vec![self.division, self.conference, self.cross_conference]
    }
}

/// Expands a quota table into games.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairGenerator;

impl PairGenerator {
    /// Creates a generator.
    pub fn new() -> Self {
        Self
    }

    /// Emits the games required by `quotas` for every pair of `topology`.
    ///
    /// A pair without a quota emits nothing and is logged.
    pub fn generate(&self, topology: &LeagueTopology, quotas: &QuotaTable) -> GameBuckets {
        let mut buckets = GameBuckets::default();

        for (_, members) in topology.divisions() {
            for (i, &a) in members.iter().enumerate() {
                for &b in &members[i + 1..] {
                    emit(quotas, a, b, &mut buckets.division);
                }
            }
        }

        let mut conference_members: Vec<Vec<Tid>> = Vec::new();
        for (_, divisions) in topology.conferences() {
            let groups: Vec<&[Tid]> = divisions
                .iter()
                .map(|&did| topology.division_members(did))
                .collect();
            for (i, left) in groups.iter().enumerate() {
                for right in &groups[i + 1..] {
                    for &a in *left {
                        for &b in *right {
                            emit(quotas, a, b, &mut buckets.conference);
                        }
                    }
                }
            }
            conference_members.push(groups.concat());
        }

        for (i, left) in conference_members.iter().enumerate() {
            for right in &conference_members[i + 1..] {
                for &a in left {
                    for &b in right {
                        emit(quotas, a, b, &mut buckets.cross_conference);
                    }
                }
            }
        }

        buckets
    }
}

fn emit(quotas: &QuotaTable, a: Tid, b: Tid, out: &mut Vec<ScheduledGame>) {
    let Some(pair) = TeamPair::new(a, b) else {
        return;
    };
    let Some(quota) = quotas.get(pair) else {
        warn!(%pair, "no quota for pair");
        return;
    };
    for _ in 0..quota.home_first {
        out.push(ScheduledGame::new(pair.first, pair.second));
    }
    for _ in 0..quota.home_second {
        out.push(ScheduledGame::new(pair.second, pair.first));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{uniform_league, OpponentClass, Quota};

    /// 2 conferences × 2 divisions × 2 teams; every class level is 2.
    fn small() -> (LeagueTopology, QuotaTable) {
        let topo = LeagueTopology::new(&uniform_league(2, 2, 2)).unwrap();
        let mut quotas = QuotaTable::new(14, false);
        for pair in topo.pairs() {
            let class = topo.classify(pair.first, pair.second).unwrap();
            quotas.insert(pair, Quota::symmetric(class, 2));
        }
        (topo, quotas)
    }

    #[test]
    fn test_buckets_by_class() {
        let (topo, quotas) = small();
        let buckets = PairGenerator::new().generate(&topo, &quotas);

        // 4 division pairs, 8 conference pairs, 16 cross pairs, 2 games each
        assert_eq!(buckets.division.len(), 8);
        assert_eq!(buckets.conference.len(), 16);
        assert_eq!(buckets.cross_conference.len(), 32);
        assert_eq!(buckets.total_len(), 56);

        for game in &buckets.division {
            assert_eq!(
                topo.classify(game.home, game.away),
                Some(OpponentClass::SameDivision)
            );
        }
        for game in &buckets.conference {
            assert_eq!(
                topo.classify(game.home, game.away),
                Some(OpponentClass::SameConferenceOtherDivision)
            );
        }
        for game in &buckets.cross_conference {
            assert_eq!(
                topo.classify(game.home, game.away),
                Some(OpponentClass::DifferentConference)
            );
        }
    }

    #[test]
    fn test_home_split_follows_quota() {
        let (topo, mut quotas) = small();
        let pair = TeamPair::new(0, 1).unwrap();
        quotas.insert(
            pair,
            Quota::with_extra_home(OpponentClass::SameDivision, 3, false),
        );
        let buckets = PairGenerator::new().generate(&topo, &quotas);

        let hosted_by_0 = buckets
            .division
            .iter()
            .filter(|g| g.home == 0 && g.away == 1)
            .count();
        let hosted_by_1 = buckets
            .division
            .iter()
            .filter(|g| g.home == 1 && g.away == 0)
            .count();
        assert_eq!(hosted_by_0, 1);
        assert_eq!(hosted_by_1, 2);
    }

    #[test]
    fn test_missing_quota_emits_nothing() {
        let (topo, _) = small();
        let buckets = PairGenerator::new().generate(&topo, &QuotaTable::new(14, false));
        assert_eq!(buckets.total_len(), 0);
    }
}
