//! Season generation pipeline.
//!
//! # Algorithm
//!
//! 1. Build and check the [`LeagueTopology`] and [`ScheduleConfig`].
//! 2. Plan quotas with the attempt's seed.
//! 3. Expand quotas into games and assemble the schedule.
//! 4. Validate. On violations, derive the next seed and retry up to
//!    `max_retries` attempts.
//!
//! Configuration errors abort on the spot: they are properties of the
//! league, not of a seed, and retrying cannot fix them.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::config::{fresh_seed, ScheduleConfig};
use crate::error::ScheduleError;
use crate::models::{LeagueTopology, QuotaTable, Schedule, ScheduledGame, Team};
use crate::planner::{ClassLevels, QuotaPlanner, SupplementPhase};
use crate::tiebreak::TieBreak;
use crate::validation::{validate_schedule, Violation};

use super::{PairGenerator, ScheduleAssembler};

/// Input container for generation.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    /// Active teams.
    pub teams: Vec<Team>,
    /// League settings.
    pub config: ScheduleConfig,
    /// Seed of the first attempt.
    pub seed: u64,
}

impl ScheduleRequest {
    /// Creates a request with default settings and seed 0.
    pub fn new(teams: Vec<Team>, num_games_per_team: u32) -> Self {
        Self {
            teams,
            config: ScheduleConfig::new(num_games_per_team),
            seed: 0,
        }
    }

    /// Replaces the settings.
    pub fn with_config(mut self, config: ScheduleConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Draws a fresh seed from OS entropy.
    pub fn with_fresh_seed(mut self) -> Self {
        self.seed = fresh_seed();
        self
    }
}

/// A validated season.
#[derive(Debug, Clone)]
pub struct GeneratedSchedule {
    /// All games of the season.
    pub schedule: Schedule,
    /// Quotas the schedule satisfies.
    pub quotas: QuotaTable,
    /// Base class levels.
    pub levels: ClassLevels,
    /// Supplement phase used by the plan.
    pub phase: SupplementPhase,
    /// Seed of the successful attempt.
    pub seed: u64,
    /// Attempts made, including the successful one.
    pub attempts: u32,
}

/// Generates validated season schedules.
///
/// # Example
///
/// ```
/// use league_schedule::models::reference_league;
/// use league_schedule::scheduler::{ScheduleGenerator, ScheduleRequest};
///
/// let request = ScheduleRequest::new(reference_league(), 82).with_seed(2024);
/// let season = ScheduleGenerator::new().generate(&request).unwrap();
/// assert_eq!(season.schedule.len(), 1230);
/// assert_eq!(season.attempts, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScheduleGenerator {
    planner: QuotaPlanner,
    pairs: PairGenerator,
    assembler: ScheduleAssembler,
}

impl ScheduleGenerator {
    /// Creates a generator with the seeded tie-break.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the extra-home tie-break policy.
    pub fn with_tie_break<T: TieBreak + 'static>(mut self, tie_break: T) -> Self {
        self.planner = self.planner.with_tie_break(tie_break);
        self
    }

    /// Generates one season.
    ///
    /// # Errors
    /// - [`ScheduleError::Configuration`] for an invalid or infeasible league
    /// - [`ScheduleError::GenerationRetryExhausted`] when every attempt
    ///   fails validation
    pub fn generate(&self, request: &ScheduleRequest) -> Result<GeneratedSchedule, ScheduleError> {
        self.generate_with(request, |topology, quotas| {
            let buckets = self.pairs.generate(topology, quotas);
            self.assembler.assemble(buckets.into_parts())
        })
    }

    /// Runs the retry loop with `build` standing in for pair generation and
    /// assembly.
    pub(crate) fn generate_with<F>(
        &self,
        request: &ScheduleRequest,
        mut build: F,
    ) -> Result<GeneratedSchedule, ScheduleError>
    where
        F: FnMut(&LeagueTopology, &QuotaTable) -> Schedule,
    {
        let topology = LeagueTopology::new(&request.teams)?;
        let config = &request.config;
        config.check(topology.num_teams())?;

        let max_attempts = config.max_retries.max(1);
        let mut seeds = AttemptSeeds::new(request.seed);
        let mut last_violations: Vec<Violation> = Vec::new();

        for attempt in 1..=max_attempts {
            let seed = seeds.next_seed();
            let plan = self.planner.plan(&topology, config, seed)?;
            let schedule = build(&topology, &plan.table);

            match validate_schedule(&schedule, &topology, &plan.table) {
                Ok(()) => {
                    info!(
                        teams = topology.num_teams(),
                        games = schedule.len(),
                        seed,
                        attempt,
                        phase = ?plan.phase,
                        "schedule generated"
                    );
                    return Ok(GeneratedSchedule {
                        schedule,
                        quotas: plan.table,
                        levels: plan.levels,
                        phase: plan.phase,
                        seed,
                        attempts: attempt,
                    });
                }
                Err(violations) => {
                    warn!(
                        seed,
                        attempt,
                        violations = violations.len(),
                        first = %violations[0].message,
                        "schedule failed validation"
                    );
                    last_violations = violations;
                }
            }
        }

        Err(ScheduleError::GenerationRetryExhausted {
            attempts: max_attempts,
            last_violations,
        })
    }
}

/// Seeds for successive attempts: the request seed first, then draws from a
/// ChaCha stream keyed by it.
struct AttemptSeeds {
    first: Option<u64>,
    rng: ChaCha8Rng,
}

impl AttemptSeeds {
    fn new(seed: u64) -> Self {
        Self {
            first: Some(seed),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn next_seed(&mut self) -> u64 {
        self.first.take().unwrap_or_else(|| self.rng.random())
    }
}

/// Generates one season's games for `teams`.
///
/// Shorthand for [`ScheduleGenerator::generate`] with default settings.
pub fn generate_schedule(
    teams: &[Team],
    num_games_per_team: u32,
    seed: u64,
) -> Result<Vec<ScheduledGame>, ScheduleError> {
    let request = ScheduleRequest::new(teams.to_vec(), num_games_per_team).with_seed(seed);
    let season = ScheduleGenerator::new().generate(&request)?;
    Ok(season.schedule.into_games())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;
    use crate::models::{reference_league, uniform_league};
    use crate::validation::ViolationKind;

    #[test]
    fn test_reference_season() {
        let request = ScheduleRequest::new(reference_league(), 82).with_seed(1);
        let season = ScheduleGenerator::new().generate(&request).unwrap();

        assert_eq!(season.schedule.len(), 1230);
        assert_eq!(season.seed, 1);
        assert_eq!(season.attempts, 1);
        assert_eq!(season.phase, SupplementPhase::Conference);
        for tid in 0..30 {
            assert_eq!(season.schedule.home_count(tid), 41);
            assert_eq!(season.schedule.away_count(tid), 41);
        }
    }

    #[test]
    fn test_configuration_error_not_retried() {
        let request = ScheduleRequest::new(reference_league(), 81).with_seed(1);
        let err = ScheduleGenerator::new().generate(&request).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::Configuration(ConfigurationError::OddGamesPerTeam { games: 81 })
        ));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retry_exhausted() {
        let config = ScheduleConfig::new(14).with_max_retries(3);
        let request = ScheduleRequest::new(uniform_league(2, 2, 2), 14)
            .with_config(config)
            .with_seed(9);
        let generator = ScheduleGenerator::new();

        let mut plans = Vec::new();
        let err = generator
            .generate_with(&request, |topology, quotas| {
                plans.push(quotas.clone());
                let buckets = PairGenerator::new().generate(topology, quotas);
                let mut schedule = ScheduleAssembler::new().assemble(buckets.into_parts());
                schedule.games.pop();
                schedule
            })
            .unwrap_err();

        assert_eq!(plans.len(), 3);
        match err {
            ScheduleError::GenerationRetryExhausted {
                attempts,
                last_violations,
            } => {
                assert_eq!(attempts, 3);
                assert!(last_violations
                    .iter()
                    .any(|v| v.kind == ViolationKind::TotalGameCount));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_retry_recovers() {
        let request = ScheduleRequest::new(uniform_league(2, 2, 2), 14).with_seed(9);
        let generator = ScheduleGenerator::new();

        let mut calls = 0;
        let season = generator
            .generate_with(&request, |topology, quotas| {
                calls += 1;
                let buckets = PairGenerator::new().generate(topology, quotas);
                let mut schedule = ScheduleAssembler::new().assemble(buckets.into_parts());
                if calls == 1 {
                    schedule.games.clear();
                }
                schedule
            })
            .unwrap();

        assert_eq!(season.attempts, 2);
        assert_ne!(season.seed, 9);
        assert_eq!(season.schedule.len(), 56);
    }

    #[test]
    fn test_attempt_seeds_deterministic() {
        let mut a = AttemptSeeds::new(5);
        let mut b = AttemptSeeds::new(5);
        assert_eq!(a.next_seed(), 5);
        assert_eq!(b.next_seed(), 5);
        for _ in 0..4 {
            assert_eq!(a.next_seed(), b.next_seed());
        }
    }

    #[test]
    fn test_generate_schedule_shorthand() {
        let games = generate_schedule(&uniform_league(2, 2, 2), 14, 3).unwrap();
        assert_eq!(games.len(), 56);
    }

    mod season {
        use super::*;
        use crate::models::{OpponentClass, Team, TeamPair, Tid};
        use crate::planner::class_order_holds;
        use crate::scheduler::ScheduleSummary;
        use proptest::prelude::*;
        use std::collections::BTreeMap;

        fn reference_games(seed: u64) -> Schedule {
            let request = ScheduleRequest::new(reference_league(), 82).with_seed(seed);
            ScheduleGenerator::new()
                .generate(&request)
                .unwrap()
                .schedule
        }

        #[test]
        fn test_reference_class_profiles() {
            let schedule = reference_games(2024);
            let topology = LeagueTopology::new(&reference_league()).unwrap();
            let summary = ScheduleSummary::calculate(&schedule, &topology);

            assert!(summary.is_balanced(0));
            for tid in 0..30 {
                assert_eq!(
                    summary.class_profile(tid, OpponentClass::SameDivision),
                    BTreeMap::from([(0, 26), (2, 4)])
                );
                assert_eq!(
                    summary.class_profile(tid, OpponentClass::SameConferenceOtherDivision),
                    BTreeMap::from([(0, 20), (1, 2), (2, 8)])
                );
                assert_eq!(
                    summary.class_profile(tid, OpponentClass::DifferentConference),
                    BTreeMap::from([(0, 15), (1, 15)])
                );
            }
        }

        #[test]
        fn test_same_seed_same_multiset() {
            assert_eq!(
                reference_games(77).sorted_games(),
                reference_games(77).sorted_games()
            );
        }

        #[test]
        fn test_team_order_irrelevant() {
            let mut shuffled = reference_league();
            shuffled.reverse();
            let request = ScheduleRequest::new(shuffled, 82).with_seed(77);
            let season = ScheduleGenerator::new().generate(&request).unwrap();
            assert_eq!(
                season.schedule.sorted_games(),
                reference_games(77).sorted_games()
            );
        }

        #[test]
        fn test_different_seeds_both_valid() {
            let topology = LeagueTopology::new(&reference_league()).unwrap();
            for seed in [3, 4] {
                let schedule = reference_games(seed);
                let summary = ScheduleSummary::calculate(&schedule, &topology);
                assert_eq!(summary.total_games, 1230);
                assert!(summary.is_balanced(0));
            }
        }

        #[test]
        fn test_contracted_league() {
            let removed: Tid = 7;
            let teams: Vec<_> = reference_league()
                .into_iter()
                .filter(|t| t.tid != removed)
                .collect();
            let config = ScheduleConfig::new(82).with_expected_team_count(29);
            let request = ScheduleRequest::new(teams, 82)
                .with_config(config)
                .with_seed(11);
            let season = ScheduleGenerator::new().generate(&request).unwrap();

            assert_eq!(season.schedule.len(), 29 * 82 / 2);
            assert!(!season.schedule.involves(removed));
            for tid in (0..30).filter(|&t| t != removed) {
                assert_eq!(season.schedule.home_count(tid), 41);
                assert_eq!(season.schedule.away_count(tid), 41);
            }
        }

        #[test]
        fn test_odd_games_per_team() {
            let config = ScheduleConfig::new(3).with_uneven_home_away(true);
            let request = ScheduleRequest::new(uniform_league(1, 1, 4), 3)
                .with_config(config)
                .with_seed(5);
            let season = ScheduleGenerator::new().generate(&request).unwrap();
            assert_eq!(season.schedule.len(), 6);
            for tid in 0..4 {
                let home = season.schedule.home_count(tid);
                let away = season.schedule.away_count(tid);
                assert_eq!(home + away, 3);
                assert_eq!(home.abs_diff(away), 1);
            }
        }

        #[test]
        fn test_class_ordering_across_leagues() {
            let mut contracted = reference_league();
            contracted.retain(|t| t.tid != 0 && t.tid != 12);
            let mut expanded = reference_league();
            expanded.push(Team::new(30, 0, 0));
            let cases = [
                (reference_league(), 60),
                (reference_league(), 86),
                (contracted, 82),
                (expanded, 72),
                (uniform_league(2, 3, 6), 72),
            ];

            for (teams, games) in cases {
                let topology = LeagueTopology::new(&teams).unwrap();
                let request = ScheduleRequest::new(teams, games).with_seed(21);
                let season = ScheduleGenerator::new().generate(&request).unwrap();

                let mut counts: BTreeMap<TeamPair, u32> = BTreeMap::new();
                for game in &season.schedule {
                    if let Some(pair) = TeamPair::new(game.home, game.away) {
                        *counts.entry(pair).or_insert(0) += 1;
                    }
                }
                let totals = counts.into_iter().filter_map(|(pair, played)| {
                    let class = topology.classify(pair.first, pair.second)?;
                    Some((pair, class, played))
                });
                assert!(
                    class_order_holds(&topology, totals),
                    "{} teams, {games} games",
                    topology.num_teams()
                );
                assert!(validate_schedule(&season.schedule, &topology, &season.quotas).is_ok());
            }
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(128))]

            #[test]
            fn reference_season_valid_for_any_seed(seed: u64) {
                let request = ScheduleRequest::new(reference_league(), 82).with_seed(seed);
                let season = ScheduleGenerator::new().generate(&request).unwrap();
                prop_assert_eq!(season.attempts, 1);
                let topology = LeagueTopology::new(&reference_league()).unwrap();
                let report = validate_schedule(&season.schedule, &topology, &season.quotas);
                prop_assert!(report.is_ok());
            }
        }
    }
}
