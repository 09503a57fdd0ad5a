//! QuotaPlanner: per-pair game counts and home/away splits.
//!
//! Produces a [`QuotaTable`] covering every unordered pair of a topology, or
//! a [`ConfigurationError`] before any pairing work starts.
//!
//! # Pipeline
//!
//! 1. [`ClassLevels::candidates`]: strictly ordered league-wide base games
//!    per opponent class, most preferred first.
//! 2. [`plan_supplement`]: one extra game on selected pairs so every team
//!    reaches the target exactly (the Group A/B partition). The first
//!    candidate whose supplement keeps every team's per-class averages
//!    strictly ordered wins; if none does the league is infeasible.
//! 3. [`orient_odd_pairs`]: extra home game of every odd-total pair, balanced
//!    per team.
//! 4. Consistency check: every team's quotas sum to the target.
//!
//! # Reference case
//!
//! 30 teams (2 × 3 × 5), 82 games: division 4 (2/2), conference Group A 4
//! (2/2) for 6 opponents and Group B 3 (2/1 or 1/2) for 4, cross-conference 2
//! (1/1). `4×4 + 6×4 + 4×3 + 15×2 = 82`.

mod levels;
mod orientation;
mod supplement;

pub use levels::{class_order_holds, division_shapes, ClassLevels, DivisionShape};
pub use orientation::orient_odd_pairs;
pub use supplement::{
    plan_supplement, Supplement, SupplementCaps, SupplementFailure, SupplementPhase,
};

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::ScheduleConfig;
use crate::error::ConfigurationError;
use crate::models::{DivisionId, LeagueTopology, OpponentClass, Quota, QuotaTable, TeamPair};
use crate::tiebreak::{SeededTieBreak, TieBreak};

/// Planner output.
#[derive(Debug, Clone)]
pub struct QuotaPlan {
    /// Base levels per class.
    pub levels: ClassLevels,
    /// Phase the supplement was found in.
    pub phase: SupplementPhase,
    /// Per-pair quotas.
    pub table: QuotaTable,
}

/// Computes quota tables.
///
/// # Example
/// ```
/// use league_schedule::config::ScheduleConfig;
/// use league_schedule::models::{reference_league, LeagueTopology};
/// use league_schedule::planner::QuotaPlanner;
///
/// let topology = LeagueTopology::new(&reference_league()).unwrap();
/// let plan = QuotaPlanner::new()
///     .plan(&topology, &ScheduleConfig::new(82), 7)
///     .unwrap();
/// assert_eq!(plan.table.len(), 435);
/// assert_eq!(plan.table.total_games(), 1230);
/// ```
#[derive(Debug, Clone)]
pub struct QuotaPlanner {
    tie_break: Arc<dyn TieBreak>,
}

impl QuotaPlanner {
    /// Creates a planner with the seeded tie-break.
    pub fn new() -> Self {
        Self {
            tie_break: Arc::new(SeededTieBreak),
        }
    }

    /// Sets the extra-home tie-break policy.
    pub fn with_tie_break<T: TieBreak + 'static>(mut self, tie_break: T) -> Self {
        self.tie_break = Arc::new(tie_break);
        self
    }

    /// Plans quotas for `topology` under `config`.
    ///
    /// # Errors
    /// Any [`ConfigurationError`]: invalid settings, no strictly ordered
    /// exact plan, or a per-team sum mismatch.
    pub fn plan(
        &self,
        topology: &LeagueTopology,
        config: &ScheduleConfig,
        seed: u64,
    ) -> Result<QuotaPlan, ConfigurationError> {
        config.check(topology.num_teams())?;
        let games = config.num_games_per_team;
        let shapes = division_shapes(topology);

        let mut budget_hit = false;
        let mut tried = 0usize;
        for levels in ClassLevels::candidates(topology, games) {
            tried += 1;
            let residuals: BTreeMap<DivisionId, u32> = shapes
                .iter()
                .map(|(&did, shape)| (did, games - levels.base_games(shape)))
                .collect();
            let caps: BTreeMap<DivisionId, SupplementCaps> = shapes
                .iter()
                .map(|(&did, shape)| (did, levels.supplement_caps(shape)))
                .collect();

            // Capped search first; an uncapped plan may still be ordered
            // when division extras lift the top average.
            for limits in [&caps, &BTreeMap::new()] {
                let supplement = match plan_supplement(topology, &residuals, limits, seed) {
                    Ok(supplement) => supplement,
                    Err(SupplementFailure::BudgetExhausted) => {
                        budget_hit = true;
                        continue;
                    }
                    Err(SupplementFailure::NoPlan) => continue,
                };
                let totals = pair_totals(topology, &levels, &supplement);
                if class_order_holds(topology, totals.iter().copied()) {
                    debug!(
                        division = levels.division,
                        conference = levels.conference,
                        cross = levels.cross,
                        ?residuals,
                        phase = ?supplement.phase,
                        tried,
                        "class levels chosen"
                    );
                    return self.finish(topology, config, levels, supplement.phase, totals, seed);
                }
            }
        }

        let reason = if budget_hit {
            format!("supplement search exceeded its budget after {tried} level candidates")
        } else {
            format!("no strictly ordered exact plan among {tried} level candidates")
        };
        Err(ConfigurationError::Infeasible { reason })
    }

    /// Orients odd pairs, builds the table and checks per-team sums.
    fn finish(
        &self,
        topology: &LeagueTopology,
        config: &ScheduleConfig,
        levels: ClassLevels,
        phase: SupplementPhase,
        totals: Vec<(TeamPair, OpponentClass, u32)>,
        seed: u64,
    ) -> Result<QuotaPlan, ConfigurationError> {
        let games = config.num_games_per_team;
        let odd_pairs: Vec<TeamPair> = totals
            .iter()
            .filter(|(_, _, total)| total % 2 == 1)
            .map(|&(pair, _, _)| pair)
            .collect();

        let hosts = orient_odd_pairs(&odd_pairs, seed, self.tie_break.as_ref());
        let mut table = QuotaTable::new(games, config.allow_uneven_home_away);
        for (pair, class, total) in totals {
            let quota = match hosts.get(&pair) {
                Some(&first_hosts) => Quota::with_extra_home(class, total, first_hosts),
                None => Quota::symmetric(class, total),
            };
            table.insert(pair, quota);
        }

        for tid in topology.tids() {
            let actual = table.total_for_team(tid);
            if actual != games {
                return Err(ConfigurationError::QuotaSumMismatch {
                    tid,
                    expected: games,
                    actual,
                });
            }
        }

        Ok(QuotaPlan {
            levels,
            phase,
            table,
        })
    }
}

/// Total games per pair: class level plus one for supplemented pairs.
fn pair_totals(
    topology: &LeagueTopology,
    levels: &ClassLevels,
    supplement: &Supplement,
) -> Vec<(TeamPair, OpponentClass, u32)> {
    topology
        .pairs()
        .into_iter()
        .filter_map(|pair| {
            let class = topology.classify(pair.first, pair.second)?;
            let total = levels.level(class) + u32::from(supplement.contains(pair));
            Some((pair, class, total))
        })
        .collect()
}

impl Default for QuotaPlanner {
    fn default() -> Self {
        Self::new()
    }
}
