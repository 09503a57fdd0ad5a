//! Supplement planning: the extra game that lifts selected pairs one above
//! their class level.
//!
//! Every member of a division has the same opponent shape, so the residual
//! each team still needs after base levels is uniform within a division.
//! The supplement is therefore planned on the quotient graph of divisions:
//!
//! - a **cross-division block** `(D, E)` is a biregular bipartite graph in
//!   which each member of `D` gains `k_D` partners in `E` and each member of
//!   `E` gains `k_E` partners in `D` (`|D|·k_D = |E|·k_E`);
//! - an **intra-division block** is a `k`-regular graph inside one division.
//!
//! Inside the conference, supplemented pairs form *Group A* and the rest
//! *Group B*. The search runs in phases, each admitting more block kinds:
//! conference blocks only, then conference + cross-conference, then also
//! intra-division blocks. Which concrete teams end up paired is a
//! deterministic function of `(seed, division pair)`.
//!
//! [`SupplementCaps`] bound how many supplemented partners a division's
//! members may take per opponent class, which keeps the finished per-class
//! averages in division > conference > cross order.

use std::collections::{BTreeMap, BTreeSet};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{DivisionId, LeagueTopology, OpponentClass, TeamPair, Tid};

/// Nodes explored per phase before the phase is abandoned.
const SEARCH_BUDGET: usize = 1_000_000;

/// Which block kinds a successful supplement plan needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SupplementPhase {
    /// No team needed extra games.
    None,
    /// Conference blocks only (pure Group A/B partition).
    Conference,
    /// Conference and cross-conference blocks.
    CrossConference,
    /// All blocks, including intra-division.
    Division,
}

impl SupplementPhase {
    fn allowed(&self) -> &'static [OpponentClass] {
        match self {
            SupplementPhase::None => &[],
            SupplementPhase::Conference => &[OpponentClass::SameConferenceOtherDivision],
            SupplementPhase::CrossConference => &[
                OpponentClass::SameConferenceOtherDivision,
                OpponentClass::DifferentConference,
            ],
            SupplementPhase::Division => &[
                OpponentClass::SameConferenceOtherDivision,
                OpponentClass::DifferentConference,
                OpponentClass::SameDivision,
            ],
        }
    }
}

/// Pairs that receive one extra game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Supplement {
    /// Phase the plan was found in.
    pub phase: SupplementPhase,
    /// Supplemented pairs.
    pub pairs: BTreeSet<TeamPair>,
}

impl Supplement {
    /// Whether `pair` receives an extra game.
    pub fn contains(&self, pair: TeamPair) -> bool {
        self.pairs.contains(&pair)
    }
}

/// Most supplemented partners each member of a division may take per class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplementCaps {
    pub division: u32,
    pub conference: u32,
    pub cross: u32,
}

impl SupplementCaps {
    /// No limit in any class.
    pub const UNLIMITED: SupplementCaps = SupplementCaps {
        division: u32::MAX,
        conference: u32::MAX,
        cross: u32::MAX,
    };

    /// Cap for `class`.
    pub fn limit(&self, class: OpponentClass) -> u32 {
        match class {
            OpponentClass::SameDivision => self.division,
            OpponentClass::SameConferenceOtherDivision => self.conference,
            OpponentClass::DifferentConference => self.cross,
        }
    }
}

fn class_slot(class: OpponentClass) -> usize {
    match class {
        OpponentClass::SameDivision => 0,
        OpponentClass::SameConferenceOtherDivision => 1,
        OpponentClass::DifferentConference => 2,
    }
}

/// Why no supplement plan was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupplementFailure {
    /// Every phase was searched exhaustively.
    NoPlan,
    /// A phase ran out of search budget before finishing.
    BudgetExhausted,
}

#[derive(Debug, Clone)]
struct Block {
    a: usize,
    b: usize,
    class: OpponentClass,
    /// Feasible (k_a, k_b); for intra-division blocks `k_a == k_b`.
    options: Vec<(u32, u32)>,
}

impl Block {
    fn is_intra(&self) -> bool {
        self.a == self.b
    }

    fn cap_a(&self) -> u32 {
        self.options.iter().map(|o| o.0).max().unwrap_or(0)
    }

    fn cap_b(&self) -> u32 {
        self.options.iter().map(|o| o.1).max().unwrap_or(0)
    }
}

/// Plans the supplement for per-division residuals.
///
/// `residuals` maps each division to the extra games every member needs.
/// Divisions missing from `caps` are unlimited.
pub fn plan_supplement(
    topology: &LeagueTopology,
    residuals: &BTreeMap<DivisionId, u32>,
    caps: &BTreeMap<DivisionId, SupplementCaps>,
    seed: u64,
) -> Result<Supplement, SupplementFailure> {
    if residuals.values().all(|&r| r == 0) {
        return Ok(Supplement {
            phase: SupplementPhase::None,
            pairs: BTreeSet::new(),
        });
    }

    let divisions: Vec<(DivisionId, &[Tid])> = topology.divisions().collect();
    let needs: Vec<u32> = divisions
        .iter()
        .map(|(did, _)| residuals.get(did).copied().unwrap_or(0))
        .collect();
    let limits: Vec<SupplementCaps> = divisions
        .iter()
        .map(|(did, _)| caps.get(did).copied().unwrap_or(SupplementCaps::UNLIMITED))
        .collect();

    let mut budget_hit = false;
    for phase in [
        SupplementPhase::Conference,
        SupplementPhase::CrossConference,
        SupplementPhase::Division,
    ] {
        let blocks = build_blocks(topology, &divisions, phase.allowed());
        let mut search = Search::new(&blocks, needs.clone(), limits.clone());
        match search.run() {
            Some(chosen) => {
                debug!(?phase, nodes = search.nodes, "supplement plan found");
                let pairs = realize(&divisions, &blocks, &chosen, seed);
                return Ok(Supplement { phase, pairs });
            }
            None => {
                if search.nodes > SEARCH_BUDGET {
                    budget_hit = true;
                }
                debug!(?phase, nodes = search.nodes, "no supplement plan in phase");
            }
        }
    }

    if budget_hit {
        Err(SupplementFailure::BudgetExhausted)
    } else {
        Err(SupplementFailure::NoPlan)
    }
}

fn build_blocks(
    topology: &LeagueTopology,
    divisions: &[(DivisionId, &[Tid])],
    allowed: &[OpponentClass],
) -> Vec<Block> {
    let mut blocks = Vec::new();
    for &class in allowed {
        for a in 0..divisions.len() {
            for b in a..divisions.len() {
                let block_class = if a == b {
                    OpponentClass::SameDivision
                } else if topology.conference_of_division(divisions[a].0)
                    == topology.conference_of_division(divisions[b].0)
                {
                    OpponentClass::SameConferenceOtherDivision
                } else {
                    OpponentClass::DifferentConference
                };
                if block_class != class {
                    continue;
                }

                let size_a = divisions[a].1.len() as u32;
                let size_b = divisions[b].1.len() as u32;
                let options: Vec<(u32, u32)> = if a == b {
                    (0..size_a)
                        .filter(|k| (size_a * k) % 2 == 0)
                        .map(|k| (k, k))
                        .collect()
                } else {
                    (0..=size_b)
                        .filter(|k_a| (size_a * k_a) % size_b == 0)
                        .map(|k_a| (k_a, size_a * k_a / size_b))
                        .collect()
                };
                blocks.push(Block {
                    a,
                    b,
                    class,
                    options,
                });
            }
        }
    }
    blocks
}

/// Depth-first search over block options.
struct Search<'a> {
    blocks: &'a [Block],
    need: Vec<u32>,
    limits: Vec<SupplementCaps>,
    /// Partners taken so far per division and class slot.
    taken: Vec<[u32; 3]>,
    /// `suffix_cap[i][d]`: most division `d` can still gain from blocks `i..`.
    suffix_cap: Vec<Vec<u32>>,
    /// `suffix_count[i][d]`: blocks `i..` touching division `d`.
    suffix_count: Vec<Vec<u32>>,
    chosen: Vec<(u32, u32)>,
    nodes: usize,
}

impl<'a> Search<'a> {
    fn new(blocks: &'a [Block], need: Vec<u32>, limits: Vec<SupplementCaps>) -> Self {
        let num_divisions = need.len();
        let mut suffix_cap = vec![vec![0u32; num_divisions]; blocks.len() + 1];
        let mut suffix_count = vec![vec![0u32; num_divisions]; blocks.len() + 1];
        for i in (0..blocks.len()).rev() {
            let block = &blocks[i];
            let mut cap = suffix_cap[i + 1].clone();
            let mut count = suffix_count[i + 1].clone();
            cap[block.a] += block.cap_a();
            count[block.a] += 1;
            if !block.is_intra() {
                cap[block.b] += block.cap_b();
                count[block.b] += 1;
            }
            suffix_cap[i] = cap;
            suffix_count[i] = count;
        }

        Self {
            blocks,
            need,
            limits,
            taken: vec![[0; 3]; num_divisions],
            suffix_cap,
            suffix_count,
            chosen: vec![(0, 0); blocks.len()],
            nodes: 0,
        }
    }

    fn run(&mut self) -> Option<Vec<(u32, u32)>> {
        let reachable = self
            .need
            .iter()
            .zip(&self.suffix_cap[0])
            .all(|(need, cap)| need <= cap);
        if reachable && self.dfs(0) {
            Some(self.chosen.clone())
        } else {
            None
        }
    }

    fn dfs(&mut self, idx: usize) -> bool {
        self.nodes += 1;
        if self.nodes > SEARCH_BUDGET {
            return false;
        }
        if idx == self.blocks.len() {
            return self.need.iter().all(|&n| n == 0);
        }

        let blocks = self.blocks;
        let block = &blocks[idx];
        let (a, b) = (block.a, block.b);
        let slot = class_slot(block.class);
        let options = self.ordered_options(idx);

        for (k_a, k_b) in options {
            if !self.within_limits(block, k_a, k_b) {
                continue;
            }
            if block.is_intra() {
                if k_a > self.need[a] {
                    continue;
                }
                self.need[a] -= k_a;
            } else {
                if k_a > self.need[a] || k_b > self.need[b] {
                    continue;
                }
                self.need[a] -= k_a;
                self.need[b] -= k_b;
            }

            let feasible = self.need[a] <= self.suffix_cap[idx + 1][a]
                && self.need[b] <= self.suffix_cap[idx + 1][b];
            if feasible {
                self.taken[a][slot] += k_a;
                if !block.is_intra() {
                    self.taken[b][slot] += k_b;
                }
                self.chosen[idx] = (k_a, k_b);
                if self.dfs(idx + 1) {
                    return true;
                }
                self.taken[a][slot] -= k_a;
                if !block.is_intra() {
                    self.taken[b][slot] -= k_b;
                }
            }

            self.need[a] += k_a;
            if !block.is_intra() {
                self.need[b] += k_b;
            }
        }
        false
    }

    fn within_limits(&self, block: &Block, k_a: u32, k_b: u32) -> bool {
        let slot = class_slot(block.class);
        let fits = |d: usize, k: u32| self.taken[d][slot] + k <= self.limits[d].limit(block.class);
        fits(block.a, k_a) && (block.is_intra() || fits(block.b, k_b))
    }

    /// Options closest to an even spread of remaining need come first.
    fn ordered_options(&self, idx: usize) -> Vec<(u32, u32)> {
        let block = &self.blocks[idx];
        let fair = |d: usize| {
            let remaining = self.suffix_count[idx][d].max(1) as f64;
            self.need[d] as f64 / remaining
        };
        let fair_a = fair(block.a);
        let fair_b = fair(block.b);

        let mut options = block.options.clone();
        options.sort_by(|x, y| {
            let dx = (x.0 as f64 - fair_a).abs() + (x.1 as f64 - fair_b).abs();
            let dy = (y.0 as f64 - fair_a).abs() + (y.1 as f64 - fair_b).abs();
            dx.total_cmp(&dy).then(y.0.cmp(&x.0))
        });
        options
    }
}

/// Turns chosen block degrees into concrete pairs.
fn realize(
    divisions: &[(DivisionId, &[Tid])],
    blocks: &[Block],
    chosen: &[(u32, u32)],
    seed: u64,
) -> BTreeSet<TeamPair> {
    let mut pairs = BTreeSet::new();
    for (block, &(k_a, _)) in blocks.iter().zip(chosen) {
        if k_a == 0 {
            continue;
        }
        let (did_a, members_a) = divisions[block.a];
        let (did_b, members_b) = divisions[block.b];
        let mut rng = ChaCha8Rng::seed_from_u64(fxhash::hash64(&(seed, did_a, did_b)));

        if block.is_intra() {
            let mut members = members_a.to_vec();
            members.shuffle(&mut rng);
            pairs.extend(regular_graph(&members, k_a as usize));
        } else {
            let mut left = members_a.to_vec();
            let mut right = members_b.to_vec();
            left.shuffle(&mut rng);
            right.shuffle(&mut rng);
            let offset = rng.random_range(0..right.len());
            pairs.extend(biregular_graph(&left, &right, k_a as usize, offset));
        }
    }
    pairs
}

/// Each `left[p]` is joined to `k` consecutive (cyclic) members of `right`.
///
/// Consecutive blocks tile the circle of `right` evenly, so every member of
/// `right` gets `left.len() * k / right.len()` partners.
fn biregular_graph(left: &[Tid], right: &[Tid], k: usize, offset: usize) -> Vec<TeamPair> {
    debug_assert!(k <= right.len());
    debug_assert_eq!((left.len() * k) % right.len(), 0);
    let mut pairs = Vec::with_capacity(left.len() * k);
    for (p, &l) in left.iter().enumerate() {
        for j in 0..k {
            let r = right[(offset + p * k + j) % right.len()];
            pairs.extend(TeamPair::new(l, r));
        }
    }
    pairs
}

/// Circulant `k`-regular graph on `members`.
///
/// Offsets `1..=k/2` in both directions; odd `k` (even size) adds the
/// diameter matching.
fn regular_graph(members: &[Tid], k: usize) -> Vec<TeamPair> {
    let s = members.len();
    debug_assert!(k < s);
    debug_assert_eq!((s * k) % 2, 0);
    let mut pairs = Vec::new();
    for i in 0..s {
        for off in 1..=k / 2 {
            pairs.extend(TeamPair::new(members[i], members[(i + off) % s]));
        }
    }
    if k % 2 == 1 {
        for i in 0..s / 2 {
            pairs.extend(TeamPair::new(members[i], members[i + s / 2]));
        }
    }
    pairs
}
