//! Extra-home orientation for odd-total pairs.
//!
//! Pairs meeting an even number of times split their games evenly. The
//! remaining pairs form the *odd graph*; each of its edges carries one
//! "extra" home game that must go to one side.
//!
//! # Algorithm
//!
//! Orient the odd graph along closed trails (Hierholzer-style walks). A
//! closed trail enters and leaves every vertex equally often, so each team
//! hosts the extra game in exactly half of its odd pairs. When the per-team
//! total is odd, a virtual vertex is joined to every odd-degree team first;
//! dropping its edges afterwards leaves each team off by exactly one.
//!
//! The [`TieBreak`] orders the trail starts and picks the direction of each
//! trail's first edge.

use std::collections::BTreeMap;

use crate::models::{TeamPair, Tid};
use crate::tiebreak::TieBreak;

struct Edge {
    u: usize,
    v: usize,
    pair: Option<TeamPair>,
}

/// Assigns the extra home game of every odd pair.
///
/// Returns `pair -> first_hosts_extra`.
pub fn orient_odd_pairs(
    odd_pairs: &[TeamPair],
    seed: u64,
    tie_break: &dyn TieBreak,
) -> BTreeMap<TeamPair, bool> {
    let mut ordered = odd_pairs.to_vec();
    ordered.sort_by_key(|&p| (tie_break.pair_key(seed, p), p));

    let mut index: BTreeMap<Tid, usize> = BTreeMap::new();
    for p in &ordered {
        let next = index.len();
        index.entry(p.first).or_insert(next);
        let next = index.len();
        index.entry(p.second).or_insert(next);
    }
    let virtual_vertex = index.len();

    let mut edges: Vec<Edge> = ordered
        .iter()
        .map(|&p| Edge {
            u: index[&p.first],
            v: index[&p.second],
            pair: Some(p),
        })
        .collect();

    let mut degree = vec![0usize; virtual_vertex + 1];
    for e in &edges {
        degree[e.u] += 1;
        degree[e.v] += 1;
    }
    for vertex in 0..virtual_vertex {
        if degree[vertex] % 2 == 1 {
            edges.push(Edge {
                u: vertex,
                v: virtual_vertex,
                pair: None,
            });
        }
    }

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); virtual_vertex + 1];
    for (id, e) in edges.iter().enumerate() {
        adjacency[e.u].push(id);
        adjacency[e.v].push(id);
    }

    let mut used = vec![false; edges.len()];
    let mut cursor = vec![0usize; virtual_vertex + 1];
    let mut hosts: BTreeMap<TeamPair, bool> = BTreeMap::new();

    for start_edge in 0..ordered.len() {
        if used[start_edge] {
            continue;
        }
        let pair = ordered[start_edge];
        let first = index[&pair.first];
        let second = index[&pair.second];
        let (from, to) = if tie_break.prefers_first(seed, pair) {
            (first, second)
        } else {
            (second, first)
        };

        used[start_edge] = true;
        hosts.insert(pair, from == first);
        let mut current = to;

        // Walk until the trail closes
        while let Some(id) = next_unused(&adjacency[current], &mut cursor[current], &used) {
            used[id] = true;
            let edge = &edges[id];
            let other = if edge.u == current { edge.v } else { edge.u };
            if let Some(p) = edge.pair {
                hosts.insert(p, current == index[&p.first]);
            }
            current = other;
        }
    }

    if tie_break.reverse() {
        for first_hosts in hosts.values_mut() {
            *first_hosts = !*first_hosts;
        }
    }
    hosts
}

fn next_unused(adjacent: &[usize], cursor: &mut usize, used: &[bool]) -> Option<usize> {
    while *cursor < adjacent.len() {
        let id = adjacent[*cursor];
        if !used[id] {
            return Some(id);
        }
        *cursor += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiebreak::{AlternatingTieBreak, SeededTieBreak};

    fn extra_home_counts(hosts: &BTreeMap<TeamPair, bool>) -> BTreeMap<Tid, (i32, i32)> {
        let mut counts: BTreeMap<Tid, (i32, i32)> = BTreeMap::new();
        for (&p, &first_hosts) in hosts {
            let (h, a) = if first_hosts {
                (p.first, p.second)
            } else {
                (p.second, p.first)
            };
            counts.entry(h).or_default().0 += 1;
            counts.entry(a).or_default().1 += 1;
        }
        counts
    }

    fn complete_pairs(n: Tid) -> Vec<TeamPair> {
        let mut pairs = Vec::new();
        for a in 0..n {
            for b in a + 1..n {
                pairs.push(TeamPair::new(a, b).unwrap());
            }
        }
        pairs
    }

    #[test]
    fn test_even_degrees_balance_exactly() {
        // K5: every vertex has degree 4
        let pairs = complete_pairs(5);
        for seed in 0..20 {
            let hosts = orient_odd_pairs(&pairs, seed, &SeededTieBreak);
            assert_eq!(hosts.len(), pairs.len());
            for (_, (home, away)) in extra_home_counts(&hosts) {
                assert_eq!(home, 2);
                assert_eq!(away, 2);
            }
        }
    }

    #[test]
    fn test_odd_degrees_off_by_one() {
        // K4: every vertex has degree 3
        let pairs = complete_pairs(4);
        for seed in 0..20 {
            let hosts = orient_odd_pairs(&pairs, seed, &SeededTieBreak);
            for (_, (home, away)) in extra_home_counts(&hosts) {
                assert_eq!((home - away).abs(), 1);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let pairs = complete_pairs(7);
        let a = orient_odd_pairs(&pairs, 11, &SeededTieBreak);
        let b = orient_odd_pairs(&pairs, 11, &SeededTieBreak);
        assert_eq!(a, b);
    }

    #[test]
    fn test_alternating_flips_every_pair() {
        let pairs = complete_pairs(5);
        let even = orient_odd_pairs(&pairs, 0, &AlternatingTieBreak::new(2024));
        let odd = orient_odd_pairs(&pairs, 0, &AlternatingTieBreak::new(2025));
        for (p, first_hosts) in &even {
            assert_eq!(odd[p], !first_hosts);
        }
    }

    #[test]
    fn test_empty() {
        assert!(orient_odd_pairs(&[], 0, &SeededTieBreak).is_empty());
    }
}
