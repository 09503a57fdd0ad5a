//! League topology: the active teams and their division/conference partition.
//!
//! Membership is held as flat lookup maps (`tid -> division`,
//! `division -> conference`) rather than linked team/division/conference
//! objects. All maps are ordered so iteration is deterministic and
//! independent of the order teams were supplied in.

use std::collections::BTreeMap;

use super::{ConferenceId, DivisionId, OpponentClass, Team, TeamPair, Tid};
use crate::error::ConfigurationError;

/// A validated snapshot of the active teams for one season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueTopology {
    /// Teams sorted by tid.
    teams: Vec<Team>,
    division_of: BTreeMap<Tid, DivisionId>,
    conference_of_division: BTreeMap<DivisionId, ConferenceId>,
    /// Division -> member tids (sorted).
    divisions: BTreeMap<DivisionId, Vec<Tid>>,
    /// Conference -> division IDs (sorted).
    conferences: BTreeMap<ConferenceId, Vec<DivisionId>>,
}

impl LeagueTopology {
    /// Builds a topology from team records.
    ///
    /// # Errors
    /// - fewer than two teams
    /// - a tid listed twice
    /// - a division listed under two conferences
    /// - a division or conference with fewer than two teams
    pub fn new(teams: &[Team]) -> Result<Self, ConfigurationError> {
        if teams.len() < 2 {
            return Err(ConfigurationError::TooFewTeams { count: teams.len() });
        }

        let mut sorted = teams.to_vec();
        sorted.sort_by_key(|t| t.tid);

        let mut division_of = BTreeMap::new();
        let mut conference_of_division: BTreeMap<DivisionId, ConferenceId> = BTreeMap::new();
        let mut divisions: BTreeMap<DivisionId, Vec<Tid>> = BTreeMap::new();

        for team in &sorted {
            if division_of.insert(team.tid, team.division_id).is_some() {
                return Err(ConfigurationError::DuplicateTeam { tid: team.tid });
            }
            match conference_of_division.get(&team.division_id) {
                Some(&cid) if cid != team.conference_id => {
                    return Err(ConfigurationError::DivisionSpansConferences {
                        division: team.division_id,
                        first: cid.min(team.conference_id),
                        second: cid.max(team.conference_id),
                    });
                }
                Some(_) => {}
                None => {
                    conference_of_division.insert(team.division_id, team.conference_id);
                }
            }
            divisions.entry(team.division_id).or_default().push(team.tid);
        }

        let mut conferences: BTreeMap<ConferenceId, Vec<DivisionId>> = BTreeMap::new();
        for (&did, &cid) in &conference_of_division {
            conferences.entry(cid).or_default().push(did);
        }

        for (&did, members) in &divisions {
            if members.len() < 2 {
                return Err(ConfigurationError::DivisionTooSmall {
                    division: did,
                    size: members.len(),
                });
            }
        }
        for (&cid, dids) in &conferences {
            let size: usize = dids.iter().map(|d| divisions[d].len()).sum();
            if size < 2 {
                return Err(ConfigurationError::ConferenceTooSmall {
                    conference: cid,
                    size,
                });
            }
        }

        Ok(Self {
            teams: sorted,
            division_of,
            conference_of_division,
            divisions,
            conferences,
        })
    }

    /// Number of active teams.
    pub fn num_teams(&self) -> usize {
        self.teams.len()
    }

    /// Teams, sorted by tid.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Team IDs in ascending order.
    pub fn tids(&self) -> impl Iterator<Item = Tid> + '_ {
        self.teams.iter().map(|t| t.tid)
    }

    /// Whether `tid` is an active team.
    pub fn contains(&self, tid: Tid) -> bool {
        self.division_of.contains_key(&tid)
    }

    /// Division of a team.
    pub fn division_of(&self, tid: Tid) -> Option<DivisionId> {
        self.division_of.get(&tid).copied()
    }

    /// Conference a division belongs to.
    pub fn conference_of_division(&self, did: DivisionId) -> Option<ConferenceId> {
        self.conference_of_division.get(&did).copied()
    }

    /// Divisions and their members, in division-ID order.
    pub fn divisions(&self) -> impl Iterator<Item = (DivisionId, &[Tid])> + '_ {
        self.divisions.iter().map(|(&d, m)| (d, m.as_slice()))
    }

    /// Members of one division.
    pub fn division_members(&self, did: DivisionId) -> &[Tid] {
        self.divisions.get(&did).map(|m| m.as_slice()).unwrap_or(&[])
    }

    /// Conferences and their division IDs, in conference-ID order.
    pub fn conferences(&self) -> impl Iterator<Item = (ConferenceId, &[DivisionId])> + '_ {
        self.conferences.iter().map(|(&c, d)| (c, d.as_slice()))
    }

    /// Number of divisions.
    pub fn num_divisions(&self) -> usize {
        self.divisions.len()
    }

    /// Classifies the relationship between two distinct active teams.
    ///
    /// Returns `None` if either team is unknown or `a == b`.
    pub fn classify(&self, a: Tid, b: Tid) -> Option<OpponentClass> {
        if a == b {
            return None;
        }
        let da = self.division_of(a)?;
        let db = self.division_of(b)?;
        if da == db {
            return Some(OpponentClass::SameDivision);
        }
        if self.conference_of_division(da)? == self.conference_of_division(db)? {
            Some(OpponentClass::SameConferenceOtherDivision)
        } else {
            Some(OpponentClass::DifferentConference)
        }
    }

    /// Number of opponents `tid` has in a class.
    pub fn opponents_in_class(&self, tid: Tid, class: OpponentClass) -> usize {
        self.tids()
            .filter(|&other| self.classify(tid, other) == Some(class))
            .count()
    }

    /// Every unordered pair of active teams, in ascending order.
    pub fn pairs(&self) -> Vec<TeamPair> {
        let tids: Vec<Tid> = self.tids().collect();
        let mut pairs = Vec::with_capacity(tids.len() * tids.len().saturating_sub(1) / 2);
        for (i, &a) in tids.iter().enumerate() {
            for &b in &tids[i + 1..] {
                pairs.push(TeamPair { first: a, second: b });
            }
        }
        pairs
    }
}

/// Builds a uniform league: `conferences x divisions_per_conference x
/// teams_per_division`, tids assigned from 0 in conference/division order.
///
/// Conference `c` has ID `c`; division `d` of conference `c` has ID
/// `c * divisions_per_conference + d`.
pub fn uniform_league(
    conferences: u32,
    divisions_per_conference: u32,
    teams_per_division: u32,
) -> Vec<Team> {
    let mut teams = Vec::new();
    let mut tid = 0;
    for c in 0..conferences {
        for d in 0..divisions_per_conference {
            let did = c * divisions_per_conference + d;
            for _ in 0..teams_per_division {
                teams.push(Team::new(tid, c, did));
                tid += 1;
            }
        }
    }
    teams
}

/// The classic 30-team league: 2 conferences x 3 divisions x 5 teams.
pub fn reference_league() -> Vec<Team> {
    uniform_league(2, 3, 5)
}
