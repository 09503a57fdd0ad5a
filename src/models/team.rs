//! Team, pair, and opponent-class model.
//!
//! A team is a bare membership record: its ID plus the division and
//! conference it plays in. Division implies conference.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Team identifier, unique and stable for a season.
pub type Tid = u32;
/// Conference identifier.
pub type ConferenceId = u32;
/// Division identifier.
pub type DivisionId = u32;

/// An active team and its league membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team {
    /// Team ID.
    pub tid: Tid,
    /// Conference the team plays in.
    pub conference_id: ConferenceId,
    /// Division the team plays in (belongs to `conference_id`).
    pub division_id: DivisionId,
}

impl Team {
    /// Creates a team record.
    pub fn new(tid: Tid, conference_id: ConferenceId, division_id: DivisionId) -> Self {
        Self {
            tid,
            conference_id,
            division_id,
        }
    }
}

/// Relationship between two distinct teams.
///
/// Ordered from closest rivalry to most distant; the derived `Ord` follows
/// that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OpponentClass {
    /// Both teams share a division.
    SameDivision,
    /// Same conference, different divisions.
    SameConferenceOtherDivision,
    /// Different conferences.
    DifferentConference,
}

impl OpponentClass {
    /// All classes, closest rivalry first.
    pub const ALL: [OpponentClass; 3] = [
        OpponentClass::SameDivision,
        OpponentClass::SameConferenceOtherDivision,
        OpponentClass::DifferentConference,
    ];

    /// Short label used in logs and violation messages.
    pub fn label(&self) -> &'static str {
        match self {
            OpponentClass::SameDivision => "division",
            OpponentClass::SameConferenceOtherDivision => "conference",
            OpponentClass::DifferentConference => "cross-conference",
        }
    }
}

impl fmt::Display for OpponentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An unordered pair of distinct teams, normalized so `first < second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamPair {
    /// Lower team ID.
    pub first: Tid,
    /// Higher team ID.
    pub second: Tid,
}

impl TeamPair {
    /// Creates a normalized pair. Returns `None` when `a == b`.
    pub fn new(a: Tid, b: Tid) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self {
                first: a,
                second: b,
            }),
            std::cmp::Ordering::Greater => Some(Self {
                first: b,
                second: a,
            }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Whether `tid` is one side of this pair.
    #[inline]
    pub fn contains(&self, tid: Tid) -> bool {
        self.first == tid || self.second == tid
    }

    /// The other side of the pair, if `tid` is one side.
    pub fn other(&self, tid: Tid) -> Option<Tid> {
        if tid == self.first {
            Some(self.second)
        } else if tid == self.second {
            Some(self.first)
        } else {
            None
        }
    }
}

impl fmt::Display for TeamPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}
