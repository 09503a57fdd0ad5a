//! League scheduling domain models.
//!
//! Provides the data types that flow through the pipeline: the input
//! topology, the per-pair quota table, and the output schedule.
//!
//! # Domain Mappings
//!
//! | Type | Role |
//! |------|------|
//! | Team | Input: tid + division + conference |
//! | LeagueTopology | Input snapshot, flat membership maps |
//! | QuotaTable | Planner output, generator/validator input |
//! | Schedule | Output: multiset of (home, away) games |

mod quota;
mod schedule;
mod team;
mod topology;

pub use quota::{Quota, QuotaTable};
pub use schedule::{Schedule, ScheduledGame};
pub use team::{ConferenceId, DivisionId, OpponentClass, Team, TeamPair, Tid};
pub use topology::{reference_league, uniform_league, LeagueTopology};
