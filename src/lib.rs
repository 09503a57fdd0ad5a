//! Season schedule generation for conference/division leagues.
//!
//! Given the active teams (each with a conference and a division), a
//! games-per-team target and a seed, produces the full multiset of
//! (home, away) games for one season. Every team plays the target count,
//! home and away balance, and head-to-head counts follow opponent-class
//! quotas. Calendar placement is out of scope.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Team`, `OpponentClass`, `TeamPair`,
//!   `LeagueTopology`, `Quota`, `QuotaTable`, `ScheduledGame`, `Schedule`
//! - **`planner`**: Per-pair quotas and home splits (`QuotaPlanner`)
//! - **`scheduler`**: Pair generation, assembly, seeded retries, summaries
//! - **`validation`**: Independent re-derivation of every schedule invariant
//! - **`tiebreak`**: Policies for placing extra home games
//! - **`config`**: `ScheduleConfig` and seeds
//! - **`error`**: `ConfigurationError`, `ScheduleError`
//!
//! # Example
//!
//! ```
//! use league_schedule::generate_schedule;
//! use league_schedule::models::reference_league;
//!
//! let games = generate_schedule(&reference_league(), 82, 42).unwrap();
//! assert_eq!(games.len(), 1230);
//! ```
//!
//! # Determinism
//!
//! The same teams, settings and seed always produce the same multiset of
//! games, independent of input order. Randomness comes only from the seed.

pub mod config;
pub mod error;
pub mod models;
pub mod planner;
pub mod scheduler;
pub mod tiebreak;
pub mod validation;

pub use config::ScheduleConfig;
pub use error::{ConfigurationError, ScheduleError};
pub use scheduler::{generate_schedule, GeneratedSchedule, ScheduleGenerator, ScheduleRequest};
