//! Season schedule generation.
//!
//! Turns a quota table into concrete games and runs the seeded
//! plan / generate / validate loop.
//!
//! # Pipeline
//!
//! `QuotaPlanner` → [`PairGenerator`] → [`ScheduleAssembler`] →
//! `validate_schedule`, driven by [`ScheduleGenerator`] with seeded retries.
//!
//! # Summary
//!
//! [`ScheduleSummary`] reports venue counts, the home-games matrix and
//! per-class home profiles of a finished schedule.

mod assembler;
mod generator;
mod pipeline;
mod summary;

pub use assembler::ScheduleAssembler;
pub use generator::{GameBuckets, PairGenerator};
pub use pipeline::{generate_schedule, GeneratedSchedule, ScheduleGenerator, ScheduleRequest};
pub use summary::ScheduleSummary;
