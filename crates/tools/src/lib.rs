//! Developer tooling: match inspector, event tallies and fuel reports.
//!
//! # Invariants
//! - Tools only read the world; they never mutate it.

pub mod inspector;

pub use inspector::{EventTally, FuelReport, MatchInspector, MatchSummary, RobotInfo, TeamSummary};
