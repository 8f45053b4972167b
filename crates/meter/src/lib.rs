//! Execution meter: per-turn fuel accounting for agent code.
//!
//! # Invariants
//! - A meter is scoped to one robot's turn; [`ExecutionMeter::begin_turn`]
//!   resets the counter and installs that robot's ceiling.
//! - The meter only counts. Halting an agent that runs past its ceiling is
//!   the driver's job.

pub mod cost;
pub mod history;
pub mod meter;

pub use history::UsageHistory;
pub use meter::ExecutionMeter;
