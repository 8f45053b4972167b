//! Turn action gateway: the only surface agent code sees.
//!
//! A [`Gateway`] binds one robot for one turn. Each call charges the
//! execution meter, validates against the current world, and then either
//! mutates the world or returns a [`GameActionError`] leaving it untouched.
//!
//! # Invariants
//! - At most one move and one attack per robot per turn.
//! - Broadcasts become readable only after the round advances.
//! - Bullets and funds are debited only by successful actions.

mod combat;
mod construction;
pub mod error;
mod gateway;
mod movement;
mod sensing;
mod team;
#[cfg(test)]
mod testkit;

pub use combat::{Shot, TreeTarget};
pub use error::{GameActionError, GameActionErrorKind, GameResult};
pub use gateway::{Gateway, TurnReport};
pub use movement::MoveTarget;
pub use sensing::NearbyQuery;
