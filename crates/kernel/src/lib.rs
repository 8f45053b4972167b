//! World kernel: authoritative match state, round advancement and the
//! geometry used to resolve bullets and blocking.
//!
//! # Invariants
//! - All state mutations flow through explicit [`World`] operations.
//! - Ids are unique among live bodies of the same kind.
//! - Given the same scenario and the same sequence of operations, the world
//!   reaches the same [`World::state_hash`].

pub mod entities;
pub mod geometry;
pub mod memory;
pub mod signal;
pub mod world;

pub use entities::{Body, Bullet, Robot, Tree};
pub use geometry::MapBounds;
pub use memory::TeamMemoryBank;
pub use signal::BroadcastBoard;
pub use world::{Indicator, MapSpec, Scenario, World, WorldEvent};
