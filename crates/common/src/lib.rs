//! Shared types for the arbor simulation core.
//!
//! # Invariants
//! - Ids are plain integers; uniqueness is enforced by the world, not here.
//! - The robot stat table is constant; only [`GameConstants`] is tunable.

mod config;
mod robot_type;
mod types;

pub use config::{ConfigError, GameConstants};
pub use robot_type::{RobotStats, RobotType};
pub use types::{BulletId, Direction, MapLocation, RobotId, Rgb, Team, TreeId};
