//! Fuel charged per gateway operation kind.

/// Single-field getters and turn-state flags.
pub const GETTER: u32 = 1;
/// Cheap predicates: range checks, `can_*` attack and tree checks.
pub const PROBE: u32 = 5;
/// Actions that mutate the world after their own check.
pub const ACTION: u32 = 5;
/// Move legality, which scans nearby bodies for blockers.
pub const MOVE_CHECK: u32 = 10;
/// Occupancy tests and team-wide counts.
pub const OCCUPANCY: u32 = 20;
/// Lookup of one body by id.
pub const LOOKUP: u32 = 25;
/// Nearby bullet scan.
pub const BULLET_SCAN: u32 = 50;
/// Nearby robot or tree scan, and other whole-world walks.
pub const SCAN: u32 = 100;
