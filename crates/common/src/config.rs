use serde::{Deserialize, Serialize};

/// Tunable game rules shared by the world and the turn gateway.
///
/// `Default` yields the canonical rule set. Partial JSON overrides are accepted
/// because every field falls back to its default when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConstants {
    /// Bullets each team starts a match with.
    pub bullets_initial_amount: f64,
    /// Flat bullet income per round.
    pub archon_bullet_income: f64,
    /// Income lost per bullet held (0.01 means `balance / 100`).
    pub bullet_income_unit_penalty: f64,

    pub bullet_tree_max_health: f32,
    pub bullet_tree_radius: f32,
    pub bullet_tree_cost: f64,
    /// Health a team-owned tree loses every round.
    pub bullet_tree_decay_rate: f32,
    /// Rounds a gardener waits after planting.
    pub bullet_tree_construction_cooldown: u32,
    /// Max health of a neutral tree per unit of radius.
    pub neutral_tree_health_rate: f32,

    pub lumberjack_chop_damage: f32,
    /// Health gained by a tree when watered.
    pub water_health_regen_rate: f32,
    /// Planted trees and non-producer units start at this fraction of max health.
    pub planted_unit_starting_health_fraction: f32,

    pub triad_spread_degrees: f32,
    pub pentad_spread_degrees: f32,
    pub single_shot_cost: f64,
    pub triad_shot_cost: f64,
    pub pentad_shot_cost: f64,
    /// Gap between a firing robot's edge and its new bullet.
    pub bullet_spawn_offset: f32,
    /// Gap between a builder's edge and the edge of what it builds.
    pub general_spawn_offset: f32,

    pub broadcast_max_channels: usize,
    /// Bullets donated per victory point.
    pub bullet_exchange_rate: f64,
    pub victory_points_to_win: u32,
    pub team_memory_length: usize,
    /// Fuel debited when agent code faults.
    pub exception_fuel_penalty: u32,
    /// Bullet ids are sampled from `1..=max_bullet_id`.
    pub max_bullet_id: u32,
    /// Robot and tree ids are sampled from `1..=max_body_id`.
    pub max_body_id: u32,
}

impl Default for GameConstants {
    fn default() -> Self {
        Self {
            bullets_initial_amount: 300.0,
            archon_bullet_income: 2.0,
            bullet_income_unit_penalty: 0.01,
            bullet_tree_max_health: 50.0,
            bullet_tree_radius: 1.0,
            bullet_tree_cost: 50.0,
            bullet_tree_decay_rate: 0.5,
            bullet_tree_construction_cooldown: 10,
            neutral_tree_health_rate: 200.0,
            lumberjack_chop_damage: 5.0,
            water_health_regen_rate: 5.0,
            planted_unit_starting_health_fraction: 0.2,
            triad_spread_degrees: 20.0,
            pentad_spread_degrees: 15.0,
            single_shot_cost: 1.0,
            triad_shot_cost: 4.0,
            pentad_shot_cost: 6.0,
            bullet_spawn_offset: 0.05,
            general_spawn_offset: 0.01,
            broadcast_max_channels: 1000,
            bullet_exchange_rate: 10.0,
            victory_points_to_win: 1000,
            team_memory_length: 32,
            exception_fuel_penalty: 500,
            max_bullet_id: 32_000,
            max_body_id: 32_000,
        }
    }
}

/// Rejected rule overrides.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("planted health fraction must lie in (0, 1], got {0}")]
    HealthFraction(f32),
}

impl GameConstants {
    /// Check that an override keeps the rules playable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("bullet_tree_max_health", self.bullet_tree_max_health as f64),
            ("bullet_tree_radius", self.bullet_tree_radius as f64),
            ("bullet_exchange_rate", self.bullet_exchange_rate),
            ("broadcast_max_channels", self.broadcast_max_channels as f64),
            ("team_memory_length", self.team_memory_length as f64),
            ("max_bullet_id", self.max_bullet_id as f64),
            ("max_body_id", self.max_body_id as f64),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        let non_negative = [
            ("bullets_initial_amount", self.bullets_initial_amount),
            ("bullet_tree_cost", self.bullet_tree_cost),
            ("bullet_tree_decay_rate", self.bullet_tree_decay_rate as f64),
            ("single_shot_cost", self.single_shot_cost),
            ("triad_shot_cost", self.triad_shot_cost),
            ("pentad_shot_cost", self.pentad_shot_cost),
            ("bullet_spawn_offset", self.bullet_spawn_offset as f64),
            ("general_spawn_offset", self.general_spawn_offset as f64),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        let f = self.planted_unit_starting_health_fraction;
        if !(f > 0.0 && f <= 1.0) {
            return Err(ConfigError::HealthFraction(f));
        }
        Ok(())
    }

    /// Max health of a neutral tree of the given radius.
    pub fn neutral_tree_max_health(&self, radius: f32) -> f32 {
        self.neutral_tree_health_rate * radius
    }
}
