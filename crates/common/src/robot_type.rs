use serde::{Deserialize, Serialize};

/// Fixed robot archetype. Every behavioural difference between robots is a
/// lookup into [`RobotStats`] plus the few predicates below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RobotType {
    /// Command unit. Cannot be built; hires gardeners.
    Archon,
    /// Producer. Builds combat units and plants trees.
    Gardener,
    /// Melee unit that fells trees.
    Lumberjack,
    /// Basic ranged fighter.
    Soldier,
    /// Heavy ranged fighter.
    Tank,
    /// Fast, fragile ranged unit.
    Scout,
}

/// Stat tuple for one archetype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotStats {
    /// Archetype allowed to construct this one; `None` for unbuildable types.
    pub spawn_source: Option<RobotType>,
    /// Rounds the constructing structure must wait after building this type.
    pub build_cooldown_turns: u32,
    pub max_health: f32,
    /// Bullet cost to construct; `None` for unbuildable types.
    pub bullet_cost: Option<f32>,
    pub body_radius: f32,
    /// Speed of fired bullets; `None` for types that cannot shoot.
    pub bullet_speed: Option<f32>,
    /// Damage per attack; `None` for types that cannot attack.
    pub attack_power: Option<f32>,
    pub sensor_radius: f32,
    pub bullet_sight_radius: f32,
    pub stride_radius: f32,
    /// Per-turn execution meter ceiling.
    pub fuel_limit: u32,
}

const ARCHON: RobotStats = RobotStats {
    spawn_source: None,
    build_cooldown_turns: 0,
    max_health: 400.0,
    bullet_cost: None,
    body_radius: 2.0,
    bullet_speed: None,
    attack_power: None,
    sensor_radius: 10.0,
    bullet_sight_radius: 15.0,
    stride_radius: 1.0,
    fuel_limit: 20_000,
};

const GARDENER: RobotStats = RobotStats {
    spawn_source: Some(RobotType::Archon),
    build_cooldown_turns: 10,
    max_health: 40.0,
    bullet_cost: Some(100.0),
    body_radius: 1.0,
    bullet_speed: None,
    attack_power: None,
    sensor_radius: 7.0,
    bullet_sight_radius: 10.0,
    stride_radius: 1.0,
    fuel_limit: 10_000,
};

const LUMBERJACK: RobotStats = RobotStats {
    spawn_source: Some(RobotType::Gardener),
    build_cooldown_turns: 10,
    max_health: 50.0,
    bullet_cost: Some(100.0),
    body_radius: 1.0,
    bullet_speed: None,
    attack_power: Some(2.0),
    sensor_radius: 7.0,
    bullet_sight_radius: 10.0,
    stride_radius: 1.5,
    fuel_limit: 10_000,
};

const SOLDIER: RobotStats = RobotStats {
    spawn_source: Some(RobotType::Gardener),
    build_cooldown_turns: 10,
    max_health: 50.0,
    bullet_cost: Some(100.0),
    body_radius: 1.0,
    bullet_speed: Some(2.0),
    attack_power: Some(2.0),
    sensor_radius: 7.0,
    bullet_sight_radius: 10.0,
    stride_radius: 2.0,
    fuel_limit: 10_000,
};

const TANK: RobotStats = RobotStats {
    spawn_source: Some(RobotType::Gardener),
    build_cooldown_turns: 10,
    max_health: 100.0,
    bullet_cost: Some(300.0),
    body_radius: 2.0,
    bullet_speed: Some(3.0),
    attack_power: Some(4.0),
    sensor_radius: 7.0,
    bullet_sight_radius: 10.0,
    stride_radius: 1.0,
    fuel_limit: 10_000,
};

const SCOUT: RobotStats = RobotStats {
    spawn_source: Some(RobotType::Gardener),
    build_cooldown_turns: 10,
    max_health: 20.0,
    bullet_cost: Some(80.0),
    body_radius: 1.0,
    bullet_speed: Some(1.5),
    attack_power: Some(1.0),
    sensor_radius: 10.0,
    bullet_sight_radius: 20.0,
    stride_radius: 2.5,
    fuel_limit: 10_000,
};

impl RobotType {
    pub const ALL: [RobotType; 6] = [
        RobotType::Archon,
        RobotType::Gardener,
        RobotType::Lumberjack,
        RobotType::Soldier,
        RobotType::Tank,
        RobotType::Scout,
    ];

    pub fn stats(self) -> &'static RobotStats {
        match self {
            RobotType::Archon => &ARCHON,
            RobotType::Gardener => &GARDENER,
            RobotType::Lumberjack => &LUMBERJACK,
            RobotType::Soldier => &SOLDIER,
            RobotType::Tank => &TANK,
            RobotType::Scout => &SCOUT,
        }
    }

    pub fn body_radius(self) -> f32 {
        self.stats().body_radius
    }

    pub fn stride_radius(self) -> f32 {
        self.stats().stride_radius
    }

    pub fn max_health(self) -> f32 {
        self.stats().max_health
    }

    pub fn can_attack(self) -> bool {
        self.stats().attack_power.is_some()
    }

    /// Whether this type may fire bullets. Melee and non-combat types may not.
    pub fn can_shoot(self) -> bool {
        self.stats().bullet_speed.is_some() && self.can_attack()
    }

    /// Only the command unit hires producers.
    pub fn can_hire(self) -> bool {
        self == RobotType::Archon
    }

    /// Only the producer builds combat units and plants trees.
    pub fn can_build(self) -> bool {
        self == RobotType::Gardener
    }

    pub fn is_hireable(self) -> bool {
        self.stats().spawn_source == Some(RobotType::Archon)
    }

    pub fn is_buildable(self) -> bool {
        self.stats().spawn_source == Some(RobotType::Gardener)
    }

    /// Health a freshly constructed robot of this type starts with.
    ///
    /// Command and producer units start whole; everything else starts at
    /// `planted_fraction` of max health.
    pub fn starting_health(self, planted_fraction: f32) -> f32 {
        match self {
            RobotType::Archon | RobotType::Gardener => self.max_health(),
            _ => planted_fraction * self.max_health(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_unit_has_larger_fuel_limit() {
        let archon = RobotType::Archon.stats().fuel_limit;
        for t in RobotType::ALL.iter().filter(|t| **t != RobotType::Archon) {
            assert!(archon > t.stats().fuel_limit);
        }
    }

    #[test]
    fn only_ranged_types_shoot() {
        assert!(!RobotType::Archon.can_shoot());
        assert!(!RobotType::Gardener.can_shoot());
        assert!(!RobotType::Lumberjack.can_shoot());
        assert!(RobotType::Lumberjack.can_attack());
        assert!(RobotType::Soldier.can_shoot());
        assert!(RobotType::Tank.can_shoot());
        assert!(RobotType::Scout.can_shoot());
    }

    #[test]
    fn build_eligibility() {
        assert!(RobotType::Gardener.is_hireable());
        assert!(!RobotType::Gardener.is_buildable());
        assert!(RobotType::Soldier.is_buildable());
        assert!(!RobotType::Archon.is_buildable());
        assert!(!RobotType::Archon.is_hireable());
        assert!(RobotType::Archon.can_hire());
        assert!(RobotType::Gardener.can_build());
    }

    #[test]
    fn starting_health_fraction() {
        assert_eq!(RobotType::Archon.starting_health(0.2), 400.0);
        assert_eq!(RobotType::Gardener.starting_health(0.2), 40.0);
        assert!((RobotType::Soldier.starting_health(0.2) - 10.0).abs() < 1e-4);
        assert!((RobotType::Tank.starting_health(0.2) - 20.0).abs() < 1e-4);
    }
}
