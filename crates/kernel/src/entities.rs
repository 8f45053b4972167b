use arbor_common::{BulletId, Direction, MapLocation, RobotId, RobotType, Team, TreeId};
use serde::{Deserialize, Serialize};

/// Reference to a body that can be hit, blocked against or damaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Body {
    Robot(RobotId),
    Tree(TreeId),
}

/// Immutable snapshot of a robot. Mutations replace the stored snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Robot {
    pub id: RobotId,
    pub team: Team,
    pub kind: RobotType,
    pub location: MapLocation,
    pub health: f32,
    /// Attacks made this turn. Reset by the gateway at turn start.
    pub attack_count: u32,
    /// Moves made this turn. Reset by the gateway at turn start.
    pub move_count: u32,
}

impl Robot {
    pub fn new(
        id: RobotId,
        team: Team,
        kind: RobotType,
        location: MapLocation,
        health: f32,
    ) -> Self {
        Self {
            id,
            team,
            kind,
            location,
            health,
            attack_count: 0,
            move_count: 0,
        }
    }

    pub fn radius(&self) -> f32 {
        self.kind.body_radius()
    }

    pub fn with_location(self, location: MapLocation) -> Self {
        Self { location, ..self }
    }

    pub fn with_health(self, health: f32) -> Self {
        Self { health, ..self }
    }

    /// Snapshot after taking `amount` damage, or `None` if that destroys it.
    pub fn damaged(self, amount: f32) -> Option<Self> {
        let health = self.health - amount;
        (health > 0.0).then_some(Self { health, ..self })
    }

    pub fn with_attack(self) -> Self {
        Self {
            attack_count: self.attack_count + 1,
            ..self
        }
    }

    pub fn with_move(self) -> Self {
        Self {
            move_count: self.move_count + 1,
            ..self
        }
    }

    pub fn with_counters_reset(self) -> Self {
        Self {
            attack_count: 0,
            move_count: 0,
            ..self
        }
    }
}

/// Immutable snapshot of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub id: TreeId,
    pub team: Team,
    pub location: MapLocation,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    /// Bullets released to whoever shakes the tree.
    pub contained_bullets: f64,
    /// Robot released, for the destroying team, when the tree falls.
    pub contained_robot: Option<RobotType>,
}

impl Tree {
    pub fn damaged(self, amount: f32) -> Option<Self> {
        let health = self.health - amount;
        (health > 0.0).then_some(Self { health, ..self })
    }

    /// Heal by `amount`, capped at max health.
    pub fn healed(self, amount: f32) -> Self {
        Self {
            health: (self.health + amount).min(self.max_health),
            ..self
        }
    }

    pub fn shaken(self) -> Self {
        Self {
            contained_bullets: 0.0,
            ..self
        }
    }
}

/// Immutable snapshot of a bullet in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: BulletId,
    /// Team of the firing robot. Trees felled by this bullet release their
    /// robot to this team.
    pub team: Team,
    pub location: MapLocation,
    pub heading: Direction,
    pub speed: f32,
    pub damage: f32,
}

impl Bullet {
    /// Snapshot one step further along its heading.
    pub fn advanced(self) -> Self {
        Self {
            location: self.location + self.heading.offset(self.speed),
            ..self
        }
    }
}
