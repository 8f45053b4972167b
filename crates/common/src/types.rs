use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A point on the continuous game map.
pub type MapLocation = Vec2;

/// Identifier of a robot. Unique among live robots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RobotId(pub u32);

/// Identifier of a tree. Unique among live trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TreeId(pub u32);

/// Identifier of a bullet. Unique among live bullets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BulletId(pub u32);

/// Side a body belongs to. Trees placed by the map loader are usually neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
    Neutral,
}

impl Team {
    /// The two playing teams, in economy order.
    pub const PLAYERS: [Team; 2] = [Team::A, Team::B];

    /// The opposing playing team. Neutral has no opponent.
    pub fn opponent(self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
            Team::Neutral => Team::Neutral,
        }
    }

    pub fn is_player(self) -> bool {
        self != Team::Neutral
    }
}

/// A heading in the plane, stored as an angle in radians.
///
/// Angles grow counter-clockwise from the positive x axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    radians: f32,
}

impl Direction {
    pub const EAST: Direction = Direction { radians: 0.0 };
    pub const NORTH: Direction = Direction {
        radians: std::f32::consts::FRAC_PI_2,
    };
    pub const WEST: Direction = Direction {
        radians: std::f32::consts::PI,
    };
    pub const SOUTH: Direction = Direction {
        radians: -std::f32::consts::FRAC_PI_2,
    };

    pub fn from_radians(radians: f32) -> Self {
        Self {
            radians: normalize(radians),
        }
    }

    pub fn from_degrees(degrees: f32) -> Self {
        Self::from_radians(degrees.to_radians())
    }

    /// Heading pointing along the vector `(dx, dy)`.
    pub fn from_delta(dx: f32, dy: f32) -> Self {
        Self::from_radians(dy.atan2(dx))
    }

    /// Heading from one location toward another.
    pub fn between(from: MapLocation, to: MapLocation) -> Self {
        let d = to - from;
        Self::from_delta(d.x, d.y)
    }

    pub fn radians(self) -> f32 {
        self.radians
    }

    pub fn degrees(self) -> f32 {
        self.radians.to_degrees()
    }

    /// Horizontal component of a step of `distance` along this heading.
    pub fn delta_x(self, distance: f32) -> f32 {
        distance * self.radians.cos()
    }

    /// Vertical component of a step of `distance` along this heading.
    pub fn delta_y(self, distance: f32) -> f32 {
        distance * self.radians.sin()
    }

    /// Displacement vector of length `distance` along this heading.
    pub fn offset(self, distance: f32) -> Vec2 {
        Vec2::new(self.delta_x(distance), self.delta_y(distance))
    }

    pub fn rotate_left_degrees(self, degrees: f32) -> Self {
        Self::from_radians(self.radians + degrees.to_radians())
    }

    pub fn rotate_right_degrees(self, degrees: f32) -> Self {
        Self::from_radians(self.radians - degrees.to_radians())
    }

    /// Absolute angular difference to `other`, in degrees within `[0, 180]`.
    pub fn degrees_between(self, other: Direction) -> f32 {
        normalize(self.radians - other.radians).abs().to_degrees()
    }
}

/// Wrap an angle into `(-PI, PI]`.
fn normalize(radians: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut r = radians % TAU;
    if r <= -PI {
        r += TAU;
    } else if r > PI {
        r -= TAU;
    }
    r
}

/// RGB triple for debug indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn team_opponents() {
        assert_eq!(Team::A.opponent(), Team::B);
        assert_eq!(Team::B.opponent(), Team::A);
        assert_eq!(Team::Neutral.opponent(), Team::Neutral);
        assert!(!Team::Neutral.is_player());
    }

    #[test]
    fn direction_deltas() {
        let d = Direction::NORTH;
        assert!(approx(d.delta_x(2.0), 0.0));
        assert!(approx(d.delta_y(2.0), 2.0));
        let e = Direction::from_delta(3.0, 0.0);
        assert!(approx(e.delta_x(1.0), 1.0));
    }

    #[test]
    fn rotation_wraps_around() {
        let d = Direction::from_degrees(170.0).rotate_left_degrees(20.0);
        assert!(approx(d.degrees(), -170.0));
        let r = Direction::EAST.rotate_right_degrees(20.0);
        assert!(approx(r.degrees(), -20.0));
    }

    #[test]
    fn degrees_between_is_symmetric() {
        let a = Direction::from_degrees(10.0);
        let b = Direction::from_degrees(-25.0);
        assert!(approx(a.degrees_between(b), 35.0));
        assert!(approx(b.degrees_between(a), 35.0));
    }
}
