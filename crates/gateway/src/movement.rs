use crate::error::{GameActionError, GameResult};
use crate::gateway::Gateway;
use arbor_common::{Direction, MapLocation};
use arbor_kernel::geometry;
use arbor_meter::cost;
use glam::Vec2;

/// Where a move should go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveTarget {
    /// One full stride along the heading.
    Direction(Direction),
    /// Along the heading for a distance clamped to `[0, stride]`.
    DirectionDistance(Direction, f32),
    /// Toward a point, stopping after one stride if it is farther.
    Location(MapLocation),
}

impl From<Direction> for MoveTarget {
    fn from(dir: Direction) -> Self {
        MoveTarget::Direction(dir)
    }
}

impl From<MapLocation> for MoveTarget {
    fn from(loc: MapLocation) -> Self {
        MoveTarget::Location(loc)
    }
}

impl Gateway<'_> {
    fn displacement(&self, target: MoveTarget) -> Vec2 {
        let stride = self.robot.kind.stride_radius();
        match target {
            MoveTarget::Direction(dir) => dir.offset(stride),
            MoveTarget::DirectionDistance(dir, distance) => {
                let distance = if distance.is_nan() { 0.0 } else { distance.clamp(0.0, stride) };
                dir.offset(distance)
            }
            MoveTarget::Location(loc) => {
                let delta = loc - self.robot.location;
                if delta.length() > stride {
                    Direction::from_delta(delta.x, delta.y).offset(stride)
                } else {
                    delta
                }
            }
        }
    }

    /// Destination of a legal move, or why it is illegal.
    fn check_move(&self, target: MoveTarget) -> GameResult<MapLocation> {
        const CONTEXT: &str = "moving";
        if self.robot.move_count > 0 {
            return Err(GameActionError::cant_move_there(CONTEXT));
        }
        let delta = self.displacement(target);
        let dest = self.robot.location + delta;
        if !self.world.bounds().contains(dest) {
            return Err(GameActionError::cant_move_there(CONTEXT));
        }
        let me = self.robot.id;
        let robots = self
            .world
            .robots()
            .values()
            .filter(|r| r.id != me)
            .map(|r| (r.location, r.radius()));
        let trees = self.world.trees().values().map(|t| (t.location, t.radius));
        if geometry::segment_blocked(self.robot.location, delta, robots.chain(trees)) {
            return Err(GameActionError::cant_move_there(CONTEXT));
        }
        Ok(dest)
    }

    /// Whether [`Gateway::move_to`] would succeed.
    pub fn can_move(&mut self, target: impl Into<MoveTarget>) -> bool {
        self.charge(cost::MOVE_CHECK);
        self.check_move(target.into()).is_ok()
    }

    /// Move once this turn. Blocked, off-map and repeated moves are rejected.
    pub fn move_to(&mut self, target: impl Into<MoveTarget>) -> GameResult<()> {
        self.charge(cost::MOVE_CHECK);
        self.require_alive("moving")?;
        let dest = self.check_move(target.into())?;
        self.world.move_robot(self.robot.id, dest);
        self.refresh();
        tracing::trace!(robot = self.robot.id.0, x = dest.x, y = dest.y, "moved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameActionErrorKind;
    use crate::testkit::{Fixture, place, tree};
    use arbor_common::{RobotId, RobotType, Team};

    #[test]
    fn one_move_per_turn() {
        let mut fx = Fixture::new(&[place(1, Team::A, RobotType::Soldier, 50.0, 50.0)]);
        let mut gw = fx.turn(1);
        assert!(gw.can_move(Direction::EAST));
        gw.move_to(Direction::EAST).expect("first move");
        assert!(!gw.can_move(Direction::EAST));
        let err = gw.move_to(Direction::EAST).expect_err("second move");
        assert_eq!(err.kind, GameActionErrorKind::CantMoveThere);
        let loc = gw.location();
        assert!((loc.x - 52.0).abs() < 1e-5);
        assert_eq!(gw.move_count(), 1);
        drop(gw);
        assert_eq!(fx.world.robot(RobotId(1)).map(|r| r.move_count), Some(1));
    }

    #[test]
    fn move_count_resets_next_turn() {
        let mut fx = Fixture::new(&[place(1, Team::A, RobotType::Soldier, 50.0, 50.0)]);
        fx.turn(1).move_to(Direction::EAST).expect("move");
        fx.world.advance_round();
        assert!(fx.turn(1).move_to(Direction::WEST).is_ok());
    }

    #[test]
    fn distance_is_clamped_to_stride() {
        let mut fx = Fixture::new(&[place(1, Team::A, RobotType::Scout, 50.0, 50.0)]);
        let mut gw = fx.turn(1);
        gw.move_to(MoveTarget::DirectionDistance(Direction::EAST, 40.0))
            .expect("clamped move");
        assert!((gw.location().x - 52.5).abs() < 1e-5);
    }

    #[test]
    fn far_location_is_rescaled_to_stride() {
        let mut fx = Fixture::new(&[place(1, Team::A, RobotType::Soldier, 50.0, 50.0)]);
        let mut gw = fx.turn(1);
        gw.move_to(Vec2::new(80.0, 50.0)).expect("move toward");
        assert!((gw.location().x - 52.0).abs() < 1e-5);
    }

    #[test]
    fn off_map_destination_is_rejected() {
        let mut fx = Fixture::new(&[place(1, Team::A, RobotType::Soldier, 98.0, 50.0)]);
        let mut gw = fx.turn(1);
        assert!(!gw.can_move(Direction::EAST));
        assert!(gw.move_to(Direction::EAST).is_err());
        assert_eq!(gw.location(), Vec2::new(98.0, 50.0));
    }

    #[test]
    fn only_the_destination_point_must_be_on_the_map() {
        let mut fx = Fixture::new(&[place(1, Team::A, RobotType::Soldier, 2.5, 50.0)]);
        let mut gw = fx.turn(1);
        assert!(gw.can_move(Direction::WEST));
        gw.move_to(Direction::WEST).expect("point stays on the map");
        assert!((gw.location().x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn obstacle_behind_still_blocks() {
        // Moving at 45 degrees: anything with |B| <= R * sqrt(2) blocks, on either side.
        let mut fx = Fixture::with_trees(
            &[place(1, Team::A, RobotType::Soldier, 50.0, 50.0)],
            &[tree(5, Team::Neutral, 48.7, 30.0, 1.0, 40.0)],
        );
        let mut gw = fx.turn(1);
        assert!(!gw.can_move(Direction::from_degrees(45.0)));
        assert!(gw.can_move(Direction::EAST));
    }

    #[test]
    fn own_body_never_blocks() {
        let mut fx = Fixture::new(&[place(1, Team::A, RobotType::Tank, 50.0, 50.0)]);
        assert!(fx.turn(1).can_move(Direction::NORTH));
    }

    #[test]
    fn vertical_move_uses_offset_only() {
        let mut fx = Fixture::new(&[
            place(1, Team::A, RobotType::Soldier, 50.0, 50.0),
            place(2, Team::B, RobotType::Soldier, 50.5, 20.0),
            place(3, Team::B, RobotType::Soldier, 70.0, 50.0),
        ]);
        let mut gw = fx.turn(1);
        assert!(!gw.can_move(Direction::NORTH));
        gw.world.remove_robot(RobotId(2));
        assert!(gw.can_move(Direction::NORTH));
    }
}
