use crate::error::{GameActionError, GameResult};
use crate::gateway::Gateway;
use arbor_common::{MapLocation, Rgb};
use arbor_kernel::Indicator;
use arbor_meter::cost;

impl Gateway<'_> {
    // Signaling.

    /// Queue `data` on a team channel. Teammates see it after the round ends.
    pub fn broadcast(&mut self, channel: usize, data: i32) -> GameResult<()> {
        self.charge(cost::ACTION);
        self.require_alive("broadcasting")?;
        if channel >= self.world.broadcasts().channels() {
            return Err(GameActionError::invalid_channel("broadcasting"));
        }
        let (team, id, location) = (self.robot.team, self.robot.id, self.robot.location);
        let board = self.world.broadcasts_mut();
        board.write(team, channel, data);
        board.note_broadcaster(id, location);
        tracing::trace!(robot = id.0, channel, data, "broadcast queued");
        Ok(())
    }

    /// Committed value of a team channel.
    pub fn read_broadcast(&mut self, channel: usize) -> GameResult<i32> {
        self.charge(cost::GETTER);
        let board = self.world.broadcasts();
        if channel >= board.channels() {
            return Err(GameActionError::invalid_channel("reading broadcast"));
        }
        Ok(board.read(self.robot.team, channel))
    }

    // Economy and exits.

    /// Trade bullets for victory points at the exchange rate. Returns the
    /// points awarded; amounts below one exchange unit buy nothing.
    pub fn donate(&mut self, bullets: f64) -> GameResult<u32> {
        const CONTEXT: &str = "donating";
        self.charge(cost::ACTION);
        self.require_alive(CONTEXT)?;
        if bullets.is_nan() || bullets < 0.0 {
            return Err(GameActionError::cant_do_that(CONTEXT));
        }
        let team = self.robot.team;
        if self.world.team_bullets(team) < bullets {
            return Err(GameActionError::insufficient_funds(CONTEXT));
        }
        self.world.change_bullets(team, -bullets);
        Ok(self.world.donate(team, bullets))
    }

    /// Remove this robot from the world. Every later call fails.
    pub fn disintegrate(&mut self) -> GameResult<()> {
        self.charge(cost::ACTION);
        self.require_alive("disintegrating")?;
        self.world.remove_robot(self.robot.id);
        self.disintegrated = true;
        Ok(())
    }

    /// Concede the match for this robot's team. The driver acts on the report.
    pub fn resign(&mut self) {
        self.charge(cost::ACTION);
        tracing::debug!(robot = self.robot.id.0, team = ?self.robot.team, "resigned");
        self.resigned = true;
    }

    // Debug overlay.

    fn require_on_map(&self, location: MapLocation, context: &'static str) -> GameResult<()> {
        if !self.world.bounds().contains(location) {
            return Err(GameActionError::out_of_range(context));
        }
        Ok(())
    }

    pub fn set_indicator_dot(&mut self, location: MapLocation, color: Rgb) -> GameResult<()> {
        self.charge(cost::GETTER);
        self.require_on_map(location, "indicator dot")?;
        self.world.add_indicator(Indicator::Dot {
            robot: self.robot.id,
            location,
            color,
        });
        Ok(())
    }

    pub fn set_indicator_line(
        &mut self,
        start: MapLocation,
        end: MapLocation,
        color: Rgb,
    ) -> GameResult<()> {
        self.charge(cost::GETTER);
        self.require_on_map(start, "indicator line")?;
        self.require_on_map(end, "indicator line")?;
        self.world.add_indicator(Indicator::Line {
            robot: self.robot.id,
            start,
            end,
            color,
        });
        Ok(())
    }

    // Team memory.

    /// # Panics
    ///
    /// Panics if `index` is outside the team memory length.
    pub fn set_team_memory(&mut self, index: usize, value: i64) {
        self.charge(cost::GETTER);
        let team = self.robot.team;
        self.world.team_memory_mut().set(team, index, value);
    }

    /// Overwrite only the bits of the cell selected by `mask`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the team memory length.
    pub fn set_team_memory_masked(&mut self, index: usize, value: i64, mask: i64) {
        self.charge(cost::GETTER);
        let team = self.robot.team;
        self.world
            .team_memory_mut()
            .set_masked(team, index, value, mask);
    }

    /// Memory this team left at the end of the previous match.
    pub fn team_memory(&mut self) -> Vec<i64> {
        self.charge(cost::GETTER);
        self.world.team_memory().previous(self.robot.team).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use crate::error::GameActionErrorKind;
    use crate::testkit::{Fixture, place};
    use arbor_common::{RobotId, RobotType, Rgb, Team};
    use arbor_kernel::{MapBounds, MapSpec, Scenario, World};
    use arbor_meter::ExecutionMeter;
    use glam::Vec2;

    #[test]
    fn broadcast_is_visible_after_the_round() {
        let mut fx = Fixture::new(&[
            place(1, Team::A, RobotType::Scout, 20.0, 20.0),
            place(2, Team::A, RobotType::Scout, 80.0, 80.0),
            place(3, Team::B, RobotType::Scout, 50.0, 50.0),
        ]);
        fx.turn(1).broadcast(7, 42).expect("valid channel");
        assert_eq!(fx.turn(2).read_broadcast(7), Ok(0));
        fx.world.advance_round();
        assert_eq!(fx.turn(2).read_broadcast(7), Ok(42));
        assert_eq!(fx.turn(3).read_broadcast(7), Ok(0));
        let heard: Vec<_> = fx.world.broadcasts().last_broadcasters().collect();
        assert_eq!(heard, vec![(RobotId(1), Vec2::new(20.0, 20.0))]);
    }

    #[test]
    fn channel_out_of_range() {
        let mut fx = Fixture::new(&[place(1, Team::A, RobotType::Scout, 20.0, 20.0)]);
        let mut gw = fx.turn(1);
        let err = gw.broadcast(1000, 1).expect_err("only 1000 channels");
        assert_eq!(err.kind, GameActionErrorKind::InvalidChannel);
        assert!(gw.broadcast(999, 1).is_ok());
        assert!(gw.read_broadcast(5000).is_err());
    }

    #[test]
    fn donation_buys_floor_of_tenth() {
        let mut fx = Fixture::new(&[place(1, Team::A, RobotType::Archon, 20.0, 20.0)]);
        let mut gw = fx.turn(1);
        assert_eq!(gw.donate(105.0), Ok(10));
        assert_eq!(gw.donate(9.5), Ok(0));
        assert_eq!(gw.team_victory_points(), 10);
        assert!((gw.team_bullets() - 185.5).abs() < 1e-9);
    }

    #[test]
    fn donation_errors() {
        let mut fx = Fixture::new(&[place(1, Team::A, RobotType::Archon, 20.0, 20.0)]);
        let mut gw = fx.turn(1);
        let err = gw.donate(300.5).expect_err("short balance");
        assert_eq!(err.kind, GameActionErrorKind::InsufficientFunds);
        let err = gw.donate(-1.0).expect_err("negative");
        assert_eq!(err.kind, GameActionErrorKind::CantDoThat);
        assert_eq!(gw.team_bullets(), 300.0);
    }

    #[test]
    fn disintegrate_removes_and_ends() {
        let mut fx = Fixture::new(&[place(1, Team::A, RobotType::Soldier, 20.0, 20.0)]);
        let mut gw = fx.turn(1);
        gw.disintegrate().expect("first");
        assert!(gw.disintegrate().is_err());
        assert!(gw.broadcast(0, 1).is_err());
        let report = gw.finish();
        assert!(report.disintegrated);
        assert!(fx.world.robot(RobotId(1)).is_none());
    }

    #[test]
    fn resign_is_reported() {
        let mut fx = Fixture::new(&[place(1, Team::B, RobotType::Archon, 20.0, 20.0)]);
        let mut gw = fx.turn(1);
        gw.resign();
        assert!(gw.finish().resigned);
        assert!(fx.world.robot(RobotId(1)).is_some());
    }

    #[test]
    fn indicators_validate_bounds() {
        let mut fx = Fixture::new(&[place(1, Team::A, RobotType::Scout, 20.0, 20.0)]);
        let red = Rgb::new(255, 0, 0);
        let mut gw = fx.turn(1);
        gw.set_indicator_dot(Vec2::new(30.0, 30.0), red).expect("on map");
        let err = gw
            .set_indicator_line(Vec2::new(1.0, 1.0), Vec2::new(150.0, 1.0), red)
            .expect_err("end off map");
        assert_eq!(err.kind, GameActionErrorKind::OutOfRange);
        drop(gw);
        assert_eq!(fx.world.indicators().len(), 1);
        fx.world.advance_round();
        assert!(fx.world.indicators().is_empty());
    }

    #[test]
    fn team_memory_reads_previous_match() {
        let mut scenario = Scenario::new(MapSpec {
            bounds: MapBounds::new(Vec2::ZERO, 100.0, 100.0),
            round_limit: 3000,
        });
        scenario.robots = vec![place(1, Team::A, RobotType::Scout, 20.0, 20.0)];
        scenario.previous_memory = [vec![5, 6], vec![]];
        let mut world = World::new(scenario);
        let mut meter = ExecutionMeter::new();
        let mut gw = crate::Gateway::begin_turn(&mut world, &mut meter, RobotId(1)).expect("turn");
        gw.set_team_memory(0, 0b1010);
        gw.set_team_memory_masked(0, 0b0101, 0b0011);
        assert_eq!(gw.team_memory()[..2], [5, 6]);
        drop(gw);
        assert_eq!(world.team_memory().current(Team::A)[0], 0b1001);
    }

    #[test]
    #[should_panic]
    fn team_memory_index_out_of_range_is_fatal() {
        let mut fx = Fixture::new(&[place(1, Team::A, RobotType::Scout, 20.0, 20.0)]);
        fx.turn(1).set_team_memory(32, 1);
    }
}
