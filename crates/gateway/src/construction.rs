use crate::error::{GameActionError, GameResult};
use crate::gateway::Gateway;
use arbor_common::{Direction, MapLocation, RobotId, RobotType, Team, TreeId};
use arbor_kernel::geometry;
use arbor_meter::cost;

impl Gateway<'_> {
    /// Center of a body of `radius` placed next to this robot along `dir`.
    fn spawn_point(&self, dir: Direction, radius: f32) -> MapLocation {
        let gap = self.robot.radius() + self.constants().general_spawn_offset + radius;
        self.robot.location + dir.offset(gap)
    }

    /// Whether a body of `radius` fits at `center`: on the map and clear of
    /// every robot and tree.
    fn spawn_clear(&self, center: MapLocation, radius: f32) -> bool {
        if !self.world.bounds().contains_circle(center, radius) {
            return false;
        }
        let robots = self
            .world
            .robots()
            .values()
            .any(|r| geometry::circles_overlap(center, radius, r.location, r.radius()));
        let trees = self
            .world
            .trees()
            .values()
            .any(|t| geometry::circles_overlap(center, radius, t.location, t.radius));
        !robots && !trees
    }

    fn build_ready(&self) -> bool {
        self.world.build_cooldown(self.robot.id) == 0
    }

    /// Archetype, cooldown and funds check for constructing `kind`.
    fn check_robot_requirements(&self, kind: RobotType, context: &'static str) -> GameResult<()> {
        let allowed = if kind.is_hireable() {
            self.robot.kind.can_hire()
        } else {
            kind.is_buildable() && self.robot.kind.can_build()
        };
        if !allowed || !self.build_ready() {
            return Err(GameActionError::cant_do_that(context));
        }
        let price = kind.stats().bullet_cost.unwrap_or(f32::INFINITY) as f64;
        if self.world.team_bullets(self.robot.team) < price {
            return Err(GameActionError::insufficient_funds(context));
        }
        Ok(())
    }

    fn check_robot_spawn(
        &self,
        kind: RobotType,
        dir: Direction,
        context: &'static str,
    ) -> GameResult<MapLocation> {
        self.check_robot_requirements(kind, context)?;
        let at = self.spawn_point(dir, kind.body_radius());
        if !self.spawn_clear(at, kind.body_radius()) {
            return Err(GameActionError::cant_do_that(context));
        }
        Ok(at)
    }

    fn construct_robot(&mut self, kind: RobotType, at: MapLocation) -> RobotId {
        let team = self.robot.team;
        let stats = kind.stats();
        let fraction = self.constants().planted_unit_starting_health_fraction;
        self.world
            .change_bullets(team, -(stats.bullet_cost.unwrap_or(0.0) as f64));
        let id = self
            .world
            .spawn_robot(kind, team, at, kind.starting_health(fraction));
        self.world
            .set_build_cooldown(self.robot.id, stats.build_cooldown_turns);
        tracing::debug!(builder = self.robot.id.0, built = id.0, ?kind, "robot constructed");
        id
    }

    pub fn has_robot_build_requirements(&mut self, kind: RobotType) -> bool {
        self.charge(cost::PROBE);
        !kind.is_hireable() && self.check_robot_requirements(kind, "building").is_ok()
    }

    pub fn can_build_robot(&mut self, kind: RobotType, dir: Direction) -> bool {
        self.charge(cost::PROBE);
        !kind.is_hireable() && self.check_robot_spawn(kind, dir, "building").is_ok()
    }

    /// Build a combat unit next to this producer.
    pub fn build_robot(&mut self, kind: RobotType, dir: Direction) -> GameResult<RobotId> {
        self.charge(cost::ACTION);
        self.require_alive("building")?;
        if kind.is_hireable() {
            return Err(GameActionError::cant_do_that("building"));
        }
        let at = self.check_robot_spawn(kind, dir, "building")?;
        Ok(self.construct_robot(kind, at))
    }

    pub fn can_hire_gardener(&mut self, dir: Direction) -> bool {
        self.charge(cost::PROBE);
        self.check_robot_spawn(RobotType::Gardener, dir, "hiring").is_ok()
    }

    /// Hire a producer next to this command unit.
    pub fn hire_gardener(&mut self, dir: Direction) -> GameResult<RobotId> {
        self.charge(cost::ACTION);
        self.require_alive("hiring")?;
        let at = self.check_robot_spawn(RobotType::Gardener, dir, "hiring")?;
        Ok(self.construct_robot(RobotType::Gardener, at))
    }

    fn check_tree_requirements(&self) -> GameResult<()> {
        const CONTEXT: &str = "planting";
        if !self.robot.kind.can_build() || !self.build_ready() {
            return Err(GameActionError::cant_do_that(CONTEXT));
        }
        if self.world.team_bullets(self.robot.team) < self.constants().bullet_tree_cost {
            return Err(GameActionError::insufficient_funds(CONTEXT));
        }
        Ok(())
    }

    fn check_plant(&self, dir: Direction) -> GameResult<MapLocation> {
        self.check_tree_requirements()?;
        let radius = self.constants().bullet_tree_radius;
        let at = self.spawn_point(dir, radius);
        if !self.spawn_clear(at, radius) {
            return Err(GameActionError::cant_do_that("planting"));
        }
        Ok(at)
    }

    pub fn has_tree_build_requirements(&mut self) -> bool {
        self.charge(cost::PROBE);
        self.check_tree_requirements().is_ok()
    }

    pub fn can_plant_tree(&mut self, dir: Direction) -> bool {
        self.charge(cost::PROBE);
        self.check_plant(dir).is_ok()
    }

    /// Plant a team-owned tree next to this producer.
    pub fn plant_tree(&mut self, dir: Direction) -> GameResult<TreeId> {
        self.charge(cost::ACTION);
        self.require_alive("planting")?;
        let at = self.check_plant(dir)?;
        let c = self.constants();
        let (cost, radius, max, cooldown) = (
            c.bullet_tree_cost,
            c.bullet_tree_radius,
            c.bullet_tree_max_health,
            c.bullet_tree_construction_cooldown,
        );
        let health = c.planted_unit_starting_health_fraction * max;
        let team: Team = self.robot.team;
        self.world.change_bullets(team, -cost);
        let id = self.world.spawn_tree(team, at, radius, health, max);
        self.world.set_build_cooldown(self.robot.id, cooldown);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::GameActionErrorKind;
    use crate::testkit::{Fixture, place, tree};
    use arbor_common::{Direction, RobotId, RobotType, Team};

    #[test]
    fn gardener_builds_soldier_at_reduced_health() {
        let mut fx = Fixture::new(&[place(1, Team::A, RobotType::Gardener, 50.0, 50.0)]);
        let mut gw = fx.turn(1);
        assert!(gw.has_robot_build_requirements(RobotType::Soldier));
        assert!(gw.can_build_robot(RobotType::Soldier, Direction::EAST));
        let id = gw.build_robot(RobotType::Soldier, Direction::EAST).expect("build");
        assert!(!gw.is_build_ready());
        drop(gw);
        let soldier = fx.world.robot(id).copied().expect("built");
        assert_eq!(soldier.team, Team::A);
        assert!((soldier.health - 10.0).abs() < 1e-5);
        assert!((soldier.location.x - 52.01).abs() < 1e-4);
        assert_eq!(fx.world.team_bullets(Team::A), 200.0);
        assert_eq!(fx.world.build_cooldown(RobotId(1)), 10);
    }

    #[test]
    fn cooldown_blocks_until_it_runs_out() {
        let mut fx = Fixture::new(&[place(1, Team::A, RobotType::Gardener, 50.0, 50.0)]);
        fx.world.change_bullets(Team::A, 1000.0);
        fx.turn(1)
            .build_robot(RobotType::Scout, Direction::EAST)
            .expect("build");
        for _ in 0..9 {
            fx.world.advance_round();
        }
        assert!(!fx.turn(1).has_robot_build_requirements(RobotType::Scout));
        fx.world.advance_round();
        assert!(fx.turn(1).can_build_robot(RobotType::Scout, Direction::WEST));
    }

    #[test]
    fn archon_hires_gardener_at_full_health() {
        let mut fx = Fixture::new(&[place(1, Team::B, RobotType::Archon, 50.0, 50.0)]);
        let mut gw = fx.turn(1);
        assert!(!gw.can_build_robot(RobotType::Gardener, Direction::NORTH));
        assert!(gw.can_hire_gardener(Direction::NORTH));
        let id = gw.hire_gardener(Direction::NORTH).expect("hire");
        drop(gw);
        assert_eq!(fx.world.robot(id).map(|r| r.health), Some(40.0));
        assert_eq!(fx.world.team_bullets(Team::B), 200.0);
    }

    #[test]
    fn wrong_archetype_is_rejected() {
        let mut fx = Fixture::new(&[
            place(1, Team::A, RobotType::Archon, 20.0, 20.0),
            place(2, Team::A, RobotType::Soldier, 60.0, 60.0),
        ]);
        let err = fx
            .turn(1)
            .build_robot(RobotType::Soldier, Direction::EAST)
            .expect_err("archons do not build soldiers");
        assert_eq!(err.kind, GameActionErrorKind::CantDoThat);
        let err = fx
            .turn(2)
            .hire_gardener(Direction::EAST)
            .expect_err("soldiers do not hire");
        assert_eq!(err.kind, GameActionErrorKind::CantDoThat);
        assert!(!fx.turn(2).has_tree_build_requirements());
    }

    #[test]
    fn blocked_spawn_is_rejected() {
        let mut fx = Fixture::with_trees(
            &[place(1, Team::A, RobotType::Gardener, 50.0, 50.0)],
            &[tree(9, Team::Neutral, 53.0, 50.0, 1.0, 40.0)],
        );
        let mut gw = fx.turn(1);
        assert!(!gw.can_build_robot(RobotType::Soldier, Direction::EAST));
        assert!(!gw.can_plant_tree(Direction::EAST));
        assert!(gw.can_plant_tree(Direction::WEST));
    }

    #[test]
    fn tank_needs_its_full_price() {
        let mut fx = Fixture::new(&[place(1, Team::A, RobotType::Gardener, 50.0, 50.0)]);
        fx.world.change_bullets(Team::A, -1.0);
        let err = fx
            .turn(1)
            .build_robot(RobotType::Tank, Direction::EAST)
            .expect_err("tank costs 300 with 299 in hand");
        assert_eq!(err.kind, GameActionErrorKind::InsufficientFunds);
        assert!(fx.turn(1).can_build_robot(RobotType::Soldier, Direction::EAST));
    }

    #[test]
    fn planting_costs_and_starts_at_fraction() {
        let mut fx = Fixture::new(&[place(1, Team::A, RobotType::Gardener, 50.0, 50.0)]);
        let mut gw = fx.turn(1);
        assert!(gw.has_tree_build_requirements());
        let id = gw.plant_tree(Direction::SOUTH).expect("plant");
        drop(gw);
        let t = fx.world.tree(id).copied().expect("planted");
        assert_eq!(t.team, Team::A);
        assert!((t.health - 10.0).abs() < 1e-5);
        assert_eq!(t.max_health, 50.0);
        assert_eq!(fx.world.team_bullets(Team::A), 250.0);
        assert_eq!(fx.world.build_cooldown(RobotId(1)), 10);
    }

    #[test]
    fn planting_without_funds() {
        let mut fx = Fixture::new(&[place(1, Team::A, RobotType::Gardener, 50.0, 50.0)]);
        fx.world.change_bullets(Team::A, -260.0);
        let err = fx
            .turn(1)
            .plant_tree(Direction::SOUTH)
            .expect_err("40 bullets");
        assert_eq!(err.kind, GameActionErrorKind::InsufficientFunds);
    }
}
