use crate::error::{GameActionError, GameResult};
use crate::gateway::Gateway;
use arbor_common::{BulletId, MapLocation, RobotId, Team, TreeId};
use arbor_kernel::geometry;
use arbor_kernel::{Bullet, Robot, Tree};
use arbor_meter::cost;

/// Filter for the nearby-body scans.
///
/// A missing radius, a negative one, or one beyond the robot's sensing reach
/// is clamped to that reach. A missing center means the robot's own location.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NearbyQuery {
    pub center: Option<MapLocation>,
    pub radius: Option<f32>,
    pub team: Option<Team>,
}

impl NearbyQuery {
    /// Everything the robot can sense.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn within(radius: f32) -> Self {
        Self {
            radius: Some(radius),
            ..Self::default()
        }
    }

    pub fn around(mut self, center: MapLocation) -> Self {
        self.center = Some(center);
        self
    }

    pub fn of_team(mut self, team: Team) -> Self {
        self.team = Some(team);
        self
    }

    fn clamped_radius(&self, reach: f32) -> f32 {
        match self.radius {
            Some(r) if (0.0..=reach).contains(&r) => r,
            _ => reach,
        }
    }
}

impl Gateway<'_> {
    fn sensor_radius(&self) -> f32 {
        self.robot.kind.stats().sensor_radius
    }

    fn senses_point(&self, loc: MapLocation) -> bool {
        self.robot.location.distance(loc) <= self.sensor_radius()
    }

    fn senses_part(&self, center: MapLocation, radius: f32) -> bool {
        geometry::circle_partially_within(center, radius, self.robot.location, self.sensor_radius())
    }

    fn senses_bullet(&self, bullet: &Bullet) -> bool {
        let sight = self.robot.kind.stats().bullet_sight_radius;
        self.robot.location.distance(bullet.location) <= sight
    }

    pub(crate) fn require_sensed(&self, loc: MapLocation, context: &'static str) -> GameResult<()> {
        if !self.senses_point(loc) {
            return Err(GameActionError::out_of_range(context));
        }
        Ok(())
    }

    /// Whether `loc` is on the map. The location must be within sensor range.
    pub fn on_the_map(&mut self, loc: MapLocation) -> GameResult<bool> {
        self.charge(cost::PROBE);
        self.require_sensed(loc, "checking location on map")?;
        Ok(self.world.bounds().contains(loc))
    }

    /// Whether the whole circle is on the map. The whole circle must be
    /// within sensor range.
    pub fn on_the_map_circle(&mut self, center: MapLocation, radius: f32) -> GameResult<bool> {
        self.charge(cost::PROBE);
        let sensed = geometry::circle_fully_within(
            center,
            radius,
            self.robot.location,
            self.sensor_radius(),
        );
        if !sensed {
            return Err(GameActionError::out_of_range("checking circle on map"));
        }
        Ok(self.world.bounds().contains_circle(center, radius))
    }

    pub fn can_sense_location(&mut self, loc: MapLocation) -> bool {
        self.charge(cost::PROBE);
        self.senses_point(loc)
    }

    pub fn can_sense_part_of_circle(&mut self, center: MapLocation, radius: f32) -> bool {
        self.charge(cost::PROBE);
        self.senses_part(center, radius)
    }

    pub fn can_sense_all_of_circle(&mut self, center: MapLocation, radius: f32) -> bool {
        self.charge(cost::PROBE);
        geometry::circle_fully_within(center, radius, self.robot.location, self.sensor_radius())
    }

    fn robot_covering(&self, loc: MapLocation) -> Option<Robot> {
        self.world
            .robots()
            .values()
            .find(|r| r.location.distance(loc) <= r.radius())
            .copied()
    }

    fn tree_covering(&self, loc: MapLocation) -> Option<Tree> {
        self.world
            .trees()
            .values()
            .find(|t| t.location.distance(loc) <= t.radius)
            .copied()
    }

    pub fn is_location_occupied(&mut self, loc: MapLocation) -> GameResult<bool> {
        self.charge(cost::OCCUPANCY);
        self.require_sensed(loc, "checking occupancy")?;
        Ok(self.robot_covering(loc).is_some() || self.tree_covering(loc).is_some())
    }

    pub fn is_location_occupied_by_tree(&mut self, loc: MapLocation) -> GameResult<bool> {
        self.charge(cost::OCCUPANCY);
        self.require_sensed(loc, "checking tree occupancy")?;
        Ok(self.tree_covering(loc).is_some())
    }

    pub fn is_location_occupied_by_robot(&mut self, loc: MapLocation) -> GameResult<bool> {
        self.charge(cost::OCCUPANCY);
        self.require_sensed(loc, "checking robot occupancy")?;
        Ok(self.robot_covering(loc).is_some())
    }

    fn circle_occupied(&self, center: MapLocation, radius: f32, skip: Option<RobotId>) -> bool {
        let robots = self
            .world
            .robots()
            .values()
            .filter(|r| Some(r.id) != skip)
            .any(|r| geometry::circles_overlap(center, radius, r.location, r.radius()));
        robots
            || self
                .world
                .trees()
                .values()
                .any(|t| geometry::circles_overlap(center, radius, t.location, t.radius))
    }

    /// Whether any body overlaps the circle. Part of it must be sensed.
    pub fn is_circle_occupied(&mut self, center: MapLocation, radius: f32) -> GameResult<bool> {
        self.charge(cost::OCCUPANCY);
        if !self.senses_part(center, radius) {
            return Err(GameActionError::out_of_range("checking circle occupancy"));
        }
        Ok(self.circle_occupied(center, radius, None))
    }

    pub fn is_circle_occupied_except_by_this_robot(
        &mut self,
        center: MapLocation,
        radius: f32,
    ) -> GameResult<bool> {
        self.charge(cost::OCCUPANCY);
        if !self.senses_part(center, radius) {
            return Err(GameActionError::out_of_range("checking circle occupancy"));
        }
        Ok(self.circle_occupied(center, radius, Some(self.robot.id)))
    }

    pub fn sense_tree_at_location(&mut self, loc: MapLocation) -> GameResult<Option<Tree>> {
        self.charge(cost::OCCUPANCY);
        self.require_sensed(loc, "sensing tree at location")?;
        Ok(self.tree_covering(loc))
    }

    pub fn sense_robot_at_location(&mut self, loc: MapLocation) -> GameResult<Option<Robot>> {
        self.charge(cost::OCCUPANCY);
        self.require_sensed(loc, "sensing robot at location")?;
        Ok(self.robot_covering(loc))
    }

    pub fn can_sense_robot(&mut self, id: RobotId) -> bool {
        self.charge(cost::PROBE);
        self.world
            .robot(id)
            .is_some_and(|r| self.senses_part(r.location, r.radius()))
    }

    pub fn can_sense_tree(&mut self, id: TreeId) -> bool {
        self.charge(cost::PROBE);
        self.world
            .tree(id)
            .is_some_and(|t| self.senses_part(t.location, t.radius))
    }

    pub fn can_sense_bullet(&mut self, id: BulletId) -> bool {
        self.charge(cost::PROBE);
        self.world.bullet(id).is_some_and(|b| self.senses_bullet(b))
    }

    pub fn sense_robot(&mut self, id: RobotId) -> GameResult<Robot> {
        self.charge(cost::LOOKUP);
        let robot = self
            .world
            .robot(id)
            .copied()
            .ok_or(GameActionError::cant_do_that("sensing robot"))?;
        if !self.senses_part(robot.location, robot.radius()) {
            return Err(GameActionError::out_of_range("sensing robot"));
        }
        Ok(robot)
    }

    pub fn sense_tree(&mut self, id: TreeId) -> GameResult<Tree> {
        self.charge(cost::LOOKUP);
        let tree = self
            .world
            .tree(id)
            .copied()
            .ok_or(GameActionError::cant_do_that("sensing tree"))?;
        if !self.senses_part(tree.location, tree.radius) {
            return Err(GameActionError::out_of_range("sensing tree"));
        }
        Ok(tree)
    }

    pub fn sense_bullet(&mut self, id: BulletId) -> GameResult<Bullet> {
        self.charge(cost::LOOKUP);
        let bullet = self
            .world
            .bullet(id)
            .copied()
            .ok_or(GameActionError::cant_do_that("sensing bullet"))?;
        if !self.senses_bullet(&bullet) {
            return Err(GameActionError::out_of_range("sensing bullet"));
        }
        Ok(bullet)
    }

    /// Robots other than this one with part of their body in the query circle.
    pub fn sense_nearby_robots(&mut self, query: NearbyQuery) -> Vec<Robot> {
        self.charge(cost::SCAN);
        let radius = query.clamped_radius(self.sensor_radius());
        let center = query.center.unwrap_or(self.robot.location);
        self.world
            .robots()
            .values()
            .filter(|r| r.id != self.robot.id)
            .filter(|r| query.team.is_none_or(|t| r.team == t))
            .filter(|r| geometry::circle_partially_within(r.location, r.radius(), center, radius))
            .filter(|r| self.senses_part(r.location, r.radius()))
            .copied()
            .collect()
    }

    /// Trees with part of their body in the query circle.
    pub fn sense_nearby_trees(&mut self, query: NearbyQuery) -> Vec<Tree> {
        self.charge(cost::SCAN);
        let radius = query.clamped_radius(self.sensor_radius());
        let center = query.center.unwrap_or(self.robot.location);
        self.world
            .trees()
            .values()
            .filter(|t| query.team.is_none_or(|team| t.team == team))
            .filter(|t| geometry::circle_partially_within(t.location, t.radius, center, radius))
            .filter(|t| self.senses_part(t.location, t.radius))
            .copied()
            .collect()
    }

    /// Bullets within the query circle, clamped to bullet sight. The team
    /// filter is ignored.
    pub fn sense_nearby_bullets(&mut self, query: NearbyQuery) -> Vec<Bullet> {
        self.charge(cost::BULLET_SCAN);
        let radius = query.clamped_radius(self.robot.kind.stats().bullet_sight_radius);
        let center = query.center.unwrap_or(self.robot.location);
        self.world
            .bullets()
            .values()
            .filter(|b| b.location.distance(center) <= radius)
            .filter(|b| self.senses_bullet(b))
            .copied()
            .collect()
    }

    /// Where robots stood when they broadcast during the last round.
    pub fn sense_broadcasting_robot_locations(&mut self) -> Vec<MapLocation> {
        self.charge(cost::SCAN);
        self.world
            .broadcasts()
            .last_broadcasters()
            .map(|(_, loc)| loc)
            .collect()
    }
}
