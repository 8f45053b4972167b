use crate::error::{GameActionError, GameResult};
use crate::gateway::Gateway;
use arbor_common::{Direction, MapLocation, RobotId, RobotType, TreeId};
use arbor_kernel::{Body, Tree, geometry};
use arbor_meter::cost;

/// Volley shape of a ranged attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shot {
    Single,
    /// Three bullets: the heading and one spread to each side.
    Triad,
    /// Five bullets: the heading and two spreads to each side.
    Pentad,
}

impl Shot {
    fn context(self) -> &'static str {
        match self {
            Shot::Single => "firing single shot",
            Shot::Triad => "firing triad shot",
            Shot::Pentad => "firing pentad shot",
        }
    }
}

/// A tree named by id or by a point inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TreeTarget {
    Id(TreeId),
    Location(MapLocation),
}

impl From<TreeId> for TreeTarget {
    fn from(id: TreeId) -> Self {
        TreeTarget::Id(id)
    }
}

impl From<MapLocation> for TreeTarget {
    fn from(loc: MapLocation) -> Self {
        TreeTarget::Location(loc)
    }
}

impl Gateway<'_> {
    fn shot_cost(&self, shot: Shot) -> f64 {
        let c = self.constants();
        match shot {
            Shot::Single => c.single_shot_cost,
            Shot::Triad => c.triad_shot_cost,
            Shot::Pentad => c.pentad_shot_cost,
        }
    }

    fn check_fire(&self, shot: Shot) -> GameResult<()> {
        let context = shot.context();
        if !self.robot.kind.can_shoot() || self.robot.attack_count > 0 {
            return Err(GameActionError::cant_do_that(context));
        }
        if self.world.team_bullets(self.robot.team) < self.shot_cost(shot) {
            return Err(GameActionError::insufficient_funds(context));
        }
        Ok(())
    }

    fn volley(&self, shot: Shot, dir: Direction) -> Vec<Direction> {
        let c = self.constants();
        match shot {
            Shot::Single => vec![dir],
            Shot::Triad => {
                let s = c.triad_spread_degrees;
                vec![dir, dir.rotate_left_degrees(s), dir.rotate_right_degrees(s)]
            }
            Shot::Pentad => {
                let s = c.pentad_spread_degrees;
                vec![
                    dir,
                    dir.rotate_left_degrees(s),
                    dir.rotate_right_degrees(s),
                    dir.rotate_left_degrees(2.0 * s),
                    dir.rotate_right_degrees(2.0 * s),
                ]
            }
        }
    }

    pub fn can_fire(&mut self, shot: Shot) -> bool {
        self.charge(cost::PROBE);
        self.check_fire(shot).is_ok()
    }

    pub fn can_fire_single_shot(&mut self) -> bool {
        self.can_fire(Shot::Single)
    }

    pub fn can_fire_triad_shot(&mut self) -> bool {
        self.can_fire(Shot::Triad)
    }

    pub fn can_fire_pentad_shot(&mut self) -> bool {
        self.can_fire(Shot::Pentad)
    }

    /// Debit the shot cost and spawn its bullets just outside this robot.
    pub fn fire(&mut self, shot: Shot, dir: Direction) -> GameResult<()> {
        self.charge(cost::ACTION);
        self.require_alive(shot.context())?;
        self.check_fire(shot)?;

        let stats = self.robot.kind.stats();
        let (Some(speed), Some(damage)) = (stats.bullet_speed, stats.attack_power) else {
            return Err(GameActionError::cant_do_that(shot.context()));
        };
        let team = self.robot.team;
        let gap = self.robot.radius() + self.constants().bullet_spawn_offset;
        let price = self.shot_cost(shot);
        self.world.change_bullets(team, -price);
        let shooter = Some(Body::Robot(self.robot.id));
        for heading in self.volley(shot, dir) {
            let origin = self.robot.location + heading.offset(gap);
            self.world.spawn_bullet(team, origin, heading, speed, damage, shooter);
        }
        self.store_robot(self.robot.with_attack());
        tracing::trace!(robot = self.robot.id.0, ?shot, "fired");
        Ok(())
    }

    pub fn fire_single_shot(&mut self, dir: Direction) -> GameResult<()> {
        self.fire(Shot::Single, dir)
    }

    pub fn fire_triad_shot(&mut self, dir: Direction) -> GameResult<()> {
        self.fire(Shot::Triad, dir)
    }

    pub fn fire_pentad_shot(&mut self, dir: Direction) -> GameResult<()> {
        self.fire(Shot::Pentad, dir)
    }

    fn check_strike(&self) -> GameResult<()> {
        if self.robot.kind != RobotType::Lumberjack || self.robot.attack_count > 0 {
            return Err(GameActionError::cant_do_that("striking"));
        }
        Ok(())
    }

    pub fn can_strike(&mut self) -> bool {
        self.charge(cost::PROBE);
        self.check_strike().is_ok()
    }

    /// Melee sweep: damages every other body with part of it within one stride.
    pub fn strike(&mut self) -> GameResult<()> {
        self.charge(cost::ACTION);
        self.require_alive("striking")?;
        self.check_strike()?;
        let reach = self.robot.kind.stride_radius();
        let here = self.robot.location;
        let damage = self.robot.kind.stats().attack_power.unwrap_or(0.0);
        let me = self.robot.id;
        let mut hit: Vec<Body> = self
            .world
            .robots()
            .values()
            .filter(|r| r.id != me)
            .filter(|r| geometry::circle_partially_within(r.location, r.radius(), here, reach))
            .map(|r| Body::Robot(r.id))
            .collect();
        hit.extend(
            self.world
                .trees()
                .values()
                .filter(|t| geometry::circle_partially_within(t.location, t.radius, here, reach))
                .map(|t| Body::Tree(t.id)),
        );
        let team = self.robot.team;
        for body in &hit {
            self.world.damage_body(*body, damage, team);
        }
        self.store_robot(self.robot.with_attack());
        tracing::trace!(robot = me.0, bodies = hit.len(), "struck");
        Ok(())
    }

    fn find_tree(&self, target: TreeTarget) -> Option<Tree> {
        match target {
            TreeTarget::Id(id) => self.world.tree(id).copied(),
            TreeTarget::Location(loc) => self
                .world
                .trees()
                .values()
                .find(|t| t.location.distance(loc) <= t.radius)
                .copied(),
        }
    }

    fn in_stride(&self, center: MapLocation, radius: f32) -> bool {
        geometry::circle_partially_within(
            center,
            radius,
            self.robot.location,
            self.robot.kind.stride_radius(),
        )
    }

    /// The target tree, if it exists and is within one stride.
    fn reachable_tree(&self, target: TreeTarget, context: &'static str) -> GameResult<Tree> {
        let tree = self
            .find_tree(target)
            .ok_or(GameActionError::cant_do_that(context))?;
        if !self.in_stride(tree.location, tree.radius) {
            return Err(GameActionError::out_of_range(context));
        }
        Ok(tree)
    }

    pub fn can_interact_with_tree(&mut self, target: impl Into<TreeTarget>) -> bool {
        self.charge(cost::PROBE);
        self.reachable_tree(target.into(), "interacting").is_ok()
    }

    pub fn can_interact_with_robot(&mut self, id: RobotId) -> bool {
        self.charge(cost::PROBE);
        self.world
            .robot(id)
            .is_some_and(|r| r.id != self.robot.id && self.in_stride(r.location, r.radius()))
    }

    fn check_chop(&self, target: TreeTarget) -> GameResult<Tree> {
        const CONTEXT: &str = "chopping";
        let tree = self.reachable_tree(target, CONTEXT)?;
        if self.robot.kind != RobotType::Lumberjack || self.robot.attack_count > 0 {
            return Err(GameActionError::cant_do_that(CONTEXT));
        }
        Ok(tree)
    }

    pub fn can_chop(&mut self, target: impl Into<TreeTarget>) -> bool {
        self.charge(cost::PROBE);
        self.check_chop(target.into()).is_ok()
    }

    /// Deal chop damage to a tree. Counts as this turn's attack.
    pub fn chop(&mut self, target: impl Into<TreeTarget>) -> GameResult<()> {
        self.charge(cost::ACTION);
        self.require_alive("chopping")?;
        let tree = self.check_chop(target.into())?;
        let damage = self.constants().lumberjack_chop_damage;
        self.world
            .damage_body(Body::Tree(tree.id), damage, self.robot.team);
        self.store_robot(self.robot.with_attack());
        Ok(())
    }

    fn check_shake(&self, target: TreeTarget) -> GameResult<Tree> {
        let tree = self.reachable_tree(target, "shaking")?;
        if self.shaken {
            return Err(GameActionError::cant_do_that("shaking"));
        }
        Ok(tree)
    }

    /// Whether this robot still has its shake for the turn.
    pub fn can_shake(&mut self) -> bool {
        self.charge(cost::PROBE);
        !self.shaken
    }

    pub fn can_shake_tree(&mut self, target: impl Into<TreeTarget>) -> bool {
        self.charge(cost::PROBE);
        self.check_shake(target.into()).is_ok()
    }

    /// Move all bullets held by a tree into this team's balance.
    pub fn shake(&mut self, target: impl Into<TreeTarget>) -> GameResult<()> {
        self.charge(cost::ACTION);
        self.require_alive("shaking")?;
        let tree = self.check_shake(target.into())?;
        self.world
            .change_bullets(self.robot.team, tree.contained_bullets);
        self.world.replace_tree(tree.shaken());
        self.shaken = true;
        Ok(())
    }

    fn check_water(&self, target: TreeTarget) -> GameResult<Tree> {
        let tree = self.reachable_tree(target, "watering")?;
        if self.robot.kind != RobotType::Gardener || self.watered {
            return Err(GameActionError::cant_do_that("watering"));
        }
        Ok(tree)
    }

    /// Whether this robot may still water this turn.
    pub fn can_water(&mut self) -> bool {
        self.charge(cost::PROBE);
        self.robot.kind == RobotType::Gardener && !self.watered
    }

    pub fn can_water_tree(&mut self, target: impl Into<TreeTarget>) -> bool {
        self.charge(cost::PROBE);
        self.check_water(target.into()).is_ok()
    }

    /// Heal a tree. Once per turn and independent of the attack counter.
    pub fn water(&mut self, target: impl Into<TreeTarget>) -> GameResult<()> {
        self.charge(cost::ACTION);
        self.require_alive("watering")?;
        let tree = self.check_water(target.into())?;
        let amount = self.constants().water_health_regen_rate;
        self.world.replace_tree(tree.healed(amount));
        self.watered = true;
        Ok(())
    }
}
