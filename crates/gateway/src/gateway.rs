use crate::error::{GameActionError, GameResult};
use arbor_common::{GameConstants, MapLocation, RobotId, RobotType, Team};
use arbor_kernel::{Robot, World};
use arbor_meter::{ExecutionMeter, cost};

/// What a finished turn left behind, for the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    pub robot: RobotId,
    pub fuel_used: u32,
    /// Fuel used past the robot's ceiling.
    pub overrun: u32,
    /// The agent conceded the match for its team.
    pub resigned: bool,
    /// The robot removed itself this turn.
    pub disintegrated: bool,
}

/// One robot's view of the world for the length of its turn.
///
/// Every call charges the meter first, then validates, and mutates the world
/// only if validation passed. The bound snapshot is refreshed after each
/// mutation of the acting robot.
pub struct Gateway<'a> {
    pub(crate) world: &'a mut World,
    pub(crate) meter: &'a mut ExecutionMeter,
    pub(crate) robot: Robot,
    pub(crate) shaken: bool,
    pub(crate) watered: bool,
    pub(crate) resigned: bool,
    pub(crate) disintegrated: bool,
}

impl<'a> Gateway<'a> {
    /// Start `id`'s turn: reset its per-turn counters and set the meter
    /// ceiling for its archetype.
    pub fn begin_turn(
        world: &'a mut World,
        meter: &'a mut ExecutionMeter,
        id: RobotId,
    ) -> GameResult<Self> {
        let robot = world
            .robot(id)
            .copied()
            .ok_or(GameActionError::cant_do_that("beginning turn"))?
            .with_counters_reset();
        world.replace_robot(robot);
        meter.begin_turn(robot.kind.stats().fuel_limit);
        tracing::trace!(robot = id.0, kind = ?robot.kind, "turn started");
        Ok(Self {
            world,
            meter,
            robot,
            shaken: false,
            watered: false,
            resigned: false,
            disintegrated: false,
        })
    }

    /// End the turn and hand back its accounting.
    pub fn finish(self) -> TurnReport {
        let overrun = self.meter.overrun();
        let fuel_used = self.meter.end_turn();
        if overrun > 0 {
            let robot = self.robot.id.0;
            tracing::debug!(robot, fuel_used, overrun, "turn ran past its ceiling");
        }
        TurnReport {
            robot: self.robot.id,
            fuel_used,
            overrun,
            resigned: self.resigned,
            disintegrated: self.disintegrated,
        }
    }

    /// Charge the exception penalty after agent code raised. Called by the
    /// driver, not by agents.
    pub fn record_fault(&mut self) {
        let penalty = self.constants().exception_fuel_penalty;
        self.meter.penalize_fault(penalty);
        tracing::trace!(robot = self.robot.id.0, penalty, "agent fault charged");
    }

    pub(crate) fn charge(&mut self, units: u32) {
        self.meter.charge(units);
    }

    pub(crate) fn constants(&self) -> &GameConstants {
        self.world.constants()
    }

    /// Reject calls once the bound robot has left the world.
    pub(crate) fn require_alive(&self, context: &'static str) -> GameResult<()> {
        if self.disintegrated || self.world.robot(self.robot.id).is_none() {
            return Err(GameActionError::cant_do_that(context));
        }
        Ok(())
    }

    /// Re-read the bound robot after the world changed it.
    pub(crate) fn refresh(&mut self) {
        if let Some(robot) = self.world.robot(self.robot.id) {
            self.robot = *robot;
        }
    }

    pub(crate) fn store_robot(&mut self, robot: Robot) {
        self.world.replace_robot(robot);
        self.robot = robot;
    }

    // Global queries.

    pub fn round_limit(&mut self) -> u32 {
        self.charge(cost::GETTER);
        self.world.round_limit()
    }

    pub fn round_num(&mut self) -> u32 {
        self.charge(cost::GETTER);
        self.world.round()
    }

    pub fn team_bullets(&mut self) -> f64 {
        self.charge(cost::GETTER);
        self.world.team_bullets(self.robot.team)
    }

    pub fn team_victory_points(&mut self) -> u32 {
        self.charge(cost::GETTER);
        self.world.victory_points(self.robot.team)
    }

    pub fn robot_count(&mut self) -> usize {
        self.charge(cost::OCCUPANCY);
        self.world.team_robot_count(self.robot.team)
    }

    pub fn tree_count(&mut self) -> usize {
        self.charge(cost::OCCUPANCY);
        self.world.team_tree_count(self.robot.team)
    }

    pub fn initial_archon_locations(&mut self, team: Team) -> Vec<MapLocation> {
        self.charge(cost::SCAN);
        self.world.starting_archon_locations(team).to_vec()
    }

    // Unit queries.

    pub fn id(&mut self) -> RobotId {
        self.charge(cost::GETTER);
        self.robot.id
    }

    pub fn team(&mut self) -> Team {
        self.charge(cost::GETTER);
        self.robot.team
    }

    pub fn kind(&mut self) -> RobotType {
        self.charge(cost::GETTER);
        self.robot.kind
    }

    pub fn location(&mut self) -> MapLocation {
        self.charge(cost::GETTER);
        self.robot.location
    }

    pub fn health(&mut self) -> f32 {
        self.charge(cost::GETTER);
        self.robot.health
    }

    pub fn attack_count(&mut self) -> u32 {
        self.charge(cost::GETTER);
        self.robot.attack_count
    }

    pub fn move_count(&mut self) -> u32 {
        self.charge(cost::GETTER);
        self.robot.move_count
    }

    pub fn has_moved(&mut self) -> bool {
        self.charge(cost::GETTER);
        self.robot.move_count > 0
    }

    pub fn has_attacked(&mut self) -> bool {
        self.charge(cost::GETTER);
        self.robot.attack_count > 0
    }

    pub fn is_build_ready(&mut self) -> bool {
        self.charge(cost::GETTER);
        self.world.build_cooldown(self.robot.id) == 0
    }

    /// Debug word the driver attached to this robot.
    pub fn control_bits(&mut self) -> u64 {
        self.charge(cost::GETTER);
        self.world.control_bits(self.robot.id)
    }

    /// Fuel left this turn.
    pub fn fuel_remaining(&mut self) -> u32 {
        self.charge(cost::GETTER);
        self.meter.remaining()
    }
}
