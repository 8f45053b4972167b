use crate::Gateway;
use arbor_common::{RobotId, RobotType, Team, TreeId};
use arbor_kernel::{MapBounds, MapSpec, Robot, Scenario, Tree, World};
use arbor_meter::ExecutionMeter;
use glam::Vec2;

pub(crate) fn place(id: u32, team: Team, kind: RobotType, x: f32, y: f32) -> Robot {
    Robot::new(RobotId(id), team, kind, Vec2::new(x, y), kind.max_health())
}

pub(crate) fn tree(id: u32, team: Team, x: f32, y: f32, radius: f32, health: f32) -> Tree {
    Tree {
        id: TreeId(id),
        team,
        location: Vec2::new(x, y),
        radius,
        health,
        max_health: 50.0,
        contained_bullets: 0.0,
        contained_robot: None,
    }
}

/// A 100 x 100 map with the given bodies and a fresh meter.
pub(crate) struct Fixture {
    pub world: World,
    pub meter: ExecutionMeter,
}

impl Fixture {
    pub fn new(robots: &[Robot]) -> Self {
        Self::with_trees(robots, &[])
    }

    pub fn with_trees(robots: &[Robot], trees: &[Tree]) -> Self {
        let mut scenario = Scenario::new(MapSpec {
            bounds: MapBounds::new(Vec2::ZERO, 100.0, 100.0),
            round_limit: 3000,
        });
        scenario.robots = robots.to_vec();
        scenario.trees = trees.to_vec();
        scenario.seed = 11;
        Self {
            world: World::new(scenario),
            meter: ExecutionMeter::new(),
        }
    }

    pub fn turn(&mut self, id: u32) -> Gateway<'_> {
        Gateway::begin_turn(&mut self.world, &mut self.meter, RobotId(id)).expect("robot exists")
    }
}
