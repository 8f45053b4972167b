//! Round scheduler for the demo match: every live robot takes one turn in
//! id order, then the world advances.

use crate::agents;
use arbor_common::{GameConstants, RobotId, RobotType, Team, TreeId};
use arbor_gateway::{GameResult, Gateway, TurnReport};
use arbor_kernel::{MapBounds, MapSpec, Robot, Scenario, Tree, World};
use arbor_meter::ExecutionMeter;
use arbor_tools::{EventTally, MatchInspector};
use glam::Vec2;

/// Why the match loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    RoundLimit,
    Victory(Team),
    Resigned(Team),
}

/// A point-symmetric 80 x 80 map: two archons per team and a few neutral trees,
/// one of them holding bullets and one holding a robot.
pub fn demo_scenario(
    constants: GameConstants,
    seed: u64,
    rounds: u32,
    previous: [Vec<i64>; 2],
) -> Scenario {
    let mut scenario = Scenario::new(MapSpec {
        bounds: MapBounds::new(Vec2::ZERO, 80.0, 80.0),
        round_limit: rounds,
    });
    let archon = |id, team, x, y| {
        let health = RobotType::Archon.max_health();
        Robot::new(RobotId(id), team, RobotType::Archon, Vec2::new(x, y), health)
    };
    scenario.robots = vec![
        archon(1, Team::A, 12.0, 12.0),
        archon(2, Team::A, 16.0, 68.0),
        archon(3, Team::B, 68.0, 68.0),
        archon(4, Team::B, 64.0, 12.0),
    ];
    let neutral = |id, x, y, radius: f32| {
        let health = constants.neutral_tree_max_health(radius);
        Tree {
            id: TreeId(id),
            team: Team::Neutral,
            location: Vec2::new(x, y),
            radius,
            health,
            max_health: health,
            contained_bullets: 0.0,
            contained_robot: None,
        }
    };
    scenario.trees = vec![
        Tree {
            contained_bullets: 40.0,
            ..neutral(1, 40.0, 40.0, 2.0)
        },
        Tree {
            contained_robot: Some(RobotType::Soldier),
            ..neutral(2, 40.0, 20.0, 1.5)
        },
        neutral(3, 40.0, 60.0, 1.0),
    ];
    scenario.constants = constants;
    scenario.seed = seed;
    scenario.previous_memory = previous;
    scenario
}

/// How a match went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchReport {
    pub ending: Ending,
    /// Lifecycle counts over the whole match, tallied round by round.
    pub events: EventTally,
}

/// One robot's finished turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedTurn {
    /// The robot's team as of the start of its turn.
    pub team: Team,
    pub report: TurnReport,
}

/// Run `agent` for robot `id`. A raised error is charged as a fault and
/// counted in the robot's control bits. `None` when the robot is gone.
pub fn play_turn(
    world: &mut World,
    meter: &mut ExecutionMeter,
    id: RobotId,
    agent: impl FnOnce(&mut Gateway<'_>) -> GameResult<()>,
) -> anyhow::Result<Option<PlayedTurn>> {
    let Some(team) = world.robot(id).map(|r| r.team) else {
        return Ok(None);
    };
    let mut gw = Gateway::begin_turn(world, meter, id)?;
    let faulted = match agent(&mut gw) {
        Ok(()) => false,
        Err(err) => {
            tracing::debug!(robot = id.0, %err, "agent raised");
            gw.record_fault();
            true
        }
    };
    let report = gw.finish();
    if report.overrun > 0 {
        tracing::warn!(
            robot = id.0,
            used = report.fuel_used,
            overrun = report.overrun,
            "robot ran past its fuel ceiling"
        );
    }
    if faulted && world.robot(id).is_some() {
        let faults = world.control_bits(id).saturating_add(1);
        world.set_control_bits(id, faults);
    }
    Ok(Some(PlayedTurn { team, report }))
}

/// Play rounds until the round limit, a victory or a resignation. Prints the
/// inspector summary every `every` rounds when `every > 0`.
///
/// The event log is drained every round. Each robot's control bits hold the
/// number of turns in which its agent raised.
pub fn run_match(
    world: &mut World,
    meter: &mut ExecutionMeter,
    every: u32,
) -> anyhow::Result<MatchReport> {
    let mut events = MatchInspector::tally(&world.drain_events());
    while !world.is_over() {
        let round = world.round();
        let order: Vec<RobotId> = world.robots().keys().copied().collect();
        let mut resigned = None;
        for id in order {
            let Some(turn) = play_turn(world, meter, id, |gw| agents::play(gw, round))? else {
                continue;
            };
            if turn.report.resigned {
                resigned = Some(turn.team);
            }
        }
        world.advance_round();
        events.absorb(MatchInspector::tally(&world.drain_events()));

        if every > 0 && world.round() % every == 0 {
            println!("{}", MatchInspector::summary(world));
        }
        let ending = match resigned {
            Some(team) => Some(Ending::Resigned(team)),
            None => Team::PLAYERS
                .into_iter()
                .find(|t| world.has_won(*t))
                .map(Ending::Victory),
        };
        if let Some(ending) = ending {
            return Ok(MatchReport { ending, events });
        }
    }
    Ok(MatchReport {
        ending: Ending::RoundLimit,
        events,
    })
}
