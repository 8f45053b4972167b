use arbor_common::{RobotId, RobotType, Team};
use arbor_kernel::{World, WorldEvent};
use arbor_meter::UsageHistory;

/// Match inspector for developer tooling.
///
/// Read-only queries against the world for debugging and the CLI.
pub struct MatchInspector;

impl MatchInspector {
    /// Produce a summary of the match so far.
    pub fn summary(world: &World) -> MatchSummary {
        let team = |t: Team| TeamSummary {
            robots: world.team_robot_count(t),
            trees: world.team_tree_count(t),
            bullets: world.team_bullets(t),
            victory_points: world.victory_points(t),
        };
        MatchSummary {
            round: world.round(),
            round_limit: world.round_limit(),
            state_hash: world.state_hash(),
            teams: [team(Team::A), team(Team::B)],
            neutral_trees: world.team_tree_count(Team::Neutral),
            bullets_in_flight: world.bullets().len(),
            pending_events: world.events().len(),
        }
    }

    /// Snapshot of one robot, if it is alive.
    pub fn inspect_robot(world: &World, id: RobotId) -> Option<RobotInfo> {
        world.robot(id).map(|r| RobotInfo {
            id,
            team: r.team,
            kind: r.kind,
            position: [r.location.x, r.location.y],
            health: r.health,
            max_health: r.kind.max_health(),
            build_cooldown: world.build_cooldown(id),
        })
    }

    /// All live robots of `team`, in id order.
    pub fn list_robots(world: &World, team: Team) -> Vec<RobotId> {
        world
            .robots()
            .values()
            .filter(|r| r.team == team)
            .map(|r| r.id)
            .collect()
    }

    /// Count the lifecycle events in a drained log.
    pub fn tally(events: &[WorldEvent]) -> EventTally {
        let mut tally = EventTally::default();
        for event in events {
            match event {
                WorldEvent::RobotSpawned { .. } => tally.robots_spawned += 1,
                WorldEvent::RobotDestroyed { .. } => tally.robots_destroyed += 1,
                WorldEvent::TreeSpawned { .. } => tally.trees_spawned += 1,
                WorldEvent::TreeDestroyed { .. } => tally.trees_destroyed += 1,
                WorldEvent::BulletFired { .. } => tally.bullets_fired += 1,
                WorldEvent::BulletHit { .. } => tally.bullet_hits += 1,
                WorldEvent::Donated { points, .. } => tally.points_bought += points,
                WorldEvent::RobotMoved { .. }
                | WorldEvent::BulletExpired { .. }
                | WorldEvent::RoundAdvanced { .. } => {}
            }
        }
        tally
    }

    /// Fuel statistics over the recent turns a meter recorded.
    pub fn fuel_report(history: &UsageHistory) -> FuelReport {
        FuelReport {
            turns: history.count(),
            average: history.average(),
            max: history.max(),
            min: history.min(),
        }
    }
}

/// One team's standing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamSummary {
    pub robots: usize,
    pub trees: usize,
    pub bullets: f64,
    pub victory_points: u32,
}

/// Summary of match state for the inspector.
#[derive(Debug, Clone)]
pub struct MatchSummary {
    pub round: u32,
    pub round_limit: u32,
    pub state_hash: u64,
    /// Team A then team B.
    pub teams: [TeamSummary; 2],
    pub neutral_trees: usize,
    pub bullets_in_flight: usize,
    pub pending_events: usize,
}

impl std::fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Match: round={}/{} hash={:016x} neutral_trees={} bullets_in_flight={} \
             pending_events={}",
            self.round,
            self.round_limit,
            self.state_hash,
            self.neutral_trees,
            self.bullets_in_flight,
            self.pending_events
        )?;
        for (name, t) in ["A", "B"].iter().zip(&self.teams) {
            writeln!(
                f,
                "  team {name}: robots={} trees={} bullets={:.2} vp={}",
                t.robots, t.trees, t.bullets, t.victory_points
            )?;
        }
        Ok(())
    }
}

/// Detailed info about a single robot.
#[derive(Debug, Clone)]
pub struct RobotInfo {
    pub id: RobotId,
    pub team: Team,
    pub kind: RobotType,
    pub position: [f32; 2],
    pub health: f32,
    pub max_health: f32,
    pub build_cooldown: u32,
}

impl std::fmt::Display for RobotInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Robot [{}] {:?} {:?} pos=({:.2}, {:.2}) hp={:.1}/{:.1} cooldown={}",
            self.id.0,
            self.team,
            self.kind,
            self.position[0],
            self.position[1],
            self.health,
            self.max_health,
            self.build_cooldown,
        )
    }
}

/// Lifecycle counts from an event log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventTally {
    pub robots_spawned: usize,
    pub robots_destroyed: usize,
    pub trees_spawned: usize,
    pub trees_destroyed: usize,
    pub bullets_fired: usize,
    pub bullet_hits: usize,
    pub points_bought: u32,
}

impl EventTally {
    /// Add the counts of a later stretch of the log.
    pub fn absorb(&mut self, other: EventTally) {
        self.robots_spawned += other.robots_spawned;
        self.robots_destroyed += other.robots_destroyed;
        self.trees_spawned += other.trees_spawned;
        self.trees_destroyed += other.trees_destroyed;
        self.bullets_fired += other.bullets_fired;
        self.bullet_hits += other.bullet_hits;
        self.points_bought += other.points_bought;
    }
}

/// Fuel statistics for recent turns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelReport {
    pub turns: usize,
    pub average: f64,
    pub max: u32,
    pub min: u32,
}

impl std::fmt::Display for FuelReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Fuel: turns={} avg={:.1} max={} min={}",
            self.turns, self.average, self.max, self.min
        )
    }
}
