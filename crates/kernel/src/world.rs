use crate::entities::{Body, Bullet, Robot, Tree};
use crate::geometry::{self, MapBounds};
use crate::memory::TeamMemoryBank;
use crate::signal::BroadcastBoard;
use arbor_common::{
    BulletId, Direction, GameConstants, MapLocation, RobotId, RobotType, Rgb, Team, TreeId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An event record produced by every lifecycle change in the world.
///
/// Drained by tooling; also what the CLI reports between rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    RobotSpawned {
        id: RobotId,
        team: Team,
        kind: RobotType,
        location: MapLocation,
    },
    RobotMoved {
        id: RobotId,
        from: MapLocation,
        to: MapLocation,
    },
    RobotDestroyed {
        id: RobotId,
        team: Team,
        kind: RobotType,
    },
    TreeSpawned {
        id: TreeId,
        team: Team,
        location: MapLocation,
    },
    TreeDestroyed {
        id: TreeId,
        team: Team,
    },
    BulletFired {
        id: BulletId,
        team: Team,
        location: MapLocation,
        heading: Direction,
    },
    BulletHit {
        id: BulletId,
        target: Body,
    },
    /// Bullet left the map without hitting anything.
    BulletExpired {
        id: BulletId,
    },
    Donated {
        team: Team,
        bullets: f64,
        points: u32,
    },
    RoundAdvanced {
        round: u32,
    },
}

/// Debug marker drawn by a robot. Cleared every round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Indicator {
    Dot {
        robot: RobotId,
        location: MapLocation,
        color: Rgb,
    },
    Line {
        robot: RobotId,
        start: MapLocation,
        end: MapLocation,
        color: Rgb,
    },
}

/// Fixed shape of a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapSpec {
    pub bounds: MapBounds,
    pub round_limit: u32,
}

/// Everything needed to start a match.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub map: MapSpec,
    pub robots: Vec<Robot>,
    pub trees: Vec<Tree>,
    pub constants: GameConstants,
    pub seed: u64,
    /// Team memory saved by the previous match, A then B.
    pub previous_memory: [Vec<i64>; 2],
}

impl Scenario {
    pub fn new(map: MapSpec) -> Self {
        Self {
            map,
            robots: Vec::new(),
            trees: Vec::new(),
            constants: GameConstants::default(),
            seed: 0,
            previous_memory: [Vec::new(), Vec::new()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct TeamEconomy {
    bullets: f64,
    victory_points: u32,
}

fn slot(team: Team) -> Option<usize> {
    match team {
        Team::A => Some(0),
        Team::B => Some(1),
        Team::Neutral => None,
    }
}

/// The authoritative match state.
///
/// Bodies are stored as immutable snapshots in `BTreeMap`s so iteration, and
/// therefore bullet resolution, is deterministic. Replacing a body means
/// inserting a new snapshot. The world applies changes without checking game
/// rules; legality is the gateway's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    map: MapSpec,
    constants: GameConstants,
    robots: BTreeMap<RobotId, Robot>,
    trees: BTreeMap<TreeId, Tree>,
    bullets: BTreeMap<BulletId, Bullet>,
    economy: [TeamEconomy; 2],
    starting_archons: [Vec<MapLocation>; 2],
    /// Rounds until a robot may build again. Absent means ready.
    build_cooldowns: BTreeMap<RobotId, u32>,
    broadcasts: BroadcastBoard,
    memory: TeamMemoryBank,
    indicators: Vec<Indicator>,
    control_bits: BTreeMap<RobotId, u64>,
    round: u32,
    /// Splitmix64 state used for id sampling.
    seed: u64,
    #[serde(skip)]
    event_log: Vec<WorldEvent>,
}

impl World {
    /// Build a world from a scenario. Colliding initial ids are resampled.
    pub fn new(scenario: Scenario) -> Self {
        let Scenario {
            map,
            robots,
            trees,
            constants,
            seed,
            previous_memory: [mem_a, mem_b],
        } = scenario;
        let start = TeamEconomy {
            bullets: constants.bullets_initial_amount,
            victory_points: 0,
        };
        let mut world = Self {
            map,
            broadcasts: BroadcastBoard::new(constants.broadcast_max_channels),
            memory: TeamMemoryBank::with_previous(constants.team_memory_length, mem_a, mem_b),
            constants,
            robots: BTreeMap::new(),
            trees: BTreeMap::new(),
            bullets: BTreeMap::new(),
            economy: [start, start],
            starting_archons: [Vec::new(), Vec::new()],
            build_cooldowns: BTreeMap::new(),
            indicators: Vec::new(),
            control_bits: BTreeMap::new(),
            round: 0,
            seed,
            event_log: Vec::new(),
        };
        for tree in trees {
            world.insert_tree(tree);
        }
        for robot in robots {
            if robot.kind == RobotType::Archon {
                if let Some(i) = slot(robot.team) {
                    world.starting_archons[i].push(robot.location);
                }
            }
            world.insert_robot(robot);
        }
        for locs in &mut world.starting_archons {
            locs.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        }
        world
    }

    pub fn bounds(&self) -> MapBounds {
        self.map.bounds
    }

    pub fn constants(&self) -> &GameConstants {
        &self.constants
    }

    /// Rounds completed so far.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn round_limit(&self) -> u32 {
        self.map.round_limit
    }

    pub fn is_over(&self) -> bool {
        self.round >= self.map.round_limit
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn robots(&self) -> &BTreeMap<RobotId, Robot> {
        &self.robots
    }

    pub fn trees(&self) -> &BTreeMap<TreeId, Tree> {
        &self.trees
    }

    pub fn bullets(&self) -> &BTreeMap<BulletId, Bullet> {
        &self.bullets
    }

    pub fn robot(&self, id: RobotId) -> Option<&Robot> {
        self.robots.get(&id)
    }

    pub fn tree(&self, id: TreeId) -> Option<&Tree> {
        self.trees.get(&id)
    }

    pub fn bullet(&self, id: BulletId) -> Option<&Bullet> {
        self.bullets.get(&id)
    }

    /// Bullet balance of a team. Neutral always holds 0.
    pub fn team_bullets(&self, team: Team) -> f64 {
        slot(team).map_or(0.0, |i| self.economy[i].bullets)
    }

    pub fn victory_points(&self, team: Team) -> u32 {
        slot(team).map_or(0, |i| self.economy[i].victory_points)
    }

    pub fn has_won(&self, team: Team) -> bool {
        team.is_player() && self.victory_points(team) >= self.constants.victory_points_to_win
    }

    /// Adjust a team's balance by a signed amount. No-op for Neutral.
    pub fn change_bullets(&mut self, team: Team, delta: f64) {
        if let Some(i) = slot(team) {
            self.economy[i].bullets += delta;
        }
    }

    /// Credit `floor(amount / exchange_rate)` victory points. The caller debits
    /// the bullets. Returns the points awarded.
    pub fn donate(&mut self, team: Team, amount: f64) -> u32 {
        let Some(i) = slot(team) else {
            return 0;
        };
        let points = (amount / self.constants.bullet_exchange_rate).floor().max(0.0) as u32;
        self.economy[i].victory_points += points;
        self.event_log.push(WorldEvent::Donated {
            team,
            bullets: amount,
            points,
        });
        points
    }

    /// Archon locations at match start, sorted by x then y.
    pub fn starting_archon_locations(&self, team: Team) -> &[MapLocation] {
        match slot(team) {
            Some(i) => &self.starting_archons[i],
            None => &[],
        }
    }

    pub fn build_cooldown(&self, id: RobotId) -> u32 {
        self.build_cooldowns.get(&id).copied().unwrap_or(0)
    }

    pub fn set_build_cooldown(&mut self, id: RobotId, rounds: u32) {
        self.build_cooldowns.insert(id, rounds);
    }

    pub fn broadcasts(&self) -> &BroadcastBoard {
        &self.broadcasts
    }

    pub fn broadcasts_mut(&mut self) -> &mut BroadcastBoard {
        &mut self.broadcasts
    }

    pub fn team_memory(&self) -> &TeamMemoryBank {
        &self.memory
    }

    pub fn team_memory_mut(&mut self) -> &mut TeamMemoryBank {
        &mut self.memory
    }

    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    pub fn add_indicator(&mut self, indicator: Indicator) {
        self.indicators.push(indicator);
    }

    pub fn control_bits(&self, id: RobotId) -> u64 {
        self.control_bits.get(&id).copied().unwrap_or(0)
    }

    pub fn set_control_bits(&mut self, id: RobotId, bits: u64) {
        self.control_bits.insert(id, bits);
    }

    pub fn team_robot_count(&self, team: Team) -> usize {
        self.robots.values().filter(|r| r.team == team).count()
    }

    pub fn team_tree_count(&self, team: Team) -> usize {
        self.trees.values().filter(|t| t.team == team).count()
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Add a robot under a fresh random id.
    pub fn spawn_robot(
        &mut self,
        kind: RobotType,
        team: Team,
        location: MapLocation,
        health: f32,
    ) -> RobotId {
        let id = self.fresh_robot_id();
        self.put_robot(Robot::new(id, team, kind, location, health));
        id
    }

    /// Add a robot keeping its id unless that id is already taken.
    pub fn insert_robot(&mut self, mut robot: Robot) -> RobotId {
        if robot.id.0 == 0 || self.robots.contains_key(&robot.id) {
            robot.id = self.fresh_robot_id();
        }
        self.put_robot(robot);
        robot.id
    }

    fn put_robot(&mut self, robot: Robot) {
        tracing::debug!(id = robot.id.0, kind = ?robot.kind, team = ?robot.team, "robot spawned");
        self.robots.insert(robot.id, robot);
        self.event_log.push(WorldEvent::RobotSpawned {
            id: robot.id,
            team: robot.team,
            kind: robot.kind,
            location: robot.location,
        });
    }

    /// Add a tree under a fresh random id.
    pub fn spawn_tree(
        &mut self,
        team: Team,
        location: MapLocation,
        radius: f32,
        health: f32,
        max_health: f32,
    ) -> TreeId {
        let id = self.fresh_tree_id();
        self.put_tree(Tree {
            id,
            team,
            location,
            radius,
            health,
            max_health,
            contained_bullets: 0.0,
            contained_robot: None,
        });
        id
    }

    /// Add a tree keeping its id unless that id is already taken.
    pub fn insert_tree(&mut self, mut tree: Tree) -> TreeId {
        if tree.id.0 == 0 || self.trees.contains_key(&tree.id) {
            tree.id = self.fresh_tree_id();
        }
        self.put_tree(tree);
        tree.id
    }

    fn put_tree(&mut self, tree: Tree) {
        tracing::debug!(id = tree.id.0, team = ?tree.team, "tree spawned");
        self.trees.insert(tree.id, tree);
        self.event_log.push(WorldEvent::TreeSpawned {
            id: tree.id,
            team: tree.team,
            location: tree.location,
        });
    }

    /// Store a new snapshot for an existing robot. Unknown ids are ignored.
    pub fn replace_robot(&mut self, robot: Robot) {
        if let Some(slot) = self.robots.get_mut(&robot.id) {
            *slot = robot;
        }
    }

    /// Store a new snapshot for an existing tree. Unknown ids are ignored.
    pub fn replace_tree(&mut self, tree: Tree) {
        if let Some(slot) = self.trees.get_mut(&tree.id) {
            *slot = tree;
        }
    }

    /// Relocate a robot and count the move.
    pub fn move_robot(&mut self, id: RobotId, to: MapLocation) -> bool {
        let Some(robot) = self.robots.get(&id).copied() else {
            return false;
        };
        self.robots.insert(id, robot.with_location(to).with_move());
        self.event_log.push(WorldEvent::RobotMoved {
            id,
            from: robot.location,
            to,
        });
        true
    }

    /// Remove a robot together with its cooldown and control bits.
    pub fn remove_robot(&mut self, id: RobotId) -> Option<Robot> {
        let robot = self.robots.remove(&id)?;
        self.build_cooldowns.remove(&id);
        self.control_bits.remove(&id);
        tracing::debug!(id = id.0, kind = ?robot.kind, "robot destroyed");
        self.event_log.push(WorldEvent::RobotDestroyed {
            id,
            team: robot.team,
            kind: robot.kind,
        });
        Some(robot)
    }

    pub fn remove_tree(&mut self, id: TreeId) -> Option<Tree> {
        let tree = self.trees.remove(&id)?;
        tracing::debug!(id = id.0, "tree destroyed");
        self.event_log.push(WorldEvent::TreeDestroyed {
            id,
            team: tree.team,
        });
        Some(tree)
    }

    /// Damage a body, removing it at zero health. Returns whether it was destroyed.
    ///
    /// A felled tree holding a robot releases it to `attacker` when that is a
    /// playing team.
    pub fn damage_body(&mut self, body: Body, amount: f32, attacker: Team) -> bool {
        match body {
            Body::Robot(id) => {
                let Some(robot) = self.robots.get(&id).copied() else {
                    return false;
                };
                match robot.damaged(amount) {
                    Some(hurt) => {
                        self.robots.insert(id, hurt);
                        false
                    }
                    None => {
                        self.remove_robot(id);
                        true
                    }
                }
            }
            Body::Tree(id) => {
                let Some(tree) = self.trees.get(&id).copied() else {
                    return false;
                };
                match tree.damaged(amount) {
                    Some(hurt) => {
                        self.trees.insert(id, hurt);
                        false
                    }
                    None => {
                        self.remove_tree(id);
                        if let (Some(kind), true) = (tree.contained_robot, attacker.is_player()) {
                            let fraction = self.constants.planted_unit_starting_health_fraction;
                            let health = kind.starting_health(fraction);
                            self.spawn_robot(kind, attacker, tree.location, health);
                        }
                        true
                    }
                }
            }
        }
    }

    /// Create a bullet and immediately resolve its first step.
    ///
    /// `exclude` is skipped during that first step so the firing robot cannot
    /// hit itself. Returns the id even if the bullet was consumed at once.
    pub fn spawn_bullet(
        &mut self,
        team: Team,
        location: MapLocation,
        heading: Direction,
        speed: f32,
        damage: f32,
        exclude: Option<Body>,
    ) -> BulletId {
        let id = self.fresh_bullet_id();
        let bullet = Bullet {
            id,
            team,
            location,
            heading,
            speed,
            damage,
        };
        self.event_log.push(WorldEvent::BulletFired {
            id,
            team,
            location,
            heading,
        });
        self.resolve_bullet_step(bullet, exclude);
        id
    }

    /// Find the nearest body the bullet meets this step, or advance it.
    fn resolve_bullet_step(&mut self, bullet: Bullet, exclude: Option<Body>) {
        self.bullets.remove(&bullet.id);
        let reach = geometry::hit_reach(bullet.heading, bullet.speed);
        let mut best: Option<(Body, f32)> = None;
        let mut consider = |body: Body, center: MapLocation, radius: f32| {
            if Some(body) == exclude {
                return;
            }
            let (from, heading, speed) = (bullet.location, bullet.heading, bullet.speed);
            let Some(d) = geometry::line_hits_circle(from, heading, speed, center, radius) else {
                return;
            };
            let mag = d.abs();
            if mag <= reach && best.is_none_or(|(_, m)| mag < m) {
                best = Some((body, mag));
            }
        };
        for r in self.robots.values() {
            consider(Body::Robot(r.id), r.location, r.radius());
        }
        for t in self.trees.values() {
            consider(Body::Tree(t.id), t.location, t.radius);
        }

        match best {
            Some((target, _)) => {
                tracing::debug!(bullet = bullet.id.0, ?target, "bullet hit");
                self.event_log.push(WorldEvent::BulletHit {
                    id: bullet.id,
                    target,
                });
                self.damage_body(target, bullet.damage, bullet.team);
            }
            None => {
                let next = bullet.advanced();
                if self.map.bounds.contains(next.location) {
                    self.bullets.insert(next.id, next);
                } else {
                    self.event_log.push(WorldEvent::BulletExpired { id: bullet.id });
                }
            }
        }
    }

    /// End the round: income, bullets, tree decay, broadcasts, cooldowns,
    /// indicators, round counter.
    pub fn advance_round(&mut self) {
        let _span = tracing::info_span!("advance_round", round = self.round + 1).entered();

        for team in Team::PLAYERS {
            let trees = self.team_tree_count(team) as f64;
            if let Some(i) = slot(team) {
                let e = &mut self.economy[i];
                e.bullets += self.constants.archon_bullet_income
                    - e.bullets * self.constants.bullet_income_unit_penalty
                    + trees;
            }
        }

        let ids: Vec<BulletId> = self.bullets.keys().copied().collect();
        for id in ids {
            if let Some(bullet) = self.bullets.get(&id).copied() {
                self.resolve_bullet_step(bullet, None);
            }
        }

        let decay = self.constants.bullet_tree_decay_rate;
        let owned: Vec<TreeId> = self
            .trees
            .values()
            .filter(|t| t.team.is_player())
            .map(|t| t.id)
            .collect();
        for id in owned {
            self.damage_body(Body::Tree(id), decay, Team::Neutral);
        }

        self.broadcasts.commit();
        for rounds in self.build_cooldowns.values_mut() {
            *rounds = rounds.saturating_sub(1);
        }
        self.indicators.clear();
        self.round += 1;
        self.event_log.push(WorldEvent::RoundAdvanced { round: self.round });
        tracing::debug!(
            round = self.round,
            bullets = self.bullets.len(),
            robots = self.robots.len(),
            "round advanced"
        );
    }

    fn fresh_robot_id(&mut self) -> RobotId {
        let max = self.constants.max_body_id;
        RobotId(sample_id(&mut self.seed, max, self.robots.len(), |id| {
            self.robots.contains_key(&RobotId(id))
        }))
    }

    fn fresh_tree_id(&mut self) -> TreeId {
        let max = self.constants.max_body_id;
        TreeId(sample_id(&mut self.seed, max, self.trees.len(), |id| {
            self.trees.contains_key(&TreeId(id))
        }))
    }

    fn fresh_bullet_id(&mut self) -> BulletId {
        let max = self.constants.max_bullet_id;
        BulletId(sample_id(&mut self.seed, max, self.bullets.len(), |id| {
            self.bullets.contains_key(&BulletId(id))
        }))
    }

    /// Deterministic hash of the world state, in canonical (BTreeMap) order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.round.to_le_bytes());
        mix(&mut h, &self.seed.to_le_bytes());
        for e in &self.economy {
            mix(&mut h, &e.bullets.to_le_bytes());
            mix(&mut h, &e.victory_points.to_le_bytes());
        }
        for (id, r) in &self.robots {
            mix(&mut h, &id.0.to_le_bytes());
            mix(&mut h, &r.location.x.to_le_bytes());
            mix(&mut h, &r.location.y.to_le_bytes());
            mix(&mut h, &r.health.to_le_bytes());
        }
        for (id, t) in &self.trees {
            mix(&mut h, &id.0.to_le_bytes());
            mix(&mut h, &t.health.to_le_bytes());
        }
        for (id, b) in &self.bullets {
            mix(&mut h, &id.0.to_le_bytes());
            mix(&mut h, &b.location.x.to_le_bytes());
            mix(&mut h, &b.location.y.to_le_bytes());
        }
        h
    }
}

/// Rejection-sample an id in `1..=max` that `taken` does not claim. The range grows
/// past `max` only when every id in it is live.
fn sample_id(seed: &mut u64, max: u32, live: usize, taken: impl Fn(u32) -> bool) -> u32 {
    let range = (max as u64).max(live as u64 + 1);
    loop {
        *seed = splitmix64(*seed);
        let id = (*seed % range) as u32 + 1;
        if !taken(id) {
            return id;
        }
    }
}

/// Splitmix64 step; advances the id sampler reproducibly across platforms.
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn map() -> MapSpec {
        MapSpec {
            bounds: MapBounds::new(Vec2::ZERO, 100.0, 100.0),
            round_limit: 3000,
        }
    }

    fn empty() -> World {
        World::new(Scenario::new(map()))
    }

    fn robot(id: u32, team: Team, kind: RobotType, x: f32, y: f32) -> Robot {
        Robot::new(RobotId(id), team, kind, Vec2::new(x, y), kind.max_health())
    }

    fn neutral_tree(id: u32, x: f32, y: f32, radius: f32, health: f32) -> Tree {
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
    }

    #[test]
    fn world_starts_with_initial_balance() {
        let w = empty();
        assert_eq!(w.round(), 0);
        assert_eq!(w.team_bullets(Team::A), 300.0);
        assert_eq!(w.team_bullets(Team::B), 300.0);
        assert_eq!(w.team_bullets(Team::Neutral), 0.0);
        assert_eq!(w.victory_points(Team::A), 0);
    }

    #[test]
    fn income_follows_balance_penalty() {
        let mut w = empty();
        w.advance_round();
        // 300 + (2 - 300 / 100)
        assert!((w.team_bullets(Team::A) - 299.0).abs() < 1e-9);
    }

    #[test]
    fn income_adds_one_per_owned_tree() {
        let mut s = Scenario::new(map());
        s.trees.push(Tree {
            team: Team::A,
            ..neutral_tree(1, 50.0, 50.0, 1.0, 50.0)
        });
        s.trees.push(neutral_tree(2, 10.0, 10.0, 1.0, 50.0));
        let mut w = World::new(s);
        w.advance_round();
        assert!((w.team_bullets(Team::A) - 300.0).abs() < 1e-9);
        assert!((w.team_bullets(Team::B) - 299.0).abs() < 1e-9);
    }

    #[test]
    fn empty_rounds_only_touch_balances_and_cooldowns() {
        let mut w = empty();
        w.set_build_cooldown(RobotId(7), 2);
        for _ in 0..5 {
            w.advance_round();
        }
        assert_eq!(w.round(), 5);
        assert!(w.robots().is_empty());
        assert!(w.trees().is_empty());
        assert!(w.bullets().is_empty());
        assert_eq!(w.build_cooldown(RobotId(7)), 0);
    }

    #[test]
    fn colliding_initial_ids_are_resampled() {
        let mut s = Scenario::new(map());
        s.robots.push(robot(5, Team::A, RobotType::Archon, 10.0, 10.0));
        s.robots.push(robot(5, Team::B, RobotType::Archon, 90.0, 90.0));
        let w = World::new(s);
        assert_eq!(w.robots().len(), 2);
        assert!(w.robot(RobotId(5)).is_some());
    }

    #[test]
    fn starting_archons_are_sorted() {
        let mut s = Scenario::new(map());
        s.robots.push(robot(1, Team::A, RobotType::Archon, 30.0, 5.0));
        s.robots.push(robot(2, Team::A, RobotType::Archon, 10.0, 8.0));
        s.robots.push(robot(3, Team::A, RobotType::Gardener, 1.0, 1.0));
        let w = World::new(s);
        assert_eq!(
            w.starting_archon_locations(Team::A),
            &[Vec2::new(10.0, 8.0), Vec2::new(30.0, 5.0)]
        );
        assert!(w.starting_archon_locations(Team::B).is_empty());
    }

    #[test]
    fn bullet_hits_nearest_body() {
        let mut s = Scenario::new(map());
        // Horizontal heading: only the x offset to each body matters.
        s.robots.push(robot(1, Team::B, RobotType::Soldier, 11.0, 10.0));
        s.robots.push(robot(2, Team::B, RobotType::Soldier, 10.5, 14.0));
        let mut w = World::new(s);
        w.spawn_bullet(Team::A, Vec2::new(10.0, 10.0), Direction::EAST, 2.0, 2.0, None);
        assert!(w.bullets().is_empty());
        assert_eq!(w.robot(RobotId(1)).map(|r| r.health), Some(48.0));
        assert_eq!(w.robot(RobotId(2)).map(|r| r.health), Some(50.0));
    }

    #[test]
    fn equal_displacement_goes_to_first_enumerated_body() {
        let mut s = Scenario::new(map());
        // Same x offset and radius: the quadratic gives identical displacements.
        s.robots.push(robot(9, Team::B, RobotType::Soldier, 11.0, 10.0));
        s.robots.push(robot(3, Team::B, RobotType::Soldier, 11.0, 60.0));
        s.trees.push(neutral_tree(1, 11.0, 80.0, 1.0, 40.0));
        let mut w = World::new(s);
        w.spawn_bullet(Team::A, Vec2::new(10.0, 10.0), Direction::EAST, 2.0, 2.0, None);
        assert_eq!(w.robot(RobotId(3)).map(|r| r.health), Some(48.0));
        assert_eq!(w.robot(RobotId(9)).map(|r| r.health), Some(50.0));
        assert_eq!(w.tree(TreeId(1)).map(|t| t.health), Some(40.0));
    }

    #[test]
    fn robots_win_ties_against_trees() {
        let mut s = Scenario::new(map());
        s.trees.push(neutral_tree(1, 11.0, 10.0, 1.0, 40.0));
        s.robots.push(robot(7, Team::B, RobotType::Soldier, 11.0, 60.0));
        let mut w = World::new(s);
        w.spawn_bullet(Team::A, Vec2::new(10.0, 10.0), Direction::EAST, 2.0, 2.0, None);
        assert_eq!(w.robot(RobotId(7)).map(|r| r.health), Some(48.0));
        assert_eq!(w.tree(TreeId(1)).map(|t| t.health), Some(40.0));
    }

    #[test]
    fn bullet_out_of_reach_keeps_flying() {
        let mut s = Scenario::new(map());
        s.robots.push(robot(1, Team::B, RobotType::Soldier, 30.0, 10.0));
        let mut w = World::new(s);
        let id = w.spawn_bullet(Team::A, Vec2::new(10.0, 10.0), Direction::EAST, 2.0, 2.0, None);
        let b = w.bullet(id).copied().expect("in flight");
        assert!((b.location.x - 12.0).abs() < 1e-5);
        assert_eq!(w.robot(RobotId(1)).map(|r| r.health), Some(50.0));
    }

    #[test]
    fn firing_robot_is_excluded_on_first_step() {
        let mut s = Scenario::new(map());
        s.robots.push(robot(1, Team::A, RobotType::Tank, 10.0, 10.0));
        let mut w = World::new(s);
        let id = w.spawn_bullet(
            Team::A,
            Vec2::new(11.5, 10.0),
            Direction::EAST,
            2.0,
            2.0,
            Some(Body::Robot(RobotId(1))),
        );
        assert!(w.bullet(id).is_some());
        assert_eq!(w.robot(RobotId(1)).map(|r| r.health), Some(100.0));
    }

    #[test]
    fn bullets_leaving_the_map_expire() {
        let mut w = empty();
        let id = w.spawn_bullet(Team::A, Vec2::new(99.0, 50.0), Direction::EAST, 2.0, 1.0, None);
        assert!(w.bullet(id).is_none());
        assert!(w
            .events()
            .iter()
            .any(|e| matches!(e, WorldEvent::BulletExpired { id: b } if *b == id)));
    }

    #[test]
    fn lethal_hit_removes_robot_and_cooldown() {
        let mut s = Scenario::new(map());
        s.robots.push(Robot {
            health: 1.0,
            ..robot(1, Team::B, RobotType::Gardener, 11.0, 10.0)
        });
        let mut w = World::new(s);
        w.set_build_cooldown(RobotId(1), 5);
        w.spawn_bullet(Team::A, Vec2::new(10.0, 10.0), Direction::EAST, 2.0, 2.0, None);
        assert!(w.robot(RobotId(1)).is_none());
        assert_eq!(w.build_cooldown(RobotId(1)), 0);
    }

    #[test]
    fn felled_tree_releases_robot_to_attacker() {
        let mut s = Scenario::new(map());
        s.trees.push(Tree {
            contained_robot: Some(RobotType::Scout),
            ..neutral_tree(3, 11.0, 10.0, 1.0, 1.0)
        });
        let mut w = World::new(s);
        w.spawn_bullet(Team::B, Vec2::new(10.0, 10.0), Direction::EAST, 2.0, 2.0, None);
        assert!(w.tree(TreeId(3)).is_none());
        let released: Vec<_> = w.robots().values().collect();
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].team, Team::B);
        assert_eq!(released[0].kind, RobotType::Scout);
        assert!((released[0].health - 4.0).abs() < 1e-5);
    }

    #[test]
    fn only_owned_trees_decay() {
        let mut s = Scenario::new(map());
        s.trees.push(Tree {
            team: Team::A,
            ..neutral_tree(1, 50.0, 50.0, 1.0, 0.5)
        });
        s.trees.push(neutral_tree(2, 10.0, 10.0, 1.0, 0.5));
        let mut w = World::new(s);
        w.advance_round();
        assert!(w.tree(TreeId(1)).is_none());
        assert!(w.tree(TreeId(2)).is_some());
    }

    #[test]
    fn broadcasts_commit_on_advance() {
        let mut w = empty();
        w.broadcasts_mut().write(Team::A, 10, 77);
        assert_eq!(w.broadcasts().read(Team::A, 10), 0);
        w.advance_round();
        assert_eq!(w.broadcasts().read(Team::A, 10), 77);
    }

    #[test]
    fn indicators_clear_each_round() {
        let mut w = empty();
        w.add_indicator(Indicator::Dot {
            robot: RobotId(1),
            location: Vec2::new(1.0, 1.0),
            color: Rgb::new(255, 0, 0),
        });
        assert_eq!(w.indicators().len(), 1);
        w.advance_round();
        assert!(w.indicators().is_empty());
    }

    #[test]
    fn donation_awards_floor_points() {
        let mut w = empty();
        assert_eq!(w.donate(Team::A, 95.0), 9);
        assert_eq!(w.victory_points(Team::A), 9);
        assert_eq!(w.donate(Team::Neutral, 100.0), 0);
    }

    #[test]
    fn id_range_grows_only_when_full() {
        let mut seed = 11;
        for _ in 0..20 {
            assert_eq!(sample_id(&mut seed, 4, 3, |id| id != 2), 2);
        }
        assert_eq!(sample_id(&mut seed, 4, 4, |id| id <= 4), 5);
    }

    #[test]
    fn bullet_ids_stay_in_range() {
        let mut w = empty();
        for i in 0..50 {
            let id = w.spawn_bullet(
                Team::A,
                Vec2::new(50.0, i as f32),
                Direction::WEST,
                0.5,
                1.0,
                None,
            );
            assert!(id.0 >= 1 && id.0 <= 32_000);
        }
        assert_eq!(w.bullets().len(), 50);
    }

    #[test]
    fn state_hash_deterministic() {
        let build = || {
            let mut s = Scenario::new(map());
            s.seed = 42;
            s.robots.push(robot(1, Team::A, RobotType::Soldier, 20.0, 20.0));
            let mut w = World::new(s);
            w.spawn_bullet(Team::B, Vec2::new(10.0, 20.0), Direction::EAST, 2.0, 2.0, None);
            for _ in 0..10 {
                w.advance_round();
            }
            w
        };
        assert_eq!(build().state_hash(), build().state_hash());
    }

    #[test]
    fn drain_events_clears_log() {
        let mut w = empty();
        w.spawn_robot(RobotType::Scout, Team::A, Vec2::new(5.0, 5.0), 20.0);
        let events = w.drain_events();
        assert_eq!(events.len(), 1);
        assert!(w.events().is_empty());
    }
}
