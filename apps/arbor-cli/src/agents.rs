//! Scripted agents for the demo match. Each robot type gets one small
//! routine that only talks to the world through its [`Gateway`].

use arbor_common::{Direction, MapLocation, RobotType, Team};
use arbor_gateway::{Gateway, GameResult, NearbyQuery, Shot};
use glam::Vec2;

/// Channels 0..2 hold the last enemy sighting as `x, y` in whole units.
const SIGHTING_X: usize = 0;
const SIGHTING_Y: usize = 1;

/// Team memory cell holding the last round this team played.
const MEMORY_LAST_ROUND: usize = 0;

/// Run the routine for whatever robot `gw` is bound to.
pub fn play(gw: &mut Gateway<'_>, round: u32) -> GameResult<()> {
    match gw.kind() {
        RobotType::Archon => archon(gw, round),
        RobotType::Gardener => gardener(gw, round),
        RobotType::Lumberjack => lumberjack(gw, round),
        RobotType::Soldier | RobotType::Tank => shooter(gw, round),
        RobotType::Scout => scout(gw, round),
    }
}

/// Eight headings starting from a per-robot, per-round offset.
fn compass(gw: &mut Gateway<'_>, round: u32) -> [Direction; 8] {
    let start = ((gw.id().0 * 37 + round * 53) % 360) as f32;
    std::array::from_fn(|i| Direction::from_degrees(start + 45.0 * i as f32))
}

fn wander(gw: &mut Gateway<'_>, round: u32) -> GameResult<()> {
    for dir in compass(gw, round) {
        if gw.can_move(dir) {
            return gw.move_to(dir);
        }
    }
    Ok(())
}

fn approach(gw: &mut Gateway<'_>, target: MapLocation, round: u32) -> GameResult<()> {
    if gw.can_move(target) {
        return gw.move_to(target);
    }
    wander(gw, round)
}

fn last_sighting(gw: &mut Gateway<'_>) -> GameResult<Option<MapLocation>> {
    let x = gw.read_broadcast(SIGHTING_X)?;
    let y = gw.read_broadcast(SIGHTING_Y)?;
    Ok((x != 0 || y != 0).then(|| Vec2::new(x as f32, y as f32)))
}

fn report_sighting(gw: &mut Gateway<'_>, at: MapLocation) -> GameResult<()> {
    gw.broadcast(SIGHTING_X, at.x.round() as i32)?;
    gw.broadcast(SIGHTING_Y, at.y.round() as i32)
}

fn archon(gw: &mut Gateway<'_>, round: u32) -> GameResult<()> {
    let team = gw.team();
    let gardeners = gw
        .sense_nearby_robots(NearbyQuery::all().of_team(team))
        .iter()
        .filter(|r| r.kind == RobotType::Gardener)
        .count();
    if gardeners < 2 {
        for dir in compass(gw, round) {
            if gw.can_hire_gardener(dir) {
                gw.hire_gardener(dir)?;
                break;
            }
        }
    }

    let bullets = gw.team_bullets();
    if bullets > 500.0 {
        gw.donate(((bullets - 400.0) / 10.0).floor() * 10.0)?;
    }
    if round == 0 && gw.team_memory().get(MEMORY_LAST_ROUND).is_some_and(|r| *r > 0) {
        tracing::debug!(?team, "resuming a series");
    }
    gw.set_team_memory(MEMORY_LAST_ROUND, i64::from(round));
    wander(gw, round)
}

fn gardener(gw: &mut Gateway<'_>, round: u32) -> GameResult<()> {
    let team = gw.team();
    let mut own = gw.sense_nearby_trees(NearbyQuery::within(3.0).of_team(team));
    own.sort_by(|a, b| a.health.total_cmp(&b.health));
    if gw.can_water() {
        if let Some(t) = own.iter().find(|t| t.health < t.max_health) {
            if gw.can_water_tree(t.id) {
                gw.water(t.id)?;
            }
        }
    }

    if !gw.is_build_ready() {
        return Ok(());
    }
    let kind = match round % 4 {
        0 => RobotType::Lumberjack,
        1 => RobotType::Scout,
        _ => RobotType::Soldier,
    };
    let wants_tree = own.len() < 3 && gw.tree_count() < 8;
    for dir in compass(gw, round) {
        if wants_tree && gw.can_plant_tree(dir) {
            gw.plant_tree(dir)?;
            return Ok(());
        }
        if gw.can_build_robot(kind, dir) {
            gw.build_robot(kind, dir)?;
            return Ok(());
        }
    }
    Ok(())
}

fn lumberjack(gw: &mut Gateway<'_>, round: u32) -> GameResult<()> {
    let team = gw.team();
    let enemies = gw.sense_nearby_robots(NearbyQuery::within(3.0).of_team(team.opponent()));
    if !enemies.is_empty() && gw.can_strike() {
        return gw.strike();
    }

    let trees = gw.sense_nearby_trees(NearbyQuery::all());
    let me = gw.location();
    let target = trees
        .iter()
        .filter(|t| t.team != team)
        .min_by(|a, b| a.location.distance(me).total_cmp(&b.location.distance(me)));
    match target {
        Some(t) if gw.can_chop(t.id) => gw.chop(t.id),
        Some(t) => approach(gw, t.location, round),
        None => wander(gw, round),
    }
}

fn shooter(gw: &mut Gateway<'_>, round: u32) -> GameResult<()> {
    let team = gw.team();
    let me = gw.location();
    let enemies = gw.sense_nearby_robots(NearbyQuery::all().of_team(team.opponent()));
    let nearest = enemies
        .iter()
        .min_by(|a, b| a.location.distance(me).total_cmp(&b.location.distance(me)));

    if let Some(enemy) = nearest {
        report_sighting(gw, enemy.location)?;
        let dir = Direction::between(me, enemy.location);
        let shot = if gw.can_fire_pentad_shot() {
            Shot::Pentad
        } else if gw.can_fire_triad_shot() {
            Shot::Triad
        } else {
            Shot::Single
        };
        if gw.can_fire(shot) {
            gw.fire(shot, dir)?;
        }
        return Ok(());
    }

    match last_sighting(gw)? {
        Some(at) => approach(gw, at, round),
        None => {
            let home = gw.initial_archon_locations(team.opponent());
            match home.first() {
                Some(at) => approach(gw, *at, round),
                None => wander(gw, round),
            }
        }
    }
}

fn scout(gw: &mut Gateway<'_>, round: u32) -> GameResult<()> {
    let trees = gw.sense_nearby_trees(NearbyQuery::all().of_team(Team::Neutral));
    if let Some(t) = trees.iter().find(|t| t.contained_bullets > 0.0) {
        if gw.can_shake_tree(t.id) {
            return gw.shake(t.id);
        }
        if gw.can_shake() {
            return approach(gw, t.location, round);
        }
    }
    shooter(gw, round)
}
