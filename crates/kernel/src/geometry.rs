//! Stateless plane geometry used by bullet resolution, move legality and sensing.
//!
//! The hit and blocking tests use the slope `M` of the travel vector and only the
//! horizontal offset `B` between the mover and a body: a body blocks or is hit when
//! `(M² + 1)·R² ≥ B²`. This does not tell a body ahead of the mover from one behind
//! it. Headings with no horizontal component have no slope; they are handled as a
//! vertical line `x = origin.x`, where the test reduces to `B² ≤ R²`.

use arbor_common::{Direction, MapLocation};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Relative size of the horizontal component below which a travel vector is
/// treated as vertical.
const VERTICAL_EPSILON: f64 = 1e-6;

/// Axis-aligned extent of the playable map. `origin` is inclusive, the far
/// edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub origin: MapLocation,
    pub width: f32,
    pub height: f32,
}

impl MapBounds {
    pub fn new(origin: MapLocation, width: f32, height: f32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// `origin.x <= x < origin.x + width`, same for y.
    pub fn contains(&self, loc: MapLocation) -> bool {
        loc.x >= self.origin.x
            && loc.x < self.origin.x + self.width
            && loc.y >= self.origin.y
            && loc.y < self.origin.y + self.height
    }

    /// Whether all four cardinal extreme points of the circle lie on the map.
    pub fn contains_circle(&self, center: MapLocation, radius: f32) -> bool {
        extreme_points(center, radius)
            .iter()
            .all(|p| self.contains(*p))
    }
}

/// The four cardinal extreme points of a circle: top, right, bottom, left.
pub fn extreme_points(center: MapLocation, radius: f32) -> [MapLocation; 4] {
    [
        Vec2::new(center.x, center.y - radius),
        Vec2::new(center.x + radius, center.y),
        Vec2::new(center.x, center.y + radius),
        Vec2::new(center.x - radius, center.y),
    ]
}

/// Whether every extreme point of the circle is within `range` of `observer`.
pub fn circle_fully_within(
    center: MapLocation,
    radius: f32,
    observer: MapLocation,
    range: f32,
) -> bool {
    extreme_points(center, radius)
        .iter()
        .all(|p| p.distance(observer) <= range)
}

/// Whether at least one extreme point of the circle is within `range` of `observer`.
pub fn circle_partially_within(
    center: MapLocation,
    radius: f32,
    observer: MapLocation,
    range: f32,
) -> bool {
    extreme_points(center, radius)
        .iter()
        .any(|p| p.distance(observer) <= range)
}

/// Strict overlap of two circles. Touching circles do not overlap.
pub fn circles_overlap(a: MapLocation, ra: f32, b: MapLocation, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

fn is_vertical(dx: f64, dy: f64) -> bool {
    let len = (dx * dx + dy * dy).sqrt();
    dx.abs() <= VERTICAL_EPSILON * len.max(1.0)
}

/// Tests whether a bullet travelling from `origin` along `heading` at `speed`
/// meets the circle at `center` with `radius`.
///
/// Returns the displacement from the bullet's current position to the nearer
/// intersection. For sloped headings this is an x offset, for vertical headings
/// a y offset; it is not an arc length. On equal magnitude the first root wins.
pub fn line_hits_circle(
    origin: MapLocation,
    heading: Direction,
    speed: f32,
    center: MapLocation,
    radius: f32,
) -> Option<f32> {
    let dx = heading.delta_x(speed) as f64;
    let dy = heading.delta_y(speed) as f64;
    let r = radius as f64;
    let b = (origin.x - center.x) as f64;

    if is_vertical(dx, dy) {
        if b * b > r * r {
            return None;
        }
        let half = (r * r - b * b).sqrt();
        let rel = (center.y - origin.y) as f64;
        let (y1, y2) = (rel - half, rel + half);
        let near = if y2.abs() < y1.abs() { y2 } else { y1 };
        return Some(near as f32);
    }

    let m = dy / dx;
    let k = m * m + 1.0;
    let lhs = k * r * r;
    let rhs = b * b;
    if lhs < rhs {
        return None;
    }
    let disc = (4.0 * (lhs - rhs)).sqrt() / (-2.0 * k);
    let base = (b * m) / k;
    let x1 = base + disc;
    let x2 = base - disc;
    let near = if x2.abs() < x1.abs() { x2 } else { x1 };
    Some(near as f32)
}

/// Largest hit displacement a bullet can cover in one step, measured along the
/// same axis [`line_hits_circle`] reports on.
pub fn hit_reach(heading: Direction, speed: f32) -> f32 {
    let dx = heading.delta_x(speed) as f64;
    let dy = heading.delta_y(speed) as f64;
    if is_vertical(dx, dy) {
        dy.abs() as f32
    } else {
        dx.abs() as f32
    }
}

/// Whether any obstacle `(center, radius)` blocks the straight displacement
/// `delta` from `origin`.
///
/// Conservative: an obstacle behind the mover blocks just like one ahead.
pub fn segment_blocked<I>(origin: MapLocation, delta: Vec2, obstacles: I) -> bool
where
    I: IntoIterator<Item = (MapLocation, f32)>,
{
    let dx = delta.x as f64;
    let dy = delta.y as f64;
    let vertical = is_vertical(dx, dy);
    let k = if vertical {
        1.0
    } else {
        let m = dy / dx;
        m * m + 1.0
    };
    obstacles.into_iter().any(|(center, radius)| {
        let r = radius as f64;
        let b = (origin.x - center.x) as f64;
        k * r * r >= b * b
    })
}
