//! Proximity tests and field bounds
//!
//! Nothing here is physics: pickups and delivery use a distance (or box)
//! threshold, obstacles use an axis-aligned box, and the magnet is a fixed
//! fraction of the offset per tick.

use glam::Vec2;

use super::state::{Direction, Position};
use crate::config::HitShape;

/// Euclidean distance strictly below `radius`
#[inline]
pub fn within_radius(a: Position, b: Position, radius: f32) -> bool {
    a.distance(b) < radius
}

/// Both axis offsets strictly below `half_extent`
#[inline]
pub fn within_box(a: Position, b: Position, half_extent: f32) -> bool {
    (a.x - b.x).abs() < half_extent && (a.y - b.y).abs() < half_extent
}

/// Pickup/delivery contact test for the configured shape
#[inline]
pub fn touches(shape: HitShape, a: Position, b: Position, reach: f32) -> bool {
    match shape {
        HitShape::Circle => within_radius(a, b, reach),
        HitShape::Box => within_box(a, b, reach),
    }
}

/// Move `item` toward `target` by `strength` of the offset between them
#[inline]
pub fn attract(item: Position, target: Position, strength: f32) -> Position {
    item + (target - item) * strength
}

/// Clamp to `[0, width] x [0, height]`
#[inline]
pub fn clamp_to_field(pos: Position, width: f32, height: f32) -> Position {
    pos.clamp(Vec2::ZERO, Vec2::new(width, height))
}

/// Facing after touching the field edge at `pos`
///
/// Each edge points the postman back into the field. Checks run left, right,
/// top, bottom; in a corner the vertical edge wins.
pub fn bounce_facing(pos: Position, facing: Direction, width: f32, height: f32) -> Direction {
    let mut facing = facing;
    if pos.x <= 0.0 {
        facing = Direction::Right;
    }
    if pos.x >= width {
        facing = Direction::Left;
    }
    if pos.y <= 0.0 {
        facing = Direction::Down;
    }
    if pos.y >= height {
        facing = Direction::Up;
    }
    facing
}
