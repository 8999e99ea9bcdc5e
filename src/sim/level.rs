//! Level layout
//!
//! Parcels and obstacles land on whole-unit coordinates inside the spawn
//! margin. All randomness flows through the world's seeded RNG.

use glam::Vec2;
use rand::Rng;

use super::state::{Obstacle, ObstacleKind, Parcel, Position};
use crate::config::Tuning;

/// Random whole-unit position at least `spawn_margin` from every edge
pub fn random_position<R: Rng>(rng: &mut R, tuning: &Tuning) -> Position {
    let margin = tuning.spawn_margin;
    let span_x = tuning.field_width - 2.0 * margin;
    let span_y = tuning.field_height - 2.0 * margin;
    Vec2::new(
        (rng.random::<f32>() * span_x).floor() + margin,
        (rng.random::<f32>() * span_y).floor() + margin,
    )
}

/// A level's parcels, ids starting at 1
pub fn generate_parcels<R: Rng>(rng: &mut R, tuning: &Tuning) -> Vec<Parcel> {
    (1..=tuning.parcels_per_level)
        .map(|id| Parcel {
            id,
            pos: random_position(rng, tuning),
            collected: false,
        })
        .collect()
}

/// A level's obstacles, ids starting at 1, kinds cycling cone, pothole, vehicle
pub fn generate_obstacles<R: Rng>(rng: &mut R, tuning: &Tuning) -> Vec<Obstacle> {
    (1..=tuning.obstacles_per_level)
        .map(|id| Obstacle {
            id,
            kind: ObstacleKind::ALL[(id as usize - 1) % ObstacleKind::ALL.len()],
            pos: random_position(rng, tuning),
        })
        .collect()
}
