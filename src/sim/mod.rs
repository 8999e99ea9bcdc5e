//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One movement step per tick, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{attract, bounce_facing, clamp_to_field, touches, within_box, within_radius};
pub use level::{generate_obstacles, generate_parcels, random_position};
pub use snapshot::Snapshot;
pub use state::{
    Direction, GameState, GameStatus, Obstacle, ObstacleKind, Parcel, Player, Position, World,
};
pub use tick::{GameEvent, TickResult, steer, tick};
