//! Postman Panic - An auto-walking parcel delivery arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collection, delivery, hits)
//! - `scheduler`: Millisecond clock with interval and one-shot tasks
//! - `session`: Single owner of a running game, drives the sim from timers
//! - `input`: Keyboard and on-screen button mapping
//! - `config`: Data-driven game balance and ruleset presets
//! - `audio`: Fire-and-forget sound cues

pub mod audio;
pub mod config;
pub mod input;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod sim;

pub use config::{ConfigError, Ruleset, Tuning};
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Movement tick period (ms). ~60 Hz.
    pub const TICK_PERIOD_MS: u64 = 16;
    /// How long a hit keeps the player invulnerable (ms)
    pub const INVULNERABLE_MS: u64 = 1000;
    /// Cap on elapsed time fed to the session per frame (ms), avoids a
    /// tick avalanche after the tab was hidden
    pub const MAX_FRAME_MS: f64 = 250.0;

    /// Field dimensions
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 350.0;
    /// Distance from every edge that random spawns keep clear of
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Player
    pub const PLAYER_SPEED: f32 = 3.0;
    pub const PLAYER_START: (f32, f32) = (50.0, 50.0);
    pub const STARTING_LIVES: u32 = 3;

    /// Post office (delivery point)
    pub const POST_OFFICE: (f32, f32) = (350.0, 300.0);

    /// Parcel pickup and magnet
    pub const COLLECTION_RADIUS: f32 = 25.0;
    pub const ATTRACTION_RADIUS: f32 = 80.0;
    pub const ATTRACTION_STRENGTH: f32 = 0.1;

    /// Half-extent of the obstacle hit box
    pub const OBSTACLE_BOX: f32 = 30.0;

    /// Entities per level
    pub const PARCELS_PER_LEVEL: u32 = 3;
    pub const OBSTACLES_PER_LEVEL: u32 = 3;

    /// Scoring
    pub const PARCEL_BONUS: u32 = 100;
    pub const DELIVERY_BONUS: u32 = 500;
}
