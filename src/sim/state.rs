//! Game state and core simulation types
//!
//! A [`World`] is everything one session mutates. It is owned by exactly one
//! driver and handed to the tick and input functions by `&mut`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level;
use crate::config::Tuning;

/// Field-space coordinates. Y grows downward, like the screen.
pub type Position = Vec2;

/// Cardinal direction the postman auto-walks toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step in field space
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Waiting for the start button
    #[default]
    Idle,
    /// Movement ticks are running
    Playing,
    /// Modelled but never entered
    Paused,
    /// Lives exhausted, waiting for restart
    GameOver,
}

/// Score, lives, level, status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    pub status: GameStatus,
}

impl GameState {
    pub fn new(lives: u32) -> Self {
        Self {
            score: 0,
            lives,
            level: 1,
            status: GameStatus::Idle,
        }
    }
}

/// The postman
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Position,
    pub facing: Direction,
    /// Set by an obstacle hit, cleared by a timer
    pub invulnerable: bool,
}

impl Player {
    pub fn new(pos: Position) -> Self {
        Self {
            pos,
            facing: Direction::default(),
            invulnerable: false,
        }
    }
}

/// A parcel waiting to be picked up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    pub id: u32,
    pub pos: Position,
    pub collected: bool,
}

impl Parcel {
    /// Mark collected. Returns false if it already was.
    pub fn collect(&mut self) -> bool {
        let newly = !self.collected;
        self.collected = true;
        newly
    }
}

/// Obstacle look. All kinds hit the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Cone,
    Pothole,
    Vehicle,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [
        ObstacleKind::Cone,
        ObstacleKind::Pothole,
        ObstacleKind::Vehicle,
    ];
}

/// Something that costs a life on contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Position,
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct World {
    /// Balance knobs, fixed for the session
    pub tuning: Tuning,
    /// Seed the level RNG started from
    pub seed: u64,
    rng: Pcg32,
    pub state: GameState,
    pub player: Player,
    /// Current level's parcels (sorted by id)
    pub parcels: Vec<Parcel>,
    /// Current level's obstacles (sorted by id)
    pub obstacles: Vec<Obstacle>,
    /// Movement ticks run since the session began
    pub time_ticks: u64,
}

impl World {
    /// Fresh idle world with the first level laid out
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut world = Self {
            state: GameState::new(tuning.starting_lives),
            player: Player::new(tuning.player_start),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            parcels: Vec::new(),
            obstacles: Vec::new(),
            time_ticks: 0,
            tuning,
        };
        world.reset_level();
        world
    }

    /// Derived: every parcel of the level has been picked up
    pub fn all_parcels_collected(&self) -> bool {
        self.parcels.iter().all(|p| p.collected)
    }

    pub fn remaining_parcels(&self) -> usize {
        self.parcels.iter().filter(|p| !p.collected).count()
    }

    pub fn post_office(&self) -> Position {
        self.tuning.post_office
    }

    /// Idle -> Playing. Returns false from any other status.
    pub fn start(&mut self) -> bool {
        if self.state.status != GameStatus::Idle {
            return false;
        }
        self.state.status = GameStatus::Playing;
        log::info!("Game started (seed {})", self.seed);
        true
    }

    /// GameOver -> Playing with score, lives and level reset and a fresh
    /// layout. Returns false from any other status.
    pub fn restart(&mut self) -> bool {
        if self.state.status != GameStatus::GameOver {
            return false;
        }
        self.state = GameState {
            status: GameStatus::Playing,
            ..GameState::new(self.tuning.starting_lives)
        };
        self.reset_level();
        log::info!("Game restarted");
        true
    }

    /// Replace parcels and obstacles with fresh random ones and send the
    /// postman back to the start. Facing and invulnerability carry over.
    pub fn reset_level(&mut self) {
        self.parcels = level::generate_parcels(&mut self.rng, &self.tuning);
        self.obstacles = level::generate_obstacles(&mut self.rng, &self.tuning);
        self.player.pos = self.tuning.player_start;
        log::debug!(
            "Level {} laid out: {} parcels, {} obstacles",
            self.state.level,
            self.parcels.len(),
            self.obstacles.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_is_idle() {
        let world = World::new(Tuning::default(), 7);
        assert_eq!(world.state, GameState::new(3));
        assert_eq!(world.player.pos, Vec2::new(50.0, 50.0));
        assert_eq!(world.player.facing, Direction::Right);
        assert_eq!(world.parcels.len(), 3);
        assert_eq!(world.obstacles.len(), 3);
        assert!(!world.all_parcels_collected());
    }

    #[test]
    fn test_start_only_from_idle() {
        let mut world = World::new(Tuning::default(), 7);
        assert!(!world.restart());
        assert!(world.start());
        assert_eq!(world.state.status, GameStatus::Playing);
        assert!(!world.start());
    }

    #[test]
    fn test_restart_resets_counters() {
        let mut world = World::new(Tuning::default(), 7);
        world.state = GameState {
            score: 1200,
            lives: 0,
            level: 4,
            status: GameStatus::GameOver,
        };
        let old_parcels = world.parcels.clone();
        world.player.pos = Vec2::new(200.0, 200.0);

        assert!(world.restart());
        assert_eq!(
            world.state,
            GameState {
                score: 0,
                lives: 3,
                level: 1,
                status: GameStatus::Playing,
            }
        );
        assert_eq!(world.player.pos, Vec2::new(50.0, 50.0));
        assert_ne!(world.parcels, old_parcels);
    }

    #[test]
    fn test_all_collected_is_and_of_flags() {
        let mut world = World::new(Tuning::default(), 1);
        for i in 0..world.parcels.len() {
            assert!(!world.all_parcels_collected());
            assert!(world.parcels[i].collect());
        }
        assert!(world.all_parcels_collected());
        assert_eq!(world.remaining_parcels(), 0);
        assert!(!world.parcels[0].collect());
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = World::new(Tuning::default(), 4242);
        let b = World::new(Tuning::default(), 4242);
        assert_eq!(a.parcels, b.parcels);
        assert_eq!(a.obstacles, b.obstacles);
    }

    #[test]
    fn test_direction_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.unit() + dir.opposite().unit(), Vec2::ZERO);
        }
    }
}
