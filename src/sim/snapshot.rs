//! Read-only view for the renderer and HUD

use glam::Vec2;
use serde::Serialize;

use super::collision::within_radius;
use super::state::{GameState, GameStatus, Obstacle, Parcel, Player, Position, World};

/// Everything a frame needs, captured after a mutation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub state: GameState,
    pub player: Player,
    pub parcels: Vec<Parcel>,
    pub obstacles: Vec<Obstacle>,
    pub post_office: Position,
    /// Field width and height
    pub field: Vec2,
    pub remaining_parcels: usize,
    pub all_collected: bool,
    /// Uncollected parcels inside magnet range (pulse indicator)
    pub nearby_parcels: Vec<u32>,
    /// Instruction line shown while playing
    pub objective: Option<String>,
}

impl Snapshot {
    pub fn capture(world: &World) -> Self {
        let remaining_parcels = world.remaining_parcels();
        let all_collected = remaining_parcels == 0;

        let nearby_parcels = if world.tuning.magnet_enabled() {
            world
                .parcels
                .iter()
                .filter(|p| !p.collected)
                .filter(|p| within_radius(world.player.pos, p.pos, world.tuning.attraction_radius))
                .map(|p| p.id)
                .collect()
        } else {
            Vec::new()
        };

        let objective = (world.state.status == GameStatus::Playing).then(|| {
            if all_collected {
                "Deliver to the Post Office!".to_string()
            } else {
                format!("Collect all parcels! ({} remaining)", remaining_parcels)
            }
        });

        Self {
            state: world.state,
            player: world.player,
            parcels: world.parcels.clone(),
            obstacles: world.obstacles.clone(),
            post_office: world.post_office(),
            field: Vec2::new(world.tuning.field_width, world.tuning.field_height),
            remaining_parcels,
            all_collected,
            nearby_parcels,
            objective,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
