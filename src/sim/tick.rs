//! Fixed-period movement tick
//!
//! Core game loop: walk the postman one step, then resolve parcels, the post
//! office and obstacles against the new position.

use serde::{Deserialize, Serialize};

use super::collision::{attract, bounce_facing, clamp_to_field, touches, within_box, within_radius};
use super::state::{Direction, GameStatus, Position, World};
use crate::audio::{SoundCue, SoundSink, play_best_effort};

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    ParcelCollected { parcel_id: u32, score: u32 },
    /// The last parcel of the level was just picked up
    AllParcelsCollected,
    Delivered { level: u32, score: u32 },
    ObstacleHit { obstacle_id: u32, lives: u32 },
    GameOver { score: u32, level: u32 },
}

/// Result of a tick
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick, in order
    pub events: Vec<GameEvent>,
    /// A hit landed and the postman is now invulnerable; the driver owes a
    /// timer that clears it
    pub invulnerability_started: bool,
}

impl TickResult {
    pub fn delivered(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, GameEvent::Delivered { .. }))
    }
}

/// Point the postman a new way. Movement itself only happens in [`tick`].
/// Ignored unless the game is running.
pub fn steer(world: &mut World, direction: Direction) -> bool {
    if world.state.status != GameStatus::Playing {
        return false;
    }
    world.player.facing = direction;
    true
}

/// Advance the game by one movement tick. No-op unless playing.
pub fn tick(world: &mut World, audio: &mut dyn SoundSink) -> TickResult {
    let mut result = TickResult::default();
    if world.state.status != GameStatus::Playing {
        return result;
    }

    world.time_ticks += 1;

    let (width, height) = (world.tuning.field_width, world.tuning.field_height);
    let step = world.player.facing.unit() * world.tuning.player_speed;
    let candidate = clamp_to_field(world.player.pos + step, width, height);
    world.player.facing = bounce_facing(candidate, world.player.facing, width, height);

    let reset = resolve_contacts(world, candidate, audio, &mut result);
    if !reset {
        world.player.pos = candidate;
    }

    result
}

/// Parcels, then delivery, then obstacles. Returns true when a delivery
/// reset the level, which ends the tick.
fn resolve_contacts(
    world: &mut World,
    candidate: Position,
    audio: &mut dyn SoundSink,
    result: &mut TickResult,
) -> bool {
    // Delivery looks at the parcels as they stood before this tick's pickups
    let all_collected_at_start = world.all_parcels_collected();

    collect_parcels(world, candidate, audio, result);

    if !all_collected_at_start && world.all_parcels_collected() {
        log::debug!("All parcels collected, head for the post office");
        result.events.push(GameEvent::AllParcelsCollected);
    }

    let tuning = &world.tuning;
    if all_collected_at_start
        && touches(
            tuning.parcel_hit,
            candidate,
            tuning.post_office,
            tuning.collection_radius,
        )
    {
        deliver(world, audio, result);
        return true;
    }

    if !world.player.invulnerable {
        check_obstacles(world, candidate, audio, result);
    }

    false
}

fn collect_parcels(
    world: &mut World,
    candidate: Position,
    audio: &mut dyn SoundSink,
    result: &mut TickResult,
) {
    let tuning = &world.tuning;
    let state = &mut world.state;

    for parcel in world.parcels.iter_mut().filter(|p| !p.collected) {
        if touches(
            tuning.parcel_hit,
            candidate,
            parcel.pos,
            tuning.collection_radius,
        ) {
            parcel.collect();
            state.score = state.score.saturating_add(tuning.parcel_bonus);
            log::debug!("Parcel {} collected (score {})", parcel.id, state.score);
            result.events.push(GameEvent::ParcelCollected {
                parcel_id: parcel.id,
                score: state.score,
            });
            play_best_effort(audio, SoundCue::ParcelCollect);
        } else if tuning.magnet_enabled()
            && within_radius(candidate, parcel.pos, tuning.attraction_radius)
        {
            // Pull depends only on this parcel and the candidate
            parcel.pos = attract(parcel.pos, candidate, tuning.attraction_strength);
        }
    }
}

fn deliver(world: &mut World, audio: &mut dyn SoundSink, result: &mut TickResult) {
    let state = &mut world.state;
    state.score = state.score.saturating_add(world.tuning.delivery_bonus);
    state.level += 1;
    log::info!(
        "Parcels delivered! Level {} (score {})",
        state.level,
        state.score
    );
    result.events.push(GameEvent::Delivered {
        level: state.level,
        score: state.score,
    });
    play_best_effort(audio, SoundCue::Delivery);

    world.reset_level();
}

fn check_obstacles(
    world: &mut World,
    candidate: Position,
    audio: &mut dyn SoundSink,
    result: &mut TickResult,
) {
    // At most one hit per tick, first obstacle in id order wins
    let Some(obstacle_id) = world
        .obstacles
        .iter()
        .find(|o| within_box(candidate, o.pos, world.tuning.obstacle_box))
        .map(|o| o.id)
    else {
        return;
    };

    let state = &mut world.state;
    state.lives = state.lives.saturating_sub(1);
    result.events.push(GameEvent::ObstacleHit {
        obstacle_id,
        lives: state.lives,
    });

    if state.lives == 0 {
        state.status = GameStatus::GameOver;
        log::info!(
            "Game over at level {} with score {}",
            state.level,
            state.score
        );
        result.events.push(GameEvent::GameOver {
            score: state.score,
            level: state.level,
        });
        play_best_effort(audio, SoundCue::GameOver);
    } else {
        log::debug!("Hit obstacle {} ({} lives left)", obstacle_id, state.lives);
        world.player.invulnerable = true;
        result.invulnerability_started = true;
        play_best_effort(audio, SoundCue::Hit);
    }
}
