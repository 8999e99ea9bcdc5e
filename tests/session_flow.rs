//! End-to-end game flow through the public API

use glam::Vec2;
use postman_panic::audio::{AudioError, SoundCue, SoundSink};
use postman_panic::sim::{
    Direction, GameEvent, GameStatus, Parcel, Snapshot, World, steer, tick,
};
use postman_panic::{Ruleset, Session, Tuning};

#[derive(Debug, Default)]
struct Recorder(Vec<SoundCue>);

impl SoundSink for Recorder {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        self.0.push(cue);
        Ok(())
    }
}

#[test]
fn test_classic_level_is_collected_and_delivered() {
    let mut world = World::new(Tuning::for_ruleset(Ruleset::Classic), 99);
    world.obstacles.clear();
    world.parcels = [100.0, 150.0, 200.0]
        .into_iter()
        .zip(1..)
        .map(|(x, id)| Parcel {
            id,
            pos: Vec2::new(x, 50.0),
            collected: false,
        })
        .collect();
    assert!(world.start());

    let mut recorder = Recorder::default();
    let mut events = Vec::new();
    for _ in 0..1000 {
        if world.all_parcels_collected() && world.player.pos.x >= 540.0 {
            steer(&mut world, Direction::Down);
        }
        let result = tick(&mut world, &mut recorder);
        events.extend(result.events.iter().copied());
        if result.delivered() {
            break;
        }
    }

    let collected = events
        .iter()
        .filter(|e| matches!(e, GameEvent::ParcelCollected { .. }))
        .count();
    assert_eq!(collected, 3);
    assert_eq!(
        events.iter().filter(|e| **e == GameEvent::AllParcelsCollected).count(),
        1
    );
    assert_eq!(
        events.last(),
        Some(&GameEvent::Delivered {
            level: 2,
            score: 800
        })
    );
    assert_eq!(
        recorder.0,
        vec![
            SoundCue::ParcelCollect,
            SoundCue::ParcelCollect,
            SoundCue::ParcelCollect,
            SoundCue::Delivery
        ]
    );

    // Fresh layout, postman back at the start, facing carried over
    assert_eq!(world.state.level, 2);
    assert_eq!(world.player.pos, Vec2::new(50.0, 50.0));
    assert_eq!(world.player.facing, Direction::Down);
    assert_eq!(world.parcels.len(), 3);
    assert!(world.parcels.iter().all(|p| !p.collected));
    assert_eq!(world.obstacles.len(), 3);
}

#[test]
fn test_unavoidable_obstacles_end_the_game() {
    // Every obstacle covers the whole field; only invulnerability spaces the hits
    let tuning = Tuning::from_json(
        r#"{ "obstacle_box": 1000.0, "collection_radius": 0.5, "attraction_strength": 0.0 }"#,
    )
    .unwrap();
    let mut session = Session::new(tuning, 5, Recorder::default());
    assert!(session.start());

    let events: Vec<GameEvent> = session
        .advance(5000)
        .into_iter()
        .filter(|e| !matches!(e, GameEvent::ParcelCollected { .. } | GameEvent::AllParcelsCollected))
        .collect();

    assert_eq!(events.len(), 4);
    assert!(matches!(events[0], GameEvent::ObstacleHit { lives: 2, .. }));
    assert!(matches!(events[1], GameEvent::ObstacleHit { lives: 1, .. }));
    assert!(matches!(events[2], GameEvent::ObstacleHit { lives: 0, .. }));
    assert!(matches!(events[3], GameEvent::GameOver { level: 1, .. }));

    // Hits at 16 ms, 1024 ms and 2032 ms, then the interval stops
    assert_eq!(session.status(), GameStatus::GameOver);
    assert_eq!(session.world().time_ticks, 2032 / 16);
    assert!(!session.is_ticking());
    assert!(!session.world().player.invulnerable);

    let cues: Vec<SoundCue> = session
        .audio()
        .0
        .iter()
        .copied()
        .filter(|c| *c != SoundCue::ParcelCollect)
        .collect();
    assert_eq!(cues, vec![SoundCue::Hit, SoundCue::Hit, SoundCue::GameOver]);

    assert!(session.restart());
    assert_eq!(session.world().state.lives, 3);
    assert!(session.is_ticking());
}

#[test]
fn test_snapshot_tracks_lifecycle() {
    let mut session = Session::silent(Tuning::default(), 31);
    let idle: Snapshot = session.snapshot();
    assert_eq!(idle.state.status, GameStatus::Idle);
    assert_eq!(idle.objective, None);
    assert_eq!(idle.remaining_parcels, 3);
    assert_eq!(idle.field, Vec2::new(400.0, 350.0));

    session.start();
    let playing = session.snapshot();
    assert_eq!(
        playing.objective.as_deref(),
        Some("Collect all parcels! (3 remaining)")
    );

    let json = playing.to_json().unwrap();
    assert!(json.contains("\"status\":\"playing\""));
    assert!(json.contains("\"facing\":\"right\""));
}

#[test]
fn test_frames_shorter_than_a_tick_accumulate() {
    let mut session = Session::silent(Tuning::default(), 8);
    session.start();
    for _ in 0..4 {
        session.advance(4);
    }
    assert_eq!(session.world().time_ticks, 1);
    assert_eq!(session.now_ms(), 16);
}

#[test]
fn test_invalid_tuning_rejected() {
    assert!(Tuning::from_json(r#"{ "tick_period_ms": 0 }"#).is_err());
    assert!(Tuning::from_json(r#"{ "post_office": [900.0, 10.0] }"#).is_err());
    assert!(Tuning::from_json("not json").is_err());
    assert!("arcade".parse::<Ruleset>().is_err());
}
