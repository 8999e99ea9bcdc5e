//! One running game
//!
//! A [`Session`] owns the world, its timers and the sound output. Hosts feed
//! it wall-clock time and input; it runs the movement tick on a fixed
//! interval while the game is playing and stops the interval the moment the
//! game leaves that status.

use crate::audio::{SilentSink, SoundSink};
use crate::config::Tuning;
use crate::scheduler::{Scheduler, TaskHandle};
use crate::sim::{Direction, GameEvent, GameStatus, Snapshot, World, steer, tick};

/// Timer work a session schedules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Movement tick (interval)
    Move,
    /// End of the post-hit grace period (one-shot, never cancelled)
    ClearInvulnerability,
}

pub struct Session<A: SoundSink = SilentSink> {
    world: World,
    scheduler: Scheduler<Task>,
    /// Live movement interval, present exactly while playing
    movement: Option<TaskHandle>,
    audio: A,
}

impl Session<SilentSink> {
    /// Session without sound
    pub fn silent(tuning: Tuning, seed: u64) -> Self {
        Self::new(tuning, seed, SilentSink)
    }
}

impl<A: SoundSink> Session<A> {
    pub fn new(tuning: Tuning, seed: u64, audio: A) -> Self {
        Self {
            world: World::new(tuning, seed),
            scheduler: Scheduler::new(),
            movement: None,
            audio,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn status(&self) -> GameStatus {
        self.world.state.status
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    /// Milliseconds of game time elapsed
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Whether the movement interval is armed
    pub fn is_ticking(&self) -> bool {
        self.movement
            .is_some_and(|handle| self.scheduler.is_scheduled(handle))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.world)
    }

    /// Start button: Idle -> Playing
    pub fn start(&mut self) -> bool {
        let started = self.world.start();
        if !started {
            log::debug!("Start ignored while {:?}", self.status());
        }
        self.sync_movement();
        started
    }

    /// Try-again button: GameOver -> Playing with everything reset
    pub fn restart(&mut self) -> bool {
        let restarted = self.world.restart();
        if !restarted {
            log::debug!("Restart ignored while {:?}", self.status());
        }
        self.sync_movement();
        restarted
    }

    /// Directional key or button
    pub fn steer(&mut self, direction: Direction) -> bool {
        steer(&mut self.world, direction)
    }

    /// Let `elapsed_ms` of wall time pass, running every timer that falls
    /// due on the way. Returns the game events in the order they happened.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<GameEvent> {
        let until = self.scheduler.now_ms() + elapsed_ms;
        let mut events = Vec::new();

        while let Some(task) = self.scheduler.pop_due(until) {
            match task {
                Task::Move => {
                    let result = tick(&mut self.world, &mut self.audio);
                    if result.invulnerability_started {
                        self.scheduler
                            .once(self.world.tuning.invulnerable_ms, Task::ClearInvulnerability);
                    }
                    events.extend(result.events);
                    self.sync_movement();
                }
                Task::ClearInvulnerability => {
                    // Fires even after game over or restart; clearing an
                    // already-clear flag is harmless
                    self.world.player.invulnerable = false;
                }
            }
        }

        events
    }

    /// Arm the movement interval while playing, cancel it otherwise
    fn sync_movement(&mut self) {
        let playing = self.world.state.status == GameStatus::Playing;
        match (playing, self.movement) {
            (true, None) => {
                let period = self.world.tuning.tick_period_ms;
                self.movement = Some(self.scheduler.every(period, Task::Move));
                log::debug!("Movement ticking every {} ms", period);
            }
            (false, Some(handle)) => {
                self.scheduler.cancel(handle);
                self.movement = None;
                log::debug!("Movement stopped ({:?})", self.world.state.status);
            }
            _ => {}
        }
    }
}
