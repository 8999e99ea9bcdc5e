//! Sound cues
//!
//! The simulation asks for cues through [`SoundSink`] and never waits on the
//! answer. A failed cue is logged and dropped: missing sound is never a game
//! error.

use thiserror::Error;

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::{AudioManager, MusicPlayer};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Parcel picked up
    ParcelCollect,
    /// Parcels handed in at the post office
    Delivery,
    /// Ran into an obstacle
    Hit,
    /// Last life lost
    GameOver,
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio output unavailable")]
    Unavailable,
    #[error("audio playback rejected: {0}")]
    Rejected(String),
}

/// Fire-and-forget audio output
pub trait SoundSink {
    /// Request a cue. Returns as soon as the request is issued; `Err` only
    /// says the request could not be issued.
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError>;
}

impl<S: SoundSink + ?Sized> SoundSink for Box<S> {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        (**self).play(cue)
    }
}

/// Issue a cue and swallow any failure
pub fn play_best_effort(sink: &mut dyn SoundSink, cue: SoundCue) {
    if let Err(err) = sink.play(cue) {
        log::debug!("{:?} cue dropped: {}", cue, err);
    }
}

/// Sink that plays nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl SoundSink for SilentSink {
    fn play(&mut self, _cue: SoundCue) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Sink that writes cues to the log (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl SoundSink for LogSink {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        log::debug!("♪ {:?}", cue);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl SoundSink for Broken {
        fn play(&mut self, _cue: SoundCue) -> Result<(), AudioError> {
            Err(AudioError::Rejected("NotAllowedError".into()))
        }
    }

    #[test]
    fn test_best_effort_swallows_failure() {
        play_best_effort(&mut Broken, SoundCue::ParcelCollect);
        play_best_effort(&mut SilentSink, SoundCue::Delivery);
    }

    #[test]
    fn test_boxed_sink_forwards() {
        let mut sink: Box<dyn SoundSink> = Box::new(Broken);
        assert!(sink.play(SoundCue::Hit).is_err());
    }
}
