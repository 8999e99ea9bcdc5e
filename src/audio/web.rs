//! Web Audio output
//!
//! Cues are synthesized with oscillators, so no sample files ship for them.
//! Background music is a looping `<audio>` element.

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use super::{AudioError, SoundCue, SoundSink};
use crate::settings::Settings;

/// Base cue level, before settings apply
const CUE_LEVEL: f32 = 0.3;

fn rejected(err: JsValue) -> AudioError {
    AudioError::Rejected(format!("{:?}", err))
}

/// Synthesized cue player
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Fails outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - sound cues disabled");
        }
        Self {
            ctx,
            volume: Settings::default().effective_sfx_volume(),
        }
    }

    /// Pick up volume and mute from settings
    pub fn apply(&mut self, settings: &Settings) {
        self.volume = settings.effective_sfx_volume();
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Create an oscillator routed through a gain node
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Result<(OscillatorNode, GainNode), AudioError> {
        let osc = ctx.create_oscillator().map_err(rejected)?;
        let gain = ctx.create_gain().map_err(rejected)?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).map_err(rejected)?;
        gain.connect_with_audio_node(&ctx.destination())
            .map_err(rejected)?;

        Ok((osc, gain))
    }

    /// Short rising arpeggio, `step` seconds apart
    fn arpeggio(
        ctx: &AudioContext,
        vol: f32,
        freqs: &[f32],
        step: f64,
        len: f64,
        osc_type: OscillatorType,
    ) -> Result<(), AudioError> {
        for (i, freq) in freqs.iter().enumerate() {
            let (osc, gain) = Self::create_osc(ctx, *freq, osc_type)?;
            let t = ctx.current_time() + i as f64 * step;
            gain.gain().set_value_at_time(vol, t).map_err(rejected)?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + len)
                .map_err(rejected)?;
            osc.start_with_when(t).map_err(rejected)?;
            osc.stop_with_when(t + len + 0.05).map_err(rejected)?;
        }
        Ok(())
    }

    /// Parcel pickup - happy ding
    fn play_collect(ctx: &AudioContext, vol: f32) -> Result<(), AudioError> {
        Self::arpeggio(ctx, vol, &[600.0, 800.0, 1000.0], 0.08, 0.15, OscillatorType::Sine)
    }

    /// Delivery - fanfare
    fn play_delivery(ctx: &AudioContext, vol: f32) -> Result<(), AudioError> {
        Self::arpeggio(
            ctx,
            vol,
            &[400.0, 500.0, 600.0, 800.0],
            0.1,
            0.4,
            OscillatorType::Triangle,
        )
    }

    /// Obstacle hit - dull thump
    fn play_hit(ctx: &AudioContext, vol: f32) -> Result<(), AudioError> {
        let (osc, gain) = Self::create_osc(ctx, 150.0, OscillatorType::Sine)?;
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 1.5, t).map_err(rejected)?;
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .map_err(rejected)?;
        osc.frequency()
            .exponential_ramp_to_value_at_time(60.0, t + 0.15)
            .map_err(rejected)?;

        osc.start().map_err(rejected)?;
        osc.stop_with_when(t + 0.2).map_err(rejected)?;
        Ok(())
    }

    /// Game over - sad descending
    fn play_game_over(ctx: &AudioContext, vol: f32) -> Result<(), AudioError> {
        Self::arpeggio(
            ctx,
            vol,
            &[400.0, 350.0, 300.0, 200.0],
            0.2,
            0.3,
            OscillatorType::Sine,
        )
    }
}

impl SoundSink for AudioManager {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        let vol = self.volume * CUE_LEVEL;
        if vol <= 0.0 {
            return Ok(());
        }
        let ctx = self.ctx.as_ref().ok_or(AudioError::Unavailable)?;

        // Browsers start the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            SoundCue::ParcelCollect => Self::play_collect(ctx, vol),
            SoundCue::Delivery => Self::play_delivery(ctx, vol),
            SoundCue::Hit => Self::play_hit(ctx, vol),
            SoundCue::GameOver => Self::play_game_over(ctx, vol),
        }
    }
}

/// Looping background track
pub struct MusicPlayer {
    element: Option<HtmlAudioElement>,
}

impl MusicPlayer {
    pub fn new(src: &str, settings: &Settings) -> Self {
        let element = match HtmlAudioElement::new_with_src(src) {
            Ok(el) => {
                el.set_loop(true);
                Some(el)
            }
            Err(e) => {
                log::warn!("Background music unavailable: {:?}", e);
                None
            }
        };
        let mut player = Self { element };
        player.apply(settings);
        player
    }

    pub fn apply(&mut self, settings: &Settings) {
        if let Some(el) = &self.element {
            el.set_volume(settings.music_volume_level() as f64);
            el.set_muted(settings.muted);
        }
    }

    /// Follow the game: play while playing, pause otherwise
    pub fn set_playing(&self, playing: bool) {
        let Some(el) = &self.element else { return };
        if !playing {
            let _ = el.pause();
            return;
        }
        if !el.paused() {
            return;
        }
        match el.play() {
            Ok(promise) => spawn_local(async move {
                // Autoplay is refused until the page sees a user gesture
                if let Err(e) = JsFuture::from(promise).await {
                    log::info!("Background music waiting for user interaction: {:?}", e);
                }
            }),
            Err(e) => log::warn!("Background music failed to start: {:?}", e),
        }
    }
}
