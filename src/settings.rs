//! Player preferences
//!
//! Audio levels and the mute toggle. Held in memory for the page's lifetime.

use serde::{Deserialize, Serialize};

use crate::config::Ruleset;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Which balance preset new sessions use
    pub ruleset: Ruleset,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Silence everything
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ruleset: Ruleset::default(),
            master_volume: 1.0,
            sfx_volume: 1.0,
            // Background track sits at 30%
            music_volume: 0.3,
            muted: false,
        }
    }
}

impl Settings {
    /// Flip mute, returning the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Sound effect gain after master volume and mute
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Music element volume (mute is applied on the element itself)
    pub fn music_volume_level(&self) -> f32 {
        self.master_volume * self.music_volume
    }
}
