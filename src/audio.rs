//! Audio triggers
//!
//! The simulation only fires sound effects and switches music tracks; the
//! actual playback belongs to a backend supplied by the host. Without a
//! backend every trigger is a no-op.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player left the ground
    Jump,
    /// Coin collected
    Coin,
    /// Ball bounced off a platform
    Bounce,
    /// Ball kicked
    Kick,
    /// Head bump or ball-on-ball impact
    Bonk,
    /// Run lost
    Lose,
    /// Goal reached
    Win,
}

/// Looping background track
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MusicTrack {
    /// Start and selection screens
    Menu,
    /// A level's own track, by asset name
    Level(String),
}

/// Host-provided playback
pub trait AudioBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32);
    fn play_music(&mut self, track: &MusicTrack, volume: f32);
    /// Silence every playing sound and track
    fn stop_all(&mut self);
}

/// Backend that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::trace!("sfx {:?} at {:.2}", effect, volume);
    }

    fn play_music(&mut self, track: &MusicTrack, volume: f32) {
        log::debug!("music {:?} at {:.2}", track, volume);
    }

    fn stop_all(&mut self) {
        log::trace!("audio stopped");
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn AudioBackend>>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::silent()
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("backend", &self.backend.is_some())
            .field("muted", &self.muted)
            .finish()
    }
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend: Some(backend),
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }

    /// Manager with no backend
    pub fn silent() -> Self {
        Self {
            backend: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }

    /// Copy volume preferences from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_music_volume(settings.music_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective(self.sfx_volume);
        if vol <= 0.0 {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        backend.play(effect, vol);
    }

    /// Start a looping track
    pub fn play_music(&mut self, track: &MusicTrack) {
        let vol = self.effective(self.music_volume);
        if let Some(backend) = self.backend.as_mut() {
            backend.play_music(track, vol);
        }
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Stop everything (called before every phase transition)
    pub fn stop_all(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            backend.stop_all();
        }
    }
}

/// Backend that records every call, shared through clones
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    log: std::rc::Rc<std::cell::RefCell<Vec<AudioCall>>>,
}

/// One recorded backend call
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    Play(SoundEffect),
    Music(MusicTrack),
    StopAll,
}

#[cfg(test)]
impl RecordingBackend {
    pub fn calls(&self) -> Vec<AudioCall> {
        self.log.borrow().clone()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    /// How many times `effect` was played
    pub fn count(&self, effect: SoundEffect) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|c| **c == AudioCall::Play(effect))
            .count()
    }
}

#[cfg(test)]
impl AudioBackend for RecordingBackend {
    fn play(&mut self, effect: SoundEffect, _volume: f32) {
        self.log.borrow_mut().push(AudioCall::Play(effect));
    }

    fn play_music(&mut self, track: &MusicTrack, _volume: f32) {
        self.log.borrow_mut().push(AudioCall::Music(track.clone()));
    }

    fn stop_all(&mut self) {
        self.log.borrow_mut().push(AudioCall::StopAll);
    }
}
