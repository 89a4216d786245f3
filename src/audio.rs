//! Audio system
//!
//! Game events map to a small set of sound effects. What actually makes
//! the noise is an `AudioBackend` chosen by the host.

use std::io::Write;

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Bullet or ship hits an asteroid
    AsteroidHit,
    /// Ship loses energy
    ShipDamage,
    /// Aid kit collected
    PickupCollect,
    /// Explosion animation finished
    AsteroidDestroyed,
    /// New wave spawned
    WaveStart,
    GameOver,
}

impl SoundEffect {
    /// Sound for an event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::AsteroidHit { .. } => Some(Self::AsteroidHit),
            GameEvent::ShipDamaged { .. } => Some(Self::ShipDamage),
            GameEvent::AidKitCollected { .. } => Some(Self::PickupCollect),
            GameEvent::AsteroidDestroyed { .. } => Some(Self::AsteroidDestroyed),
            GameEvent::WaveSpawned { .. } => Some(Self::WaveStart),
            GameEvent::GameOver { .. } => Some(Self::GameOver),
            _ => None,
        }
    }
}

/// Something that can play a sound effect at a volume in 0.0..=1.0
pub trait AudioBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Silent backend
#[derive(Debug, Default)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
}

/// Rings the terminal bell for the effects worth interrupting for
#[derive(Debug, Default)]
pub struct TerminalBell;

impl AudioBackend for TerminalBell {
    fn play(&mut self, effect: SoundEffect, _volume: f32) {
        let ring = matches!(
            effect,
            SoundEffect::ShipDamage | SoundEffect::WaveStart | SoundEffect::GameOver
        );
        if !ring {
            return;
        }
        let mut err = std::io::stderr();
        if let Err(e) = err.write_all(b"\x07").and_then(|_| err.flush()) {
            log::debug!("Terminal bell failed: {e}");
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Box<dyn AudioBackend>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(NullBackend))
    }
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Manager configured from settings, with the bell backend if enabled
    pub fn from_settings(settings: &Settings) -> Self {
        let backend: Box<dyn AudioBackend> = if settings.terminal_bell {
            Box::new(TerminalBell)
        } else {
            Box::new(NullBackend)
        };
        let mut audio = Self::new(backend);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.backend.play(effect, vol);
    }

    /// Play whatever sound belongs to an event
    pub fn handle(&mut self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }
}
