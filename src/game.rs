//! Game session
//!
//! Glues the simulation to its collaborators: input commands in, events out
//! to the log and the audio manager, one frame drawn per tick.

use std::io::Write;
use std::time::Duration;

use crate::audio::AudioManager;
use crate::error::ConfigError;
use crate::renderer::{Canvas, draw_frame};
use crate::settings::Settings;
use crate::sim::{Command, GameEvent, GameState, apply_command, tick};

pub struct Game {
    state: GameState,
    settings: Settings,
    audio: AudioManager,
    /// Event journal, one JSON object per line
    journal: Option<Box<dyn Write>>,
    /// Timer stopped: game over or quit
    finished: bool,
    quit: bool,
}

impl Game {
    /// Start a session. Fails if the settings describe an unusable field.
    pub fn new(settings: Settings, audio: AudioManager) -> Result<Self, ConfigError> {
        settings.validate()?;
        let field = settings.field()?;
        let state = GameState::new(field, settings.seed);

        let mut game = Self {
            state,
            settings,
            audio,
            journal: None,
            finished: false,
            quit: false,
        };
        game.dispatch(GameEvent::GameStarted {
            width: field.width,
            height: field.height,
            seed: game.settings.seed,
        });
        Ok(game)
    }

    /// Start a session, falling back to the default field if the configured
    /// one is rejected. Other configuration errors are returned as is.
    pub fn init_or_default(settings: Settings, audio: AudioManager) -> Result<Self, ConfigError> {
        match settings.validate() {
            Ok(()) => Self::new(settings, audio),
            Err(e) if e.is_field_error() => {
                log::warn!("{e}; falling back to the default field");
                Self::new(settings.with_default_field(), audio)
            }
            Err(e) => Err(e),
        }
    }

    /// Record every event from here on to `out`
    pub fn set_journal(&mut self, out: Box<dyn Write>) {
        self.journal = Some(out);
    }

    /// Flush the journal, if any
    pub fn flush_journal(&mut self) -> std::io::Result<()> {
        match &mut self.journal {
            Some(out) => out.flush(),
            None => Ok(()),
        }
    }

    /// Apply one input command
    pub fn handle(&mut self, command: Command) {
        if command == Command::Quit {
            log::info!("Quit requested");
            self.quit = true;
            self.finished = true;
            return;
        }
        if self.finished {
            return;
        }
        if let Some(event) = apply_command(&mut self.state, command) {
            self.dispatch(event);
        }
    }

    /// Advance one tick (unless finished) and draw the frame
    pub fn step(&mut self, canvas: &mut impl Canvas) -> std::io::Result<()> {
        if !self.finished {
            for event in tick(&mut self.state) {
                self.dispatch(event);
            }
        }
        draw_frame(&self.state, canvas);
        canvas.present()
    }

    fn dispatch(&mut self, event: GameEvent) {
        match &event {
            GameEvent::WaveIntro { .. } | GameEvent::BulletFired { .. } => {
                log::debug!("{event}")
            }
            GameEvent::ShipDamaged { .. }
            | GameEvent::ShipDestroyed { .. }
            | GameEvent::GameOver { .. } => log::warn!("{event}"),
            _ => log::info!("{event}"),
        }

        self.audio.handle(&event);
        self.record(&event);

        if matches!(event, GameEvent::GameOver { .. }) {
            self.finished = true;
        }
    }

    fn record(&mut self, event: &GameEvent) {
        let Some(out) = &mut self.journal else { return };
        let written = serde_json::to_writer(&mut *out, event)
            .map_err(std::io::Error::from)
            .and_then(|_| out.write_all(b"\n"));
        if let Err(e) = written {
            log::warn!("Event journal write failed, closing it: {e}");
            self.journal = None;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    pub fn tick_interval(&self) -> Duration {
        self.settings.tick_interval()
    }
}
