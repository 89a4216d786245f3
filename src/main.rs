//! Asteroid Drift entry point
//!
//! Resolves settings, installs logging and runs the session either in the
//! terminal or headless under the autopilot.

use std::fs::File;
use std::io::{self, BufWriter, Write, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use clap::Parser;
use crossterm::{
    ExecutableCommand, cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        ModifierKeyCode, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
};

use asteroid_drift::audio::AudioManager;
use asteroid_drift::renderer::{NullCanvas, TerminalCanvas};
use asteroid_drift::sim::{Command, autopilot};
use asteroid_drift::{ConfigError, Game, Settings};

#[derive(Parser, Debug)]
#[command(name = "asteroid-drift")]
#[command(about = "Side-scrolling asteroid shooter for the terminal")]
struct Args {
    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Field width in pixels
    #[arg(long)]
    width: Option<i32>,

    /// Field height in pixels
    #[arg(long)]
    height: Option<i32>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds per tick
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Start with audio muted
    #[arg(long)]
    mute: bool,

    /// Where log output goes while the terminal is in use
    #[arg(long, default_value = "asteroid-drift.log")]
    log_file: PathBuf,

    /// Run without a terminal, driven by the autopilot
    #[arg(long)]
    headless: bool,

    /// Write every game event to this file as JSON lines
    #[arg(long)]
    events_out: Option<PathBuf>,

    /// Tick limit for headless runs
    #[arg(long, default_value_t = 5000)]
    max_ticks: u64,
}

impl Args {
    /// Defaults, then the config file, then flags
    fn settings(&self) -> Result<Settings, ConfigError> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(width) = self.width {
            settings.field_width = width;
        }
        if let Some(height) = self.height {
            settings.field_height = height;
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if let Some(tick_ms) = self.tick_ms {
            settings.tick_interval_ms = tick_ms;
        }
        if self.mute {
            settings.muted = true;
        }
        Ok(settings)
    }
}

fn config_error(e: ConfigError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, e)
}

fn init_logging(args: &Args) -> io::Result<()> {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    if !args.headless {
        let file = File::create(&args.log_file)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

/// Terminal key reporting needed for a bare Ctrl press to arrive as a key event
fn keyboard_flags() -> KeyboardEnhancementFlags {
    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
        | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
}

/// Map a key press to a game command
fn command_for_key(key: &KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::Quit)
        }
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Command::MoveUp),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::MoveDown),
        KeyCode::Char(' ')
        | KeyCode::Modifier(ModifierKeyCode::LeftControl)
        | KeyCode::Modifier(ModifierKeyCode::RightControl) => Some(Command::Fire),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

fn run_headless(game: &mut Game, max_ticks: u64) -> io::Result<()> {
    let mut canvas = NullCanvas;
    for _ in 0..max_ticks {
        for command in autopilot::commands(game.state()) {
            game.handle(command);
        }
        game.step(&mut canvas)?;
        if game.is_finished() {
            break;
        }
    }

    let state = game.state();
    println!(
        "score {} after {} waves ({} ticks, energy {})",
        state.score,
        state.waves_spawned(),
        state.time_ticks,
        state.ship.energy
    );
    Ok(())
}

fn run_terminal(game: &mut Game, rx: &mpsc::Receiver<Event>) -> io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut canvas = TerminalCanvas::new(BufWriter::new(stdout()), game.state().field, cols, rows);
    let interval = game.tick_interval();

    loop {
        let frame_start = Instant::now();

        // Drain all pending input (non-blocking)
        while let Ok(event) = rx.try_recv() {
            match event {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if matches!(key.code, KeyCode::Char('m') | KeyCode::Char('M')) {
                        let muted = game.audio_mut().toggle_mute();
                        log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
                    } else if let Some(command) = command_for_key(&key) {
                        game.handle(command);
                    }
                }
                Event::Resize(cols, rows) => canvas.resize(cols, rows),
                _ => {}
            }
        }

        if game.quit_requested() {
            return Ok(());
        }

        // Keeps drawing the final banner after game over until quit
        game.step(&mut canvas)?;

        let elapsed = frame_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;
    log::info!("Asteroid Drift starting...");

    let settings = args.settings().map_err(config_error)?;
    let audio = AudioManager::from_settings(&settings);
    let mut game = Game::init_or_default(settings, audio).map_err(config_error)?;
    if let Some(path) = &args.events_out {
        game.set_journal(Box::new(BufWriter::new(File::create(path)?)));
        log::info!("Recording events to {}", path.display());
    }

    if args.headless {
        run_headless(&mut game, args.max_ticks)?;
        return game.flush_journal();
    }

    let mut out = stdout();
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ctrl only fires on terminals that report modifier keys; Space works everywhere
    let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(keyboard_flags()))
            .is_ok();
    if !keyboard_enhanced {
        log::info!("Keyboard enhancement unavailable, Ctrl will not fire");
    }

    // Blocking event reads live on their own thread
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run_terminal(&mut game, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();

    if let Err(e) = game.flush_journal() {
        log::warn!("Event journal flush failed: {e}");
    }
    let state = game.state();
    log::info!("Session ended with score {}", state.score);
    println!("Final score: {}", state.score);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(command_for_key(&press(KeyCode::Up)), Some(Command::MoveUp));
        assert_eq!(command_for_key(&press(KeyCode::Char('s'))), Some(Command::MoveDown));
        assert_eq!(command_for_key(&press(KeyCode::Char(' '))), Some(Command::Fire));
        assert_eq!(command_for_key(&press(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(
            command_for_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(command_for_key(&press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_bare_ctrl_fires() {
        let ctrl = KeyEvent::new(
            KeyCode::Modifier(ModifierKeyCode::LeftControl),
            KeyModifiers::CONTROL,
        );
        assert_eq!(command_for_key(&ctrl), Some(Command::Fire));
        let right = press(KeyCode::Modifier(ModifierKeyCode::RightControl));
        assert_eq!(command_for_key(&right), Some(Command::Fire));
        assert!(keyboard_flags().contains(KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES));
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from(["asteroid-drift", "--width", "640", "--seed", "7", "--mute"]);
        let settings = args.settings().unwrap();
        assert_eq!(settings.field_width, 640);
        assert_eq!(settings.field_height, 600);
        assert_eq!(settings.seed, 7);
        assert!(settings.muted);
    }
}
