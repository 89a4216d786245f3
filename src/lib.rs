//! Asteroid Drift - a side-scrolling Asteroids arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, waves, game state)
//! - `renderer`: Draw contract and the terminal render surface
//! - `audio`: Sound effect routing to an audio backend
//! - `game`: Session that wires the simulation to its collaborators
//! - `settings`: Configuration loading and validation

pub mod audio;
pub mod error;
pub mod game;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use game::Game;
pub use settings::Settings;

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    use glam::IVec2;

    /// Fixed simulation tick interval (milliseconds)
    pub const TICK_INTERVAL_MS: u64 = 100;

    /// Field limits accepted at startup
    pub const MAX_FIELD_WIDTH: i32 = 1000;
    pub const MAX_FIELD_HEIGHT: i32 = 1000;
    /// Field used when the requested one is rejected
    pub const DEFAULT_FIELD_WIDTH: i32 = 800;
    pub const DEFAULT_FIELD_HEIGHT: i32 = 600;

    /// Ship defaults
    pub const SHIP_START_X: i32 = 10;
    pub const SHIP_SIZE: IVec2 = IVec2::new(36, 26);
    /// Vertical distance covered by one move command
    pub const SHIP_STEP: i32 = 5;
    pub const SHIP_MAX_ENERGY: i32 = 100;
    /// Offset of the gun relative to the ship's top-left corner
    pub const MUZZLE_OFFSET: IVec2 = IVec2::new(35, 13);

    /// Bullet defaults
    pub const BULLET_SPEED: i32 = 6;
    pub const BULLET_SIZE: IVec2 = IVec2::new(4, 1);

    /// Asteroid radius range (min inclusive, max exclusive)
    pub const ASTEROID_MIN_RADIUS: i32 = 5;
    pub const ASTEROID_MAX_RADIUS: i32 = 50;
    /// Maximum vertical drift of a freshly spawned asteroid
    pub const ASTEROID_MAX_DRIFT: i32 = 4;
    /// Explosion animation frames before an asteroid is blown
    pub const EXPLOSION_FRAMES: u8 = 3;
    pub const SCORE_PER_ASTEROID: u32 = 10;

    /// Aid kit defaults
    pub const AID_KIT_POWER: i32 = 20;
    pub const AID_KIT_SIZE: IVec2 = IVec2::new(20, 20);
    pub const AID_KIT_MAX_SPEED: i32 = 3;
    pub const MAX_AID_KITS_PER_WAVE: usize = 3;

    /// Waves
    pub const FIRST_WAVE: u32 = 1;
    pub const WAVE_BASE_ASTEROIDS: u32 = 7;
    /// Ticks the "new wave" banner is shown before a wave spawns
    pub const WAVE_INTRO_FRAMES: u32 = 20;

    /// Background
    pub const STAR_DUST_COUNT: i32 = 19;
    pub const STAR_COUNT: i32 = 10;
    pub const STAR_DUST_SIZE: IVec2 = IVec2::new(3, 3);
    pub const STAR_SIZE: IVec2 = IVec2::new(15, 15);
    pub const UFO_SIZE: IVec2 = IVec2::new(40, 40);
    pub const UFO_SPEED: i32 = 8;

    /// Autopilot fires once every this many ticks
    pub const AUTOPILOT_FIRE_INTERVAL: u64 = 4;
    /// Energy below which the autopilot goes looking for aid kits
    pub const AUTOPILOT_LOW_ENERGY: i32 = 50;
}

/// Vertical centre of a rectangle given its top-left corner and size
#[inline]
pub fn center_y(pos: IVec2, size: IVec2) -> i32 {
    pos.y + size.y / 2
}
