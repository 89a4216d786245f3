//! Game state and core simulation types
//!
//! `GameState` is the world: it owns every live entity, the score and wave
//! counters, and the seeded RNG. Nothing in the simulation is global.

use std::fmt;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{AidKit, Asteroid, Bullet, Decoration, EntityKind, EntityRef, Ship};
use super::wave;
use crate::consts::*;
use crate::error::{Axis, ConfigError};

/// Playing field dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub width: i32,
    pub height: i32,
}

impl Field {
    /// Validate dimensions against the supported maximum
    pub fn new(width: i32, height: i32) -> Result<Self, ConfigError> {
        if width > MAX_FIELD_WIDTH {
            return Err(ConfigError::FieldTooLarge {
                axis: Axis::Width,
                value: width,
                max: MAX_FIELD_WIDTH,
            });
        }
        if height > MAX_FIELD_HEIGHT {
            return Err(ConfigError::FieldTooLarge {
                axis: Axis::Height,
                value: height,
                max: MAX_FIELD_HEIGHT,
            });
        }
        if width <= 0 {
            return Err(ConfigError::FieldEmpty {
                axis: Axis::Width,
                value: width,
            });
        }
        if height <= 0 {
            return Err(ConfigError::FieldEmpty {
                axis: Axis::Height,
                value: height,
            });
        }
        Ok(Self { width, height })
    }

    /// Largest top-left position that keeps an object of `size` inside
    pub fn max_pos(&self, size: IVec2) -> IVec2 {
        IVec2::new(
            (self.width - size.x).max(0),
            (self.height - size.y).max(0),
        )
    }

    pub fn random_x(&self, rng: &mut impl Rng, size: IVec2) -> i32 {
        rng.random_range(0..=self.max_pos(size).x)
    }

    pub fn random_y(&self, rng: &mut impl Rng, size: IVec2) -> i32 {
        rng.random_range(0..=self.max_pos(size).y)
    }

    pub fn center(&self) -> IVec2 {
        IVec2::new(self.width / 2, self.height / 2)
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Running,
    /// Ship destroyed. Terminal.
    GameOver,
}

/// Everything the simulation reports to the outside, in the order it happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted { width: i32, height: i32, seed: u64 },
    /// New-wave banner frame before the wave spawns
    WaveIntro { wave: u32, frame: u32 },
    WaveSpawned { wave: u32, asteroids: usize, aid_kits: usize },
    BulletFired { id: u32 },
    Collision { first: String, second: String },
    AsteroidHit { id: u32, by: EntityKind },
    AsteroidDestroyed { id: u32, description: String },
    ShipDamaged { amount: i32, energy: i32 },
    ShipHealed { amount: i32, energy: i32 },
    AidKitCollected { id: u32, power: i32 },
    ShipDestroyed { energy: i32 },
    GameOver { score: u32, waves: u32 },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GameStarted {
                width,
                height,
                seed,
            } => write!(f, "Game started on {width}x{height} field (seed {seed})"),
            Self::WaveIntro { wave, frame } => {
                write!(f, "Wave {wave} incoming ({frame}/{WAVE_INTRO_FRAMES})")
            }
            Self::WaveSpawned {
                wave,
                asteroids,
                aid_kits,
            } => write!(
                f,
                "Wave {wave} spawned: {asteroids} asteroids, {aid_kits} aid kits"
            ),
            Self::BulletFired { id } => write!(f, "Shot fired (bullet #{id})"),
            Self::Collision { first, second } => write!(f, "{first} collided with {second}"),
            Self::AsteroidHit { id, by } => write!(f, "Asteroid #{id} hit by {by}"),
            Self::AsteroidDestroyed { description, .. } => write!(f, "{description} blew up"),
            Self::ShipDamaged { amount, energy } => {
                write!(f, "Ship damaged by {amount} (energy {energy})")
            }
            Self::ShipHealed { amount, energy } => {
                write!(f, "Ship repaired by {amount} (energy {energy})")
            }
            Self::AidKitCollected { id, power } => write!(f, "Aid kit #{id} collected (+{power})"),
            Self::ShipDestroyed { energy } => write!(f, "Ship destroyed (energy {energy})"),
            Self::GameOver { score, waves } => {
                write!(f, "Game over: score {score} after {waves} waves")
            }
        }
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub field: Field,
    pub phase: GamePhase,
    pub score: u32,
    /// Number of the next wave to spawn
    pub wave_counter: u32,
    /// Banner frames shown for the pending wave
    pub wave_intro_counter: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Scenery (stars, star dust, UFO)
    pub background: Vec<Decoration>,
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub asteroids: Vec<Asteroid>,
    pub aid_kits: Vec<AidKit>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new world with background and ship. The first wave is
    /// announced and spawned by the tick loop.
    pub fn new(field: Field, seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            field,
            phase: GamePhase::Running,
            score: 0,
            wave_counter: FIRST_WAVE,
            wave_intro_counter: 0,
            time_ticks: 0,
            background: Vec::new(),
            ship: Ship::new(&field),
            bullets: Vec::new(),
            asteroids: Vec::new(),
            aid_kits: Vec::new(),
            next_id: 1,
        };

        wave::spawn_background(&mut state);

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Waves spawned so far
    pub fn waves_spawned(&self) -> u32 {
        self.wave_counter - FIRST_WAVE
    }

    /// Spawn a bullet at the ship's gun
    pub fn fire(&mut self) -> GameEvent {
        let id = self.next_entity_id();
        self.bullets.push(Bullet::new(id, self.ship.muzzle()));
        GameEvent::BulletFired { id }
    }

    /// Blinking banner while the next wave is pending
    pub fn wave_banner_visible(&self) -> bool {
        self.phase == GamePhase::Running
            && self.asteroids.is_empty()
            && self.wave_intro_counter % 2 == 0
    }

    /// All entities in draw order: background, aid kits, asteroids, bullets, ship
    pub fn entities(&self) -> impl Iterator<Item = EntityRef<'_>> {
        self.background
            .iter()
            .map(EntityRef::from)
            .chain(self.aid_kits.iter().map(EntityRef::AidKit))
            .chain(self.asteroids.iter().map(EntityRef::Asteroid))
            .chain(self.bullets.iter().map(EntityRef::Bullet))
            .chain(std::iter::once(EntityRef::Ship(&self.ship)))
    }
}
