//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only
//! - Seeded RNG only, owned by `GameState`
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod entity;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{Contact, Rect, detect};
pub use entity::{
    AidKit, Asteroid, AsteroidTint, Body, Bullet, Decoration, DecorationKind, EntityKind,
    EntityRef, ExplosionStage, Ship,
};
pub use state::{Field, GameEvent, GamePhase, GameState};
pub use tick::{Command, apply_command, tick};
pub use wave::{aid_kits_for_wave, asteroids_for_wave};
