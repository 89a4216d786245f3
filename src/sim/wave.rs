//! Wave pacing and spawning
//!
//! The background is spawned once. Asteroid waves are spawned whenever the
//! live asteroid list runs empty, after a short blinking banner.

use glam::IVec2;
use rand::Rng;

use super::entity::{AidKit, Asteroid, AsteroidTint, Body, Decoration, speed_for_radius};
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Asteroids in wave `wave`
pub fn asteroids_for_wave(wave: u32) -> usize {
    (wave + WAVE_BASE_ASTEROIDS) as usize
}

/// Aid kits in wave `wave`: one, plus one more every third wave, capped
pub fn aid_kits_for_wave(wave: u32) -> usize {
    (1 + wave as usize / 3).min(MAX_AID_KITS_PER_WAVE)
}

/// Spawn the UFO, star dust and stars at seeded-random positions
pub fn spawn_background(state: &mut GameState) {
    let field = state.field;

    let pos = IVec2::new(
        field.random_x(&mut state.rng, UFO_SIZE),
        field.random_y(&mut state.rng, UFO_SIZE),
    );
    state.background.push(Decoration::ufo(pos));

    for speed in 1..=STAR_DUST_COUNT {
        let pos = IVec2::new(
            field.random_x(&mut state.rng, STAR_DUST_SIZE),
            field.random_y(&mut state.rng, STAR_DUST_SIZE),
        );
        state.background.push(Decoration::star_dust(pos, speed));
    }

    for speed in 1..=STAR_COUNT {
        let pos = IVec2::new(
            field.random_x(&mut state.rng, STAR_SIZE),
            field.random_y(&mut state.rng, STAR_SIZE),
        );
        state.background.push(Decoration::star(pos, speed));
    }
}

/// Run one tick of the wave manager. Call only while no asteroids are live.
///
/// For the first `WAVE_INTRO_FRAMES` calls this only advances the banner
/// counter; the call after that spawns the wave.
pub fn advance(state: &mut GameState) -> GameEvent {
    debug_assert!(state.asteroids.is_empty());

    if state.wave_intro_counter < WAVE_INTRO_FRAMES {
        state.wave_intro_counter += 1;
        return GameEvent::WaveIntro {
            wave: state.wave_counter,
            frame: state.wave_intro_counter,
        };
    }

    spawn_wave(state)
}

/// Spawn the pending wave immediately
pub fn spawn_wave(state: &mut GameState) -> GameEvent {
    let wave = state.wave_counter;
    let asteroids = asteroids_for_wave(wave);
    let aid_kits = aid_kits_for_wave(wave);

    for _ in 0..asteroids {
        spawn_asteroid(state);
    }
    // Uncollected kits do not carry over
    state.aid_kits.clear();
    for _ in 0..aid_kits {
        spawn_aid_kit(state);
    }

    state.wave_counter += 1;
    state.wave_intro_counter = 0;
    state.bullets.clear();

    GameEvent::WaveSpawned {
        wave,
        asteroids,
        aid_kits,
    }
}

/// Asteroid entering at the right edge with a random height and radius
fn spawn_asteroid(state: &mut GameState) {
    let field = state.field;
    let radius = state
        .rng
        .random_range(ASTEROID_MIN_RADIUS..ASTEROID_MAX_RADIUS);
    let size = IVec2::splat(radius);
    let pos = IVec2::new(field.max_pos(size).x, field.random_y(&mut state.rng, size));
    let drift = state
        .rng
        .random_range(-ASTEROID_MAX_DRIFT..=ASTEROID_MAX_DRIFT);
    let dir = IVec2::new(-speed_for_radius(radius), drift);
    let tint = if state.rng.random_bool(0.5) {
        AsteroidTint::Red
    } else {
        AsteroidTint::Blue
    };

    let id = state.next_entity_id();
    state
        .asteroids
        .push(Asteroid::new(id, Body::new(pos, dir, size), radius, tint));
}

/// Aid kit somewhere in the left half, never standing still on an axis
fn spawn_aid_kit(state: &mut GameState) {
    let field = state.field;
    let max = field.max_pos(AID_KIT_SIZE);
    let x = state.rng.random_range(0..=max.x / 2);
    let y = state.rng.random_range(0..=max.y);
    let mut dir = IVec2::new(
        state.rng.random_range(-AID_KIT_MAX_SPEED..=AID_KIT_MAX_SPEED),
        state.rng.random_range(-AID_KIT_MAX_SPEED..=AID_KIT_MAX_SPEED),
    );
    if dir.x == 0 {
        dir.x = 1;
    }
    if dir.y == 0 {
        dir.y = 1;
    }

    let id = state.next_entity_id();
    state.aid_kits.push(AidKit::new(id, IVec2::new(x, y), dir));
}
