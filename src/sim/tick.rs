//! Fixed-interval simulation tick
//!
//! Advances the world by one step and returns the events it produced.
//! Input commands are applied between ticks with `apply_command`.

use super::collision::detect;
use super::entity::{EntityKind, EntityRef};
use super::state::{GameEvent, GamePhase, GameState};
use super::wave;
use crate::consts::*;

/// Discrete input commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveUp,
    MoveDown,
    Fire,
    /// Handled by the session, ignored by the simulation
    Quit,
}

/// Apply one input command. Ignored once the game is over.
pub fn apply_command(state: &mut GameState, command: Command) -> Option<GameEvent> {
    if state.phase == GamePhase::GameOver {
        return None;
    }

    match command {
        Command::MoveUp => {
            state.ship.move_up(&state.field);
            None
        }
        Command::MoveDown => {
            state.ship.move_down(&state.field);
            None
        }
        Command::Fire => Some(state.fire()),
        Command::Quit => None,
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState) -> Vec<GameEvent> {
    if state.phase == GamePhase::GameOver {
        return Vec::new();
    }

    let mut events = Vec::new();
    state.time_ticks += 1;

    // Scenery
    for decoration in &mut state.background {
        decoration.update(&state.field, &mut state.rng);
    }

    // Bullets
    for bullet in &mut state.bullets {
        bullet.update();
    }
    let field = state.field;
    state.bullets.retain(|b| !b.is_off_field(&field));

    state.ship.update();
    update_aid_kits(state, &mut events);

    if state.asteroids.is_empty() {
        events.push(wave::advance(state));
    } else {
        update_asteroids(state, &mut events);
    }

    if state.ship.is_destroyed() {
        events.push(state.ship.die());
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver {
            score: state.score,
            waves: state.waves_spawned(),
        });
    }

    events
}

/// Move aid kits and hand any the ship touches over to it
fn update_aid_kits(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let mut i = 0;
    while i < state.aid_kits.len() {
        let kit = &mut state.aid_kits[i];
        kit.update(&state.field);

        let contact = detect(EntityRef::Ship(&state.ship), EntityRef::AidKit(kit));
        if !contact.hit {
            i += 1;
            continue;
        }

        events.extend(contact.event);
        let kit = state.aid_kits.remove(i);
        events.push(GameEvent::AidKitCollected {
            id: kit.id,
            power: kit.power,
        });
        events.extend(state.ship.energy_high(kit.power));
    }
}

/// Move asteroids, remove blown ones, resolve bullet and ship impacts
fn update_asteroids(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let mut i = 0;
    while i < state.asteroids.len() {
        let asteroid = &mut state.asteroids[i];

        if let Some(event) = asteroid.update(&state.field) {
            if matches!(event, GameEvent::AsteroidDestroyed { .. }) {
                state.score += SCORE_PER_ASTEROID;
            }
            events.push(event);
        }
        if asteroid.is_blown() {
            state.asteroids.remove(i);
            continue;
        }

        // First bullet inside the asteroid is absorbed, even mid-explosion
        let rect = asteroid.body.rect();
        if let Some(b) = state
            .bullets
            .iter()
            .position(|bullet| bullet.body.rect().intersects(&rect))
        {
            let contact = detect(
                EntityRef::Bullet(&state.bullets[b]),
                EntityRef::Asteroid(asteroid),
            );
            events.extend(contact.event);
            state.bullets.remove(b);
            if asteroid.start_explosion() {
                events.push(GameEvent::AsteroidHit {
                    id: asteroid.id,
                    by: EntityKind::Bullet,
                });
            }
            i += 1;
            continue;
        }

        let contact = detect(EntityRef::Ship(&state.ship), EntityRef::Asteroid(asteroid));
        events.extend(contact.event);
        if contact.hit && asteroid.is_alive() {
            let power = asteroid.power;
            asteroid.start_explosion();
            events.push(GameEvent::AsteroidHit {
                id: asteroid.id,
                by: EntityKind::Ship,
            });
            events.extend(state.ship.energy_low(power));
        }
        i += 1;
    }
}
