//! Demo player
//!
//! Picks commands from the current state only, so a headless run stays as
//! deterministic as the simulation itself.

use super::state::GameState;
use super::tick::Command;
use crate::center_y;
use crate::consts::*;

/// Commands to apply before the next tick
pub fn commands(state: &GameState) -> Vec<Command> {
    let mut commands = Vec::new();
    if state.is_game_over() {
        return commands;
    }

    let ship = &state.ship;
    let ship_y = center_y(ship.body.pos, ship.body.size);

    if let Some(target_y) = target_y(state) {
        if target_y < ship_y - SHIP_STEP {
            commands.push(Command::MoveUp);
        } else if target_y > ship_y + SHIP_STEP {
            commands.push(Command::MoveDown);
        }
    }

    let any_target = state.asteroids.iter().any(|a| a.is_alive());
    if any_target && state.time_ticks % AUTOPILOT_FIRE_INTERVAL == 0 {
        commands.push(Command::Fire);
    }

    commands
}

/// Nearest aid kit when energy is low, otherwise the nearest live asteroid
fn target_y(state: &GameState) -> Option<i32> {
    let ship_x = state.ship.body.pos.x;

    if state.ship.energy < AUTOPILOT_LOW_ENERGY {
        let kit = state
            .aid_kits
            .iter()
            .min_by_key(|k| (k.body.pos.x - ship_x).abs());
        if let Some(kit) = kit {
            return Some(center_y(kit.body.pos, kit.body.size));
        }
    }

    state
        .asteroids
        .iter()
        .filter(|a| a.is_alive())
        .min_by_key(|a| (a.body.pos.x - ship_x).abs())
        .map(|a| center_y(a.body.pos, a.body.size))
}
