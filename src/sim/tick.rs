//! Fixed-rate simulation tick
//!
//! Advances the game by one frame of input.

use super::combat::{acquire_target, all_creatures_dead};
use super::player::Direction;
use super::state::{GameError, GameEvent, GameState};
use crate::input::InputKey;

pub use crate::input::TickInput;

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> Result<(), GameError> {
    state.clear_events();
    state.time_ticks += 1;
    state.timer.advance();

    if input.fire {
        fire(state);
    } else {
        state.gun.update();
    }

    for key in &input.held {
        if let Some(direction) = Direction::from_key(*key) {
            step_player(state, direction);
        }
    }

    for key in &input.typed {
        match key {
            InputKey::Shoot => fire(state),
            InputKey::Reset => state.reset_level()?,
            _ => {}
        }
    }

    state.player.turn(input.mouse_dx, state.settings.mouse_sensitivity);

    let removed = state.kill_queue.update(&mut state.world.write());
    for id in removed {
        state.push_event(GameEvent::CreatureRemoved(id));
    }

    let cleared = all_creatures_dead(&state.world.read());
    if cleared && state.timer.stop() {
        let ticks = state.timer.elapsed_ticks();
        log::info!("Level cleared in {} ticks", ticks);
        state.push_event(GameEvent::LevelCleared { ticks });
    }
    Ok(())
}

/// Pull the trigger; an idle gun kills whatever creature it is aimed at
fn fire(state: &mut GameState) {
    if !state.gun.trigger() {
        return;
    }
    let target = acquire_target(
        &state.world.read(),
        &state.tracer,
        state.player.position(),
        state.player.view_angle(),
    );
    if let Some(id) = target
        && state.kill_queue.kill(&mut state.world.write(), id)
    {
        state.push_event(GameEvent::CreatureKilled(id));
    }
}

fn step_player(state: &mut GameState, direction: Direction) {
    let moved = {
        let world = state.world.read();
        state.player.step(&world, direction, state.settings.player_step)
    };
    state.push_event(if moved {
        GameEvent::Moved(direction)
    } else {
        GameEvent::Blocked(direction)
    });
}
