//! Dungeon entry point
//!
//! Headless demo: generates a level, drops the player in it, traces one
//! frame and prints it as an ASCII depth strip. Pixel drawing and window
//! handling belong to a separate frontend.

use std::process::ExitCode;

use dungeon::Settings;
use dungeon::sim::{GameState, TraceResult, all_creatures_dead};

/// Characters from nearest to farthest
const SHADES: &[u8] = b"@#%*+=-:. ";

fn depth_char(result: &TraceResult<'_>, view_distance: f64) -> char {
    if !result.intercepts.is_empty() {
        return 'M';
    }
    if result.is_unbounded() {
        return ' ';
    }
    let shade = dungeon::sim::projection::shade_factor(result.distance, view_distance);
    let index = (shade * (SHADES.len() - 1) as f64).round() as usize;
    SHADES[index.min(SHADES.len() - 1)] as char
}

fn load_settings() -> Result<Settings, dungeon::SettingsError> {
    match std::env::args().nth(1) {
        Some(path) => Settings::load(path),
        None => Ok(Settings::default()),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Dungeon (native) starting...");

    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let state = match GameState::new(settings) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to start a level: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let settings = &state.settings;
    let world = state.world.read();
    let columns = state.tracer.trace_view(
        &world,
        state.player.position(),
        state.player.view_angle(),
        settings.fov,
        settings.window_width,
        settings.column_width,
    );

    let strip: String = columns
        .iter()
        .map(|c| depth_char(&c.result, settings.view_distance))
        .collect();
    println!("[{}]", strip);
    println!(
        "seed {} | {}x{} map | {} walls | {} creatures | player at {} facing {:.1} | cleared: {}",
        state.seed,
        world.width,
        world.height,
        world.statics().len(),
        world.mobiles().len(),
        state.player.position(),
        state.player.view_angle(),
        all_creatures_dead(&world),
    );
    ExitCode::SUCCESS
}
