//! Procedural level generation
//!
//! A level is a bordered arena: one ring of wall cells around the map edge,
//! randomly scattered interior walls up to a target density, then creatures
//! dropped on free grid points.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collision::first_overlapping;
use super::geometry::Point;
use super::shape::{MobileShape, Shape, StaticShape};
use super::world::World;
use crate::Settings;
use crate::consts::MIN_RANDOM_WALL_SIDE;

/// Level generation failure (only possible with an attempt cap)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("placed {placed} of {target} walls before giving up after {attempts} attempts")]
    WallPlacement {
        placed: usize,
        target: usize,
        attempts: u32,
    },
    #[error("placed {placed} of {target} creatures before giving up after {attempts} attempts")]
    MobPlacement {
        placed: usize,
        target: usize,
        attempts: u32,
    },
}

/// Generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub width: f64,
    pub height: f64,
    /// Fraction of the map area covered by walls (border included)
    pub density: f64,
    pub mob_count: usize,
    pub wall_size: f64,
    /// Place walls off-grid with random sides in `[0.2, wall_size)`
    pub randomize_wall_size: bool,
    pub mob_radius: f64,
    pub mob_height: f64,
    /// Give up after this many consecutive rejected candidates; `None` retries forever
    pub attempt_cap: Option<u32>,
}

impl GeneratorConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            width: settings.map_width,
            height: settings.map_height,
            density: settings.wall_density,
            mob_count: settings.mob_count,
            wall_size: settings.wall_size,
            randomize_wall_size: settings.randomize_wall_size,
            mob_radius: settings.mob_radius,
            mob_height: settings.mob_height,
            attempt_cap: settings.placement_attempt_cap,
        }
    }

    /// Total wall count the interior fill aims for
    pub fn target_walls(&self) -> usize {
        (self.width * self.height * self.density) as usize
    }
}

/// Generate a new level
pub fn generate<R: Rng>(config: &GeneratorConfig, rng: &mut R) -> Result<World, GenerationError> {
    let mut world = World::new(config.width, config.height);
    let mut origins = add_border(&mut world, config.wall_size);
    let border = world.statics().len();

    add_random_walls(&mut world, &mut origins, config, rng)?;
    add_random_mobs(&mut world, config, rng)?;

    log::info!(
        "Generated {}x{} level: {} border walls, {} interior walls, {} creatures",
        config.width,
        config.height,
        border,
        world.statics().len() - border,
        world.mobiles().len()
    );
    Ok(world)
}

/// Exact-equality key for a wall origin
fn origin_key(p: Point) -> (u64, u64) {
    (p.x.to_bits(), p.y.to_bits())
}

/// Ring the map's perimeter cells with walls; returns the occupied origins
pub fn add_border(world: &mut World, wall_size: f64) -> HashSet<(u64, u64)> {
    let cols = world.width as u32;
    let rows = world.height as u32;
    let mut origins = HashSet::new();
    let mut place = |world: &mut World, x: f64, y: f64| {
        if origins.insert(origin_key(Point::new(x, y))) {
            world.add_static(StaticShape::cell(x, y, wall_size));
        }
    };

    let last_row = rows.saturating_sub(1) as f64;
    let last_col = cols.saturating_sub(1) as f64;
    for x in 0..cols {
        place(world, x as f64, 0.0);
        place(world, x as f64, last_row);
    }
    for y in 1..rows.saturating_sub(1) {
        place(world, 0.0, y as f64);
        place(world, last_col, y as f64);
    }
    origins
}

fn add_random_walls<R: Rng>(
    world: &mut World,
    origins: &mut HashSet<(u64, u64)>,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<(), GenerationError> {
    let target = config.target_walls();
    let cols = (config.width as u32).max(1);
    let rows = (config.height as u32).max(1);
    let mut attempts = 0u32;

    while world.statics().len() < target {
        if config.attempt_cap.is_some_and(|cap| attempts >= cap) {
            log::warn!("Wall placement stalled at {}/{}", world.statics().len(), target);
            return Err(GenerationError::WallPlacement {
                placed: world.statics().len(),
                target,
                attempts,
            });
        }
        attempts += 1;

        let origin = if config.randomize_wall_size {
            Point::new(
                rng.random::<f64>() * (config.width - 1.0),
                rng.random::<f64>() * (config.height - 1.0),
            )
        } else {
            Point::new(
                rng.random_range(0..cols) as f64,
                rng.random_range(0..rows) as f64,
            )
        };
        // Only exact origin duplicates are rejected; walls may overlap
        if !origins.insert(origin_key(origin)) {
            continue;
        }

        let mut wall = StaticShape::new(origin, config.wall_size, config.wall_size);
        if config.randomize_wall_size {
            wall.width = rng.random::<f64>() * (wall.width - MIN_RANDOM_WALL_SIDE) + MIN_RANDOM_WALL_SIDE;
            wall.length = rng.random::<f64>() * (wall.length - MIN_RANDOM_WALL_SIDE) + MIN_RANDOM_WALL_SIDE;
        }
        world.add_static(wall);
        attempts = 0;
    }
    Ok(())
}

fn add_random_mobs<R: Rng>(
    world: &mut World,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<(), GenerationError> {
    let cols = (config.width as u32).max(1);
    let rows = (config.height as u32).max(1);
    let mut attempts = 0u32;

    while world.mobiles().len() < config.mob_count {
        if config.attempt_cap.is_some_and(|cap| attempts >= cap) {
            log::warn!("Creature placement stalled at {}/{}", world.mobiles().len(), config.mob_count);
            return Err(GenerationError::MobPlacement {
                placed: world.mobiles().len(),
                target: config.mob_count,
                attempts,
            });
        }
        attempts += 1;

        let center = Point::new(
            rng.random_range(0..cols) as f64,
            rng.random_range(0..rows) as f64,
        );
        let mob = MobileShape::creature(center, config.mob_radius, config.mob_height);
        if !first_overlapping(world, Shape::Mobile(&mob)).is_clear() {
            log::debug!("Rejected creature at {}", center);
            continue;
        }
        world.spawn(mob);
        attempts = 0;
    }
    Ok(())
}
