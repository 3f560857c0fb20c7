//! Game state: the shared world plus everything the tick mutates
//!
//! Given the same seed and input sequence, two states evolve identically.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collision::PlacementError;
use super::combat::{Gun, KillQueue};
use super::mapgen::{GenerationError, GeneratorConfig, generate};
use super::player::{Direction, Player};
use super::shape::EntityId;
use super::tracer::RayTracer;
use super::world::SharedWorld;
use crate::Settings;

/// Failure to set up a level
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("could not place the player: {0}")]
    Respawn(#[from] PlacementError),
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CreatureKilled(EntityId),
    CreatureRemoved(EntityId),
    /// Last living creature is gone; carries the level time in ticks
    LevelCleared { ticks: u64 },
    LevelReset,
    Moved(Direction),
    Blocked(Direction),
}

/// Level clock counted in ticks; freezes once stopped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTimer {
    ticks: u64,
    stopped: bool,
}

impl LevelTimer {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn advance(&mut self) {
        if !self.stopped {
            self.ticks += 1;
        }
    }

    /// Stop the clock; returns false if it was already stopped
    pub fn stop(&mut self) -> bool {
        !std::mem::replace(&mut self.stopped, true)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.ticks
    }

    pub fn elapsed_secs(&self, max_fps: u32) -> f64 {
        self.ticks as f64 / max_fps.max(1) as f64
    }
}

/// Complete game state
#[derive(Debug)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub world: SharedWorld,
    pub player: Player,
    pub gun: Gun,
    pub kill_queue: KillQueue,
    pub tracer: RayTracer,
    pub timer: LevelTimer,
    /// Simulation tick counter
    pub time_ticks: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Generate the first level and place the player
    pub fn new(settings: Settings) -> Result<Self, GameError> {
        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);
        let world = generate(&GeneratorConfig::from_settings(&settings), &mut rng)?;

        let mut player = Player::from_settings(&settings);
        player.respawn(&world, &mut rng, settings.placement_attempt_cap)?;
        log::info!("New game with seed {}", seed);

        Ok(Self {
            gun: Gun::from_settings(&settings),
            kill_queue: KillQueue::new(settings.mob_killing_ticks),
            tracer: RayTracer::from_settings(&settings),
            settings,
            seed,
            rng,
            world: SharedWorld::new(world),
            player,
            timer: LevelTimer::default(),
            time_ticks: 0,
            events: Vec::new(),
        })
    }

    /// Regenerate the level, restart the clock and respawn the player
    pub fn reset_level(&mut self) -> Result<(), GameError> {
        let world = generate(&GeneratorConfig::from_settings(&self.settings), &mut self.rng)?;
        self.player
            .respawn(&world, &mut self.rng, self.settings.placement_attempt_cap)?;
        self.world.replace(world);
        self.kill_queue.clear();
        self.timer.reset();
        self.push_event(GameEvent::LevelReset);
        log::info!("Level reset");
        Ok(())
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events of the most recent tick (plus any pushed since)
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take the pending events; each tick starts from an empty list
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn clear_events(&mut self) {
        self.events.clear();
    }
}
