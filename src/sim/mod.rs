//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Geometry and the two shape kinds
//! - Collision queries over a world snapshot
//! - Ray marching and projection math for the column renderer
//! - Level generation and the fixed-rate tick
//!
//! Given a seed and an input sequence, the simulation is reproducible.

pub mod collision;
pub mod combat;
pub mod geometry;
pub mod mapgen;
pub mod player;
pub mod projection;
pub mod shape;
pub mod state;
pub mod tick;
pub mod tracer;
pub mod world;

pub use collision::{
    Contact, PlacementError, circle_rect_overlap, circles_overlap, find_free_spot,
    first_containing, first_overlapping, rects_overlap, try_find_free_spot,
};
pub use combat::{Gun, GunPhase, KillQueue, acquire_target, all_creatures_dead};
pub use geometry::Point;
pub use mapgen::{GenerationError, GeneratorConfig, generate};
pub use player::{Direction, Player};
pub use shape::{EntityId, Lifecycle, MobileShape, Shape, StaticShape};
pub use state::{GameError, GameEvent, GameState, LevelTimer};
pub use tick::{TickInput, tick};
pub use tracer::{ColumnTrace, Intercept, RayTracer, TraceResult, UNBOUNDED};
pub use world::{SharedWorld, World};
