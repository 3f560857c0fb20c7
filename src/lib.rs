//! Dungeon - a ray-marched pseudo-3D maze shooter
//!
//! Core modules:
//! - `sim`: Geometry, collision detection, ray tracing, level generation and
//!   the fixed-rate game tick
//! - `input`: Thread-safe buffering of keyboard/mouse events between ticks
//! - `settings`: Data-driven configuration (map, tracing, view, entities)
//!
//! Pixel drawing, texture loading and window handling live outside this crate
//! and consume [`sim::TraceResult`]s and the [`sim::projection`] helpers.

pub mod input;
pub mod settings;
pub mod sim;

pub use input::{InputBuffer, InputKey};
pub use settings::{Resolution, Settings, SettingsError};

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Full turn in degrees
    pub const FULL_TURN: f64 = 360.0;
    /// Tolerance below which a direction component counts as zero
    pub const ZERO_MARGIN: f64 = 1e-10;
    /// Smallest side a randomized wall may shrink to
    pub const MIN_RANDOM_WALL_SIDE: f64 = 0.2;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(consts::FULL_TURN);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= consts::FULL_TURN {
        0.0
    } else {
        wrapped
    }
}

/// Unit direction for an angle in degrees, measured clockwise from north.
///
/// Map y grows southward, so north is `-y` and east is `+x`.
#[inline]
pub fn heading(angle_degrees: f64) -> DVec2 {
    let radians = angle_degrees.to_radians();
    DVec2::new(radians.sin(), -radians.cos())
}
