//! Game settings
//!
//! Everything tunable lives here: view geometry, tracing, map generation,
//! entity sizes and timings. Settings load from JSON; missing fields fall
//! back to the 1280x1024 profile.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings loading or validation failure
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Window size preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Resolution {
    #[default]
    Wide1280x1024,
    Classic800x600,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Wide1280x1024 => "1280x1024",
            Resolution::Classic800x600 => "800x600",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "1280x1024" | "wide" => Some(Resolution::Wide1280x1024),
            "800x600" | "classic" => Some(Resolution::Classic800x600),
            _ => None,
        }
    }

    /// Window size in pixels
    pub fn window_size(&self) -> (u32, u32) {
        match self {
            Resolution::Wide1280x1024 => (1280, 1024),
            Resolution::Classic800x600 => (800, 600),
        }
    }

    /// Width in pixels of one traced column
    pub fn column_width(&self) -> u32 {
        match self {
            Resolution::Wide1280x1024 => 10,
            Resolution::Classic800x600 => 5,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub resolution: Resolution,

    // === View ===
    pub window_width: u32,
    pub window_height: u32,
    /// Field of view (degrees)
    pub fov: f64,
    /// Pixels per traced column
    pub column_width: u32,
    /// Distance from the eye to the projection plane
    pub screen_distance: f64,
    /// Maximum ray length (map units)
    pub view_distance: f64,
    /// Ray marching increment (map units)
    pub tracing_step: f64,

    // === Map ===
    pub map_width: f64,
    pub map_height: f64,
    /// Fraction of the map covered by walls
    pub wall_density: f64,
    pub wall_size: f64,
    pub randomize_wall_size: bool,
    pub mob_count: usize,
    pub mob_radius: f64,
    pub mob_height: f64,
    /// Consecutive rejected placements before giving up; `None` never gives up
    pub placement_attempt_cap: Option<u32>,

    // === Player ===
    pub player_radius: f64,
    pub player_height: f64,
    /// Distance covered per movement tick
    pub player_step: f64,
    /// Degrees turned per pixel of mouse motion
    pub mouse_sensitivity: f64,

    // === Timings (ticks) ===
    pub gun_shooting_ticks: u32,
    pub gun_reloading_ticks: u32,
    /// Ticks a shot creature lingers before it is removed
    pub mob_killing_ticks: u32,
    pub max_fps: u32,

    /// Fixed RNG seed; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_resolution(Resolution::default())
    }
}

impl Settings {
    /// Defaults for a window size preset
    pub fn from_resolution(resolution: Resolution) -> Self {
        let (window_width, window_height) = resolution.window_size();
        Self {
            resolution,

            window_width,
            window_height,
            fov: 60.0,
            column_width: resolution.column_width(),
            screen_distance: 1.0,
            view_distance: 20.0,
            tracing_step: 0.06,

            map_width: 20.0,
            map_height: 20.0,
            wall_density: 0.3,
            wall_size: 1.0,
            randomize_wall_size: false,
            mob_count: 10,
            mob_radius: 0.3,
            mob_height: 0.5,
            placement_attempt_cap: None,

            player_radius: 0.3,
            player_height: 0.5,
            player_step: 0.2,
            mouse_sensitivity: 0.5,

            gun_shooting_ticks: 2,
            gun_reloading_ticks: 6,
            mob_killing_ticks: 15,
            max_fps: 50,

            seed: None,
        }
    }

    /// Switch window size preset (updates resolution-dependent fields)
    pub fn apply_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
        (self.window_width, self.window_height) = resolution.window_size();
        self.column_width = resolution.column_width();
    }

    /// Parse and validate settings from JSON
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.tracing_step > 0.0) {
            return invalid("tracing_step", "must be positive");
        }
        if !(self.view_distance > 0.0) {
            return invalid("view_distance", "must be positive");
        }
        if self.map_width < 2.0 || self.map_height < 2.0 {
            return invalid("map_width", "map must be at least 2x2");
        }
        if !(0.0..=1.0).contains(&self.wall_density) {
            return invalid("wall_density", "must lie in [0, 1]");
        }
        if self.mob_radius < 0.0 || self.player_radius < 0.0 {
            return invalid("mob_radius", "radii must not be negative");
        }
        if self.window_width == 0 || self.column_width == 0 {
            return invalid("column_width", "window and column widths must be positive");
        }
        if self.max_fps == 0 {
            return invalid("max_fps", "must be positive");
        }
        Ok(())
    }

    /// Wall-clock duration of one tick
    pub fn tick_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.max_fps as f64)
    }
}

fn invalid(field: &'static str, reason: &'static str) -> Result<(), SettingsError> {
    Err(SettingsError::Invalid { field, reason })
}
