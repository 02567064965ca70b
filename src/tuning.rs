//! Game balance and world layout
//!
//! Every number the simulation reads lives here so a run can be retuned from a
//! JSON file without recompiling. Missing fields fall back to `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Rect;
use crate::consts::*;

/// Errors raised while loading or validating a tuning file
#[derive(Error, Debug)]
pub enum TuningError {
    /// The file could not be read
    #[error("Failed to read tuning file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid tuning JSON
    #[error("Malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range
    #[error("Invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    /// Visible world bounds; obstacles leaving past `x` retire
    pub world: Rect,
    /// Height of the ground strip at the bottom of the world
    pub ground_height: f32,
    /// Highest y an obstacle may spawn at
    pub spawn_band_top: f32,

    // === Player ===
    pub player_start_x: f32,
    pub player_size: f32,
    /// Maximum forward x during play
    pub barrier_x: f32,
    pub player_gravity: f32,
    /// Vertical velocity applied by one propulsion burst
    pub propel_velocity: f32,
    pub propel_cooldown_ms: f64,
    /// Horizontal deceleration applied by the reference integrator
    pub player_drag_x: f32,

    // === Obstacles ===
    pub obstacle_capacity: usize,
    pub obstacle_size: f32,
    pub obstacle_speed: f32,
    pub obstacle_bounce: f32,
    pub obstacle_fall_speed: f32,
    pub spawn_delay_min_ms: f64,
    pub spawn_delay_max_ms: f64,

    // === Propulsion puffs ===
    pub puff_capacity: usize,
    pub puff_size: f32,
    pub puff_lifespan_ms: f32,

    // === Flow ===
    pub restart_throttle_ms: f64,
    pub ground_scroll_speed: f32,
    pub far_scroll_speed: f32,
    pub scroll_tile_width: f32,
    pub death_burst_particles: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world: Rect::new(0.0, 0.0, WORLD_WIDTH, WORLD_HEIGHT),
            ground_height: GROUND_HEIGHT,
            spawn_band_top: SPAWN_BAND_TOP,

            player_start_x: PLAYER_START_X,
            player_size: PLAYER_SIZE,
            barrier_x: BARRIER_X,
            player_gravity: PLAYER_GRAVITY,
            propel_velocity: PROPEL_VELOCITY,
            propel_cooldown_ms: PROPEL_COOLDOWN_MS,
            player_drag_x: PLAYER_DRAG_X,

            obstacle_capacity: OBSTACLE_CAPACITY,
            obstacle_size: OBSTACLE_SIZE,
            obstacle_speed: OBSTACLE_SPEED,
            obstacle_bounce: OBSTACLE_BOUNCE,
            obstacle_fall_speed: OBSTACLE_FALL_SPEED,
            spawn_delay_min_ms: SPAWN_DELAY_MIN_MS,
            spawn_delay_max_ms: SPAWN_DELAY_MAX_MS,

            puff_capacity: PUFF_CAPACITY,
            puff_size: PUFF_SIZE,
            puff_lifespan_ms: PUFF_LIFESPAN_MS,

            restart_throttle_ms: RESTART_THROTTLE_MS,
            ground_scroll_speed: GROUND_SCROLL_SPEED,
            far_scroll_speed: FAR_SCROLL_SPEED,
            scroll_tile_width: SCROLL_TILE_WIDTH,
            death_burst_particles: DEATH_BURST_PARTICLES,
        }
    }
}

impl Tuning {
    /// Top edge of the ground strip
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.world.bottom() - self.ground_height
    }

    /// Top edge of the world, where the lethal ceiling sits
    #[inline]
    pub fn ceiling_y(&self) -> f32 {
        self.world.y
    }

    /// Player spawn point (standing on the ground)
    pub fn player_start(&self) -> glam::Vec2 {
        glam::Vec2::new(self.player_start_x, self.ground_y() - self.player_size)
    }

    /// Vertical range obstacles spawn in: (top, bottom) of their top-left y
    pub fn spawn_band(&self) -> (f32, f32) {
        (self.spawn_band_top, self.ground_y() - self.obstacle_size)
    }

    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a tuning file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load a tuning file, falling back to defaults when absent or broken
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default tuning");
            return Self::default();
        };
        match Self::from_file(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("{e} - using default tuning");
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
            TuningError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if self.world.width <= 0.0 || self.world.height <= 0.0 {
            return Err(invalid("world", "width and height must be positive"));
        }
        if self.obstacle_capacity == 0 {
            return Err(invalid("obstacle_capacity", "must be at least 1"));
        }
        if self.puff_capacity == 0 {
            return Err(invalid("puff_capacity", "must be at least 1"));
        }
        if self.spawn_delay_min_ms < 0.0 || self.spawn_delay_min_ms > self.spawn_delay_max_ms {
            return Err(invalid(
                "spawn_delay_min_ms",
                format!(
                    "{} must be within 0..={}",
                    self.spawn_delay_min_ms, self.spawn_delay_max_ms
                ),
            ));
        }
        let (top, bottom) = self.spawn_band();
        if top > bottom {
            return Err(invalid(
                "spawn_band_top",
                format!("band {top}..{bottom} is empty"),
            ));
        }
        if self.barrier_x < self.world.x || self.barrier_x > self.world.right() {
            return Err(invalid("barrier_x", "must lie inside the world"));
        }
        if self.scroll_tile_width <= 0.0 {
            return Err(invalid("scroll_tile_width", "must be positive"));
        }
        Ok(())
    }
}
