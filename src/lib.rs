//! Sky Dodge - A side-scrolling dodge runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pools, spawning, collisions, game phases)
//! - `tuning`: Data-driven game balance loaded from JSON

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (120 Hz)
    pub const SIM_DT_MS: f32 = 1000.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
    /// Ground strip height at the bottom of the world
    pub const GROUND_HEIGHT: f32 = 40.0;
    /// Top of the playable band where obstacles may spawn
    pub const SPAWN_BAND_TOP: f32 = 100.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 100.0;
    pub const PLAYER_SIZE: f32 = 32.0;
    /// Forward barrier the player may not pass during play
    pub const BARRIER_X: f32 = 240.0;
    /// Gravity on the player (pixels/s²)
    pub const PLAYER_GRAVITY: f32 = 300.0;
    /// Upward velocity applied by one propulsion burst (pixels/s)
    pub const PROPEL_VELOCITY: f32 = -250.0;
    pub const PROPEL_COOLDOWN_MS: f64 = 150.0;
    /// Horizontal drag bleeding off knockback (pixels/s²)
    pub const PLAYER_DRAG_X: f32 = 400.0;

    /// Obstacle defaults
    pub const OBSTACLE_CAPACITY: usize = 10;
    pub const OBSTACLE_SIZE: f32 = 40.0;
    pub const OBSTACLE_SPEED: f32 = 200.0;
    /// Fraction of vertical speed kept when bouncing off ground/ceiling
    pub const OBSTACLE_BOUNCE: f32 = 0.4;
    /// Downward velocity given to every obstacle when the player dies
    pub const OBSTACLE_FALL_SPEED: f32 = 300.0;

    /// Spawn delay range (ms)
    pub const SPAWN_DELAY_MIN_MS: f64 = 400.0;
    pub const SPAWN_DELAY_MAX_MS: f64 = 1500.0;

    /// Propulsion puffs (visual only)
    pub const PUFF_CAPACITY: usize = 16;
    pub const PUFF_SIZE: f32 = 12.0;
    pub const PUFF_LIFESPAN_MS: f32 = 400.0;

    /// Restart input is ignored this long after the game-over screen appears
    pub const RESTART_THROTTLE_MS: f64 = 500.0;

    /// Background scroll speeds (pixels/s) and tile width for wrapping
    pub const GROUND_SCROLL_SPEED: f32 = 200.0;
    pub const FAR_SCROLL_SPEED: f32 = 40.0;
    pub const SCROLL_TILE_WIDTH: f32 = 64.0;

    /// Particles emitted when the player hits the ceiling
    pub const DEATH_BURST_PARTICLES: u32 = 24;
}

/// Axis-aligned rectangle in world coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whether a box at `pos` with `size` has completely left this rectangle
    pub fn is_outside(&self, pos: Vec2, size: Vec2) -> bool {
        pos.x + size.x < self.x
            || pos.y + size.y < self.y
            || pos.x > self.right()
            || pos.y > self.bottom()
    }
}

/// Overlap between two boxes as the minimum vector that moves `a` out of `b`.
///
/// Returns `None` when the boxes do not overlap. Ties prefer the horizontal
/// axis, which is how a scrolling obstacle "pushes" the player.
pub fn separation(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> Option<Vec2> {
    let overlap_x = (a_pos.x + a_size.x).min(b_pos.x + b_size.x) - a_pos.x.max(b_pos.x);
    let overlap_y = (a_pos.y + a_size.y).min(b_pos.y + b_size.y) - a_pos.y.max(b_pos.y);
    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return None;
    }

    let a_center = a_pos + a_size * 0.5;
    let b_center = b_pos + b_size * 0.5;
    if overlap_x <= overlap_y {
        let dir = if a_center.x < b_center.x { -1.0 } else { 1.0 };
        Some(Vec2::new(overlap_x * dir, 0.0))
    } else {
        let dir = if a_center.y < b_center.y { -1.0 } else { 1.0 };
        Some(Vec2::new(0.0, overlap_y * dir))
    }
}
