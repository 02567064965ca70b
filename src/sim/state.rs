//! Game state and core simulation types
//!
//! Everything a run mutates lives in `GameState`, owned by the host and
//! discarded when the session ends.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{Movable, Obstacle, Player, Puff};
use super::pool::Pool;
use super::score::ScoreTracker;
use super::spawn::SpawnScheduler;
use crate::{Tuning, TuningError};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Play,
    /// Player just died; shows the game-over display next tick
    PlayerKilled,
    /// Waiting for restart input
    GameOver,
    /// Resetting the run; resumes play next tick
    Restart,
}

/// Cues for the host's display, particle and audio surfaces
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Propulsion burst fired from the player's trailing edge
    Propelled { pos: Vec2 },
    /// An obstacle left the screen and scored
    ObstaclePassed,
    /// Emit `count` decorative particles at `pos`
    Burst { pos: Vec2, count: u32 },
    PlayerKilled,
    GameOver,
    Restarted,
}

/// Display state read by the renderer
#[derive(Debug, Clone, Default)]
pub struct Hud {
    pub game_over_visible: bool,
    pub game_over_text: String,
}

/// Background scroll offsets, wrapped to the tile width
#[derive(Debug, Clone, Copy, Default)]
pub struct Scroll {
    pub ground: f32,
    pub far: f32,
}

impl Scroll {
    pub fn advance(&mut self, delta_ms: f32, ground_speed: f32, far_speed: f32, tile: f32) {
        let dt = delta_ms / 1000.0;
        self.ground = (self.ground + ground_speed * dt).rem_euclid(tile);
        self.far = (self.far + far_speed * dt).rem_euclid(tile);
    }
}

/// Flag that clears itself once its deadline passes
#[derive(Debug, Clone, Copy, Default)]
pub struct Cooldown {
    active: bool,
    expires_at: f64,
}

impl Cooldown {
    pub fn start(&mut self, now: f64, duration_ms: f64) {
        self.active = true;
        self.expires_at = now + duration_ms;
    }

    /// Clear the flag if the deadline has passed
    pub fn expire(&mut self, now: f64) {
        if self.active && now >= self.expires_at {
            self.active = false;
        }
    }

    pub fn clear(&mut self) {
        self.active = false;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    /// Host time of the latest tick (ms)
    pub time_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub obstacles: Pool<Obstacle>,
    pub puffs: Pool<Puff>,
    pub spawner: SpawnScheduler,
    pub score: ScoreTracker,
    pub propel_cooldown: Cooldown,
    /// When the game-over display appeared (throttles restart input)
    pub game_over_at: Option<f64>,
    pub hud: Hud,
    pub scroll: Scroll,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session: pools, live player, zero score and the first
    /// spawn scheduled.
    ///
    /// The first spawn deadline is measured from time 0 here and moved onto
    /// the host clock by the first `tick`. Fails if `tuning` does not
    /// validate, since an empty delay range or spawn band cannot be sampled.
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;

        let player_size = Vec2::splat(tuning.player_size);
        let obstacle_size = Vec2::splat(tuning.obstacle_size);
        let puff_size = Vec2::splat(tuning.puff_size);
        let puff_drift = Vec2::new(-tuning.ground_scroll_speed, 0.0);
        let puff_lifespan = tuning.puff_lifespan_ms;

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Play,
            time_ms: 0.0,
            time_ticks: 0,
            player: Player::new(tuning.player_start(), player_size),
            obstacles: Pool::new(tuning.obstacle_capacity, || Obstacle::new(obstacle_size)),
            puffs: Pool::new(tuning.puff_capacity, || {
                Puff::new(puff_size, puff_drift, puff_lifespan)
            }),
            spawner: SpawnScheduler::new(tuning.spawn_delay_min_ms, tuning.spawn_delay_max_ms),
            score: ScoreTracker::new(),
            propel_cooldown: Cooldown::default(),
            game_over_at: None,
            hud: Hud::default(),
            scroll: Scroll::default(),
            events: Vec::new(),
            tuning,
        };

        state.player.spawn();
        state.spawner.schedule_next(0.0, &mut state.rng);
        Ok(state)
    }

    /// Put the player back on the start line, at rest, and alive
    pub fn reset_player(&mut self) {
        let body = self.player.body_mut();
        body.pos = self.tuning.player_start();
        body.vel = Vec2::ZERO;
        self.player.grounded = false;
        self.player.spawn();
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
