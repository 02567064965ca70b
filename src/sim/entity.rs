//! Movable entities: the player, obstacles and propulsion puffs
//!
//! Every entity carries a `Body` (box, velocity, liveness) and implements
//! `Movable`, the only interface pools and the integrator work against.
//! Visibility and collision participation are derived from liveness, so a
//! dead entity can never be drawn or collide.

use glam::Vec2;

use crate::Rect;

/// Pooled-entity liveness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Liveness {
    Live,
    #[default]
    Dead,
}

/// Shared physical state of every movable entity
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Top-left corner of the box (y grows downward)
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    liveness: Liveness,
}

impl Body {
    /// A dead body of the given size at the origin
    pub fn new(size: Vec2) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size,
            liveness: Liveness::Dead,
        }
    }

    #[inline]
    pub fn liveness(&self) -> Liveness {
        self.liveness
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.liveness == Liveness::Live
    }

    /// Drawn only while live
    #[inline]
    pub fn visible(&self) -> bool {
        self.is_live()
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    fn activate(&mut self) {
        self.liveness = Liveness::Live;
    }

    fn deactivate(&mut self) {
        self.liveness = Liveness::Dead;
    }
}

/// Per-tick context handed to `Movable::on_tick`
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    pub delta_ms: f32,
    pub bounds: Rect,
}

/// What an entity did to itself during `on_tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Kept,
    /// The entity retired itself this tick
    Retired,
}

/// Capability interface shared by every entity kind
pub trait Movable {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    fn is_live(&self) -> bool {
        self.body().is_live()
    }

    /// Mark dead. Killing a dead entity changes nothing.
    fn kill(&mut self) {
        self.body_mut().deactivate();
    }

    /// Whether this entity currently takes part in collision detection
    fn collides(&self) -> bool {
        self.is_live()
    }

    /// Self-driven per-tick behaviour (exit checks, lifespans)
    fn on_tick(&mut self, _ctx: &TickContext) -> TickOutcome {
        TickOutcome::Kept
    }
}

/// The player-controlled runner
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    /// Standing on the ground or an obstacle this tick. Hosts read it to
    /// pick run or hover animation and for input assists.
    pub grounded: bool,
}

impl Player {
    /// Players start off dead, like every other entity
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        let mut body = Body::new(size);
        body.pos = pos;
        Self {
            body,
            grounded: false,
        }
    }

    /// Bring the player to life. Position is the caller's business.
    pub fn spawn(&mut self) {
        self.body.activate();
    }
}

impl Movable for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

/// Obstacles fly at the player, and the player needs to dodge them
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub body: Body,
}

impl Obstacle {
    pub fn new(size: Vec2) -> Self {
        Self {
            body: Body::new(size),
        }
    }

    pub fn spawn(&mut self, x: f32, y: f32, velocity_x: f32) {
        self.body.activate();
        self.body.pos = Vec2::new(x, y);
        // A previous collision may have left vertical velocity on this slot
        self.body.vel = Vec2::new(velocity_x, 0.0);
    }
}

impl Movable for Obstacle {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Retire once fully past the left edge of the world
    fn on_tick(&mut self, ctx: &TickContext) -> TickOutcome {
        if self.is_live() && self.body.pos.x + self.body.size.x < ctx.bounds.x {
            self.kill();
            return TickOutcome::Retired;
        }
        TickOutcome::Kept
    }
}

/// Propulsion exhaust puff (visual only)
#[derive(Debug, Clone)]
pub struct Puff {
    pub body: Body,
    /// Velocity given on spawn (drifts with the scrolling world)
    pub drift: Vec2,
    pub age_ms: f32,
    pub lifespan_ms: f32,
}

impl Puff {
    pub fn new(size: Vec2, drift: Vec2, lifespan_ms: f32) -> Self {
        Self {
            body: Body::new(size),
            drift,
            age_ms: 0.0,
            lifespan_ms,
        }
    }

    pub fn spawn(&mut self, x: f32, y: f32) {
        self.body.activate();
        self.body.pos = Vec2::new(x, y);
        self.body.vel = self.drift;
        self.age_ms = 0.0;
    }

    /// Remaining life in [0, 1] (for fading)
    pub fn life(&self) -> f32 {
        if self.lifespan_ms <= 0.0 {
            return 0.0;
        }
        (1.0 - self.age_ms / self.lifespan_ms).clamp(0.0, 1.0)
    }
}

impl Movable for Puff {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn collides(&self) -> bool {
        false
    }

    fn on_tick(&mut self, ctx: &TickContext) -> TickOutcome {
        if !self.is_live() {
            return TickOutcome::Kept;
        }
        self.age_ms += ctx.delta_ms;
        if self.age_ms >= self.lifespan_ms {
            self.kill();
            return TickOutcome::Retired;
        }
        TickOutcome::Kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(delta_ms: f32) -> TickContext {
        TickContext {
            delta_ms,
            bounds: Rect::new(0.0, 0.0, 800.0, 600.0),
        }
    }

    #[test]
    fn test_obstacle_spawn_clears_vertical_velocity() {
        let mut obstacle = Obstacle::new(Vec2::splat(40.0));
        obstacle.body.vel = Vec2::new(-50.0, 120.0);

        obstacle.spawn(800.0, 200.0, -200.0);
        assert_eq!(obstacle.body.liveness(), Liveness::Live);
        assert_eq!(obstacle.body.pos, Vec2::new(800.0, 200.0));
        assert_eq!(obstacle.body.vel, Vec2::new(-200.0, 0.0));
        assert!(obstacle.body.visible());
        assert!(obstacle.collides());
    }

    #[test]
    fn test_obstacle_retires_once_past_left_edge() {
        let mut obstacle = Obstacle::new(Vec2::splat(40.0));
        obstacle.spawn(-39.0, 200.0, -200.0);
        assert_eq!(obstacle.on_tick(&ctx(8.0)), TickOutcome::Kept);

        obstacle.body.pos.x = -41.0;
        assert_eq!(obstacle.on_tick(&ctx(8.0)), TickOutcome::Retired);
        assert!(!obstacle.is_live());
        assert!(!obstacle.body.visible());
        assert!(!obstacle.collides());

        // Already dead: the exit fires only once
        assert_eq!(obstacle.on_tick(&ctx(8.0)), TickOutcome::Kept);
    }

    #[test]
    fn test_player_spawn_keeps_position() {
        let mut player = Player::new(Vec2::new(50.0, 400.0), Vec2::splat(32.0));
        assert!(!player.is_live());
        player.spawn();
        assert!(player.is_live());
        assert_eq!(player.body.pos, Vec2::new(50.0, 400.0));
        player.kill();
        player.kill();
        assert!(!player.is_live());
    }

    #[test]
    fn test_puff_never_collides_and_expires() {
        let mut puff = Puff::new(Vec2::splat(12.0), Vec2::new(-200.0, 0.0), 400.0);
        puff.spawn(90.0, 300.0);
        assert!(puff.is_live());
        assert!(!puff.collides());
        assert_eq!(puff.body.vel, Vec2::new(-200.0, 0.0));

        assert_eq!(puff.on_tick(&ctx(200.0)), TickOutcome::Kept);
        assert!((puff.life() - 0.5).abs() < 0.001);
        assert_eq!(puff.on_tick(&ctx(200.0)), TickOutcome::Retired);
        assert!(!puff.is_live());
    }
}
