//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied time only
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod physics;
pub mod pool;
pub mod score;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Boundary, Contact, Resolution, resolve_contacts};
pub use entity::{Body, Liveness, Movable, Obstacle, Player, Puff, TickContext, TickOutcome};
pub use pool::{Pool, SlotId};
pub use score::ScoreTracker;
pub use spawn::{SpawnScheduler, attempt_spawn};
pub use state::{Cooldown, GameEvent, GamePhase, GameState, Hud, Scroll};
pub use tick::{TickInput, tick};
