//! Obstacle spawn scheduling
//!
//! A single deadline drives spawning. Every time it passes, one spawn attempt
//! is made (if allowed) and the deadline is pushed out by a fresh random
//! delay, whether or not the attempt succeeded. Re-arming instead of retrying
//! keeps the cadence even when the pool is under pressure.

use rand::Rng;

use super::entity::Obstacle;
use super::pool::{Pool, SlotId};
use crate::Tuning;

/// One-shot spawn timer that always re-arms itself
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    min_delay_ms: f64,
    max_delay_ms: f64,
    /// Absolute time (ms) of the next attempt
    deadline: f64,
    /// Attempts fired so far (successful or not)
    fired: u64,
}

impl SpawnScheduler {
    /// Create an unarmed scheduler; call `schedule_next` to start it
    pub fn new(min_delay_ms: f64, max_delay_ms: f64) -> Self {
        Self {
            min_delay_ms,
            max_delay_ms,
            deadline: f64::INFINITY,
            fired: 0,
        }
    }

    /// Arm the timer `uniform[min, max]` ms after `now`; returns the deadline
    pub fn schedule_next(&mut self, now: f64, rng: &mut impl Rng) -> f64 {
        let delay = rng.random_range(self.min_delay_ms..=self.max_delay_ms);
        self.deadline = now + delay;
        self.deadline
    }

    /// Move an armed deadline by `offset_ms`. An unarmed timer stays unarmed.
    pub fn shift(&mut self, offset_ms: f64) {
        self.deadline += offset_ms;
    }

    #[inline]
    pub fn deadline(&self) -> f64 {
        self.deadline
    }

    #[inline]
    pub fn is_due(&self, now: f64) -> bool {
        now >= self.deadline
    }

    #[inline]
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Fire if due. `attempt` only runs when `enabled`; the timer re-arms
    /// either way. Returns whether the timer fired this call.
    pub fn poll<R: Rng>(
        &mut self,
        now: f64,
        enabled: bool,
        rng: &mut R,
        attempt: impl FnOnce(&mut R),
    ) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.fired += 1;
        if enabled {
            attempt(rng);
        }
        self.schedule_next(now, rng);
        true
    }
}

/// Spawn one obstacle at the right edge of the world at a random height.
///
/// Does nothing (returns `None`) when every slot is already live.
pub fn attempt_spawn(
    obstacles: &mut Pool<Obstacle>,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> Option<SlotId> {
    if obstacles.count_live() >= obstacles.capacity() {
        log::debug!("Obstacle pool exhausted ({}), skipping spawn", obstacles.capacity());
        return None;
    }
    let (top, bottom) = tuning.spawn_band();
    let y = rng.random_range(top..=bottom);
    let x = tuning.world.right();
    let id = obstacles.spawn_with(|o| o.spawn(x, y, -tuning.obstacle_speed))?;
    log::debug!("Spawned obstacle {} at y={y:.0}", id.0);
    Some(id)
}
