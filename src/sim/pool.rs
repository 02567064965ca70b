//! Fixed-capacity entity pools
//!
//! Slots are allocated once up front and recycled through liveness, so
//! spawning never allocates. Iteration is always in slot order, which keeps
//! the simulation deterministic.

use super::entity::{Movable, TickContext, TickOutcome};

/// Index of a pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub usize);

/// A fixed set of reusable entities of one kind
#[derive(Debug, Clone)]
pub struct Pool<T: Movable> {
    slots: Vec<T>,
}

impl<T: Movable> Pool<T> {
    /// Build a pool of `capacity` dead entities
    pub fn new(capacity: usize, mut make: impl FnMut() -> T) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            let mut entity = make();
            entity.kill();
            slots.push(entity);
        }
        Self { slots }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn count_live(&self) -> usize {
        self.slots.iter().filter(|e| e.is_live()).count()
    }

    pub fn is_full(&self) -> bool {
        self.count_live() >= self.capacity()
    }

    /// First dead slot, or `None` when every slot is live
    pub fn acquire(&self) -> Option<SlotId> {
        self.slots.iter().position(|e| !e.is_live()).map(SlotId)
    }

    /// Acquire a slot and hand it to `spawn`, which must bring it to life
    pub fn spawn_with(&mut self, spawn: impl FnOnce(&mut T)) -> Option<SlotId> {
        let id = self.acquire()?;
        spawn(&mut self.slots[id.0]);
        debug_assert!(self.slots[id.0].is_live(), "spawn_with left slot {} dead", id.0);
        Some(id)
    }

    /// Mark a slot dead. Returns whether it was live.
    pub fn retire(&mut self, id: SlotId) -> bool {
        match self.slots.get_mut(id.0) {
            Some(entity) if entity.is_live() => {
                entity.kill();
                true
            }
            _ => false,
        }
    }

    pub fn retire_all(&mut self) {
        for entity in &mut self.slots {
            entity.kill();
        }
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0)
    }

    /// Live entity in a slot (dead slots read as `None`)
    pub fn get_live_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0).filter(|e| e.is_live())
    }

    /// Visit every live entity in slot order.
    ///
    /// `f` may kill the entity it is visiting; the remaining slots are still
    /// visited.
    pub fn for_each_live(&mut self, mut f: impl FnMut(SlotId, &mut T)) {
        for (i, entity) in self.slots.iter_mut().enumerate() {
            if entity.is_live() {
                f(SlotId(i), entity);
            }
        }
    }

    pub fn iter_live(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_live())
            .map(|(i, e)| (SlotId(i), e))
    }

    /// Run `on_tick` on every live entity; returns how many retired themselves
    pub fn advance(&mut self, ctx: &TickContext) -> u32 {
        let mut retired = 0;
        self.for_each_live(|_, entity| {
            if entity.on_tick(ctx) == TickOutcome::Retired {
                retired += 1;
            }
        });
        retired
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::Rect;
    use crate::sim::entity::Obstacle;

    fn obstacles(capacity: usize) -> Pool<Obstacle> {
        Pool::new(capacity, || Obstacle::new(Vec2::splat(40.0)))
    }

    #[test]
    fn test_new_pool_is_all_dead() {
        let pool = obstacles(4);
        assert_eq!(pool.capacity(), 4);
        assert_eq!(pool.count_live(), 0);
        assert_eq!(pool.acquire(), Some(SlotId(0)));
    }

    #[test]
    fn test_acquire_fails_when_full() {
        let mut pool = obstacles(3);
        for _ in 0..3 {
            assert!(pool.spawn_with(|o| o.spawn(800.0, 200.0, -200.0)).is_some());
        }
        assert!(pool.is_full());
        assert_eq!(pool.acquire(), None);
        assert_eq!(pool.spawn_with(|o| o.spawn(800.0, 200.0, -200.0)), None);
        assert_eq!(pool.count_live(), 3);
    }

    #[test]
    fn test_retire_is_idempotent() {
        let mut pool = obstacles(2);
        let id = pool.spawn_with(|o| o.spawn(800.0, 200.0, -200.0)).unwrap();
        assert!(pool.retire(id));
        assert!(!pool.retire(id));
        assert!(!pool.retire(SlotId(99)));
        assert_eq!(pool.count_live(), 0);
        // Retired slot is reused first
        assert_eq!(pool.acquire(), Some(id));
    }

    #[test]
    fn test_for_each_live_survives_self_retirement() {
        let mut pool = obstacles(5);
        for _ in 0..5 {
            pool.spawn_with(|o| o.spawn(800.0, 200.0, -200.0));
        }

        let mut visited = Vec::new();
        pool.for_each_live(|id, o| {
            visited.push(id);
            if id.0 % 2 == 0 {
                o.kill();
            }
        });

        assert_eq!(visited.len(), 5);
        assert_eq!(pool.count_live(), 2);
        let live: Vec<_> = pool.iter_live().map(|(id, _)| id).collect();
        assert_eq!(live, vec![SlotId(1), SlotId(3)]);
    }

    #[test]
    fn test_advance_counts_retirements() {
        let mut pool = obstacles(3);
        pool.spawn_with(|o| o.spawn(-100.0, 200.0, -200.0));
        pool.spawn_with(|o| o.spawn(400.0, 200.0, -200.0));
        pool.spawn_with(|o| o.spawn(-41.0, 200.0, -200.0));

        let ctx = TickContext {
            delta_ms: 8.0,
            bounds: Rect::new(0.0, 0.0, 800.0, 600.0),
        };
        assert_eq!(pool.advance(&ctx), 2);
        assert_eq!(pool.count_live(), 1);
        assert_eq!(pool.advance(&ctx), 0);
    }
}
