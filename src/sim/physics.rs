//! Reference arcade integrator
//!
//! Stands in for the hosting engine's physics: gravity and velocity
//! integration plus box overlap detection against the ground, the ceiling and
//! the player. The game logic never calls into here; hosts run `step` before
//! each `tick` and hand the contacts over.

use glam::Vec2;

use super::collision::{Boundary, Contact};
use super::entity::Movable;
use super::state::GameState;
use crate::separation;

/// Apply gravity, drag and velocity to every live entity
pub fn integrate(state: &mut GameState, delta_ms: f32) {
    let dt = delta_ms / 1000.0;

    if state.player.is_live() {
        let drag = state.tuning.player_drag_x * dt;
        let body = &mut state.player.body;
        body.vel.y += state.tuning.player_gravity * dt;
        body.vel.x = if body.vel.x.abs() <= drag {
            0.0
        } else {
            body.vel.x - drag * body.vel.x.signum()
        };
        body.pos += body.vel * dt;
    }
    state.player.grounded = false;

    state.obstacles.for_each_live(|_, o| o.body.pos += o.body.vel * dt);
    state.puffs.for_each_live(|_, p| p.body.pos += p.body.vel * dt);
}

/// Report every overlapping pair once
pub fn detect(state: &GameState) -> Vec<Contact> {
    let ground_y = state.tuning.ground_y();
    let ceiling_y = state.tuning.ceiling_y();
    let mut contacts = Vec::new();

    let player = &state.player;
    if player.collides() {
        let body = &player.body;
        if body.bottom() > ground_y {
            contacts.push(Contact::PlayerBoundary {
                boundary: Boundary::Ground,
                penetration: body.bottom() - ground_y,
                point: Vec2::new(body.center().x, ground_y),
            });
        }
        if body.pos.y < ceiling_y {
            contacts.push(Contact::PlayerBoundary {
                boundary: Boundary::Ceiling,
                penetration: ceiling_y - body.pos.y,
                point: Vec2::new(body.center().x, ceiling_y),
            });
        }
    }

    for (slot, obstacle) in state.obstacles.iter_live() {
        if !obstacle.collides() {
            continue;
        }
        let body = &obstacle.body;
        if body.bottom() > ground_y {
            contacts.push(Contact::ObstacleBoundary {
                slot,
                boundary: Boundary::Ground,
                penetration: body.bottom() - ground_y,
            });
        }
        if body.pos.y < ceiling_y {
            contacts.push(Contact::ObstacleBoundary {
                slot,
                boundary: Boundary::Ceiling,
                penetration: ceiling_y - body.pos.y,
            });
        }
        if player.collides() {
            if let Some(push) = separation(player.body.pos, player.body.size, body.pos, body.size) {
                contacts.push(Contact::PlayerObstacle { slot, push });
            }
        }
    }

    contacts
}

/// Integrate then detect
pub fn step(state: &mut GameState, delta_ms: f32) -> Vec<Contact> {
    integrate(state, delta_ms);
    detect(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;

    #[test]
    fn test_gravity_pulls_player_into_ground() {
        let mut state = GameState::new(1, Tuning::default()).unwrap();
        let contacts = step(&mut state, 100.0);

        assert!(state.player.body.vel.y > 0.0);
        assert!(matches!(
            contacts.as_slice(),
            [Contact::PlayerBoundary {
                boundary: Boundary::Ground,
                ..
            }]
        ));
    }

    #[test]
    fn test_drag_bleeds_knockback() {
        let mut state = GameState::new(1, Tuning::default()).unwrap();
        state.player.body.vel.x = -100.0;
        integrate(&mut state, 100.0);
        assert!((state.player.body.vel.x + 60.0).abs() < 0.001);
        integrate(&mut state, 200.0);
        assert_eq!(state.player.body.vel.x, 0.0);
    }

    #[test]
    fn test_dead_player_is_not_integrated() {
        let mut state = GameState::new(1, Tuning::default()).unwrap();
        state.player.kill();
        let before = state.player.body.pos;
        let contacts = step(&mut state, 100.0);
        assert_eq!(state.player.body.pos, before);
        assert!(contacts.is_empty());
    }

    #[test]
    fn test_obstacle_overlap_reported_once() {
        let mut state = GameState::new(1, Tuning::default()).unwrap();
        let start = state.player.body.pos;
        let slot = state
            .obstacles
            .spawn_with(|o| o.spawn(start.x + 20.0, start.y - 4.0, -200.0))
            .unwrap();

        let contacts = detect(&state);
        let pushes: Vec<_> = contacts
            .iter()
            .filter(|c| matches!(c, Contact::PlayerObstacle { .. }))
            .collect();
        assert_eq!(pushes.len(), 1);
        assert!(matches!(
            pushes[0],
            Contact::PlayerObstacle { slot: s, push } if *s == slot && push.x < 0.0
        ));
    }

    #[test]
    fn test_puffs_never_reported() {
        let mut state = GameState::new(1, Tuning::default()).unwrap();
        state.puffs.spawn_with(|p| p.spawn(10.0, -50.0));
        state.player.kill();
        assert!(detect(&state).is_empty());
    }
}
