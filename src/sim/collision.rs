//! Collision response
//!
//! The integrator detects overlaps; this module decides what they mean.
//! Obstacles push the player around but never kill directly. The ceiling is
//! lethal, and so is being shoved out of the world (checked by the play
//! handler, not here).

use glam::Vec2;

use super::entity::Movable;
use super::pool::SlotId;
use super::state::{GameEvent, GameState};

/// Static world edges entities can touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Ground,
    Ceiling,
}

/// One overlapping pair reported by the integrator for this tick
#[derive(Debug, Clone, PartialEq)]
pub enum Contact {
    PlayerBoundary {
        boundary: Boundary,
        /// How far the player sank past the boundary
        penetration: f32,
        point: Vec2,
    },
    PlayerObstacle {
        slot: SlotId,
        /// Minimum displacement moving the player out of the obstacle
        push: Vec2,
    },
    ObstacleBoundary {
        slot: SlotId,
        boundary: Boundary,
        penetration: f32,
    },
}

/// Identity of the pair behind a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairKey {
    PlayerBoundary(Boundary),
    PlayerObstacle(SlotId),
    ObstacleBoundary(SlotId, Boundary),
}

impl Contact {
    fn pair(&self) -> PairKey {
        match *self {
            Contact::PlayerBoundary { boundary, .. } => PairKey::PlayerBoundary(boundary),
            Contact::PlayerObstacle { slot, .. } => PairKey::PlayerObstacle(slot),
            Contact::ObstacleBoundary { slot, boundary, .. } => {
                PairKey::ObstacleBoundary(slot, boundary)
            }
        }
    }
}

/// Outcome of resolving one tick's contacts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    /// A lethal contact happened (ceiling hit)
    pub lethal: bool,
}

/// Apply every contact once, in order.
///
/// A pair reported twice in the same tick is only resolved the first time.
/// Contacts involving dead entities are ignored.
pub fn resolve_contacts(state: &mut GameState, contacts: &[Contact]) -> Resolution {
    let mut resolution = Resolution::default();
    let mut seen: Vec<PairKey> = Vec::with_capacity(contacts.len());

    for contact in contacts {
        let key = contact.pair();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);

        match *contact {
            Contact::PlayerBoundary {
                boundary,
                penetration,
                point,
            } => player_boundary(state, boundary, penetration, point, &mut resolution),
            Contact::PlayerObstacle { slot, push } => player_obstacle(state, slot, push),
            Contact::ObstacleBoundary {
                slot,
                boundary,
                penetration,
            } => obstacle_boundary(state, slot, boundary, penetration),
        }
    }

    resolution
}

fn player_boundary(
    state: &mut GameState,
    boundary: Boundary,
    penetration: f32,
    point: Vec2,
    resolution: &mut Resolution,
) {
    if !state.player.is_live() {
        return;
    }
    let body = &mut state.player.body;
    match boundary {
        Boundary::Ground => {
            body.pos.y -= penetration;
            body.vel.y = body.vel.y.min(0.0);
            state.player.grounded = true;
        }
        Boundary::Ceiling => {
            body.pos.y += penetration;
            body.vel.y = body.vel.y.max(0.0);
            resolution.lethal = true;
            let count = state.tuning.death_burst_particles;
            state.push_event(GameEvent::Burst { pos: point, count });
        }
    }
}

fn player_obstacle(state: &mut GameState, slot: SlotId, push: Vec2) {
    if !state.player.is_live() {
        return;
    }
    let Some(obstacle) = state.obstacles.get_live_mut(slot) else {
        return;
    };
    let obstacle_vel = obstacle.body.vel;

    let player = &mut state.player;
    player.body.pos += push;
    if push.x != 0.0 {
        // Carried along only when shoved the way the obstacle travels. A
        // trailing-side contact just separates the two.
        player.body.vel.x = if push.x.signum() == obstacle_vel.x.signum() {
            obstacle_vel.x
        } else {
            0.0
        };
    }
    if push.y < 0.0 {
        // Landed on top
        player.body.vel.y = player.body.vel.y.min(0.0);
        player.grounded = true;
    } else if push.y > 0.0 {
        player.body.vel.y = player.body.vel.y.max(0.0);
    }
}

fn obstacle_boundary(
    state: &mut GameState,
    slot: SlotId,
    boundary: Boundary,
    penetration: f32,
) {
    let bounce = state.tuning.obstacle_bounce;
    let Some(obstacle) = state.obstacles.get_live_mut(slot) else {
        return;
    };
    let body = &mut obstacle.body;
    match boundary {
        Boundary::Ground => {
            body.pos.y -= penetration;
            if body.vel.y > 0.0 {
                body.vel.y = -body.vel.y * bounce;
            }
        }
        Boundary::Ceiling => {
            body.pos.y += penetration;
            if body.vel.y < 0.0 {
                body.vel.y = -body.vel.y * bounce;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::consts::SIM_DT_MS;
    use crate::sim::physics;
    use crate::sim::state::GamePhase;
    use crate::sim::tick::{TickInput, tick};

    fn state_with_obstacle(x: f32, y: f32) -> (GameState, SlotId) {
        let mut state = GameState::new(9, Tuning::default()).unwrap();
        let slot = state
            .obstacles
            .spawn_with(|o| o.spawn(x, y, -200.0))
            .unwrap();
        (state, slot)
    }

    #[test]
    fn test_ground_contact_rests_player() {
        let mut state = GameState::new(1, Tuning::default()).unwrap();
        state.player.body.pos.y += 5.0;
        state.player.body.vel.y = 120.0;

        let contacts = [Contact::PlayerBoundary {
            boundary: Boundary::Ground,
            penetration: 5.0,
            point: Vec2::ZERO,
        }];
        let resolution = resolve_contacts(&mut state, &contacts);

        assert!(!resolution.lethal);
        assert_eq!(state.player.body.pos, state.tuning.player_start());
        assert_eq!(state.player.body.vel.y, 0.0);
        assert!(state.player.grounded);
    }

    #[test]
    fn test_ceiling_contact_is_lethal_and_bursts() {
        let mut state = GameState::new(1, Tuning::default()).unwrap();
        state.player.body.pos.y = -4.0;
        state.player.body.vel.y = -250.0;

        let point = Vec2::new(116.0, 0.0);
        let contacts = [Contact::PlayerBoundary {
            boundary: Boundary::Ceiling,
            penetration: 4.0,
            point,
        }];
        let resolution = resolve_contacts(&mut state, &contacts);

        assert!(resolution.lethal);
        assert_eq!(state.player.body.pos.y, 0.0);
        assert_eq!(state.player.body.vel.y, 0.0);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Burst {
                pos: point,
                count: state.tuning.death_burst_particles
            }]
        );
    }

    #[test]
    fn test_obstacle_pushes_without_killing() {
        let (mut state, slot) = state_with_obstacle(120.0, 520.0);
        let start = state.player.body.pos;

        let contacts = [Contact::PlayerObstacle {
            slot,
            push: Vec2::new(-12.0, 0.0),
        }];
        let resolution = resolve_contacts(&mut state, &contacts);

        assert!(!resolution.lethal);
        assert!(state.player.is_live());
        assert_eq!(state.player.body.pos, start + Vec2::new(-12.0, 0.0));
        assert_eq!(state.player.body.vel.x, -200.0);
    }

    #[test]
    fn test_trailing_contact_does_not_drag_back() {
        // Obstacle already past the player pushes it forward
        let (mut state, slot) = state_with_obstacle(70.0, 520.0);
        let start = state.player.body.pos;
        state.player.body.vel.x = -30.0;

        let contacts = [Contact::PlayerObstacle {
            slot,
            push: Vec2::new(8.0, 0.0),
        }];
        resolve_contacts(&mut state, &contacts);

        assert_eq!(state.player.body.pos, start + Vec2::new(8.0, 0.0));
        assert_eq!(state.player.body.vel.x, 0.0);
    }

    #[test]
    fn test_trailing_obstacle_leaves_player_in_place() {
        // No spawns: only the obstacle overlapping the player's trailing side
        let tuning = Tuning {
            spawn_delay_min_ms: 1.0e9,
            spawn_delay_max_ms: 1.0e9,
            ..Tuning::default()
        };
        let mut state = GameState::new(9, tuning).unwrap();
        state.obstacles.spawn_with(|o| o.spawn(70.0, 520.0, -200.0));
        let start_x = state.player.body.pos.x;

        let mut time = 0.0;
        for _ in 0..2000 {
            time += f64::from(SIM_DT_MS);
            let contacts = physics::step(&mut state, SIM_DT_MS);
            tick(&mut state, &TickInput::default(), &contacts, time, SIM_DT_MS);
        }

        assert_eq!(state.phase, GamePhase::Play);
        assert!(state.player.body.pos.x >= start_x);
        assert_eq!(state.obstacles.count_live(), 0);
    }

    #[test]
    fn test_duplicate_pair_resolved_once() {
        let (mut state, slot) = state_with_obstacle(120.0, 520.0);
        let start = state.player.body.pos;

        let contact = Contact::PlayerObstacle {
            slot,
            push: Vec2::new(-12.0, 0.0),
        };
        resolve_contacts(&mut state, &[contact.clone(), contact]);

        assert_eq!(state.player.body.pos.x, start.x - 12.0);
    }

    #[test]
    fn test_dead_entities_ignored() {
        let (mut state, slot) = state_with_obstacle(120.0, 520.0);
        state.obstacles.retire(slot);
        state.player.kill();
        let player_pos = state.player.body.pos;
        let obstacle_pos = state.obstacles.get(slot).unwrap().body.pos;

        let contacts = [
            Contact::PlayerObstacle {
                slot,
                push: Vec2::new(-12.0, 0.0),
            },
            Contact::PlayerBoundary {
                boundary: Boundary::Ceiling,
                penetration: 2.0,
                point: Vec2::ZERO,
            },
            Contact::ObstacleBoundary {
                slot,
                boundary: Boundary::Ground,
                penetration: 3.0,
            },
        ];
        let resolution = resolve_contacts(&mut state, &contacts);
        assert_eq!(resolution, Resolution::default());
        assert_eq!(state.player.body.pos, player_pos);
        assert_eq!(state.obstacles.get(slot).unwrap().body.pos, obstacle_pos);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_obstacle_bounces_off_ground() {
        let (mut state, slot) = state_with_obstacle(400.0, 522.0);
        state.obstacles.get_mut(slot).unwrap().body.vel.y = 300.0;

        let contacts = [Contact::ObstacleBoundary {
            slot,
            boundary: Boundary::Ground,
            penetration: 2.0,
        }];
        let resolution = resolve_contacts(&mut state, &contacts);

        assert!(!resolution.lethal);
        let body = &state.obstacles.get(slot).unwrap().body;
        assert_eq!(body.pos.y, 520.0);
        assert!((body.vel.y + 300.0 * state.tuning.obstacle_bounce).abs() < 0.001);
        assert_eq!(state.score.value(), 0);
    }
}
