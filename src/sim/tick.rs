//! Per-tick game loop
//!
//! `tick` runs the timers, then hands control to the handler for the current
//! phase. Within a play tick the order is fixed: input, barrier clamp,
//! contacts, scrolling, pool advancement and scoring, then the lethal check.

use super::collision::{Contact, resolve_contacts};
use super::entity::{Movable, TickContext};
use super::spawn::attempt_spawn;
use super::state::{GameEvent, GamePhase, GameState};

/// Polled input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Propel upward (jetpack burst)
    pub propel: bool,
    /// Confirm / restart from the game-over screen
    pub restart: bool,
}

/// Advance the game state by one step.
///
/// `contacts` are the overlaps the integrator found for this step, `time_ms`
/// is the host's monotonic clock and `delta_ms` the time since the last tick.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    contacts: &[Contact],
    time_ms: f64,
    delta_ms: f32,
) {
    if state.time_ticks == 0 {
        // The first deadline was armed at time 0; rebase it on the host clock
        state.spawner.shift(time_ms - state.time_ms);
    }
    state.time_ms = time_ms;
    state.time_ticks += 1;

    // Timers fire on the tick boundary, before the phase handler
    state.propel_cooldown.expire(time_ms);
    run_spawn_timer(state, time_ms);

    match state.phase {
        GamePhase::Play => tick_play(state, input, contacts, delta_ms),
        GamePhase::PlayerKilled => tick_player_killed(state, contacts, delta_ms),
        GamePhase::GameOver => tick_game_over(state, input, contacts, delta_ms),
        GamePhase::Restart => tick_restart(state),
    }
}

/// Fire the spawn timer if due. Spawning only happens in play, but the timer
/// re-arms in every phase.
fn run_spawn_timer(state: &mut GameState, now: f64) {
    let in_play = state.phase == GamePhase::Play;
    state.spawner.poll(now, in_play, &mut state.rng, |rng| {
        attempt_spawn(&mut state.obstacles, &state.tuning, rng);
    });
}

fn tick_play(state: &mut GameState, input: &TickInput, contacts: &[Contact], delta_ms: f32) {
    if input.propel && !state.propel_cooldown.is_active() {
        propel(state);
    }

    // Player stands still, the world moves
    let barrier_x = state.tuning.barrier_x;
    let body = &mut state.player.body;
    if body.pos.x > barrier_x {
        body.pos.x = barrier_x;
        body.vel.x = 0.0;
    }

    let resolution = resolve_contacts(state, contacts);

    let tuning = &state.tuning;
    state.scroll.advance(
        delta_ms,
        tuning.ground_scroll_speed,
        tuning.far_scroll_speed,
        tuning.scroll_tile_width,
    );

    let passed = advance_pools(state, delta_ms);
    if passed > 0 {
        state.score.increment(u64::from(passed));
        for _ in 0..passed {
            state.push_event(GameEvent::ObstaclePassed);
        }
    }

    let body = &state.player.body;
    let pushed_out = state.tuning.world.is_outside(body.pos, body.size);
    if resolution.lethal || pushed_out {
        enter_player_killed(state);
    }
}

/// Upward burst plus an exhaust puff at the player's trailing edge
fn propel(state: &mut GameState) {
    let now = state.time_ms;
    state.player.body.vel.y = state.tuning.propel_velocity;
    state
        .propel_cooldown
        .start(now, state.tuning.propel_cooldown_ms);

    let body = &state.player.body;
    let puff_size = state.tuning.puff_size;
    let x = body.pos.x - puff_size;
    let y = body.center().y - puff_size / 2.0;
    // Out of puffs: still propel, just without the effect
    state.puffs.spawn_with(|p| p.spawn(x, y));
    state.push_event(GameEvent::Propelled {
        pos: glam::Vec2::new(x, y),
    });
}

/// Entry into `PlayerKilled`: kill the player, then everything falls
fn enter_player_killed(state: &mut GameState) {
    state.player.kill();
    let fall_speed = state.tuning.obstacle_fall_speed;
    state.obstacles.for_each_live(|_, o| o.body.vel.y = fall_speed);
    state.phase = GamePhase::PlayerKilled;
    state.push_event(GameEvent::PlayerKilled);
    log::info!(
        "Player killed at tick {} with score {}",
        state.time_ticks,
        state.score.value()
    );
}

fn tick_player_killed(state: &mut GameState, contacts: &[Contact], delta_ms: f32) {
    resolve_contacts(state, contacts);
    advance_pools(state, delta_ms);

    state.hud.game_over_visible = true;
    state.hud.game_over_text = format!("Game Over\n{}", state.score.text());
    state.game_over_at = Some(state.time_ms);
    state.phase = GamePhase::GameOver;
    state.push_event(GameEvent::GameOver);
}

fn tick_game_over(state: &mut GameState, input: &TickInput, contacts: &[Contact], delta_ms: f32) {
    resolve_contacts(state, contacts);
    advance_pools(state, delta_ms);

    if input.restart && restart_allowed(state) {
        state.phase = GamePhase::Restart;
    }
}

/// Restart is throttled so one held key cannot both kill and restart
fn restart_allowed(state: &GameState) -> bool {
    match state.game_over_at {
        Some(at) => state.time_ms - at > state.tuning.restart_throttle_ms,
        None => true,
    }
}

fn tick_restart(state: &mut GameState) {
    state.reset_player();
    state.obstacles.retire_all();
    state.puffs.retire_all();
    state.score.reset();
    state.propel_cooldown.clear();
    state.hud.game_over_visible = false;
    state.hud.game_over_text.clear();
    state.game_over_at = None;
    state.phase = GamePhase::Play;
    state.push_event(GameEvent::Restarted);
    log::info!("Run restarted at tick {}", state.time_ticks);
}

/// Run every pool's per-tick behaviour; returns obstacles that left the screen
fn advance_pools(state: &mut GameState, delta_ms: f32) -> u32 {
    let ctx = TickContext {
        delta_ms,
        bounds: state.tuning.world,
    };
    state.puffs.advance(&ctx);
    state.obstacles.advance(&ctx)
}
