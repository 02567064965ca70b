//! Sky Dodge entry point
//!
//! Headless runner: drives the simulation with the reference integrator at a
//! fixed timestep and a simple autopilot, logging what happens.
//!
//! Usage: `sky-dodge [tuning.json] [seconds] [seed]`

use std::path::PathBuf;

use sky_dodge::{Tuning, TuningError};
use sky_dodge::consts::*;
use sky_dodge::sim::{GameEvent, GamePhase, GameState, TickInput, physics, tick};

/// Fixed-timestep host loop around the simulation
struct Game {
    state: GameState,
    accumulator: f32,
    /// Simulation clock (ms)
    time: f64,
    input: TickInput,
    runs: u32,
    best_score: u64,
}

impl Game {
    fn new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        Ok(Self {
            state: GameState::new(seed, tuning)?,
            accumulator: 0.0,
            time: 0.0,
            input: TickInput::default(),
            runs: 1,
            best_score: 0,
        })
    }

    /// Autopilot: hop off the ground or when an obstacle is closing in
    fn poll_input(&mut self) {
        let player = &self.state.player.body;
        let threatened = self.state.obstacles.iter_live().any(|(_, o)| {
            let gap = o.body.pos.x - (player.pos.x + player.size.x);
            gap > 0.0 && gap < 80.0 && o.body.bottom() > player.pos.y
        });
        let low = self.state.player.grounded
            || player.pos.y > self.state.tuning.ground_y() - 3.0 * player.size.y;
        self.input.propel = low || (threatened && player.pos.y > 200.0);
        self.input.restart = self.state.phase == GamePhase::GameOver;
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, frame_ms: f32) {
        let frame_ms = frame_ms.min(100.0);
        self.accumulator += frame_ms;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            self.time += f64::from(SIM_DT_MS);
            self.poll_input();
            let contacts = physics::step(&mut self.state, SIM_DT_MS);
            tick(&mut self.state, &self.input, &contacts, self.time, SIM_DT_MS);
            self.accumulator -= SIM_DT_MS;
            substeps += 1;

            for event in self.state.drain_events() {
                self.handle_event(event);
            }
        }
    }

    fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::GameOver => {
                let score = self.state.score.value();
                self.best_score = self.best_score.max(score);
                log::info!("Run {} over: {}", self.runs, self.state.score.text());
            }
            GameEvent::Restarted => {
                self.runs += 1;
            }
            GameEvent::Burst { pos, count } => {
                log::debug!("Burst of {count} particles at ({:.0}, {:.0})", pos.x, pos.y);
            }
            GameEvent::ObstaclePassed | GameEvent::Propelled { .. } | GameEvent::PlayerKilled => {}
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Sky Dodge (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning_path = args.next().map(PathBuf::from);
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60.0);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(0x5eed);

    let tuning = Tuning::load(tuning_path.as_deref());
    let mut game = match Game::new(seed, tuning) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Cannot start: {e}");
            std::process::exit(1);
        }
    };
    log::info!("Game initialized with seed: {}", seed);

    // Simulated 60 Hz display
    let frame_ms = 1000.0 / 60.0;
    let frames = (seconds * 1000.0 / frame_ms) as u32;
    for _ in 0..frames {
        game.update(frame_ms);
    }

    let best = game.best_score.max(game.state.score.value());
    println!(
        "{} run(s) in {:.0}s, best score {}, {} spawn attempts",
        game.runs,
        game.time / 1000.0,
        best,
        game.state.spawner.fired()
    );
}
