//! Putt Hole entry point
//!
//! Headless native driver: plays a few holes with a simple aiming heuristic
//! at a fixed frame time and logs the score as it goes.
//!
//! Usage: putt-hole [seed] [tuning.json]

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;
    use putt_hole::consts::FRAME_MS;
    use putt_hole::sim::{GamePhase, GameState, PointerEvent, TickInput, advance};
    use putt_hole::{GolfError, Tuning};

    const HOLES_TO_PLAY: u32 = 3;
    /// About an hour of play at 16 ms per tick
    const MAX_TICKS: u64 = 225_000;
    /// Misses allowed before the driver moves on to a fresh hole
    const MAX_SHOTS_PER_HOLE: usize = 40;
    /// Launch angles in degrees, tried in turn after each miss
    const LAUNCH_ANGLES: [f32; 5] = [45.0, 60.0, 30.0, 70.0, 20.0];
    /// Power multipliers, advanced once every launch angle has been tried
    const POWER_STEPS: [f32; 5] = [1.0, 0.9, 1.1, 0.75, 1.25];
    const MIN_SHOT_SPEED: f32 = 0.05;
    const MAX_SHOT_SPEED: f32 = 0.6;
    /// Where the simulated pointer goes down
    const PRESS_AT: Vec2 = Vec2::new(0.5, 0.5);

    pub fn run(seed: u64, tuning: Tuning) -> Result<(), GolfError> {
        let mut state = GameState::new(seed, tuning)?;
        log::info!("Game initialized with seed: {}", state.seed());

        let skipped = play(&mut state)?;

        if state.time_ticks >= MAX_TICKS {
            log::warn!("Gave up after {} ticks", state.time_ticks);
        }
        println!("final: {} | skipped {}", state.score.summary(), skipped);

        let d = state.diagnostics;
        log::info!(
            "Diagnostics: {} divergence(s), {} invariant violation(s), {} out-of-bounds reset(s)",
            d.divergences,
            d.invariant_violations,
            d.out_of_bounds_resets
        );
        Ok(())
    }

    /// Play until `HOLES_TO_PLAY` holes are sunk or skipped. Returns the number skipped.
    fn play(state: &mut GameState) -> Result<u32, GolfError> {
        let mut skipped = 0;
        let mut shots_this_hole = 0;

        while state.score.holes_completed + skipped < HOLES_TO_PLAY
            && state.time_ticks < MAX_TICKS
        {
            let input = if state.phase == GamePhase::Still {
                if shots_this_hole >= MAX_SHOTS_PER_HOLE {
                    log::warn!(
                        "No luck on hole {} after {} shots, moving on",
                        state.score.hole_number() + skipped,
                        shots_this_hole
                    );
                    state.next_hole()?;
                    skipped += 1;
                    shots_this_hole = 0;
                    continue;
                }
                let drag = aim(state, shots_this_hole);
                shots_this_hole += 1;
                TickInput::new([
                    PointerEvent::Down(PRESS_AT),
                    PointerEvent::Move(PRESS_AT + drag),
                    PointerEvent::Up(PRESS_AT + drag),
                ])
            } else {
                TickInput::default()
            };

            let completed = state.score.holes_completed;
            advance(state, &input, FRAME_MS)?;
            if state.score.holes_completed > completed {
                println!("{}", state.score.summary());
                shots_this_hole = 0;
            }
        }
        Ok(skipped)
    }

    /// Drag vector for a lob at the hole bottom.
    ///
    /// Each miss moves to the next launch angle; once all angles are used the
    /// power multiplier changes too.
    fn aim(state: &GameState, attempt: usize) -> Vec2 {
        let tuning = &state.tuning;
        let offset = state.hole.hole_bottom - state.ball.pos;

        let angle = LAUNCH_ANGLES[attempt % LAUNCH_ANGLES.len()].to_radians();
        let power = POWER_STEPS[(attempt / LAUNCH_ANGLES.len()) % POWER_STEPS.len()];
        let speed = lob_speed(offset, angle, -tuning.gravity.y).unwrap_or(MAX_SHOT_SPEED);
        let speed = (speed * power).clamp(MIN_SHOT_SPEED, MAX_SHOT_SPEED);

        let direction = Vec2::new(offset.x.signum() * angle.cos(), angle.sin());
        direction * speed / tuning.shot_strength
    }

    /// Launch speed that carries a projectile through `offset` at `angle`,
    /// or `None` when the target sits above that launch line.
    fn lob_speed(offset: Vec2, angle: f32, gravity: f32) -> Option<f32> {
        let dx = offset.x.abs();
        let rise = dx * angle.tan() - offset.y;
        if rise <= 0.0 || gravity <= 0.0 {
            return None;
        }
        Some(dx / angle.cos() * (gravity / (2.0 * rise)).sqrt())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use putt_hole::Tuning;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Putt Hole (headless) starting...");

    let args: Vec<String> = std::env::args().collect();

    let seed = match args.get(1) {
        Some(arg) => match arg.parse::<u64>() {
            Ok(seed) => seed,
            Err(_) => {
                eprintln!("Usage: {} [seed] [tuning.json]", args[0]);
                std::process::exit(2);
            }
        },
        None => std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0),
    };

    let tuning = match args.get(2) {
        Some(path) => match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    if let Err(e) = headless::run(seed, tuning) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts drive `putt_hole::sim::advance` directly from their frame callback
}
