//! Per-frame simulation step
//!
//! The host calls [`advance`] once per animation frame with the pointer
//! events gathered since the last frame and the elapsed milliseconds.
//! Gameplay and the celebration never run in the same tick.

use glam::Vec2;

use super::celebration::{Celebration, CelebrationStatus};
use super::physics::{StepOutcome, step_ball};
use super::state::{AimState, GamePhase, GameState};
use crate::error::GolfError;

/// Pointer input in normalized `[0, 1] x [0, 1]` coordinates, origin bottom-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up(Vec2),
}

/// Input for a single tick, applied in order before the simulation runs
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub events: Vec<PointerEvent>,
}

impl TickInput {
    pub fn new(events: impl IntoIterator<Item = PointerEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

/// Advance the game by `delta_ms` milliseconds of host time.
///
/// Only fails if a new hole cannot be generated after a celebration, which
/// means the tuning is unusable.
pub fn advance(state: &mut GameState, input: &TickInput, delta_ms: f32) -> Result<(), GolfError> {
    state.time_ticks += 1;

    for event in &input.events {
        handle_pointer(state, *event);
    }

    if state.phase == GamePhase::Celebrating {
        return advance_celebration(state, delta_ms);
    }

    if state.phase == GamePhase::Rolling {
        let delta = delta_ms * state.tuning.game_speed;
        let outcome = step_ball(&mut state.ball, &state.hole, &state.tuning, delta);
        settle(state, outcome);
    }

    if state.phase == GamePhase::Still && state.ball_in_hole() {
        state.score.record_hole();
        state.celebration = Some(Celebration::new());
        state.phase = GamePhase::Celebrating;
        log::info!("Hole sunk! {}", state.score.summary());
    }

    Ok(())
}

/// Apply a pointer event if the current phase accepts it
fn handle_pointer(state: &mut GameState, event: PointerEvent) {
    match (state.phase, event) {
        (GamePhase::Still, PointerEvent::Down(pos)) => {
            state.aim = Some(AimState::new(pos));
            state.phase = GamePhase::Aiming;
        }
        (GamePhase::Aiming, PointerEvent::Move(pos)) => {
            if let Some(aim) = state.aim.as_mut() {
                aim.current = pos;
            }
        }
        (GamePhase::Aiming, PointerEvent::Up(pos)) => {
            let Some(aim) = state.aim.take() else {
                state.phase = GamePhase::Still;
                return;
            };
            let velocity = state.tuning.shot_strength * (pos - aim.start);
            state.ball.shoot(velocity);
            state.score.record_shot();
            state.phase = GamePhase::Rolling;
            log::info!(
                "Shot {} with velocity ({:.3}, {:.3})",
                state.score.shots_total,
                velocity.x,
                velocity.y
            );
        }
        _ => {}
    }
}

/// Turn a physics outcome into phase changes and diagnostics
fn settle(state: &mut GameState, outcome: StepOutcome) {
    match outcome {
        StepOutcome::Idle | StepOutcome::Moving => return,
        StepOutcome::CameToRest => {
            log::debug!("Ball at rest at ({:.3}, {:.3})", state.ball.pos.x, state.ball.pos.y);
        }
        StepOutcome::OutOfBounds => {
            state.diagnostics.out_of_bounds_resets += 1;
            log::debug!("Ball left the screen, back to the tee");
        }
        StepOutcome::Diverged(e) => {
            state.diagnostics.divergences += 1;
            log::warn!(
                "{} at ({:.4}, {:.4}); forcing ball to rest",
                e,
                state.ball.pos.x,
                state.ball.pos.y
            );
        }
        StepOutcome::InvariantViolation(e) => {
            state.diagnostics.invariant_violations += 1;
            log::error!("Terrain invariant broken: {}; ball reset to the tee", e);
        }
    }
    state.phase = GamePhase::Still;
}

fn advance_celebration(state: &mut GameState, delta_ms: f32) -> Result<(), GolfError> {
    let celebration = state.celebration.get_or_insert_with(Celebration::new);
    if celebration.advance(delta_ms, &mut state.rng, &state.tuning) == CelebrationStatus::Finished {
        state.celebration = None;
        state.next_hole()?;
        state.phase = GamePhase::Still;
        log::debug!("Celebration over, starting hole {}", state.score.hole_number());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::sim::state::BallState;
    use crate::tuning::Tuning;

    fn shot(from: Vec2, to: Vec2) -> TickInput {
        TickInput::new([
            PointerEvent::Down(from),
            PointerEvent::Move(to),
            PointerEvent::Up(to),
        ])
    }

    #[test]
    fn test_aim_and_shoot() {
        let mut state = GameState::new(12345, Tuning::default()).unwrap();
        let start = Vec2::new(0.3, 0.6);

        advance(&mut state, &TickInput::new([PointerEvent::Down(start)]), 0.0).unwrap();
        assert_eq!(state.phase, GamePhase::Aiming);

        let drag_to = Vec2::new(0.35, 0.7);
        advance(&mut state, &TickInput::new([PointerEvent::Move(drag_to)]), FRAME_MS).unwrap();
        assert_eq!(state.phase, GamePhase::Aiming);
        assert_eq!(state.aim.unwrap().current, drag_to);
        // Aiming doesn't move the ball
        assert_eq!(state.ball.pos, state.hole.starting_position);

        let tee = state.ball.pos;
        advance(&mut state, &TickInput::new([PointerEvent::Up(drag_to)]), FRAME_MS).unwrap();
        assert_eq!(state.phase, GamePhase::Rolling);
        assert_eq!(state.score.shots_total, 1);
        assert!(state.aim.is_none());
        assert!(state.ball.is_rolling());
        assert_ne!(state.ball.pos, tee);
    }

    #[test]
    fn test_stray_events_ignored() {
        let mut state = GameState::new(7, Tuning::default()).unwrap();
        let before = state.ball.clone();

        advance(&mut state, &TickInput::new([PointerEvent::Up(Vec2::new(0.9, 0.9))]), FRAME_MS)
            .unwrap();
        advance(&mut state, &TickInput::new([PointerEvent::Move(Vec2::new(0.2, 0.9))]), FRAME_MS)
            .unwrap();
        assert_eq!(state.phase, GamePhase::Still);
        assert_eq!(state.score.shots_total, 0);
        assert_eq!(state.ball, before);
    }

    #[test]
    fn test_no_aiming_while_rolling() {
        let mut state = GameState::new(7, Tuning::default()).unwrap();
        advance(&mut state, &shot(Vec2::new(0.5, 0.5), Vec2::new(0.6, 0.8)), FRAME_MS).unwrap();
        assert_eq!(state.phase, GamePhase::Rolling);

        advance(&mut state, &TickInput::new([PointerEvent::Down(Vec2::new(0.1, 0.1))]), FRAME_MS)
            .unwrap();
        assert_eq!(state.phase, GamePhase::Rolling);
        assert!(state.aim.is_none());
    }

    #[test]
    fn test_one_millisecond_step_from_tee() {
        // Straight descent to 0.2 then flat ground
        let tuning = Tuning {
            min_seg_len: 0.05,
            max_seg_len: 0.05,
            min_ground_height: 0.2,
            max_ground_height: 0.2,
            flat_chance: 0.0,
            ..Default::default()
        };
        let mut state = GameState::new(0, tuning.clone()).unwrap();
        let tee = state.hole.starting_position;
        assert!((tee - Vec2::new(0.1, 0.201)).length() < 1e-5);

        let down = Vec2::new(0.5, 0.5);
        let up = down + Vec2::new(0.05, 0.3) / tuning.shot_strength;
        advance(&mut state, &shot(down, up), 1.0).unwrap();

        let launch = tuning.shot_strength * (up - down);
        assert!((launch - Vec2::new(0.05, 0.3)).length() < 1e-5);

        let delta = tuning.game_speed;
        let velocity = launch + tuning.gravity * delta;
        let expected = tee + velocity * delta;
        assert_eq!(state.phase, GamePhase::Rolling);
        assert!((state.ball.pos - expected).length() < 1e-7, "{:?}", state.ball.pos);
    }

    #[test]
    fn test_shots_settle() {
        for seed in 1..=5 {
            let mut state = GameState::new(seed, Tuning::default()).unwrap();
            advance(&mut state, &shot(Vec2::new(0.5, 0.5), Vec2::new(0.6, 0.65)), FRAME_MS)
                .unwrap();

            let mut ticks = 0;
            while state.phase == GamePhase::Rolling && ticks < 5000 {
                advance(&mut state, &TickInput::default(), FRAME_MS).unwrap();
                ticks += 1;
            }
            assert_ne!(state.phase, GamePhase::Rolling, "seed {seed} still rolling");
            assert_eq!(state.ball.vel, Vec2::ZERO);
        }
    }

    #[test]
    fn test_sinking_starts_celebration_then_new_hole() {
        let tuning = Tuning::default();
        let mut state = GameState::new(42, tuning.clone()).unwrap();
        let old_hole = state.hole.clone();

        // Drop the ball straight into the hole
        state.ball.pos = state.hole.hole_bottom + Vec2::new(0.0, 0.001);
        state.ball.state = BallState::Still;
        advance(&mut state, &TickInput::default(), FRAME_MS).unwrap();
        assert_eq!(state.phase, GamePhase::Celebrating);
        assert_eq!(state.score.holes_completed, 1);

        // Gameplay input is ignored during the celebration
        advance(&mut state, &TickInput::new([PointerEvent::Down(Vec2::new(0.5, 0.5))]), 100.0)
            .unwrap();
        assert_eq!(state.phase, GamePhase::Celebrating);
        assert!(state.aim.is_none());

        // 2100 ms total, 100 ms already played
        for _ in 0..19 {
            advance(&mut state, &TickInput::default(), 100.0).unwrap();
            assert_eq!(state.phase, GamePhase::Celebrating);
        }
        let celebration = state.celebration.as_ref().unwrap();
        assert_eq!(celebration.spawned, tuning.num_explosions);

        advance(&mut state, &TickInput::default(), 100.0).unwrap();
        assert_eq!(state.phase, GamePhase::Still);
        assert!(state.celebration.is_none());
        assert_ne!(state.hole, old_hole);
        assert_eq!(state.ball.pos, state.hole.starting_position);
        assert_eq!(state.score.holes_completed, 1);
        assert_eq!(state.score.hole_number(), 2);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999, Tuning::default()).unwrap();
        let mut state2 = GameState::new(99999, Tuning::default()).unwrap();

        let inputs = [
            shot(Vec2::new(0.2, 0.2), Vec2::new(0.45, 0.5)),
            TickInput::default(),
            TickInput::new([PointerEvent::Move(Vec2::new(0.9, 0.9))]),
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                advance(&mut state1, input, FRAME_MS).unwrap();
                advance(&mut state2, input, FRAME_MS).unwrap();
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.ball, state2.ball);
        assert_eq!(state1.score, state2.score);
    }
}
