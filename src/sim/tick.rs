//! Per-frame simulation step
//!
//! One call per display refresh while playing. Order within a frame:
//! clouds, speed ramp, physics, bounds, obstacles, collision + scoring.
//! A terminal collision ends the frame immediately.

use super::autopilot;
use super::collision::{Aabb, ObstacleBounds, obstacle_hit, score_crossing};
use super::decor;
use super::obstacles;
use super::physics;
use super::session::Session;
use super::state::{GameEvent, Phase};
use crate::highscores::RunSummary;

/// Input sampled once per frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Wall-clock time in milliseconds (drives the speed ramp)
    pub now_ms: f64,
    /// Idle/demo mode - the autopilot jumps
    pub autopilot: bool,
}

impl FrameInput {
    pub fn at(now_ms: f64) -> Self {
        Self {
            now_ms,
            ..Default::default()
        }
    }
}

/// Result of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Not playing; nothing advanced
    Idle,
    /// Frame advanced, request the next one
    Continue,
    /// Terminal collision this frame; do not reschedule
    Ended(RunSummary),
}

impl StepOutcome {
    pub fn reschedule(&self) -> bool {
        matches!(self, StepOutcome::Continue)
    }
}

/// Advance the session by one frame
pub fn tick(session: &mut Session, input: &FrameInput) -> StepOutcome {
    if session.phase() != Phase::Playing {
        return StepOutcome::Idle;
    }

    let config = session.config().clone();
    let tuning = config.tuning();
    let clamp = std::mem::take(&mut session.pending_clamp);
    let mut events = Vec::new();

    let terminal = {
        let Some(run) = session.run_mut() else {
            return StepOutcome::Idle;
        };
        run.frames += 1;

        // Clouds drift
        decor::drift(&mut run.clouds, config.width, config.height, &mut run.cloud_rng);

        // Speed ramp (wall clock)
        if let Some(ramp) = run.ramp.as_mut() {
            let due = ramp.poll(input.now_ms);
            let mut changed = false;
            for _ in 0..due {
                changed |= run.difficulty.tick();
            }
            if changed {
                log::info!("Speed up: {:.1}", run.difficulty.current_speed);
                events.push(GameEvent::SpeedChanged(run.difficulty.current_speed));
            }
        }

        // Playfield was resized mid-run
        if clamp {
            physics::clamp_into_bounds(&mut run.player, config.player_size, config.ground_y());
        }

        if input.autopilot && autopilot::should_flap(run, &config) {
            physics::jump(&mut run.player, &tuning);
        }

        // Physics
        physics::integrate(&mut run.player, &tuning);
        if physics::out_of_bounds(&run.player, config.player_size, config.ground_y()) {
            true
        } else {
            // Obstacles: move, spawn, prune
            obstacles::advance(&mut run.obstacles, run.difficulty.current_speed);
            obstacles::spawn_if_due(&mut run.obstacles, &config, run.source.as_mut());
            obstacles::prune(&mut run.obstacles, tuning.obstacle_width);

            // Collision, then scoring, per obstacle
            let player_x = config.player_x();
            let player_box = Aabb::square(player_x, run.player.y, config.player_size);
            let mut hit = false;
            for obstacle in run.obstacles.iter_mut() {
                let bounds = ObstacleBounds::of(obstacle, tuning.obstacle_width, tuning.gap_height);
                if obstacle_hit(&player_box, &bounds) {
                    hit = true;
                    break;
                }
                if score_crossing(obstacle, tuning.obstacle_width, player_x) {
                    run.score += 1;
                    events.push(GameEvent::ScoreChanged(run.score));
                }
            }
            hit
        }
    };

    for event in events {
        session.push_event(event);
    }

    if terminal {
        match session.end_run() {
            Some(summary) => StepOutcome::Ended(summary),
            None => StepOutcome::Idle,
        }
    } else {
        StepOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;
    use crate::tuning::{GameConfig, Profile};
    use proptest::prelude::*;

    fn playing(units: Vec<f32>) -> Session {
        let mut session = Session::scripted(GameConfig::new(800.0, 600.0, Profile::Standard), units);
        session.start().unwrap();
        session.activate(0.0).unwrap();
        session
    }

    #[test]
    fn test_tick_idle_outside_playing() {
        let mut session = Session::scripted(GameConfig::default(), vec![0.5]);
        assert_eq!(tick(&mut session, &FrameInput::at(0.0)), StepOutcome::Idle);
        session.start().unwrap();
        assert_eq!(tick(&mut session, &FrameInput::at(0.0)), StepOutcome::Idle);
        assert_eq!(session.phase(), Phase::Ready);
    }

    #[test]
    fn test_first_frame_after_activation() {
        let mut session = playing(vec![0.5]);
        let y0 = session.run().unwrap().player.y;
        assert_eq!(session.run().unwrap().player.velocity, -10.0);

        assert!(tick(&mut session, &FrameInput::at(16.0)).reschedule());
        let run = session.run().unwrap();
        assert_eq!(run.player.velocity, -9.5);
        assert_eq!(run.player.y, y0 - 9.5);
        assert_eq!(run.obstacles[0].x, 597.0);
    }

    #[test]
    fn test_ceiling_ends_game() {
        let mut session = playing(vec![0.5]);
        session.run_mut().unwrap().player.y = 5.0;
        session.run_mut().unwrap().score = 3;
        let outcome = tick(&mut session, &FrameInput::at(16.0));
        assert!(matches!(outcome, StepOutcome::Ended(s) if s.score == 3 && s.new_best));
        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.high_score(), 3);
        assert!(!session.speed_ramp_active());
        // Frozen: further frames do nothing
        let y = session.run().unwrap().player.y;
        assert_eq!(tick(&mut session, &FrameInput::at(32.0)), StepOutcome::Idle);
        assert_eq!(session.run().unwrap().player.y, y);
    }

    #[test]
    fn test_ground_ends_game() {
        let mut session = playing(vec![0.5]);
        let run = session.run_mut().unwrap();
        run.player.y = 450.0;
        run.player.velocity = 0.0;
        assert!(!tick(&mut session, &FrameInput::at(16.0)).reschedule());
        assert_eq!(session.phase(), Phase::GameOver);
    }

    #[test]
    fn test_obstacle_hit_ends_game() {
        let mut session = playing(vec![0.5]);
        let run = session.run_mut().unwrap();
        // Obstacle right on top of the player, gap far below
        run.obstacles[0] = Obstacle::new(190.0, 350.0);
        run.player.y = 100.0;
        run.player.velocity = -1.0;
        let outcome = tick(&mut session, &FrameInput::at(16.0));
        assert!(matches!(outcome, StepOutcome::Ended(_)));
    }

    #[test]
    fn test_scores_exactly_once() {
        let mut session = playing(vec![0.5]);
        let run = session.run_mut().unwrap();
        // Trailing edge at 202 moving 3/frame: crosses 200 on the first frame
        run.obstacles[0] = Obstacle::new(122.0, 200.0);
        run.player.y = 250.0;
        run.player.velocity = -0.5;
        session.drain_events();

        tick(&mut session, &FrameInput::at(16.0));
        assert_eq!(session.score(), 1);
        assert!(session.run().unwrap().obstacles[0].scored);

        for i in 0..5 {
            session.run_mut().unwrap().player.velocity = -0.5;
            tick(&mut session, &FrameInput::at(32.0 + i as f64 * 16.0));
        }
        assert_eq!(session.score(), 1);
        let scored = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ScoreChanged(_)))
            .count();
        assert_eq!(scored, 1);
    }

    #[test]
    fn test_speed_ramp_on_wall_clock() {
        let mut session = playing(vec![0.5]);
        session.drain_events();
        let hold = |s: &mut Session| s.run_mut().unwrap().player.velocity = -0.5;

        hold(&mut session);
        tick(&mut session, &FrameInput::at(9_999.0));
        assert_eq!(session.current_speed(), 3.0);

        hold(&mut session);
        tick(&mut session, &FrameInput::at(10_000.0));
        assert!((session.current_speed() - 3.4).abs() < 1e-6);
        assert!(session
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::SpeedChanged(_))));
    }

    #[test]
    fn test_spawns_at_spacing() {
        let mut session = playing(vec![0.0]);
        let run = session.run_mut().unwrap();
        run.obstacles[0].x = 502.0;
        run.player.velocity = -0.5;
        tick(&mut session, &FrameInput::at(16.0));
        let run = session.run().unwrap();
        assert_eq!(run.obstacles.len(), 2);
        assert_eq!(run.obstacles[1].x, 800.0);
        assert_eq!(run.obstacles[1].gap_top, 60.0);
    }

    #[test]
    fn test_resize_clamps_player() {
        let mut session = playing(vec![0.5]);
        session.run_mut().unwrap().player.y = 400.0;
        session.run_mut().unwrap().player.velocity = -10.0;
        session.resize(400.0, 450.0);
        // New legal max is 450 - 100 - 50 = 300
        tick(&mut session, &FrameInput::at(16.0));
        let run = session.run().unwrap();
        assert_eq!(run.player.y, 300.0 - 9.5);
        assert_eq!(session.phase(), Phase::Playing);
    }

    #[test]
    fn test_cloud_wrap_leaves_gap_sequence_alone() {
        let mut session = playing(vec![0.5, 0.0, 1.0]);
        for expected_gap in [60.0, 210.0] {
            let run = session.run_mut().unwrap();
            let size = run.clouds[0].size;
            run.clouds[0].x = -size;
            let newest = run.obstacles.len() - 1;
            run.obstacles[newest].x = 502.0;
            run.player.velocity = -0.5;

            tick(&mut session, &FrameInput::at(16.0));
            let run = session.run().unwrap();
            assert_eq!(run.clouds[0].x, 800.0 + size);
            assert_eq!(run.obstacles.last().unwrap().x, 800.0);
            assert_eq!(run.obstacles.last().unwrap().gap_top, expected_gap);
        }
    }

    fn playing_reduced() -> Session {
        let mut session = Session::scripted(GameConfig::new(400.0, 600.0, Profile::Reduced), vec![0.5]);
        session.start().unwrap();
        session.activate(0.0).unwrap();
        session
    }

    #[test]
    fn test_reduced_profile_first_frame() {
        let mut session = playing_reduced();
        let run = session.run().unwrap();
        assert_eq!(run.player.y, 225.0);
        assert_eq!(run.player.velocity, -8.5);
        assert_eq!(run.obstacles[0].x, 300.0);
        // [100, 300] at 0.5, well inside 500 - 200
        assert_eq!(run.obstacles[0].gap_top, 200.0);

        tick(&mut session, &FrameInput::at(16.0));
        let run = session.run().unwrap();
        assert!((run.player.velocity - -8.1).abs() < 1e-5);
        assert!((run.player.y - 216.9).abs() < 1e-4);
        assert_eq!(run.obstacles[0].x, 297.0);
    }

    #[test]
    fn test_reduced_profile_spawn_threshold() {
        let mut session = playing_reduced();
        let hold = |s: &mut Session| s.run_mut().unwrap().player.velocity = -0.4;

        // 183 - 3 = 180 is not left of 400 - 220
        session.run_mut().unwrap().obstacles[0].x = 183.0;
        hold(&mut session);
        tick(&mut session, &FrameInput::at(16.0));
        assert_eq!(session.run().unwrap().obstacles.len(), 1);

        hold(&mut session);
        tick(&mut session, &FrameInput::at(32.0));
        let run = session.run().unwrap();
        assert_eq!(run.obstacles.len(), 2);
        assert_eq!(run.obstacles[1].x, 400.0);
        // Regular range is [60, 500 - 200 - 60] = [60, 240]
        assert_eq!(run.obstacles[1].gap_top, 150.0);
    }

    #[test]
    fn test_reduced_profile_collision_width() {
        // Player spans x 100..150 at y 100; gap far below
        let place = |x: f32| {
            let mut session = playing_reduced();
            let run = session.run_mut().unwrap();
            run.obstacles[0] = Obstacle::new(x, 350.0);
            run.player.y = 100.0;
            run.player.velocity = -0.4;
            tick(&mut session, &FrameInput::at(16.0))
        };

        // Right edge lands at 98: clear with a 64 px obstacle
        assert_eq!(place(37.0), StepOutcome::Continue);
        // Right edge lands at 101: overlaps the player
        assert!(matches!(place(40.0), StepOutcome::Ended(_)));
    }

    #[test]
    fn test_autopilot_survives_a_while() {
        let mut session = playing(vec![0.3, 0.7, 0.5, 0.2, 0.8]);
        let input = FrameInput { now_ms: 0.0, autopilot: true };
        let mut frames = 0;
        while tick(&mut session, &input).reschedule() && frames < 600 {
            frames += 1;
        }
        assert!(frames > 60, "autopilot crashed after {} frames", frames);
    }

    proptest! {
        #[test]
        fn prop_score_monotonic_and_single(
            seed in any::<u64>(),
            jumps in prop::collection::vec(any::<bool>(), 1..400),
        ) {
            let mut session = Session::new(GameConfig::default().with_seed(seed));
            session.start().unwrap();
            session.activate(0.0).unwrap();
            let mut last = 0;
            let mut now = 0.0;
            for jump in jumps {
                now += 16.0;
                if jump {
                    let _ = session.activate(now);
                }
                let outcome = tick(&mut session, &FrameInput::at(now));
                prop_assert!(session.score() >= last);
                prop_assert!(session.score() <= last + 1);
                last = session.score();
                let speed = session.current_speed();
                prop_assert!((3.0..=8.0).contains(&speed));
                if !outcome.reschedule() {
                    prop_assert!(!session.speed_ramp_active());
                    break;
                }
            }
        }
    }
}
