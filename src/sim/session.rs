//! Game session and state machine
//!
//! `Session` owns one run at a time. Commands move it through
//! `Setup -> Ready -> Playing -> GameOver -> (Setup | Ready)`; anything else is
//! rejected with a `TransitionError` and leaves the session untouched.

use std::fmt;

use rand_pcg::Pcg32;

use super::difficulty::{DifficultyState, SpeedRamp};
use super::obstacles::{self, FixedUnits, UnitSource};
use super::physics;
use super::state::{Cloud, Command, GameEvent, Obstacle, Phase, PlayerBody, RngState, seed_clouds};
use crate::highscores::{RunSummary, SessionBest};
use crate::tuning::GameConfig;

/// Builds the random source for each new run (argument is the run index)
pub type SourceFactory = Box<dyn FnMut(u64) -> Box<dyn UnitSource>>;

/// Sprite supplied by the host, or the built-in procedural drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum SpriteSource {
    /// Opaque host handle for a loaded image
    Image(u32),
    #[default]
    Procedural,
}

/// Sprite handles for the two drawable entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Sprites {
    pub player: SpriteSource,
    pub obstacle: SpriteSource,
}

/// Command not valid in the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionError {
    pub from: Phase,
    pub command: Command,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} is not valid in phase {}", self.command, self.from)
    }
}

impl std::error::Error for TransitionError {}

/// State scoped to one run: created entering Ready, dropped returning to Setup
pub struct Run {
    pub player: PlayerBody,
    /// Oldest first
    pub obstacles: Vec<Obstacle>,
    pub difficulty: DifficultyState,
    pub clouds: Vec<Cloud>,
    pub score: u32,
    /// Frames advanced while playing
    pub frames: u64,
    /// Gap placement draws
    pub(crate) source: Box<dyn UnitSource>,
    /// Cloud heights only, kept apart so decor never shifts gap placement
    pub(crate) cloud_rng: Pcg32,
    /// Live only while playing
    pub(crate) ramp: Option<SpeedRamp>,
}

impl fmt::Debug for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Run")
            .field("player", &self.player)
            .field("obstacles", &self.obstacles.len())
            .field("speed", &self.difficulty.current_speed)
            .field("score", &self.score)
            .field("frames", &self.frames)
            .field("ramp", &self.ramp.is_some())
            .finish()
    }
}

/// The whole game: phase, current run, session-long best
pub struct Session {
    config: GameConfig,
    phase: Phase,
    run: Option<Run>,
    best: SessionBest,
    sprites: Sprites,
    rng: RngState,
    source_factory: Option<SourceFactory>,
    runs_started: u64,
    events: Vec<GameEvent>,
    last_summary: Option<RunSummary>,
    /// Playfield changed mid-run; clamp the player on the next frame
    pub(crate) pending_clamp: bool,
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        let rng = RngState::new(config.seed);
        Self {
            config,
            phase: Phase::Setup,
            run: None,
            best: SessionBest::new(),
            sprites: Sprites::default(),
            rng,
            source_factory: None,
            runs_started: 0,
            events: Vec::new(),
            last_summary: None,
            pending_clamp: false,
        }
    }

    /// Session whose runs draw from `factory` instead of the seeded PCG
    pub fn with_source_factory(config: GameConfig, factory: SourceFactory) -> Self {
        let mut session = Self::new(config);
        session.source_factory = Some(factory);
        session
    }

    /// Every run replays the same fixed draw sequence
    pub fn scripted(config: GameConfig, units: Vec<f32>) -> Self {
        let factory: SourceFactory =
            Box::new(move |_| Box::new(FixedUnits::new(units.clone())) as Box<dyn UnitSource>);
        Self::with_source_factory(config, factory)
    }

    // === Commands ===

    /// Apply a host command at wall-clock time `now_ms`
    pub fn handle(&mut self, command: Command, now_ms: f64) -> Result<(), TransitionError> {
        match (self.phase, command) {
            (Phase::Setup, Command::Start) | (Phase::GameOver, Command::PlayAgain) => {
                self.enter_ready();
                Ok(())
            }
            (Phase::Ready, Command::Activate) => {
                self.begin_playing(now_ms);
                Ok(())
            }
            (Phase::Playing, Command::Activate) => {
                if let Some(run) = self.run.as_mut() {
                    physics::jump(&mut run.player, &self.config.tuning());
                }
                Ok(())
            }
            (Phase::GameOver, Command::Reset) => {
                self.enter_setup();
                Ok(())
            }
            (from, command) => {
                log::debug!("Ignoring {:?} in phase {}", command, from);
                Err(TransitionError { from, command })
            }
        }
    }

    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.handle(Command::Start, 0.0)
    }

    pub fn activate(&mut self, now_ms: f64) -> Result<(), TransitionError> {
        self.handle(Command::Activate, now_ms)
    }

    pub fn reset(&mut self) -> Result<(), TransitionError> {
        self.handle(Command::Reset, 0.0)
    }

    pub fn play_again(&mut self) -> Result<(), TransitionError> {
        self.handle(Command::PlayAgain, 0.0)
    }

    fn enter_ready(&mut self) {
        let cloud_rng = self.rng.clouds();
        let source = self.next_source();
        let rest_y = ((self.config.ground_y() - self.config.player_size) / 2.0).max(0.0);
        let difficulty = DifficultyState::new(&self.config.speed);
        self.run = Some(Run {
            player: PlayerBody::at_rest(rest_y),
            obstacles: Vec::new(),
            difficulty,
            clouds: seed_clouds(self.config.width, self.config.height),
            score: 0,
            frames: 0,
            source,
            cloud_rng,
            ramp: None,
        });
        self.phase = Phase::Ready;
        self.last_summary = None;
        self.pending_clamp = false;
        self.events.push(GameEvent::ScoreChanged(0));
        self.events.push(GameEvent::SpeedChanged(difficulty.current_speed));
        log::info!("Run {} ready (seed {})", self.runs_started, self.rng.seed);
    }

    fn begin_playing(&mut self, now_ms: f64) {
        let tuning = self.config.tuning();
        let Some(run) = self.run.as_mut() else {
            return;
        };
        obstacles::seed_first(&mut run.obstacles, &self.config, run.source.as_mut());
        physics::jump(&mut run.player, &tuning);
        run.ramp = Some(SpeedRamp::start(now_ms, self.config.speed.interval_ms));
        self.phase = Phase::Playing;
        log::info!(
            "Playing: first gap at y={:.0}, speed {:.1}",
            run.obstacles[0].gap_top,
            run.difficulty.current_speed
        );
    }

    /// Terminal collision: freeze the run, release timers, record the score
    pub(crate) fn end_run(&mut self) -> Option<RunSummary> {
        if self.phase != Phase::Playing {
            return None;
        }
        let run = self.run.as_mut()?;
        run.ramp = None;
        self.phase = Phase::GameOver;

        let summary = self.best.record(run.score);
        self.events.push(GameEvent::HitFeedback);
        self.events.push(GameEvent::GameOver {
            score: summary.score,
            new_best: summary.new_best,
        });
        self.last_summary = Some(summary);
        log::info!(
            "Game over: score {} (best {}{}) at speed {:.1} after {} frames",
            summary.score,
            summary.high_score,
            if summary.new_best { ", new best" } else { "" },
            run.difficulty.current_speed,
            run.frames
        );
        Some(summary)
    }

    fn enter_setup(&mut self) {
        self.run = None;
        self.phase = Phase::Setup;
        self.pending_clamp = false;
    }

    fn next_source(&mut self) -> Box<dyn UnitSource> {
        let index = self.runs_started;
        self.runs_started += 1;
        match self.source_factory.as_mut() {
            Some(factory) => factory(index),
            None => Box::new(self.rng.next_run()),
        }
    }

    // === Host configuration ===

    /// Playfield resize. Not guaranteed to be fair mid-run; the player is
    /// clamped back inside the new bounds on the next frame.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        if self.run.is_some() {
            self.pending_clamp = true;
        }
    }

    pub fn set_sprites(&mut self, sprites: Sprites) {
        self.sprites = sprites;
    }

    pub fn set_player_sprite(&mut self, source: SpriteSource) {
        self.sprites.player = source;
    }

    pub fn set_obstacle_sprite(&mut self, source: SpriteSource) {
        self.sprites.obstacle = source;
    }

    // === Accessors ===

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn run(&self) -> Option<&Run> {
        self.run.as_ref()
    }

    pub(crate) fn run_mut(&mut self) -> Option<&mut Run> {
        self.run.as_mut()
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn sprites(&self) -> Sprites {
        self.sprites
    }

    pub fn score(&self) -> u32 {
        self.run.as_ref().map(|r| r.score).unwrap_or(0)
    }

    pub fn high_score(&self) -> u32 {
        self.best.high_score()
    }

    pub fn current_speed(&self) -> f32 {
        self.run
            .as_ref()
            .map(|r| r.difficulty.current_speed)
            .unwrap_or(self.config.speed.initial)
    }

    /// Summary of the run that just ended (GameOver only)
    pub fn last_summary(&self) -> Option<RunSummary> {
        self.last_summary
    }

    /// The speed ramp timer is held
    pub fn speed_ramp_active(&self) -> bool {
        self.run.as_ref().is_some_and(|r| r.ramp.is_some())
    }

    /// The frame driver should keep requesting frames
    pub fn wants_frames(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Profile;
    use proptest::prelude::*;

    fn session() -> Session {
        Session::scripted(GameConfig::new(800.0, 600.0, Profile::Standard), vec![0.5])
    }

    fn force_game_over(session: &mut Session) {
        session.start().unwrap();
        session.activate(0.0).unwrap();
        session.end_run();
    }

    #[test]
    fn test_start_initializes_run() {
        let mut s = session();
        assert_eq!(s.phase(), Phase::Setup);
        assert!(s.run().is_none());
        s.start().unwrap();
        assert_eq!(s.phase(), Phase::Ready);
        let run = s.run().unwrap();
        assert_eq!(run.player.y, 225.0);
        assert_eq!(run.player.velocity, 0.0);
        assert!(run.obstacles.is_empty());
        assert_eq!(run.clouds.len(), 4);
        assert_eq!(s.score(), 0);
        assert_eq!(s.current_speed(), 3.0);
        assert!(!s.speed_ramp_active());
        assert!(!s.wants_frames());
    }

    #[test]
    fn test_first_activation_begins_playing() {
        let mut s = session();
        s.start().unwrap();
        s.activate(1000.0).unwrap();
        assert_eq!(s.phase(), Phase::Playing);
        let run = s.run().unwrap();
        assert_eq!(run.obstacles.len(), 1);
        assert_eq!(run.obstacles[0].x, 600.0);
        assert!((100.0..=300.0).contains(&run.obstacles[0].gap_top));
        assert_eq!(run.player.velocity, -10.0);
        assert!(s.speed_ramp_active());
        assert!(s.wants_frames());
    }

    #[test]
    fn test_activate_while_playing_only_jumps() {
        let mut s = session();
        s.start().unwrap();
        s.activate(0.0).unwrap();
        s.run_mut().unwrap().player.velocity = 4.0;
        s.run_mut().unwrap().obstacles[0].x = 333.0;
        s.activate(16.0).unwrap();
        let run = s.run().unwrap();
        assert_eq!(run.player.velocity, -10.0);
        assert_eq!(run.obstacles.len(), 1);
        assert_eq!(run.obstacles[0].x, 333.0);
    }

    #[test]
    fn test_game_over_releases_timer_and_updates_best() {
        let mut s = session();
        s.start().unwrap();
        s.activate(0.0).unwrap();
        s.run_mut().unwrap().score = 4;
        s.drain_events();
        let summary = s.end_run().unwrap();
        assert_eq!(s.phase(), Phase::GameOver);
        assert!(!s.speed_ramp_active());
        assert!(!s.wants_frames());
        assert_eq!(s.high_score(), 4);
        assert!(summary.new_best);
        assert_eq!(
            s.drain_events(),
            vec![
                GameEvent::HitFeedback,
                GameEvent::GameOver { score: 4, new_best: true }
            ]
        );
    }

    #[test]
    fn test_play_again_and_reset() {
        let mut s = session();
        force_game_over(&mut s);
        s.play_again().unwrap();
        assert_eq!(s.phase(), Phase::Ready);
        assert!(s.run().unwrap().obstacles.is_empty());

        s.activate(0.0).unwrap();
        s.end_run();
        s.reset().unwrap();
        assert_eq!(s.phase(), Phase::Setup);
        assert!(s.run().is_none());
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let mut s = session();
        force_game_over(&mut s);
        assert!(s.end_run().is_none());
        s.reset().unwrap();
        assert!(s.reset().is_err());
        assert_eq!(s.phase(), Phase::Setup);
        assert!(!s.speed_ramp_active());
        assert!(!s.wants_frames());
    }

    #[test]
    fn test_rejected_commands_leave_state() {
        let mut s = session();
        let err = s.activate(0.0).unwrap_err();
        assert_eq!(err, TransitionError { from: Phase::Setup, command: Command::Activate });
        assert!(s.play_again().is_err());

        s.start().unwrap();
        assert!(s.start().is_err());
        assert!(s.reset().is_err());
        assert_eq!(s.phase(), Phase::Ready);
    }

    #[test]
    fn test_high_score_survives_runs() {
        let mut s = session();
        s.start().unwrap();
        s.activate(0.0).unwrap();
        s.run_mut().unwrap().score = 7;
        s.end_run();
        s.play_again().unwrap();
        s.activate(0.0).unwrap();
        s.run_mut().unwrap().score = 2;
        let summary = s.end_run().unwrap();
        assert!(!summary.new_best);
        assert_eq!(s.high_score(), 7);
        assert_eq!(s.score(), 2);
    }

    #[test]
    fn test_resize_flags_clamp() {
        let mut s = session();
        s.resize(400.0, 500.0);
        assert!(!s.pending_clamp);
        s.start().unwrap();
        s.resize(400.0, 450.0);
        assert!(s.pending_clamp);
        assert_eq!(s.config().width, 400.0);
    }

    fn arb_command() -> impl Strategy<Value = Command> {
        prop_oneof![
            Just(Command::Start),
            Just(Command::Activate),
            Just(Command::Reset),
            Just(Command::PlayAgain),
        ]
    }

    proptest! {
        #[test]
        fn prop_only_defined_transitions(commands in prop::collection::vec((arb_command(), any::<bool>()), 0..60)) {
            let mut s = session();
            for (command, crash) in commands {
                let before = s.phase();
                let result = s.handle(command, 0.0);
                let after = s.phase();
                let allowed = matches!(
                    (before, command, after),
                    (Phase::Setup, Command::Start, Phase::Ready)
                        | (Phase::Ready, Command::Activate, Phase::Playing)
                        | (Phase::Playing, Command::Activate, Phase::Playing)
                        | (Phase::GameOver, Command::Reset, Phase::Setup)
                        | (Phase::GameOver, Command::PlayAgain, Phase::Ready)
                );
                if result.is_ok() {
                    prop_assert!(allowed);
                } else {
                    prop_assert_eq!(before, after);
                }
                prop_assert_eq!(s.speed_ramp_active(), s.phase() == Phase::Playing);
                if crash {
                    s.end_run();
                }
            }
        }
    }
}
